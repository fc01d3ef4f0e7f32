//! Silhouette outlines: closed 2D contours, a small path builder and the
//! even-odd point-in-polygon test.
//!
//! A `ShapeOutline` holds one or more closed contours. Curves are flattened
//! into straight segments when the path is built, so everything downstream
//! works on plain polygons.

use serde::{Deserialize, Serialize};

/// Straight segments used to flatten one quadratic curve.
pub const CURVE_DIVISIONS: usize = 12;

pub type Point2 = [f32; 2];

/// Axis-aligned bounding box.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Point2,
    pub max: Point2,
}

impl Bounds {
    pub fn width(&self) -> f32 {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> f32 {
        self.max[1] - self.min[1]
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    pub fn contains(&self, p: Point2) -> bool {
        p[0] >= self.min[0] && p[0] <= self.max[0] && p[1] >= self.min[1] && p[1] <= self.max[1]
    }
}

/// Even-odd ray casting against one closed polygon.
///
/// The polygon is implicitly closed (last vertex connects to the first).
pub fn contains_point(polygon: &[Point2], p: Point2) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let (x, y) = (p[0], p[1]);
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let [xi, yi] = polygon[i];
        let [xj, yj] = polygon[j];
        // Edges with yi == yj never satisfy the straddle test, so no division by zero.
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// A silhouette made of closed contours.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeOutline {
    pub contours: Vec<Vec<Point2>>,
}

impl ShapeOutline {
    pub fn new(contours: Vec<Vec<Point2>>) -> Self {
        Self { contours }
    }

    pub fn polygon(vertices: Vec<Point2>) -> Self {
        Self {
            contours: vec![vertices],
        }
    }

    /// Contours with enough vertices to enclose anything.
    pub fn usable_contours(&self) -> impl Iterator<Item = &Vec<Point2>> {
        self.contours.iter().filter(|c| c.len() >= 3)
    }

    pub fn is_empty(&self) -> bool {
        self.usable_contours().next().is_none()
    }

    /// Inside if any contour contains the point (even-odd per contour).
    pub fn contains(&self, p: Point2) -> bool {
        self.usable_contours().any(|c| contains_point(c, p))
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let mut it = self.usable_contours().flat_map(|c| c.iter());
        let first = *it.next()?;
        let mut b = Bounds {
            min: first,
            max: first,
        };
        for p in it {
            b.min[0] = b.min[0].min(p[0]);
            b.min[1] = b.min[1].min(p[1]);
            b.max[0] = b.max[0].max(p[0]);
            b.max[1] = b.max[1].max(p[1]);
        }
        Some(b)
    }

    /// Total length of all closed contours.
    pub fn perimeter(&self) -> f32 {
        self.usable_contours().map(|c| contour_length(c)).sum()
    }

    /// Sum of absolute shoelace areas of the contours.
    pub fn area(&self) -> f32 {
        self.usable_contours().map(|c| signed_area(c).abs()).sum()
    }

    /// `count` points at even arc-length spacing over all contours.
    pub fn spaced_points(&self, count: usize) -> Vec<Point2> {
        let edges: Vec<(Point2, Point2, f32)> = self
            .usable_contours()
            .flat_map(|c| closed_edges(c))
            .map(|(a, b)| (a, b, distance(a, b)))
            .filter(|(_, _, len)| *len > 0.0)
            .collect();
        let total: f32 = edges.iter().map(|e| e.2).sum();
        if count == 0 || edges.is_empty() || total <= 0.0 {
            // Zero-length outline: every sample collapses onto its vertices.
            let verts: Vec<Point2> = self.usable_contours().flatten().copied().collect();
            if verts.is_empty() || count == 0 {
                return Vec::new();
            }
            return (0..count).map(|i| verts[i % verts.len()]).collect();
        }

        let step = total / count as f32;
        let mut out = Vec::with_capacity(count);
        let mut edge_idx = 0;
        let mut walked = 0.0f32;
        for i in 0..count {
            let target = step * i as f32;
            while edge_idx + 1 < edges.len() && walked + edges[edge_idx].2 < target {
                walked += edges[edge_idx].2;
                edge_idx += 1;
            }
            let (a, b, len) = edges[edge_idx];
            let u = ((target - walked) / len).clamp(0.0, 1.0);
            out.push([a[0] + (b[0] - a[0]) * u, a[1] + (b[1] - a[1]) * u]);
        }
        out
    }

    /// Shortest distance from `p` to any contour edge.
    pub fn distance_to_boundary(&self, p: Point2) -> f32 {
        self.usable_contours()
            .flat_map(|c| closed_edges(c))
            .map(|(a, b)| distance_to_segment(p, a, b))
            .fold(f32::INFINITY, f32::min)
    }

    /// Apply `x * scale`, `(y + y_offset) * scale` to every vertex.
    pub fn transformed(&self, scale: f32, y_offset: f32) -> ShapeOutline {
        ShapeOutline {
            contours: self
                .contours
                .iter()
                .map(|c| {
                    c.iter()
                        .map(|p| [p[0] * scale, (p[1] + y_offset) * scale])
                        .collect()
                })
                .collect(),
        }
    }
}

fn closed_edges(contour: &[Point2]) -> impl Iterator<Item = (Point2, Point2)> + '_ {
    let n = contour.len();
    (0..n).map(move |i| (contour[i], contour[(i + 1) % n]))
}

fn contour_length(contour: &[Point2]) -> f32 {
    closed_edges(contour).map(|(a, b)| distance(a, b)).sum()
}

fn signed_area(contour: &[Point2]) -> f32 {
    let n = contour.len();
    let mut acc = 0.0f32;
    for i in 0..n {
        let a = contour[i];
        let b = contour[(i + 1) % n];
        acc += a[0] * b[1] - b[0] * a[1];
    }
    acc * 0.5
}

#[inline]
fn distance(a: Point2, b: Point2) -> f32 {
    ((b[0] - a[0]).powi(2) + (b[1] - a[1]).powi(2)).sqrt()
}

fn distance_to_segment(p: Point2, a: Point2, b: Point2) -> f32 {
    let ab = [b[0] - a[0], b[1] - a[1]];
    let len2 = ab[0] * ab[0] + ab[1] * ab[1];
    if len2 <= f32::EPSILON {
        return distance(p, a);
    }
    let u = (((p[0] - a[0]) * ab[0] + (p[1] - a[1]) * ab[1]) / len2).clamp(0.0, 1.0);
    distance(p, [a[0] + ab[0] * u, a[1] + ab[1] * u])
}

/// Builds a `ShapeOutline` from move/line/quadratic/close commands.
///
/// `move_to` starts a new contour; `close` ends the current one. An unclosed
/// contour is closed implicitly by `build`. As with canvas paths, a line or
/// curve after `close` starts a new contour at the closed contour's first
/// vertex.
#[derive(Debug, Default)]
pub struct PathBuilder {
    contours: Vec<Vec<Point2>>,
    current: Vec<Point2>,
    // Start of the last closed contour.
    pen: Option<Point2>,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.flush();
        self.current.push([x, y]);
        self
    }

    pub fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.reopen();
        self.push_vertex([x, y]);
        self
    }

    /// Quadratic bezier from the current point through control `(cx, cy)` to `(x, y)`.
    pub fn quadratic_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) -> &mut Self {
        self.reopen();
        let Some(&start) = self.current.last() else {
            return self.move_to(x, y);
        };
        for step in 1..=CURVE_DIVISIONS {
            let t = step as f32 / CURVE_DIVISIONS as f32;
            let mt = 1.0 - t;
            let px = mt * mt * start[0] + 2.0 * mt * t * cx + t * t * x;
            let py = mt * mt * start[1] + 2.0 * mt * t * cy + t * t * y;
            self.push_vertex([px, py]);
        }
        self
    }

    pub fn close(&mut self) -> &mut Self {
        if let Some(&first) = self.current.first() {
            self.pen = Some(first);
        }
        self.flush();
        self
    }

    pub fn build(mut self) -> ShapeOutline {
        self.flush();
        ShapeOutline {
            contours: self.contours,
        }
    }

    fn reopen(&mut self) {
        if self.current.is_empty() {
            if let Some(pen) = self.pen {
                self.current.push(pen);
            }
        }
    }

    fn push_vertex(&mut self, p: Point2) {
        if self.current.last() != Some(&p) {
            self.current.push(p);
        }
    }

    fn flush(&mut self) {
        let mut contour = std::mem::take(&mut self.current);
        // Drop an explicit closing vertex; contours are closed implicitly.
        if contour.len() > 1 && contour.first() == contour.last() {
            contour.pop();
        }
        if !contour.is_empty() {
            self.contours.push(contour);
        }
    }
}
