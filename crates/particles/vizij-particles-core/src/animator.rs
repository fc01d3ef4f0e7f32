//! Mount/unmount lifecycle tying a [`FieldEngine`] to a rendering surface,
//! a tick driver and the scroll/resize observers.
//!
//! The animator is a decorative layer: every failure is logged and turns the
//! animator into a no-op instead of reaching the host.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::config::{Config, PowerPreference};
use crate::driver::{ResizeNotifier, ScrollProvider, TickDriver};
use crate::error::SurfaceError;
use crate::field::FieldEngine;
use crate::frame::{CameraParams, Frame};
use crate::palette::GLOW_TEXTURE_SIZE;
use crate::state::{InputSink, Viewport};

/// Everything a surface needs to (re)configure itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurfaceConfig {
    pub viewport: Viewport,
    pub pixel_ratio: f32,
    pub antialias: bool,
    pub power_preference: PowerPreference,
    pub camera: CameraParams,
    pub particle_count: usize,
    pub glow_texture_size: u32,
}

impl SurfaceConfig {
    pub fn for_field(field: &FieldEngine, device_pixel_ratio: f32) -> Self {
        let profile = field.profile();
        Self {
            viewport: field.state().viewport,
            pixel_ratio: profile.pixel_ratio(device_pixel_ratio),
            antialias: profile.antialias,
            power_preference: profile.power_preference,
            camera: field.camera(),
            particle_count: field.particle_count(),
            glow_texture_size: GLOW_TEXTURE_SIZE,
        }
    }
}

/// A live rendering target (WebGL context, GPU surface, test recorder...).
pub trait RenderSurface {
    /// Apply a full configuration; called after the device class changes.
    fn configure(&mut self, config: &SurfaceConfig) -> Result<(), SurfaceError>;
    /// Viewport changed within the same device class.
    fn resize(&mut self, viewport: Viewport, camera: &CameraParams) -> Result<(), SurfaceError>;
    fn present(&mut self, frame: &Frame<'_>) -> Result<(), SurfaceError>;
    /// Free graphics resources. Called at most once per surface.
    fn release(&mut self);
}

pub trait SurfaceFactory {
    type Surface: RenderSurface + 'static;

    fn acquire(&mut self, config: &SurfaceConfig) -> Result<Self::Surface, SurfaceError>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MountStatus {
    /// Not mounted.
    Idle,
    Running,
    /// Mounted but rendering nothing after a surface or setup failure.
    Disabled,
}

struct Mounted<S> {
    field: FieldEngine,
    surface: Option<S>,
    sink: InputSink,
    device_pixel_ratio: f32,
}

impl<S: RenderSurface> Mounted<S> {
    fn tick(&mut self, dt: f32) {
        let Mounted {
            field,
            surface,
            sink,
            device_pixel_ratio,
        } = self;
        let Some(active) = surface.as_mut() else {
            return;
        };

        let inputs = sink.snapshot();
        let surface_update = match field.apply_inputs(inputs) {
            Ok(true) => active.configure(&SurfaceConfig::for_field(field, *device_pixel_ratio)),
            Ok(false) if inputs.viewport_changed => {
                active.resize(inputs.viewport, &field.camera())
            }
            Ok(false) => Ok(()),
            Err(err) => {
                log::warn!("keeping previous keyframes after failed regeneration: {err}");
                Ok(())
            }
        };

        let result = surface_update.and_then(|_| {
            field.step(dt);
            active.present(&field.frame())
        });
        if let Err(err) = result {
            log::warn!("particle surface failed, disabling animation: {err}");
            if let Some(mut dead) = surface.take() {
                dead.release();
            }
        }
    }

    fn is_disabled(&self) -> bool {
        self.surface.is_none()
    }

    fn release(&mut self) {
        if let Some(mut surface) = self.surface.take() {
            surface.release();
        }
    }
}

/// Owns the lifecycle of one particle field on one host surface.
pub struct Animator<F: SurfaceFactory> {
    cfg: Config,
    factory: F,
    driver: Box<dyn TickDriver>,
    scroll: Box<dyn ScrollProvider>,
    resize: Box<dyn ResizeNotifier>,
    device_pixel_ratio: f32,
    mounted: Option<Rc<RefCell<Mounted<F::Surface>>>>,
    status: MountStatus,
}

impl<F: SurfaceFactory> Animator<F> {
    pub fn new(
        cfg: Config,
        factory: F,
        driver: Box<dyn TickDriver>,
        scroll: Box<dyn ScrollProvider>,
        resize: Box<dyn ResizeNotifier>,
    ) -> Self {
        Self {
            cfg,
            factory,
            driver,
            scroll,
            resize,
            device_pixel_ratio: 1.0,
            mounted: None,
            status: MountStatus::Idle,
        }
    }

    pub fn with_device_pixel_ratio(mut self, ratio: f32) -> Self {
        self.device_pixel_ratio = if ratio.is_finite() && ratio > 0.0 {
            ratio
        } else {
            1.0
        };
        self
    }

    pub fn status(&self) -> MountStatus {
        match &self.mounted {
            Some(m) if m.borrow().is_disabled() => MountStatus::Disabled,
            _ => self.status,
        }
    }

    /// Read access to the mounted field, if any.
    pub fn with_field<T>(&self, f: impl FnOnce(&FieldEngine) -> T) -> Option<T> {
        self.mounted.as_ref().map(|m| f(&m.borrow().field))
    }

    /// Build the field, acquire a surface, connect observers and start ticking.
    ///
    /// Never fails: problems are logged and leave the animator `Disabled`.
    /// Mounting twice is a no-op.
    pub fn mount(&mut self) -> MountStatus {
        if self.status != MountStatus::Idle {
            return self.status();
        }
        let viewport = self.resize.viewport();
        let field = match FieldEngine::new(self.cfg.clone(), viewport) {
            Ok(field) => field,
            Err(err) => {
                log::warn!("particle field disabled: {err}");
                self.status = MountStatus::Disabled;
                return self.status;
            }
        };
        let surface_cfg = SurfaceConfig::for_field(&field, self.device_pixel_ratio);
        let surface = match self.factory.acquire(&surface_cfg) {
            Ok(surface) => surface,
            Err(err) => {
                log::warn!("particle surface unavailable, rendering nothing: {err}");
                self.status = MountStatus::Disabled;
                return self.status;
            }
        };
        log::debug!(
            "particle animator mounted ({:?}, {} particles)",
            field.device_class(),
            field.particle_count()
        );

        let sink = InputSink::new(viewport);
        let mounted = Rc::new(RefCell::new(Mounted {
            field,
            surface: Some(surface),
            sink: sink.clone(),
            device_pixel_ratio: self.device_pixel_ratio,
        }));
        self.scroll.observe(sink.clone());
        self.resize.observe(sink);

        let ticking = Rc::clone(&mounted);
        self.driver
            .start(Box::new(move |dt| ticking.borrow_mut().tick(dt)));
        self.mounted = Some(mounted);
        self.status = MountStatus::Running;
        self.status
    }

    /// Stop the driver, disconnect observers and release the surface.
    /// Idempotent.
    pub fn unmount(&mut self) {
        if self.status == MountStatus::Idle {
            return;
        }
        self.driver.stop();
        if let Some(mounted) = self.mounted.take() {
            self.scroll.disconnect();
            self.resize.disconnect();
            mounted.borrow_mut().release();
        }
        self.status = MountStatus::Idle;
        log::debug!("particle animator unmounted");
    }
}

impl<F: SurfaceFactory> Drop for Animator<F> {
    fn drop(&mut self) {
        self.unmount();
    }
}
