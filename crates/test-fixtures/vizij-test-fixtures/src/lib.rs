use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    outlines: HashMap<String, String>,
    #[serde(default)]
    configs: HashMap<String, String>,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a>(map: &'a HashMap<String, String>, kind: &str, name: &str) -> Result<&'a str> {
    map.get(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

/// Silhouette outlines with known geometry: `contours` plus an `expected`
/// block (area, perimeter, inside/outside sample points).
pub mod outlines {
    use super::*;

    /// Contours and expected measurements of one outline fixture.
    #[derive(Debug, Clone, Deserialize)]
    pub struct OutlineFixture {
        pub contours: Vec<Vec<[f32; 2]>>,
        pub expected: Expected,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Expected {
        pub area: f32,
        pub perimeter: f32,
        #[serde(default)]
        pub inside: Vec<[f32; 2]>,
        #[serde(default)]
        pub outside: Vec<[f32; 2]>,
    }

    pub fn keys() -> Vec<String> {
        let mut keys: Vec<String> = MANIFEST.outlines.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn json(name: &str) -> Result<String> {
        read_to_string(lookup(&MANIFEST.outlines, "outline", name)?)
    }

    pub fn load(name: &str) -> Result<OutlineFixture> {
        super::load_json(lookup(&MANIFEST.outlines, "outline", name)?)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        Ok(resolve_path(lookup(&MANIFEST.outlines, "outline", name)?))
    }
}

/// Partial field configurations, deserialised by the caller.
pub mod configs {
    use super::*;

    pub fn keys() -> Vec<String> {
        let mut keys: Vec<String> = MANIFEST.configs.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn json(name: &str) -> Result<String> {
        read_to_string(lookup(&MANIFEST.configs, "config", name)?)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        super::load_json(lookup(&MANIFEST.configs, "config", name)?)
    }
}
