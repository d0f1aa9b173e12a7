//! Manifest parsing and build orchestration
//!
//! Parses export.toml and runs one export per scene entry.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::pipeline::{export_scene, ExportOptions, ExportReport};

/// Root manifest structure
#[derive(Debug, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub output: OutputConfig,
    /// Scene entries keyed by model name
    #[serde(default)]
    pub scenes: HashMap<String, SceneEntry>,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("assets/")
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SceneEntry {
    Simple(PathBuf),
    Detailed {
        path: PathBuf,
        /// Mesh object to export
        #[serde(default)]
        mesh: Option<String>,
        /// Armature object to export
        #[serde(default)]
        rig: Option<String>,
        #[serde(default)]
        fps: Option<f32>,
    },
}

impl SceneEntry {
    pub fn path(&self) -> &Path {
        match self {
            SceneEntry::Simple(p) => p,
            SceneEntry::Detailed { path, .. } => path,
        }
    }

    pub fn fps(&self) -> Option<f32> {
        match self {
            SceneEntry::Simple(_) => None,
            SceneEntry::Detailed { fps, .. } => *fps,
        }
    }

    /// Export options for this entry; the entry's key names the model.
    pub fn options(&self, name: &str) -> ExportOptions {
        let mut options = ExportOptions {
            model_name: Some(name.to_string()),
            ..Default::default()
        };
        if let SceneEntry::Detailed { mesh, rig, fps, .. } = self {
            options.mesh = mesh.clone();
            options.rig = rig.clone();
            options.fps = *fps;
        }
        options
    }
}

/// Load and parse a manifest file
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    let manifest: Manifest = toml::from_str(&content)
        .with_context(|| format!("Failed to parse manifest: {:?}", path))?;
    Ok(manifest)
}

/// Validate a manifest without building
pub fn validate(manifest: &Manifest) -> Result<()> {
    for (name, entry) in &manifest.scenes {
        if !entry.path().exists() {
            anyhow::bail!("Scene '{}' source not found: {:?}", name, entry.path());
        }
        if let Some(fps) = entry.fps() {
            if !(fps.is_finite() && fps > 0.0) {
                anyhow::bail!("Scene '{}' has an invalid frame rate: {}", name, fps);
            }
        }
    }
    Ok(())
}

/// Export every scene in the manifest, in name order
pub fn build_all(manifest: &Manifest, output_override: Option<&Path>) -> Result<Vec<ExportReport>> {
    let output_dir = output_override.unwrap_or(&manifest.output.dir);
    std::fs::create_dir_all(output_dir)?;

    let mut names: Vec<&String> = manifest.scenes.keys().collect();
    names.sort();

    let mut reports = Vec::with_capacity(names.len());
    for name in names {
        let entry = &manifest.scenes[name];
        tracing::info!("Exporting scene: {} -> {:?}", name, output_dir);
        let report = export_scene(entry.path(), output_dir, &entry.options(name))
            .with_context(|| format!("Failed to export scene '{}'", name))?;
        reports.push(report);
    }

    Ok(reports)
}
