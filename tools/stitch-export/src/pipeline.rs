//! Export pipeline: scene document -> compiled model -> asset files
//!
//! Each stage takes the previous stage's finished output by reference: the skeleton
//! is finalized before any animation is re-based or any vertex is bound.

use anyhow::{bail, Context, Result};
use hashbrown::{HashMap, HashSet};
use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use whipstitch_shared::WS_ASSET_FORMAT;

use crate::animation::{self, Animation};
use crate::error::{Condition, ExportError};
use crate::extract::{extract, ExtractOptions};
use crate::formats::{write_ws_animation, write_ws_mesh, write_ws_model};
use crate::mesh::{self, Mesh};
use crate::scene::{load_scene, SceneDocument, DEFAULT_FRAME_RATE};
use crate::skeleton::{self, Skeleton};
use crate::tokens::TokenFixer;

/// Per-scene export settings
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Model file name; defaults to the document name, then the mesh name
    pub model_name: Option<String>,
    /// Mesh object to export (default: first mesh)
    pub mesh: Option<String>,
    /// Armature object to export (default: first armature)
    pub rig: Option<String>,
    /// Overrides the document frame rate
    pub fps: Option<f32>,
}

/// Everything one export run produces, before any file is written
#[derive(Debug, Clone)]
pub struct CompiledScene {
    pub model_name: String,
    pub mesh: Mesh,
    pub skeleton: Option<Skeleton>,
    pub animations: Vec<Animation>,
    pub conditions: Vec<Condition>,
}

/// Completion status of one export run
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub model: String,
    pub meshes_emitted: usize,
    pub animations_emitted: usize,
    pub files: Vec<PathBuf>,
    pub conditions: Vec<Condition>,
}

impl fmt::Display for ExportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "model '{}': {} mesh(es), {} animation(s), {} file(s), {} condition(s)",
            self.model,
            self.meshes_emitted,
            self.animations_emitted,
            self.files.len(),
            self.conditions.len()
        )?;
        for condition in &self.conditions {
            write!(f, "\n  - {}", condition)?;
        }
        Ok(())
    }
}

/// Compile a scene document in memory
pub fn compile_scene(doc: &SceneDocument, options: &ExportOptions) -> Result<CompiledScene> {
    let extracted = extract(
        doc,
        &ExtractOptions {
            mesh: options.mesh.clone(),
            rig: options.rig.clone(),
        },
    )?;
    let mut conditions = Vec::new();

    let Some(mesh_source) = extracted.mesh.as_ref() else {
        bail!("Scene has no mesh object to export");
    };

    let model_name = options
        .model_name
        .clone()
        .or_else(|| extracted.name.map(str::to_string))
        .unwrap_or_else(|| mesh_source.name.to_string());

    let fps = options
        .fps
        .or(extracted.fps)
        .unwrap_or(DEFAULT_FRAME_RATE);
    if !(fps.is_finite() && fps > 0.0) {
        return Err(ExportError::InvalidFrameRate { fps }.into());
    }

    let skeleton = extracted.rig.as_ref().map(skeleton::build).transpose()?;

    let mut animations = Vec::new();
    match &skeleton {
        Some(skeleton) => {
            for action in extracted.actions {
                if let Some(anim) = animation::compile(action, skeleton, fps, &mut conditions) {
                    animations.push(anim);
                }
            }
        }
        None => {
            for action in extracted.actions {
                tracing::warn!(
                    "Skipping animation '{}': scene has no armature",
                    action.name
                );
                conditions.push(Condition::AnimationWithoutSkeleton {
                    action: action.name.clone(),
                });
            }
        }
    }

    let mesh = mesh::compile(
        mesh_source,
        skeleton.as_ref(),
        &extracted.tags,
        &mut conditions,
    )?;

    let mut scene = CompiledScene {
        model_name,
        mesh,
        skeleton,
        animations,
        conditions,
    };
    fix_tokens(&mut scene)?;
    check_animation_files(&scene.animations)?;
    Ok(scene)
}

/// Rewrite every written name and free-form value into a single token.
///
/// Runs after compilation: joint lookups during binding use the authored names.
fn fix_tokens(scene: &mut CompiledScene) -> Result<(), ExportError> {
    let mut fixer = TokenFixer::new(&mut scene.conditions);

    fixer.fix("model name", &mut scene.model_name, "model");
    fixer.fix("mesh name", &mut scene.mesh.name, "mesh");
    for material in &mut scene.mesh.materials {
        fixer.fix("material name", &mut material.name, "material");
        for map in [&mut material.color_map, &mut material.normal_map]
            .into_iter()
            .flatten()
        {
            fixer.fix("texture map", map, "texture");
        }
        for property in &mut material.properties {
            fixer.fix("property name", &mut property.name, "property");
            fixer.fix("property value", &mut property.value, "0");
        }
    }
    for tag in &mut scene.mesh.tags {
        fixer.fix("tag name", &mut tag.name, "tag");
    }
    for anim in &mut scene.animations {
        fixer.fix("animation name", &mut anim.name, "animation");
    }

    if let Some(skeleton) = &mut scene.skeleton {
        let mut written: HashMap<String, String> = HashMap::new();
        for joint in &mut skeleton.joints {
            let authored = joint.name.clone();
            fixer.fix("joint name", &mut joint.name, "joint");
            if let Some(first) = written.insert(joint.name.clone(), authored.clone()) {
                return Err(ExportError::JointNameCollision {
                    first,
                    second: authored,
                    written: joint.name.clone(),
                });
            }
        }
    }

    Ok(())
}

/// Every animation needs its own file.
fn check_animation_files(animations: &[Animation]) -> Result<(), ExportError> {
    let mut seen = HashSet::new();
    for anim in animations {
        let file = format!("{}.{}", file_stem(&anim.name), WS_ASSET_FORMAT.animation_ext);
        if !seen.insert(file.clone()) {
            return Err(ExportError::DuplicateAnimationFile { file });
        }
    }
    Ok(())
}

/// Write the mesh, every animation and the model manifest into `out_dir`.
///
/// Files are written one after another; a failure part way leaves earlier files behind.
pub fn write_scene(scene: &CompiledScene, out_dir: &Path) -> Result<Vec<PathBuf>> {
    check_animation_files(&scene.animations)?;
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", out_dir))?;
    let mut files = Vec::new();

    let path = asset_path(out_dir, &scene.mesh.name, WS_ASSET_FORMAT.mesh_ext);
    let mut writer = create(&path)?;
    write_ws_mesh(&mut writer, &scene.mesh, scene.skeleton.as_ref())
        .with_context(|| format!("Failed to write mesh: {:?}", path))?;
    tracing::info!(
        "Wrote mesh '{}': {} vertices, {} triangles -> {:?}",
        scene.mesh.name,
        scene.mesh.vertices.len(),
        scene.mesh.triangle_count(),
        path
    );
    files.push(path);

    if let Some(skeleton) = &scene.skeleton {
        for anim in &scene.animations {
            let path = asset_path(out_dir, &anim.name, WS_ASSET_FORMAT.animation_ext);
            let mut writer = create(&path)?;
            write_ws_animation(&mut writer, anim, skeleton)
                .with_context(|| format!("Failed to write animation: {:?}", path))?;
            tracing::info!(
                "Wrote animation '{}': {} keyframes, {:.2}s -> {:?}",
                anim.name,
                anim.keyframes.len(),
                anim.length,
                path
            );
            files.push(path);
        }
    }

    let path = asset_path(out_dir, &scene.model_name, WS_ASSET_FORMAT.model_ext);
    let mut writer = create(&path)?;
    write_ws_model(&mut writer, &scene.model_name, scene.animations.len())
        .with_context(|| format!("Failed to write model: {:?}", path))?;
    tracing::info!("Wrote model '{}' -> {:?}", scene.model_name, path);
    files.push(path);

    Ok(files)
}

/// Load, compile and write one scene document.
///
/// Without a model name in the options or the document, the input file stem is used.
pub fn export_scene(input: &Path, out_dir: &Path, options: &ExportOptions) -> Result<ExportReport> {
    let doc = load_scene(input)?;

    let mut options = options.clone();
    if options.model_name.is_none() && doc.name.is_none() {
        options.model_name = input
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_string);
    }

    let scene = compile_scene(&doc, &options)
        .with_context(|| format!("Failed to compile scene: {:?}", input))?;
    let files = write_scene(&scene, out_dir)?;

    let report = ExportReport {
        model: scene.model_name,
        meshes_emitted: 1,
        animations_emitted: scene.animations.len(),
        files,
        conditions: scene.conditions,
    };
    tracing::info!("{}", report);
    Ok(report)
}

/// `<dir>/<name>.<ext>`
fn asset_path(dir: &Path, name: &str, ext: &str) -> PathBuf {
    dir.join(format!("{}.{}", file_stem(name), ext))
}

/// `name` with path separators replaced.
fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c => c,
        })
        .collect()
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("Failed to create output: {:?}", path))?;
    Ok(BufWriter::new(file))
}
