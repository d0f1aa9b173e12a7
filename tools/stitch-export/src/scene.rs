//! Scene document: the authoring tool's object model as dumped to JSON.
//!
//! Values are in the tool's own convention (right-handed, Z-up, Y-forward) and
//! quaternions are ordered `[w, x, y, z]`. Matrices are row-major, as the tool
//! reports them.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Frame rate assumed when neither the document nor the caller provides one.
pub const DEFAULT_FRAME_RATE: f32 = 24.0;

/// Root of a scene dump
#[derive(Debug, Clone, Deserialize)]
pub struct SceneDocument {
    #[serde(default)]
    pub name: Option<String>,
    /// Scene frame rate (frames per second)
    #[serde(default)]
    pub fps: Option<f32>,
    #[serde(default)]
    pub objects: Vec<SceneObject>,
    #[serde(default)]
    pub actions: Vec<SceneAction>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SceneObject {
    pub name: String,
    #[serde(default)]
    pub location: [f32; 3],
    #[serde(default = "identity_wxyz")]
    pub rotation_quaternion: [f32; 4],
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
    /// World matrix, when the object is parented or constrained
    #[serde(default)]
    pub matrix_world: Option<[[f32; 4]; 4]>,
    #[serde(flatten)]
    pub data: ObjectData,
}

/// Object payload, discriminated by the tool's object type
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectData {
    Armature {
        #[serde(default)]
        bones: Vec<SceneBone>,
    },
    Mesh(SceneMesh),
    Empty,
    /// Cameras, lights and anything else the exporter has no use for
    #[serde(other)]
    Other,
}

impl ObjectData {
    pub fn kind(&self) -> &'static str {
        match self {
            ObjectData::Armature { .. } => "armature",
            ObjectData::Mesh(_) => "mesh",
            ObjectData::Empty => "empty",
            ObjectData::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SceneBone {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    pub head_local: [f32; 3],
    pub tail_local: [f32; 3],
    /// Bind matrix in armature space
    #[serde(default = "identity_rows")]
    pub matrix_local: [[f32; 4]; 4],
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SceneMesh {
    #[serde(default)]
    pub vertices: Vec<SceneVertex>,
    #[serde(default)]
    pub vertex_groups: Vec<String>,
    #[serde(default)]
    pub faces: Vec<SceneFace>,
    #[serde(default)]
    pub materials: Vec<SceneMaterial>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SceneVertex {
    pub co: [f32; 3],
    #[serde(default = "unit_x")]
    pub normal: [f32; 3],
    #[serde(default)]
    pub groups: Vec<SceneGroupWeight>,
}

/// One vertex-group influence
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SceneGroupWeight {
    /// Index into `SceneMesh::vertex_groups`
    pub group: usize,
    pub weight: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SceneFace {
    pub vertices: Vec<usize>,
    #[serde(default)]
    pub material_index: usize,
    /// One UV per corner, first UV layer
    #[serde(default)]
    pub uv: Vec<[f32; 2]>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SceneMaterial {
    pub name: String,
    #[serde(default = "one")]
    pub ambient: f32,
    #[serde(default = "white")]
    pub diffuse_color: [f32; 3],
    #[serde(default = "one")]
    pub alpha: f32,
    #[serde(default = "white")]
    pub specular_color: [f32; 3],
    #[serde(default = "one")]
    pub specular_alpha: f32,
    #[serde(default = "default_hardness")]
    pub specular_hardness: u32,
    #[serde(default)]
    pub emit: f32,
    #[serde(default)]
    pub texture_slots: Vec<SceneTextureSlot>,
    #[serde(default)]
    pub properties: Vec<SceneProperty>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SceneTextureSlot {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub use_map_color_diffuse: bool,
    #[serde(default)]
    pub use_map_normal: bool,
}

/// Custom key/value attached to a material
#[derive(Debug, Clone, Deserialize)]
pub struct SceneProperty {
    pub name: String,
    pub value: serde_json::Value,
}

/// Keyed animation: one channel group per bone
#[derive(Debug, Clone, Deserialize)]
pub struct SceneAction {
    pub name: String,
    #[serde(default)]
    pub groups: Vec<SceneChannelGroup>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SceneChannelGroup {
    /// Bone name
    pub name: String,
    /// Location X/Y/Z then rotation W/X/Y/Z, in that order
    #[serde(default)]
    pub channels: Vec<SceneCurve>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SceneCurve {
    #[serde(default)]
    pub data_path: Option<String>,
    /// `[time, value]` pairs, time in frames
    #[serde(default)]
    pub keyframes: Vec<[f32; 2]>,
}

fn identity_wxyz() -> [f32; 4] {
    [1.0, 0.0, 0.0, 0.0]
}

fn unit_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn unit_x() -> [f32; 3] {
    [1.0, 0.0, 0.0]
}

fn white() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn one() -> f32 {
    1.0
}

fn default_hardness() -> u32 {
    50
}

fn identity_rows() -> [[f32; 4]; 4] {
    [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Load and parse a scene document
pub fn load_scene(path: &Path) -> Result<SceneDocument> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scene: {:?}", path))?;
    parse_scene(&content).with_context(|| format!("Failed to parse scene: {:?}", path))
}

pub fn parse_scene(content: &str) -> Result<SceneDocument> {
    Ok(serde_json::from_str(content)?)
}

/// List objects and actions in a scene document
pub fn list_contents(path: &Path) -> Result<()> {
    let doc = load_scene(path)?;

    if doc.objects.is_empty() && doc.actions.is_empty() {
        tracing::info!("Scene {:?} is empty", path);
        return Ok(());
    }

    tracing::info!("Objects in {:?}:", path);
    for (i, object) in doc.objects.iter().enumerate() {
        let detail = match &object.data {
            ObjectData::Armature { bones } => format!("{} bones", bones.len()),
            ObjectData::Mesh(mesh) => format!(
                "{} vertices, {} faces, {} materials",
                mesh.vertices.len(),
                mesh.faces.len(),
                mesh.materials.len()
            ),
            ObjectData::Empty => "marker".to_string(),
            ObjectData::Other => "ignored".to_string(),
        };
        tracing::info!(
            "  [{}] {} '{}': {}",
            i,
            object.data.kind(),
            object.name,
            detail
        );
    }

    tracing::info!("Actions in {:?}:", path);
    for (i, action) in doc.actions.iter().enumerate() {
        let times = crate::animation::keyframe_times(action);
        tracing::info!(
            "  [{}] '{}': {} groups, {} keyframes",
            i,
            action.name,
            action.groups.len(),
            times.len()
        );
    }

    Ok(())
}
