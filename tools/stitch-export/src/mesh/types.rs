//! Compiled mesh data, engine space

use glam::{Quat, Vec2, Vec3, Vec4};

/// One joint influence on a vertex
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weight {
    pub joint_index: usize,
    /// Raw authored influence, not normalized
    pub influence: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tex_coord: Vec2,
    pub weights: Vec<Weight>,
    /// Sum of the raw influences in `weights`
    pub weight_sum: f32,
}

impl Vertex {
    /// Influence as written to the file: divided by the weight sum unless that is zero.
    pub fn normalized(&self, weight: &Weight) -> f32 {
        if self.weight_sum != 0.0 {
            weight.influence / self.weight_sum
        } else {
            weight.influence
        }
    }
}

/// Three indices into the mesh-wide vertex array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle(pub [usize; 3]);

/// Free-form material key/value, value already rendered as text
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialProperty {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub shininess: u32,
    pub ambient: Vec4,
    pub diffuse: Vec4,
    pub specular: Vec4,
    pub emissive: Vec4,
    /// File name only
    pub color_map: Option<String>,
    pub normal_map: Option<String>,
    pub properties: Vec<MaterialProperty>,
    pub triangles: Vec<Triangle>,
}

impl Material {
    /// `WS_TEXTURE_MAP_*` bits for the maps present.
    pub fn map_flags(&self) -> u32 {
        let mut flags = 0;
        if self.color_map.is_some() {
            flags |= whipstitch_shared::WS_TEXTURE_MAP_COLOR;
        }
        if self.normal_map.is_some() {
            flags |= whipstitch_shared::WS_TEXTURE_MAP_NORMAL;
        }
        flags
    }
}

/// Attachment marker carried with the mesh
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub name: String,
    pub position: Vec3,
    pub rotation: Quat,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub materials: Vec<Material>,
    pub tags: Vec<Tag>,
    /// Bounding-box center of the transformed vertices
    pub location: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    /// Half-extents of the transformed vertices
    pub bounds: Vec3,
}

impl Mesh {
    pub fn triangle_count(&self) -> usize {
        self.materials.iter().map(|m| m.triangles.len()).sum()
    }
}
