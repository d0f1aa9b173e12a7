//! Scene extraction: pick the rig, mesh and markers out of a scene document and
//! decode the tool's encodings (row-major matrices, `[w,x,y,z]` arrays, group
//! indices) into plain values.
//!
//! Everything here is still in authoring space; the builders convert.

use glam::{Mat4, Quat, Vec2, Vec3};

use crate::coords::quat_from_wxyz;
use crate::error::ExportError;
use crate::scene::{
    ObjectData, SceneAction, SceneDocument, SceneMaterial, SceneMesh, SceneObject,
};

/// Which objects to export when the scene holds several of a kind
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    pub mesh: Option<String>,
    pub rig: Option<String>,
}

/// Object-level transform in authoring space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectTransform {
    pub location: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for ObjectTransform {
    fn default() -> Self {
        Self {
            location: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl ObjectTransform {
    fn from_object(object: &SceneObject) -> Self {
        Self {
            location: Vec3::from_array(object.location),
            rotation: quat_from_wxyz(object.rotation_quaternion),
            scale: Vec3::from_array(object.scale),
        }
    }

    /// World transform: `matrix_world` when the tool supplied one, else the object's TRS.
    fn world_of(object: &SceneObject) -> Self {
        match object.matrix_world {
            Some(rows) => {
                let (scale, rotation, location) =
                    mat4_from_rows(rows).to_scale_rotation_translation();
                Self {
                    location,
                    rotation,
                    scale,
                }
            }
            None => Self::from_object(object),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BoneSource<'a> {
    pub name: &'a str,
    pub parent: Option<&'a str>,
    pub head: Vec3,
    pub tail: Vec3,
    pub rotation: Quat,
}

#[derive(Debug, Clone)]
pub struct RigSource<'a> {
    pub name: &'a str,
    pub transform: ObjectTransform,
    pub bones: Vec<BoneSource<'a>>,
}

/// A vertex-group influence with its group resolved to a name
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InfluenceSource<'a> {
    /// `None` when the group index points past the mesh's group list
    pub group: Option<&'a str>,
    pub weight: f32,
}

#[derive(Debug, Clone)]
pub struct VertexSource<'a> {
    pub position: Vec3,
    pub normal: Vec3,
    pub influences: Vec<InfluenceSource<'a>>,
}

#[derive(Debug, Clone)]
pub struct FaceSource {
    pub corners: Vec<usize>,
    pub material: usize,
    /// One per corner; missing layers read as zero
    pub uvs: Vec<Vec2>,
}

#[derive(Debug, Clone)]
pub struct MeshSource<'a> {
    pub name: &'a str,
    pub transform: ObjectTransform,
    pub vertices: Vec<VertexSource<'a>>,
    pub faces: Vec<FaceSource>,
    pub materials: &'a [SceneMaterial],
}

/// Point-and-orientation marker
#[derive(Debug, Clone)]
pub struct TagSource<'a> {
    pub name: &'a str,
    pub location: Vec3,
    pub rotation: Quat,
}

/// Tool-independent view of one scene
#[derive(Debug, Clone)]
pub struct ExtractedScene<'a> {
    pub name: Option<&'a str>,
    pub fps: Option<f32>,
    pub rig: Option<RigSource<'a>>,
    pub mesh: Option<MeshSource<'a>>,
    pub tags: Vec<TagSource<'a>>,
    pub actions: &'a [SceneAction],
}

/// Extract the exportable objects of a scene document
pub fn extract<'a>(
    doc: &'a SceneDocument,
    options: &ExtractOptions,
) -> Result<ExtractedScene<'a>, ExportError> {
    let rig_object = select_object(doc, "armature", options.rig.as_deref(), |d| {
        matches!(d, ObjectData::Armature { .. })
    })?;
    let mesh_object = select_object(doc, "mesh", options.mesh.as_deref(), |d| {
        matches!(d, ObjectData::Mesh(_))
    })?;

    let rig = rig_object.map(extract_rig);
    let mesh = match mesh_object {
        Some(object) => Some(extract_mesh(object)?),
        None => None,
    };

    let tags = doc
        .objects
        .iter()
        .filter(|o| matches!(o.data, ObjectData::Empty))
        .map(|o| TagSource {
            name: &o.name,
            location: Vec3::from_array(o.location),
            rotation: quat_from_wxyz(o.rotation_quaternion),
        })
        .collect();

    Ok(ExtractedScene {
        name: doc.name.as_deref(),
        fps: doc.fps,
        rig,
        mesh,
        tags,
        actions: &doc.actions,
    })
}

/// Pick an object of one kind: by name if requested, otherwise the first one.
fn select_object<'a>(
    doc: &'a SceneDocument,
    kind: &'static str,
    wanted: Option<&str>,
    is_kind: impl Fn(&ObjectData) -> bool,
) -> Result<Option<&'a SceneObject>, ExportError> {
    let mut candidates = doc.objects.iter().filter(|o| is_kind(&o.data));

    if let Some(name) = wanted {
        return candidates
            .find(|o| o.name == name)
            .map(Some)
            .ok_or_else(|| ExportError::ObjectNotFound {
                kind,
                name: name.to_string(),
            });
    }

    let first = candidates.next();
    let ignored: Vec<&str> = candidates.map(|o| o.name.as_str()).collect();
    if let (Some(first), false) = (first, ignored.is_empty()) {
        tracing::warn!(
            "Scene has several {} objects; exporting '{}', ignoring {:?}",
            kind,
            first.name,
            ignored
        );
    }
    Ok(first)
}

fn extract_rig(object: &SceneObject) -> RigSource<'_> {
    let ObjectData::Armature { bones } = &object.data else {
        unreachable!("select_object only returns armatures here");
    };

    let bones = bones
        .iter()
        .map(|bone| {
            let (_, rotation, _) = mat4_from_rows(bone.matrix_local).to_scale_rotation_translation();
            BoneSource {
                name: &bone.name,
                parent: bone.parent.as_deref(),
                head: Vec3::from_array(bone.head_local),
                tail: Vec3::from_array(bone.tail_local),
                rotation,
            }
        })
        .collect();

    RigSource {
        name: &object.name,
        transform: ObjectTransform::from_object(object),
        bones,
    }
}

fn extract_mesh(object: &SceneObject) -> Result<MeshSource<'_>, ExportError> {
    let ObjectData::Mesh(mesh) = &object.data else {
        unreachable!("select_object only returns meshes here");
    };

    Ok(MeshSource {
        name: &object.name,
        transform: ObjectTransform::world_of(object),
        vertices: extract_vertices(mesh),
        faces: extract_faces(&object.name, mesh)?,
        materials: &mesh.materials,
    })
}

fn extract_vertices(mesh: &SceneMesh) -> Vec<VertexSource<'_>> {
    mesh.vertices
        .iter()
        .map(|v| VertexSource {
            position: Vec3::from_array(v.co),
            normal: Vec3::from_array(v.normal),
            influences: v
                .groups
                .iter()
                .map(|g| InfluenceSource {
                    group: mesh.vertex_groups.get(g.group).map(String::as_str),
                    weight: g.weight,
                })
                .collect(),
        })
        .collect()
}

fn extract_faces(mesh_name: &str, mesh: &SceneMesh) -> Result<Vec<FaceSource>, ExportError> {
    let count = mesh.vertices.len();
    mesh.faces
        .iter()
        .enumerate()
        .map(|(face_index, face)| {
            if let Some(&index) = face.vertices.iter().find(|&&i| i >= count) {
                return Err(ExportError::VertexOutOfRange {
                    mesh: mesh_name.to_string(),
                    face: face_index,
                    index,
                    count,
                });
            }
            let uvs = (0..face.vertices.len())
                .map(|corner| {
                    face.uv
                        .get(corner)
                        .map(|uv| Vec2::from_array(*uv))
                        .unwrap_or(Vec2::ZERO)
                })
                .collect();
            Ok(FaceSource {
                corners: face.vertices.clone(),
                material: face.material_index,
                uvs,
            })
        })
        .collect()
}

/// The tool reports matrices row by row; glam stores columns.
fn mat4_from_rows(rows: [[f32; 4]; 4]) -> Mat4 {
    Mat4::from_cols_array_2d(&rows).transpose()
}
