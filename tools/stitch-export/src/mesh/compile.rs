//! Mesh compiler: triangulation, joint binding, transform and re-origin

use glam::Vec3;
use hashbrown::HashMap;

use super::material::collect_material;
use super::types::{Mesh, Tag, Triangle, Vertex, Weight};
use crate::bounds::Bounds;
use crate::coords::{to_engine_quat, to_engine_scale, to_engine_vec3};
use crate::error::{Condition, ExportError};
use crate::extract::{MeshSource, TagSource, VertexSource};
use crate::skeleton::Skeleton;

/// Label for influences whose group index had no group.
const MISSING_GROUP: &str = "<missing group>";

/// Compile an extracted mesh.
///
/// Vertices are emitted per face corner, material by material, so every triangle
/// indexes a flat array that no other face shares.
pub fn compile(
    source: &MeshSource,
    skeleton: Option<&Skeleton>,
    tags: &[TagSource],
    conditions: &mut Vec<Condition>,
) -> Result<Mesh, ExportError> {
    let bindings = bind_vertices(source, skeleton, conditions)?;

    let location = to_engine_vec3(source.transform.location);
    let rotation = to_engine_quat(source.transform.rotation);
    let scale = to_engine_scale(source.transform.scale);

    let mut vertices: Vec<Vertex> = Vec::new();
    let mut materials = Vec::with_capacity(source.materials.len());
    let mut short_faces = 0usize;

    for (slot, scene_material) in source.materials.iter().enumerate() {
        let mut material = collect_material(scene_material);

        for face in source.faces.iter().filter(|f| f.material == slot) {
            if face.corners.len() < 3 {
                short_faces += 1;
                continue;
            }

            let base = vertices.len();
            for (&corner, &uv) in face.corners.iter().zip(&face.uvs) {
                let authored = &source.vertices[corner];
                let (weights, weight_sum) = bindings[corner].clone();
                vertices.push(Vertex {
                    position: rotation * (to_engine_vec3(authored.position) * scale + location),
                    normal: rotation * to_engine_vec3(authored.normal),
                    tex_coord: uv,
                    weights,
                    weight_sum,
                });
            }

            // Fan from the first corner; a quad gives (a, b, c) and (a, c, d).
            for k in 1..face.corners.len() - 1 {
                material
                    .triangles
                    .push(Triangle([base, base + k, base + k + 1]));
            }
        }

        materials.push(material);
    }

    if short_faces > 0 {
        tracing::warn!(
            "Mesh '{}': skipped {} face(s) with fewer than 3 corners",
            source.name,
            short_faces
        );
    }
    let orphaned = source
        .faces
        .iter()
        .filter(|f| f.material >= source.materials.len())
        .count();
    if orphaned > 0 {
        tracing::warn!(
            "Mesh '{}': dropped {} face(s) whose material slot does not exist",
            source.name,
            orphaned
        );
    }

    let extent = Bounds::from_points(vertices.iter().map(|v| v.position));

    let mesh = Mesh {
        name: source.name.to_string(),
        vertices,
        materials,
        tags: tags
            .iter()
            .map(|t| Tag {
                name: t.name.to_string(),
                position: to_engine_vec3(t.location),
                rotation: to_engine_quat(t.rotation),
            })
            .collect(),
        location: extent.center(),
        rotation,
        scale,
        bounds: extent.half(),
    };

    tracing::debug!(
        "Compiled mesh '{}': {} vertices, {} triangles, {} materials, {} tags",
        mesh.name,
        mesh.vertices.len(),
        mesh.triangle_count(),
        mesh.materials.len(),
        mesh.tags.len()
    );

    Ok(mesh)
}

/// Resolve every authored vertex's influences to joint weights, once per source vertex.
fn bind_vertices(
    source: &MeshSource,
    skeleton: Option<&Skeleton>,
    conditions: &mut Vec<Condition>,
) -> Result<Vec<(Vec<Weight>, f32)>, ExportError> {
    let Some(skeleton) = skeleton else {
        if source.vertices.iter().any(|v| !v.influences.is_empty()) {
            return Err(ExportError::MissingSkeleton {
                mesh: source.name.to_string(),
            });
        }
        return Ok(vec![(Vec::new(), 0.0); source.vertices.len()]);
    };

    let mut unresolved: HashMap<&str, usize> = HashMap::new();
    let bindings: Vec<_> = source
        .vertices
        .iter()
        .map(|vertex| bind_vertex(vertex, skeleton, &mut unresolved))
        .collect();

    let mut unresolved: Vec<(&str, usize)> = unresolved.into_iter().collect();
    unresolved.sort_unstable();
    for (group, influences) in unresolved {
        tracing::warn!(
            "Mesh '{}': vertex group '{}' matches no joint, dropping {} influence(s)",
            source.name,
            group,
            influences
        );
        conditions.push(Condition::UnresolvedJointReference {
            mesh: source.name.to_string(),
            group: group.to_string(),
            influences,
        });
    }

    Ok(bindings)
}

fn bind_vertex<'a>(
    vertex: &VertexSource<'a>,
    skeleton: &Skeleton,
    unresolved: &mut HashMap<&'a str, usize>,
) -> (Vec<Weight>, f32) {
    let mut weights = Vec::with_capacity(vertex.influences.len());
    let mut weight_sum = 0.0;

    for influence in &vertex.influences {
        let joint = influence.group.and_then(|g| skeleton.joint_index(g));
        match joint {
            Some(joint_index) => {
                weights.push(Weight {
                    joint_index,
                    influence: influence.weight,
                });
                weight_sum += influence.weight;
            }
            None => {
                *unresolved
                    .entry(influence.group.unwrap_or(MISSING_GROUP))
                    .or_insert(0) += 1;
            }
        }
    }

    (weights, weight_sum)
}
