//! `.wsMesh` writer

use anyhow::Result;
use std::io::{self, Write};
use whipstitch_shared::{Float, TextWriter, WS_ASSET_FORMAT};

use super::{quat_xyzw, write_version};
use crate::mesh::{Material, Mesh, Tag, Vertex};
use crate::skeleton::Skeleton;

/// Write a complete mesh document.
///
/// The skeleton block is present only with a skeleton; the tags block only when the
/// mesh carries tags.
pub fn write_ws_mesh<W: Write>(w: &mut W, mesh: &Mesh, skeleton: Option<&Skeleton>) -> Result<()> {
    let mut out = TextWriter::new(w);

    out.banner(&WS_ASSET_FORMAT.mesh_banner)?;
    write_version(&mut out)?;
    out.field("meshName", &mesh.name)?;
    out.field("numVertices", mesh.vertices.len())?;
    out.field("numMaterials", mesh.materials.len())?;
    out.floats("defaultPos", &mesh.location.to_array())?;
    out.field("hasSkeleton", u32::from(skeleton.is_some()))?;
    out.blank()?;

    if let Some(skeleton) = skeleton {
        write_skeleton(&mut out, skeleton)?;
        out.blank()?;
    }

    out.open("vertices")?;
    out.floats("bounds", &mesh.bounds.to_array())?;
    for (i, vertex) in mesh.vertices.iter().enumerate() {
        write_vertex(&mut out, i, vertex)?;
    }
    out.close()?;
    out.blank()?;

    out.open("materials")?;
    for (i, material) in mesh.materials.iter().enumerate() {
        write_material(&mut out, i, material)?;
    }
    out.close()?;

    if !mesh.tags.is_empty() {
        out.blank()?;
        write_tags(&mut out, &mesh.tags)?;
    }

    out.finish()?;
    Ok(())
}

fn write_skeleton<W: Write>(out: &mut TextWriter<W>, skeleton: &Skeleton) -> io::Result<()> {
    out.open("skeleton")?;
    out.field("numJoints", skeleton.len())?;
    for (i, joint) in skeleton.joints.iter().enumerate() {
        out.open_indexed("joint", i)?;
        out.field("name", &joint.name)?;
        out.field("parent", joint.parent_index())?;
        out.floats("pos_start", &joint.start.to_array())?;
        out.floats("pos_end", &joint.end.to_array())?;
        out.floats("rotation", &quat_xyzw(joint.rotation))?;
        out.close()?;
    }
    out.close()
}

fn write_vertex<W: Write>(out: &mut TextWriter<W>, index: usize, vertex: &Vertex) -> io::Result<()> {
    out.open_indexed("vert", index)?;
    out.floats("pos", &vertex.position.to_array())?;
    out.floats("norm", &vertex.normal.to_array())?;
    out.floats("tex", &vertex.tex_coord.to_array())?;
    out.open("weights")?;
    out.field("numWeights", vertex.weights.len())?;
    for weight in &vertex.weights {
        out.line(format_args!(
            "joint {{ {} {} }}",
            weight.joint_index,
            Float(vertex.normalized(weight))
        ))?;
    }
    out.close()?;
    out.close()
}

fn write_material<W: Write>(
    out: &mut TextWriter<W>,
    index: usize,
    material: &Material,
) -> io::Result<()> {
    out.open_indexed("mat", index)?;
    out.field("name", &material.name)?;
    out.field("shine", material.shininess)?;
    out.floats("ambient", &material.ambient.to_array())?;
    out.floats("diffuse", &material.diffuse.to_array())?;
    out.floats("specular", &material.specular.to_array())?;
    out.floats("emissive", &material.emissive.to_array())?;

    out.open("maps")?;
    out.field("bitFlag", material.map_flags())?;
    if let Some(color_map) = &material.color_map {
        out.field("colorMap", color_map)?;
    }
    if let Some(normal_map) = &material.normal_map {
        out.field("normalMap", normal_map)?;
    }
    out.close()?;

    out.field("numTriangles", material.triangles.len())?;
    out.open("triangles")?;
    for (t, triangle) in material.triangles.iter().enumerate() {
        out.open_indexed("tri", t)?;
        out.open("verts")?;
        out.tuple("indices", &triangle.0)?;
        out.close()?;
        out.close()?;
    }
    out.close()?;

    out.open("properties")?;
    out.field("numProperties", material.properties.len())?;
    for (p, property) in material.properties.iter().enumerate() {
        out.open_indexed("property", p)?;
        out.field("name", &property.name)?;
        out.field("value", &property.value)?;
        out.close()?;
    }
    out.close()?;

    out.close()
}

fn write_tags<W: Write>(out: &mut TextWriter<W>, tags: &[Tag]) -> io::Result<()> {
    out.open("tags")?;
    out.field("numTags", tags.len())?;
    for (i, tag) in tags.iter().enumerate() {
        out.open_indexed("tag", i)?;
        out.field("name", &tag.name)?;
        out.floats("pos", &tag.position.to_array())?;
        out.floats("dir", &quat_xyzw(tag.rotation))?;
        out.close()?;
    }
    out.close()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{MaterialProperty, Triangle, Weight};
    use glam::{Quat, Vec2, Vec3, Vec4};

    fn sample_mesh() -> Mesh {
        Mesh {
            name: "Body".into(),
            vertices: vec![Vertex {
                position: Vec3::new(1.0, 2.0, 3.0),
                normal: Vec3::Y,
                tex_coord: Vec2::new(0.5, 0.25),
                weights: vec![
                    Weight {
                        joint_index: 0,
                        influence: 0.5,
                    },
                    Weight {
                        joint_index: 1,
                        influence: 1.5,
                    },
                ],
                weight_sum: 2.0,
            }],
            materials: vec![Material {
                name: "Skin".into(),
                shininess: 50,
                ambient: Vec4::ONE,
                diffuse: Vec4::new(1.0, 0.5, 0.25, 1.0),
                specular: Vec4::ONE,
                emissive: Vec4::ZERO,
                color_map: Some("skin.png".into()),
                normal_map: None,
                properties: vec![MaterialProperty {
                    name: "friction".into(),
                    value: "0.5".into(),
                }],
                triangles: vec![Triangle([0, 0, 0])],
            }],
            tags: Vec::new(),
            location: Vec3::new(1.0, 2.0, 3.0),
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            bounds: Vec3::ZERO,
        }
    }

    fn render(mesh: &Mesh, skeleton: Option<&Skeleton>) -> String {
        let mut buf = Vec::new();
        write_ws_mesh(&mut buf, mesh, skeleton).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_mesh_document_without_skeleton() {
        let expected = "\
//  Whipstitch Mesh File
//  This mesh is for use with the Whipstitch Game Engine
//  For more information, email dsnettleton@whipstitchgames.com

versionNumber 0.9
meshName Body
numVertices 1
numMaterials 1
defaultPos { 1.000000 2.000000 3.000000 }
hasSkeleton 0

vertices {
  bounds { 0.000000 0.000000 0.000000 }
  vert 0 {
    pos { 1.000000 2.000000 3.000000 }
    norm { 0.000000 1.000000 0.000000 }
    tex { 0.500000 0.250000 }
    weights {
      numWeights 2
      joint { 0 0.250000 }
      joint { 1 0.750000 }
    }
  }
}

materials {
  mat 0 {
    name Skin
    shine 50
    ambient { 1.000000 1.000000 1.000000 1.000000 }
    diffuse { 1.000000 0.500000 0.250000 1.000000 }
    specular { 1.000000 1.000000 1.000000 1.000000 }
    emissive { 0.000000 0.000000 0.000000 0.000000 }
    maps {
      bitFlag 1
      colorMap skin.png
    }
    numTriangles 1
    triangles {
      tri 0 {
        verts {
          indices { 0 0 0 }
        }
      }
    }
    properties {
      numProperties 1
      property 0 {
        name friction
        value 0.5
      }
    }
  }
}
";
        assert_eq!(render(&sample_mesh(), None), expected);
    }

    #[test]
    fn test_skeleton_block_and_tags() {
        let skeleton = crate::animation::test_support::two_joint_skeleton();
        let mut mesh = sample_mesh();
        mesh.tags.push(Tag {
            name: "muzzle".into(),
            position: Vec3::new(0.0, 0.0, -2.0),
            rotation: Quat::IDENTITY,
        });
        let text = render(&mesh, Some(&skeleton));

        assert!(text.contains("hasSkeleton 1\n\nskeleton {\n  numJoints 2\n  joint 0 {\n    name root\n    parent -1\n"));
        assert!(text.contains("  joint 1 {\n    name tip\n    parent 0\n    pos_start { 0.000000 1.000000 0.000000 }\n    pos_end { 0.000000 2.000000 0.000000 }\n"));
        assert!(text.ends_with(
            "}\n\ntags {\n  numTags 1\n  tag 0 {\n    name muzzle\n    pos { 0.000000 0.000000 -2.000000 }\n    dir { 0.000000 0.000000 0.000000 1.000000 }\n  }\n}\n"
        ));
    }
}
