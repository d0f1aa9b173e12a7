//! Material collection: colors, texture maps, custom properties

use glam::{Vec3, Vec4};
use serde_json::Value;

use super::types::{Material, MaterialProperty};
use crate::scene::SceneMaterial;

/// Build a material (without triangles) from the tool's material settings.
pub(crate) fn collect_material(source: &SceneMaterial) -> Material {
    let diffuse = Vec3::from_array(source.diffuse_color);

    let mut color_map = None;
    let mut normal_map = None;
    for slot in &source.texture_slots {
        let Some(image) = slot.image.as_deref().and_then(map_file_name) else {
            continue;
        };
        if slot.use_map_color_diffuse && color_map.is_none() {
            color_map = Some(image.clone());
        }
        if slot.use_map_normal && normal_map.is_none() {
            normal_map = Some(image);
        }
    }

    Material {
        name: source.name.clone(),
        shininess: source.specular_hardness,
        ambient: (diffuse * source.ambient).extend(source.ambient * source.alpha),
        diffuse: diffuse.extend(source.alpha),
        specular: Vec3::from_array(source.specular_color).extend(source.specular_alpha),
        emissive: (diffuse * source.emit).extend(source.emit * source.alpha),
        color_map,
        normal_map,
        properties: collect_properties(source),
        triangles: Vec::new(),
    }
}

/// Strip the tool's `//` relative prefix and any directories.
fn map_file_name(path: &str) -> Option<String> {
    let path = path.strip_prefix("//").unwrap_or(path);
    path.rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

fn collect_properties(source: &SceneMaterial) -> Vec<MaterialProperty> {
    source
        .properties
        .iter()
        // Underscore keys are the tool's own bookkeeping (`_RNA_UI` etc.)
        .filter(|p| !p.name.starts_with('_'))
        .filter_map(|p| match property_text(&p.value) {
            Some(value) => Some(MaterialProperty {
                name: p.name.clone(),
                value,
            }),
            None => {
                tracing::debug!(
                    "Material '{}': property '{}' is not a scalar, skipping",
                    source.name,
                    p.name
                );
                None
            }
        })
        .collect()
}

fn property_text(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{SceneProperty, SceneTextureSlot};
    use serde_json::json;

    fn material() -> SceneMaterial {
        serde_json::from_value(json!({
            "name": "Skin",
            "ambient": 0.5,
            "diffuse_color": [0.8, 0.4, 0.2],
            "alpha": 0.9,
            "specular_color": [1.0, 1.0, 1.0],
            "specular_alpha": 0.75,
            "specular_hardness": 80,
            "emit": 0.25
        }))
        .unwrap()
    }

    #[test]
    fn test_colors_scaled_by_factors() {
        let m = collect_material(&material());
        assert!(m.ambient.abs_diff_eq(Vec4::new(0.4, 0.2, 0.1, 0.45), 1e-6));
        assert!(m.diffuse.abs_diff_eq(Vec4::new(0.8, 0.4, 0.2, 0.9), 1e-6));
        assert!(m.specular.abs_diff_eq(Vec4::new(1.0, 1.0, 1.0, 0.75), 1e-6));
        assert!(m.emissive.abs_diff_eq(Vec4::new(0.2, 0.1, 0.05, 0.225), 1e-6));
        assert_eq!(m.shininess, 80);
        assert!(m.triangles.is_empty());
    }

    #[test]
    fn test_texture_maps_reduced_to_file_names() {
        let mut source = material();
        source.texture_slots = vec![
            SceneTextureSlot {
                image: Some("//textures/skin.png".into()),
                use_map_color_diffuse: true,
                use_map_normal: false,
            },
            SceneTextureSlot {
                image: Some("C:\\art\\skin_n.png".into()),
                use_map_color_diffuse: false,
                use_map_normal: true,
            },
        ];
        let m = collect_material(&source);
        assert_eq!(m.color_map.as_deref(), Some("skin.png"));
        assert_eq!(m.normal_map.as_deref(), Some("skin_n.png"));
        assert_eq!(m.map_flags(), 0x3);
    }

    #[test]
    fn test_slot_without_image_ignored() {
        let mut source = material();
        source.texture_slots = vec![SceneTextureSlot {
            image: None,
            use_map_color_diffuse: true,
            use_map_normal: true,
        }];
        assert_eq!(collect_material(&source).map_flags(), 0);
    }

    #[test]
    fn test_properties_carried_as_text() {
        let mut source = material();
        source.properties = vec![
            SceneProperty {
                name: "_RNA_UI".into(),
                value: json!({ "friction": { "min": 0 } }),
            },
            SceneProperty {
                name: "friction".into(),
                value: json!(0.5),
            },
            SceneProperty {
                name: "layer".into(),
                value: json!(3),
            },
            SceneProperty {
                name: "glows".into(),
                value: json!(true),
            },
            SceneProperty {
                name: "surface".into(),
                value: json!("metal"),
            },
            SceneProperty {
                name: "tint".into(),
                value: json!([1, 0, 0]),
            },
        ];
        let props: Vec<(String, String)> = collect_material(&source)
            .properties
            .into_iter()
            .map(|p| (p.name, p.value))
            .collect();
        assert_eq!(
            props,
            vec![
                ("friction".to_string(), "0.5".to_string()),
                ("layer".to_string(), "3".to_string()),
                ("glows".to_string(), "1".to_string()),
                ("surface".to_string(), "metal".to_string()),
            ]
        );
    }
}
