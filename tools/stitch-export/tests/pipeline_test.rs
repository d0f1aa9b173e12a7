//! Pipeline tests through the library API.
//!
//! Compiles the generated fixtures in memory and checks the intermediate model, then
//! writes them out and checks the files.


use glam::{Quat, Vec3};
use tempfile::tempdir;

use stitch_export::scene::SceneDocument;
use stitch_export::{compile_scene, export_scene, write_scene, Condition, ExportError, ExportOptions};

fn skinned_doc() -> SceneDocument {
    serde_json::from_value(generate_test_scenes::skinned_scene()).expect("Fixture should parse")
}

#[test]
fn test_skinned_scene_compiles() {
    let scene = compile_scene(&skinned_doc(), &ExportOptions::default()).unwrap();

    assert_eq!(scene.model_name, "hero");
    let skeleton = scene.skeleton.as_ref().expect("Rig should be exported");
    assert_eq!(skeleton.len(), generate_test_scenes::JOINT_COUNT);
    assert_eq!(skeleton.joints[2].parent, Some(1));
    assert!(skeleton.joints[2].end.abs_diff_eq(Vec3::new(0.0, 3.0, 0.0), 1e-6));
    // Each joint's segment half-extents; the whole rig spans three segments.
    assert!(skeleton.joints[1].bounds.abs_diff_eq(Vec3::new(0.0, 0.5, 0.0), 1e-6));
    assert!(skeleton
        .bind_bounds
        .half()
        .abs_diff_eq(Vec3::new(0.0, 1.5, 0.0), 1e-6));

    assert_eq!(scene.mesh.vertices.len(), generate_test_scenes::VERTEX_COUNT);
    assert_eq!(scene.mesh.triangle_count(), generate_test_scenes::TRIANGLE_COUNT);
    assert_eq!(scene.mesh.tags.len(), 1);
    assert!(scene.mesh.tags[0]
        .position
        .abs_diff_eq(Vec3::new(0.0, 2.0, 1.0), 1e-6));

    let names: Vec<_> = scene.animations.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, ["Wave"]);
}

#[test]
fn test_conditions_are_reported() {
    let scene = compile_scene(&skinned_doc(), &ExportOptions::default()).unwrap();
    let conditions = &scene.conditions;

    assert!(conditions.contains(&Condition::DegenerateAnimation {
        action: "Pose".into(),
        distinct_times: 1,
    }));
    assert!(conditions.contains(&Condition::UnresolvedChannelGroup {
        action: "Wave".into(),
        group: "tail".into(),
    }));
    // root is unkeyed at frame 10, head at every frame
    assert!(conditions.contains(&Condition::UndefinedJointModification {
        animation: "Wave".into(),
        entries: 4,
    }));
    assert!(conditions.contains(&Condition::UnresolvedJointReference {
        mesh: "Body".into(),
        group: "cape".into(),
        influences: 1,
    }));
}

#[test]
fn test_quads_fan_into_triangles() {
    let scene = compile_scene(&skinned_doc(), &ExportOptions::default()).unwrap();
    let triangles: Vec<[usize; 3]> = scene.mesh.materials[0]
        .triangles
        .iter()
        .map(|t| t.0)
        .collect();
    assert_eq!(triangles, [[0, 1, 2], [0, 2, 3], [4, 5, 6], [4, 6, 7]]);
}

#[test]
fn test_weights_normalize_and_mesh_recenters() {
    let scene = compile_scene(&skinned_doc(), &ExportOptions::default()).unwrap();
    let mesh = &scene.mesh;

    for vertex in &mesh.vertices {
        let total: f32 = vertex.weights.iter().map(|w| vertex.normalized(w)).sum();
        assert!((total - 1.0).abs() < 1e-6, "weights sum to {}", total);
    }
    // The unresolved `cape` influence leaves a single spine weight.
    let top_left = &mesh.vertices[7];
    assert_eq!(top_left.weights.len(), 1);
    assert_eq!(top_left.weights[0].joint_index, 1);
    assert_eq!(top_left.weight_sum, 1.0);

    assert!(mesh.bounds.abs_diff_eq(Vec3::new(0.5, 1.0, 0.0), 1e-6));
    assert!(mesh.location.abs_diff_eq(Vec3::new(0.0, 1.0, 0.0), 1e-6));

    let material = &mesh.materials[0];
    assert_eq!(material.shininess, 32);
    assert_eq!(material.color_map.as_deref(), Some("skin.png"));
    assert_eq!(material.properties.len(), 1);
    assert_eq!(material.properties[0].value, "0.5");
}

#[test]
fn test_wave_rebases_through_the_chain() {
    let scene = compile_scene(&skinned_doc(), &ExportOptions::default()).unwrap();
    let wave = &scene.animations[0];

    let times: Vec<f32> = wave.keyframes.iter().map(|k| k.frame_index).collect();
    assert_eq!(times, [0.0, 10.0, 20.0]);
    assert_eq!(wave.frames_per_second, 30.0);
    assert!((wave.length - 20.0 / 30.0).abs() < 1e-6);

    // Frame 0 is the bind pose.
    for m in &wave.keyframes[0].mods {
        assert!(m.rotation.abs_diff_eq(Quat::IDENTITY, 1e-6));
    }

    // Frame 10 bends the spine 45 degrees about engine X; the head inherits it.
    let bent = Quat::from_rotation_x(std::f32::consts::FRAC_PI_4);
    let mid = &wave.keyframes[1];
    assert!(mid.mods[1].rotation.abs_diff_eq(bent, 1e-5));
    assert!(mid.mods[2].rotation.abs_diff_eq(bent, 1e-5));
    assert!(mid.mods[1].authored);
    assert!(!mid.mods[0].authored);
    assert!(!mid.mods[2].authored);
    assert_eq!(mid.authored().count(), 1);
}

#[test]
fn test_wave_bounds_are_the_mean_of_keyframes() {
    let scene = compile_scene(&skinned_doc(), &ExportOptions::default()).unwrap();
    let wave = &scene.animations[0];

    let rest = Vec3::new(0.0, 1.5, 0.0);
    let s = std::f32::consts::FRAC_1_SQRT_2;
    // Bent chain reaches (0, 1 + 2s, 2s)
    let bent = Vec3::new(0.0, (1.0 + 2.0 * s) / 2.0, s);

    assert!(wave.keyframes[0].bounds.abs_diff_eq(rest, 1e-5));
    assert!(wave.keyframes[1].bounds.abs_diff_eq(bent, 1e-5));
    assert!(wave.bounds.abs_diff_eq((rest * 2.0 + bent) / 3.0, 1e-5));
}

#[test]
fn test_missing_skeleton_fails_without_writing() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("orphan.json");
    let out = dir.path().join("out");
    generate_test_scenes::write_scene(&input, &generate_test_scenes::orphaned_skin_scene())
        .expect("Failed to write fixture");

    let err = export_scene(&input, &out, &ExportOptions::default()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ExportError>(),
        Some(ExportError::MissingSkeleton { .. })
    ));
    assert!(!out.exists(), "Nothing should be written");
}

#[test]
fn test_write_scene_file_order() {
    let dir = tempdir().expect("Failed to create temp dir");
    let scene = compile_scene(&skinned_doc(), &ExportOptions::default()).unwrap();

    let files = write_scene(&scene, dir.path()).unwrap();
    let names: Vec<_> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["Body.wsMesh", "Wave.wsAnim", "hero.wsModel"]);
    assert!(files.iter().all(|p| p.exists()));
}

#[test]
fn test_model_name_falls_back_to_file_stem() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("crate.json");
    generate_test_scenes::write_scene(&input, &generate_test_scenes::static_scene())
        .expect("Failed to write fixture");

    let report = export_scene(&input, dir.path(), &ExportOptions::default()).unwrap();
    assert_eq!(report.model, "crate");
    assert_eq!(report.meshes_emitted, 1);
    assert_eq!(report.animations_emitted, 0);
    assert!(report.conditions.is_empty());
    assert!(dir.path().join("Crate.wsMesh").exists());
    assert!(dir.path().join("crate.wsModel").exists());
}

#[test]
fn test_zero_scene_fps_is_rejected() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("hero.json");
    let out = dir.path().join("out");
    let mut scene = generate_test_scenes::skinned_scene();
    scene["fps"] = serde_json::json!(0);
    generate_test_scenes::write_scene(&input, &scene).expect("Failed to write fixture");

    let err = export_scene(&input, &out, &ExportOptions::default()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ExportError>(),
        Some(ExportError::InvalidFrameRate { .. })
    ));
    assert!(!out.exists(), "Nothing should be written");
}
