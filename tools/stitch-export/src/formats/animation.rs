//! `.wsAnim` writer

use anyhow::Result;
use std::io::{self, Write};
use whipstitch_shared::{TextWriter, WS_ANIMATION_TYPE_SKELETAL, WS_ASSET_FORMAT};

use super::{quat_xyzw, write_version};
use crate::animation::{Animation, Keyframe};
use crate::skeleton::Skeleton;

const MATRIX_NOTE: &str =
    "//  Animation files store a collection of joint rotations; matrices are computed on loading";

/// Write a complete animation document.
///
/// The bind pose is repeated in every animation so each file loads on its own.
/// Keyframes list authored joints only, each labelled with its joint index.
pub fn write_ws_animation<W: Write>(
    w: &mut W,
    animation: &Animation,
    skeleton: &Skeleton,
) -> Result<()> {
    let mut out = TextWriter::new(w);

    out.banner(&WS_ASSET_FORMAT.animation_banner)?;
    write_version(&mut out)?;
    out.field("animationType", WS_ANIMATION_TYPE_SKELETAL)?;
    out.field("animationName", &animation.name)?;
    out.float("framesPerSecond", animation.frames_per_second)?;
    out.blank()?;
    out.field("numJoints", skeleton.len())?;
    out.field("numKeyFrames", animation.keyframes.len())?;
    out.floats("bounds", &animation.bounds.to_array())?;
    out.blank()?;
    out.line(MATRIX_NOTE)?;
    out.blank()?;

    write_joints(&mut out, skeleton)?;
    out.blank()?;
    write_keyframes(&mut out, &animation.keyframes)?;

    out.finish()?;
    Ok(())
}

fn write_joints<W: Write>(out: &mut TextWriter<W>, skeleton: &Skeleton) -> io::Result<()> {
    out.open("joints")?;
    for (i, joint) in skeleton.joints.iter().enumerate() {
        out.open_indexed("joint", i)?;
        out.field("jointName", &joint.name)?;
        out.field("parent", joint.parent_index())?;
        out.floats("pos_start", &joint.start.to_array())?;
        out.floats("rotation", &quat_xyzw(joint.rotation))?;
        out.close()?;
    }
    out.close()
}

fn write_keyframes<W: Write>(out: &mut TextWriter<W>, keyframes: &[Keyframe]) -> io::Result<()> {
    out.open("keyframes")?;
    for (k, key) in keyframes.iter().enumerate() {
        out.open_indexed("keyframe", k)?;
        out.float("frameNumber", key.frame_index)?;
        out.field("jointsModified", key.authored().count())?;
        for m in key.authored() {
            out.open_indexed("joint", m.joint_index)?;
            out.floats("jointTranslation", &m.location.to_array())?;
            out.floats("jointRotation", &quat_xyzw(m.rotation))?;
            out.close()?;
        }
        out.close()?;
    }
    out.close()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::test_support::two_joint_skeleton;
    use crate::animation::JointMod;
    use glam::{Quat, Vec3};

    const GOLDEN: &str = "\
//  Whipstitch Animation File
//  This Animation is for use with the Whipstitch Game Engine
//  For more information, email dsnettleton@whipstitchgames.com

versionNumber 0.9
animationType 1
animationName Reach
framesPerSecond 24.000000

numJoints 2
numKeyFrames 1
bounds { 0.500000 1.000000 0.000000 }

//  Animation files store a collection of joint rotations; matrices are computed on loading

joints {
  joint 0 {
    jointName root
    parent -1
    pos_start { 0.000000 0.000000 0.000000 }
    rotation { 0.000000 0.000000 0.000000 1.000000 }
  }
  joint 1 {
    jointName tip
    parent 0
    pos_start { 0.000000 1.000000 0.000000 }
    rotation { 0.000000 0.000000 0.000000 1.000000 }
  }
}

keyframes {
  keyframe 0 {
    frameNumber 5.000000
    jointsModified 1
    joint 1 {
      jointTranslation { 1.000000 0.000000 0.000000 }
      jointRotation { 0.000000 0.707107 0.000000 0.707107 }
    }
  }
}
";

    #[test]
    fn test_joints_and_keyframes_golden() {
        let skeleton = two_joint_skeleton();
        let quarter_turn_y = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let animation = Animation {
            name: "Reach".into(),
            keyframes: vec![Keyframe {
                frame_index: 5.0,
                mods: vec![
                    JointMod::identity(0),
                    JointMod {
                        location: Vec3::X,
                        rotation: quarter_turn_y,
                        initial_rot: quarter_turn_y,
                        authored: true,
                        ..JointMod::identity(1)
                    },
                ],
                bounds: Vec3::new(0.5, 1.0, 0.0),
            }],
            frames_per_second: 24.0,
            length: 5.0 / 24.0,
            bounds: Vec3::new(0.5, 1.0, 0.0),
        };

        let mut buf = Vec::new();
        write_ws_animation(&mut buf, &animation, &skeleton).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), GOLDEN);
    }

    #[test]
    fn test_unauthored_keyframe_lists_no_joints() {
        let skeleton = two_joint_skeleton();
        let animation = Animation {
            name: "Hold".into(),
            keyframes: vec![Keyframe {
                frame_index: 0.0,
                mods: vec![JointMod::identity(0), JointMod::identity(1)],
                bounds: Vec3::ZERO,
            }],
            frames_per_second: 30.0,
            length: 0.0,
            bounds: Vec3::ZERO,
        };

        let mut buf = Vec::new();
        write_ws_animation(&mut buf, &animation, &skeleton).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("framesPerSecond 30.000000\n"));
        assert!(text.ends_with("  keyframe 0 {\n    frameNumber 0.000000\n    jointsModified 0\n  }\n}\n"));
    }
}
