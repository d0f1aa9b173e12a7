//! Rig-level re-basing of raw keyframe deltas.

use crate::skeleton::Skeleton;

use super::{JointChange, JointMod, RawKeyframe};

/// Compose every joint's delta with the rig transform and its ancestor chain.
///
/// Walks `skeleton.order` so a parent is always re-based before its children.
/// Unkeyed joints are resolved to an identity delta, which leaves them at their
/// bind rotation relative to the (possibly animated) parent.
///
/// ```text
/// rotation = rig_rotation * joint.initial_rot * delta.rotation
/// location = rotation * (delta.location * rig_scale)
/// if parent:
///     rotation = parent_mod.rotation * (parent.initial_rot⁻¹ * joint.initial_rot) * delta.rotation
/// ```
pub fn rebase(skeleton: &Skeleton, key: &RawKeyframe) -> Vec<JointMod> {
    let mut mods: Vec<JointMod> = (0..skeleton.len()).map(JointMod::identity).collect();

    for &index in &skeleton.order {
        let joint = &skeleton.joints[index];
        let mut m = match key.changes[index] {
            JointChange::Explicit(delta) => delta,
            JointChange::ImplicitIdentity => JointMod::identity(index),
        };

        m.initial_rot = m.rotation;
        m.rotation = skeleton.rotation * joint.initial_rot * m.initial_rot;
        m.location = m.rotation * (m.location * skeleton.scale);

        if let Some(parent_index) = joint.parent {
            let parent = &skeleton.joints[parent_index];
            let diff = parent.initial_rot.inverse() * joint.initial_rot;
            m.rotation = mods[parent_index].rotation * diff * m.initial_rot;
        }

        mods[index] = m;
    }

    mods
}
