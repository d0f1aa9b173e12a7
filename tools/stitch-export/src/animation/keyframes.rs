//! Keyframe discovery and raw channel extraction.

use crate::coords::apply_channel_lane;
use crate::error::Condition;
use crate::scene::{SceneAction, SceneChannelGroup};
use crate::skeleton::Skeleton;

use super::{JointChange, JointMod, RawKeyframe};

/// Every distinct sample time of the action, ascending.
pub fn keyframe_times(action: &SceneAction) -> Vec<f32> {
    let mut times: Vec<f32> = action
        .groups
        .iter()
        .flat_map(|g| g.channels.iter())
        .flat_map(|c| c.keyframes.iter().map(|k| k[0]))
        .collect();
    times.sort_by(f32::total_cmp);
    times.dedup();
    times
}

/// Raw per-joint deltas at every keyframe time.
///
/// A joint gets an explicit entry only where one of its channels has a sample at
/// exactly that time; lanes without a sample keep their identity component.
pub fn extract_keyframes(
    action: &SceneAction,
    skeleton: &Skeleton,
    conditions: &mut Vec<Condition>,
) -> Vec<RawKeyframe> {
    let groups: Vec<(usize, &SceneChannelGroup)> = action
        .groups
        .iter()
        .filter_map(|group| match skeleton.joint_index(&group.name) {
            Some(joint) => Some((joint, group)),
            None => {
                tracing::warn!(
                    "Animation '{}': channel group '{}' matches no joint, ignoring",
                    action.name,
                    group.name
                );
                conditions.push(Condition::UnresolvedChannelGroup {
                    action: action.name.clone(),
                    group: group.name.clone(),
                });
                None
            }
        })
        .collect();

    keyframe_times(action)
        .into_iter()
        .map(|time| {
            let mut changes = vec![JointChange::ImplicitIdentity; skeleton.len()];
            for &(joint, group) in &groups {
                let mut delta = match changes[joint] {
                    JointChange::Explicit(existing) => existing,
                    JointChange::ImplicitIdentity => JointMod::identity(joint),
                };
                if sample_group(group, time, &mut delta) {
                    delta.authored = true;
                    changes[joint] = JointChange::Explicit(delta);
                }
            }
            RawKeyframe { time, changes }
        })
        .collect()
}

/// Write every lane sampled at `time` into `delta`. Returns whether any lane was.
fn sample_group(group: &SceneChannelGroup, time: f32, delta: &mut JointMod) -> bool {
    let mut touched = false;
    for (lane, curve) in group.channels.iter().enumerate() {
        for key in curve.keyframes.iter().filter(|k| k[0] == time) {
            touched |= apply_channel_lane(&mut delta.location, &mut delta.rotation, lane, key[1]);
        }
    }
    touched
}
