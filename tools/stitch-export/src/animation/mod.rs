//! Animation compiler (action -> re-based keyframes)
//!
//! An action becomes an [`Animation`] in four passes:
//! 1. keyframe discovery ([`keyframe_times`])
//! 2. per-keyframe channel extraction into raw deltas ([`extract_keyframes`])
//! 3. rig-level re-basing in parent-before-child order ([`rebase`])
//! 4. per-keyframe posing for bounds ([`PoseBuffer`])
//!
//! Re-based values already contain the full ancestor chain, so the runtime can apply
//! each joint's stored rotation without walking the hierarchy.

mod keyframes;
mod pose;
mod rebase;

pub use keyframes::{extract_keyframes, keyframe_times};
pub use pose::PoseBuffer;
pub use rebase::rebase;

use glam::{Quat, Vec3};

use crate::bounds::mean_half_extent;
use crate::error::Condition;
use crate::scene::SceneAction;
use crate::skeleton::Skeleton;

/// One joint's change at one keyframe.
///
/// Before re-basing `location`/`rotation` hold the authored local delta. After
/// re-basing they hold the ancestor-composed pose and `initial_rot` keeps the delta
/// rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointMod {
    pub joint_index: usize,
    pub location: Vec3,
    pub rotation: Quat,
    pub initial_rot: Quat,
    /// `false` when the entry stands in for a joint with no sample at this time
    pub authored: bool,
}

impl JointMod {
    /// No translation, no rotation.
    pub fn identity(joint_index: usize) -> Self {
        Self {
            joint_index,
            location: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            initial_rot: Quat::IDENTITY,
            authored: false,
        }
    }
}

/// Per-joint entry of a raw keyframe
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JointChange {
    /// Channels of this joint were sampled at exactly this time
    Explicit(JointMod),
    /// Nothing authored; the joint holds its bind pose
    ImplicitIdentity,
}

impl JointChange {
    pub fn is_explicit(&self) -> bool {
        matches!(self, JointChange::Explicit(_))
    }
}

/// Keyframe straight out of the action, one entry per joint
#[derive(Debug, Clone, PartialEq)]
pub struct RawKeyframe {
    pub time: f32,
    pub changes: Vec<JointChange>,
}

impl RawKeyframe {
    pub fn implicit_count(&self) -> usize {
        self.changes.iter().filter(|c| !c.is_explicit()).count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Keyframe {
    /// Time in the tool's frame units
    pub frame_index: f32,
    /// Re-based mods, one per joint, indexed by joint
    pub mods: Vec<JointMod>,
    /// Half-extents of the posed skeleton
    pub bounds: Vec3,
}

impl Keyframe {
    /// Entries backed by authored samples; the only ones written out.
    pub fn authored(&self) -> impl Iterator<Item = &JointMod> {
        self.mods.iter().filter(|m| m.authored)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    pub name: String,
    pub keyframes: Vec<Keyframe>,
    pub frames_per_second: f32,
    /// Seconds, from the last keyframe time
    pub length: f32,
    /// Mean of the keyframe half-extents. Loose: a pose may exceed it.
    pub bounds: Vec3,
}

/// Compile one action against a finalized skeleton.
///
/// Returns `None` for actions with at most one distinct keyframe time.
pub fn compile(
    action: &SceneAction,
    skeleton: &Skeleton,
    frames_per_second: f32,
    conditions: &mut Vec<Condition>,
) -> Option<Animation> {
    let times = keyframe_times(action);
    if times.len() <= 1 {
        tracing::warn!(
            "Skipping animation '{}': {} distinct keyframe time(s)",
            action.name,
            times.len()
        );
        conditions.push(Condition::DegenerateAnimation {
            action: action.name.clone(),
            distinct_times: times.len(),
        });
        return None;
    }

    let raw = extract_keyframes(action, skeleton, conditions);

    let implicit: usize = raw.iter().map(RawKeyframe::implicit_count).sum();
    if implicit > 0 {
        tracing::debug!(
            "Animation '{}': {} unkeyed joint entries held at bind pose",
            action.name,
            implicit
        );
        conditions.push(Condition::UndefinedJointModification {
            animation: action.name.clone(),
            entries: implicit,
        });
    }

    let mut pose = PoseBuffer::new(skeleton);
    let keyframes: Vec<Keyframe> = raw
        .iter()
        .map(|key| {
            let mods = rebase(skeleton, key);
            let bounds = pose.pose(skeleton, &mods).half();
            Keyframe {
                frame_index: key.time,
                mods,
                bounds,
            }
        })
        .collect();

    let last = keyframes.last().map_or(0.0, |k| k.frame_index);
    let bounds = mean_half_extent(keyframes.iter().map(|k| k.bounds));

    tracing::debug!(
        "Compiled animation '{}': {} keyframes, {:.2}s",
        action.name,
        keyframes.len(),
        last / frames_per_second
    );

    Some(Animation {
        name: action.name.clone(),
        keyframes,
        frames_per_second,
        length: last / frames_per_second,
        bounds,
    })
}
