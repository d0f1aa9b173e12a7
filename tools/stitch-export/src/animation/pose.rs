//! Posing a skeleton with re-based mods, for keyframe bounds.

use glam::Vec3;

use crate::bounds::Bounds;
use crate::skeleton::Skeleton;

use super::JointMod;

/// Scratch joint positions reused across keyframes.
///
/// The bind-relative segment of every joint is computed once; each call to
/// [`PoseBuffer::pose`] only overwrites the posed start/end slots. Slot `i` always
/// belongs to joint `i`.
#[derive(Debug, Clone)]
pub struct PoseBuffer {
    /// Joint head relative to the parent head, in the parent's bind frame
    offsets: Vec<Vec3>,
    /// Joint tail relative to its head, in the joint's bind frame
    tails: Vec<Vec3>,
    starts: Vec<Vec3>,
    ends: Vec<Vec3>,
}

impl PoseBuffer {
    pub fn new(skeleton: &Skeleton) -> Self {
        let (offsets, tails): (Vec<Vec3>, Vec<Vec3>) = skeleton
            .joints
            .iter()
            .enumerate()
            .map(|(index, joint)| {
                let offset = match skeleton.parent_of(index) {
                    Some(parent) => parent.rotation.inverse() * (joint.start - parent.start),
                    None => joint.start,
                };
                let tail = joint.rotation.inverse() * (joint.end - joint.start);
                (offset, tail)
            })
            .unzip();

        Self {
            offsets,
            tails,
            starts: vec![Vec3::ZERO; skeleton.len()],
            ends: vec![Vec3::ZERO; skeleton.len()],
        }
    }

    /// Pose every joint with `mods` (one per joint) and return the AABB of the result.
    pub fn pose(&mut self, skeleton: &Skeleton, mods: &[JointMod]) -> Bounds {
        let mut bounds = Bounds::empty();

        for &index in &skeleton.order {
            let m = &mods[index];
            let anchored = match skeleton.joints[index].parent {
                Some(parent) => mods[parent].rotation * self.offsets[index] + self.starts[parent],
                None => self.offsets[index],
            };
            let start = anchored + m.location;
            let end = start + m.rotation * self.tails[index];

            self.starts[index] = start;
            self.ends[index] = end;
            bounds.include(start);
            bounds.include(end);
        }

        bounds
    }

    pub fn starts(&self) -> &[Vec3] {
        &self.starts
    }

    pub fn ends(&self) -> &[Vec3] {
        &self.ends
    }
}
