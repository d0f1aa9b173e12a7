//! Skeleton builder (rig -> engine-space joint list)
//!
//! Joints keep the rig's declared order; every other table in the export refers to
//! them by that index. Parent links are resolved once, and a parent-before-child
//! traversal order is computed once, so later passes never assume that array order
//! matches hierarchy order.

use glam::{Quat, Vec3};
use hashbrown::HashMap;

use crate::bounds::Bounds;
use crate::coords::{to_engine_quat, to_engine_scale, to_engine_vec3};
use crate::error::ExportError;
use crate::extract::RigSource;

#[derive(Debug, Clone, PartialEq)]
pub struct Joint {
    pub name: String,
    /// Bind-pose head, engine space, rig transform applied
    pub start: Vec3,
    /// Bind-pose tail
    pub end: Vec3,
    /// Bind orientation including the rig rotation
    pub rotation: Quat,
    /// Bind orientation before the rig rotation; fixed once finalized
    pub initial_rot: Quat,
    pub parent: Option<usize>,
    /// Half-extents of this joint's segment
    pub bounds: Vec3,
}

impl Joint {
    /// Parent index as the file format writes it (`-1` for roots).
    pub fn parent_index(&self) -> i32 {
        self.parent.map_or(-1, |p| p as i32)
    }
}

#[derive(Debug, Clone)]
pub struct Skeleton {
    pub name: String,
    pub joints: Vec<Joint>,
    /// Rig rotation, engine space
    pub rotation: Quat,
    /// Rig scale, engine axis order
    pub scale: Vec3,
    /// Rig location, engine space
    pub location: Vec3,
    /// Joint indices, every parent before its children
    pub order: Vec<usize>,
    /// Bind-pose AABB over every joint endpoint
    pub bind_bounds: Bounds,
    by_name: HashMap<String, usize>,
}

impl Skeleton {
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn joint_index(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn parent_of(&self, joint: usize) -> Option<&Joint> {
        self.joints[joint].parent.map(|p| &self.joints[p])
    }
}

/// Build and finalize a skeleton from an extracted rig
pub fn build(rig: &RigSource) -> Result<Skeleton, ExportError> {
    let mut by_name = HashMap::with_capacity(rig.bones.len());
    for (index, bone) in rig.bones.iter().enumerate() {
        if by_name.insert(bone.name.to_string(), index).is_some() {
            return Err(ExportError::DuplicateJointName {
                rig: rig.name.to_string(),
                bone: bone.name.to_string(),
            });
        }
    }

    let mut joints = Vec::with_capacity(rig.bones.len());
    for bone in &rig.bones {
        let parent = match bone.parent {
            Some(parent_name) if parent_name == bone.name => {
                return Err(ExportError::SelfParentedJoint {
                    bone: bone.name.to_string(),
                });
            }
            Some(parent_name) => {
                let resolved = by_name.get(parent_name).copied();
                if resolved.is_none() {
                    tracing::debug!(
                        "Bone '{}' names unknown parent '{}', treating as root",
                        bone.name,
                        parent_name
                    );
                }
                resolved
            }
            None => None,
        };

        joints.push(Joint {
            name: bone.name.to_string(),
            start: to_engine_vec3(bone.head),
            end: to_engine_vec3(bone.tail),
            rotation: to_engine_quat(bone.rotation),
            initial_rot: Quat::IDENTITY,
            parent,
            bounds: Vec3::ZERO,
        });
    }

    let order = hierarchy_order(rig.name, &joints)?;

    let mut skeleton = Skeleton {
        name: rig.name.to_string(),
        joints,
        rotation: to_engine_quat(rig.transform.rotation),
        scale: to_engine_scale(rig.transform.scale),
        location: to_engine_vec3(rig.transform.location),
        order,
        bind_bounds: Bounds::empty(),
        by_name,
    };
    finalize_bind_pose(&mut skeleton);

    tracing::debug!(
        "Built skeleton '{}': {} joints, bind half-extents {:?}",
        skeleton.name,
        skeleton.len(),
        skeleton.bind_bounds.half()
    );

    Ok(skeleton)
}

/// Apply the rig's own transform to every joint and snapshot the bind rotation.
fn finalize_bind_pose(skeleton: &mut Skeleton) {
    let (rotation, scale, location) = (skeleton.rotation, skeleton.scale, skeleton.location);
    let mut bind_bounds = Bounds::empty();

    for joint in &mut skeleton.joints {
        joint.start = (rotation * joint.start) * scale + location;
        joint.end = (rotation * joint.end) * scale + location;
        joint.initial_rot = joint.rotation;
        joint.rotation = rotation * joint.initial_rot;

        let segment = Bounds::from_points([joint.start, joint.end]);
        joint.bounds = segment.half();
        bind_bounds.include(joint.start);
        bind_bounds.include(joint.end);
    }

    skeleton.bind_bounds = bind_bounds;
}

/// Parent-before-child order. Roots keep their declared order, children follow
/// their parent in declared order.
fn hierarchy_order(rig: &str, joints: &[Joint]) -> Result<Vec<usize>, ExportError> {
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); joints.len()];
    let mut roots = Vec::new();
    for (index, joint) in joints.iter().enumerate() {
        match joint.parent {
            Some(parent) => children[parent].push(index),
            None => roots.push(index),
        }
    }

    let mut order = Vec::with_capacity(joints.len());
    let mut stack: Vec<usize> = roots.into_iter().rev().collect();
    while let Some(index) = stack.pop() {
        order.push(index);
        stack.extend(children[index].iter().rev());
    }

    // Joints never reached from a root sit on a parent cycle.
    if order.len() != joints.len() {
        let mut visited = vec![false; joints.len()];
        for &index in &order {
            visited[index] = true;
        }
        let stuck = visited.iter().position(|v| !v).unwrap_or(0);
        return Err(ExportError::CyclicHierarchy {
            rig: rig.to_string(),
            bone: joints[stuck].name.clone(),
        });
    }

    Ok(order)
}
