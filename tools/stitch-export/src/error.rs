//! Export failures and recoverable conditions.
//!
//! `ExportError` stops the run (nothing is written). `Condition` is collected while
//! compiling and reported at the end; the affected data is excluded or defaulted.

use std::fmt;
use thiserror::Error;

/// Structural failures that abort an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("mesh '{mesh}' has joint influences but the scene has no skeleton")]
    MissingSkeleton { mesh: String },

    #[error("no {kind} object named '{name}' in scene")]
    ObjectNotFound { kind: &'static str, name: String },

    #[error("bone name '{bone}' appears more than once in rig '{rig}'")]
    DuplicateJointName { rig: String, bone: String },

    #[error("bone '{bone}' names itself as its parent")]
    SelfParentedJoint { bone: String },

    #[error("bone hierarchy of rig '{rig}' contains a cycle through '{bone}'")]
    CyclicHierarchy { rig: String, bone: String },

    #[error("joint names '{first}' and '{second}' are both written as '{written}'")]
    JointNameCollision {
        first: String,
        second: String,
        written: String,
    },

    #[error("more than one animation would be written to '{file}'")]
    DuplicateAnimationFile { file: String },

    #[error("frame rate must be a positive number, got {fps}")]
    InvalidFrameRate { fps: f32 },

    #[error("face {face} of mesh '{mesh}' references vertex {index}, but the mesh has {count}")]
    VertexOutOfRange {
        mesh: String,
        face: usize,
        index: usize,
        count: usize,
    },
}

/// Recoverable per-entity conditions encountered during a run.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Action with at most one distinct keyframe time; not emitted.
    DegenerateAnimation { action: String, distinct_times: usize },

    /// Vertex-group influences naming no joint; dropped from the weight lists.
    UnresolvedJointReference {
        mesh: String,
        group: String,
        influences: usize,
    },

    /// Channel group naming no joint; its curves are ignored.
    UnresolvedChannelGroup { action: String, group: String },

    /// Joints with no authored sample at some keyframes; resolved to identity deltas.
    UndefinedJointModification { animation: String, entries: usize },

    /// Actions present but no rig to bind them to; not emitted.
    AnimationWithoutSkeleton { action: String },

    /// Name or value that would not read back as one token; written rewritten.
    RewrittenToken {
        field: &'static str,
        original: String,
        written: String,
    },
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::DegenerateAnimation {
                action,
                distinct_times,
            } => write!(
                f,
                "animation '{}' skipped: {} distinct keyframe time(s)",
                action, distinct_times
            ),
            Condition::UnresolvedJointReference {
                mesh,
                group,
                influences,
            } => write!(
                f,
                "mesh '{}': vertex group '{}' matches no joint ({} influence(s) dropped)",
                mesh, group, influences
            ),
            Condition::UnresolvedChannelGroup { action, group } => write!(
                f,
                "animation '{}': channel group '{}' matches no joint",
                action, group
            ),
            Condition::UndefinedJointModification { animation, entries } => write!(
                f,
                "animation '{}': {} unkeyed joint entr(ies) resolved to identity",
                animation, entries
            ),
            Condition::AnimationWithoutSkeleton { action } => {
                write!(f, "animation '{}' skipped: scene has no skeleton", action)
            }
            Condition::RewrittenToken {
                field,
                original,
                written,
            } => write!(f, "{} {:?} written as '{}'", field, original, written),
        }
    }
}
