//! Authoring space -> engine space.
//!
//! The authoring tool is right-handed Z-up / Y-forward; the engine is right-handed Y-up.
//! Every position, direction, scale, rotation and animation channel passes through here.

use glam::{Quat, Vec3};

/// `(x, y, z) -> (x, z, -y)`
#[inline]
pub fn to_engine_vec3(v: Vec3) -> Vec3 {
    Vec3::new(v.x, v.z, -v.y)
}

/// `(w, x, y, z) -> (w, x, z, -y)`
#[inline]
pub fn to_engine_quat(q: Quat) -> Quat {
    Quat::from_xyzw(q.x, q.z, -q.y, q.w)
}

/// Scale swaps Y and Z without a sign flip.
#[inline]
pub fn to_engine_scale(s: Vec3) -> Vec3 {
    Vec3::new(s.x, s.z, s.y)
}

/// Source-space quaternion from the tool's `[w, x, y, z]` order.
#[inline]
pub fn quat_from_wxyz(q: [f32; 4]) -> Quat {
    Quat::from_xyzw(q[1], q[2], q[3], q[0])
}

/// Number of channel lanes that map onto a joint modification.
pub const CHANNEL_LANES: usize = 7;

/// Write one authored channel sample into an engine-space translation/rotation pair.
///
/// Lanes are the tool's location X/Y/Z followed by rotation W/X/Y/Z. Returns `false`
/// for lanes outside that range (scale and custom channels), which are ignored.
pub fn apply_channel_lane(
    location: &mut Vec3,
    rotation: &mut Quat,
    lane: usize,
    value: f32,
) -> bool {
    match lane {
        0 => location.x = value,
        1 => location.z = -value,
        2 => location.y = value,
        3 => rotation.w = value,
        4 => rotation.x = value,
        5 => rotation.z = -value,
        6 => rotation.y = value,
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basis_vectors() {
        assert_eq!(to_engine_vec3(Vec3::X), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(to_engine_vec3(Vec3::Y), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(to_engine_vec3(Vec3::Z), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(to_engine_vec3(Vec3::NEG_X), Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(to_engine_vec3(Vec3::NEG_Y), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(to_engine_vec3(Vec3::NEG_Z), Vec3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn test_identity_rotation_maps_to_identity() {
        assert_eq!(to_engine_quat(Quat::IDENTITY), Quat::IDENTITY);
        assert_eq!(quat_from_wxyz([1.0, 0.0, 0.0, 0.0]), Quat::IDENTITY);
    }

    #[test]
    fn test_rotation_agrees_with_vector_mapping() {
        // Rotating then converting equals converting then rotating.
        let q = Quat::from_axis_angle(Vec3::new(0.3, -0.5, 0.8).normalize(), 1.1);
        let v = Vec3::new(0.2, 1.5, -0.7);
        let converted_after = to_engine_vec3(q * v);
        let converted_before = to_engine_quat(q) * to_engine_vec3(v);
        assert!(converted_after.abs_diff_eq(converted_before, 1e-5));
    }

    #[test]
    fn test_scale_swaps_without_sign() {
        assert_eq!(
            to_engine_scale(Vec3::new(1.0, 2.0, 3.0)),
            Vec3::new(1.0, 3.0, 2.0)
        );
    }

    #[test]
    fn test_channel_lanes_match_vector_mapping() {
        let mut loc = Vec3::ZERO;
        let mut rot = Quat::IDENTITY;
        for (lane, value) in [(0, 1.0), (1, 2.0), (2, 3.0)] {
            assert!(apply_channel_lane(&mut loc, &mut rot, lane, value));
        }
        assert_eq!(loc, to_engine_vec3(Vec3::new(1.0, 2.0, 3.0)));

        for (lane, value) in [(3, 0.5), (4, 0.1), (5, 0.2), (6, 0.3)] {
            assert!(apply_channel_lane(&mut loc, &mut rot, lane, value));
        }
        let expected = to_engine_quat(quat_from_wxyz([0.5, 0.1, 0.2, 0.3]));
        assert_eq!(rot, expected);
    }

    #[test]
    fn test_extra_lanes_ignored() {
        let mut loc = Vec3::ZERO;
        let mut rot = Quat::IDENTITY;
        assert!(!apply_channel_lane(&mut loc, &mut rot, 7, 9.0));
        assert_eq!(loc, Vec3::ZERO);
        assert_eq!(rot, Quat::IDENTITY);
    }
}
