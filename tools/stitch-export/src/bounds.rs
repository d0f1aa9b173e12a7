//! Axis-aligned bounding volumes.

use glam::Vec3;

/// AABB accumulated point by point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::empty()
    }
}

impl Bounds {
    /// Bounds containing nothing; the first `include` snaps to that point.
    pub const fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Self {
        let mut bounds = Self::empty();
        for p in points {
            bounds.include(p);
        }
        bounds
    }

    #[inline]
    pub fn include(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Half-extents `(max - min) / 2`; zero when empty.
    pub fn half(&self) -> Vec3 {
        if self.is_empty() {
            return Vec3::ZERO;
        }
        (self.max - self.min) * 0.5
    }

    /// Box center; zero when empty.
    pub fn center(&self) -> Vec3 {
        if self.is_empty() {
            return Vec3::ZERO;
        }
        (self.max + self.min) * 0.5
    }
}

/// Arithmetic mean of a set of half-extents.
///
/// Used to fold per-keyframe bounds into one animation bound. This is a loose
/// approximation, not a swept volume: a pose can poke outside the mean.
pub fn mean_half_extent<I: IntoIterator<Item = Vec3>>(halves: I) -> Vec3 {
    let mut sum = Vec3::ZERO;
    let mut count = 0usize;
    for h in halves {
        sum += h;
        count += 1;
    }
    if count == 0 {
        Vec3::ZERO
    } else {
        sum / count as f32
    }
}
