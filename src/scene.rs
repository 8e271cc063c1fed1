use glam::Vec3;

use crate::util::hash::{hash1, hash3};

/// Maximum number of blobs the field can hold.
pub const MAX_BLOBS: usize = 8;

/// Blend threshold: the surface is where the summed falloff equals this value.
const THRESHOLD: f32 = 0.2;
/// Offset added to the bounding-sphere distance when no blob contributes.
const EXTERIOR_BIAS: f32 = 0.1;
/// Scales a blob radius into a Lipschitz bound for the falloff profile.
const LIPSCHITZ_PER_RADIUS: f32 = 0.5333;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blob {
    pub center: Vec3,
    pub radius: f32,
}

impl Default for Blob {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            radius: 1.0,
        }
    }
}

impl Blob {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Procedural blob `index` at `time`, drifting horizontally with the rest.
    pub fn animated(index: usize, time: f32) -> Self {
        let seed = index as f32 / MAX_BLOBS as f32;
        let phase = 6.2831 * hash3(seed * 1.17) + hash3(seed * 13.7) * time;
        let mut center = 2.0 * Vec3::new(phase.x.sin(), phase.y.sin(), phase.z.sin());
        center.x += 3.0 * (0.4 * time).sin();
        let radius = 1.7 + 0.9 * (6.28 * hash1(seed * 23.13)).sin();
        Self { center, radius }
    }
}

/// Up to [`MAX_BLOBS`] spheres blended into one implicit surface.
///
/// Slots past `count` are ignored. The field is rebuilt every frame and
/// only read while pixels are being traced.
#[derive(Debug, Clone, Copy)]
pub struct BlobField {
    blobs: [Blob; MAX_BLOBS],
    count: usize,
}

impl BlobField {
    /// Builds a field from explicit blobs; anything past [`MAX_BLOBS`] is dropped.
    pub fn from_blobs(blobs: &[Blob]) -> Self {
        let mut slots = [Blob::default(); MAX_BLOBS];
        let count = blobs.len().min(MAX_BLOBS);
        slots[..count].copy_from_slice(&blobs[..count]);
        Self {
            blobs: slots,
            count,
        }
    }

    /// Animated blobs for `time`, `count` clamped to `1..=MAX_BLOBS`.
    pub fn animated(count: usize, time: f32) -> Self {
        let count = count.clamp(1, MAX_BLOBS);
        let mut blobs = [Blob::default(); MAX_BLOBS];
        for (index, blob) in blobs.iter_mut().enumerate().take(count) {
            *blob = Blob::animated(index, time);
        }
        Self { blobs, count }
    }

    /// The per-frame field: animated blobs with blob 0 moved to `mouse_center`.
    pub fn at(count: usize, time: f32, mouse_center: Vec3) -> Self {
        Self::animated(count, time).with_mouse_blob(mouse_center)
    }

    pub fn with_mouse_blob(mut self, center: Vec3) -> Self {
        self.blobs[0].center = center;
        self
    }

    pub fn blobs(&self) -> &[Blob] {
        &self.blobs[..self.count]
    }

    pub fn len(&self) -> usize {
        self.count
    }

    /// Only a field built with `from_blobs(&[])` is empty.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Field value at `point`, negative inside the blended surface.
    ///
    /// Inside any bounding sphere the summed quintic falloff is compared to
    /// the threshold and scaled by the largest Lipschitz estimate, so the
    /// value never exceeds the real distance to the surface. Outside all of
    /// them the distance to the nearest bounding sphere is used instead.
    pub fn distance(&self, point: Vec3) -> f32 {
        let mut potential = 0.0;
        let mut contributing = 0;
        let mut nearest = 1e20_f32;
        let mut lipschitz = 1.0_f32;

        for blob in self.blobs() {
            let db = blob.center.distance(point);
            if db < blob.radius {
                let x = db / blob.radius;
                potential += 1.0 - x * x * x * (x * (x * 6.0 - 15.0) + 10.0);
                contributing += 1;
                lipschitz = lipschitz.max(LIPSCHITZ_PER_RADIUS * blob.radius);
            } else {
                nearest = nearest.min(db - blob.radius);
            }
        }

        if contributing > 0 {
            lipschitz * (THRESHOLD - potential)
        } else {
            nearest + EXTERIOR_BIAS
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::Vec3;

    use super::*;

    #[test]
    fn animated_field_clamps_count() {
        assert_eq!(BlobField::animated(0, 1.0).len(), 1);
        assert_eq!(BlobField::animated(5, 1.0).len(), 5);
        assert_eq!(BlobField::animated(42, 1.0).len(), MAX_BLOBS);
    }

    #[test]
    fn animated_blobs_have_positive_radius() {
        let field = BlobField::animated(MAX_BLOBS, 3.7);
        for blob in field.blobs() {
            assert!(blob.radius >= 0.8 && blob.radius <= 2.6, "{blob:?}");
        }
    }

    #[test]
    fn animation_is_a_pure_function_of_index_and_time() {
        for index in 0..MAX_BLOBS {
            assert_eq!(Blob::animated(index, 12.5), Blob::animated(index, 12.5));
        }
        assert_ne!(Blob::animated(3, 0.0), Blob::animated(3, 1.0));
    }

    #[test]
    fn first_blob_seed_is_zero() {
        // seed 0 hashes to 0 so blob 0 starts with the base radius
        let blob = Blob::animated(0, 0.0);
        assert_relative_eq!(blob.radius, 1.7, epsilon = 1e-6);
    }

    #[test]
    fn mouse_blob_keeps_radius_and_ignores_drift() {
        let time = 2.0;
        let field = BlobField::at(4, time, Vec3::new(0.5, -0.5, 0.0));
        let animated = BlobField::animated(4, time);
        assert_eq!(field.blobs()[0].center, Vec3::new(0.5, -0.5, 0.0));
        assert_eq!(field.blobs()[0].radius, animated.blobs()[0].radius);
        assert_eq!(field.blobs()[1..], animated.blobs()[1..]);
    }

    #[test]
    fn from_blobs_truncates_to_capacity() {
        let blobs = vec![Blob::default(); 12];
        assert_eq!(BlobField::from_blobs(&blobs).len(), MAX_BLOBS);
    }

    #[test]
    fn exterior_distance_bounds_nearest_sphere() {
        let field = BlobField::from_blobs(&[
            Blob::new(Vec3::ZERO, 2.0),
            Blob::new(Vec3::new(6.0, 0.0, 0.0), 1.0),
        ]);
        for point in [
            Vec3::new(0.0, 5.0, 0.0),
            Vec3::new(3.5, 0.0, 0.0),
            Vec3::new(-4.0, 2.0, 1.0),
            Vec3::new(8.0, 8.0, 8.0),
        ] {
            let nearest = field
                .blobs()
                .iter()
                .map(|b| b.center.distance(point) - b.radius)
                .fold(f32::INFINITY, f32::min);
            assert!(nearest > 0.0);
            let d = field.distance(point);
            assert!(d > 0.0 && d >= nearest, "{point}: {d} < {nearest}");
        }
    }

    #[test]
    fn center_of_blob_is_inside() {
        let field = BlobField::from_blobs(&[Blob::new(Vec3::ZERO, 2.0)]);
        // potential is 1 at the center, lipschitz estimate is 0.5333 * 2
        assert_relative_eq!(field.distance(Vec3::ZERO), 1.0666 * -0.8, epsilon = 1e-5);
    }

    #[test]
    fn overlapping_blobs_blend() {
        let single = BlobField::from_blobs(&[Blob::new(Vec3::new(-1.45, 0.0, 0.0), 2.0)]);
        let pair = BlobField::from_blobs(&[
            Blob::new(Vec3::new(-1.45, 0.0, 0.0), 2.0),
            Blob::new(Vec3::new(1.45, 0.0, 0.0), 2.0),
        ]);
        // the midpoint is outside one blob alone but inside the blend
        assert!(single.distance(Vec3::ZERO) > 0.0);
        assert!(pair.distance(Vec3::ZERO) < 0.0);
    }

    #[test]
    fn field_is_continuous_across_the_zero_set() {
        let field = BlobField::from_blobs(&[Blob::new(Vec3::ZERO, 2.0)]);
        let mut previous = field.distance(Vec3::new(0.0, 0.0, 0.5));
        let mut z = 0.5;
        // stays inside the bounding sphere, the zero-set is near z = 1.35
        while z < 1.9 {
            z += 0.001;
            let d = field.distance(Vec3::new(0.0, 0.0, z));
            assert!((d - previous).abs() < 0.01);
            previous = d;
        }
        assert!(field.distance(Vec3::new(0.0, 0.0, 1.3)) < 0.0);
        assert!(field.distance(Vec3::new(0.0, 0.0, 1.4)) > 0.0);
    }

    #[test]
    fn field_steps_down_at_the_bounding_sphere() {
        let field = BlobField::from_blobs(&[Blob::new(Vec3::ZERO, 2.0)]);
        let inside = field.distance(Vec3::new(0.0, 0.0, 1.9999));
        let outside = field.distance(Vec3::new(0.0, 0.0, 2.0001));
        // falloff is ~0 at the boundary: 0.5333 * 2 * 0.2 inside, bias 0.1 outside
        assert_relative_eq!(inside, 0.21332, epsilon = 1e-4);
        assert_relative_eq!(outside, 0.1001, epsilon = 1e-4);
        assert!(inside - outside > 0.1);
        assert!(outside > 0.0);
    }

    #[test]
    fn empty_field_has_no_blobs() {
        let field = BlobField::from_blobs(&[]);
        assert!(field.is_empty());
        assert!(field.distance(Vec3::ZERO) > 1e19);
    }
}
