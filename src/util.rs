pub mod math {
    use glam::{Vec3, Vec4};

    pub fn degree_to_radian(degree: f32) -> f32 {
        degree * std::f32::consts::PI / 180.0
    }

    /// Fractional part in `[0, 1)`, also for tiny negative inputs where
    /// `x - floor(x)` rounds up to exactly one.
    #[inline]
    pub fn fract(x: f32) -> f32 {
        let f = x - x.floor();
        if f < 1.0 {
            f
        } else {
            0.0
        }
    }

    pub fn fract3(v: Vec3) -> Vec3 {
        Vec3::new(fract(v.x), fract(v.y), fract(v.z))
    }

    pub fn sin3(v: Vec3) -> Vec3 {
        Vec3::new(v.x.sin(), v.y.sin(), v.z.sin())
    }

    /// Converts hue/saturation/value (all in `[0, 1]`, hue wraps) to rgb.
    pub fn hsv_to_rgb(hsv: Vec3) -> Vec3 {
        let k = Vec4::new(1.0, 2.0 / 3.0, 1.0 / 3.0, 3.0);
        let p = (fract3(Vec3::splat(hsv.x) + k.truncate()) * 6.0 - Vec3::splat(k.w)).abs();
        let chroma = (p - Vec3::ONE).clamp(Vec3::ZERO, Vec3::ONE);
        hsv.z * Vec3::ONE.lerp(chroma, hsv.y)
    }
}

/// Sine-scrambled pseudo random values keyed by a scalar seed.
///
/// These drive the blob animation, so the exact mapping matters more than
/// its statistical quality: the same seed always gives the same value.
pub mod hash {
    use glam::{Vec2, Vec3};

    use super::math::{fract, fract3, sin3};

    const K1: f32 = 43758.545_312_3;
    const K2: f32 = 22578.145_912_3;
    const K3: f32 = 19642.349_042_3;

    pub fn hash1(n: f32) -> f32 {
        fract(n.sin() * K1)
    }

    pub fn hash2(n: f32) -> Vec2 {
        Vec2::new(fract(n.sin() * K1), fract((n + 1.0).sin() * K2))
    }

    pub fn hash3(n: f32) -> Vec3 {
        fract3(sin3(Vec3::new(n, n + 1.0, n + 2.0)) * Vec3::new(K1, K2, K3))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::Vec3;

    use super::hash::{hash1, hash2, hash3};
    use super::math::{fract, hsv_to_rgb};

    #[test]
    fn fract_stays_below_one() {
        assert_eq!(fract(-1e-9), 0.0);
        assert_relative_eq!(fract(2.25), 0.25);
        assert_relative_eq!(fract(-0.25), 0.75);
    }

    #[test]
    fn hashes_are_in_unit_interval() {
        let mut seed = -50.0_f32;
        while seed < 50.0 {
            let a = hash1(seed);
            let b = hash2(seed);
            let c = hash3(seed);
            assert!((0.0..1.0).contains(&a), "hash1({seed}) = {a}");
            for v in [b.x, b.y, c.x, c.y, c.z] {
                assert!((0.0..1.0).contains(&v), "hash of {seed} gave {v}");
            }
            seed += 0.173;
        }
    }

    #[test]
    fn hashes_are_pure() {
        for seed in [0.0, 0.125 * 1.17, 0.875 * 13.7, 23.13, -4.5] {
            assert_eq!(hash1(seed).to_bits(), hash1(seed).to_bits());
            assert_eq!(hash2(seed), hash2(seed));
            assert_eq!(hash3(seed), hash3(seed));
        }
    }

    #[test]
    fn hash_channels_share_first_component() {
        let seed = 0.37;
        assert_eq!(hash2(seed).x, hash1(seed));
        assert_eq!(hash3(seed).x, hash1(seed));
    }

    #[test]
    fn hsv_primary_hues() {
        let red = hsv_to_rgb(Vec3::new(0.0, 1.0, 1.0));
        assert_relative_eq!(red.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(red.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(red.z, 0.0, epsilon = 1e-5);

        let green = hsv_to_rgb(Vec3::new(1.0 / 3.0, 1.0, 1.0));
        assert_relative_eq!(green.y, 1.0, epsilon = 1e-5);
        assert_relative_eq!(green.x, 0.0, epsilon = 1e-5);

        let grey = hsv_to_rgb(Vec3::new(0.6, 0.0, 0.5));
        assert_relative_eq!(grey.x, 0.5, epsilon = 1e-5);
        assert_relative_eq!(grey.z, 0.5, epsilon = 1e-5);
    }
}
