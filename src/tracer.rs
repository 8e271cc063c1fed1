use glam::Vec3;

use crate::camera::Ray;
use crate::scene::BlobField;

/// March limits shared by the tracer and the normal estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TracerSettings {
    pub max_steps: u32,
    /// Hit tolerance, also the finite-difference step for normals.
    pub epsilon: f32,
    pub t_min: f32,
    pub t_max: f32,
}

impl Default for TracerSettings {
    fn default() -> Self {
        Self {
            max_steps: 100,
            epsilon: 1e-3,
            t_min: 0.0,
            t_max: 100.0,
        }
    }
}

/// Result of tracing one ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    pub hit: bool,
    pub distance: f32,
    pub point: Vec3,
    pub normal: Vec3,
}

impl SurfaceSample {
    fn miss(ray: &Ray, t_max: f32) -> Self {
        Self {
            hit: false,
            distance: t_max,
            point: ray.at(t_max),
            normal: Vec3::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SphereTracer {
    pub settings: TracerSettings,
}

impl SphereTracer {
    pub fn new(settings: TracerSettings) -> Self {
        Self { settings }
    }

    /// Distance along `ray` to the surface, or `t_max` on a miss.
    ///
    /// Running out of steps before converging also counts as a miss.
    pub fn march(&self, field: &BlobField, ray: &Ray) -> f32 {
        let TracerSettings {
            max_steps,
            epsilon,
            t_min,
            t_max,
        } = self.settings;

        let mut t = t_min;
        for _ in 0..max_steps {
            let d = field.distance(ray.at(t));
            if d < epsilon {
                return t;
            }
            t += d;
            if t >= t_max {
                return t_max;
            }
        }
        t_max
    }

    /// Unit gradient of the field at `point` from central differences.
    pub fn normal(&self, field: &BlobField, point: Vec3) -> Vec3 {
        let e = self.settings.epsilon;
        let dx = Vec3::new(e, 0.0, 0.0);
        let dy = Vec3::new(0.0, e, 0.0);
        let dz = Vec3::new(0.0, 0.0, e);
        Vec3::new(
            field.distance(point + dx) - field.distance(point - dx),
            field.distance(point + dy) - field.distance(point - dy),
            field.distance(point + dz) - field.distance(point - dz),
        )
        .normalize()
    }

    pub fn is_miss(&self, distance: f32) -> bool {
        distance > self.settings.t_max - self.settings.epsilon
    }

    pub fn trace(&self, field: &BlobField, ray: &Ray) -> SurfaceSample {
        let distance = self.march(field, ray);
        if self.is_miss(distance) {
            return SurfaceSample::miss(ray, self.settings.t_max);
        }
        let point = ray.at(distance);
        SurfaceSample {
            hit: true,
            distance,
            point,
            normal: self.normal(field, point),
        }
    }
}
