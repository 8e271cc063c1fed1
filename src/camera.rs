use glam::{Mat4, UVec2, Vec2, Vec3, Vec4};

use crate::util::math::degree_to_radian;

/// Below this the mouse ray is treated as parallel to the picking plane.
const PLANE_EPSILON: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Fixed pinhole camera looking at the scene.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_degrees: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_degrees: 50.0,
        }
    }
}

impl Camera {
    /// Rotation taking view-space directions to world space.
    pub fn view_transform(&self) -> Mat4 {
        view_transform(self.eye, self.target, self.up)
    }

    /// World-space ray through `frag_coord`, measured from the bottom-left corner.
    pub fn primary_ray(&self, resolution: UVec2, frag_coord: Vec2) -> Ray {
        let view_dir = ray_direction(self.fov_degrees, resolution.as_vec2(), frag_coord);
        let direction = self.view_transform().transform_vector3(view_dir);
        Ray::new(self.eye, direction)
    }

    /// Point under the cursor on the plane through the origin facing the camera.
    ///
    /// `cursor` is in window pixels with the origin at the top-left corner.
    pub fn cursor_to_plane(&self, resolution: UVec2, cursor: Vec2) -> Vec3 {
        let frag_coord = Vec2::new(cursor.x, resolution.y as f32 - cursor.y);
        let ray = self.primary_ray(resolution, frag_coord);
        origin_plane_intersection(&ray, (-self.eye).normalize())
    }
}

/// Right-handed look-at basis without translation.
pub fn view_transform(eye: Vec3, center: Vec3, up: Vec3) -> Mat4 {
    let forward = (center - eye).normalize();
    let right = forward.cross(up).normalize();
    let true_up = right.cross(forward);
    Mat4::from_cols(
        right.extend(0.0),
        true_up.extend(0.0),
        (-forward).extend(0.0),
        Vec4::W,
    )
}

/// View-space direction through `frag_coord` for a vertical field of view in degrees.
pub fn ray_direction(fov_degrees: f32, size: Vec2, frag_coord: Vec2) -> Vec3 {
    let xy = frag_coord - size / 2.0;
    let z = size.y * 0.5 / (degree_to_radian(fov_degrees) / 2.0).tan();
    xy.extend(-z).normalize()
}

/// Intersects `ray` with the plane through the origin with unit `normal`.
///
/// Returns the zero vector unless the ray travels along the normal, which
/// includes parallel rays and rays approaching the plane from behind.
pub fn origin_plane_intersection(ray: &Ray, normal: Vec3) -> Vec3 {
    let denom = normal.dot(ray.direction);
    if denom > PLANE_EPSILON {
        let t = (-ray.origin).dot(normal) / denom;
        return ray.at(t);
    }
    Vec3::ZERO
}
