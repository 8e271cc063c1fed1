//! Two-light Phong shading and the background gradient.

use glam::{Vec2, Vec3};

use crate::util::math::hsv_to_rgb;

const AMBIENT_LIGHT: Vec3 = Vec3::splat(0.5);
const GAMMA: f32 = 0.45;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub intensity: Vec3,
}

impl Light {
    /// The two lights orbiting the origin at `time`.
    ///
    /// The first circles the XZ plane at radius 4 and height 2, the second
    /// circles the XY plane at radius 2, slower, two units toward the camera.
    pub fn orbiting(time: f32) -> [Light; 2] {
        let intensity = Vec3::splat(0.4);
        [
            Light {
                position: Vec3::new(4.0 * time.sin(), 2.0, 4.0 * time.cos()),
                intensity,
            },
            Light {
                position: Vec3::new(2.0 * (0.37 * time).sin(), 2.0 * (0.37 * time).cos(), 2.0),
                intensity,
            },
        ]
    }
}

/// Phong coefficients for one surface point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub shininess: f32,
}

impl Material {
    /// Blob material; the ambient hue shifts from red toward orange with height.
    pub fn at_height(y: f32) -> Self {
        Self {
            ambient: hsv_to_rgb(Vec3::new(0.12 * y, 1.0, 1.0)),
            diffuse: Vec3::new(0.7, 0.2, 0.2),
            specular: Vec3::ONE,
            shininess: 80.0,
        }
    }
}

/// Contribution of one point light at `point` seen from `eye`.
pub fn phong_contribution(
    material: &Material,
    point: Vec3,
    normal: Vec3,
    eye: Vec3,
    light: &Light,
) -> Vec3 {
    let l = (light.position - point).normalize();
    let v = (eye - point).normalize();
    let r = reflect(-l, normal).normalize();

    let dot_ln = l.dot(normal).clamp(0.0, 1.0);
    let dot_rv = r.dot(v);

    if dot_ln < 0.0 {
        return Vec3::ZERO;
    }
    if dot_rv < 0.0 {
        // reflection points away from the viewer
        return light.intensity * (material.diffuse * dot_ln);
    }
    let specular = material.specular * dot_rv.powf(material.shininess);
    light.intensity * (material.diffuse * dot_ln + specular)
}

/// Ambient plus both light contributions, before gamma.
pub fn phong_illumination(
    material: &Material,
    point: Vec3,
    normal: Vec3,
    eye: Vec3,
    lights: &[Light],
) -> Vec3 {
    lights.iter().fold(AMBIENT_LIGHT * material.ambient, |color, light| {
        color + phong_contribution(material, point, normal, eye, light)
    })
}

/// Final gamma-adjusted color of a surface hit, each channel in `[0, 1]`.
pub fn shade(point: Vec3, normal: Vec3, eye: Vec3, time: f32) -> Vec3 {
    let material = Material::at_height(point.y);
    let color = phong_illumination(&material, point, normal, eye, &Light::orbiting(time));
    gamma(color)
}

/// Dark horizontal gradient for rays that miss; `screen_uv` spans `[-1, 1]`.
pub fn background(screen_uv: Vec2) -> Vec3 {
    let edge = Vec3::new(20.0, 16.0, 16.0) / 255.0;
    Vec3::ZERO.lerp(edge, screen_uv.x.abs())
}

fn gamma(color: Vec3) -> Vec3 {
    Vec3::new(color.x.powf(GAMMA), color.y.powf(GAMMA), color.z.powf(GAMMA))
        .clamp(Vec3::ZERO, Vec3::ONE)
}

fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    incident - 2.0 * normal.dot(incident) * normal
}
