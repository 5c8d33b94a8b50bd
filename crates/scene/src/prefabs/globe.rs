use foundation::math::Vec3;

use crate::config::{GlobeConfig, rgb_from_hex};
use crate::picking::Sphere;

/// The dark, slightly transparent core the dots float above.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BaseSphere {
    pub radius: f64,
    pub segments: u32,
    pub color: [f32; 3],
    pub opacity: f32,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointLight {
    pub color: [f32; 3],
    pub intensity: f32,
    pub range: f32,
    pub position: [f32; 3],
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HemisphereLight {
    pub sky: [f32; 3],
    pub ground: [f32; 3],
    pub intensity: f32,
}

/// Single dot mesh, instanced once per land dot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DotDisc {
    pub radius: f32,
    pub segments: u32,
}

/// Everything static in the globe scene, resolved from config once at mount.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlobeScene {
    pub base: BaseSphere,
    pub point_light: PointLight,
    pub hemisphere: HemisphereLight,
    pub dot: DotDisc,
}

impl GlobeScene {
    pub fn from_config(cfg: &GlobeConfig) -> Self {
        let l = &cfg.lights;
        Self {
            base: BaseSphere {
                radius: cfg.base_sphere.radius,
                segments: cfg.base_sphere.segments.max(3),
                color: rgb_from_hex(cfg.base_sphere.color),
                opacity: cfg.base_sphere.opacity.clamp(0.0, 1.0),
            },
            point_light: PointLight {
                color: rgb_from_hex(l.point_color),
                intensity: l.point_intensity,
                range: l.point_distance,
                position: l.point_position,
            },
            hemisphere: HemisphereLight {
                sky: rgb_from_hex(l.sky_color),
                ground: rgb_from_hex(l.ground_color),
                intensity: l.hemisphere_intensity,
            },
            dot: DotDisc {
                radius: cfg.dots.dot_radius,
                segments: cfg.dots.dot_segments.max(3),
            },
        }
    }

    /// Pick target for pointer rays.
    pub fn pick_sphere(&self) -> Sphere {
        Sphere::new(Vec3::ZERO, self.base.radius)
    }
}
