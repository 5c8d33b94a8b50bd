use foundation::math::{
    Mat4, Vec2, Vec3, mat4_look_at_rh, mat4_mul, mat4_perspective_rh_z0,
};

use crate::config::CameraConfig;
use crate::picking::Ray;

/// Sizes read from the DOM on mount and on every window resize.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    /// Container box size in CSS pixels.
    pub width: f64,
    pub height: f64,
    /// `window.innerWidth`; drives the distance breakpoint.
    pub window_width: f64,
    pub device_pixel_ratio: f64,
}

/// What a resize changed, for the renderer to apply.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ResizeOutcome {
    pub distance: f64,
    pub distance_changed: bool,
    pub pixel_ratio: f64,
    /// Drawing buffer size in device pixels.
    pub buffer_width: u32,
    pub buffer_height: u32,
}

/// Camera distance for the given window width.
///
/// Wide windows (strictly above the breakpoint) get the near distance.
pub fn distance_for_window_width(window_width: f64, cfg: &CameraConfig) -> f64 {
    if window_width > cfg.breakpoint_px {
        cfg.near_distance
    } else {
        cfg.far_distance
    }
}

/// `devicePixelRatio` capped to `max`; garbage input falls back to 1.
pub fn effective_pixel_ratio(device_pixel_ratio: f64, max: f64) -> f64 {
    if !(device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0) {
        return 1.0;
    }
    device_pixel_ratio.min(max.max(1.0))
}

/// Pointer position in normalized device coordinates, relative to the
/// window (x right, y up, both in [-1, 1]).
pub fn pointer_ndc(client_x: f64, client_y: f64, window_width: f64, window_height: f64) -> Vec2 {
    let w = window_width.max(1.0);
    let h = window_height.max(1.0);
    Vec2::new((client_x / w) * 2.0 - 1.0, -(client_y / h) * 2.0 + 1.0)
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub fov_y_deg: f64,
    pub near: f64,
    pub far: f64,
    pub aspect: f64,
    /// Distance from the orbit target, set by the resize policy.
    pub distance: f64,
}

impl PerspectiveCamera {
    pub fn new(cfg: &CameraConfig) -> Self {
        Self {
            fov_y_deg: cfg.fov_y_deg,
            near: cfg.near,
            far: cfg.far,
            aspect: 1.0,
            distance: cfg.near_distance,
        }
    }

    pub fn apply_resize(&mut self, viewport: &Viewport, cfg: &CameraConfig) -> ResizeOutcome {
        let distance = distance_for_window_width(viewport.window_width, cfg);
        let distance_changed = distance != self.distance;
        self.distance = distance;

        let width = viewport.width.max(1.0);
        let height = viewport.height.max(1.0);
        self.aspect = width / height;

        let pixel_ratio = effective_pixel_ratio(viewport.device_pixel_ratio, cfg.max_pixel_ratio);
        let outcome = ResizeOutcome {
            distance,
            distance_changed,
            pixel_ratio,
            buffer_width: (width * pixel_ratio).floor().max(1.0) as u32,
            buffer_height: (height * pixel_ratio).floor().max(1.0) as u32,
        };

        tracing::debug!(
            width,
            height,
            window_width = viewport.window_width,
            distance,
            pixel_ratio,
            "camera resized"
        );
        outcome
    }

    pub fn projection(&self) -> Mat4 {
        mat4_perspective_rh_z0(self.fov_y_deg.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view(&self, eye: Vec3, target: Vec3) -> Mat4 {
        mat4_look_at_rh(eye, target, Vec3::Y)
    }

    pub fn view_proj(&self, eye: Vec3, target: Vec3) -> Mat4 {
        mat4_mul(self.projection(), self.view(eye, target))
    }

    /// World-space ray through `ndc` for a camera at `eye` looking at
    /// `target`.
    pub fn ray_from_ndc(&self, eye: Vec3, target: Vec3, ndc: Vec2) -> Ray {
        let forward = (target - eye).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);

        let tan_half = (0.5 * self.fov_y_deg.to_radians()).tan();
        let dir = forward + right * (ndc.x * tan_half * self.aspect) + up * (ndc.y * tan_half);
        Ray::new(eye, dir.normalize_or_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picking::{Sphere, pick_sphere};

    fn viewport(window_width: f64) -> Viewport {
        Viewport {
            width: 800.0,
            height: 600.0,
            window_width,
            device_pixel_ratio: 1.0,
        }
    }

    #[test]
    fn breakpoint_selects_distance() {
        let cfg = CameraConfig::default();
        assert_eq!(distance_for_window_width(1200.0, &cfg), 100.0);
        assert_eq!(distance_for_window_width(701.0, &cfg), 100.0);
        assert_eq!(distance_for_window_width(700.0, &cfg), 140.0);
        assert_eq!(distance_for_window_width(320.0, &cfg), 140.0);
    }

    #[test]
    fn resize_changes_distance_only_across_breakpoint() {
        let cfg = CameraConfig::default();
        let mut cam = PerspectiveCamera::new(&cfg);

        let first = cam.apply_resize(&viewport(1024.0), &cfg);
        assert_eq!(first.distance, 100.0);
        assert!(!first.distance_changed);

        let same_side = cam.apply_resize(&viewport(900.0), &cfg);
        assert!(!same_side.distance_changed);
        assert_eq!(cam.distance, 100.0);

        let crossed = cam.apply_resize(&viewport(600.0), &cfg);
        assert!(crossed.distance_changed);
        assert_eq!(cam.distance, 140.0);

        let narrow_again = cam.apply_resize(&viewport(400.0), &cfg);
        assert!(!narrow_again.distance_changed);
        assert_eq!(cam.distance, 140.0);

        let back = cam.apply_resize(&viewport(701.0), &cfg);
        assert!(back.distance_changed);
        assert_eq!(cam.distance, 100.0);
    }

    #[test]
    fn resize_updates_aspect_and_buffer() {
        let cfg = CameraConfig::default();
        let mut cam = PerspectiveCamera::new(&cfg);
        let out = cam.apply_resize(
            &Viewport {
                width: 400.0,
                height: 200.0,
                window_width: 1000.0,
                device_pixel_ratio: 3.0,
            },
            &cfg,
        );
        assert_eq!(cam.aspect, 2.0);
        assert_eq!(out.pixel_ratio, 2.0);
        assert_eq!((out.buffer_width, out.buffer_height), (800, 400));
    }

    #[test]
    fn pixel_ratio_is_capped_and_sanitized() {
        assert_eq!(effective_pixel_ratio(1.5, 2.0), 1.5);
        assert_eq!(effective_pixel_ratio(3.0, 2.0), 2.0);
        assert_eq!(effective_pixel_ratio(f64::NAN, 2.0), 1.0);
        assert_eq!(effective_pixel_ratio(0.0, 2.0), 1.0);
    }

    #[test]
    fn pointer_ndc_maps_window_corners() {
        assert_eq!(pointer_ndc(0.0, 0.0, 800.0, 600.0), Vec2::new(-1.0, 1.0));
        assert_eq!(pointer_ndc(800.0, 600.0, 800.0, 600.0), Vec2::new(1.0, -1.0));
        assert_eq!(pointer_ndc(400.0, 300.0, 800.0, 600.0), Vec2::new(0.0, 0.0));
    }

    #[test]
    fn center_ray_hits_globe_and_corner_ray_misses() {
        let cfg = CameraConfig::default();
        let mut cam = PerspectiveCamera::new(&cfg);
        cam.apply_resize(&viewport(1024.0), &cfg);
        let eye = Vec3::new(0.0, 0.0, cam.distance);
        let globe = Sphere::new(Vec3::ZERO, 22.0);

        let center = cam.ray_from_ndc(eye, Vec3::ZERO, Vec2::new(0.0, 0.0));
        assert!(pick_sphere(center, globe).is_some());

        let corner = cam.ray_from_ndc(eye, Vec3::ZERO, Vec2::new(0.95, 0.95));
        assert!(pick_sphere(corner, globe).is_none());
    }

    #[test]
    fn ray_agrees_with_projection() {
        let cfg = CameraConfig::default();
        let mut cam = PerspectiveCamera::new(&cfg);
        cam.apply_resize(&viewport(1024.0), &cfg);
        let eye = Vec3::new(0.0, 0.0, 100.0);
        let ray = cam.ray_from_ndc(eye, Vec3::ZERO, Vec2::new(0.5, -0.25));

        let p = ray.at(50.0);
        let clip = foundation::math::mat4_transform_point(
            cam.view_proj(eye, Vec3::ZERO),
            p.to_f32(),
        );
        assert!((clip[0] / clip[3] - 0.5).abs() < 1e-4);
        assert!((clip[1] / clip[3] + 0.25).abs() < 1e-4);
    }
}
