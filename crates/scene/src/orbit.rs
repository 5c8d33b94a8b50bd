//! Orbit camera around the globe: slow auto-rotation, pointer drag to spin,
//! damped so motion eases out after release. No pan, no zoom; the distance is
//! owned by the resize policy.
//!
//! Angles follow the usual y-up spherical convention:
//! `x = r sin(phi) sin(theta)`, `y = r cos(phi)`, `z = r sin(phi) cos(theta)`.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use foundation::math::Vec3;

use crate::config::OrbitConfig;

/// Keeps `phi` away from the poles where the view basis degenerates.
const POLE_EPS: f64 = 1e-6;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Spherical {
    pub radius: f64,
    /// Polar angle from +Y.
    pub phi: f64,
    /// Azimuth around +Y, measured from +Z.
    pub theta: f64,
}

impl Spherical {
    pub fn from_offset(v: Vec3) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self {
                radius,
                phi: 0.0,
                theta: 0.0,
            };
        }
        Self {
            radius,
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
            theta: v.x.atan2(v.z),
        }
    }

    pub fn to_offset(self) -> Vec3 {
        let s = self.phi.sin() * self.radius;
        Vec3::new(s * self.theta.sin(), self.phi.cos() * self.radius, s * self.theta.cos())
    }
}

#[derive(Debug, Clone)]
pub struct OrbitControls {
    cfg: OrbitConfig,
    pub target: Vec3,
    spherical: Spherical,
    /// Pending rotation, consumed gradually when damping is on.
    delta_theta: f64,
    delta_phi: f64,
    dragging: bool,
    last_pos_px: [f64; 2],
    /// Element height in CSS px; drag distances are relative to it.
    viewport_height: f64,
}

impl OrbitControls {
    /// Controls for a camera `distance` away on +Z, looking at the origin.
    pub fn new(cfg: OrbitConfig, distance: f64) -> Self {
        Self {
            cfg,
            target: Vec3::ZERO,
            spherical: Spherical {
                radius: distance,
                phi: FRAC_PI_2,
                theta: 0.0,
            },
            delta_theta: 0.0,
            delta_phi: 0.0,
            dragging: false,
            last_pos_px: [0.0, 0.0],
            viewport_height: 1.0,
        }
    }

    pub fn config(&self) -> &OrbitConfig {
        &self.cfg
    }

    pub fn spherical(&self) -> Spherical {
        self.spherical
    }

    pub fn distance(&self) -> f64 {
        self.spherical.radius
    }

    pub fn set_distance(&mut self, distance: f64) {
        if distance.is_finite() && distance > 0.0 {
            self.spherical.radius = distance;
        }
    }

    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport_height = height.max(1.0);
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn eye(&self) -> Vec3 {
        self.target + self.spherical.to_offset()
    }

    pub fn polar_range(&self) -> (f64, f64) {
        let m = self.cfg.polar_margin_rad.max(0.0);
        ((FRAC_PI_2 - m).max(0.0), (FRAC_PI_2 + m).min(PI))
    }

    /// Auto-rotation per frame, in radians.
    pub fn auto_rotation_angle(&self) -> f64 {
        TAU / 60.0 / 60.0 * self.cfg.auto_rotate_speed
    }

    pub fn rotate_left(&mut self, angle: f64) {
        self.delta_theta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f64) {
        self.delta_phi -= angle;
    }

    pub fn begin_drag(&mut self, pos_px: [f64; 2]) {
        if !self.cfg.enable_rotate {
            return;
        }
        self.dragging = true;
        self.last_pos_px = pos_px;
    }

    pub fn drag_to(&mut self, pos_px: [f64; 2]) {
        if !self.dragging {
            return;
        }
        let dx = (pos_px[0] - self.last_pos_px[0]) * self.cfg.rotate_speed;
        let dy = (pos_px[1] - self.last_pos_px[1]) * self.cfg.rotate_speed;
        self.rotate_left(TAU * dx / self.viewport_height);
        self.rotate_up(TAU * dy / self.viewport_height);
        self.last_pos_px = pos_px;
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// Advance one frame and return the new eye position.
    pub fn update(&mut self) -> Vec3 {
        if self.cfg.auto_rotate && !self.dragging {
            self.rotate_left(self.auto_rotation_angle());
        }

        let damping = self.cfg.enable_damping;
        let factor = self.cfg.damping_factor.clamp(0.0, 1.0);
        if damping {
            self.spherical.theta += self.delta_theta * factor;
            self.spherical.phi += self.delta_phi * factor;
        } else {
            self.spherical.theta += self.delta_theta;
            self.spherical.phi += self.delta_phi;
        }

        // Keep theta bounded so long sessions don't lose precision.
        if self.spherical.theta > PI || self.spherical.theta < -PI {
            self.spherical.theta = (self.spherical.theta + PI).rem_euclid(TAU) - PI;
        }

        let (min_phi, max_phi) = self.polar_range();
        self.spherical.phi = self
            .spherical
            .phi
            .clamp(min_phi, max_phi)
            .clamp(POLE_EPS, PI - POLE_EPS);

        if damping {
            self.delta_theta *= 1.0 - factor;
            self.delta_phi *= 1.0 - factor;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
        }

        self.eye()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_auto() -> OrbitConfig {
        OrbitConfig {
            auto_rotate: false,
            ..OrbitConfig::default()
        }
    }

    #[test]
    fn spherical_round_trips_offset() {
        let v = Vec3::new(3.0, -4.0, 12.0);
        let back = Spherical::from_offset(v).to_offset();
        assert!((back - v).length() < 1e-9);
    }

    #[test]
    fn starts_on_positive_z() {
        let orbit = OrbitControls::new(no_auto(), 100.0);
        let eye = orbit.eye();
        assert!((eye - Vec3::new(0.0, 0.0, 100.0)).length() < 1e-9);
    }

    #[test]
    fn auto_rotate_speed_four_turns_once_per_fifteen_seconds() {
        let cfg = OrbitConfig {
            enable_damping: false,
            ..OrbitConfig::default()
        };
        let mut orbit = OrbitControls::new(cfg, 100.0);
        let start = orbit.spherical().theta;
        orbit.update();
        let step = orbit.spherical().theta - start;
        assert!((step + TAU / 900.0).abs() < 1e-12);
    }

    #[test]
    fn damping_spreads_rotation_over_frames() {
        let mut orbit = OrbitControls::new(no_auto(), 100.0);
        orbit.rotate_left(1.0);
        orbit.update();
        assert!((orbit.spherical().theta + 0.05).abs() < 1e-12);

        for _ in 0..500 {
            orbit.update();
        }
        // Geometric series converges to the full requested rotation.
        assert!((orbit.spherical().theta + 1.0).abs() < 1e-6);
    }

    #[test]
    fn polar_angle_is_clamped_to_margin() {
        let cfg = OrbitConfig {
            enable_damping: false,
            ..no_auto()
        };
        let mut orbit = OrbitControls::new(cfg, 100.0);
        orbit.rotate_up(3.0);
        orbit.update();
        let (min_phi, max_phi) = orbit.polar_range();
        assert!((orbit.spherical().phi - min_phi).abs() < 1e-12);

        orbit.rotate_up(-6.0);
        orbit.update();
        assert!((orbit.spherical().phi - max_phi).abs() < 1e-12);
    }

    #[test]
    fn drag_rotates_by_viewport_fraction() {
        let cfg = OrbitConfig {
            enable_damping: false,
            ..no_auto()
        };
        let mut orbit = OrbitControls::new(cfg, 100.0);
        orbit.set_viewport_height(600.0);
        orbit.begin_drag([100.0, 100.0]);
        orbit.drag_to([250.0, 100.0]);
        orbit.update();
        assert!((orbit.spherical().theta + TAU * 150.0 / 600.0).abs() < 1e-12);
        orbit.end_drag();
        assert!(!orbit.is_dragging());
    }

    #[test]
    fn auto_rotate_pauses_while_dragging() {
        let cfg = OrbitConfig {
            enable_damping: false,
            ..OrbitConfig::default()
        };
        let mut orbit = OrbitControls::new(cfg, 100.0);
        orbit.begin_drag([0.0, 0.0]);
        orbit.update();
        assert_eq!(orbit.spherical().theta, 0.0);
    }

    #[test]
    fn set_distance_moves_eye_radially() {
        let mut orbit = OrbitControls::new(no_auto(), 100.0);
        orbit.set_distance(140.0);
        assert!((orbit.update().length() - 140.0).abs() < 1e-9);
        orbit.set_distance(-1.0);
        assert_eq!(orbit.distance(), 140.0);
    }
}
