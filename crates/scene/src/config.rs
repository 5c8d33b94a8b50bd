//! Globe configuration.
//!
//! Every tunable the viewer uses lives here with a documented default. The
//! viewer accepts an optional JSON document at mount time; omitted fields
//! keep their defaults.

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Json(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Json(msg) => write!(f, "invalid globe config json: {msg}"),
            ConfigError::Invalid(msg) => write!(f, "invalid globe config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    /// Relative URL of the world bitmap (dark = land).
    pub map_url: String,
    pub camera: CameraConfig,
    pub orbit: OrbitConfig,
    pub base_sphere: BaseSphereConfig,
    pub dots: DotConfig,
    pub lights: LightConfig,
    pub interaction: InteractionConfig,
    pub clock: ClockConfig,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            map_url: "./assets/images/world_alpha_mini.jpg".to_string(),
            camera: CameraConfig::default(),
            orbit: OrbitConfig::default(),
            base_sphere: BaseSphereConfig::default(),
            dots: DotConfig::default(),
            lights: LightConfig::default(),
            interaction: InteractionConfig::default(),
            clock: ClockConfig::default(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_y_deg: f64,
    pub near: f64,
    pub far: f64,
    /// Window inner width (CSS px) above which the camera moves closer.
    pub breakpoint_px: f64,
    /// Camera distance for wide viewports.
    pub near_distance: f64,
    /// Camera distance for narrow viewports.
    pub far_distance: f64,
    /// Cap on `devicePixelRatio`.
    pub max_pixel_ratio: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_deg: 30.0,
            near: 1.0,
            far: 1000.0,
            breakpoint_px: 700.0,
            near_distance: 100.0,
            far_distance: 140.0,
            max_pixel_ratio: 2.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    pub auto_rotate: bool,
    /// 4.0 = one revolution every 15 s at 60 fps.
    pub auto_rotate_speed: f64,
    pub enable_damping: bool,
    pub damping_factor: f64,
    pub enable_rotate: bool,
    pub rotate_speed: f64,
    /// Allowed polar deviation from the equator (radians, symmetric).
    pub polar_margin_rad: f64,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            auto_rotate: true,
            auto_rotate_speed: 4.0,
            enable_damping: true,
            damping_factor: 0.05,
            enable_rotate: true,
            rotate_speed: 1.0,
            polar_margin_rad: 0.5,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BaseSphereConfig {
    /// Radius of the pickable, lit core sphere.
    pub radius: f64,
    pub segments: u32,
    /// sRGB hex color.
    pub color: u32,
    pub opacity: f32,
}

impl Default for BaseSphereConfig {
    fn default() -> Self {
        Self {
            radius: 22.0,
            segments: 50,
            color: 0x030a0d,
            opacity: 0.95,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DotConfig {
    /// Radius of the sphere the dots sit on.
    pub sphere_radius: f64,
    /// Dots per unit of ring circumference.
    pub density: f64,
    /// Red channel strictly below this counts as land.
    pub land_threshold: u8,
    pub lat_step_deg: f64,
    /// Disc radius of a single dot.
    pub dot_radius: f32,
    pub dot_segments: u32,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            sphere_radius: 24.0,
            density: 2.5,
            land_threshold: 80,
            lat_step_deg: 1.0,
            dot_radius: 0.12,
            dot_segments: 5,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub point_color: u32,
    pub point_intensity: f32,
    /// Range after which the point light contributes nothing.
    pub point_distance: f32,
    pub point_position: [f32; 3],
    pub sky_color: u32,
    pub ground_color: u32,
    pub hemisphere_intensity: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            point_color: 0x081b26,
            point_intensity: 12.0,
            point_distance: 200.0,
            point_position: [-50.0, 0.0, 60.0],
            sky_color: 0x88ccff,
            ground_color: 0x050810,
            hemisphere_intensity: 0.8,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub rest_extrusion: f64,
    pub pressed_extrusion: f64,
    pub press_duration_s: f64,
    pub release_duration_s: f64,
    /// Minimum time the globe stays pressed, however short the tap.
    pub min_press_s: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            rest_extrusion: 1.0,
            pressed_extrusion: 1.07,
            press_duration_s: 0.5,
            release_duration_s: 0.15,
            min_press_s: 0.5,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    pub start_phase: f64,
    pub phase_per_frame: f64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            start_phase: 1.0,
            phase_per_frame: 0.03,
        }
    }
}

impl GlobeConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let cfg: GlobeConfig =
            serde_json::from_str(text).map_err(|e| ConfigError::Json(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let d = &self.dots;
        if !(d.sphere_radius > 0.0) {
            return Err(ConfigError::Invalid("dots.sphere_radius must be > 0".into()));
        }
        if !(d.density > 0.0) {
            return Err(ConfigError::Invalid("dots.density must be > 0".into()));
        }
        if !(d.lat_step_deg > 0.0 && d.lat_step_deg <= 90.0) {
            return Err(ConfigError::Invalid(
                "dots.lat_step_deg must be in (0, 90]".into(),
            ));
        }
        if !(self.base_sphere.radius > 0.0) {
            return Err(ConfigError::Invalid("base_sphere.radius must be > 0".into()));
        }
        let c = &self.camera;
        if !(c.near > 0.0 && c.far > c.near) {
            return Err(ConfigError::Invalid("camera needs 0 < near < far".into()));
        }
        if !(c.fov_y_deg > 0.0 && c.fov_y_deg < 180.0) {
            return Err(ConfigError::Invalid("camera.fov_y_deg must be in (0, 180)".into()));
        }
        let i = &self.interaction;
        if i.min_press_s < 0.0 || i.press_duration_s < 0.0 || i.release_duration_s < 0.0 {
            return Err(ConfigError::Invalid(
                "interaction durations must be >= 0".into(),
            ));
        }
        Ok(())
    }
}

/// Normalized RGB from a `0xRRGGBB` color.
pub fn rgb_from_hex(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}
