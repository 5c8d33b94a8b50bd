//! Dot-field sampling: turn a world bitmap into land dots on a sphere.
//!
//! Latitudes are walked pole to pole in fixed steps. Each latitude ring gets
//! a number of candidate longitudes proportional to its circumference, so
//! dots stay evenly spaced on the sphere. A candidate is kept when the map
//! says "land" anywhere in a 3x3 pixel neighborhood around it.

use foundation::math::{LatLon, Vec3, lat_lon_to_position, ring_circumference};
use rand::Rng;

use crate::config::DotConfig;
use crate::map::MapSample;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DotFieldParams {
    pub radius: f64,
    pub density: f64,
    pub land_threshold: u8,
    pub lat_step_deg: f64,
}

impl Default for DotFieldParams {
    fn default() -> Self {
        Self::from(&DotConfig::default())
    }
}

impl From<&DotConfig> for DotFieldParams {
    fn from(cfg: &DotConfig) -> Self {
        Self {
            radius: cfg.sphere_radius,
            density: cfg.density,
            land_threshold: cfg.land_threshold,
            lat_step_deg: cfg.lat_step_deg,
        }
    }
}

/// Candidate longitudes for one latitude ring.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RingSampling {
    pub lat_deg: f64,
    /// Number of candidates (`ceil` of the fractional budget).
    pub count: usize,
    /// Longitude spacing in degrees; 0 when `count` is 0.
    pub step_deg: f64,
}

impl RingSampling {
    pub fn longitude(&self, i: usize) -> f64 {
        -180.0 + i as f64 * self.step_deg
    }
}

/// Rings thinner than this budget are treated as empty.
const MIN_RING_BUDGET: f64 = 1e-9;

pub fn ring_sampling(lat_deg: f64, radius: f64, density: f64) -> RingSampling {
    let budget = if lat_deg.abs() >= 90.0 {
        0.0
    } else {
        ring_circumference(lat_deg, radius) * density
    };

    if !(budget > MIN_RING_BUDGET) {
        return RingSampling {
            lat_deg,
            count: 0,
            step_deg: 0.0,
        };
    }

    RingSampling {
        lat_deg,
        count: budget.ceil() as usize,
        step_deg: 360.0 / budget,
    }
}

/// Latitudes from +90 down to -90 (inclusive when the step divides 180).
pub fn latitudes(step_deg: f64) -> impl Iterator<Item = f64> {
    let steps = if step_deg > 0.0 {
        (180.0 / step_deg).floor() as u32
    } else {
        0
    };
    (0..=steps).map(move |i| 90.0 - i as f64 * step_deg)
}

/// Bitmap pixel for a lon/lat, clamped to the image.
pub fn pixel_for(map: &MapSample, coord: LatLon) -> (u32, u32) {
    let w = map.width() as f64;
    let h = map.height() as f64;
    let x = (((coord.lon_deg + 180.0) / 360.0) * w).floor();
    let y = (((90.0 - coord.lat_deg) / 180.0) * h).floor();
    (clamp_px(x, map.width()), clamp_px(y, map.height()))
}

fn clamp_px(v: f64, size: u32) -> u32 {
    let max = size.saturating_sub(1) as f64;
    v.max(0.0).min(max) as u32
}

/// True when any pixel in the clamped 3x3 neighborhood of `(x, y)` has a red
/// channel below `threshold`.
pub fn neighborhood_has_land(map: &MapSample, x: u32, y: u32, threshold: u8) -> bool {
    if map.is_empty() {
        return false;
    }
    let max_x = map.width() as i64 - 1;
    let max_y = map.height() as i64 - 1;
    for dx in -1i64..=1 {
        for dy in -1i64..=1 {
            let sx = (x as i64 + dx).clamp(0, max_x) as u32;
            let sy = (y as i64 + dy).clamp(0, max_y) as u32;
            if map.red(sx, sy) < threshold {
                return true;
            }
        }
    }
    false
}

pub fn is_land(map: &MapSample, coord: LatLon, threshold: u8) -> bool {
    if map.is_empty() {
        return false;
    }
    let (x, y) = pixel_for(map, coord);
    neighborhood_has_land(map, x, y, threshold)
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Dot {
    pub coord: LatLon,
    pub position: Vec3,
    /// Animation phase offset in `[0, 2π)`.
    pub phase: f64,
}

/// Ordered, immutable set of dots. Index `i` is instance `i` on the GPU.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DotField {
    dots: Vec<Dot>,
}

impl DotField {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }

    pub fn len(&self) -> usize {
        self.dots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dots.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Dot> {
        self.dots.iter()
    }
}

/// Sample the land dots of `map`.
pub fn sample_dot_field<R>(map: &MapSample, params: &DotFieldParams, rng: &mut R) -> DotField
where
    R: Rng + ?Sized,
{
    let mut dots = Vec::new();
    if map.is_empty() {
        return DotField { dots };
    }

    let mut candidates = 0usize;
    for lat in latitudes(params.lat_step_deg) {
        let ring = ring_sampling(lat, params.radius, params.density);
        candidates += ring.count;
        for i in 0..ring.count {
            let coord = LatLon::new(lat, ring.longitude(i));
            if !is_land(map, coord, params.land_threshold) {
                continue;
            }
            dots.push(Dot {
                coord,
                position: lat_lon_to_position(coord, params.radius),
                phase: rng.gen_range(0.0..std::f64::consts::TAU),
            });
        }
    }

    tracing::debug!(
        width = map.width(),
        height = map.height(),
        candidates,
        dots = dots.len(),
        "sampled dot field"
    );
    DotField { dots }
}
