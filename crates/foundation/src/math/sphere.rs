use super::Vec3;

/// Geographic coordinates in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LatLon {
    pub lat_deg: f64,
    pub lon_deg: f64,
}

impl LatLon {
    pub fn new(lat_deg: f64, lon_deg: f64) -> Self {
        Self { lat_deg, lon_deg }
    }
}

/// Place a lat/lon on a sphere of `radius` centered at the origin.
///
/// Uses the physics convention: the polar angle is measured from +Y
/// (`90° - lat`) and the azimuth is `lon + 180°`. Longitude 0 lands on +X,
/// 90°E on -Z.
pub fn lat_lon_to_position(coord: LatLon, radius: f64) -> Vec3 {
    let polar = (90.0 - coord.lat_deg).to_radians();
    let azimuth = (coord.lon_deg + 180.0).to_radians();

    let sin_polar = polar.sin();
    Vec3::new(
        -(radius * sin_polar * azimuth.cos()),
        radius * polar.cos(),
        radius * sin_polar * azimuth.sin(),
    )
}

/// Radius of the small circle at `lat_deg` on a sphere of `radius`.
pub fn ring_radius(lat_deg: f64, radius: f64) -> f64 {
    lat_deg.abs().to_radians().cos() * radius
}

/// Circumference of the small circle at `lat_deg`.
pub fn ring_circumference(lat_deg: f64, radius: f64) -> f64 {
    ring_radius(lat_deg, radius) * std::f64::consts::TAU
}
