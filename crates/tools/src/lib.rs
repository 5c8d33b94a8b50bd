//! Offline helpers behind the `globe-tools` binary.

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use formats::{BakedDotField, DecodeError, bitmap_fingerprint, decode_bitmap};
use scene::{DotConfig, DotFieldParams, sample_dot_field};

/// Summary of a world bitmap as the globe would see it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapReport {
    pub width: u32,
    pub height: u32,
    /// Share of pixels whose red channel is below the land threshold.
    pub land_fraction: f64,
    pub dot_count: usize,
    pub fingerprint: String,
}

pub fn inspect_map(bytes: &[u8], dots: &DotConfig, seed: u64) -> Result<MapReport, DecodeError> {
    let map = decode_bitmap(bytes)?;
    let params = DotFieldParams::from(dots);
    let field = sample_dot_field(&map, &params, &mut StdRng::seed_from_u64(seed));
    Ok(MapReport {
        width: map.width(),
        height: map.height(),
        land_fraction: map.dark_fraction(params.land_threshold),
        dot_count: field.len(),
        fingerprint: bitmap_fingerprint(bytes),
    })
}

pub fn bake_map(bytes: &[u8], dots: &DotConfig, seed: u64) -> Result<BakedDotField, DecodeError> {
    let map = decode_bitmap(bytes)?;
    let params = DotFieldParams::from(dots);
    let field = sample_dot_field(&map, &params, &mut StdRng::seed_from_u64(seed));
    tracing::info!(dots = field.len(), seed, "baked dot field");
    Ok(BakedDotField::new(
        bitmap_fingerprint(bytes),
        (map.width(), map.height()),
        seed,
        &params,
        &field,
    ))
}
