//! Baked dot fields: the sampler's output written to JSON so a map can be
//! inspected or diffed without a browser.

use std::fmt;

use serde::{Deserialize, Serialize};

use scene::{DotField, DotFieldParams};

pub const BAKE_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BakedParams {
    pub radius: f64,
    pub density: f64,
    pub land_threshold: u8,
    pub lat_step_deg: f64,
}

impl From<&DotFieldParams> for BakedParams {
    fn from(p: &DotFieldParams) -> Self {
        Self {
            radius: p.radius,
            density: p.density,
            land_threshold: p.land_threshold,
            lat_step_deg: p.lat_step_deg,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BakedDot {
    pub lat: f64,
    pub lon: f64,
    pub position: [f32; 3],
    pub phase: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BakedDotField {
    pub version: String,
    /// blake3 of the encoded source bitmap.
    pub source_hash: String,
    pub width: u32,
    pub height: u32,
    pub seed: u64,
    pub params: BakedParams,
    pub dots: Vec<BakedDot>,
}

#[derive(Debug)]
pub enum BakeError {
    Parse(serde_json::Error),
    UnsupportedVersion { found: String },
}

impl fmt::Display for BakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BakeError::Parse(err) => write!(f, "baked dot field parse error: {err}"),
            BakeError::UnsupportedVersion { found } => {
                write!(f, "unsupported baked dot field version: {found}")
            }
        }
    }
}

impl std::error::Error for BakeError {}

impl BakedDotField {
    pub fn new(
        source_hash: impl Into<String>,
        size: (u32, u32),
        seed: u64,
        params: &DotFieldParams,
        field: &DotField,
    ) -> Self {
        let dots = field
            .iter()
            .map(|d| BakedDot {
                lat: d.coord.lat_deg,
                lon: d.coord.lon_deg,
                position: d.position.to_f32(),
                phase: d.phase as f32,
            })
            .collect();
        Self {
            version: BAKE_VERSION.to_string(),
            source_hash: source_hash.into(),
            width: size.0,
            height: size.1,
            seed,
            params: BakedParams::from(params),
            dots,
        }
    }

    pub fn to_json(&self) -> Result<String, BakeError> {
        serde_json::to_string_pretty(self).map_err(BakeError::Parse)
    }

    pub fn from_json(text: &str) -> Result<Self, BakeError> {
        let baked: BakedDotField = serde_json::from_str(text).map_err(BakeError::Parse)?;
        if baked.version != BAKE_VERSION {
            return Err(BakeError::UnsupportedVersion {
                found: baked.version,
            });
        }
        Ok(baked)
    }
}
