/// A decoded world bitmap: tightly packed RGBA8 rows, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapSample {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    BufferSize { expected: usize, actual: usize },
}

impl std::fmt::Display for MapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapError::BufferSize { expected, actual } => write!(
                f,
                "map buffer has {actual} bytes, expected {expected} (width * height * 4)"
            ),
        }
    }
}

impl std::error::Error for MapError {}

impl MapSample {
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, MapError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(MapError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A uniformly filled map, handy for tests and placeholders.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn rgba(&self) -> &[u8] {
        &self.data
    }

    /// Red channel at `(x, y)`. Callers clamp; out-of-range reads return 255
    /// (ocean).
    pub fn red(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 255;
        }
        let index = (y as usize * self.width as usize + x as usize) * 4;
        self.data[index]
    }

    pub fn set_rgba(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = (y as usize * self.width as usize + x as usize) * 4;
        self.data[index..index + 4].copy_from_slice(&rgba);
    }

    /// Fraction of pixels whose red channel is below `threshold`.
    pub fn dark_fraction(&self, threshold: u8) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let dark = self.data.chunks_exact(4).filter(|px| px[0] < threshold).count();
        dark as f64 / (self.width as f64 * self.height as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::{MapError, MapSample};

    #[test]
    fn rejects_mismatched_buffer() {
        let err = MapSample::from_rgba(2, 2, vec![0; 15]).unwrap_err();
        assert_eq!(
            err,
            MapError::BufferSize {
                expected: 16,
                actual: 15
            }
        );
    }

    #[test]
    fn reads_red_channel_row_major() {
        let mut map = MapSample::filled(3, 2, [255, 255, 255, 255]);
        map.set_rgba(2, 1, [10, 200, 200, 255]);
        assert_eq!(map.red(2, 1), 10);
        assert_eq!(map.red(1, 1), 255);
        assert_eq!(map.rgba()[(1 * 3 + 2) * 4], 10);
    }

    #[test]
    fn out_of_range_reads_as_ocean() {
        let map = MapSample::filled(2, 2, [0, 0, 0, 255]);
        assert_eq!(map.red(5, 0), 255);
    }

    #[test]
    fn dark_fraction_counts_red_below_threshold() {
        let mut map = MapSample::filled(2, 2, [255, 0, 0, 255]);
        map.set_rgba(0, 0, [79, 0, 0, 255]);
        map.set_rgba(1, 0, [80, 0, 0, 255]);
        assert_eq!(map.dark_fraction(80), 0.25);
        assert_eq!(MapSample::filled(0, 0, [0; 4]).dark_fraction(80), 0.0);
    }
}
