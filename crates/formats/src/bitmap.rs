use std::fmt;

use scene::{MapError, MapSample};

#[derive(Debug)]
pub enum DecodeError {
    Image(image::ImageError),
    Map(MapError),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Image(err) => write!(f, "bitmap decode error: {err}"),
            DecodeError::Map(err) => write!(f, "bitmap layout error: {err}"),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::Image(err) => Some(err),
            DecodeError::Map(err) => Some(err),
        }
    }
}

/// Decode a PNG or JPEG world bitmap into RGBA8.
pub fn decode_bitmap(bytes: &[u8]) -> Result<MapSample, DecodeError> {
    let rgba = image::load_from_memory(bytes)
        .map_err(DecodeError::Image)?
        .to_rgba8();
    let (width, height) = rgba.dimensions();
    let map = MapSample::from_rgba(width, height, rgba.into_raw()).map_err(DecodeError::Map)?;
    tracing::debug!(width, height, bytes = bytes.len(), "decoded bitmap");
    Ok(map)
}

/// Content fingerprint of the encoded bitmap.
pub fn bitmap_fingerprint(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode_png(width: u32, height: u32, px: impl Fn(u32, u32) -> [u8; 4]) -> Vec<u8> {
        let img = image::RgbaImage::from_fn(width, height, |x, y| image::Rgba(px(x, y)));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png)
            .expect("encode png");
        out.into_inner()
    }

    #[test]
    fn decodes_png_pixels() {
        let bytes = encode_png(4, 2, |x, _| if x < 2 { [0, 0, 0, 255] } else { [255; 4] });
        let map = decode_bitmap(&bytes).expect("decode");
        assert_eq!((map.width(), map.height()), (4, 2));
        assert_eq!(map.red(0, 0), 0);
        assert_eq!(map.red(3, 1), 255);
        assert_eq!(map.dark_fraction(80), 0.5);
    }

    #[test]
    fn rejects_garbage() {
        let err = decode_bitmap(b"definitely not an image").unwrap_err();
        assert!(matches!(err, DecodeError::Image(_)));
        assert!(err.to_string().starts_with("bitmap decode error"));
    }

    #[test]
    fn fingerprint_is_stable_hex() {
        let a = bitmap_fingerprint(b"world");
        assert_eq!(a.len(), 64);
        assert_eq!(a, bitmap_fingerprint(b"world"));
        assert_ne!(a, bitmap_fingerprint(b"world!"));
    }
}
