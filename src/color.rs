use image::Rgba;

use crate::error::{QrGenError, Result};

/// Parses an `RRGGBB` hex string into an opaque color.
///
/// No `#` prefix, no surrounding whitespace, exactly six hex digits.
///
/// ```rust
/// use qrgen::color::parse_color;
///
/// assert_eq!(parse_color("ff8000").unwrap().0, [255, 128, 0, 255]);
/// assert!(parse_color("#ff8000").is_err());
/// ```
pub fn parse_color(spec: &str) -> Result<Rgba<u8>> {
    let bytes = spec.as_bytes();
    // from_str_radix alone would let "+f" through
    if bytes.len() != 6 || !bytes.iter().all(u8::is_ascii_hexdigit) {
        return Err(QrGenError::Format {
            spec: spec.to_string(),
        });
    }
    let channel = |i: usize| {
        u8::from_str_radix(&spec[i..i + 2], 16).map_err(|_| QrGenError::Format {
            spec: spec.to_string(),
        })
    };
    Ok(Rgba([channel(0)?, channel(2)?, channel(4)?, 255]))
}
