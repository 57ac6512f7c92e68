//! QR symbol rasterization.
//!
//! Symbol construction is left to the [`qrcode`] crate; this module turns
//! the module grid into an RGBA square of a requested pixel size, with a
//! four-module quiet zone and a uniform integer scale per module.

use image::{ImageBuffer, Rgba, RgbaImage};
use qrcode::{Color, EcLevel, QrCode};

use crate::error::{QrGenError, Result};

/// Width of the quiet zone around the symbol, in modules.
pub const QUIET_ZONE: u32 = 4;

/// Largest side length `encode` will allocate, in pixels.
pub const MAX_SIZE: u32 = 8_192;

/// Error correction level for a QR code.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
pub enum ErrorLevel {
    /// Tolerates ~7% erroneous codewords.
    Low,
    /// Tolerates ~15% erroneous codewords.
    #[default]
    Medium,
    /// Tolerates ~25% erroneous codewords.
    Quartile,
    /// Tolerates ~30% erroneous codewords.
    High,
}

impl TryFrom<i64> for ErrorLevel {
    type Error = QrGenError;

    fn try_from(level: i64) -> Result<Self> {
        use ErrorLevel::*;
        match level {
            0 => Ok(Low),
            1 => Ok(Medium),
            2 => Ok(Quartile),
            3 => Ok(High),
            _ => Err(QrGenError::Validation(
                "invalid error tolerance level (-level)\n\
                 allowed: 0 (Level-L), 1 (Level-M), 2 (Level-Q), 3 (Level-H)"
                    .to_string(),
            )),
        }
    }
}

impl From<ErrorLevel> for EcLevel {
    fn from(level: ErrorLevel) -> Self {
        match level {
            ErrorLevel::Low => EcLevel::L,
            ErrorLevel::Medium => EcLevel::M,
            ErrorLevel::Quartile => EcLevel::Q,
            ErrorLevel::High => EcLevel::H,
        }
    }
}

/// Pixel layout of a rendered symbol.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Layout {
    /// Final side length in pixels.
    pub size: u32,
    /// Symbol width including quiet zone, in modules.
    pub modules: u32,
    /// Pixels per module.
    pub scale: u32,
    /// Blank margin before the first module on each axis.
    pub offset: u32,
}

impl Layout {
    /// Fits `symbol_width` modules plus quiet zone into `requested` pixels.
    ///
    /// A request smaller than one pixel per module is raised to that minimum.
    /// Leftover pixels are split around the symbol, extra pixel on the far side.
    pub fn new(symbol_width: u32, requested: u32) -> Self {
        let modules = symbol_width + 2 * QUIET_ZONE;
        let size = requested.max(modules);
        let scale = size / modules;
        Layout {
            size,
            modules,
            scale,
            offset: (size - modules * scale) / 2,
        }
    }

    /// Maps a pixel coordinate to a symbol module coordinate, if it lands on one.
    fn module_at(&self, px: u32) -> Option<u32> {
        let rel = px.checked_sub(self.offset)?;
        let module = rel / self.scale;
        if module < QUIET_ZONE || module >= self.modules - QUIET_ZONE {
            return None;
        }
        Some(module - QUIET_ZONE)
    }
}

/// Encodes `content` and renders it into a `size`×`size` RGBA image.
///
/// Dark modules are painted `foreground`, everything else `background`.
///
/// # Errors
///
/// Returns [`QrGenError::Encode`] when the content does not fit any QR version
/// and [`QrGenError::TooLarge`] when the square would exceed [`MAX_SIZE`].
///
/// # Example
///
/// ```rust
/// use image::Rgba;
/// use qrgen::encoder::{encode, ErrorLevel};
///
/// let white = Rgba([255, 255, 255, 255]);
/// let black = Rgba([0, 0, 0, 255]);
/// let img = encode("hello", ErrorLevel::Medium, 100, white, black).unwrap();
/// assert_eq!(img.dimensions(), (100, 100));
/// ```
pub fn encode(
    content: &str,
    level: ErrorLevel,
    size: u32,
    background: Rgba<u8>,
    foreground: Rgba<u8>,
) -> Result<RgbaImage> {
    let qr = QrCode::with_error_correction_level(content.as_bytes(), level.into())?;
    let width = qr.width() as u32;
    let colors = qr.to_colors();
    let layout = Layout::new(width, size);
    if layout.size > MAX_SIZE {
        return Err(QrGenError::TooLarge {
            size: layout.size,
            max: MAX_SIZE,
        });
    }
    tracing::debug!(
        modules = width,
        size = layout.size,
        scale = layout.scale,
        offset = layout.offset,
        ?level,
        "rendering QR symbol"
    );

    let img = ImageBuffer::from_fn(layout.size, layout.size, |x, y| {
        match (layout.module_at(x), layout.module_at(y)) {
            (Some(mx), Some(my)) if colors[(my * width + mx) as usize] == Color::Dark => {
                foreground
            }
            _ => background,
        }
    });
    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    fn decode(img: &RgbaImage) -> String {
        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
            img.width() as usize,
            img.height() as usize,
            |x, y| img.get_pixel(x as u32, y as u32).0[0],
        );
        let grids = prepared.detect_grids();
        assert_eq!(grids.len(), 1, "expected one QR code in the image");
        let (_, content) = grids[0].decode().unwrap();
        content
    }

    #[test]
    fn test_level_from_int() {
        assert_eq!(ErrorLevel::try_from(0).unwrap(), ErrorLevel::Low);
        assert_eq!(ErrorLevel::try_from(3).unwrap(), ErrorLevel::High);
        assert!(matches!(ErrorLevel::try_from(4), Err(QrGenError::Validation(_))));
        assert!(matches!(ErrorLevel::try_from(-1), Err(QrGenError::Validation(_))));
    }

    #[test]
    fn test_layout_centers_leftover() {
        // version 1 symbol: 21 modules + quiet zone = 29
        let layout = Layout::new(21, 100);
        assert_eq!(layout, Layout { size: 100, modules: 29, scale: 3, offset: 6 });
    }

    #[test]
    fn test_layout_raises_small_request() {
        let layout = Layout::new(21, 10);
        assert_eq!(layout.size, 29);
        assert_eq!(layout.scale, 1);
        assert_eq!(layout.offset, 0);
    }

    #[test]
    fn test_exact_requested_size() {
        let img = encode("hello", ErrorLevel::Medium, 100, WHITE, BLACK).unwrap();
        assert_eq!(img.dimensions(), (100, 100));
        // quiet zone
        assert_eq!(*img.get_pixel(0, 0), WHITE);
        assert_eq!(*img.get_pixel(99, 99), WHITE);
        // top-left finder pattern corner: offset 6 + 4 modules * 3 px
        assert_eq!(*img.get_pixel(18, 18), BLACK);
    }

    #[test]
    fn test_custom_colors() {
        let bg = Rgba([255, 255, 0, 255]);
        let fg = Rgba([0, 0, 128, 255]);
        let img = encode("hello", ErrorLevel::Low, 58, bg, fg).unwrap();
        assert!(img.pixels().all(|p| *p == bg || *p == fg));
        assert!(img.pixels().any(|p| *p == fg));
    }

    #[test]
    fn test_output_scans_back() {
        for level in [ErrorLevel::Low, ErrorLevel::Medium, ErrorLevel::Quartile, ErrorLevel::High] {
            let img = encode("hello", level, 200, WHITE, BLACK).unwrap();
            assert_eq!(decode(&img), "hello");
        }
    }

    #[test]
    fn test_size_limit() {
        assert_eq!(Layout::new(21, u32::MAX).size, u32::MAX);
        for size in [MAX_SIZE + 1, 4_000_000_000, u32::MAX] {
            let err = encode("hello", ErrorLevel::Low, size, WHITE, BLACK).unwrap_err();
            assert!(matches!(err, QrGenError::TooLarge { .. }), "{size}");
            assert_eq!(err.exit_code(), 2);
        }
    }

    #[test]
    fn test_content_too_long() {
        let content = "x".repeat(8000);
        let err = encode(&content, ErrorLevel::High, 100, WHITE, BLACK).unwrap_err();
        assert!(matches!(err, QrGenError::Encode(_)));
    }
}
