use std::path::PathBuf;

use image::{Rgba, RgbaImage};

use crate::canvas::{load_background, paint_code};
use crate::encoder::{encode, ErrorLevel};
use crate::error::Result;
use crate::label::add_label;

/// Default label inset from the bottom-left corner, in pixels.
pub const DEFAULT_LABEL_MARGIN: i64 = 5;

/// Everything needed to produce one image.
#[derive(Clone, Debug)]
pub struct RenderOptions {
    /// QR payload.
    pub content: String,
    /// Requested side length of the code, in pixels.
    pub size: u32,
    pub level: ErrorLevel,
    /// Color of light modules and quiet zone.
    pub light: Rgba<u8>,
    /// Color of dark modules.
    pub dark: Rgba<u8>,
    /// PNG to composite the code onto; `None` emits the bare code.
    pub background: Option<PathBuf>,
    pub xshift: i64,
    pub yshift: i64,
    pub label: Option<String>,
    pub label_margin: i64,
}

impl RenderOptions {
    /// Black on white at medium error correction, no background, no label.
    pub fn new(content: impl Into<String>, size: u32) -> Self {
        RenderOptions {
            content: content.into(),
            size,
            level: ErrorLevel::default(),
            light: Rgba([255, 255, 255, 255]),
            dark: Rgba([0, 0, 0, 255]),
            background: None,
            xshift: 0,
            yshift: 0,
            label: None,
            label_margin: DEFAULT_LABEL_MARGIN,
        }
    }
}

/// Runs encode, composite and label in order and returns the final raster.
///
/// Nothing is written anywhere; a failure at any step leaves no output.
pub fn render(options: &RenderOptions) -> Result<RgbaImage> {
    let code = encode(
        &options.content,
        options.level,
        options.size,
        options.light,
        options.dark,
    )?;

    let mut canvas = match &options.background {
        Some(path) => {
            let mut canvas = load_background(path)?;
            paint_code(&mut canvas, &code, options.xshift, options.yshift)?;
            canvas
        }
        None => code,
    };

    if let Some(label) = &options.label {
        add_label(&mut canvas, label, options.label_margin);
    }
    tracing::info!(
        width = canvas.width(),
        height = canvas.height(),
        composited = options.background.is_some(),
        "rendered"
    );
    Ok(canvas)
}
