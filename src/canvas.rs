//! Background loading and code placement.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::{imageops, ImageFormat, RgbaImage};

use crate::error::{QrGenError, Result};

/// Opens a PNG background and returns an owned RGBA copy of it.
pub fn load_background(path: &Path) -> Result<RgbaImage> {
    let file = File::open(path).map_err(|source| QrGenError::Io {
        action: "cannot open background",
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = image::load(BufReader::new(file), ImageFormat::Png).map_err(|source| {
        QrGenError::Image {
            action: "cannot decode background",
            path: path.to_path_buf(),
            source,
        }
    })?;
    tracing::debug!(
        path = %path.display(),
        width = decoded.width(),
        height = decoded.height(),
        "loaded background"
    );
    Ok(decoded.to_rgba8())
}

/// Top-left corner for a `code`-sized rectangle centered on `background`, then shifted.
///
/// # Errors
///
/// [`QrGenError::Size`] if the code is wider or taller than the background.
pub fn placement(
    background: (u32, u32),
    code: (u32, u32),
    xshift: i64,
    yshift: i64,
) -> Result<(i64, i64)> {
    let (bw, bh) = background;
    let (fw, fh) = code;
    if fw > bw || fh > bh {
        return Err(QrGenError::Size {
            code_width: fw,
            code_height: fh,
            background_width: bw,
            background_height: bh,
        });
    }
    let x = i64::from((bw - fw) / 2).saturating_add(xshift);
    let y = i64::from((bh - fh) / 2).saturating_add(yshift);
    Ok((x, y))
}

/// Draws `code` over `canvas` at the centered, shifted position.
///
/// Blending is source-over; whatever falls outside the canvas after
/// shifting is clipped. Returns the origin used.
pub fn paint_code(
    canvas: &mut RgbaImage,
    code: &RgbaImage,
    xshift: i64,
    yshift: i64,
) -> Result<(i64, i64)> {
    let (x, y) = placement(canvas.dimensions(), code.dimensions(), xshift, yshift)?;
    if !overlaps(canvas.dimensions(), code.dimensions(), x, y) {
        tracing::warn!(x, y, "code shifted entirely off the background");
        return Ok((x, y));
    }
    tracing::debug!(x, y, "placing code on background");
    imageops::overlay(canvas, code, x, y);
    Ok((x, y))
}

fn overlaps(canvas: (u32, u32), code: (u32, u32), x: i64, y: i64) -> bool {
    x < i64::from(canvas.0)
        && y < i64::from(canvas.1)
        && x.saturating_add(i64::from(code.0)) > 0
        && y.saturating_add(i64::from(code.1)) > 0
}
