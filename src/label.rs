//! Contrast label stamped near the bottom-left corner.
//!
//! Text is set in the X11 misc-fixed 7×13 face from `embedded-graphics`,
//! written pixel by pixel with a single color: the negative of whatever
//! sits under the anchor point.

use std::convert::Infallible;

use embedded_graphics::mono_font::ascii::FONT_7X13;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use image::{Rgba, RgbaImage};

/// Horizontal advance per character.
pub const CELL_WIDTH: u32 = FONT_7X13.character_size.width + FONT_7X13.character_spacing;
/// Height of a character cell.
pub const CELL_HEIGHT: u32 = FONT_7X13.character_size.height;
/// Rows of a cell above the anchor row.
pub const ASCENT: u32 = FONT_7X13.baseline + 1;

/// Baseline start for a label inset `margin` pixels from the bottom-left corner.
pub fn anchor(canvas: &RgbaImage, margin: i64) -> (i64, i64) {
    (margin, i64::from(canvas.height()).saturating_sub(margin))
}

/// Negative of the pixel at `(x, y)`, fully opaque.
///
/// A point outside the canvas reads as transparent black, so the label
/// comes out white.
pub fn label_color(canvas: &RgbaImage, x: i64, y: i64) -> Rgba<u8> {
    let [r, g, b, _] = pixel_at(canvas, x, y).map_or([0; 4], |p| p.0);
    Rgba([255 - r, 255 - g, 255 - b, 255])
}

/// Writes `label` onto `canvas`, starting at the bottom-left anchor.
///
/// Glyph rows run from `ASCENT` pixels above the anchor row to the end of
/// the cell. No wrapping; anything past the canvas edge is dropped.
pub fn add_label(canvas: &mut RgbaImage, label: &str, margin: i64) {
    let (x, y) = anchor(canvas, margin);
    let color = label_color(canvas, x, y);
    tracing::debug!(x, y, ?color, label, "drawing label");

    let Some(top_left) = visible_origin(canvas, label, x, y) else {
        tracing::debug!(x, y, "label lies outside the canvas");
        return;
    };
    let style = MonoTextStyle::new(&FONT_7X13, BinaryColor::On);
    let mut target = Ink { canvas, color };
    // Infallible
    let _ = Text::with_baseline(label, top_left, style, Baseline::Top).draw(&mut target);
}

/// Top-left corner of the first cell, or `None` when no cell can touch the canvas.
fn visible_origin(canvas: &RgbaImage, label: &str, x: i64, y: i64) -> Option<Point> {
    let width = i64::try_from(label.chars().count())
        .unwrap_or(i64::MAX)
        .saturating_mul(i64::from(CELL_WIDTH));
    let top = y.saturating_sub(i64::from(ASCENT));
    let bottom = top.saturating_add(i64::from(CELL_HEIGHT));
    if x >= i64::from(canvas.width())
        || x.saturating_add(width) <= 0
        || top >= i64::from(canvas.height())
        || bottom <= 0
    {
        return None;
    }
    Some(Point::new(i32::try_from(x).ok()?, i32::try_from(top).ok()?))
}

/// Draw target that writes lit glyph pixels straight into an RGBA canvas.
struct Ink<'a> {
    canvas: &'a mut RgbaImage,
    color: Rgba<u8>,
}

impl OriginDimensions for Ink<'_> {
    fn size(&self) -> Size {
        Size::new(self.canvas.width(), self.canvas.height())
    }
}

impl DrawTarget for Ink<'_> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if color.is_on() {
                put_clipped(self.canvas, i64::from(point.x), i64::from(point.y), self.color);
            }
        }
        Ok(())
    }
}

fn pixel_at(canvas: &RgbaImage, x: i64, y: i64) -> Option<Rgba<u8>> {
    let x = u32::try_from(x).ok()?;
    let y = u32::try_from(y).ok()?;
    canvas.get_pixel_checked(x, y).copied()
}

fn put_clipped(canvas: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>) {
    let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
        return;
    };
    if let Some(px) = canvas.get_pixel_mut_checked(x, y) {
        *px = color;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREY: Rgba<u8> = Rgba([10, 100, 200, 255]);
    const GREY_INK: Rgba<u8> = Rgba([245, 155, 55, 255]);

    fn inked(canvas: &RgbaImage) -> Vec<(i64, i64)> {
        canvas
            .enumerate_pixels()
            .filter(|(_, _, p)| **p == GREY_INK)
            .map(|(x, y, _)| (i64::from(x), i64::from(y)))
            .collect()
    }

    #[test]
    fn test_font_metrics() {
        assert_eq!((CELL_WIDTH, CELL_HEIGHT, ASCENT), (7, 13, 11));
    }

    #[test]
    fn test_anchor_from_margin() {
        let canvas = RgbaImage::new(50, 40);
        assert_eq!(anchor(&canvas, 5), (5, 35));
        assert_eq!(anchor(&canvas, 0), (0, 40));
        assert_eq!(anchor(&canvas, i64::MIN), (i64::MIN, i64::MAX));
    }

    #[test]
    fn test_color_is_negative_of_anchor_pixel() {
        let mut canvas = RgbaImage::from_pixel(20, 20, GREY);
        canvas.put_pixel(3, 4, Rgba([1, 2, 3, 7]));
        assert_eq!(label_color(&canvas, 3, 4), Rgba([254, 253, 252, 255]));
        assert_eq!(label_color(&canvas, 0, 0), GREY_INK);
    }

    #[test]
    fn test_anchor_outside_canvas_gives_white() {
        let canvas = RgbaImage::from_pixel(20, 20, GREY);
        assert_eq!(label_color(&canvas, 0, 20), Rgba([255, 255, 255, 255]));
        assert_eq!(label_color(&canvas, -1, 3), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_label_ink_stays_in_its_cells() {
        let mut canvas = RgbaImage::from_pixel(60, 40, GREY);
        add_label(&mut canvas, "Hi!", 5);
        let ink = inked(&canvas);
        assert!(!ink.is_empty());
        let (width, ascent, height) = (i64::from(CELL_WIDTH), i64::from(ASCENT), i64::from(CELL_HEIGHT));
        for (x, y) in ink {
            assert!((5..5 + 3 * width).contains(&x), "x = {x}");
            assert!((35 - ascent..35 - ascent + height).contains(&y), "y = {y}");
        }
        assert!(canvas.pixels().all(|p| *p == GREY || *p == GREY_INK));
    }

    #[test]
    fn test_capitals_sit_on_the_anchor_row() {
        let mut canvas = RgbaImage::from_pixel(30, 40, GREY);
        add_label(&mut canvas, "H", 5);
        let lowest = inked(&canvas).into_iter().map(|(_, y)| y).max().unwrap();
        assert_eq!(lowest, 34);
    }

    #[test]
    fn test_full_cell_width_glyphs() {
        for text in ["*", "_"] {
            let mut canvas = RgbaImage::from_pixel(30, 40, GREY);
            add_label(&mut canvas, text, 5);
            assert!(!inked(&canvas).is_empty(), "{text:?} drew nothing");
        }
    }

    #[test]
    fn test_space_draws_nothing() {
        let mut canvas = RgbaImage::from_pixel(30, 30, GREY);
        add_label(&mut canvas, "   ", 5);
        assert!(canvas.pixels().all(|p| *p == GREY));
    }

    #[test]
    fn test_label_past_edge_is_clipped() {
        let mut canvas = RgbaImage::from_pixel(10, 10, GREY);
        add_label(&mut canvas, "WWWWWWWWWW", 2);
        add_label(&mut canvas, "W", -20);
        add_label(&mut canvas, "W", 40);
        assert!(canvas.pixels().any(|p| *p != GREY));
    }

    #[test]
    fn test_extreme_margins() {
        let mut canvas = RgbaImage::from_pixel(10, 10, GREY);
        for margin in [i64::MIN, i64::MIN + 1, i64::MAX, -1_000_000_000_000] {
            add_label(&mut canvas, "ab", margin);
        }
        assert!(canvas.pixels().all(|p| *p == GREY));
    }
}
