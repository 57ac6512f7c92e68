//! # qrgen
//!
//! Generates QR code PNGs, optionally centered on a background image and
//! stamped with a short label.
//!
//! `qrgen` is a small pipeline: the payload is encoded into an RGBA square of
//! the requested size, composited onto a background PNG at a shifted center
//! position, and marked near the bottom-left corner with text drawn in the
//! negative of the pixel beneath it. The result is encoded as PNG in memory
//! and only then written out, so callers get either a whole image or nothing.
//!
//! ## Features
//!
//! - Four error correction levels: Low, Medium, Quartile, High.
//! - Exact output size with integer module scaling and a 4-module quiet zone.
//! - Custom light/dark module colors from `RRGGBB` strings.
//! - Source-over compositing onto a PNG background with x/y shifts.
//! - Bitmap text label that always contrasts with what is under it.
//!
//! ## Example
//!
//! Render a labelled code without a background:
//!
//! ```rust
//! use qrgen::pipeline::{render, RenderOptions};
//!
//! let mut options = RenderOptions::new("https://example.com", 160);
//! options.label = Some("v1".to_string());
//! let img = render(&options).unwrap();
//! assert_eq!(img.dimensions(), (160, 160));
//!
//! let png = qrgen::output::encode_png(&img).unwrap();
//! assert!(png.starts_with(b"\x89PNG"));
//! ```
//!
//! ## Modules
//!
//! - [`encoder`]: QR symbol to RGBA raster.
//! - [`canvas`]: background loading and code placement.
//! - [`label`]: contrast label drawing.
//! - [`color`]: hex color parsing.
//! - [`pipeline`]: the steps above wired together.
//! - [`output`]: PNG encoding and writing.
//! - [`cli`]: command-line flags.

pub mod canvas;
pub mod cli;
pub mod color;
pub mod encoder;
pub mod error;
pub mod label;
pub mod output;
pub mod pipeline;

pub use error::{QrGenError, Result};
