//! PNG encoding and delivery.
//!
//! The image is encoded into memory first so a failure never leaves a
//! truncated PNG behind on stdout or on disk.

use std::fs;
use std::io::{self, Cursor, Write};
use std::path::Path;

use image::{ImageFormat, RgbaImage};

use crate::error::{QrGenError, Result};

/// Encodes `img` as PNG bytes.
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .map_err(QrGenError::Png)?;
    Ok(buf.into_inner())
}

/// Writes encoded bytes to standard output and flushes.
pub fn write_stdout(png: &[u8]) -> Result<()> {
    let mut out = io::stdout().lock();
    out.write_all(png)
        .and_then(|()| out.flush())
        .map_err(|source| QrGenError::Io {
            action: "cannot write",
            path: "<stdout>".into(),
            source,
        })
}

/// Writes encoded bytes to `path`, replacing any existing file.
pub fn write_file(path: &Path, png: &[u8]) -> Result<()> {
    fs::write(path, png).map_err(|source| QrGenError::Io {
        action: "cannot write",
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = png.len(), "wrote PNG");
    Ok(())
}
