use std::path::PathBuf;

use thiserror::Error;

/// Everything that can stop a render.
///
/// [`QrGenError::Validation`] and [`QrGenError::Usage`] are raised before any
/// work starts and map to exit code 1; every other variant is a runtime
/// failure and maps to 2.
#[derive(Error, Debug)]
pub enum QrGenError {
    #[error("invalid color {spec:?}: expected 6 hex digits (RRGGBB)")]
    Format { spec: String },

    #[error(
        "QR code larger than background ({code_width}x{code_height} > {background_width}x{background_height})"
    )]
    Size {
        code_width: u32,
        code_height: u32,
        background_width: u32,
        background_height: u32,
    },

    #[error("{action} {}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{action} {}", .path.display())]
    Image {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("requested size {size}px exceeds the {max}px limit")]
    TooLarge { size: u32, max: u32 },

    #[error("cannot encode PNG")]
    Png(#[source] image::ImageError),

    #[error("cannot encode QR code")]
    Encode(#[from] qrcode::types::QrError),

    #[error("{0}")]
    Validation(String),

    /// Malformed command line; reported with the usage text.
    #[error("{0}")]
    Usage(String),
}

impl QrGenError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            QrGenError::Validation(_) | QrGenError::Usage(_) => 1,
            _ => 2,
        }
    }
}

pub type Result<T> = std::result::Result<T, QrGenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(QrGenError::Validation("bad".into()).exit_code(), 1);
        assert_eq!(QrGenError::Usage("two contents".into()).exit_code(), 1);
        assert_eq!(QrGenError::TooLarge { size: 9_000, max: 8_192 }.exit_code(), 2);
        assert_eq!(QrGenError::Format { spec: "zz".into() }.exit_code(), 2);
        let io = QrGenError::Io {
            action: "cannot open background",
            path: PathBuf::from("missing.png"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert_eq!(io.exit_code(), 2);
        assert_eq!(io.to_string(), "cannot open background missing.png");
    }

    #[test]
    fn test_size_error_message() {
        let err = QrGenError::Size {
            code_width: 300,
            code_height: 300,
            background_width: 200,
            background_height: 100,
        };
        assert_eq!(
            err.to_string(),
            "QR code larger than background (300x300 > 200x100)"
        );
    }
}
