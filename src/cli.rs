//! Command-line surface.
//!
//! Flags follow the single-dash long form (`-size 100`, `-level=2`); double
//! dashes work too. Arguments are rewritten to clap's `--flag` form before
//! parsing.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, CommandFactory, FromArgMatches, Parser};

use crate::color::parse_color;
use crate::encoder::ErrorLevel;
use crate::error::{QrGenError, Result};
use crate::pipeline::{RenderOptions, DEFAULT_LABEL_MARGIN};

/// Release number shown in the usage banner.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build identifier injected at compile time through `QRGEN_BUILD_HASH`.
pub const BUILD_HASH: &str = match option_env!("QRGEN_BUILD_HASH") {
    Some(hash) => hash,
    None => "dev",
};

const NOTE: &str = "NOTE: result will be written to STDOUT unless -out is given";

/// Flags that take a separate value.
const VALUE_FLAGS: &[&str] = &[
    "bg", "size", "level", "xshift", "yshift", "mshift", "bgcolor", "fgcolor", "mark", "out",
];

/// Flags that stand alone.
const SWITCH_FLAGS: &[&str] = &["debug", "help"];

#[derive(Parser, Debug)]
#[command(
    name = "qrgen",
    override_usage = "qrgen [options] <code-content>",
    after_help = NOTE,
    disable_version_flag = true
)]
pub struct Cli {
    /// background image (PNG)
    #[arg(
        long,
        value_name = "PATH",
        default_value = "",
        hide_default_value = true,
        allow_hyphen_values = true
    )]
    pub bg: String,

    /// size of QR code in pixels
    #[arg(long, value_name = "N", default_value_t = 0, allow_negative_numbers = true)]
    pub size: i64,

    /// error tolerance level (0~3)
    #[arg(long, value_name = "N", default_value_t = 1, allow_negative_numbers = true)]
    pub level: i64,

    /// x-shift away from center
    #[arg(long, value_name = "N", default_value_t = 0, allow_negative_numbers = true)]
    pub xshift: i64,

    /// y-shift away from center
    #[arg(long, value_name = "N", default_value_t = 0, allow_negative_numbers = true)]
    pub yshift: i64,

    /// shift of label against bottom-left corner
    #[arg(long, value_name = "N", default_value_t = DEFAULT_LABEL_MARGIN, allow_negative_numbers = true)]
    pub mshift: i64,

    /// background color for QR code
    #[arg(long, value_name = "RRGGBB", default_value = "ffffff", allow_hyphen_values = true)]
    pub bgcolor: String,

    /// foreground color for QR code
    #[arg(long, value_name = "RRGGBB", default_value = "000000", allow_hyphen_values = true)]
    pub fgcolor: String,

    /// mark text (always appear at bottom-left corner)
    #[arg(
        long,
        value_name = "TEXT",
        default_value = "",
        hide_default_value = true,
        allow_hyphen_values = true
    )]
    pub mark: String,

    /// write the PNG to this file instead of STDOUT
    #[arg(long, value_name = "PATH", allow_hyphen_values = true)]
    pub out: Option<PathBuf>,

    /// show error chain and backtrace on error
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    pub debug: bool,

    #[arg(value_name = "code-content")]
    pub content: Vec<String>,
}

/// First line of the usage text.
pub fn banner() -> String {
    format!("QR Code Generator V{VERSION}.{BUILD_HASH}")
}

/// The clap command with the version banner attached.
pub fn command() -> clap::Command {
    Cli::command().before_help(banner())
}

/// Parses a full argv (program name first).
pub fn parse_from<I, T>(args: I) -> std::result::Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let matches = command().try_get_matches_from(normalize_args(args))?;
    Cli::from_arg_matches(&matches)
}

/// Rewrites `-flag` / `-flag=value` into `--flag` / `--flag=value` for known flags.
///
/// The program name, anything after `--`, the value following a flag that
/// takes one, negative numbers and unknown words pass through untouched.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut verbatim = false;
    let mut value_next = false;
    args.into_iter()
        .enumerate()
        .map(|(i, arg)| {
            let arg: OsString = arg.into();
            if i == 0 || verbatim || std::mem::take(&mut value_next) {
                return arg;
            }
            if arg == "--" {
                verbatim = true;
                return arg;
            }
            let Some(text) = arg.to_str().map(str::to_owned) else {
                return arg;
            };
            let Some(flag) = known_flag(&text) else {
                return arg;
            };
            value_next = flag.takes_value && !flag.inline_value;
            if flag.single_dash {
                format!("-{text}").into()
            } else {
                arg
            }
        })
        .collect()
}

struct KnownFlag {
    single_dash: bool,
    takes_value: bool,
    inline_value: bool,
}

/// Recognises `-name`, `--name` and their `=value` forms.
fn known_flag(arg: &str) -> Option<KnownFlag> {
    let (rest, single_dash) = match arg.strip_prefix("--") {
        Some(rest) => (rest, false),
        None => (arg.strip_prefix('-')?, true),
    };
    let (name, inline_value) = match rest.split_once('=') {
        Some((name, _)) => (name, true),
        None => (rest, false),
    };
    let takes_value = VALUE_FLAGS.contains(&name);
    if !takes_value && !SWITCH_FLAGS.contains(&name) {
        return None;
    }
    Some(KnownFlag {
        single_dash,
        takes_value,
        inline_value,
    })
}

impl Cli {
    /// Checks flag values in order: level, size, then positional count.
    pub fn validate(&self) -> Result<()> {
        ErrorLevel::try_from(self.level)?;
        if self.size <= 0 || u32::try_from(self.size).is_err() {
            return Err(QrGenError::Validation(
                "size of code invalid or not specified (-size)".to_string(),
            ));
        }
        if self.content.len() != 1 {
            return Err(QrGenError::Usage(format!(
                "expected exactly one <code-content> argument, got {}",
                self.content.len()
            )));
        }
        Ok(())
    }

    /// Validates and converts into pipeline options.
    ///
    /// Color strings are parsed here, so a bad color is a
    /// [`QrGenError::Format`] rather than a validation failure.
    pub fn to_options(&self) -> Result<RenderOptions> {
        self.validate()?;
        let size = u32::try_from(self.size)
            .map_err(|_| QrGenError::Validation("size of code out of range (-size)".to_string()))?;
        let mut options = RenderOptions::new(self.content[0].clone(), size);
        options.level = ErrorLevel::try_from(self.level)?;
        options.light = parse_color(&self.bgcolor)?;
        options.dark = parse_color(&self.fgcolor)?;
        options.background = (!self.bg.is_empty()).then(|| PathBuf::from(&self.bg));
        options.xshift = self.xshift;
        options.yshift = self.yshift;
        options.label = (!self.mark.is_empty()).then(|| self.mark.clone());
        options.label_margin = self.mshift;
        Ok(options)
    }
}
