use std::process::ExitCode;

use clap::error::ErrorKind;
use color_eyre::config::{HookBuilder, Theme};
use color_eyre::eyre::{Report, Result};
use qrgen::cli::{self, Cli};
use qrgen::error::QrGenError;
use qrgen::{output, pipeline};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = match cli::parse_from(std::env::args_os()) {
        Ok(cli) => cli,
        Err(err) => return usage_error(&err),
    };

    init_tracing(cli.debug);
    if cli.debug {
        // color-eyre only captures backtraces when asked to
        std::env::set_var("RUST_LIB_BACKTRACE", "1");
    }
    if let Err(err) = HookBuilder::default()
        .theme(Theme::new())
        .display_env_section(false)
        .capture_span_trace_by_default(false)
        .install()
    {
        println!("ERROR: {err}");
        return ExitCode::from(2);
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(report) => fail(&report, cli.debug),
    }
}

/// Logs go to stderr. `RUST_LOG` refines the warn default; `-debug` forces ours to debug.
fn init_tracing(debug: bool) {
    let mut filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    if debug {
        if let Ok(directive) = "qrgen=debug".parse() {
            filter = filter.add_directive(directive);
        }
    }
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let options = cli.to_options()?;
    let image = pipeline::render(&options)?;
    let png = output::encode_png(&image)?;
    match &cli.out {
        Some(path) => output::write_file(path, &png)?,
        None => output::write_stdout(&png)?,
    }
    Ok(())
}

/// Maps a failure to its exit code, printing to stdout.
///
/// Bad flag values print their bare message and a wrong argument count
/// prints the usage text. Anything else gets an `ERROR:` line.
fn fail(report: &Report, debug: bool) -> ExitCode {
    let kind = report.downcast_ref::<QrGenError>();
    match kind {
        Some(QrGenError::Validation(message)) => println!("{message}"),
        Some(QrGenError::Usage(_)) => print_usage(),
        _ if debug => println!("ERROR: {report:?}"),
        _ => {
            let chain: Vec<String> = report.chain().map(|err| err.to_string()).collect();
            println!("ERROR: {}", chain.join(": "));
        }
    }
    ExitCode::from(kind.map_or(2, QrGenError::exit_code))
}

fn usage_error(err: &clap::Error) -> ExitCode {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            print!("{}", err.render());
            ExitCode::SUCCESS
        }
        _ => {
            print!("{}", err.render());
            println!();
            print_usage();
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    print!("{}", cli::command().render_help());
}
