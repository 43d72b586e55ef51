use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use clap::Parser;
use outliner::cli::commands::execute_command;
use outliner::cli::output;
use outliner::cli::Cli;
use outliner::config::Settings;
use outliner::exitcode;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

fn main() {
    let cli = Cli::parse();

    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            output::error(&e);
            std::process::exit(exitcode::CONFIG);
        }
    };

    setup_logging(cli.debug, settings.log_file.as_deref());

    if let Err(e) = execute_command(&cli, &settings) {
        output::error(&e);
        std::process::exit(e.exit_code());
    }
}

fn setup_logging(verbosity: u8, log_file: Option<&Path>) {
    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        3 => LevelFilter::TRACE,
        _ => {
            output::warning("Don't be crazy, max is -d -d -d");
            LevelFilter::TRACE
        }
    };

    // The editor owns the terminal, so a log file keeps the screen clean
    let file = log_file.and_then(|path| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| output::warning(&format!("cannot open log file {}: {}", path.display(), e)))
            .ok()
    });
    let to_file = file.is_some();
    let writer = match file {
        Some(file) => BoxMakeWriter::new(Mutex::new(file)),
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let fmt_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(!to_file)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();

    match filter {
        LevelFilter::INFO => tracing::info!("Debug mode: info"),
        LevelFilter::DEBUG => tracing::debug!("Debug mode: debug"),
        LevelFilter::TRACE => tracing::debug!("Debug mode: trace"),
        _ => {}
    }
}
