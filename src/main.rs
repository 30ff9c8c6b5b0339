mod cli;

use anyhow::Result;
use clap::Parser;
use dlog::{init_tracing, Attr, HandlerOptions, Logger, PrettyHandler, Severity, TimeFormat};

use crate::cli::Args;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    let options = HandlerOptions::default()
        .level(args.level)
        .time_format(TimeFormat::new(args.time_format)?)
        .color(args.color)
        .style(args.style);

    if args.tracing {
        init_tracing(options);
        emit_tracing();
        return Ok(());
    }

    let logger = Logger::new(PrettyHandler::stdout(options));
    logger.install_as_default();
    emit(&logger)
}

fn emit(logger: &Logger) -> Result<()> {
    logger.info(
        "Starting server on :8080",
        &[Attr::new("port", 8080), Attr::new("status", "initializing")],
    )?;
    logger.info(
        "Server is now running",
        &[Attr::new("port", 8080), Attr::new("status", "running")],
    )?;
    logger.info("This is an info message", &[])?;
    logger.warn("This is a warning message", &[])?;
    logger.error("This is an error message", &[])?;
    logger.debug("This is a debug message", &[])?;
    logger.trace("This is a trace message", &[])?;
    logger.fatal("This is a fatal message", &[])?;

    let requests = logger.with_group("request").with(vec![Attr::new("id", 42)]);
    requests.log(
        Severity::new(Severity::INFO.value() + 2),
        "Between info and warn",
        &[Attr::new("elapsed_ms", 1.5)],
    )?;
    Ok(())
}

fn emit_tracing() {
    tracing::info!(port = 8080, status = "initializing", "Starting server on :8080");
    tracing::warn!("This is a warning message");
    tracing::debug!("This is a debug message");
    tracing::trace!("This is a trace message");
    tracing::error!(level = "fatal", "This is a fatal message");

    let span = tracing::info_span!("request", id = 42);
    let _guard = span.enter();
    tracing::error!(code = 500, "Request failed");
}
