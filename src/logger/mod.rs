mod config;
mod formatter;
mod handler;
mod level;
mod record;

pub use config::{ColorMode, HandlerOptions, ReplaceAttr, Style, TimeFormat, DEFAULT_TIME_FORMAT};
pub use formatter::{PrettyFormatter, SpanFields};
pub use handler::{Handler, PrettyHandler};
pub use level::Severity;
pub use record::{Attr, Record, Value, LEVEL_KEY};

use crate::error::LogError;
use is_terminal::IsTerminal;
use parking_lot::{const_rwlock, RwLock};
use std::sync::{Arc, Once};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();
static DEFAULT: RwLock<Option<Logger>> = const_rwlock(None);

/// Front end over a [`Handler`]: filters by severity, stamps the time and
/// hands the record over.
#[derive(Clone)]
pub struct Logger {
    handler: Arc<dyn Handler>,
}

impl Logger {
    pub fn new(handler: impl Handler + 'static) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    pub fn from_handler(handler: Arc<dyn Handler>) -> Self {
        Self { handler }
    }

    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }

    pub fn enabled(&self, severity: Severity) -> bool {
        self.handler.enabled(severity)
    }

    /// Below-threshold records are dropped and count as success.
    pub fn log(&self, severity: Severity, message: &str, attrs: &[Attr]) -> Result<(), LogError> {
        if !self.enabled(severity) {
            return Ok(());
        }
        let record = Record::new(severity, message).with_attrs(attrs.iter().cloned());
        self.handler.handle(&record)
    }

    pub fn log_record(&self, record: &Record) -> Result<(), LogError> {
        if !self.enabled(record.severity) {
            return Ok(());
        }
        self.handler.handle(record)
    }

    pub fn trace(&self, message: &str, attrs: &[Attr]) -> Result<(), LogError> {
        self.log(Severity::TRACE, message, attrs)
    }

    pub fn debug(&self, message: &str, attrs: &[Attr]) -> Result<(), LogError> {
        self.log(Severity::DEBUG, message, attrs)
    }

    pub fn info(&self, message: &str, attrs: &[Attr]) -> Result<(), LogError> {
        self.log(Severity::INFO, message, attrs)
    }

    pub fn warn(&self, message: &str, attrs: &[Attr]) -> Result<(), LogError> {
        self.log(Severity::WARN, message, attrs)
    }

    pub fn error(&self, message: &str, attrs: &[Attr]) -> Result<(), LogError> {
        self.log(Severity::ERROR, message, attrs)
    }

    pub fn fatal(&self, message: &str, attrs: &[Attr]) -> Result<(), LogError> {
        self.log(Severity::FATAL, message, attrs)
    }

    pub fn with(&self, attrs: Vec<Attr>) -> Logger {
        Self::from_handler(self.handler.with_attrs(attrs))
    }

    pub fn with_group(&self, name: &str) -> Logger {
        Self::from_handler(self.handler.with_group(name))
    }

    /// Makes this logger the one returned by [`default_logger`].
    pub fn install_as_default(&self) {
        *DEFAULT.write() = Some(self.clone());
    }
}

/// The installed default logger, or a stdout one with default options.
pub fn default_logger() -> Logger {
    DEFAULT
        .read()
        .clone()
        .unwrap_or_else(|| Logger::new(PrettyHandler::stdout(HandlerOptions::default())))
}

/// Stock stdout logger: everything from trace up, compact lines, colored when
/// stdout is a terminal. Not installed as the default.
pub fn new_log() -> Logger {
    Logger::new(PrettyHandler::stdout(
        HandlerOptions::default()
            .level(Severity::TRACE)
            .style(Style::Compact)
            .color(ColorMode::Auto),
    ))
}

/// Routes `tracing` events through [`PrettyFormatter`] on stdout. Only the
/// first call has any effect. `RUST_LOG` wins over `options.level` when set.
pub fn init_tracing(options: HandlerOptions) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(options.level.level_filter().to_string()));

        tracing_subscriber::registry()
            .with(filter)
            .with(SpanFields)
            .with(
                fmt::layer()
                    .with_ansi(std::io::stdout().is_terminal())
                    .event_format(PrettyFormatter::new(&options))
                    .with_writer(std::io::stdout),
            )
            .init();
    });
}
