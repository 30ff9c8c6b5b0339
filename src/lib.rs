//! Pretty, single-line log output with colored severity labels and two extra
//! severities, trace and fatal, around the usual debug..error range.
//!
//! ```no_run
//! use dlog::{Attr, HandlerOptions, Logger, PrettyHandler, Severity};
//!
//! let logger = Logger::new(PrettyHandler::stdout(
//!     HandlerOptions::default().level(Severity::TRACE),
//! ));
//! logger.info("Starting server", &[Attr::new("port", 8080)])?;
//! # Ok::<(), dlog::LogError>(())
//! ```

pub mod error;
pub mod logger;

pub use error::{ConfigError, LogError};
pub use logger::{
    default_logger, init_tracing, new_log, Attr, ColorMode, Handler, HandlerOptions, Logger,
    PrettyFormatter, PrettyHandler, Record, ReplaceAttr, Severity, SpanFields, Style, TimeFormat,
    Value, DEFAULT_TIME_FORMAT, LEVEL_KEY,
};
