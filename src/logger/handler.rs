use super::config::HandlerOptions;
use super::formatter::{Line, LineFormat};
use super::level::Severity;
use super::record::{Attr, Record};
use crate::error::LogError;
use is_terminal::IsTerminal;
use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

/// What a logger needs from whatever turns records into output.
pub trait Handler: Send + Sync {
    fn enabled(&self, severity: Severity) -> bool;

    fn handle(&self, record: &Record) -> Result<(), LogError>;

    /// Handler that writes `attrs` on every line after its own.
    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Handler>;

    /// Handler that qualifies every later key with `name`.
    fn with_group(&self, name: &str) -> Arc<dyn Handler>;
}

/// Renders each record as one human-readable line.
///
/// Every line is built in full and then written with a single `write_all`
/// while holding the sink lock, so lines from concurrent callers never
/// interleave. Derived handlers share the sink.
pub struct PrettyHandler<W> {
    writer: Arc<Mutex<W>>,
    level: Severity,
    color: bool,
    format: LineFormat,
    groups: Vec<String>,
    bound: Vec<Attr>,
}

impl<W: Write> PrettyHandler<W> {
    /// Handler over an arbitrary sink. `ColorMode::Auto` counts as no color
    /// here since the sink cannot be probed for a terminal.
    pub fn new(writer: W, options: HandlerOptions) -> Self {
        let color = options.color.resolve(false);
        Self::with_color(writer, options, color)
    }

    fn with_color(writer: W, options: HandlerOptions, color: bool) -> Self {
        Self {
            writer: Arc::new(Mutex::new(writer)),
            level: options.level,
            color,
            format: LineFormat::new(&options),
            groups: Vec::new(),
            bound: Vec::new(),
        }
    }

    pub fn render(&self, record: &Record) -> Result<(), LogError> {
        let mut line = String::new();
        self.format
            .write_line(
                &mut line,
                &Line {
                    time: record.time,
                    severity: record.severity,
                    message: &record.message,
                    groups: &self.groups,
                    bound: &self.bound,
                    attrs: &record.attrs,
                },
                self.color,
            )
            .map_err(|_| io::Error::other("failed to format log line"))?;

        self.writer.lock().write_all(line.as_bytes())?;
        Ok(())
    }
}

impl PrettyHandler<io::Stdout> {
    pub fn stdout(options: HandlerOptions) -> Self {
        let color = options.color.resolve(io::stdout().is_terminal());
        Self::with_color(io::stdout(), options, color)
    }
}

impl PrettyHandler<io::Stderr> {
    pub fn stderr(options: HandlerOptions) -> Self {
        let color = options.color.resolve(io::stderr().is_terminal());
        Self::with_color(io::stderr(), options, color)
    }
}

impl<W> Clone for PrettyHandler<W> {
    fn clone(&self) -> Self {
        Self {
            writer: Arc::clone(&self.writer),
            level: self.level,
            color: self.color,
            format: self.format.clone(),
            groups: self.groups.clone(),
            bound: self.bound.clone(),
        }
    }
}

impl<W: Write + Send + 'static> Handler for PrettyHandler<W> {
    fn enabled(&self, severity: Severity) -> bool {
        severity >= self.level
    }

    fn handle(&self, record: &Record) -> Result<(), LogError> {
        self.render(record)
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Handler> {
        let mut handler = self.clone();
        handler.bound.extend(
            attrs
                .into_iter()
                .filter_map(|attr| self.format.resolve_attr(&self.groups, attr)),
        );
        Arc::new(handler)
    }

    fn with_group(&self, name: &str) -> Arc<dyn Handler> {
        let mut handler = self.clone();
        if !name.is_empty() {
            handler.groups.push(name.to_string());
        }
        Arc::new(handler)
    }
}
