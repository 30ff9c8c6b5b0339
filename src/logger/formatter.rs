use super::config::{ColorMode, HandlerOptions, ReplaceAttr, Style, TimeFormat};
use super::level::Severity;
use super::record::{Attr, Value, LEVEL_KEY};
use chrono::{DateTime, FixedOffset, Local};
use std::fmt;
use tracing::field::{Field, Visit};
use tracing::{span, Event, Subscriber};
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

const LABEL_WIDTH: usize = 5;

/// Layout of one log line, shared by [`PrettyHandler`](super::PrettyHandler)
/// and [`PrettyFormatter`].
#[derive(Clone)]
pub(crate) struct LineFormat {
    time_format: TimeFormat,
    style: Style,
    replace_attr: Option<ReplaceAttr>,
}

/// Everything that varies per line.
pub(crate) struct Line<'a> {
    pub time: DateTime<FixedOffset>,
    pub severity: Severity,
    pub message: &'a str,
    pub groups: &'a [String],
    /// Attributes bound ahead of time, keys already qualified.
    pub bound: &'a [Attr],
    pub attrs: &'a [Attr],
}

impl LineFormat {
    pub(crate) fn new(options: &HandlerOptions) -> Self {
        Self {
            time_format: options.time_format.clone(),
            style: options.style,
            replace_attr: options.replace_attr.clone(),
        }
    }

    pub(crate) fn write_line(
        &self,
        w: &mut impl fmt::Write,
        line: &Line<'_>,
        color: bool,
    ) -> fmt::Result {
        let time = line.time.format(self.time_format.as_str());
        let label = self.label(line.severity, color);

        match self.style {
            Style::Padded => write!(w, "{}  [{}]  {}", time, label, line.message)?,
            Style::Compact => write!(w, "{} {} {}", time, label, line.message)?,
        }

        for attr in line.bound {
            write!(w, " {}={}", attr.key, attr.value)?;
        }
        for attr in line.attrs {
            if let Some(attr) = self.resolve_attr(line.groups, attr.clone()) {
                write!(w, " {}={}", attr.key, attr.value)?;
            }
        }

        w.write_char('\n')
    }

    /// Drops the level key, runs the replace hook, then qualifies the key with
    /// the group path.
    pub(crate) fn resolve_attr(&self, groups: &[String], attr: Attr) -> Option<Attr> {
        if attr.key == LEVEL_KEY {
            return None;
        }
        let mut attr = match &self.replace_attr {
            Some(hook) => hook(groups, attr)?,
            None => attr,
        };
        if !groups.is_empty() {
            attr.key = format!("{}.{}", groups.join("."), attr.key);
        }
        Some(attr)
    }

    fn label(&self, severity: Severity, color: bool) -> String {
        let mut label = severity.name().into_owned();
        if let Some(hook) = &self.replace_attr {
            let root: &[String] = &[];
            if let Some(attr) = hook(root, Attr::new(LEVEL_KEY, label.as_str())) {
                label = attr.value.to_string();
            }
        }

        // colored only has a process-wide on/off switch, color is decided per handler
        if color {
            format!("\x1b[{}m{}\x1b[0m", severity.color().to_fg_str(), label)
        } else {
            format!("{:<width$}", label, width = LABEL_WIDTH)
        }
    }
}

/// `tracing` event formatter producing the same lines as the pretty handler.
///
/// Spans in scope act as groups. Their fields are written under the span's
/// name when [`SpanFields`] is part of the subscriber. A `level` field naming a
/// severity (`level = "fatal"`) overrides the event's own level.
#[derive(Clone)]
pub struct PrettyFormatter {
    format: LineFormat,
    level: Severity,
    color: ColorMode,
}

impl PrettyFormatter {
    pub fn new(options: &HandlerOptions) -> Self {
        Self {
            format: LineFormat::new(options),
            level: options.level,
            color: options.color,
        }
    }
}

impl<S, N> FormatEvent<S, N> for PrettyFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut fields = FieldCollector::default();
        event.record(&mut fields);

        let severity = fields
            .severity
            .unwrap_or_else(|| Severity::from(*event.metadata().level()));
        if severity < self.level {
            return Ok(());
        }

        let mut groups = Vec::new();
        let mut bound = Vec::new();
        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                groups.push(span.name().to_string());
                if let Some(span_attrs) = span.extensions().get::<SpanAttrs>() {
                    bound.extend(
                        span_attrs
                            .0
                            .iter()
                            .cloned()
                            .filter_map(|attr| self.format.resolve_attr(&groups, attr)),
                    );
                }
            }
        }

        let color = self.color.resolve(writer.has_ansi_escapes());
        let line = Line {
            time: Local::now().fixed_offset(),
            severity,
            message: &fields.message,
            groups: &groups,
            bound: &bound,
            attrs: &fields.attrs,
        };
        self.format.write_line(&mut writer, &line, color)
    }
}

/// Fields recorded on a span, kept in its extensions.
struct SpanAttrs(Vec<Attr>);

/// Layer that remembers span fields so [`PrettyFormatter`] can print them.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpanFields;

impl<S> Layer<S> for SpanFields
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &span::Attributes<'_>, id: &span::Id, ctx: Context<'_, S>) {
        if let Some(span) = ctx.span(id) {
            let mut fields = FieldCollector::default();
            attrs.record(&mut fields);
            span.extensions_mut().insert(SpanAttrs(fields.attrs));
        }
    }

    fn on_record(&self, id: &span::Id, values: &span::Record<'_>, ctx: Context<'_, S>) {
        if let Some(span) = ctx.span(id) {
            let mut fields = FieldCollector::default();
            values.record(&mut fields);
            let mut extensions = span.extensions_mut();
            match extensions.get_mut::<SpanAttrs>() {
                Some(existing) => existing.0.extend(fields.attrs),
                None => extensions.insert(SpanAttrs(fields.attrs)),
            }
        }
    }
}

#[derive(Default)]
struct FieldCollector {
    message: String,
    severity: Option<Severity>,
    attrs: Vec<Attr>,
}

impl FieldCollector {
    fn push(&mut self, field: &Field, value: Value) {
        match field.name() {
            "message" => self.message = value.to_string(),
            LEVEL_KEY => {
                if let Some(severity) = value.as_str().and_then(|s| s.parse().ok()) {
                    self.severity = Some(severity);
                }
            }
            name => self.attrs.push(Attr::new(name, value)),
        }
    }
}

impl Visit for FieldCollector {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, Value::from(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, Value::Int(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, Value::Uint(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.push(field, Value::Float(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, Value::Bool(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, Value::Any(format!("{:?}", value)));
    }
}
