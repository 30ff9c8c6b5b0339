use super::level::Severity;
use super::record::Attr;
use crate::error::ConfigError;
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Hook run over every attribute before it is written. The first argument is
/// the group path the attribute lives under. Returning `None` drops it.
pub type ReplaceAttr = Arc<dyn Fn(&[String], Attr) -> Option<Attr> + Send + Sync>;

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlerOptions {
    pub level: Severity,
    pub time_format: TimeFormat,
    pub color: ColorMode,
    pub style: Style,
    #[serde(skip)]
    pub replace_attr: Option<ReplaceAttr>,
}

impl Default for HandlerOptions {
    fn default() -> Self {
        Self {
            level: Severity::INFO,
            time_format: TimeFormat::default(),
            color: ColorMode::Never,
            style: Style::Padded,
            replace_attr: None,
        }
    }
}

impl fmt::Debug for HandlerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerOptions")
            .field("level", &self.level)
            .field("time_format", &self.time_format)
            .field("color", &self.color)
            .field("style", &self.style)
            .field("replace_attr", &self.replace_attr.is_some())
            .finish()
    }
}

impl HandlerOptions {
    pub fn level(mut self, level: Severity) -> Self {
        self.level = level;
        self
    }

    pub fn time_format(mut self, time_format: TimeFormat) -> Self {
        self.time_format = time_format;
        self
    }

    pub fn color(mut self, color: ColorMode) -> Self {
        self.color = color;
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn replace_attr<F>(mut self, hook: F) -> Self
    where
        F: Fn(&[String], Attr) -> Option<Attr> + Send + Sync + 'static,
    {
        self.replace_attr = Some(Arc::new(hook));
        self
    }
}

/// A strftime pattern checked up front, so rendering it cannot fail later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeFormat(String);

impl TimeFormat {
    pub fn new(pattern: impl Into<String>) -> Result<Self, ConfigError> {
        let pattern = pattern.into();
        if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::InvalidTimeFormat(pattern));
        }
        Ok(Self(pattern))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TimeFormat {
    fn default() -> Self {
        Self(DEFAULT_TIME_FORMAT.to_string())
    }
}

impl TryFrom<String> for TimeFormat {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TimeFormat> for String {
    fn from(format: TimeFormat) -> Self {
        format.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Whether to emit ANSI colors for a sink that is (or is not) a terminal.
    pub fn resolve(self, is_terminal: bool) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => is_terminal && std::env::var_os("NO_COLOR").is_none(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    /// `time  [LEVEL]  message`
    Padded,
    /// `time LEVEL message`
    Compact,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = HandlerOptions::default();
        assert_eq!(opts.level, Severity::INFO);
        assert_eq!(opts.time_format.as_str(), "%Y-%m-%d %H:%M:%S");
        assert_eq!(opts.color, ColorMode::Never);
        assert_eq!(opts.style, Style::Padded);
        assert!(opts.replace_attr.is_none());
    }

    #[test]
    fn test_time_format_validation() {
        assert!(TimeFormat::new("%H:%M:%S%.3f").is_ok());
        assert_eq!(
            TimeFormat::new("%Y-%!").unwrap_err(),
            ConfigError::InvalidTimeFormat("%Y-%!".to_string())
        );
    }

    #[test]
    fn test_color_resolution() {
        assert!(ColorMode::Always.resolve(false));
        assert!(!ColorMode::Never.resolve(true));
        assert!(!ColorMode::Auto.resolve(false));
    }

    #[test]
    fn test_deserialize_partial_options() {
        let opts: HandlerOptions = serde_json::from_str(
            r#"{"level": "trace", "time_format": "%H:%M", "color": "always", "style": "compact"}"#,
        )
        .unwrap();
        assert_eq!(opts.level, Severity::TRACE);
        assert_eq!(opts.time_format.as_str(), "%H:%M");
        assert_eq!(opts.color, ColorMode::Always);
        assert_eq!(opts.style, Style::Compact);

        let opts: HandlerOptions = serde_json::from_str(r#"{"level": "warn+1"}"#).unwrap();
        assert_eq!(opts.level, Severity::new(5));
        assert_eq!(opts.style, Style::Padded);
    }

    #[test]
    fn test_deserialize_rejects_bad_values() {
        assert!(serde_json::from_str::<HandlerOptions>(r#"{"level": "loud"}"#).is_err());
        assert!(serde_json::from_str::<HandlerOptions>(r#"{"time_format": "%!"}"#).is_err());
    }

    #[test]
    fn test_serialize_uses_names() {
        let json = serde_json::to_value(HandlerOptions::default().level(Severity::FATAL)).unwrap();
        assert_eq!(json["level"], "fatal");
        assert_eq!(json["color"], "never");
        assert!(json.get("replace_attr").is_none());
    }
}
