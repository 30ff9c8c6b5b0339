use crate::error::ConfigError;
use colored::Color;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;

/// Position on the ordered severity scale.
///
/// The four standard points sit four apart (Debug = -4 up to Error = 8), leaving
/// room for values in between. Trace and Fatal extend the scale by the same
/// step below Debug and above Error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Severity(i32);

impl Severity {
    pub const DEBUG: Severity = Severity(-4);
    pub const INFO: Severity = Severity(0);
    pub const WARN: Severity = Severity(4);
    pub const ERROR: Severity = Severity(8);
    pub const TRACE: Severity = Severity(Self::DEBUG.0 - 4);
    pub const FATAL: Severity = Severity(Self::ERROR.0 + 4);

    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    pub const fn value(self) -> i32 {
        self.0
    }

    /// Label printed in the log line.
    ///
    /// Trace and Fatal get their own names. Everything else is named after the
    /// nearest standard point at or below it, with the distance appended when
    /// non-zero (`INFO+2`, `DEBUG-2`).
    pub fn name(self) -> Cow<'static, str> {
        match self {
            Self::TRACE => return Cow::Borrowed("TRACE"),
            Self::FATAL => return Cow::Borrowed("FATAL"),
            _ => {}
        }

        let (base, anchor) = if self < Self::INFO {
            ("DEBUG", Self::DEBUG)
        } else if self < Self::WARN {
            ("INFO", Self::INFO)
        } else if self < Self::ERROR {
            ("WARN", Self::WARN)
        } else {
            ("ERROR", Self::ERROR)
        };

        match self.0 - anchor.0 {
            0 => Cow::Borrowed(base),
            offset => Cow::Owned(format!("{}{:+}", base, offset)),
        }
    }

    pub fn color(self) -> Color {
        if self < Self::DEBUG {
            Color::Cyan
        } else if self < Self::INFO {
            Color::White
        } else if self < Self::WARN {
            Color::Blue
        } else if self < Self::ERROR {
            Color::Yellow
        } else if self < Self::FATAL {
            Color::Red
        } else {
            Color::Magenta
        }
    }

    /// Coarsest tracing filter that still lets this severity through.
    pub fn level_filter(self) -> LevelFilter {
        if self < Self::DEBUG {
            LevelFilter::TRACE
        } else if self < Self::INFO {
            LevelFilter::DEBUG
        } else if self < Self::WARN {
            LevelFilter::INFO
        } else if self < Self::ERROR {
            LevelFilter::WARN
        } else {
            LevelFilter::ERROR
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Self::INFO
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl From<Level> for Severity {
    fn from(level: Level) -> Self {
        match level {
            Level::TRACE => Self::TRACE,
            Level::DEBUG => Self::DEBUG,
            Level::INFO => Self::INFO,
            Level::WARN => Self::WARN,
            _ => Self::ERROR,
        }
    }
}

impl FromStr for Severity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        if let Ok(value) = lower.parse::<i32>() {
            return Ok(Self(value));
        }

        let invalid = || ConfigError::InvalidSeverity(s.to_string());
        let (name, offset) = match lower.find(|c: char| c == '+' || c == '-') {
            Some(idx) => (
                &lower[..idx],
                lower[idx..].parse::<i32>().map_err(|_| invalid())?,
            ),
            None => (lower.as_str(), 0),
        };

        let base = match name {
            "trace" => Self::TRACE,
            "debug" => Self::DEBUG,
            "info" => Self::INFO,
            "warn" | "warning" => Self::WARN,
            "error" => Self::ERROR,
            "fatal" => Self::FATAL,
            _ => return Err(invalid()),
        };
        base.0.checked_add(offset).map(Self).ok_or_else(invalid)
    }
}

impl TryFrom<String> for Severity {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        severity.name().to_ascii_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_points() {
        assert_eq!(Severity::TRACE.value(), -8);
        assert_eq!(Severity::FATAL.value(), 12);
        assert!(Severity::TRACE < Severity::DEBUG);
        assert!(Severity::ERROR < Severity::FATAL);
    }

    #[test]
    fn test_names() {
        assert_eq!(Severity::TRACE.name(), "TRACE");
        assert_eq!(Severity::DEBUG.name(), "DEBUG");
        assert_eq!(Severity::INFO.name(), "INFO");
        assert_eq!(Severity::WARN.name(), "WARN");
        assert_eq!(Severity::ERROR.name(), "ERROR");
        assert_eq!(Severity::FATAL.name(), "FATAL");
        assert_eq!(Severity::new(2).name(), "INFO+2");
        assert_eq!(Severity::new(-6).name(), "DEBUG-2");
        assert_eq!(Severity::new(10).name(), "ERROR+2");
        assert_eq!(Severity::new(20).name(), "ERROR+12");
    }

    #[test]
    fn test_parse() {
        assert_eq!("trace".parse::<Severity>().unwrap(), Severity::TRACE);
        assert_eq!("FATAL".parse::<Severity>().unwrap(), Severity::FATAL);
        assert_eq!(" Warning ".parse::<Severity>().unwrap(), Severity::WARN);
        assert_eq!("info+2".parse::<Severity>().unwrap(), Severity::new(2));
        assert_eq!("DEBUG-2".parse::<Severity>().unwrap(), Severity::new(-6));
        assert_eq!("-8".parse::<Severity>().unwrap(), Severity::TRACE);
        assert!(matches!(
            "loud".parse::<Severity>().unwrap_err(),
            ConfigError::InvalidSeverity(_)
        ));
        assert!("info+x".parse::<Severity>().is_err());
        assert_eq!(
            "fatal+2147483647".parse::<Severity>().unwrap_err(),
            ConfigError::InvalidSeverity("fatal+2147483647".to_string())
        );
        assert!("trace-2147483647".parse::<Severity>().is_err());
    }

    #[test]
    fn test_name_roundtrips_through_parse() {
        for value in -12..=16 {
            let severity = Severity::new(value);
            assert_eq!(severity.name().parse::<Severity>().unwrap(), severity);
        }
    }

    #[test]
    fn test_colors() {
        assert_eq!(Severity::TRACE.color(), Color::Cyan);
        assert_eq!(Severity::DEBUG.color(), Color::White);
        assert_eq!(Severity::INFO.color(), Color::Blue);
        assert_eq!(Severity::WARN.color(), Color::Yellow);
        assert_eq!(Severity::ERROR.color(), Color::Red);
        assert_eq!(Severity::FATAL.color(), Color::Magenta);
    }

    #[test]
    fn test_tracing_conversions() {
        assert_eq!(Severity::from(Level::TRACE), Severity::TRACE);
        assert_eq!(Severity::from(Level::ERROR), Severity::ERROR);
        assert_eq!(Severity::TRACE.level_filter(), LevelFilter::TRACE);
        assert_eq!(Severity::INFO.level_filter(), LevelFilter::INFO);
        assert_eq!(Severity::FATAL.level_filter(), LevelFilter::ERROR);
    }
}
