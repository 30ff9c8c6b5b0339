use super::level::Severity;
use chrono::{DateTime, FixedOffset, Local};
use std::fmt;

/// Key of the severity when it is surfaced as an attribute.
pub const LEVEL_KEY: &str = "level";

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Time(DateTime<FixedOffset>),
    /// Anything else, already rendered.
    Any(String),
}

impl Value {
    pub fn any(value: impl fmt::Display) -> Self {
        Self::Any(value.to_string())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Any(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) | Self::Any(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{}", n),
            Self::Uint(n) => write!(f, "{}", n),
            Self::Float(n) => write!(f, "{}", n),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Time(t) => write!(f, "{}", t.to_rfc3339()),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

macro_rules! value_from {
    ($variant:ident, $target:ty, $($t:ty),+) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Self::$variant(value as $target)
                }
            }
        )+
    };
}

value_from!(Int, i64, i8, i16, i32, i64, isize);
value_from!(Uint, u64, u8, u16, u32, u64, usize);
value_from!(Float, f64, f32, f64);

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<Tz: chrono::TimeZone> From<DateTime<Tz>> for Value {
    fn from(value: DateTime<Tz>) -> Self {
        Self::Time(value.fixed_offset())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    pub key: String,
    pub value: Value,
}

impl Attr {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> From<(K, V)> for Attr {
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}

/// A single log event as handed to a handler.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub time: DateTime<FixedOffset>,
    pub severity: Severity,
    pub message: String,
    pub attrs: Vec<Attr>,
}

impl Record {
    /// Record stamped with the current local time.
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self::at(Local::now().fixed_offset(), severity, message)
    }

    pub fn at<Tz: chrono::TimeZone>(
        time: DateTime<Tz>,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            time: time.fixed_offset(),
            severity,
            message: message.into(),
            attrs: Vec::new(),
        }
    }

    pub fn add_attr(&mut self, attr: impl Into<Attr>) {
        self.attrs.push(attr.into());
    }

    pub fn with_attrs<I, A>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Attr>,
    {
        self.attrs.extend(attrs.into_iter().map(Into::into));
        self
    }
}
