use thiserror::Error;

#[derive(Error, Debug)]
pub enum LogError {
    #[error("Failed to write log line: {0}")]
    Write(#[from] std::io::Error),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid time format: {0}")]
    InvalidTimeFormat(String),
    #[error("Invalid severity: {0}")]
    InvalidSeverity(String),
}
