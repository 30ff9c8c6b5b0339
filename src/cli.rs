use clap::Parser;
use dlog::{ColorMode, Severity, Style, DEFAULT_TIME_FORMAT};

#[derive(Parser, Debug)]
#[command(name = "dlog", version, about)]
pub struct Args {
    /// Lowest severity that gets printed (trace, debug, info, warn, error, fatal)
    #[arg(short, long, default_value = "trace")]
    pub level: Severity,

    /// strftime pattern for the timestamp
    #[arg(short, long, default_value = DEFAULT_TIME_FORMAT)]
    pub time_format: String,

    /// When to color the level label
    #[arg(short, long, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Line layout
    #[arg(short, long, value_enum, default_value_t = Style::Compact)]
    pub style: Style,

    /// Emit the samples through `tracing` instead of the logger
    #[arg(long)]
    pub tracing: bool,
}
