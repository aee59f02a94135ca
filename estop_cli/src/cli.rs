//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

/// Config path tried when `--config` is not given.
pub const DEFAULT_CONFIG: &str = "etc/estop_config.toml";

#[derive(Parser, Debug)]
#[command(name = "estop", version, about = "Emergency stop operator CLI")]
pub struct Cli {
    /// Path to config TOML [default: etc/estop_config.toml if present, else built-in tuning]
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log and report as JSON lines instead of pretty text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); overrides [logging].level
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Host the operator live: JSON-lines events on stdin, feeds on stdout
    Run {
        /// Stop after this many milliseconds (otherwise run until stdin closes or Ctrl-C)
        #[arg(long, value_name = "MS")]
        duration_ms: Option<u64>,
    },
    /// Replay a cruise-then-stop scenario on a manual clock
    Simulate {
        /// Upstream cruise speed in m/s before the stop is requested
        #[arg(long, default_value_t = 10.0)]
        speed: f32,
        /// Upstream cruise acceleration in m/s^2
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        acceleration: f32,
        /// Upstream steering tire angle in rad
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        steer: f32,
        /// Ticks of upstream passthrough before arming
        #[arg(long, default_value_t = 3)]
        cruise_ticks: u32,
        /// Upper bound on operating ticks
        #[arg(long, default_value_t = 10_000)]
        max_ticks: u32,
    },
    /// Validate config and run one bootstrap tick
    SelfCheck,
}
