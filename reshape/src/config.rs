//! Runtime configuration from the environment.
//!
//! | variable         | values                                  | default |
//! |------------------|-----------------------------------------|---------|
//! | `RESHAPE_LOG`    | `off`, `error`, `warn`, `info`, `debug`, `trace` | `warn` |
//! | `RESHAPE_PRETTY` | `1`, `true`, `yes`                      | off     |
//!
//! A `.env` file in the working directory is loaded first when present.

use std::env;

use log::LevelFilter;

pub const LOG_VAR: &str = "RESHAPE_LOG";
pub const PRETTY_VAR: &str = "RESHAPE_PRETTY";

/// Settings that command-line flags can override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Maximum level of diagnostic log records.
    pub log_level: LevelFilter,
    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LevelFilter::Warn,
            pretty: false,
        }
    }
}

impl Config {
    /// Load from the process environment (and `.env`, if any).
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            log_level: lookup(LOG_VAR)
                .and_then(|value| parse_level(&value))
                .unwrap_or(defaults.log_level),
            pretty: lookup(PRETTY_VAR)
                .map(|value| parse_flag(&value))
                .unwrap_or(defaults.pretty),
        }
    }

    /// Raise the log level to at least what `verbosity` asks for
    /// (`-v` → info, `-vv` → debug, `-vvv` → trace).
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        let requested = match verbosity {
            0 => return self,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        self.log_level = self.log_level.max(requested);
        self
    }

    /// Force pretty output on when `pretty` is set.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty |= pretty;
        self
    }
}

fn parse_level(value: &str) -> Option<LevelFilter> {
    match value.trim().to_ascii_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" | "warning" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}
