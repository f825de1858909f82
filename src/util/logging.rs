//! Structured logging setup
//!
//! Logging is configured explicitly through a [`LoggingConfig`] handed to
//! [`init_logging`] by the binary. Nothing is configured as a side effect of
//! loading a module, and the library itself never installs a subscriber.
//!
//! # Example
//!
//! ```no_run
//! use transcript_qa::util::{init_logging, LoggingConfig};
//! use tracing::Level;
//!
//! init_logging(LoggingConfig::with_level(Level::DEBUG));
//! tracing::info!(questions = 12, "Questionnaire loaded");
//! ```

use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Targets capped at `warn` unless `RUST_LOG` says otherwise
pub const DEFAULT_QUIET_TARGETS: [&str; 4] = ["h2", "hyper", "reqwest", "genai"];

/// Configuration for logging initialization
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum level for this crate's own events
    pub level: Level,

    /// Emit one JSON object per event instead of console lines
    pub use_json: bool,

    /// Include the module target (e.g. `transcript_qa::pipeline`)
    pub include_target: bool,

    /// Include file and line number information
    pub include_location: bool,

    /// Dependency targets limited to `warn`
    pub quiet_targets: Vec<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: true,
            include_location: false,
            quiet_targets: DEFAULT_QUIET_TARGETS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    pub fn with_json(mut self, use_json: bool) -> Self {
        self.use_json = use_json;
        self
    }

    pub fn with_quiet_targets<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.quiet_targets = targets.into_iter().map(Into::into).collect();
        self
    }

    /// Filter directives applied on top of `RUST_LOG`
    pub fn directives(&self, rust_log_set: bool) -> Vec<String> {
        let mut directives = vec![format!("transcript_qa={}", self.level)];
        if !rust_log_set {
            directives.extend(self.quiet_targets.iter().map(|t| format!("{}=warn", t)));
        }
        directives
    }
}

/// Parses a log level, falling back to `INFO` for unknown input
///
/// ```
/// use transcript_qa::util::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("DEBUG"), Level::DEBUG);
/// assert_eq!(parse_level("chatty"), Level::INFO);
/// ```
pub fn parse_level(level_str: &str) -> Level {
    match level_str.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}

/// Installs the global subscriber; calls after the first are ignored
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut filter = EnvFilter::from_default_env();
        for directive in config.directives(env::var("RUST_LOG").is_ok()) {
            match directive.parse() {
                Ok(directive) => filter = filter.add_directive(directive),
                Err(e) => eprintln!("Ignoring log directive '{}': {}", directive, e),
            }
        }

        // Logs go to stderr so stdout stays clean for formatted results
        if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location),
                )
                .init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location),
                )
                .init();
        }
    });
}

pub fn init_default() {
    init_logging(LoggingConfig::default());
}

/// Initializes logging from `TQA_LOG_LEVEL` and `TQA_LOG_JSON`
pub fn init_from_env() {
    let level = parse_level(&env::var("TQA_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));
    let use_json = env::var("TQA_LOG_JSON")
        .ok()
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(false);

    init_logging(LoggingConfig::with_level(level).with_json(use_json));
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[parameterized(
        trace = { "trace", Level::TRACE },
        debug_upper = { "DEBUG", Level::DEBUG },
        info = { "info", Level::INFO },
        warning = { "warning", Level::WARN },
        error = { "Error", Level::ERROR },
        invalid = { "loud", Level::INFO },
        empty = { "", Level::INFO },
    )]
    fn test_parse_level(input: &str, expected: Level) {
        assert_eq!(parse_level(input), expected);
    }

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, Level::INFO);
        assert!(!config.use_json);
        assert_eq!(config.quiet_targets, vec!["h2", "hyper", "reqwest", "genai"]);
    }

    #[test]
    fn test_directives_quiet_dependencies() {
        let config = LoggingConfig::with_level(Level::DEBUG);
        let directives = config.directives(false);
        assert_eq!(directives[0], "transcript_qa=DEBUG");
        assert!(directives.contains(&"genai=warn".to_string()));
    }

    #[test]
    fn test_directives_respect_rust_log() {
        let config = LoggingConfig::default().with_quiet_targets(["sqlx"]);
        assert_eq!(config.directives(true), vec!["transcript_qa=INFO".to_string()]);
    }
}
