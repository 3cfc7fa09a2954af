//! Structured logging for sharelink.
//!
//! The share flow emits one event per phase: `Initialized share request`,
//! `Submitting share` (with the resolved expiration), then `Share created` or
//! `Share creation failed`. Selection resets and navigation log at debug and
//! info. The HTTP stack is capped at `warn` so `-vv` shows share traffic
//! rather than connection-pool chatter.
//!
//! A `--log-file` receives JSON lines at debug level regardless of `-v`.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

/// Crates whose logs are held at `warn` unless `RUST_LOG` says otherwise.
const NOISY_TARGETS: &[&str] = &["hyper", "hyper_util", "reqwest", "rustls", "h2"];

/// How much of the share flow to print on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only; the rendered message is the sole output.
    #[default]
    Quiet,
    /// Share phases and navigation.
    Normal,
    /// Adds requests as sent and template keys left empty.
    Verbose,
    Trace,
}

impl Verbosity {
    /// Map a repeated `-v` flag count to a verbosity.
    pub fn from_count(count: u8) -> Self {
        match count {
            0 => Verbosity::Quiet,
            1 => Verbosity::Normal,
            2 => Verbosity::Verbose,
            _ => Verbosity::Trace,
        }
    }

    pub fn as_level_filter(&self) -> LevelFilter {
        match self {
            Verbosity::Quiet => LevelFilter::ERROR,
            Verbosity::Normal => LevelFilter::INFO,
            Verbosity::Verbose => LevelFilter::DEBUG,
            Verbosity::Trace => LevelFilter::TRACE,
        }
    }

    /// Filter directives used when `RUST_LOG` is unset.
    pub fn directives(&self) -> String {
        let level = self.as_level_filter();
        let mut directives = vec![level.to_string().to_lowercase()];
        if level > LevelFilter::WARN {
            directives.extend(NOISY_TARGETS.iter().map(|target| format!("{}=warn", target)));
        }
        directives.join(",")
    }
}

/// Where and how much to log.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    pub verbosity: Verbosity,
    /// JSON log file; its parent directory must exist.
    pub log_file: Option<String>,
}

/// Keeps the file writer alive; dropping it flushes pending lines.
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

fn env_filter(verbosity: Verbosity) -> EnvFilter {
    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(value) if !value.trim().is_empty() => EnvFilter::new(value),
        _ => EnvFilter::new(verbosity.directives()),
    }
}

/// Install the global subscriber. Call once, from `main`.
pub fn init_logging(config: &LogConfig) -> LogGuard {
    let (file_layer, file_guard) = match config.log_file {
        Some(ref log_file_path) => {
            let path = Path::new(log_file_path);
            let parent_dir = path.parent().unwrap_or(Path::new("."));
            let filename = path
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("sharelink.log");

            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(parent_dir, filename));
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_filter(env_filter(Verbosity::Verbose));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let stderr_layer = (config.verbosity != Verbosity::Quiet).then(|| {
        fmt::layer()
            .with_target(false)
            .with_timer(fmt::time::uptime())
            .with_writer(std::io::stderr)
            .with_filter(env_filter(config.verbosity))
    });

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();

    LogGuard {
        _file_guard: file_guard,
    }
}
