use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::LoggingConfig;

/// Output format accepted in `logging.format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn parse(format: &str) -> Self {
        match format.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    let file = match &config.file_path {
        Some(path) => Some(Mutex::new(
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path))?,
        )),
        None => None,
    };

    match (LogFormat::parse(&config.format), file) {
        (LogFormat::Json, Some(file)) => registry
            .with(fmt::layer().json().with_span_events(FmtSpan::CLOSE).with_writer(file))
            .try_init()?,
        (LogFormat::Json, None) => registry
            .with(fmt::layer().json().with_span_events(FmtSpan::CLOSE))
            .try_init()?,
        (LogFormat::Pretty, Some(file)) => registry
            .with(fmt::layer().with_ansi(false).with_target(false).with_writer(file))
            .try_init()?,
        (LogFormat::Pretty, None) => registry
            .with(fmt::layer().with_target(false))
            .try_init()?,
    }

    tracing::info!("Logging initialized with level: {}", config.level);
    Ok(())
}

/// Log a finished pipeline stage, tagged with a `stage` field.
///
/// `log_stage!("store", inserted = 2, "Order lines stored")`
#[macro_export]
macro_rules! log_stage {
    ($stage:expr, $($arg:tt)+) => {
        tracing::info!(stage = $stage, $($arg)+)
    };
}

/// Log a failed pipeline stage with its error.
#[macro_export]
macro_rules! log_stage_failure {
    ($stage:expr, $err:expr, $($arg:tt)+) => {
        tracing::error!(stage = $stage, error = %$err, $($arg)+)
    };
}
