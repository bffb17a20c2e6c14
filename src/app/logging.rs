use super::config::{AppConfig, LoggingConfig};
use anyhow::Result;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "carbrowse.log";

pub fn log_directory(config: &LoggingConfig) -> PathBuf {
    config
        .directory
        .clone()
        .unwrap_or_else(AppConfig::get_cache_dir)
}

fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Install the global subscriber.
///
/// Logs go to a daily rolling file unless `to_stderr` is set. Keep the returned
/// guard alive for the whole run, dropping it flushes and stops the writer.
pub fn setup_logging(config: &LoggingConfig, to_stderr: bool) -> Result<Option<WorkerGuard>> {
    if to_stderr {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(env_filter(config))
            .try_init()
            .map_err(|e| anyhow::anyhow!(e))?;
        return Ok(None);
    }

    let dir = log_directory(config);
    std::fs::create_dir_all(&dir)?;
    let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_env_filter(env_filter(config))
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!("carbrowse logging initialised (dir={})", dir.display());
    Ok(Some(guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_directory_override() {
        let config = LoggingConfig {
            level: "debug".to_string(),
            directory: Some(PathBuf::from("/tmp/carbrowse-logs")),
        };
        assert_eq!(log_directory(&config), PathBuf::from("/tmp/carbrowse-logs"));
    }

    #[test]
    fn test_log_directory_defaults_to_cache() {
        let dir = log_directory(&LoggingConfig::default());
        assert!(dir.ends_with("carbrowse"), "unexpected log dir {dir:?}");
    }
}
