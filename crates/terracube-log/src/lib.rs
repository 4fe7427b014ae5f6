//! Structured logging setup for terracube binaries.
//!
//! Installs a `tracing` subscriber with an environment/config driven filter,
//! a human-readable console layer, and in debug builds a JSON file layer for
//! post-mortem analysis.

use std::path::{Path, PathBuf};

use terracube_config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor the config provides one.
pub const DEFAULT_FILTER: &str = "info";

/// File name of the JSON log written in debug builds.
pub const LOG_FILE_NAME: &str = "terracube.log";

/// Filter string from the config's `debug.log_level`, or [`DEFAULT_FILTER`].
pub fn filter_string(config: Option<&Config>) -> String {
    match config {
        Some(config) if !config.debug.log_level.trim().is_empty() => {
            config.debug.log_level.clone()
        }
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// Create an `EnvFilter` with [`DEFAULT_FILTER`].
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}

/// Creates the log directory and returns the path of the log file in it.
pub fn prepare_log_file(log_dir: &Path) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(log_dir)?;
    Ok(log_dir.join(LOG_FILE_NAME))
}

/// Initialize the global tracing subscriber.
///
/// * `log_dir` - directory for the JSON log file (only used in debug builds)
/// * `debug_build` - whether to add the JSON file layer
/// * `config` - source of the default log level; `RUST_LOG` takes precedence
///
/// Calling this twice in one process is a no-op for the second call.
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let filter_str = filter_string(config);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = log_dir
        && let Ok(log_path) = prepare_log_file(log_dir)
        && let Ok(log_file) = std::fs::File::create(&log_path)
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        let _ = subscriber.with(file_layer).try_init();
        return;
    }

    let _ = subscriber.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tracing_subscriber::fmt::MakeWriter;

    #[test]
    fn test_default_filter() {
        assert_eq!(format!("{}", default_env_filter()), "info");
    }

    #[test]
    fn test_filter_from_config() {
        let mut config = Config::default();
        config.debug.log_level = "warn,terracube_world=trace".to_string();
        assert_eq!(filter_string(Some(&config)), "warn,terracube_world=trace");

        config.debug.log_level = "  ".to_string();
        assert_eq!(filter_string(Some(&config)), DEFAULT_FILTER);
        assert_eq!(filter_string(None), DEFAULT_FILTER);
    }

    #[test]
    fn test_env_filter_parsing() {
        for filter_str in [
            "info",
            "debug,terracube_world=trace",
            "warn,terracube_physics=debug,terracube_voxel=trace",
            "error",
        ] {
            assert!(
                EnvFilter::try_new(filter_str).is_ok(),
                "failed to parse filter: {filter_str}"
            );
        }
    }

    #[test]
    fn test_prepare_log_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested = temp_dir.path().join("logs");
        let path = prepare_log_file(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(path.file_name().unwrap(), LOG_FILE_NAME);
    }

    /// Shared in-memory writer for capturing formatted output.
    #[derive(Clone, Default)]
    struct Capture(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Capture {
        type Writer = Capture;
        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_json_layer_emits_parseable_lines() {
        let capture = Capture::default();
        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_writer(capture.clone())
                .with_ansi(false)
                .json(),
        );

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(chunk = "(0, 0)", "chunk loaded");
        });

        let output = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
        let line = output.lines().next().expect("one log line");
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(value["level"], "INFO");
        assert_eq!(value["fields"]["message"], "chunk loaded");
        assert_eq!(value["fields"]["chunk"], "(0, 0)");
    }
}
