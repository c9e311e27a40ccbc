//! Logging setup
//!
//! Installs the global tracing subscriber. `RUST_LOG` wins when set;
//! otherwise the configured level applies to this crate and `tower_http`.
//! Log lines go to stderr; stdout belongs to command output.
//!
//! Config loading runs before the configured subscriber exists, so binaries
//! wrap it in `with_bootstrap`, which reports warnings to stderr.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Output format of log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    /// Unknown values fall back to pretty output
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Filter directives used when `RUST_LOG` is unset
pub fn default_directives(config: &LoggingConfig) -> String {
    let level = config.level.trim();
    if level.contains('=') {
        return level.to_string();
    }
    format!("enrollview={level},tower_http={level}")
}

/// Install the global subscriber
///
/// Returns an error if a subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(config)));

    let registry = tracing_subscriber::registry().with(filter);

    match LogFormat::parse(&config.format) {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    }
}

/// Warning-level subscriber used until `init` runs
pub fn bootstrap_subscriber<W>(make_writer: W) -> impl tracing::Subscriber + Send + Sync + 'static
where
    W: for<'w> fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(EnvFilter::new("warn"))
        .with(fmt::layer().with_writer(make_writer))
}

/// Run `f` with warnings reported to stderr
pub fn with_bootstrap<T>(f: impl FnOnce() -> T) -> T {
    tracing::subscriber::with_default(bootstrap_subscriber(std::io::stderr), f)
}

/// In-memory log sink for tests
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub(crate) struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

#[cfg(test)]
impl CapturedLogs {
    pub(crate) fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

#[cfg(test)]
impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
impl<'a> fmt::MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_keeps_warnings_only() {
        let logs = CapturedLogs::default();
        tracing::subscriber::with_default(bootstrap_subscriber(logs.clone()), || {
            tracing::info!("config search started");
            tracing::warn!("config file unreadable");
        });

        let text = logs.text();
        assert!(text.contains("config file unreadable"));
        assert!(!text.contains("config search started"));
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse(" JSON "), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("compact"), LogFormat::Pretty);
    }

    #[test]
    fn test_default_directives() {
        let mut config = LoggingConfig::default();
        assert_eq!(default_directives(&config), "enrollview=info,tower_http=info");

        config.level = "enrollview=trace".to_string();
        assert_eq!(default_directives(&config), "enrollview=trace");
    }
}
