//! Tracing setup shared by the service and the sample producer
//!
//! `RUST_LOG` overrides the configured level. Production writes one JSON
//! object per line; every other environment gets the multi-line pretty
//! format.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

use crate::error::{Error, Result};

/// Install the global subscriber
///
/// Fails if a subscriber is already installed.
pub fn init_tracing(log_level: &str, environment: &str) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(log_level)));
    let registry = Registry::default().with(env_filter);

    let installed = if environment == "production" {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_file(true)
                    .with_line_number(true)
                    .with_thread_ids(true)
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .with_current_span(true),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .pretty()
                    .with_file(true)
                    .with_line_number(true)
                    .with_target(true),
            )
            .try_init()
    };
    installed.map_err(|e| Error::internal(format!("Failed to initialize tracing: {}", e)))?;

    tracing::info!(environment, log_level, "Logging initialized");
    Ok(())
}

/// Filter used when `RUST_LOG` is unset: both binaries at `log_level`,
/// request traces at debug
fn default_directives(log_level: &str) -> String {
    format!(
        "salesfeed={level},sales_producer={level},tower_http=debug",
        level = log_level
    )
}

/// Span wrapping the handling of one consumed message
#[macro_export]
macro_rules! kafka_span {
    ($partition:expr, $offset:expr) => {
        tracing::info_span!("kafka_message", partition = $partition, offset = $offset)
    };
}

/// Log an error with its display and debug forms plus optional fields
#[macro_export]
macro_rules! log_error {
    ($error:expr, $msg:expr) => {
        tracing::error!(
            error = %$error,
            error_type = ?$error,
            $msg
        )
    };
    ($error:expr, $msg:expr, $($key:ident = $value:expr),* $(,)?) => {
        tracing::error!(
            error = %$error,
            error_type = ?$error,
            $($key = tracing::field::display(&$value),)*
            $msg
        )
    };
}

/// Measures one operation and reports it at debug on `stop`
pub struct Timer {
    start: std::time::Instant,
    operation: &'static str,
}

impl Timer {
    pub fn start(operation: &'static str) -> Self {
        Timer {
            start: std::time::Instant::now(),
            operation,
        }
    }

    /// Log and return the elapsed time
    pub fn stop(self) -> std::time::Duration {
        let duration = self.start.elapsed();
        tracing::debug!(
            operation = self.operation,
            duration_us = duration.as_micros() as u64,
            "Operation completed"
        );
        duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer() {
        let timer = Timer::start("test_operation");
        std::thread::sleep(std::time::Duration::from_millis(10));
        let duration = timer.stop();
        assert!(duration.as_millis() >= 10);
    }

    #[test]
    fn test_default_directives() {
        let directives = default_directives("warn");
        assert!(directives.contains("salesfeed=warn"));
        assert!(EnvFilter::try_new(directives).is_ok());
    }

    #[test]
    fn test_log_error_macro_accepts_context() {
        let error = crate::error::Error::kafka("broker unavailable");
        log_error!(error, "Something failed");
        log_error!(error, "Something failed again", attempt = 2);
    }
}
