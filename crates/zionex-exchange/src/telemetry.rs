//! Logging setup for hosts embedding the exchange.

use tracing_subscriber::EnvFilter;
use zionex_types::{ExchangeError, Result, TelemetryConfig};

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins over `config.filter` when set.
///
/// # Errors
/// Returns `Configuration` if the filter does not parse or a global
/// subscriber is already installed.
pub fn init(config: &TelemetryConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.filter)
            .map_err(|e| ExchangeError::Configuration(format!("log filter {}: {e}", config.filter)))?,
    };

    let builder = tracing_subscriber::FmtSubscriber::builder().with_env_filter(filter);
    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| ExchangeError::Configuration(format!("tracing subscriber: {e}")))?;

    tracing::debug!(filter = %config.filter, json = config.json, "telemetry initialised");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_refused() {
        let config = TelemetryConfig::default();
        // Another test in this binary may already own the global subscriber.
        let _ = init(&config);
        let err = init(&config).unwrap_err();
        assert!(matches!(err, ExchangeError::Configuration(_)));
    }

    #[test]
    fn bad_filter_is_a_configuration_error() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = TelemetryConfig {
            filter: "zionex=loudest".to_string(),
            json: false,
        };
        let err = init(&config).unwrap_err();
        assert!(matches!(err, ExchangeError::Configuration(_)));
    }
}
