//! Configuration types for a zionex exchange instance.

use serde::{Deserialize, Serialize};

use crate::{AccountId, ExchangeError, Result, constants};

/// Configuration fixed at exchange initialisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// Account credited with the fee leg of every fill.
    pub fee_account: AccountId,
    /// Percent of the owner's `want_amount` charged to the filler.
    pub fee_percent: u32,
    /// Logging configuration.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl ExchangeConfig {
    /// Config with the default fee percent and telemetry.
    #[must_use]
    pub fn new(fee_account: AccountId) -> Self {
        Self {
            fee_account,
            fee_percent: constants::DEFAULT_FEE_PERCENT,
            telemetry: TelemetryConfig::default(),
        }
    }

    #[must_use]
    pub fn with_fee_percent(mut self, fee_percent: u32) -> Self {
        self.fee_percent = fee_percent;
        self
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read the config from `ZIONEX_*` environment variables.
    ///
    /// `ZIONEX_FEE_ACCOUNT` is required; the rest fall back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let fee_account = lookup(constants::ENV_FEE_ACCOUNT)
            .ok_or_else(|| {
                ExchangeError::Configuration(format!("{} is not set", constants::ENV_FEE_ACCOUNT))
            })?
            .parse()
            .map_err(|e| {
                ExchangeError::Configuration(format!("{}: {e}", constants::ENV_FEE_ACCOUNT))
            })?;

        let fee_percent = match lookup(constants::ENV_FEE_PERCENT) {
            Some(raw) => raw.trim().parse().map_err(|e| {
                ExchangeError::Configuration(format!("{}={raw}: {e}", constants::ENV_FEE_PERCENT))
            })?,
            None => constants::DEFAULT_FEE_PERCENT,
        };

        let mut telemetry = TelemetryConfig::default();
        if let Some(filter) = lookup(constants::ENV_LOG) {
            telemetry.filter = filter;
        }
        if let Some(json) = lookup(constants::ENV_LOG_JSON) {
            telemetry.json = matches!(json.trim(), "1" | "true" | "TRUE" | "yes");
        }

        let config = Self {
            fee_account,
            fee_percent,
            telemetry,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values the exchange cannot operate with.
    pub fn validate(&self) -> Result<()> {
        if self.fee_percent > constants::MAX_FEE_PERCENT {
            return Err(ExchangeError::Configuration(format!(
                "fee_percent {} exceeds {}",
                self.fee_percent,
                constants::MAX_FEE_PERCENT
            )));
        }
        Ok(())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// `tracing` filter directive, overridden by `RUST_LOG` when set.
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            filter: constants::DEFAULT_LOG_FILTER.to_string(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::Address;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let cfg = ExchangeConfig::new(Address::repeat_byte(1));
        assert_eq!(cfg.fee_percent, 10);
        assert_eq!(cfg.telemetry.filter, "info");
        assert!(!cfg.telemetry.json);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn fee_percent_above_hundred_rejected() {
        let cfg = ExchangeConfig::new(Address::repeat_byte(1)).with_fee_percent(101);
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, ExchangeError::Configuration(_)));
    }

    #[test]
    fn from_json_without_telemetry_section() {
        let json = format!(
            r#"{{"fee_account":"{}","fee_percent":5}}"#,
            Address::repeat_byte(2)
        );
        let cfg = ExchangeConfig::from_json_str(&json).unwrap();
        assert_eq!(cfg.fee_account, Address::repeat_byte(2));
        assert_eq!(cfg.fee_percent, 5);
        assert_eq!(cfg.telemetry, TelemetryConfig::default());
    }

    #[test]
    fn from_json_rejects_garbage() {
        let err = ExchangeConfig::from_json_str("{").unwrap_err();
        assert!(matches!(err, ExchangeError::Serialization(_)));
    }

    #[test]
    fn from_lookup_reads_all_variables() {
        let account = Address::repeat_byte(3).to_string();
        let cfg = ExchangeConfig::from_lookup(env(&[
            ("ZIONEX_FEE_ACCOUNT", account.as_str()),
            ("ZIONEX_FEE_PERCENT", "25"),
            ("ZIONEX_LOG", "zionex=debug"),
            ("ZIONEX_LOG_JSON", "1"),
        ]))
        .unwrap();
        assert_eq!(cfg.fee_account, Address::repeat_byte(3));
        assert_eq!(cfg.fee_percent, 25);
        assert_eq!(cfg.telemetry.filter, "zionex=debug");
        assert!(cfg.telemetry.json);
    }

    #[test]
    fn from_lookup_requires_fee_account() {
        let err = ExchangeConfig::from_lookup(env(&[])).unwrap_err();
        assert!(err.to_string().contains("ZIONEX_FEE_ACCOUNT"));
    }

    #[test]
    fn from_lookup_rejects_bad_percent() {
        let account = Address::repeat_byte(3).to_string();
        let err = ExchangeConfig::from_lookup(env(&[
            ("ZIONEX_FEE_ACCOUNT", account.as_str()),
            ("ZIONEX_FEE_PERCENT", "ten"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ExchangeError::Configuration(_)));
    }
}
