//! Configuration loading and validation for the gateway.
//!
//! All values are read from environment variables at startup. Carrier
//! credentials fall back to the carrier's public UAT sandbox placeholders, so
//! an unconfigured process can never reach production.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::carrier::Credentials;
use crate::server::middleware::REQUEST_TIMEOUT;

/// Validated gateway configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Carrier-issued application code (`SPEEDAF_APP_CODE`).
    #[serde(default = "default_app_code")]
    pub speedaf_app_code: String,

    /// Carrier-issued signing/encryption secret (`SPEEDAF_SECRET_KEY`).
    #[serde(default = "default_secret_key")]
    pub speedaf_secret_key: String,

    /// Carrier API root (`SPEEDAF_BASE_URL`).
    #[serde(default = "default_base_url")]
    pub speedaf_base_url: String,

    /// Port the HTTP server listens on (`PORT`).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Upper bound (seconds) on a single carrier call, connect to last byte.
    #[serde(default = "default_carrier_timeout")]
    pub carrier_timeout_secs: u64,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// OTLP endpoint. Spans are only exported when set.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,
}

fn default_app_code() -> String {
    "11111111".into()
}
fn default_secret_key() -> String {
    "uYMGr8eU".into()
}
fn default_base_url() -> String {
    "https://uat-api.speedaf.com".into()
}
fn default_port() -> u16 {
    8080
}
fn default_carrier_timeout() -> u64 {
    30
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Carrier credentials for [`crate::carrier::CarrierClient`].
    pub fn credentials(&self) -> Credentials {
        Credentials {
            app_code: self.speedaf_app_code.clone(),
            secret_key: self.speedaf_secret_key.clone(),
            base_url: self.speedaf_base_url.clone(),
        }
    }

    pub fn carrier_timeout(&self) -> Duration {
        Duration::from_secs(self.carrier_timeout_secs)
    }

    /// Whether the carrier credentials are still the sandbox placeholders.
    pub fn uses_sandbox_credentials(&self) -> bool {
        self.speedaf_app_code == default_app_code()
            && self.speedaf_secret_key == default_secret_key()
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        ensure_non_empty(&self.speedaf_app_code, "SPEEDAF_APP_CODE")?;
        ensure_non_empty(&self.speedaf_secret_key, "SPEEDAF_SECRET_KEY")?;
        ensure_non_empty(&self.speedaf_base_url, "SPEEDAF_BASE_URL")?;

        if !(self.speedaf_base_url.starts_with("https://")
            || self.speedaf_base_url.starts_with("http://"))
        {
            anyhow::bail!("SPEEDAF_BASE_URL must start with http:// or https://");
        }
        if self.carrier_timeout_secs == 0 {
            anyhow::bail!("CARRIER_TIMEOUT_SECS must be > 0");
        }
        if self.carrier_timeout() >= REQUEST_TIMEOUT {
            anyhow::bail!(
                "CARRIER_TIMEOUT_SECS must be below the {}s request timeout",
                REQUEST_TIMEOUT.as_secs()
            );
        }
        if let Some(endpoint) = &self.otel_exporter_otlp_endpoint {
            ensure_non_empty(endpoint, "OTEL_EXPORTER_OTLP_ENDPOINT")?;
        }
        Ok(())
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Config {
        Config {
            speedaf_app_code: default_app_code(),
            speedaf_secret_key: default_secret_key(),
            speedaf_base_url: default_base_url(),
            port: default_port(),
            carrier_timeout_secs: default_carrier_timeout(),
            log_level: default_log_level(),
            otel_exporter_otlp_endpoint: None,
        }
    }

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_app_code(), "11111111");
        assert_eq!(default_secret_key(), "uYMGr8eU");
        assert_eq!(default_base_url(), "https://uat-api.speedaf.com");
        assert_eq!(default_port(), 8080);
        assert_eq!(default_carrier_timeout(), 30);
        assert_eq!(default_log_level(), "info");
    }

    #[test]
    fn defaults_point_at_sandbox() {
        let cfg = valid();
        assert!(cfg.validate().is_ok());
        assert!(cfg.uses_sandbox_credentials());
        assert!(cfg.speedaf_base_url.contains("uat-"));
    }

    #[test]
    fn validate_rejects_empty_secret() {
        let cfg = Config {
            speedaf_secret_key: "  ".into(),
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_url_without_scheme() {
        let cfg = Config {
            speedaf_base_url: "uat-api.speedaf.com".into(),
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let cfg = Config {
            carrier_timeout_secs: 0,
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_timeout_beyond_request_timeout() {
        let cfg = Config {
            carrier_timeout_secs: REQUEST_TIMEOUT.as_secs(),
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn credentials_mirror_config() {
        let cfg = Config {
            speedaf_app_code: "APP".into(),
            ..valid()
        };
        let creds = cfg.credentials();
        assert_eq!(creds.app_code, "APP");
        assert_eq!(creds.base_url, default_base_url());
        assert!(!cfg.uses_sandbox_credentials());
        assert_eq!(cfg.carrier_timeout(), Duration::from_secs(30));
    }
}
