//! Shared application state injected into every Axum handler.

use crate::carrier::CarrierClient;

/// Application state shared across all request handlers.
///
/// Cloned per request; [`CarrierClient`] is `Arc`-backed so clones share one
/// connection pool and one set of derived keys.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Client for the carrier API, built once at startup.
    pub carrier: CarrierClient,
}

impl AppState {
    /// Create a new [`AppState`] around an already-configured carrier client.
    pub fn new(carrier: CarrierClient) -> Self {
        Self { carrier }
    }

    /// State pointing at `base_url` with sandbox credentials, for tests.
    #[cfg(test)]
    pub fn for_carrier(base_url: impl Into<String>) -> Self {
        use crate::carrier::Credentials;
        use std::time::Duration;

        let credentials = Credentials {
            app_code: "11111111".into(),
            secret_key: "uYMGr8eU".into(),
            base_url: base_url.into(),
        };
        Self::new(
            CarrierClient::new(credentials, Duration::from_secs(5))
                .expect("sandbox credentials are valid"),
        )
    }
}
