//! Structured logging and optional OpenTelemetry span export.
//!
//! # Telemetry invariants
//!
//! - **No secret or key material** must appear in any span attribute or log field.
//! - Request and response bodies are not logged; bill codes and endpoint names may be.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`).

pub mod init;

pub use init::init_telemetry;
