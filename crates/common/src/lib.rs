//! Request/response types and errors shared across the SpeedAF gateway crates.

pub mod error;
pub mod protocol;

pub use error::ServiceError;
