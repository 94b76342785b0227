//! SpeedAF carrier gateway.
//!
//! [`carrier`] seals requests in the carrier's signed 3DES envelope and
//! decodes its replies; [`server`] exposes the REST API that workflow tools
//! call; [`order`] shapes REST bodies into carrier payloads.

pub mod carrier;
pub mod config;
pub mod crypto;
pub mod order;
pub mod server;
pub mod telemetry;
