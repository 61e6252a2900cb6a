//! Async client for the camdeck device-registry service.
//!
//! The registry exposes three admin endpoints consumed by the dashboard:
//!
//! - `GET /admin/api/devices` — summary records for every known device
//! - `GET /admin/api/device/{id}` — the full record for one device
//! - `POST /admin/api/device/{id}/config` — persist edited configuration
//!
//! [`RegistryClient`] wraps `reqwest` with registry-specific URL
//! construction and error mapping. Payload shapes live in [`models`];
//! `camdeck-core` maps [`Error`] into user-facing diagnostics.

pub mod client;
pub mod error;
pub mod models;

pub use client::RegistryClient;
pub use error::Error;
pub use models::{ConfigUpdate, DeviceRecord};
