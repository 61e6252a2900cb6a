// ── Core error types ──
//
// User-facing errors from camdeck-core. These are NOT transport-specific --
// consumers see "registry unreachable", not a reqwest error chain. The
// `From<camdeck_api::Error>` impl translates transport-layer failures
// into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Registry unreachable: {reason}")]
    RegistryUnreachable { reason: String },

    #[error("Device not found: {device_id}")]
    DeviceNotFound { device_id: String },

    /// Non-2xx registry response that isn't a missing device.
    #[error("Registry error: {message}")]
    Api {
        message: String,
        status: Option<u16>,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<camdeck_api::Error> for CoreError {
    fn from(err: camdeck_api::Error) -> Self {
        match err {
            camdeck_api::Error::Transport(ref e) if e.is_connect() || e.is_timeout() => {
                CoreError::RegistryUnreachable {
                    reason: e.to_string(),
                }
            }
            camdeck_api::Error::Transport(e) => CoreError::Api {
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
            },
            camdeck_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            camdeck_api::Error::Http { status, body } => {
                let body = body.trim();
                CoreError::Api {
                    message: if body.is_empty() {
                        format!("HTTP {status}")
                    } else {
                        format!("HTTP {status}: {body}")
                    },
                    status: Some(status),
                }
            }
            camdeck_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
