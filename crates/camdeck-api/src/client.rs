// Registry HTTP client
//
// Wraps `reqwest::Client` with registry-specific URL construction and
// response handling. All methods return decoded payloads — status and
// decode failures are normalized into `Error` before the caller sees them.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{ConfigUpdate, DeviceRecord};

/// HTTP client for the device-registry admin API.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct RegistryClient {
    http: reqwest::Client,
    base_url: Url,
}

impl RegistryClient {
    /// Create a new client for the registry at `base_url`
    /// (e.g. `http://192.168.1.10:8080`).
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The registry base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an image URL against the registry base. Registries report
    /// preview paths relative to their own origin; absolute URLs pass
    /// through unchanged.
    pub fn resolve_url(&self, url: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(url)?)
    }

    /// Build a full URL for an admin API path: `{base}/admin/api/{path}`.
    fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/admin/api/{path}"))?)
    }

    // ── Endpoints ───────────────────────────────────────────────────

    /// Fetch summary records for every known device.
    pub async fn list_devices(&self) -> Result<Vec<DeviceRecord>, Error> {
        let url = self.api_url("devices")?;
        debug!("GET {}", url);
        let resp = self.http.get(url).send().await?;
        decode(resp).await
    }

    /// Fetch the full record for one device.
    ///
    /// A 404 response means the device no longer exists; callers can
    /// distinguish it via [`Error::is_not_found`].
    pub async fn get_device(&self, device_id: &str) -> Result<DeviceRecord, Error> {
        let url = self.api_url(&format!("device/{device_id}"))?;
        debug!("GET {}", url);
        let resp = self.http.get(url).send().await?;
        decode(resp).await
    }

    /// Persist edited configuration for one device.
    ///
    /// The registry replies with a small ack object; the dashboard always
    /// re-fetches after a successful submit, so the body is not decoded.
    pub async fn update_config(
        &self,
        device_id: &str,
        update: &ConfigUpdate,
    ) -> Result<(), Error> {
        let url = self.api_url(&format!("device/{device_id}/config"))?;
        debug!("POST {}", url);
        let resp = self.http.post(url).json(update).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }
}

/// Check the status, then decode the JSON body.
///
/// Reads the body as text first so decode failures can carry the raw
/// payload for debugging.
async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();

    if !status.is_success() {
        return Err(Error::Http {
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body,
    })
}
