//! Wire types for the device-registry admin API.
//!
//! The registry speaks camelCase JSON. Every field except `deviceId` is
//! optional on the wire — devices register incrementally and older rows
//! may predate newer columns — so absence is modeled with `Option` and
//! never treated as an error.

use serde::{Deserialize, Serialize};

/// One camera device as reported by the registry.
///
/// The same shape is used by the list endpoint (summary) and the detail
/// endpoint (full record). The detail endpoint additionally probes the AI
/// layer and fills `ai_reachable`; on summaries it is usually absent.
/// `ai_reachable` is tri-state: `Some(true)` / `Some(false)` / `None`
/// (unknown) — unknown is distinct from unreachable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRecord {
    /// Opaque stable identifier; the reconciliation key.
    pub device_id: String,

    // ── Telemetry ───────────────────────────────────────────────────
    pub fw: Option<String>,
    pub ip: Option<String>,
    pub rssi: Option<i64>,
    pub model: Option<String>,
    /// Epoch seconds of the last heartbeat; absent or zero means unknown.
    pub last_seen: Option<i64>,

    // ── Capture / upload configuration ──────────────────────────────
    pub framesize: Option<String>,
    pub jpeg_quality: Option<i64>,
    pub upload_interval_sec: Option<i64>,
    pub auto_upload: Option<bool>,
    pub upload_url: Option<String>,

    // ── Captured images ─────────────────────────────────────────────
    /// Singular fallback kept for registries that predate `lastImgUrls`.
    pub last_img_url: Option<String>,
    pub last_img_time: Option<i64>,
    #[serde(default)]
    pub last_img_urls: Vec<String>,

    // ── AI subsystem ────────────────────────────────────────────────
    pub last_analysis: Option<String>,
    pub last_analysis_time: Option<i64>,
    pub ai_host: Option<String>,
    pub ai_model: Option<String>,
    pub ai_prompt: Option<String>,
    pub ai_num_ctx: Option<i64>,
    pub ai_num_predict: Option<i64>,
    pub ai_reachable: Option<bool>,

    // ── Sensor tuning ───────────────────────────────────────────────
    pub whitebal: Option<bool>,
    pub wb_mode: Option<i64>,
    pub hmirror: Option<bool>,
    pub vflip: Option<bool>,
    pub brightness: Option<i64>,
    pub contrast: Option<i64>,
    pub saturation: Option<i64>,
    pub sharpness: Option<i64>,
    pub awb_gain: Option<bool>,
    pub gain_ctrl: Option<bool>,
    pub exposure_ctrl: Option<bool>,
    pub gainceiling: Option<i64>,
    pub ae_level: Option<i64>,
    pub lens_corr: Option<bool>,
    pub raw_gma: Option<bool>,
    pub bpc: Option<bool>,
    pub wpc: Option<bool>,
    pub dcw: Option<bool>,
    pub colorbar: Option<bool>,
    pub special_effect: Option<i64>,
    pub low_light_boost: Option<bool>,
}

impl DeviceRecord {
    /// The ordered preview URL sequence for this device.
    ///
    /// Prefers the plural `lastImgUrls` field; falls back to the singular
    /// `lastImgUrl` for older registry rows; empty when neither is set.
    pub fn preview_urls(&self) -> Vec<String> {
        if !self.last_img_urls.is_empty() {
            return self.last_img_urls.clone();
        }
        self.last_img_url.clone().into_iter().collect()
    }

    /// `last_seen` with the "zero means unknown" rule applied.
    pub fn last_seen_epoch(&self) -> Option<i64> {
        self.last_seen.filter(|ts| *ts > 0)
    }

    /// `last_img_time` with the "zero means unknown" rule applied.
    pub fn last_img_epoch(&self) -> Option<i64> {
        self.last_img_time.filter(|ts| *ts > 0)
    }
}

/// Body for `POST /admin/api/device/{id}/config`.
///
/// Every editable field is always present: string fields default to the
/// empty string rather than being omitted (so the operator can explicitly
/// clear them), numeric fields serialize as `null` when left blank. The
/// one exception is `upload_token` — it is write-only, never echoed back
/// by the registry, and included only when the operator typed one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigUpdate {
    pub framesize: String,
    pub jpeg_quality: Option<i64>,
    pub upload_interval_sec: Option<i64>,
    pub auto_upload: bool,
    pub upload_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_token: Option<String>,

    pub whitebal: bool,
    pub wb_mode: Option<i64>,
    pub hmirror: bool,
    pub vflip: bool,
    pub brightness: Option<i64>,
    pub contrast: Option<i64>,
    pub saturation: Option<i64>,
    pub sharpness: Option<i64>,
    pub awb_gain: bool,
    pub gain_ctrl: bool,
    pub exposure_ctrl: bool,
    pub gainceiling: Option<i64>,
    pub ae_level: Option<i64>,
    pub lens_corr: bool,
    pub raw_gma: bool,
    pub bpc: bool,
    pub wpc: bool,
    pub dcw: bool,
    pub colorbar: bool,
    pub special_effect: Option<i64>,
    pub low_light_boost: bool,

    pub ai_host: String,
    pub ai_model: String,
    pub ai_prompt: String,
    pub ai_num_ctx: Option<i64>,
    pub ai_num_predict: Option<i64>,
}
