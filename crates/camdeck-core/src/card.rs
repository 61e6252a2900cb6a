//! Device card content and the pane capability surface.
//!
//! A card is the rendered representation of one device in the list pane.
//! [`CardContent`] holds every display string fully recomputed from the
//! record on each refresh — updates are idempotent writes, not diffs —
//! while the [`CardPane`] trait is the minimal surface the reconciler
//! needs from a front end: create, apply, reorder, remove.

use camdeck_api::DeviceRecord;

use crate::format::{fmt_epoch_or_dash, fmt_num, fmt_str};

/// A device is offline once its last heartbeat is older than this.
pub const OFFLINE_AFTER_SECS: i64 = 60;

/// Online/offline classification for the status chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceStatus {
    Online,
    Offline,
}

impl DeviceStatus {
    /// Classify from a raw `lastSeen` value. Absent and zero both mean
    /// "unknown", which renders as offline.
    pub fn classify(last_seen: Option<i64>, now: i64) -> Self {
        match last_seen.filter(|ts| *ts > 0) {
            Some(ts) if now - ts <= OFFLINE_AFTER_SECS => Self::Online,
            _ => Self::Offline,
        }
    }

    pub fn is_offline(self) -> bool {
        self == Self::Offline
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Online => "Online",
            Self::Offline => "Offline",
        }
    }
}

/// Tri-state AI-layer reachability indicator.
///
/// Unknown is NOT the same as offline: a summary row that was never
/// probed must render with the indicator hidden, not red.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiIndicator {
    /// Reachability was never probed — render nothing.
    Unknown,
    Online,
    Offline,
}

impl AiIndicator {
    pub fn from_flag(reachable: Option<bool>) -> Self {
        match reachable {
            None => Self::Unknown,
            Some(true) => Self::Online,
            Some(false) => Self::Offline,
        }
    }

    pub fn is_hidden(self) -> bool {
        self == Self::Unknown
    }

    /// Hover/help text; `None` while unknown.
    pub fn title(self) -> Option<&'static str> {
        match self {
            Self::Unknown => None,
            Self::Online => Some("AI layer reachable"),
            Self::Offline => Some("AI layer unreachable"),
        }
    }
}

/// Fully computed display content for one device card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardContent {
    pub device_id: String,
    pub status: DeviceStatus,
    pub ai: AiIndicator,
    pub ip: String,
    pub rssi: String,
    pub auto_upload: String,
    pub framesize: String,
    pub quality: String,
    pub interval: String,
    pub last_upload: String,
    pub last_seen: String,
    /// Shown only when the device has one configured.
    pub upload_url: Option<String>,
}

impl CardContent {
    /// Compute every field from a record. Missing optionals degrade to
    /// placeholders; this never fails.
    pub fn from_record(record: &DeviceRecord, now: i64) -> Self {
        let interval = record
            .upload_interval_sec
            .map_or_else(|| "-".into(), |v| format!("{v}s"));

        Self {
            device_id: record.device_id.clone(),
            status: DeviceStatus::classify(record.last_seen, now),
            ai: AiIndicator::from_flag(record.ai_reachable),
            ip: format!("IP: {}", fmt_str(record.ip.as_deref())),
            rssi: format!("RSSI: {}", fmt_num(record.rssi)),
            auto_upload: format!(
                "Auto: {}",
                if record.auto_upload.unwrap_or(false) {
                    "on"
                } else {
                    "off"
                }
            ),
            framesize: format!("FS: {}", fmt_str(record.framesize.as_deref())),
            quality: format!("Q: {}", fmt_num(record.jpeg_quality)),
            interval: format!("Interval: {interval}"),
            last_upload: format!("Last JPEG: {}", fmt_epoch_or_dash(record.last_img_time)),
            last_seen: format!("Last seen: {}", fmt_epoch_or_dash(record.last_seen)),
            upload_url: record
                .upload_url
                .as_deref()
                .filter(|u| !u.is_empty())
                .map(String::from),
        }
    }
}

/// The rendered list pane, as seen by the reconciler.
///
/// Handles are stable references to rendered cards: cloneable, compared
/// by identity. A front end keeps whatever transient state it likes on
/// the card behind the handle — the reconciler only ever updates content
/// in place, so that state survives refreshes as long as the device does.
pub trait CardPane {
    type Handle: Clone + PartialEq;

    /// Create a new (empty) card for a device and append it to the pane.
    fn create_card(&mut self, device_id: &str) -> Self::Handle;

    /// Write the full content of a card. Called on every refresh cycle.
    fn apply(&mut self, card: &Self::Handle, content: &CardContent);

    /// The handle currently occupying a position, if any.
    fn card_at(&self, index: usize) -> Option<Self::Handle>;

    /// Move a card so it occupies `index`, shifting others as needed.
    fn move_card(&mut self, card: &Self::Handle, index: usize);

    /// Remove a card from the pane.
    fn remove_card(&mut self, card: &Self::Handle);
}
