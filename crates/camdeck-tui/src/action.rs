//! All possible UI actions. Actions are the sole mechanism for state mutation.

use camdeck_core::{CoreError, DeviceRecord, RequestToken};

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// A transient status-line note.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

/// Which pane owns keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    List,
    Gallery,
    Form,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Self::List => Self::Gallery,
            Self::Gallery => Self::Form,
            Self::Form => Self::List,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::List => Self::Form,
            Self::Gallery => Self::List,
            Self::Form => Self::Gallery,
        }
    }
}

/// Every state transition in the TUI is expressed as an Action.
///
/// Fetch results carry `CoreError` (not `Clone`), so unlike pure-UI
/// actions these are moved, never re-dispatched.
#[derive(Debug)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Focus ──────────────────────────────────────────────────────
    FocusNext,
    FocusPrev,

    // ── Refresh cycle ──────────────────────────────────────────────
    /// Kick off a device-list fetch (manual `r` or the periodic timer).
    Refresh,
    /// A list fetch completed.
    DevicesFetched(Result<Vec<DeviceRecord>, CoreError>),

    // ── Selection ──────────────────────────────────────────────────
    CursorUp,
    CursorDown,
    /// Select the device under the list cursor.
    SelectUnderCursor,
    /// A detail fetch completed; the token decides whether it still
    /// matters. Boxed — a full record is an order of magnitude larger
    /// than any other action.
    DeviceFetched(RequestToken, Result<Box<DeviceRecord>, CoreError>),

    // ── Gallery ────────────────────────────────────────────────────
    GalleryNextPage,
    GalleryPrevPage,
    /// Promote the n-th thumbnail of the current page (0-based).
    GalleryPickMain(usize),
    /// Open the main image, full size, in the system browser.
    OpenOriginal,

    // ── Config form ────────────────────────────────────────────────
    FormUp,
    FormDown,
    FormToggle,
    SubmitConfig,
    /// A config POST completed.
    ConfigSaved(Result<(), CoreError>),
}
