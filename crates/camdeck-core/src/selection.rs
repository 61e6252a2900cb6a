//! The "currently selected device" state machine.
//!
//! Detail fetches are asynchronous, so a response can arrive after the
//! operator has already moved on. Every selection intent is stamped with
//! a monotonically increasing [`RequestToken`]; a response is applied
//! only while its token is still the live intent. Anything else is
//! silently discarded — last intent wins, stale responses never flash
//! an old device's data into the detail pane.

use camdeck_api::DeviceRecord;
use tracing::{debug, trace};

use crate::error::CoreError;

/// Identity of one selection intent. Tokens are never reused within a
/// controller's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

/// The live selection intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    pub device_id: String,
    pub token: RequestToken,
}

/// What to do with a resolved detail response.
#[derive(Debug)]
pub enum Resolution {
    /// The response matches the live intent; render it.
    Applied(Box<DeviceRecord>),
    /// Superseded by a newer intent; drop it without side effects.
    Stale,
    /// The live intent failed; selection has been cleared.
    Failed(CoreError),
}

/// What a list refresh implies for the current selection.
#[derive(Debug, PartialEq)]
pub enum ListSync {
    /// Nothing to do.
    Idle,
    /// The selected device is still listed; the boxed record is its
    /// fresh summary row, re-applied as-is. No new detail fetch is made:
    /// it would race the operator's in-progress form edits.
    Refresh(Box<DeviceRecord>),
    /// The selected device vanished from the list; selection was cleared.
    Cleared,
    /// No device was ever selected; the named device should be selected
    /// by default.
    AutoSelect(String),
}

/// Tracks the live selection intent and arbitrates responses against it.
#[derive(Debug, Default)]
pub struct SelectionController {
    current: Option<SelectionState>,
    next_token: u64,
    has_selected: bool,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// The id of the device the operator currently intends to view.
    pub fn selected_id(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.device_id.as_str())
    }

    /// Whether any selection (manual or automatic) has ever been made.
    pub fn has_selected(&self) -> bool {
        self.has_selected
    }

    /// Whether `token` is still the live intent.
    pub fn is_current(&self, token: RequestToken) -> bool {
        self.current.as_ref().is_some_and(|s| s.token == token)
    }

    /// Record a new selection intent and return its token.
    ///
    /// Any outstanding intent is superseded immediately; its response
    /// will resolve as [`Resolution::Stale`].
    pub fn begin(&mut self, device_id: &str) -> RequestToken {
        self.next_token += 1;
        let token = RequestToken(self.next_token);
        debug!(device_id, token = self.next_token, "selection intent");
        self.current = Some(SelectionState {
            device_id: device_id.to_owned(),
            token,
        });
        self.has_selected = true;
        token
    }

    /// Arbitrate a detail response against the live intent.
    pub fn resolve(
        &mut self,
        token: RequestToken,
        result: Result<DeviceRecord, CoreError>,
    ) -> Resolution {
        if !self.is_current(token) {
            trace!(token = token.0, "discarding stale detail response");
            return Resolution::Stale;
        }
        match result {
            Ok(record) => Resolution::Applied(Box::new(record)),
            Err(err) => {
                // A failed fetch leaves nothing valid to show.
                self.current = None;
                Resolution::Failed(err)
            }
        }
    }

    /// Reconcile the selection with a freshly fetched device list.
    ///
    /// Auto-selection fires at most once per controller lifetime: after
    /// the first selection (even one that later fails or is cleared) the
    /// dashboard never steals focus back.
    pub fn sync_with_list(&mut self, devices: &[DeviceRecord]) -> ListSync {
        if let Some(state) = &self.current {
            return match devices.iter().find(|d| d.device_id == state.device_id) {
                Some(record) => ListSync::Refresh(Box::new(record.clone())),
                None => {
                    debug!(device_id = %state.device_id, "selected device vanished");
                    self.current = None;
                    ListSync::Cleared
                }
            };
        }
        if !self.has_selected {
            if let Some(first) = devices.first() {
                self.has_selected = true;
                return ListSync::AutoSelect(first.device_id.clone());
            }
        }
        ListSync::Idle
    }

    /// Drop the current intent without forgetting that a selection was
    /// once made.
    pub fn clear(&mut self) {
        self.current = None;
    }
}
