//! State synchronization engine between `camdeck-api` and UI front ends.
//!
//! This crate owns the dashboard's non-trivial client-side logic; front
//! ends supply rendering and input while everything stateful lives here:
//!
//! - **[`CardReconciler`]** — reconciles a freshly fetched device list
//!   against the set of rendered device cards with minimal structural
//!   change: update in place by `deviceId`, insert new, remove vanished,
//!   reorder to match list order. Cards keep their identity (and any
//!   transient UI state hung off them) across refreshes.
//!
//! - **[`Gallery`]** — the paginated preview-image state for the selected
//!   device: ordered URL sequence, fixed-size page window, and one
//!   independently selectable "main" image.
//!
//! - **[`SelectionController`]** — the single "currently selected device"
//!   state machine. Detail fetches carry a monotonically assigned
//!   [`RequestToken`]; a response applies only while its token is still
//!   the live intent, so a slow fetch for a previously selected device
//!   can never overwrite a newer selection (last-intent-wins).
//!
//! - **[`DashboardSession`]** — the refresh orchestrator tying the above
//!   to a [`RegistryClient`](camdeck_api::RegistryClient): list refresh,
//!   default selection on first load, config submission, and the
//!   "never loaded" vs "refresh failed after load" distinction.
//!
//! Front ends plug in by implementing [`CardPane`], the minimal
//! capability surface the reconciler drives.

pub mod card;
pub mod error;
pub mod form;
pub mod format;
pub mod gallery;
pub mod reconcile;
pub mod selection;
pub mod session;

pub use card::{AiIndicator, CardContent, CardPane, DeviceStatus, OFFLINE_AFTER_SECS};
pub use error::CoreError;
pub use form::FormState;
pub use gallery::{Gallery, PAGE_SIZE, bust, strip_bust};
pub use reconcile::CardReconciler;
pub use selection::{ListSync, RequestToken, Resolution, SelectionController, SelectionState};
pub use session::{DashboardSession, ListOutcome, RefreshOutcome, SelectOutcome};

// Re-export the wire types front ends handle directly.
pub use camdeck_api::{ConfigUpdate, DeviceRecord};
