//! Refresh orchestration for one dashboard session.
//!
//! [`DashboardSession`] ties the registry client to the reconciler, the
//! selection controller, and the gallery. The synchronous entry points
//! (`apply_device_list`, `begin_select`, `complete_select`) are the
//! resumption points an event-driven front end calls when a spawned
//! fetch completes; the async methods compose them for callers that can
//! simply await.

use camdeck_api::RegistryClient;
use tracing::{debug, warn};

use crate::card::CardPane;
use crate::error::CoreError;
use crate::form::FormState;
use crate::gallery::Gallery;
use crate::reconcile::CardReconciler;
use crate::selection::{ListSync, RequestToken, Resolution, SelectionController};
use crate::{ConfigUpdate, DeviceRecord};

/// Result of applying one fetched device list.
#[derive(Debug, PartialEq)]
pub enum ListOutcome {
    /// The registry reported no devices; all content was cleared.
    Empty,
    /// Cards were reconciled; the selection (if any) is unaffected or
    /// had its preview re-derived.
    Refreshed,
    /// The selected device vanished; its detail content was cleared.
    SelectionCleared,
    /// First load with no prior selection: the caller should select the
    /// named device.
    AutoSelect(String),
}

/// Result of resolving a detail fetch.
#[derive(Debug)]
pub enum SelectOutcome {
    /// The fetch matched the live intent; the boxed form is freshly
    /// populated from the record.
    Applied(Box<FormState>),
    /// Superseded by a newer selection; nothing changed.
    Stale,
    /// The live intent failed. Previously rendered detail content is
    /// kept; only the selection itself is gone.
    Failed(CoreError),
}

/// Result of one full refresh cycle.
#[derive(Debug)]
pub enum RefreshOutcome {
    Empty,
    Refreshed,
    SelectionCleared,
    /// First load auto-selected a device and populated its form.
    AutoSelected(Box<FormState>),
    /// First load auto-selected a device but its detail fetch failed.
    AutoSelectFailed(CoreError),
}

/// Owns all mutable dashboard state for one front end.
pub struct DashboardSession<P: CardPane> {
    client: RegistryClient,
    reconciler: CardReconciler<P>,
    selection: SelectionController,
    gallery: Gallery,
    /// Last applied detail record for the selected device.
    selected: Option<DeviceRecord>,
    list_loaded_once: bool,
    device_count: usize,
}

impl<P: CardPane> DashboardSession<P> {
    pub fn new(client: RegistryClient) -> Self {
        Self {
            client,
            reconciler: CardReconciler::new(),
            selection: SelectionController::new(),
            gallery: Gallery::new(),
            selected: None,
            list_loaded_once: false,
            device_count: 0,
        }
    }

    // ── Accessors ───────────────────────────────────────────────────

    /// Whether any device list has ever been applied. Distinguishes
    /// "never loaded" (fetch failure is fatal to the content area) from
    /// "refresh failed after load" (content stays, error is transient).
    pub fn has_loaded_once(&self) -> bool {
        self.list_loaded_once
    }

    pub fn device_count(&self) -> usize {
        self.device_count
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    pub fn gallery_mut(&mut self) -> &mut Gallery {
        &mut self.gallery
    }

    /// The detail record currently rendered, if any. May outlive the
    /// selection itself after a failed re-fetch.
    pub fn selected_record(&self) -> Option<&DeviceRecord> {
        self.selected.as_ref()
    }

    /// The id of the device the operator currently intends to view.
    pub fn selected_id(&self) -> Option<&str> {
        self.selection.selected_id()
    }

    pub fn client(&self) -> &RegistryClient {
        &self.client
    }

    // ── Synchronous resumption points ───────────────────────────────

    /// Apply a fetched device list: reconcile cards, update the count,
    /// and sync the selection.
    pub fn apply_device_list(
        &mut self,
        pane: &mut P,
        devices: &[DeviceRecord],
        now: i64,
    ) -> ListOutcome {
        self.list_loaded_once = true;
        self.device_count = devices.iter().filter(|d| !d.device_id.is_empty()).count();

        if devices.is_empty() {
            debug!("device list empty, clearing dashboard");
            self.reconciler.clear(pane);
            self.selection.clear();
            self.gallery.clear();
            self.selected = None;
            return ListOutcome::Empty;
        }

        self.reconciler.reconcile(pane, devices, now);

        match self.selection.sync_with_list(devices) {
            ListSync::Idle => ListOutcome::Refreshed,
            ListSync::Refresh(record) => {
                // Fresh summary row for the still-selected device: the
                // preview and status re-derive, form content is left to
                // the front end.
                self.gallery.load(record.preview_urls());
                self.selected = Some(*record);
                ListOutcome::Refreshed
            }
            ListSync::Cleared => {
                self.gallery.clear();
                self.selected = None;
                ListOutcome::SelectionCleared
            }
            ListSync::AutoSelect(id) => ListOutcome::AutoSelect(id),
        }
    }

    /// Record a selection intent; the caller fetches the detail record
    /// and resumes via [`complete_select`](Self::complete_select).
    pub fn begin_select(&mut self, device_id: &str) -> RequestToken {
        self.selection.begin(device_id)
    }

    /// Resolve a detail fetch against the live intent.
    pub fn complete_select(
        &mut self,
        token: RequestToken,
        result: Result<DeviceRecord, CoreError>,
    ) -> SelectOutcome {
        match self.selection.resolve(token, result) {
            Resolution::Applied(record) => {
                self.gallery.load(record.preview_urls());
                let form = FormState::from_record(&record);
                self.selected = Some(*record);
                SelectOutcome::Applied(Box::new(form))
            }
            Resolution::Stale => SelectOutcome::Stale,
            Resolution::Failed(err) => {
                warn!(error = %err, "detail fetch failed");
                SelectOutcome::Failed(err)
            }
        }
    }

    // ── Async conveniences ──────────────────────────────────────────

    /// Run one full refresh cycle: fetch the list, reconcile, sync the
    /// selection, and drive the first-load auto-selection to completion.
    pub async fn refresh(&mut self, pane: &mut P) -> Result<RefreshOutcome, CoreError> {
        let devices = self.client.list_devices().await.map_err(CoreError::from)?;
        let now = chrono::Utc::now().timestamp();

        match self.apply_device_list(pane, &devices, now) {
            ListOutcome::Empty => Ok(RefreshOutcome::Empty),
            ListOutcome::Refreshed => Ok(RefreshOutcome::Refreshed),
            ListOutcome::SelectionCleared => Ok(RefreshOutcome::SelectionCleared),
            ListOutcome::AutoSelect(id) => {
                let token = self.begin_select(&id);
                let result = self.fetch_detail(&id).await;
                match self.complete_select(token, result) {
                    SelectOutcome::Applied(form) => Ok(RefreshOutcome::AutoSelected(form)),
                    SelectOutcome::Failed(err) => Ok(RefreshOutcome::AutoSelectFailed(err)),
                    // Unreachable without interleaved selections.
                    SelectOutcome::Stale => Ok(RefreshOutcome::Refreshed),
                }
            }
        }
    }

    /// Select a device and fetch its detail record.
    pub async fn select_device(&mut self, device_id: &str) -> SelectOutcome {
        let token = self.begin_select(device_id);
        let result = self.fetch_detail(device_id).await;
        self.complete_select(token, result)
    }

    /// Submit edited configuration for the selected device, then run a
    /// full refresh so every pane reflects the registry's view.
    pub async fn submit_config(
        &mut self,
        pane: &mut P,
        form: &FormState,
    ) -> Result<RefreshOutcome, CoreError> {
        let Some(device_id) = self.selection.selected_id().map(String::from) else {
            return Err(CoreError::Internal("no device selected".into()));
        };
        let update: ConfigUpdate = form.to_update();
        self.client
            .update_config(&device_id, &update)
            .await
            .map_err(CoreError::from)?;
        debug!(device_id = %device_id, "config saved");
        self.refresh(pane).await
    }

    async fn fetch_detail(&self, device_id: &str) -> Result<DeviceRecord, CoreError> {
        self.client.get_device(device_id).await.map_err(|err| {
            if err.is_not_found() {
                CoreError::DeviceNotFound {
                    device_id: device_id.to_owned(),
                }
            } else {
                err.into()
            }
        })
    }
}
