#![allow(clippy::unwrap_used)]
// End-to-end session tests against a mock registry.

use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use camdeck_api::RegistryClient;
use camdeck_core::{
    CardContent, CardPane, CoreError, DashboardSession, FormState, RefreshOutcome, SelectOutcome,
};

// ── Helpers ─────────────────────────────────────────────────────────

/// Pane backed by a plain Vec; enough to observe reconciliation results.
#[derive(Default)]
struct VecPane {
    cards: Vec<(u32, Option<CardContent>)>,
    next: u32,
}

impl CardPane for VecPane {
    type Handle = u32;

    fn create_card(&mut self, _device_id: &str) -> u32 {
        let h = self.next;
        self.next += 1;
        self.cards.push((h, None));
        h
    }

    fn apply(&mut self, card: &u32, content: &CardContent) {
        if let Some(slot) = self.cards.iter_mut().find(|(h, _)| h == card) {
            slot.1 = Some(content.clone());
        }
    }

    fn card_at(&self, index: usize) -> Option<u32> {
        self.cards.get(index).map(|(h, _)| *h)
    }

    fn move_card(&mut self, card: &u32, index: usize) {
        if let Some(pos) = self.cards.iter().position(|(h, _)| h == card) {
            let entry = self.cards.remove(pos);
            let index = index.min(self.cards.len());
            self.cards.insert(index, entry);
        }
    }

    fn remove_card(&mut self, card: &u32) {
        self.cards.retain(|(h, _)| h != card);
    }
}

impl VecPane {
    fn rendered_ids(&self) -> Vec<String> {
        self.cards
            .iter()
            .filter_map(|(_, c)| c.as_ref().map(|c| c.device_id.clone()))
            .collect()
    }
}

async fn setup() -> (MockServer, DashboardSession<VecPane>) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = RegistryClient::new(base_url, Duration::from_secs(5)).unwrap();
    (server, DashboardSession::new(client))
}

fn list_body() -> serde_json::Value {
    json!([
        { "deviceId": "cam-01", "lastImgUrls": ["/u/cam-01/1.jpg"] },
        { "deviceId": "cam-02" }
    ])
}

async fn mount_list(server: &MockServer, body: &serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/admin/api/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_detail(server: &MockServer, id: &str, body: &serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/admin/api/device/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

// ── Refresh cycle ───────────────────────────────────────────────────

#[tokio::test]
async fn test_first_refresh_auto_selects_first_device() {
    let (server, mut session) = setup().await;
    let mut pane = VecPane::default();

    mount_list(&server, &list_body()).await;
    mount_detail(
        &server,
        "cam-01",
        &json!({
            "deviceId": "cam-01",
            "framesize": "VGA",
            "jpegQuality": 15,
            "lastImgUrls": ["/u/cam-01/1.jpg", "/u/cam-01/2.jpg"]
        }),
    )
    .await;

    let outcome = session.refresh(&mut pane).await.unwrap();
    let form = match outcome {
        RefreshOutcome::AutoSelected(form) => form,
        other => panic!("expected AutoSelected, got: {other:?}"),
    };

    assert_eq!(form.framesize, "VGA");
    assert_eq!(form.jpeg_quality, "15");
    assert_eq!(session.selected_id(), Some("cam-01"));
    assert_eq!(session.device_count(), 2);
    assert_eq!(session.gallery().len(), 2);
    assert_eq!(session.gallery().main(), Some("/u/cam-01/1.jpg"));
    assert_eq!(pane.rendered_ids(), vec!["cam-01", "cam-02"]);
}

#[tokio::test]
async fn test_second_refresh_does_not_steal_focus() {
    let (server, mut session) = setup().await;
    let mut pane = VecPane::default();

    mount_list(&server, &list_body()).await;
    mount_detail(&server, "cam-01", &json!({ "deviceId": "cam-01" })).await;
    mount_detail(&server, "cam-02", &json!({ "deviceId": "cam-02" })).await;

    session.refresh(&mut pane).await.unwrap();
    // Operator moves to cam-02.
    assert!(matches!(
        session.select_device("cam-02").await,
        SelectOutcome::Applied(_)
    ));

    let outcome = session.refresh(&mut pane).await.unwrap();
    assert!(matches!(outcome, RefreshOutcome::Refreshed));
    assert_eq!(session.selected_id(), Some("cam-02"));
}

#[tokio::test]
async fn test_refresh_failure_before_first_load() {
    let (server, mut session) = setup().await;
    let mut pane = VecPane::default();

    Mock::given(method("GET"))
        .and(path("/admin/api/devices"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = session.refresh(&mut pane).await.unwrap_err();
    assert!(matches!(err, CoreError::Api { status: Some(500), .. }));
    // Never loaded — the caller renders a full-pane error.
    assert!(!session.has_loaded_once());
    assert!(pane.cards.is_empty());
}

#[tokio::test]
async fn test_empty_list_clears_dashboard() {
    let (server, mut session) = setup().await;
    let mut pane = VecPane::default();

    mount_list(&server, &json!([])).await;

    let outcome = session.refresh(&mut pane).await.unwrap();
    assert!(matches!(outcome, RefreshOutcome::Empty));
    assert!(session.has_loaded_once());
    assert_eq!(session.device_count(), 0);
    assert!(pane.cards.is_empty());
}

// ── Selection ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_select_missing_device_reports_not_found() {
    let (server, mut session) = setup().await;

    Mock::given(method("GET"))
        .and(path("/admin/api/device/cam-99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "gone" })))
        .mount(&server)
        .await;

    match session.select_device("cam-99").await {
        SelectOutcome::Failed(CoreError::DeviceNotFound { device_id }) => {
            assert_eq!(device_id, "cam-99");
        }
        other => panic!("expected DeviceNotFound, got: {other:?}"),
    }
    assert_eq!(session.selected_id(), None);
}

// ── Config submission ───────────────────────────────────────────────

#[tokio::test]
async fn test_submit_config_posts_then_refreshes() {
    let (server, mut session) = setup().await;
    let mut pane = VecPane::default();

    mount_list(&server, &list_body()).await;
    mount_detail(
        &server,
        "cam-01",
        &json!({ "deviceId": "cam-01", "framesize": "VGA" }),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/admin/api/device/cam-01/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    session.refresh(&mut pane).await.unwrap();

    let form = FormState {
        framesize: "SVGA".into(),
        ..FormState::default()
    };
    let outcome = session.submit_config(&mut pane, &form).await.unwrap();
    assert!(matches!(outcome, RefreshOutcome::Refreshed));
    assert_eq!(session.selected_id(), Some("cam-01"));
}

#[tokio::test]
async fn test_submit_config_without_selection_fails() {
    let (_server, mut session) = setup().await;
    let mut pane = VecPane::default();

    let err = session
        .submit_config(&mut pane, &FormState::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Internal(_)));
}
