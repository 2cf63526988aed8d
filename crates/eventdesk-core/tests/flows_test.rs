#![allow(clippy::unwrap_used)]
// End-to-end flows through `Controller` against a wiremock event service.

use std::sync::Arc;

use chrono::Utc;
use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use eventdesk_api::EventDocument;
use eventdesk_core::{
    ClientConfig, Command, Controller, CoreError, EditModal, Event, EventStore, ModalState,
    ModalTab, SaveOutcome,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Controller) {
    let server = MockServer::start().await;
    let config = ClientConfig::new(Url::parse(&server.uri()).unwrap(), "org-1");
    let controller = Controller::new(config).unwrap();
    (server, controller)
}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": data }))
}

fn event_json(id: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "name": format!("Event {id}"),
        "type": "seating",
        "description": "Doors at seven",
        "scheduleStart": "2099-01-01T18:00:00.000Z",
        "scheduleEnd": "2099-01-01T23:00:00.000Z",
        "posterUrl": "https://cdn.example.com/old.png",
        "organiser": "org-1",
        "isPublished": true,
        "totalRevenue": 0
    })
}

async fn open_modal(server: &MockServer, controller: &Controller) -> EditModal {
    Mock::given(method("GET"))
        .and(path("/api/event/get-events/org-1"))
        .respond_with(ok(json!([event_json("evt-1")])))
        .mount(server)
        .await;
    let event = controller.get_event("evt-1").await.unwrap();
    EditModal::open(Arc::new(event))
}

// ── List ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_refresh_failure_then_retry() {
    let (server, controller) = setup().await;
    let mut store = EventStore::new();

    Mock::given(method("GET"))
        .and(path("/api/event/get-events/org-1"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let err = controller.refresh(&mut store).await.unwrap_err();
    assert!(matches!(err, CoreError::Api { status: Some(503), .. }), "got: {err:?}");
    assert!(store.error().is_some());

    Mock::given(method("GET"))
        .and(path("/api/event/get-events/org-1"))
        .respond_with(ok(json!([event_json("evt-1"), event_json("evt-2")])))
        .mount(&server)
        .await;

    controller.refresh(&mut store).await.unwrap();
    assert_eq!(store.len(), 2);
    assert!(store.error().is_none());
}

#[tokio::test]
async fn test_unreadable_event_does_not_fail_the_list() {
    let (server, controller) = setup().await;
    let mut store = EventStore::new();

    let mut broken = event_json("evt-broken");
    broken["scheduleStart"] = json!("soon");
    Mock::given(method("GET"))
        .and(path("/api/event/get-events/org-1"))
        .respond_with(ok(json!([broken, event_json("evt-2")])))
        .mount(&server)
        .await;

    controller.refresh(&mut store).await.unwrap();

    assert!(store.error().is_none());
    assert_eq!(store.len(), 1);
    let kept = controller.get_event("evt-2").await.unwrap();
    assert_eq!(kept.fields.get("description"), Some(&json!("Doors at seven")));
}

#[tokio::test]
async fn test_delete_then_refetch_drops_event() {
    let (server, controller) = setup().await;
    let mut store = EventStore::new();
    store.apply_snapshot(
        vec![
            Event::try_from(EventDocument(event_json("evt-1"))).unwrap(),
            Event::try_from(EventDocument(event_json("evt-2"))).unwrap(),
        ],
        Utc::now(),
    );

    Mock::given(method("POST"))
        .and(path("/api/event/delete-event"))
        .and(body_json(json!({ "eventId": "evt-1" })))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/event/get-events/org-1"))
        .respond_with(ok(json!([event_json("evt-2")])))
        .expect(1)
        .mount(&server)
        .await;

    controller
        .delete_and_refresh("evt-1", &mut store)
        .await
        .unwrap();

    assert!(store.get("evt-1").is_none());
    assert!(store.get("evt-2").is_some());
}

#[tokio::test]
async fn test_delete_survives_failed_refetch() {
    let (server, controller) = setup().await;
    let mut store = EventStore::new();

    Mock::given(method("POST"))
        .and(path("/api/event/delete-event"))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/event/get-events/org-1"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    controller
        .delete_and_refresh("evt-1", &mut store)
        .await
        .unwrap();
    assert!(store.error().is_some());
}

#[tokio::test]
async fn test_rejected_delete_skips_refetch() {
    let (server, controller) = setup().await;
    let mut store = EventStore::new();

    Mock::given(method("POST"))
        .and(path("/api/event/delete-event"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Event has paid bookings"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/event/get-events/org-1"))
        .respond_with(ok(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let err = controller
        .delete_and_refresh("evt-1", &mut store)
        .await
        .unwrap_err();
    assert!(err.is_rejection());
    assert_eq!(err.to_string(), "Event has paid bookings");
}

// ── Edit modal ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_basic_save_submits_whole_projection() {
    let (server, controller) = setup().await;
    let mut modal = open_modal(&server, &controller).await;

    Mock::given(method("POST"))
        .and(path("/api/event/update-details"))
        .and(body_json(json!({
            "eventId": "evt-1",
            "details": {
                "name": "Renamed",
                "type": "seating",
                "scheduleStart": "2099-01-01T18:00:00Z",
                "scheduleEnd": "2099-01-01T23:00:00Z",
                "description": "Doors at seven"
            }
        })))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    modal.basic_mut().set_text("name", "Renamed").unwrap();
    let outcome = controller.save(&mut modal, ModalTab::Basic).await.unwrap();

    assert_eq!(
        outcome,
        SaveOutcome::Saved {
            message: "Event details updated",
            close: true
        }
    );
}

#[tokio::test]
async fn test_ticket_fetch_and_save() {
    let (server, controller) = setup().await;
    let mut modal = open_modal(&server, &controller).await;
    assert_eq!(modal.state(), ModalState::Loading);

    Mock::given(method("GET"))
        .and(path("/api/event/ticket-details/evt-1"))
        .respond_with(ok(json!({ "pricingOption": "flat", "flatPrice": 25 })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/event/update-ticket-details"))
        .and(body_json(json!({
            "eventId": "evt-1",
            "pricingOption": "categorized",
            "categorizedPrices": [{ "type": "VIP", "price": 80.0, "numberOfTickets": 10 }]
        })))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    controller.load_tickets(&mut modal).await;
    assert_eq!(modal.state(), ModalState::Ready(ModalTab::Basic));

    let draft = modal.ticket_mut().unwrap();
    draft.toggle_pricing_option();
    draft.add_category();
    draft
        .update_category(0, eventdesk_core::CategoryField::Type, "VIP")
        .unwrap();
    draft
        .update_category(0, eventdesk_core::CategoryField::Price, "80")
        .unwrap();
    draft
        .update_category(0, eventdesk_core::CategoryField::Tickets, "10")
        .unwrap();

    let outcome = controller.save(&mut modal, ModalTab::Ticket).await.unwrap();
    assert!(matches!(outcome, SaveOutcome::Saved { close: false, .. }));
    assert!(!modal.is_dirty());
}

#[tokio::test]
async fn test_invalid_ticket_draft_never_hits_the_wire() {
    let (server, controller) = setup().await;
    let mut modal = open_modal(&server, &controller).await;

    Mock::given(method("GET"))
        .and(path("/api/event/ticket-details/evt-1"))
        .respond_with(ok(json!({ "pricingOption": "categorized", "categorizedPrices": [] })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/event/update-ticket-details"))
        .respond_with(ok(json!(null)))
        .expect(0)
        .mount(&server)
        .await;

    controller.load_tickets(&mut modal).await;
    modal.ticket_mut().unwrap().add_category();

    let err = controller
        .save(&mut modal, ModalTab::Ticket)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::ValidationFailed { .. }));
    assert!(!modal.is_saving());
}

#[tokio::test]
async fn test_poster_upload_rejection_skips_association() {
    let (server, controller) = setup().await;
    let mut modal = open_modal(&server, &controller).await;

    Mock::given(method("POST"))
        .and(path("/api/event/upload-poster"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "File too large"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/event/update-poster-url"))
        .respond_with(ok(json!(null)))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("huge.png");
    std::fs::write(&file, b"png").unwrap();
    modal.poster_mut().select_file(&file).unwrap();
    let preview = modal.poster().preview();

    let err = controller
        .save(&mut modal, ModalTab::Poster)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "File too large");
    assert!(!modal.is_saving());
    assert_eq!(modal.poster().preview(), preview);
    assert_eq!(modal.poster().remote(), Some("https://cdn.example.com/old.png"));
}

#[tokio::test]
async fn test_poster_association_failure_keeps_pending_file() {
    let (server, controller) = setup().await;
    let mut modal = open_modal(&server, &controller).await;

    Mock::given(method("POST"))
        .and(path("/api/event/upload-poster"))
        .respond_with(ok(json!({ "posterUrl": "https://cdn.example.com/orphan.png" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/event/update-poster-url"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Event is locked"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("new.png");
    std::fs::write(&file, b"png").unwrap();
    modal.poster_mut().select_file(&file).unwrap();

    let err = controller
        .save(&mut modal, ModalTab::Poster)
        .await
        .unwrap_err();

    assert!(err.is_rejection());
    assert_eq!(err.to_string(), "Event is locked");
    // No rollback of the upload, and nothing local moves
    assert_eq!(modal.poster().pending(), Some(file.as_path()));
    assert_eq!(modal.poster().remote(), Some("https://cdn.example.com/old.png"));
    assert!(!modal.is_saving());
    assert_eq!(modal.last_error(), Some("Event is locked"));
}

#[tokio::test]
async fn test_poster_two_phase_success() {
    let (server, controller) = setup().await;
    let mut modal = open_modal(&server, &controller).await;

    Mock::given(method("POST"))
        .and(path("/api/event/upload-poster"))
        .respond_with(ok(json!({ "posterUrl": "https://cdn.example.com/new.png" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/event/update-poster-url"))
        .and(body_json(json!({
            "eventId": "evt-1",
            "posterUrl": "https://cdn.example.com/new.png"
        })))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("new.png");
    std::fs::write(&file, b"png").unwrap();
    modal.poster_mut().select_file(&file).unwrap();

    let outcome = controller.save(&mut modal, ModalTab::Poster).await.unwrap();

    assert_eq!(
        outcome,
        SaveOutcome::Saved {
            message: "Poster updated",
            close: false
        }
    );
    assert_eq!(modal.poster().remote(), Some("https://cdn.example.com/new.png"));
    assert!(modal.poster().pending().is_none());
}

#[tokio::test]
async fn test_execute_routes_commands() {
    let (server, controller) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/event/delete-event"))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    let result = controller
        .execute(Command::DeleteEvent {
            event_id: "evt-3".into(),
        })
        .await
        .unwrap();
    assert_eq!(result, eventdesk_core::CommandResult::Ok);
}
