//! Integration tests for the `eventdesk` CLI binary.
//!
//! Argument parsing, help output and completions run offline; event
//! commands run against a wiremock event service.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `eventdesk` binary with env isolation.
///
/// Clears all `EVENTDESK_*` env vars and points the config file at a
/// nonexistent path so tests never touch the user's real configuration.
fn eventdesk_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("eventdesk");
    cmd.env("HOME", "/tmp/eventdesk-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/eventdesk-cli-test-nonexistent")
        .env("EVENTDESK_CONFIG", "/tmp/eventdesk-cli-test-nonexistent/config.toml")
        .env("NO_COLOR", "1")
        .env_remove("EVENTDESK_PROFILE")
        .env_remove("EVENTDESK_SERVER")
        .env_remove("EVENTDESK_ORGANISER")
        .env_remove("EVENTDESK_TOKEN")
        .env_remove("EVENTDESK_OUTPUT")
        .env_remove("EVENTDESK_INSECURE")
        .env_remove("EVENTDESK_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// `eventdesk_cmd` wired to a mock service as organiser `org-1`.
fn against(server: &MockServer) -> assert_cmd::Command {
    let mut cmd = eventdesk_cmd();
    cmd.env("EVENTDESK_SERVER", server.uri())
        .env("EVENTDESK_ORGANISER", "org-1")
        .env("EVENTDESK_TOKEN", "test-token");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn events_body() -> Value {
    json!({
        "success": true,
        "data": [
            {
                "_id": "past-1",
                "name": "Last Year Expo",
                "type": "open",
                "scheduleStart": "2001-03-01T09:00:00.000Z",
                "scheduleEnd": "2001-03-01T17:00:00.000Z",
                "venue": "Hall A"
            },
            {
                "_id": "future-1",
                "name": "Spring Gala",
                "type": "Seating",
                "scheduleStart": "2099-05-01T18:00:00.000Z",
                "scheduleEnd": "2099-05-01T23:00:00.000Z",
                "venue": "Ballroom"
            }
        ]
    })
}

async fn mount_events(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path("/api/event/get-events/org-1"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = eventdesk_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    eventdesk_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("events")
            .and(predicate::str::contains("config"))
            .and(predicate::str::contains("completions")),
    );
}

#[test]
fn test_events_help_lists_subcommands() {
    eventdesk_cmd().args(["events", "--help"]).assert().success().stdout(
        predicate::str::contains("list")
            .and(predicate::str::contains("delete"))
            .and(predicate::str::contains("set-tickets"))
            .and(predicate::str::contains("poster")),
    );
}

#[test]
fn test_version_flag() {
    eventdesk_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("eventdesk"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_zsh() {
    eventdesk_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_bash() {
    eventdesk_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Usage errors ────────────────────────────────────────────────────

#[test]
fn test_invalid_status_filter_rejected() {
    eventdesk_cmd()
        .args(["events", "list", "--status", "cancelled"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cancelled"));
}

#[test]
fn test_set_tickets_requires_pricing() {
    eventdesk_cmd()
        .args(["events", "set-tickets", "evt-1"])
        .assert()
        .code(2);
}

#[test]
fn test_events_list_without_config() {
    eventdesk_cmd()
        .args(["events", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("eventdesk config init"));
}

#[test]
fn test_events_list_without_organiser() {
    eventdesk_cmd()
        .args(["events", "list", "--server", "http://127.0.0.1:9"])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("organiser"));
}

#[test]
fn test_unreachable_service_exits_with_connection_code() {
    eventdesk_cmd()
        .args([
            "events",
            "list",
            "--server",
            "http://127.0.0.1:9",
            "--organiser",
            "org-1",
            "--token",
            "t",
        ])
        .assert()
        .code(7);
}

// ── Against a mock service ──────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_list_json_is_sorted_with_status() {
    let server = MockServer::start().await;
    mount_events(&server, events_body()).await;

    let output = against(&server)
        .args(["events", "list", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let listed: Value = serde_json::from_slice(&output.stdout).unwrap();
    let ids: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["future-1", "past-1"]);
    assert_eq!(listed[0]["status"], "Upcoming");
    assert_eq!(listed[0]["editable"], true);
    assert_eq!(listed[1]["status"], "Completed");
    assert_eq!(listed[1]["editable"], false);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_config_default_output_applies_without_flag() {
    let server = MockServer::start().await;
    mount_events(&server, events_body()).await;

    let dir = tempfile::tempdir().unwrap();
    let config_file = dir.path().join("config.toml");
    std::fs::write(&config_file, "[defaults]\noutput = \"json\"\n").unwrap();

    let output = against(&server)
        .env("EVENTDESK_CONFIG", &config_file)
        .args(["events", "list"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));
    let listed: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 2);

    // An explicit flag still wins over the file
    let output = against(&server)
        .env("EVENTDESK_CONFIG", &config_file)
        .args(["events", "list", "-o", "plain"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(serde_json::from_slice::<Value>(&output.stdout).is_err());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_filters_by_type_case_insensitively() {
    let server = MockServer::start().await;
    mount_events(&server, events_body()).await;

    against(&server)
        .args(["events", "list", "--type", "seating", "-o", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::diff("future-1\n"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_distinguishes_empty_states() {
    let server = MockServer::start().await;
    mount_events(&server, events_body()).await;
    against(&server)
        .args(["events", "list", "--status", "ongoing"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No events match"));

    let empty = MockServer::start().await;
    mount_events(&empty, json!({ "success": true, "data": [] })).await;
    against(&empty)
        .args(["events", "list"])
        .assert()
        .success()
        .stderr(predicate::str::contains("first event"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_get_prints_extra_fields() {
    let server = MockServer::start().await;
    mount_events(&server, events_body()).await;

    against(&server)
        .args(["events", "get", "future-1", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"venue\": \"Ballroom\""));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_get_unknown_event_exits_not_found() {
    let server = MockServer::start().await;
    mount_events(&server, events_body()).await;

    against(&server)
        .args(["events", "get", "nope"])
        .assert()
        .code(4);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_refetches_and_lists_remaining_events() {
    let server = MockServer::start().await;
    // First listing resolves the event; every later one comes after the delete.
    Mock::given(method("GET"))
        .and(path("/api/event/get-events/org-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(events_body()))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    let mut remaining = events_body();
    remaining["data"].as_array_mut().unwrap().truncate(1);
    Mock::given(method("GET"))
        .and(path("/api/event/get-events/org-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(remaining))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/event/delete-event"))
        .and(body_json(json!({ "eventId": "future-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    against(&server)
        .args(["events", "delete", "future-1", "--yes", "--output", "json"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Event deleted"))
        .stdout(predicate::str::contains("past-1").and(predicate::str::contains("future-1").not()));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_delete_exits_with_server_message() {
    let server = MockServer::start().await;
    mount_events(&server, events_body()).await;
    Mock::given(method("POST"))
        .and(path("/api/event/delete-event"))
        .and(body_json(json!({ "eventId": "future-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Event has active bookings"
        })))
        .expect(1)
        .mount(&server)
        .await;

    against(&server)
        .args(["events", "delete", "future-1", "--yes"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Event has active bookings"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_edit_completed_event_is_refused_locally() {
    let server = MockServer::start().await;
    mount_events(&server, events_body()).await;
    Mock::given(method("POST"))
        .and(path("/api/event/update-details"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(0)
        .mount(&server)
        .await;

    against(&server)
        .args(["events", "edit", "past-1", "--set", "venue=Hall B"])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("upcoming"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_edit_sends_whole_basic_draft() {
    let server = MockServer::start().await;
    mount_events(&server, events_body()).await;
    Mock::given(method("POST"))
        .and(path("/api/event/update-details"))
        .and(body_json(json!({
            "eventId": "future-1",
            "details": {
                "name": "Spring Gala",
                "type": "Seating",
                "scheduleStart": "2099-05-01T18:00:00Z",
                "scheduleEnd": "2099-05-01T23:00:00Z",
                "venue": "Rooftop"
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    against(&server)
        .args(["events", "edit", "future-1", "--set", "venue=Rooftop"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Event details updated"));
}
