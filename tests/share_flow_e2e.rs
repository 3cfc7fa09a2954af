//! End-to-end tests for the selection-to-share flow.
//!
//! These tests drive a Browser through commands and gestures, then submit the
//! resulting share through MockShareClient and check the rendered message.

use std::time::Duration;

use chrono::{TimeDelta, TimeZone, Utc};
use serde_json::json;

use sharelink::browser::{Browser, Outcome};
use sharelink::commands::{self, Command};
use sharelink::listing::Entry;
use sharelink::selection::ClickModifiers;
use sharelink::share::mock::{MockConfig, MockShareClient};
use sharelink::share::{ShareError, ShareRequestBuilder, ShareSettings, ShareState};

fn settings() -> ShareSettings {
    ShareSettings {
        site_title: "Team Drive".to_string(),
        site_url: Some("https://drive.example.com".to_string()),
        template: "{{site_title}}|{{link}}|{{pwd}}|{{expires_display}}|{{files}}|{{unknown}}"
            .to_string(),
        ..Default::default()
    }
}

fn browser_with(names: &[&str]) -> Browser {
    let now = Utc::now();
    let mut browser = Browser::new("/u", settings());
    browser.navigate(
        "/docs",
        names.iter().map(|n| Entry::file(*n, 1, now)).collect(),
    );
    browser
}

fn open_share(browser: &mut Browser, command: Command) -> ShareRequestBuilder {
    match browser.apply(command) {
        Outcome::OpenShare(builder) => *builder,
        other => panic!("expected OpenShare, got {:?}", other),
    }
}

// ============================================================================
// Selection to request
// ============================================================================

#[test]
fn test_single_selection_builds_path() {
    let mut browser = browser_with(&["a.txt", "b.txt"]);
    browser.selection_mut().toggle(0, false, false);

    let builder = open_share(&mut browser, Command::Share);
    assert_eq!(builder.request().paths, vec!["/u/docs/a.txt"]);
}

#[test]
fn test_drag_selection_builds_ordered_paths() {
    let mut browser = browser_with(&["a", "b", "c", "d", "e"]);
    browser.selection_mut().begin_drag(3);
    browser.selection_mut().update_drag(1);
    browser.selection_mut().end_drag();

    let builder = open_share(&mut browser, Command::Share);
    assert_eq!(
        builder.request().paths,
        vec!["/u/docs/b", "/u/docs/c", "/u/docs/d"]
    );
}

#[test]
fn test_checkbox_then_row_action_is_exclusive() {
    let mut browser = browser_with(&["a", "b", "c"]);
    browser.selection_mut().toggle(0, true, false);
    browser.selection_mut().toggle(2, true, false);

    let builder = open_share(&mut browser, Command::ShareEntry { index: 1 });
    assert_eq!(builder.request().paths, vec!["/u/docs/b"]);
}

#[test]
fn test_navigation_discards_selection() {
    let mut browser = browser_with(&["a", "b"]);
    browser.apply(Command::SelectAll);
    browser.apply(Command::Navigate {
        path: "/elsewhere".to_string(),
        entries: vec![Entry::file("x", 1, Utc::now())],
    });

    assert!(matches!(browser.apply(Command::Share), Outcome::None));
}

#[test]
fn test_modifier_click_keeps_selection_and_does_not_open() {
    let mut browser = browser_with(&["a", "b"]);
    browser.selection_mut().toggle(1, true, false);
    let ctrl = ClickModifiers {
        ctrl: true,
        ..Default::default()
    };

    assert!(matches!(browser.click(0, ctrl), Outcome::None));
    assert_eq!(browser.selected_paths(), vec!["/u/docs/b"]);
}

#[test]
fn test_commands_over_channel() {
    let mut browser = browser_with(&["a", "b", "c"]);
    let (tx, rx) = commands::channel();
    let ui = tx.clone();

    ui.send(Command::SelectAll);
    tx.send(Command::Download { index: 2 });
    ui.send(Command::Share);

    let outcomes = browser.process(&rx);
    assert!(matches!(outcomes[0], Outcome::None));
    assert!(matches!(outcomes[1], Outcome::Download(ref p) if p == &["/u/docs/c".to_string()]));
    match &outcomes[2] {
        Outcome::OpenShare(builder) => assert_eq!(builder.request().paths, vec!["/u/docs/c"]),
        other => panic!("expected OpenShare, got {:?}", other),
    }
}

// ============================================================================
// Submission
// ============================================================================

#[tokio::test]
async fn test_full_flow_renders_message() {
    let mut browser = browser_with(&["a.txt", "b.txt"]);
    browser.apply(Command::SelectAll);
    let mut builder = open_share(&mut browser, Command::Share);

    builder.set_expiration("+2d").unwrap();
    builder.set_password("hunter2");
    builder.set_max_accessed(10);

    let client = MockShareClient::with_config(MockConfig::with_field("id", json!("s1")));
    let now = Utc.with_ymd_and_hms(2024, 2, 1, 9, 30, 0).unwrap();
    let message = builder.submit_at(&client, now).await.unwrap();

    assert_eq!(
        message,
        "Team Drive|https://drive.example.com/@s/s1|hunter2|2024-02-03 09:30:00|/u/docs/a.txt\n/u/docs/b.txt|"
    );
    assert_eq!(builder.link_text(), Some(message.as_str()));

    let requests = client.requests();
    let sent = &requests[0];
    assert_eq!(sent.expires_at, Some(now + TimeDelta::days(2)));
    assert_eq!(sent.max_accessed, 10);
}

#[tokio::test]
async fn test_never_expires_is_sent_as_null() {
    let mut browser = browser_with(&["a.txt"]);
    let mut builder = open_share(&mut browser, Command::ShareEntry { index: 0 });
    builder.set_expiration("NEVER").unwrap();

    let client = MockShareClient::new();
    let message = builder.submit(&client).await.unwrap();

    assert!(message.contains("|never|"));
    let body = serde_json::to_value(&client.requests()[0]).unwrap();
    assert!(body["expires"].is_null());
}

#[tokio::test]
async fn test_remote_failure_then_retry() {
    let mut browser = browser_with(&["a.txt"]);
    let mut builder = open_share(&mut browser, Command::ShareEntry { index: 0 });
    let password = builder.request().password.clone();

    let failing =
        MockShareClient::with_config(MockConfig::with_error(ShareError::remote(500, "storage offline")));
    let err = builder.submit(&failing).await.unwrap_err();
    assert!(err.is_remote());
    assert!(matches!(builder.state(), ShareState::Failed(_)));
    assert_eq!(builder.request().password, password);

    let working = MockShareClient::new();
    builder.submit(&working).await.unwrap();
    assert!(matches!(builder.state(), ShareState::Succeeded(_)));
    assert_eq!(working.call_count(), 1);
}

#[tokio::test]
async fn test_invalid_token_blocks_submission() {
    let mut browser = browser_with(&["a.txt"]);
    let mut builder = open_share(&mut browser, Command::ShareEntry { index: 0 });
    assert!(builder.set_expiration("0d").is_err());
    assert!(!builder.can_submit());

    let client = MockShareClient::new();
    let err = builder.submit(&client).await.unwrap_err();
    assert!(matches!(err, ShareError::InvalidDurationToken { .. }));
    assert_eq!(client.call_count(), 0);
    assert_eq!(builder.state(), &ShareState::Idle);
}

#[tokio::test]
async fn test_concurrent_submissions_are_independent() {
    let mut browser = browser_with(&["a.txt", "b.txt"]);
    let mut first = open_share(&mut browser, Command::ShareEntry { index: 0 });
    let mut second = open_share(&mut browser, Command::ShareEntry { index: 1 });

    let client = MockShareClient::with_config(MockConfig::with_delay(Duration::from_millis(20)));
    let (a, b) = tokio::join!(first.submit(&client), second.submit(&client));

    assert!(a.is_ok());
    assert!(b.is_ok());
    assert_eq!(client.call_count(), 2);
    assert_ne!(first.result().unwrap().id(), second.result().unwrap().id());
}

#[test]
fn test_pending_builder_rejects_second_submission() {
    let mut browser = browser_with(&["a.txt"]);
    let mut builder = open_share(&mut browser, Command::ShareEntry { index: 0 });

    let request = builder.begin_submit(Utc::now()).unwrap();
    assert!(builder.is_pending());
    assert_eq!(
        builder.begin_submit(Utc::now()).unwrap_err(),
        ShareError::AlreadyPending
    );

    let info = sharelink::share::ShareInfo::from_value(json!({
        "id": "late",
        "files": request.paths,
    }))
    .unwrap();
    builder.finish_submit(Ok(info)).unwrap();
    assert!(!builder.is_pending());
}
