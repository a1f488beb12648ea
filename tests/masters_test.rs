//! Mill and shade master screens against a mock backend.

mod common;

use assert_matches::assert_matches;
use common::{api_path, TestConsole};
use paperstock::{
    models::{Mill, NamedMaster, Shade},
    screens::{AssumeYes, Confirm},
    ConsoleError,
};
use serde_json::json;
use wiremock::{
    matchers::{body_json, method, path},
    Mock, ResponseTemplate,
};

struct Decline;

impl Confirm for Decline {
    fn confirm(&self, _prompt: &str) -> bool {
        false
    }
}

async fn mill_app() -> TestConsole {
    let app = TestConsole::logged_in().await;
    app.mock_get("mills", json!([{ "millId": 1, "millName": "Mill A" }]))
        .await;
    app.mock_get("mills/next-id", json!({ "nextId": 7 })).await;
    app
}

#[tokio::test]
async fn mill_form_shows_the_backend_next_id() {
    let app = mill_app().await;
    let mut screen = app.console.mill_screen().unwrap();
    screen.open().await.unwrap();

    assert_eq!(screen.records(), &[Mill::new(1, "Mill A".into())]);
    assert_eq!(screen.form().display_id(), Some(7));
}

#[tokio::test]
async fn shade_form_falls_back_to_the_local_hint() {
    let app = TestConsole::logged_in().await;
    app.mock_get(
        "shades",
        json!([
            { "shadeId": 3, "shadeName": "White" },
            { "shadeId": "5", "shadeName": "Brown" }
        ]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path(api_path("shades/next-id")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(99)))
        .expect(0)
        .mount(&app.server)
        .await;

    let mut screen = app.console.shade_screen().unwrap();
    screen.open().await.unwrap();
    assert_eq!(screen.form().display_id(), Some(6));

    screen.set_search("BRO");
    assert_eq!(screen.visible(), vec![Shade::new(5, "Brown".into())]);
}

#[tokio::test]
async fn creating_a_mill_posts_only_the_name() {
    let app = mill_app().await;
    Mock::given(method("POST"))
        .and(path(api_path("mills")))
        .and(body_json(json!({ "millName": "Mill B" })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "millId": 7, "millName": "Mill B" })),
        )
        .expect(1)
        .mount(&app.server)
        .await;

    let mut screen = app.console.mill_screen().unwrap();
    screen.open().await.unwrap();
    screen.form_mut().set_name("  Mill B ");
    let saved = screen.save().await.unwrap();

    assert_eq!(saved, Some(Mill::new(7, "Mill B".into())));
    assert_eq!(screen.records().len(), 2);
    assert_eq!(
        screen.status().notification().unwrap().message,
        "Mill Master saved successfully!"
    );
    assert!(!screen.form().is_editing());
    assert_eq!(screen.form().name(), "");
}

#[tokio::test]
async fn editing_a_mill_puts_to_its_id() {
    let app = mill_app().await;
    Mock::given(method("PUT"))
        .and(path(api_path("mills/1")))
        .and(body_json(json!({ "millId": 1, "millName": "Mill Z" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&app.server)
        .await;

    let mut screen = app.console.mill_screen().unwrap();
    screen.open().await.unwrap();
    screen.edit(1).unwrap();
    assert_eq!(screen.form().name(), "Mill A");
    screen.form_mut().set_name("Mill Z");
    screen.save().await.unwrap();

    assert_eq!(screen.records(), &[Mill::new(1, "Mill Z".into())]);
    assert_eq!(
        screen.status().notification().unwrap().message,
        "Mill updated successfully!"
    );
}

#[tokio::test]
async fn blank_name_is_rejected_without_a_request() {
    let app = mill_app().await;
    Mock::given(method("POST"))
        .and(path(api_path("mills")))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&app.server)
        .await;

    let mut screen = app.console.mill_screen().unwrap();
    screen.open().await.unwrap();
    screen.form_mut().set_name("   ");
    let err = screen.save().await.unwrap_err();
    assert_eq!(
        err.field_errors().and_then(|f| f.get("name")),
        Some("Mill Name is required")
    );
}

#[tokio::test]
async fn backend_rejection_message_is_shown() {
    let app = mill_app().await;
    Mock::given(method("POST"))
        .and(path(api_path("mills")))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "message": "Mill already exists" })),
        )
        .mount(&app.server)
        .await;

    let mut screen = app.console.mill_screen().unwrap();
    screen.open().await.unwrap();
    screen.form_mut().set_name("Mill A");
    assert_matches!(
        screen.save().await,
        Err(ConsoleError::Api { status: 409, .. })
    );
    let note = screen.status().notification().unwrap();
    assert!(note.is_error());
    assert_eq!(note.message, "Mill already exists");
    assert_eq!(screen.records().len(), 1);
}

#[tokio::test]
async fn delete_requires_confirmation() {
    let app = mill_app().await;
    Mock::given(method("DELETE"))
        .and(path(api_path("mills/1")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.server)
        .await;

    let mut screen = app.console.mill_screen().unwrap();
    screen.open().await.unwrap();

    assert_matches!(screen.delete(1, &Decline).await, Err(ConsoleError::Cancelled));
    assert_eq!(screen.records().len(), 1);

    screen.delete(1, &AssumeYes).await.unwrap();
    assert!(screen.records().is_empty());
    assert_eq!(
        screen.status().notification().unwrap().message,
        "Mill deleted successfully!"
    );
}
