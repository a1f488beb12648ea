//! Paper-out: issuing reels to production against a mock backend.

mod common;

use assert_matches::assert_matches;
use common::{api_path, TestConsole};
use paperstock::ConsoleError;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use wiremock::{
    matchers::{body_json, method, path, query_param},
    Mock, ResponseTemplate,
};

fn reel(number: &str, quantity: u32, partially_used: bool) -> Value {
    json!({
        "reelNumber": number,
        "paperName": "30/120/16",
        "quantity": quantity,
        "millName": "Mill A",
        "shade": "White",
        "rate": 45.5,
        "days": 5,
        "isPartiallyUsed": partially_used
    })
}

async fn mount_once(app: &TestConsole, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(api_path(route)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .up_to_n_times(1)
        .mount(&app.server)
        .await;
}

#[tokio::test]
async fn issuing_part_of_a_reel_updates_stock_and_history() {
    let app = TestConsole::logged_in().await;
    mount_once(&app, "reels", json!([reel("A-001", 1000, false), reel("A-002", 700, false)])).await;
    mount_once(&app, "reels/history", json!([])).await;
    // Backend state after the issue.
    app.mock_get("reels", json!([reel("A-001", 800, true), reel("A-002", 700, false)]))
        .await;
    app.mock_get(
        "reels/history",
        json!([{
            "date": "2024-11-17",
            "reelNumber": "A-001",
            "paperName": "30/120/16",
            "quantityUsed": 200,
            "quantityLeft": 800,
            "millName": "Mill A",
            "shade": "White",
            "ratePerKg": 45.5
        }]),
    )
    .await;
    Mock::given(method("POST"))
        .and(path(api_path("reels/stock-out")))
        .and(body_json(json!({ "reelNumber": "A-001", "quantityUsed": "200" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .expect(1)
        .mount(&app.server)
        .await;

    let mut screen = app.console.stock_out_screen().unwrap();
    screen.open().await.unwrap();
    assert_eq!(screen.reels().len(), 2);

    screen.select("A-001").unwrap();
    screen.form_mut().set_out_quantity("200");
    assert_eq!(screen.form().balance(), Some(dec!(800)));
    assert!(screen.form().can_submit());

    let entry = screen.submit().await.unwrap();
    assert_eq!(entry.quantity_used, dec!(200));
    assert_eq!(entry.quantity_left, dec!(800));

    let a001 = &screen.reels()[0];
    assert_eq!(a001.quantity, dec!(800));
    assert!(a001.partially_used);
    assert_eq!(screen.history().len(), 1);
    assert!(screen.form().selected().is_none());
    assert_eq!(
        screen.status().notification().unwrap().message,
        "Reel A-001 issued"
    );
}

#[tokio::test]
async fn issuing_more_than_the_reel_holds_is_refused() {
    let app = TestConsole::logged_in().await;
    app.mock_get("reels", json!([reel("A-001", 1000, false)])).await;
    app.mock_get("reels/history", json!([])).await;
    Mock::given(method("POST"))
        .and(path(api_path("reels/stock-out")))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.server)
        .await;

    let mut screen = app.console.stock_out_screen().unwrap();
    screen.open().await.unwrap();
    screen.select("A-001").unwrap();
    screen.form_mut().set_out_quantity("1200");
    assert!(!screen.form().can_submit());

    let err = screen.submit().await.unwrap_err();
    assert_eq!(
        err.field_errors().and_then(|f| f.get("outQuantity")),
        Some("Out quantity cannot exceed 1000")
    );
    assert_eq!(screen.reels()[0].quantity, dec!(1000));
}

#[tokio::test]
async fn backend_failure_restores_the_reel() {
    let app = TestConsole::logged_in().await;
    app.mock_get("reels", json!([reel("A-001", 1000, false)])).await;
    app.mock_get("reels/history", json!([])).await;
    Mock::given(method("POST"))
        .and(path(api_path("reels/stock-out")))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "error": "Reel is locked" })),
        )
        .mount(&app.server)
        .await;

    let mut screen = app.console.stock_out_screen().unwrap();
    screen.open().await.unwrap();
    screen.select("A-001").unwrap();
    screen.form_mut().set_out_quantity("1000");

    assert_matches!(screen.submit().await, Err(ConsoleError::Api { status: 500, .. }));
    assert_eq!(screen.reels()[0].quantity, dec!(1000));
    assert!(screen.history().is_empty());
    assert_eq!(screen.status().notification().unwrap().message, "Reel is locked");
}

#[tokio::test]
async fn backend_search_narrows_the_table() {
    let app = TestConsole::logged_in().await;
    app.mock_get("reels", json!([reel("A-001", 1000, false), reel("B-007", 500, true)]))
        .await;
    app.mock_get("reels/history", json!([])).await;
    Mock::given(method("GET"))
        .and(path(api_path("reels/search")))
        .and(query_param("query", "B-0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([reel("B-007", 500, true)])))
        .expect(1)
        .mount(&app.server)
        .await;

    let mut screen = app.console.stock_out_screen().unwrap();
    screen.open().await.unwrap();
    screen.search("B-0").await.unwrap();
    assert_eq!(screen.visible().len(), 1);
    assert_eq!(screen.visible()[0].reel_number, "B-007");

    screen.search("  ").await.unwrap();
    assert_eq!(screen.visible().len(), 2);
}
