//! Paper master list, search and save against a mock backend.

mod common;

use common::{api_path, TestConsole};
use paperstock::models::PaperSearch;
use paperstock::models::PaperType;
use serde_json::{json, Value};
use wiremock::{
    matchers::{body_partial_json, method, path, query_param, query_param_is_missing},
    Mock, ResponseTemplate,
};

fn paper(id: i64, part_number: i64, reel_size: u32, gsm: u32, bf: u32) -> Value {
    json!({
        "id": id,
        "type": "K",
        "reelSize": reel_size,
        "gsm": gsm,
        "bf": bf,
        "partNumber": part_number,
        "partName": format!("{}/{}/{}", reel_size, gsm, bf)
    })
}

async fn paper_app() -> TestConsole {
    let app = TestConsole::logged_in().await;
    app.mock_get(
        "paper-master",
        json!([paper(1, 1, 30, 120, 16), paper(2, 2, 40, 150, 18)]),
    )
    .await;
    app
}

#[tokio::test]
async fn search_sends_only_the_filters_that_are_set() {
    let app = paper_app().await;
    Mock::given(method("GET"))
        .and(path(api_path("paper-master/search")))
        .and(query_param("reelSize", "30"))
        .and(query_param("gsm", "120"))
        .and(query_param_is_missing("bf"))
        .and(query_param_is_missing("searchTerm"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([paper(1, 1, 30, 120, 16)])))
        .expect(1)
        .mount(&app.server)
        .await;

    let mut screen = app.console.paper_master_screen().unwrap();
    screen.open().await.unwrap();
    assert_eq!(screen.visible().len(), 2);

    screen
        .apply_search(PaperSearch {
            reel_size: Some(30),
            gsm: Some(120),
            ..PaperSearch::default()
        })
        .await
        .unwrap();
    assert_eq!(screen.visible().len(), 1);
    assert_eq!(screen.visible()[0].display_name(), "30/120/16");

    screen.reset_search();
    assert_eq!(screen.visible().len(), 2);
}

#[tokio::test]
async fn new_paper_is_posted_with_its_derived_name() {
    let app = paper_app().await;
    Mock::given(method("POST"))
        .and(path(api_path("paper-master")))
        .and(body_partial_json(json!({
            "type": "S",
            "reelSize": 36,
            "gsm": 140,
            "bf": 20,
            "partName": "36/140/20"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 3,
            "type": "S",
            "reelSize": 36,
            "gsm": 140,
            "bf": 20,
            "partNumber": 3,
            "partName": "36/140/20"
        })))
        .expect(1)
        .mount(&app.server)
        .await;

    let mut screen = app.console.paper_master_screen().unwrap();
    screen.open().await.unwrap();
    let form = screen.form_mut();
    form.set_paper_type(PaperType::Sheet);
    form.set_reel_size("36");
    form.set_gsm("140");
    form.set_bf("20");
    assert_eq!(form.part_name(), Some("36/140/20"));

    let saved = screen.save().await.unwrap().unwrap();
    assert_eq!(saved.part_number, 3);
    assert_eq!(saved.paper_type, PaperType::Sheet);
    assert_eq!(screen.papers().len(), 3);
    assert_eq!(
        screen.status().notification().unwrap().message,
        "Paper Master saved successfully!"
    );
}

#[tokio::test]
async fn update_keeps_the_part_number() {
    let app = paper_app().await;
    Mock::given(method("PUT"))
        .and(path(api_path("paper-master/2")))
        .and(body_partial_json(json!({ "id": 2, "partNumber": 2, "gsm": 160 })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.server)
        .await;

    let mut screen = app.console.paper_master_screen().unwrap();
    screen.open().await.unwrap();
    screen.edit(2).unwrap();
    screen.form_mut().set_gsm("160");
    let saved = screen.save().await.unwrap().unwrap();

    assert_eq!(saved.part_number, 2);
    assert_eq!(saved.display_name(), "40/160/18");
    assert_eq!(screen.papers()[1].gsm, 160);
    assert_eq!(
        screen.status().notification().unwrap().message,
        "Paper Master updated successfully!"
    );
}

#[tokio::test]
async fn out_of_range_input_blocks_the_save() {
    let app = paper_app().await;
    Mock::given(method("POST"))
        .and(path(api_path("paper-master")))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&app.server)
        .await;

    let mut screen = app.console.paper_master_screen().unwrap();
    screen.open().await.unwrap();
    let form = screen.form_mut();
    form.set_reel_size("30");
    form.set_gsm("1200");
    form.set_bf("16");
    assert!(form.errors().contains("gsm"));

    let err = screen.save().await.unwrap_err();
    assert!(err.is_validation());
    assert!(screen.status().notification().unwrap().is_error());
}
