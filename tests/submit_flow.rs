//! End-to-end submit runs: keystrokes in, HTTP out, API events back in.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stencil::app::App;
use stencil::config::{ApiConfig, Config};
use stencil::event::{ApiEvent, Event};
use stencil::state::app_state::NoticeKind;
use stencil::state::layout::Layout;

fn test_config(server: &MockServer) -> Config {
    Config {
        api: ApiConfig {
            base_url: Url::parse(&server.uri()).unwrap(),
            api_key: "test-key".to_string(),
        },
        ..Config::default()
    }
}

fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn ctrl_s() -> Event {
    Event::Key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL))
}

fn type_str(app: &mut App, text: &str) {
    for c in text.chars() {
        app.handle_event(key(KeyCode::Char(c)));
    }
}

fn remote_layout(id: &str, name: &str) -> Layout {
    Layout {
        id: id.to_string(),
        name: name.to_string(),
        description: String::new(),
        content: "<div>{{{body}}}</div>".to_string(),
        is_default: false,
        variables: vec![],
        created_at: None,
        updated_at: None,
    }
}

fn layout_json(id: &str, name: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "name": name,
        "content": "<div>{{{body}}}</div>",
        "isDefault": false,
        "variables": []
    })
}

#[tokio::test]
async fn creating_a_layout_posts_the_typed_form_and_closes_the_editor() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/layouts"))
        .and(body_partial_json(json!({
            "name": "Welcome",
            "content": "<p>Hi {{firstName}}</p>",
            "variables": [{ "name": "firstName", "type": "String" }]
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({ "data": layout_json("lay_9", "Welcome") })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/layouts"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": [layout_json("lay_9", "Welcome")] })),
        )
        .mount(&server)
        .await;

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let mut app = App::new(&test_config(&server), tx);

    // New layout, name it, then type content with one placeholder.
    app.handle_event(key(KeyCode::Char('n')));
    app.handle_event(key(KeyCode::Char('i')));
    type_str(&mut app, "Welcome");
    app.handle_event(key(KeyCode::Esc));
    for _ in 0..3 {
        app.handle_event(key(KeyCode::Tab));
    }
    app.handle_event(key(KeyCode::Char('i')));
    type_str(&mut app, "<p>Hi {{firstName}}</p>");
    app.handle_event(key(KeyCode::Esc));

    app.handle_event(ctrl_s());
    assert!(app.state.editor.as_ref().unwrap().in_flight);

    let submit = rx.recv().await.expect("submit result");
    app.handle_event(submit);

    let notice = app.state.notice.clone().expect("a success notice");
    assert_eq!(notice.kind, NoticeKind::Success);
    assert_eq!(notice.text, "Layout Created!");
    assert!(app.state.editor.is_none());
    assert!(app.state.layouts.loading);

    let listed = rx.recv().await.expect("refreshed list");
    app.handle_event(listed);
    assert_eq!(app.state.layouts.items.len(), 1);
    assert!(!app.state.layouts.loading);

    server.verify().await;
}

#[tokio::test]
async fn a_rejected_update_keeps_the_editor_open() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/layouts/lay_1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": layout_json("lay_1", "Welcome") })),
        )
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/v1/layouts/lay_1"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "Name is taken",
            "statusCode": 400
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let mut app = App::new(&test_config(&server), tx);
    app.handle_event(Event::Api(ApiEvent::LayoutsListed(Ok(vec![remote_layout(
        "lay_1", "Welcome",
    )]))));

    // Open the only layout and wait for the fetch to land.
    app.handle_event(key(KeyCode::Enter));
    let fetched = rx.recv().await.expect("fetch result");
    app.handle_event(fetched);
    assert!(!app.state.editor.as_ref().unwrap().loading);

    app.handle_event(ctrl_s());
    let submit = rx.recv().await.expect("submit result");
    app.handle_event(submit);

    let editor = app.state.editor.as_ref().expect("editor stays open");
    assert!(!editor.in_flight);
    assert_eq!(editor.form.name, "Welcome");
    let notice = app.state.notice.clone().expect("an error notice");
    assert_eq!(notice.kind, NoticeKind::Error);
    assert_eq!(notice.text, "Name is taken");

    server.verify().await;
}

#[tokio::test]
async fn saving_twice_sends_a_single_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/layouts"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({ "data": layout_json("lay_3", "Digest") })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/layouts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let mut app = App::new(&test_config(&server), tx);

    app.handle_event(key(KeyCode::Char('n')));
    app.handle_event(key(KeyCode::Char('i')));
    type_str(&mut app, "Digest");
    app.handle_event(key(KeyCode::Esc));

    // The second save lands while the first is still in flight.
    app.handle_event(ctrl_s());
    app.handle_event(ctrl_s());

    let submit = rx.recv().await.expect("submit result");
    app.handle_event(submit);
    let listed = rx.recv().await.expect("refreshed list");
    app.handle_event(listed);

    server.verify().await;
}

#[tokio::test]
async fn saving_without_a_name_never_reaches_the_wire() {
    let server = MockServer::start().await;

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let mut app = App::new(&test_config(&server), tx);

    app.handle_event(key(KeyCode::Char('n')));
    app.handle_event(ctrl_s());

    let notice = app.state.notice.clone().expect("an error notice");
    assert_eq!(notice.kind, NoticeKind::Error);
    assert_eq!(notice.text, "Layout name is required");
    let editor = app.state.editor.as_ref().expect("editor stays open");
    assert!(!editor.in_flight);
    assert!(rx.try_recv().is_err());
}
