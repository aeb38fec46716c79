use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stencil::api::client::{ApiClient, GENERIC_ERROR_MESSAGE};
use stencil::config::ApiConfig;
use stencil::error::AppError;
use stencil::state::layout::{LayoutPayload, TemplateVariable, VariableType};

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(&ApiConfig {
        base_url: Url::parse(&server.uri()).unwrap(),
        api_key: "test-key".to_string(),
    })
}

fn layout_json(id: &str, name: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "name": name,
        "description": "",
        "content": "<div>{{{body}}}</div>",
        "isDefault": false,
        "variables": [],
        "createdAt": "2024-03-01T10:00:00.000Z",
        "updatedAt": "2024-03-02T08:30:00.000Z"
    })
}

fn welcome_payload() -> LayoutPayload {
    LayoutPayload {
        name: "Welcome".to_string(),
        description: "Greets new subscribers".to_string(),
        content: "<p>Hi {{firstName}}</p>{{{body}}}".to_string(),
        is_default: false,
        variables: vec![TemplateVariable::new("firstName", VariableType::String)],
    }
}

#[tokio::test]
async fn list_unwraps_the_data_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/layouts"))
        .and(header("authorization", "ApiKey test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [layout_json("lay_1", "Welcome"), layout_json("lay_2", "Digest")],
            "totalCount": 2,
            "page": 0,
            "pageSize": 10
        })))
        .mount(&server)
        .await;

    let layouts = client_for(&server).list_layouts().await.unwrap();

    assert_eq!(layouts.len(), 2);
    assert_eq!(layouts[0].id, "lay_1");
    assert_eq!(layouts[1].name, "Digest");
    assert!(layouts[0].created_at.is_some());
}

#[tokio::test]
async fn get_resolves_a_single_layout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/layouts/lay_1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": layout_json("lay_1", "Welcome") })),
        )
        .mount(&server)
        .await;

    let layout = client_for(&server).get_layout("lay_1").await.unwrap();

    assert_eq!(layout.unwrap().name, "Welcome");
}

#[tokio::test]
async fn get_maps_404_to_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/layouts/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Layout not found",
            "statusCode": 404
        })))
        .mount(&server)
        .await;

    let layout = client_for(&server).get_layout("gone").await.unwrap();

    assert!(layout.is_none());
}

#[tokio::test]
async fn create_posts_camel_case_with_an_idempotency_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/layouts"))
        .and(header("authorization", "ApiKey test-key"))
        .and(header_exists("idempotency-key"))
        .and(body_partial_json(json!({
            "name": "Welcome",
            "isDefault": false,
            "variables": [{ "name": "firstName", "type": "String", "required": false }]
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({ "data": layout_json("lay_9", "Welcome") })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let created = client_for(&server)
        .create_layout(&welcome_payload())
        .await
        .unwrap();

    assert_eq!(created.id, "lay_9");
}

#[tokio::test]
async fn update_patches_the_layout_in_place() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/v1/layouts/lay_1"))
        .and(body_partial_json(json!({ "name": "Welcome" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": layout_json("lay_1", "Welcome") })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let updated = client_for(&server)
        .update_layout("lay_1", &welcome_payload())
        .await
        .unwrap();

    assert_eq!(updated.id, "lay_1");
}

#[tokio::test]
async fn validation_errors_surface_the_service_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/layouts"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": ["name must be a string", "content should not be empty"],
            "statusCode": 422
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .create_layout(&welcome_payload())
        .await
        .unwrap_err();

    match err {
        AppError::Api { status, ref message } => {
            assert_eq!(status, 422);
            assert_eq!(message, "name must be a string, content should not be empty");
        }
        other => panic!("expected an API error, got {other:?}"),
    }
    // Display carries only the message, ready for the status bar.
    assert_eq!(
        err.to_string(),
        "name must be a string, content should not be empty"
    );
}

#[tokio::test]
async fn unusable_error_bodies_fall_back_to_generic_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/layouts"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).list_layouts().await.unwrap_err();

    match err {
        AppError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, GENERIC_ERROR_MESSAGE);
        }
        other => panic!("expected an API error, got {other:?}"),
    }
}
