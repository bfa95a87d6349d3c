//! Shared test helpers for SiteCheck API integration tests
//!
//! Provides wiremock-based mock server setup for the backend endpoints.

use std::sync::Arc;

use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sitecheck_api::client::ApiClient;

pub const TEST_TOKEN: &str = "test-access-token";

/// Starts a mock server and returns a client pointing at it
pub async fn setup_api_mock() -> (MockServer, Arc<ApiClient>) {
    let server = MockServer::start().await;
    let client = ApiClient::with_base_url(server.uri())
        .expect("build client")
        .with_token(TEST_TOKEN);
    (server, Arc::new(client))
}

pub fn photo_json(id: &str, state: &str, folder: Option<&str>) -> Value {
    json!({
        "id": id,
        "title": format!("Photo {id}"),
        "created_at": "2024-05-01T08:00:00Z",
        "source_url": format!("https://cdn.example.com/{id}.jpg"),
        "assignment_state": state,
        "assigned_folder_id": folder,
    })
}

pub fn folder_json(id: &str, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "code": id.to_uppercase(),
        "project_name": "Harbor Tower",
        "zone_name": null,
        "created_at": "2024-04-01T00:00:00Z",
    })
}

/// Mounts `GET /photos` returning the given records
pub async fn mount_photos(server: &MockServer, photos: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/photos"))
        .and(header("authorization", format!("Bearer {TEST_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": photos })))
        .mount(server)
        .await;
}

/// Mounts `GET /folders` returning the given records
pub async fn mount_folders(server: &MockServer, folders: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/folders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": folders })))
        .mount(server)
        .await;
}

/// Mounts `GET /folders/{id}/before-photo`
pub async fn mount_before_photo(server: &MockServer, folder_id: &str, has_before: bool) {
    Mock::given(method("GET"))
        .and(path(format!("/folders/{folder_id}/before-photo")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "has_before_photo": has_before })),
        )
        .mount(server)
        .await;
}
