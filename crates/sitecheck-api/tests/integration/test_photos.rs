//! Integration tests for the photo feed and assignment endpoints

use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use sitecheck_api::{client::ApiClient, photos, ApiError};
use sitecheck_core::domain::{
    AssignmentState, DateFilter, FolderId, PageRequest, PhotoId, PhotoRole,
};

use crate::common;

fn pid(id: &str) -> PhotoId {
    PhotoId::new(id.to_string()).unwrap()
}

fn fid(id: &str) -> FolderId {
    FolderId::new(id.to_string()).unwrap()
}

#[tokio::test]
async fn test_list_photos_sends_paging_and_filter() {
    let (server, client) = common::setup_api_mock().await;

    Mock::given(method("GET"))
        .and(path("/photos"))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "10"))
        .and(query_param("from", "2024-05-01"))
        .and(query_param("to", "2024-05-31"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                common::photo_json("p1", "unassigned", None),
                common::photo_json("p2", "assigned_before", Some("f1")),
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = PageRequest::new(2, 10).unwrap();
    let filter = DateFilter::new(
        NaiveDate::from_ymd_opt(2024, 5, 1),
        NaiveDate::from_ymd_opt(2024, 5, 31),
    )
    .unwrap();

    let result = photos::list_photos(&client, &page, Some(&filter))
        .await
        .expect("list_photos failed");

    assert_eq!(result.len(), 2);
    assert!(result[0].is_unassigned());
    assert_eq!(result[1].assignment_state(), AssignmentState::AssignedBefore);
    assert_eq!(result[1].assigned_folder_id(), Some(&fid("f1")));
}

#[tokio::test]
async fn test_list_photos_sends_bearer_token() {
    let (server, client) = common::setup_api_mock().await;
    common::mount_photos(&server, vec![common::photo_json("p1", "unassigned", None)]).await;

    let result = photos::list_photos(&client, &PageRequest::first(), None)
        .await
        .expect("authenticated request matches mock");
    assert_eq!(result.len(), 1);
}

#[tokio::test]
async fn test_list_photos_rejects_inconsistent_record() {
    let (server, client) = common::setup_api_mock().await;
    common::mount_photos(
        &server,
        vec![common::photo_json("p1", "unassigned", Some("f1"))],
    )
    .await;

    let err = photos::list_photos(&client, &PageRequest::first(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_list_photos_malformed_body() {
    let (server, client) = common::setup_api_mock().await;
    Mock::given(method("GET"))
        .and(path("/photos"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = photos::list_photos(&client, &PageRequest::first(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_list_photos_unauthorized() {
    let (server, client) = common::setup_api_mock().await;
    Mock::given(method("GET"))
        .and(path("/photos"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "token expired"})),
        )
        .mount(&server)
        .await;

    let err = photos::list_photos(&client, &PageRequest::first(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(ref m) if m == "token expired"));
}

#[tokio::test]
async fn test_assign_photo_posts_folder_and_role() {
    let (server, client) = common::setup_api_mock().await;

    Mock::given(method("POST"))
        .and(path("/photos/p1/assign"))
        .and(body_json(json!({"folder_id": "f1", "role": "before"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::photo_json(
            "p1",
            "assigned_before",
            Some("f1"),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let photo = photos::assign_photo(&client, &pid("p1"), &fid("f1"), PhotoRole::Before)
        .await
        .expect("assign_photo failed");

    assert_eq!(photo.assignment_state(), AssignmentState::AssignedBefore);
    assert_eq!(photo.assigned_folder_id(), Some(&fid("f1")));
}

#[tokio::test]
async fn test_assign_photo_conflict_is_rejected_without_retry() {
    let (server, client) = common::setup_api_mock().await;

    Mock::given(method("POST"))
        .and(path("/photos/p3/assign"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(json!({"message": "Folder already has a before photo"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = photos::assign_photo(&client, &pid("p3"), &fid("f2"), PhotoRole::Before)
        .await
        .unwrap_err();

    match err {
        ApiError::Rejected(message) => assert_eq!(message, "Folder already has a before photo"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_assign_photo_server_error_is_not_retried() {
    let (server, client) = common::setup_api_mock().await;

    Mock::given(method("POST"))
        .and(path("/photos/p3/assign"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let err = photos::assign_photo(&client, &pid("p3"), &fid("f2"), PhotoRole::After)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::ServerError { status: 503, .. }));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let (server, _) = common::setup_api_mock().await;
    let uri = server.uri();
    drop(server);

    let client = ApiClient::with_base_url(uri).unwrap();
    let err = photos::list_photos(&client, &PageRequest::first(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NetworkError(_)));
}
