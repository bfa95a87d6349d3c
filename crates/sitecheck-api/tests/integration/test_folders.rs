//! Integration tests for the folder directory endpoints

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use sitecheck_api::{folders, ApiError};
use sitecheck_core::domain::FolderId;

use crate::common;

fn fid(id: &str) -> FolderId {
    FolderId::new(id.to_string()).unwrap()
}

#[tokio::test]
async fn test_list_folders() {
    let (server, client) = common::setup_api_mock().await;
    common::mount_folders(
        &server,
        vec![
            common::folder_json("f1", "Roof membrane"),
            common::folder_json("f2", "Stairwell B"),
        ],
    )
    .await;

    let result = folders::list_folders(&client, None)
        .await
        .expect("list_folders failed");

    assert_eq!(result.len(), 2);
    assert_eq!(result[0].id(), &fid("f1"));
    assert_eq!(result[0].display_label(), "F1 - Roof membrane (Harbor Tower)");
}

#[tokio::test]
async fn test_list_folders_forwards_search() {
    let (server, client) = common::setup_api_mock().await;
    Mock::given(method("GET"))
        .and(path("/folders"))
        .and(query_param("search", "roof"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [common::folder_json("f1", "Roof membrane")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = folders::list_folders(&client, Some("  roof "))
        .await
        .expect("list_folders failed");
    assert_eq!(result.len(), 1);
}

#[tokio::test]
async fn test_has_before_photo() {
    let (server, client) = common::setup_api_mock().await;
    common::mount_before_photo(&server, "f1", false).await;
    common::mount_before_photo(&server, "f3", true).await;

    assert!(!folders::has_before_photo(&client, &fid("f1")).await.unwrap());
    assert!(folders::has_before_photo(&client, &fid("f3")).await.unwrap());
}

#[tokio::test]
async fn test_has_before_photo_unknown_folder() {
    let (server, client) = common::setup_api_mock().await;
    Mock::given(method("GET"))
        .and(path("/folders/gone/before-photo"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = folders::has_before_photo(&client, &fid("gone"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn test_forbidden_folder_listing() {
    let (server, client) = common::setup_api_mock().await;
    Mock::given(method("GET"))
        .and(path("/folders"))
        .respond_with(ResponseTemplate::new(403).set_body_string("read-only account"))
        .mount(&server)
        .await;

    let err = folders::list_folders(&client, None).await.unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(ref m) if m == "read-only account"));
}

#[tokio::test]
async fn test_folder_ids_that_would_rewrite_the_path_are_refused() {
    let (server, client) = common::setup_api_mock().await;
    common::mount_before_photo(&server, "f1", true).await;

    for raw in ["f1?x=", "../folders/f1", "f1#frag"] {
        assert!(raw.parse::<FolderId>().is_err(), "accepted {raw:?}");
    }
    assert!(folders::has_before_photo(&client, &fid("f1")).await.unwrap());
}

#[tokio::test]
async fn test_listing_with_unsafe_folder_id_is_invalid_response() {
    let (server, client) = common::setup_api_mock().await;
    common::mount_folders(&server, vec![common::folder_json("f1/../f2", "Roof")]).await;

    let err = folders::list_folders(&client, None).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidResponse(_)));
}
