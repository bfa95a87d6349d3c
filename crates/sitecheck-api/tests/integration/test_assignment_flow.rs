//! End-to-end drop handling over HTTP
//!
//! Wires the HTTP providers into the core stores and coordinator and checks
//! the confirm and rollback paths against a mocked backend.

use std::sync::{Arc, Mutex};

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sitecheck_api::client::ApiClient;
use sitecheck_api::provider::{HttpFolderDirectoryProvider, HttpPhotoFeedProvider};
use sitecheck_api::ApiError;
use sitecheck_core::domain::{AssignmentState, FolderId, PageRequest, PhotoId, PhotoRole};
use sitecheck_core::ports::{
    FirstCandidateSelector, INotificationService, IPhotoFeedProvider, Notification,
};
use sitecheck_core::stores::{FolderDirectoryStore, PhotoFeedStore};
use sitecheck_core::usecases::{AssignmentCoordinator, AssignmentError};

use crate::common;

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

#[async_trait::async_trait]
impl INotificationService for RecordingNotifier {
    async fn notify(&self, notification: &Notification) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

async fn coordinator(
    client: Arc<ApiClient>,
) -> (Arc<AssignmentCoordinator>, Arc<RecordingNotifier>) {
    let photo_store = Arc::new(PhotoFeedStore::new(Arc::new(HttpPhotoFeedProvider::new(
        client.clone(),
    ))));
    let folder_store = Arc::new(FolderDirectoryStore::new(Arc::new(
        HttpFolderDirectoryProvider::new(client),
    )));
    photo_store
        .list(PageRequest::first(), None)
        .await
        .expect("initial feed load");
    folder_store.refetch().await.expect("initial folder load");

    let notifier = Arc::new(RecordingNotifier::default());
    let coordinator = AssignmentCoordinator::new(
        photo_store,
        folder_store,
        Arc::new(FirstCandidateSelector),
        notifier.clone(),
    );
    (Arc::new(coordinator), notifier)
}

async fn mount_feed_sequence(
    server: &MockServer,
    first: serde_json::Value,
    then: serde_json::Value,
) {
    Mock::given(method("GET"))
        .and(path("/photos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [first] })))
        .up_to_n_times(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/photos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [then] })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_confirmed_drop_over_http() {
    let (server, client) = common::setup_api_mock().await;
    mount_feed_sequence(
        &server,
        common::photo_json("p1", "unassigned", None),
        common::photo_json("p1", "assigned_before", Some("f1")),
    )
    .await;
    common::mount_folders(&server, vec![common::folder_json("f1", "Roof membrane")]).await;
    common::mount_before_photo(&server, "f1", false).await;
    Mock::given(method("POST"))
        .and(path("/photos/p1/assign"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::photo_json(
            "p1",
            "assigned_before",
            Some("f1"),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let (coordinator, notifier) = coordinator(client).await;
    let p1 = PhotoId::new("p1".to_string()).unwrap();
    let f1 = FolderId::new("f1".to_string()).unwrap();

    let receipt = coordinator
        .handle_drop(p1.clone(), f1.clone())
        .await
        .expect("drop confirmed");

    assert_eq!(receipt.role, PhotoRole::Before);
    assert!(receipt.reconciled);
    let local = coordinator.photo_store().get(&p1).await.unwrap();
    assert_eq!(local.assignment_state(), AssignmentState::AssignedBefore);
    assert_eq!(local.assigned_folder_id(), Some(&f1));
    assert_eq!(notifier.sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_rejected_drop_over_http_rolls_back() {
    let (server, client) = common::setup_api_mock().await;
    common::mount_photos(&server, vec![common::photo_json("p3", "unassigned", None)]).await;
    common::mount_folders(&server, vec![common::folder_json("f2", "Stairwell B")]).await;
    common::mount_before_photo(&server, "f2", false).await;
    Mock::given(method("POST"))
        .and(path("/photos/p3/assign"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(json!({"message": "Folder already has a before photo"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (coordinator, notifier) = coordinator(client).await;
    let p3 = PhotoId::new("p3".to_string()).unwrap();
    let f2 = FolderId::new("f2".to_string()).unwrap();

    let err = coordinator.handle_drop(p3.clone(), f2).await.unwrap_err();

    match &err {
        AssignmentError::AssignmentRejected {
            rolled_back,
            source,
            ..
        } => {
            assert!(*rolled_back);
            assert!(matches!(
                source.downcast_ref::<ApiError>(),
                Some(ApiError::Rejected(_))
            ));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let local = coordinator.photo_store().get(&p3).await.unwrap();
    assert!(local.is_unassigned());

    let sent = notifier.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].is_error());
    assert!(sent[0].message.contains("Folder already has a before photo"));
}

#[tokio::test]
async fn test_provider_keeps_api_error_reachable() {
    let (server, client) = common::setup_api_mock().await;
    Mock::given(method("POST"))
        .and(path("/photos/p1/assign"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let provider = HttpPhotoFeedProvider::new(client);
    let err = provider
        .assign(
            &PhotoId::new("p1".to_string()).unwrap(),
            &FolderId::new("f1".to_string()).unwrap(),
            PhotoRole::Before,
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ApiError>(),
        Some(ApiError::Unauthorized(_))
    ));
}
