mod helpers;

use bytes::Bytes;
use helpers::{api_path, setup_test_app};
use serde_json::{json, Value};

#[tokio::test]
async fn test_collections_empty_before_first_save() {
    let app = setup_test_app();

    let response = app.client().get(&api_path("/collections")).await;
    assert_eq!(response.status_code(), 200);
    response.assert_json(&json!({ "collections": [] }));
}

#[tokio::test]
async fn test_create_and_list_collections() {
    let app = setup_test_app();

    let created = app
        .client()
        .post(&api_path("/collections"))
        .json(&json!({ "name": "  Best/Of 2024! " }))
        .await;
    assert_eq!(created.status_code(), 200);
    created.assert_json(&json!({ "message": "Created", "name": "BestOf 2024" }));

    app.client()
        .post(&api_path("/collections"))
        .json(&json!({ "name": "Archive" }))
        .await;

    let listed = app.client().get(&api_path("/collections")).await;
    listed.assert_json(&json!({ "collections": ["Archive", "BestOf 2024"] }));
    assert!(app.output_dir().join("Saved/Archive").is_dir());
}

#[tokio::test]
async fn test_create_collection_rejects_bad_names() {
    let app = setup_test_app();

    let missing = app
        .client()
        .post(&api_path("/collections"))
        .json(&json!({}))
        .await;
    assert_eq!(missing.status_code(), 400);
    let body: Value = missing.json();
    assert_eq!(body["error"], "No name provided");

    let unusable = app
        .client()
        .post(&api_path("/collections"))
        .json(&json!({ "name": "../.." }))
        .await;
    assert_eq!(unusable.status_code(), 400);
    let body: Value = unusable.json();
    assert_eq!(body["error"], "Invalid collection name");

    let malformed = app
        .client()
        .post(&api_path("/collections"))
        .bytes(Bytes::from_static(b"{not json"))
        .content_type("application/json")
        .await;
    assert_eq!(malformed.status_code(), 400);
}
