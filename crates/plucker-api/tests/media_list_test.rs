mod helpers;

use helpers::{api_path, setup_test_app};
use serde_json::Value;

fn file_names(body: &Value) -> Vec<String> {
    body["items"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|item| item["type"] == "file")
        .map(|item| item["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_list_roots() {
    let app = setup_test_app();

    let response = app.client().get(&api_path("/media-list")).await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["total"], 2);
    assert_eq!(body["current_path"], "");
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["name"], "Input");
    assert_eq!(items[0]["type"], "dir");
    assert_eq!(items[1]["path"], "Output");
}

#[tokio::test]
async fn test_list_hides_video_posters() {
    let app = setup_test_app();
    for name in ["a.png", "a.mp4", "b.gif", "b.png", "c.jpg", "notes.txt"] {
        app.write_output(name, b"x");
    }

    let response = app
        .client()
        .get(&api_path("/media-list"))
        .add_query_param("subdir", "Output")
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(file_names(&body), vec!["a.mp4", "b.gif", "b.png", "c.jpg"]);
    assert_eq!(body["total"], 4);
    assert_eq!(body["current_path"], "Output");
}

#[tokio::test]
async fn test_list_paginates_files_only() {
    let app = setup_test_app();
    app.write_output("sub/keep.png", b"x");
    for i in 0..25 {
        app.write_output(&format!("img{:02}.png", i), b"x");
    }

    let second = app
        .client()
        .get(&api_path("/media-list"))
        .add_query_param("subdir", "Output")
        .add_query_param("offset", 20)
        .add_query_param("limit", 20)
        .await;
    let body: Value = second.json();
    assert_eq!(body["total"], 25);
    assert_eq!(body["items"][0]["type"], "dir");
    assert_eq!(body["items"][0]["path"], "Output/sub");
    assert_eq!(file_names(&body).len(), 5);

    let beyond = app
        .client()
        .get(&api_path("/media-list"))
        .add_query_param("subdir", "Output")
        .add_query_param("offset", 30)
        .await;
    let body: Value = beyond.json();
    assert_eq!(body["total"], 25);
    assert!(file_names(&body).is_empty());
}

#[tokio::test]
async fn test_list_zero_limit_returns_directories_only() {
    let app = setup_test_app();
    app.write_output("sub/keep.png", b"x");
    app.write_output("one.png", b"x");
    app.write_output("two.png", b"x");

    let response = app
        .client()
        .get(&api_path("/media-list"))
        .add_query_param("subdir", "Output")
        .add_query_param("limit", 0)
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["total"], 2);
    assert!(file_names(&body).is_empty());
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["items"][0]["path"], "Output/sub");
}

#[tokio::test]
async fn test_list_negative_offset_treated_as_zero() {
    let app = setup_test_app();
    app.write_output("one.png", b"x");

    let response = app
        .client()
        .get(&api_path("/media-list"))
        .add_query_param("subdir", "Output")
        .add_query_param("offset", -5)
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(file_names(&body), vec!["one.png"]);
}

#[tokio::test]
async fn test_list_rejects_traversal() {
    let app = setup_test_app();

    let response = app
        .client()
        .get(&api_path("/media-list"))
        .add_query_param("subdir", "Output/../../etc")
        .await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_PATH");
    assert_eq!(body["error"], "Invalid path");
}

#[tokio::test]
async fn test_list_unknown_root_keeps_reason_in_details() {
    let app = setup_test_app();

    let response = app
        .client()
        .get(&api_path("/media-list"))
        .add_query_param("subdir", "Models/loras")
        .await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"], "Invalid path");
    assert!(body["details"].as_str().unwrap().contains("Models"));
}

#[tokio::test]
async fn test_list_missing_directory() {
    let app = setup_test_app();

    let response = app
        .client()
        .get(&api_path("/media-list"))
        .add_query_param("subdir", "Output/nowhere")
        .await;
    assert_eq!(response.status_code(), 404);
    let body: Value = response.json();
    assert_eq!(body["error"], "Directory not found");
}

#[tokio::test]
async fn test_list_rejects_non_numeric_offset() {
    let app = setup_test_app();

    let response = app
        .client()
        .get(&api_path("/media-list"))
        .add_query_param("subdir", "Output")
        .add_query_param("offset", "abc")
        .await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_request_id_echoed() {
    let app = setup_test_app();

    let response = app
        .client()
        .get(&api_path("/media-list"))
        .add_header("X-Request-ID", "test-req-1")
        .await;
    assert_eq!(response.header("X-Request-ID"), "test-req-1");
}
