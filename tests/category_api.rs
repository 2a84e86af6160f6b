use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use shop_category::api::routes::create_router;
use shop_category::logic::CategoryService;
use shop_category::store::MemoryStore;

fn app() -> Router {
    let service = Arc::new(CategoryService::new(Arc::new(MemoryStore::new())));
    create_router::<MemoryStore>().with_state(service)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(body) => Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_health_check() {
    let app = app();
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_create_and_list_categories() {
    let app = app();

    let (status, body) = send(
        &app,
        "POST",
        "/categories",
        Some(json!({"title": "Tops", "displayOrder": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], "SUCCESS");
    assert_eq!(body["data"]["title"], "Tops");
    let root_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/categories",
        Some(json!({"title": "T-shirts", "parentId": root_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let child_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(&app, "GET", "/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    let tree = body["data"].as_array().unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0]["id"].as_i64().unwrap(), root_id);
    assert_eq!(tree[0]["children"][0]["id"].as_i64().unwrap(), child_id);

    // Subtree query rooted at the child
    let (status, body) = send(
        &app,
        "GET",
        &format!("/categories?parentId={}", child_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"].as_i64().unwrap(), child_id);
}

#[tokio::test]
async fn test_create_blank_title_is_invalid() {
    let app = app();
    let (status, body) = send(&app, "POST", "/categories", Some(json!({"title": "  "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_REQUEST");
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn test_duplicate_sibling_title_conflicts() {
    let app = app();

    let (_, body) = send(&app, "POST", "/categories", Some(json!({"title": "Tops"}))).await;
    let root_id = body["data"]["id"].as_i64().unwrap();

    send(
        &app,
        "POST",
        "/categories",
        Some(json!({"title": "T-shirts", "parentId": root_id})),
    )
    .await;
    let (status, body) = send(
        &app,
        "POST",
        "/categories",
        Some(json!({"title": "T-shirts", "parentId": root_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "DUPLICATE_RESOURCE");
}

#[tokio::test]
async fn test_update_rejects_cycle() {
    let app = app();

    let (_, body) = send(&app, "POST", "/categories", Some(json!({"title": "Tops"}))).await;
    let root_id = body["data"]["id"].as_i64().unwrap();
    let (_, body) = send(
        &app,
        "POST",
        "/categories",
        Some(json!({"title": "T-shirts", "parentId": root_id})),
    )
    .await;
    let child_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/categories/{}", root_id),
        Some(json!({"parentId": child_id})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn test_update_moves_subtree() {
    let app = app();

    let (_, body) = send(&app, "POST", "/categories", Some(json!({"title": "Tops"}))).await;
    let tops_id = body["data"]["id"].as_i64().unwrap();
    let (_, body) = send(
        &app,
        "POST",
        "/categories",
        Some(json!({"title": "T-shirts", "parentId": tops_id})),
    )
    .await;
    let shirts_id = body["data"]["id"].as_i64().unwrap();
    let (_, body) = send(&app, "POST", "/categories", Some(json!({"title": "New"}))).await;
    let new_id = body["data"]["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/categories/{}", shirts_id),
        Some(json!({"parentId": new_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", &format!("/categories?parentId={}", new_id), None).await;
    assert_eq!(body["data"][0]["children"][0]["id"].as_i64().unwrap(), shirts_id);
}

#[tokio::test]
async fn test_delete_guard_and_not_found() {
    let app = app();

    let (_, body) = send(&app, "POST", "/categories", Some(json!({"title": "Tops"}))).await;
    let root_id = body["data"]["id"].as_i64().unwrap();
    let (_, body) = send(
        &app,
        "POST",
        "/categories",
        Some(json!({"title": "T-shirts", "parentId": root_id})),
    )
    .await;
    let child_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(&app, "DELETE", &format!("/categories/{}", root_id), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_REQUEST");

    let (status, body) = send(&app, "DELETE", &format!("/categories/{}", child_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], "SUCCESS");

    let (status, body) = send(&app, "DELETE", "/categories/9999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "RESOURCE_NOT_FOUND");
}

#[tokio::test]
async fn test_list_with_unknown_parent_is_not_found() {
    let app = app();
    let (status, body) = send(&app, "GET", "/categories?parentId=42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "RESOURCE_NOT_FOUND");
}
