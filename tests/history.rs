//! History listing, lookup and deletion over HTTP.

use api_tester_sdk::RelayCall;
use serde_json::json;

mod common;
use common::{spawn_app, TestApp};

async fn relay_n(app: &TestApp, n: usize) {
    let backend = common::start_mock_backend(200, json!({"ok": true})).await;
    for i in 0..n {
        let res = app
            .client
            .send_request(&RelayCall::new("GET", &format!("http://{}/item/{}", backend, i)))
            .await
            .unwrap();
        assert_eq!(res.status, 200);
    }
}

#[tokio::test]
async fn test_pagination_metadata_and_order() {
    let app = spawn_app().await;
    relay_n(&app, 3).await;

    let page = app.client.history(1, 2).await.unwrap();
    assert_eq!(page.status, 200);
    assert_eq!(
        page.body["pagination"],
        json!({"currentPage": 1, "totalPages": 2, "totalItems": 3, "itemsPerPage": 2})
    );
    let urls: Vec<_> = page.body["history"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["url"].as_str().unwrap().rsplit('/').next().unwrap().to_string())
        .collect();
    assert_eq!(urls, vec!["2", "1"]);

    let page = app.client.history(2, 2).await.unwrap();
    assert_eq!(page.body["history"].as_array().unwrap().len(), 1);
    assert_eq!(page.body["pagination"]["currentPage"], 2);

    let page = app.client.history(5, 2).await.unwrap();
    assert!(page.body["history"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_listing_twice_returns_the_same_page() {
    let app = spawn_app().await;
    relay_n(&app, 5).await;

    let first = app.client.history(1, 10).await.unwrap();
    let second = app.client.history(1, 10).await.unwrap();
    assert_eq!(first.status, 200);
    assert_eq!(first.body["pagination"]["totalItems"], 5);
    assert_eq!(first.body, second.body);
}

#[tokio::test]
async fn test_bad_query_values_fall_back_to_defaults() {
    let app = spawn_app().await;
    relay_n(&app, 1).await;

    let res = app
        .http
        .get(app.url("/api/history?page=abc&limit=0"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["pagination"]["currentPage"], 1);
    assert_eq!(body["pagination"]["itemsPerPage"], 10);

    let res = app
        .http
        .get(app.url("/api/history?limit=5000"))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["pagination"]["itemsPerPage"], 100);
}

#[tokio::test]
async fn test_empty_history() {
    let app = spawn_app().await;
    let page = app.client.history(1, 10).await.unwrap();
    assert_eq!(
        page.body,
        json!({
            "history": [],
            "pagination": {"currentPage": 1, "totalPages": 0, "totalItems": 0, "itemsPerPage": 10}
        })
    );
}

#[tokio::test]
async fn test_delete_one_entry() {
    let app = spawn_app().await;
    relay_n(&app, 2).await;

    let page = app.client.history(1, 10).await.unwrap();
    let id = page.body["history"][0]["_id"].as_str().unwrap().to_string();

    let res = app.client.delete_history_entry(&id).await.unwrap();
    assert_eq!(res.status, 200);
    assert_eq!(res.body["message"], "History entry deleted successfully");

    let res = app.client.delete_history_entry(&id).await.unwrap();
    assert_eq!(res.status, 404);
    assert_eq!(res.error(), Some("History entry not found"));

    let res = app.client.history_entry(&id).await.unwrap();
    assert_eq!(res.status, 404);

    let page = app.client.history(1, 10).await.unwrap();
    assert_eq!(page.body["pagination"]["totalItems"], 1);
}

#[tokio::test]
async fn test_clear_history() {
    let app = spawn_app().await;
    relay_n(&app, 3).await;

    let res = app.client.clear_history().await.unwrap();
    assert_eq!(res.status, 200);
    assert_eq!(res.body, json!({"message": "History cleared", "deleted": 3}));

    let page = app.client.history(1, 10).await.unwrap();
    assert_eq!(page.body["pagination"]["totalItems"], 0);
}
