//! Web API Thread Tests
//!
//! Integration tests for the /api/threads endpoints.

mod common;

use axum::http::StatusCode;
use common::{
    assert_no_private_fields, assert_store_unavailable, create_reply, create_test_config,
    create_test_server, create_test_server_with, create_thread, drop_tables, list_threads,
};
use anonboard::Database;
use serde_json::{json, Value};

const UNKNOWN_ID: &str = "6f9619ff-8b86-d011-b42d-00c04fc964ff";

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_create_thread_success() {
    let (server, _db) = create_test_server().await;

    let response = server
        .post("/api/threads/test")
        .json(&json!({
            "text": "t",
            "delete_password": "p"
        }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("location"), "/b/test/");

    let body: Value = response.json();
    assert_eq!(body["redirect"], "/b/test/");
    assert!(body["_id"].as_str().is_some());
    assert!(body.get("thread_id").is_none());

    let threads = list_threads(&server, "test").await;
    assert_eq!(threads.len(), 1);
    assert_eq!(threads[0]["_id"], body["_id"]);
    assert_eq!(threads[0]["text"], "t");
    assert_eq!(threads[0]["created_on"], threads[0]["bumped_on"]);
    assert_eq!(threads[0]["replycount"], 0);
    assert_eq!(threads[0]["replies"], json!([]));
}

#[tokio::test]
async fn test_create_thread_form_encoded() {
    let (server, _db) = create_test_server().await;

    let response = server
        .post("/api/threads/test")
        .form(&[("text", "from a form"), ("delete_password", "p")])
        .await;
    response.assert_status_ok();

    let threads = list_threads(&server, "test").await;
    assert_eq!(threads[0]["text"], "from a form");
}

#[tokio::test]
async fn test_create_thread_missing_fields() {
    let (server, _db) = create_test_server().await;

    for body in [
        json!({"text": "only text"}),
        json!({"delete_password": "only password"}),
        json!({"text": "", "delete_password": "p"}),
        json!({}),
    ] {
        let response = server.post("/api/threads/test").json(&body).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>(),
            json!({"error": "To create a thread text and delete_password is required."})
        );
    }

    assert!(list_threads(&server, "test").await.is_empty());
}

#[tokio::test]
async fn test_create_thread_text_too_long() {
    let (server, _db) = create_test_server().await;

    let response = server
        .post("/api/threads/test")
        .json(&json!({
            "text": "a".repeat(10_001),
            "delete_password": "p"
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["error"],
        "text must be at most 10000 characters."
    );
}

#[tokio::test]
async fn test_invalid_board_name() {
    let (server, _db) = create_test_server().await;

    let response = server
        .post("/api/threads/bad%20board")
        .json(&json!({"text": "t", "delete_password": "p"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "Board name is invalid.");
}

#[tokio::test]
async fn test_undecodable_board_is_json_error() {
    let (server, _db) = create_test_server().await;

    let response = server.get("/api/threads/%FF").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    let message = body["error"].as_str().expect("error is a string");
    assert!(message.contains("Invalid UTF-8"), "unexpected error: {message}");

    let response = server
        .post("/api/threads/%FF")
        .json(&json!({"text": "t", "delete_password": "p"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].is_string());
}

// ============================================================================
// List
// ============================================================================

#[tokio::test]
async fn test_list_empty_board() {
    let (server, _db) = create_test_server().await;

    let response = server.get("/api/threads/nothing-here").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!([]));
}

#[tokio::test]
async fn test_list_limits_threads_and_replies() {
    let (server, _db) = create_test_server().await;

    let mut ids = Vec::new();
    for i in 0..12 {
        ids.push(create_thread(&server, "test", &format!("thread {i}"), "p").await);
    }
    for i in 0..5 {
        create_reply(&server, "test", &ids[0], &format!("reply {i}"), "rp").await;
    }

    let threads = list_threads(&server, "test").await;
    assert_eq!(threads.len(), 10);

    // The oldest thread was bumped to the top by its replies
    assert_eq!(threads[0]["_id"], ids[0].as_str());
    assert_eq!(threads[0]["replycount"], 5);

    let previews: Vec<&str> = threads[0]["replies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["text"].as_str().unwrap())
        .collect();
    assert_eq!(previews, vec!["reply 2", "reply 3", "reply 4"]);

    // Then newest first; threads 1 and 2 fell off the page
    assert_eq!(threads[1]["_id"], ids[11].as_str());
    assert_eq!(threads[9]["_id"], ids[3].as_str());

    for thread in &threads {
        assert!(thread["replies"].as_array().unwrap().len() <= 3);
    }
    assert_no_private_fields(&Value::Array(threads));
}

#[tokio::test]
async fn test_list_is_scoped_to_board() {
    let (server, _db) = create_test_server().await;

    create_thread(&server, "one", "in one", "p").await;
    create_thread(&server, "two", "in two", "p").await;

    let threads = list_threads(&server, "one").await;
    assert_eq!(threads.len(), 1);
    assert_eq!(threads[0]["text"], "in one");
}

#[tokio::test]
async fn test_list_store_unavailable() {
    let db = Database::open_in_memory().await.unwrap();
    let server = create_test_server_with(db.clone(), &create_test_config());
    db.close().await;

    let response = server.get("/api/threads/test").await;
    assert_store_unavailable(&response, "Service Unavailable");
}

#[tokio::test]
async fn test_list_statement_failure() {
    let (server, db) = create_test_server().await;
    create_thread(&server, "test", "t", "p").await;
    drop_tables(&db, &["replies"]).await;

    let response = server.get("/api/threads/test").await;
    assert_store_unavailable(&response, "Error fetching threads from board test");
}

// ============================================================================
// Report
// ============================================================================

#[tokio::test]
async fn test_report_thread() {
    let (server, db) = create_test_server().await;
    let id = create_thread(&server, "test", "t", "p").await;

    for _ in 0..2 {
        let response = server
            .put("/api/threads/test")
            .json(&json!({"thread_id": id}))
            .await;
        response.assert_status(StatusCode::CREATED);
        assert_eq!(response.json::<Value>(), json!({"message": "success"}));
    }

    let mut conn = db.acquire().await.unwrap();
    let reported: bool = sqlx::query_scalar("SELECT reported FROM threads")
        .fetch_one(&mut *conn)
        .await
        .unwrap();
    assert!(reported);
}

#[tokio::test]
async fn test_report_thread_errors() {
    let (server, _db) = create_test_server().await;

    let response = server.put("/api/threads/test").json(&json!({})).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["error"],
        "A valid thread_id is required to report it."
    );

    let response = server
        .put("/api/threads/test")
        .json(&json!({"thread_id": "1"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "Thread id: 1 is invalid.");

    let response = server
        .put("/api/threads/test")
        .json(&json!({"thread_id": UNKNOWN_ID}))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(
        response.json::<Value>()["error"],
        format!("Thread with id: {UNKNOWN_ID} is not found.")
    );
}

#[tokio::test]
async fn test_report_thread_on_other_board() {
    let (server, _db) = create_test_server().await;
    let id = create_thread(&server, "test", "t", "p").await;

    let response = server
        .put("/api/threads/other")
        .json(&json!({"thread_id": id}))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn test_delete_thread_wrong_then_right_password() {
    let (server, _db) = create_test_server().await;
    let id = create_thread(&server, "test", "t", "p").await;

    let response = server
        .delete("/api/threads/test")
        .json(&json!({"thread_id": id, "delete_password": "wrong"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({"error": "incorrect password"})
    );
    assert_eq!(list_threads(&server, "test").await.len(), 1);

    let response = server
        .delete("/api/threads/test")
        .json(&json!({"thread_id": id, "delete_password": "p"}))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({"message": "success"}));

    assert!(list_threads(&server, "test").await.is_empty());
}

#[tokio::test]
async fn test_delete_thread_removes_replies() {
    let (server, db) = create_test_server().await;
    let id = create_thread(&server, "test", "t", "p").await;
    create_reply(&server, "test", &id, "r", "rp").await;

    server
        .delete("/api/threads/test")
        .json(&json!({"thread_id": id, "delete_password": "p"}))
        .await
        .assert_status_ok();

    let mut conn = db.acquire().await.unwrap();
    let replies: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM replies")
        .fetch_one(&mut *conn)
        .await
        .unwrap();
    assert_eq!(replies, 0);
}

#[tokio::test]
async fn test_delete_thread_errors() {
    let (server, _db) = create_test_server().await;

    let response = server
        .delete("/api/threads/test")
        .json(&json!({"thread_id": UNKNOWN_ID}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["error"],
        "To delete a thread delete_password and thread_id should be present."
    );

    // No body at all
    let response = server.delete("/api/threads/test").await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .delete("/api/threads/test")
        .json(&json!({"thread_id": "1", "delete_password": "p"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "Thread id is invalid.");

    let response = server
        .delete("/api/threads/test")
        .json(&json!({"thread_id": UNKNOWN_ID, "delete_password": "p"}))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(
        response.json::<Value>()["error"],
        format!("No thread with id: {UNKNOWN_ID} found")
    );
}

// ============================================================================
// Store failures
// ============================================================================

#[tokio::test]
async fn test_thread_writes_with_closed_pool() {
    let db = Database::open_in_memory().await.unwrap();
    let server = create_test_server_with(db.clone(), &create_test_config());
    db.close().await;

    let response = server
        .post("/api/threads/test")
        .json(&json!({"text": "t", "delete_password": "p"}))
        .await;
    assert_store_unavailable(&response, "Service Unavailable");

    let response = server
        .put("/api/threads/test")
        .json(&json!({"thread_id": UNKNOWN_ID}))
        .await;
    assert_store_unavailable(&response, "Service Unavailable");

    let response = server
        .delete("/api/threads/test")
        .json(&json!({"thread_id": UNKNOWN_ID, "delete_password": "p"}))
        .await;
    assert_store_unavailable(&response, "Service Unavailable");
}

#[tokio::test]
async fn test_thread_writes_with_failing_statements() {
    let (server, db) = create_test_server().await;
    drop_tables(&db, &["replies", "threads"]).await;

    let response = server
        .post("/api/threads/test")
        .json(&json!({"text": "t", "delete_password": "p"}))
        .await;
    assert_store_unavailable(&response, "Error creating thread");

    let response = server
        .put("/api/threads/test")
        .json(&json!({"thread_id": UNKNOWN_ID}))
        .await;
    assert_store_unavailable(
        &response,
        &format!("Error reporting thread with id: {UNKNOWN_ID}."),
    );

    let response = server
        .delete("/api/threads/test")
        .json(&json!({"thread_id": UNKNOWN_ID, "delete_password": "p"}))
        .await;
    assert_store_unavailable(&response, "Service Unavailable");
}

// ============================================================================
// Middleware
// ============================================================================

#[tokio::test]
async fn test_security_headers() {
    let (server, _db) = create_test_server().await;

    let response = server.get("/api/threads/test").await;
    assert_eq!(response.header("x-frame-options"), "SAMEORIGIN");
    assert_eq!(response.header("x-dns-prefetch-control"), "off");
    assert_eq!(response.header("referrer-policy"), "same-origin");
}

#[tokio::test]
async fn test_write_rate_limit() {
    let db = Database::open_in_memory().await.unwrap();
    let mut config = create_test_config();
    config.write_rate_limit = 2;
    let server = create_test_server_with(db, &config);

    for _ in 0..2 {
        server
            .post("/api/threads/test")
            .json(&json!({"text": "t", "delete_password": "p"}))
            .await
            .assert_status_ok();
    }

    let response = server
        .post("/api/threads/test")
        .json(&json!({"text": "t", "delete_password": "p"}))
        .await;
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        response.json::<Value>(),
        json!({"error": "Too many requests. Please try again later."})
    );

    // Reads are never limited
    server.get("/api/threads/test").await.assert_status_ok();
}
