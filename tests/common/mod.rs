//! Test helpers for web API tests.
//!
//! Provides an in-memory test server and shortcuts for creating content.

#![allow(dead_code)]

use std::sync::Arc;

use anonboard::auth::Hasher;
use anonboard::config::{SecurityConfig, WebConfig};
use anonboard::web::handlers::AppState;
use anonboard::web::router::create_router;
use anonboard::Database;
use axum::http::StatusCode;
use axum_test::{TestResponse, TestServer};
use serde_json::{json, Value};

/// Create a test configuration with a generous write limit.
pub fn create_test_config() -> WebConfig {
    WebConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![],
        write_rate_limit: 10_000,
        trust_proxy_headers: false,
    }
}

/// Cheap Argon2 parameters so tests stay fast.
pub fn create_test_hasher() -> Hasher {
    Hasher::new(&SecurityConfig {
        hash_memory_kib: 1024,
        hash_iterations: 1,
        hash_parallelism: 1,
    })
    .expect("Failed to create test hasher")
}

/// Create a test server over the given database and configuration.
pub fn create_test_server_with(db: Database, config: &WebConfig) -> TestServer {
    let app_state = Arc::new(AppState::new(db, create_test_hasher()));
    let router = create_router(app_state, config);
    TestServer::new(router).expect("Failed to create test server")
}

/// Create a test server with an in-memory database.
pub async fn create_test_server() -> (TestServer, Database) {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    let server = create_test_server_with(db.clone(), &create_test_config());
    (server, db)
}

/// Create a thread and return its ID.
pub async fn create_thread(server: &TestServer, board: &str, text: &str, password: &str) -> String {
    let response = server
        .post(&format!("/api/threads/{}", board))
        .json(&json!({
            "text": text,
            "delete_password": password
        }))
        .await;
    response.assert_status_ok();

    response.json::<Value>()["_id"]
        .as_str()
        .expect("created thread has an _id")
        .to_string()
}

/// Create a reply and return its ID.
pub async fn create_reply(
    server: &TestServer,
    board: &str,
    thread_id: &str,
    text: &str,
    password: &str,
) -> String {
    let response = server
        .post(&format!("/api/replies/{}", board))
        .json(&json!({
            "thread_id": thread_id,
            "text": text,
            "delete_password": password
        }))
        .await;
    response.assert_status_ok();

    response.json::<Value>()["_id"]
        .as_str()
        .expect("created reply has an _id")
        .to_string()
}

/// Fetch a thread with all of its replies.
pub async fn get_thread(server: &TestServer, board: &str, thread_id: &str) -> Value {
    let response = server
        .get(&format!("/api/replies/{}", board))
        .add_query_param("thread_id", thread_id)
        .await;
    response.assert_status_ok();
    response.json::<Value>()
}

/// List a board.
pub async fn list_threads(server: &TestServer, board: &str) -> Vec<Value> {
    let response = server.get(&format!("/api/threads/{}", board)).await;
    response.assert_status_ok();
    response.json::<Vec<Value>>()
}

/// Assert that a JSON value never exposes private fields at any level.
pub fn assert_no_private_fields(value: &Value) {
    match value {
        Value::Object(map) => {
            assert!(!map.contains_key("reported"), "reported exposed: {value}");
            assert!(
                !map.contains_key("delete_password"),
                "delete_password exposed: {value}"
            );
            map.values().for_each(assert_no_private_fields);
        }
        Value::Array(items) => items.iter().for_each(assert_no_private_fields),
        _ => {}
    }
}

/// Drop tables so that every statement touching them fails.
pub async fn drop_tables(db: &Database, tables: &[&str]) {
    let mut conn = db.acquire().await.expect("Failed to acquire connection");
    for table in tables {
        let sql = format!("DROP TABLE {table}");
        sqlx::query(&sql)
            .execute(&mut *conn)
            .await
            .expect("Failed to drop table");
    }
}

/// Assert a 503 carrying exactly `message`.
pub fn assert_store_unavailable(response: &TestResponse, message: &str) {
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.json::<Value>(), json!({ "error": message }));
}
