use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;

use folio_http::router::AppState;
use folio_kernel::settings::{DatabaseSettings, ServerSettings};

async fn test_pool() -> (Arc<folio_kernel::ModuleRegistry>, SqlitePool) {
    let registry = Arc::new(folio_app::build_registry());
    let settings = DatabaseSettings {
        url: "sqlite::memory:".to_string(),
        ..DatabaseSettings::default()
    };
    let pool = folio_db::bootstrap(&settings, &registry).await.unwrap();
    (registry, pool)
}

async fn create_test_app() -> (Router, SqlitePool) {
    let (registry, pool) = test_pool().await;
    let app = folio_http::build_router(
        AppState::ready(registry, pool.clone()),
        &ServerSettings::default(),
    );
    (app, pool)
}

/// App backed by a multi-connection pool on a database file inside `dir`.
async fn create_file_backed_app(dir: &tempfile::TempDir) -> Router {
    let registry = Arc::new(folio_app::build_registry());
    let settings = DatabaseSettings {
        url: format!("sqlite://{}", dir.path().join("folio.db").display()),
        max_connections: 5,
        create_if_missing: true,
    };
    let pool = folio_db::bootstrap(&settings, &registry).await.unwrap();
    folio_http::build_router(AppState::ready(registry, pool), &ServerSettings::default())
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let body = match body {
        Some(value) => Body::from(value.to_string()),
        None => Body::empty(),
    };
    send_raw(app, method, uri, body).await
}

async fn send_raw(app: &Router, method: Method, uri: &str, body: Body) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    assert_eq!(content_type.as_deref(), Some("application/json"));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn row_count(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM books")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn create_on_empty_table_returns_first_id() {
    let (app, _) = create_test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/books",
        Some(json!({"title": "Dune", "author": "Herbert"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"id": 1, "title": "Dune", "author": "Herbert"}));
}

#[tokio::test]
async fn created_book_round_trips_through_get() {
    let (app, _) = create_test_app().await;

    let (_, created) = send(
        &app,
        Method::POST,
        "/books",
        Some(json!({"title": "Emma", "author": "Austen"})),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (status, fetched) = send(&app, Method::GET, &format!("/books/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, json!({"id": id, "title": "Emma", "author": "Austen"}));
}

#[tokio::test]
async fn list_contains_every_created_book() {
    let (app, _) = create_test_app().await;

    let (status, listed) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([]));

    let titles = ["Dune", "Emma", "Ulysses"];
    for title in titles {
        send(
            &app,
            Method::POST,
            "/books",
            Some(json!({"title": title, "author": "someone"})),
        )
        .await;
    }

    let (_, listed) = send(&app, Method::GET, "/books/", None).await;
    let listed = listed.as_array().unwrap();
    assert!(listed.len() >= titles.len());
    for title in titles {
        assert!(listed.iter().any(|book| book["title"] == title));
    }
}

#[tokio::test]
async fn get_missing_book_is_404() {
    let (app, _) = create_test_app().await;

    let (status, body) = send(&app, Method::GET, "/books/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Book not found"}));
}

#[tokio::test]
async fn non_numeric_id_addresses_zero() {
    let (app, _) = create_test_app().await;
    send(
        &app,
        Method::POST,
        "/books",
        Some(json!({"title": "Dune", "author": "Herbert"})),
    )
    .await;

    let (status, body) = send(&app, Method::GET, "/books/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Book not found"}));

    let (status, body) = send(&app, Method::GET, "/books/1abc", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Dune");
}

#[tokio::test]
async fn update_then_get_is_consistent() {
    let (app, _) = create_test_app().await;
    send(
        &app,
        Method::POST,
        "/books",
        Some(json!({"title": "Dune", "author": "Herbert"})),
    )
    .await;

    let (status, updated) = send(
        &app,
        Method::PUT,
        "/books/1",
        Some(json!({"title": "Children of Dune", "author": "Frank Herbert"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        updated,
        json!({"id": 1, "title": "Children of Dune", "author": "Frank Herbert"})
    );

    let (_, fetched) = send(&app, Method::GET, "/books/1", None).await;
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn update_with_identical_values_is_not_404() {
    let (app, _) = create_test_app().await;
    let book = json!({"title": "Dune", "author": "Herbert"});
    send(&app, Method::POST, "/books", Some(book.clone())).await;

    let (status, body) = send(&app, Method::PUT, "/books/1", Some(book)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 1, "title": "Dune", "author": "Herbert"}));
}

#[tokio::test]
async fn update_missing_book_is_404() {
    let (app, pool) = create_test_app().await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/books/5",
        Some(json!({"title": "Dune", "author": "Herbert"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Book not found"}));
    assert_eq!(row_count(&pool).await, 0);
}

#[tokio::test]
async fn payload_missing_author_is_rejected_without_writes() {
    let (app, pool) = create_test_app().await;
    send(
        &app,
        Method::POST,
        "/books",
        Some(json!({"title": "Dune", "author": "Herbert"})),
    )
    .await;

    let emma = json!({"title": "Emma"});
    let (status, body) = send(&app, Method::POST, "/books", Some(emma.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid data"}));
    assert_eq!(row_count(&pool).await, 1);

    let (status, body) = send(&app, Method::PUT, "/books/1", Some(emma)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid data"}));

    let (_, fetched) = send(&app, Method::GET, "/books/1", None).await;
    assert_eq!(fetched["title"], "Dune");
}

#[tokio::test]
async fn malformed_body_is_invalid_data() {
    let (app, _) = create_test_app().await;

    let (status, body) = send_raw(&app, Method::POST, "/books", Body::from("{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid data"}));

    let (status, body) = send_raw(&app, Method::POST, "/books", Body::empty()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid data"}));
}

#[tokio::test]
async fn delete_removes_book_and_repeats_as_404() {
    let (app, _) = create_test_app().await;
    send(
        &app,
        Method::POST,
        "/books",
        Some(json!({"title": "Dune", "author": "Herbert"})),
    )
    .await;

    let (status, body) = send(&app, Method::DELETE, "/books/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "deleted"}));

    for _ in 0..2 {
        let (status, body) = send(&app, Method::DELETE, "/books/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Book not found"}));
    }
}

#[tokio::test]
async fn put_and_delete_without_id_are_400() {
    let (app, _) = create_test_app().await;

    for method in [Method::PUT, Method::DELETE] {
        let (status, body) = send(&app, method, "/books", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "ID required"}));
    }
}

#[tokio::test]
async fn unsupported_method_is_405() {
    let (app, _) = create_test_app().await;

    let (status, body) = send(&app, Method::PATCH, "/books", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({"error": "Method not allowed"}));
}

#[tokio::test]
async fn unknown_resources_are_404() {
    let (app, _) = create_test_app().await;

    for uri in ["/widgets", "/", "/healthz", "/booksx/1"] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "uri {uri}");
        assert_eq!(body, json!({"error": "Resource not found"}));
    }
}

#[tokio::test]
async fn storage_fault_is_generic_500() {
    let (app, pool) = create_test_app().await;
    sqlx::query("DROP TABLE books").execute(&pool).await.unwrap();

    let (status, body) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Internal server error"}));
}

#[tokio::test]
async fn unavailable_storage_refuses_routing() {
    let app = folio_http::build_router(
        AppState::unavailable("unable to open database file"),
        &ServerSettings::default(),
    );

    let (status, body) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "unable to open database file"}));
}

#[tokio::test]
async fn percent_encoded_id_is_decoded() {
    let (app, _) = create_test_app().await;
    send(
        &app,
        Method::POST,
        "/books",
        Some(json!({"title": "Dune", "author": "Herbert"})),
    )
    .await;

    let (status, body) = send(&app, Method::GET, "/%62ooks/%31", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Dune");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_writes_on_file_database_never_500() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_file_backed_app(&dir).await;

    for n in 0..7 {
        let book = json!({"title": format!("Book {n}"), "author": "someone"});
        let (status, _) = send(&app, Method::POST, "/books", Some(book)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let mut clients = Vec::new();
    for client in 0..5 {
        let app = app.clone();
        clients.push(tokio::spawn(async move {
            let mut statuses = Vec::new();
            for round in 0..10 {
                let title = format!("Dune {client}/{round}");
                let book = json!({"title": title, "author": "Herbert"});
                let (status, _) = send(&app, Method::PUT, "/books/1", Some(book)).await;
                statuses.push(status);
            }
            let own = format!("/books/{}", client + 2);
            let (status, _) = send(&app, Method::DELETE, &own, None).await;
            statuses.push(status);
            let (status, _) = send(&app, Method::DELETE, "/books/7", None).await;
            statuses.push(status);
            statuses
        }));
    }

    let mut deleted_shared = 0;
    for client in clients {
        let statuses = client.await.unwrap();
        let (shared_delete, rest) = statuses.split_last().unwrap();
        assert!(rest.iter().all(|status| *status == StatusCode::OK), "{rest:?}");
        if *shared_delete == StatusCode::OK {
            deleted_shared += 1;
        } else {
            assert_eq!(*shared_delete, StatusCode::NOT_FOUND);
        }
    }
    assert_eq!(deleted_shared, 1);

    let (status, listed) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn scalar_fields_are_stored_as_text() {
    let (app, _) = create_test_app().await;

    let (status, created) = send(
        &app,
        Method::POST,
        "/books",
        Some(json!({"title": 1984, "author": "Orwell"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created, json!({"id": 1, "title": "1984", "author": "Orwell"}));

    let (_, fetched) = send(&app, Method::GET, "/books/1", None).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn oversized_body_is_json_413() {
    let (app, pool) = create_test_app().await;

    let oversized = Body::from(vec![b' '; 3 * 1024 * 1024]);
    let (status, body) = send_raw(&app, Method::POST, "/books", oversized).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body, json!({"error": "Payload too large"}));
    assert_eq!(row_count(&pool).await, 0);
}
