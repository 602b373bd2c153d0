//! API integration tests
//!
//! Each test starts the router on an ephemeral port over a private
//! in-memory database and talks to it with a real HTTP client.

use librarian_server::{
    api,
    config::{AppConfig, DatabaseConfig},
    AppState,
};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

struct TestServer {
    base_url: String,
    client: Client,
}

impl TestServer {
    async fn start() -> Self {
        let config = AppConfig {
            database: DatabaseConfig::in_memory(),
            ..AppConfig::default()
        };
        let state = AppState::from_config(config)
            .await
            .expect("Failed to build application state");
        let app = api::create_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("No local address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self {
            base_url: format!("http://{}/api", addr),
            client: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send request")
    }

    async fn post(&self, path: &str, body: Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .expect("Failed to send request")
    }

    async fn put(&self, path: &str, body: Value) -> reqwest::Response {
        self.client
            .put(self.url(path))
            .json(&body)
            .send()
            .await
            .expect("Failed to send request")
    }

    async fn delete(&self, path: &str) -> reqwest::Response {
        self.client
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to send request")
    }

    async fn create_class(&self, name: &str) {
        let response = self.post("/classes", json!({ "name": name })).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    async fn create_student(&self, first_name: &str, class_name: &str) -> String {
        let response = self
            .post(
                "/students",
                json!({ "first_name": first_name, "last_name": "Dupont", "class_name": class_name }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = response.json().await.expect("Failed to parse response");
        body["id"].as_str().expect("No student ID").to_string()
    }

    async fn create_book(&self, title: &str, quantity: i64) -> String {
        let response = self
            .post("/books", json!({ "title": title, "author": "Jules Verne", "quantity": quantity }))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = response.json().await.expect("Failed to parse response");
        body["id"].as_str().expect("No book ID").to_string()
    }

    async fn book(&self, id: &str) -> Value {
        self.get(&format!("/books/{}", id))
            .await
            .json()
            .await
            .expect("Failed to parse response")
    }
}

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await;

    let response = server.get("/health").await;
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");

    let response = server.get("/ready").await;
    assert!(response.status().is_success());

    let body: Value = server.get("").await.json().await.expect("Failed to parse response");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_classes() {
    let server = TestServer::start().await;
    server.create_class("CM1").await;
    server.create_class("CE2").await;

    let response = server.post("/classes", json!({ "name": "CM1" })).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: Value = server.get("/classes").await.json().await.expect("Failed to parse response");
    assert_eq!(body["classes"], json!(["CE2", "CM1"]));

    let response = server.delete("/classes/CE2").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_student_crud() {
    let server = TestServer::start().await;
    server.create_class("6A").await;
    server.create_class("6B").await;

    let response = server
        .post("/students", json!({ "first_name": "Léa", "last_name": "Roux", "class_name": "9Z" }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let id = server.create_student("Léa", "6A").await;

    let response = server.put(&format!("/students/{}", id), json!({ "class_name": "6B" })).await;
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["class_name"], "6B");
    assert_eq!(body["first_name"], "Léa");

    let response = server.put(&format!("/students/{}", id), json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = server.get("/students/class/6B").await.json().await.expect("Failed to parse response");
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    let body: Value = server.get("/students/class/6A").await.json().await.expect("Failed to parse response");
    assert_eq!(body.as_array().map(Vec::len), Some(0));

    // A class with students cannot be removed
    let response = server.delete("/classes/6B").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = server.delete(&format!("/students/{}", id)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = server.get(&format!("/students/{}", id)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_book_crud() {
    let server = TestServer::start().await;
    let id = server.create_book("Vingt mille lieues sous les mers", 2).await;

    let book = server.book(&id).await;
    assert_eq!(book["quantity"], 2);
    assert_eq!(book["borrowed_count"], 0);
    assert_eq!(book["available_copies"], 2);
    assert_eq!(book["available"], true);

    let response = server.put(&format!("/books/{}", id), json!({ "quantity": 4 })).await;
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["available_copies"], 4);

    let response = server.post("/books", json!({ "title": "", "author": "Anonyme" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = server.delete(&format!("/books/{}", id)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = server.get(&format!("/books/{}", id)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_borrow_and_return_flow() {
    let server = TestServer::start().await;
    server.create_class("5C").await;
    let student = server.create_student("Hugo", "5C").await;
    let book = server.create_book("Le Tour du monde en quatre-vingts jours", 2).await;

    let borrow = json!({ "student_id": student, "book_id": book, "due_days": 7 });

    let response = server.post("/borrow", borrow.clone()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["loan"]["available_copies"], 1);

    let response = server.post("/borrow", borrow.clone()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(server.book(&book).await["available_copies"], 0);

    let response = server.post("/borrow", borrow.clone()).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "No copies available");
    assert_eq!(server.book(&book).await["borrowed_count"], 2);

    // Loans are visible on the student record
    let body: Value = server
        .get(&format!("/students/{}", student))
        .await
        .json()
        .await
        .expect("Failed to parse response");
    let borrowed = body["borrowed_books"].as_array().expect("No borrowed books");
    assert_eq!(borrowed.len(), 2);
    assert_eq!(borrowed[0]["book_title"], "Le Tour du monde en quatre-vingts jours");
    assert_eq!(borrowed[0]["is_overdue"], false);

    // The borrower and the book are protected while on loan
    let response = server.delete(&format!("/students/{}", student)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let response = server.delete(&format!("/books/{}", book)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let response = server.put(&format!("/books/{}", book), json!({ "quantity": 1 })).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let give_back = json!({ "student_id": student, "book_id": book });
    for expected in [1, 2] {
        let response = server.post("/return", give_back.clone()).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = response.json().await.expect("Failed to parse response");
        assert_eq!(body["loan"]["available_copies"], expected);
    }

    let response = server.post("/return", give_back).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(server.book(&book).await["borrowed_count"], 0);
}

#[tokio::test]
async fn test_borrow_rejections() {
    let server = TestServer::start().await;
    server.create_class("4D").await;
    let student = server.create_student("Inès", "4D").await;
    let book = server.create_book("Michel Strogoff", 1).await;

    let response = server
        .post("/borrow", json!({ "student_id": student, "book_id": book, "due_days": 120 }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = server
        .post(
            "/borrow",
            json!({ "student_id": "00000000-0000-0000-0000-000000000000", "book_id": book }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = server
        .post("/return", json!({ "student_id": student, "book_id": book }))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert_eq!(server.book(&book).await["borrowed_count"], 0);
}

#[tokio::test]
async fn test_malformed_ids_get_error_body() {
    let server = TestServer::start().await;

    let response = server
        .post("/borrow", json!({ "student_id": "not-a-uuid", "book_id": "also-bad" }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("application/json"));
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["code"], 4);
    assert_eq!(body["error"], "BadValue");
    assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));

    let response = server.get("/books/not-a-uuid").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "BadValue");

    let response = server.post("/return", json!({ "student_id": 12 })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_stats() {
    let server = TestServer::start().await;
    server.create_class("3A").await;
    server.create_class("3B").await;
    let student = server.create_student("Nina", "3A").await;
    server.create_student("Omar", "3A").await;
    let book = server.create_book("Cinq semaines en ballon", 3).await;
    server.create_book("L'Île mystérieuse", 1).await;

    server
        .post("/borrow", json!({ "student_id": student, "book_id": book }))
        .await;

    let response = server.get("/stats").await;
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["total_students"], 2);
    assert_eq!(body["total_classes"], 2);
    assert_eq!(body["total_books"], 2);
    assert_eq!(body["total_copies"], 4);
    assert_eq!(body["borrowed_copies"], 1);
    assert_eq!(body["available_copies"], 3);
    assert_eq!(body["available_books"], 2);
    assert_eq!(body["active_loans"], 1);
    assert_eq!(body["overdue_loans"], 0);
    assert_eq!(body["class_counts"], json!({ "3A": 2, "3B": 0 }));
}

#[tokio::test]
async fn test_csv_exports() {
    let server = TestServer::start().await;
    server.create_class("2nde").await;
    let student = server.create_student("Paul", "2nde").await;
    let book = server.create_book("De la Terre à la Lune", 2).await;
    server
        .post("/borrow", json!({ "student_id": student, "book_id": book }))
        .await;

    let response = server.get("/export/books").await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/csv"));
    let csv = response.text().await.expect("Failed to read body");
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("id,title,author,quantity,borrowed_count,available_copies"));
    assert_eq!(lines.next(), Some(format!("{},De la Terre à la Lune,Jules Verne,2,1,1", book).as_str()));

    let csv = server
        .get("/export/students?class_name=2nde")
        .await
        .text()
        .await
        .expect("Failed to read body");
    assert!(csv.contains("Paul,Dupont,2nde,1,De la Terre à la Lune"));

    let response = server.get("/export/students?class_name=inconnue").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_openapi_document() {
    let server = TestServer::start().await;
    let response = server
        .client
        .get(server.base_url.replace("/api", "/api-docs/openapi.json"))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["paths"]["/borrow"].is_object());
}
