//! API integration tests
//!
//! Run against a freshly seeded server (`lectern-seed`, then `lectern-server`).

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Seeded accounts: (id, email, password)
const BATYA: (i64, &str, &str) = (1, "batya@pt.com", "batya123");
const ROB: (i64, &str, &str) = (2, "rob@pt.com", "rob123");
const BRIAN: (i64, &str, &str) = (3, "brian@pt.com", "brian123");

/// Helper to get a token for a seeded account
async fn get_auth_token(client: &Client, email: &str, password: &str) -> String {
    let response = client
        .post(format!("{}/login", BASE_URL))
        .json(&json!({
            "email": email,
            "password": password
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

fn unique_email(prefix: &str) -> String {
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{}-{}@pt.com", prefix, nanos)
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login() {
    let client = Client::new();

    let response = client
        .post(format!("{}/login", BASE_URL))
        .json(&json!({
            "email": BRIAN.1,
            "password": BRIAN.2
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["id"], BRIAN.0);
    assert_eq!(body["email"], BRIAN.1);
    assert_eq!(body["role"], "user");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/login", BASE_URL))
        .json(&json!({
            "email": BRIAN.1,
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_list_and_get_books() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let books: Vec<Value> = response.json().await.expect("Failed to parse response");
    assert!(books.len() >= 6);

    let response = client
        .get(format!("{}/books/1", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let book: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(book["title"], "A Little Life");
    assert_eq!(book["available"], false);

    let response = client
        .get(format!("{}/books/999999", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_signup() {
    let client = Client::new();
    let email = unique_email("signup");

    let response = client
        .post(format!("{}/signup", BASE_URL))
        .json(&json!({ "email": email, "password": "secret", "role": "user" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response.headers()["location"].to_str().unwrap().to_string();
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(location, format!("/api/v1/users/{}", body["id"]));
    assert!(body.get("password").is_none());

    // Emails are compared case-insensitively
    let response = client
        .post(format!("{}/signup", BASE_URL))
        .json(&json!({ "email": email.to_uppercase(), "password": "secret", "role": "user" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore]
async fn test_anonymous_admin_signup_is_forbidden() {
    let client = Client::new();

    let response = client
        .post(format!("{}/signup", BASE_URL))
        .json(&json!({ "email": unique_email("admin"), "password": "secret", "role": "admin" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let token = get_auth_token(&client, BATYA.1, BATYA.2).await;
    let response = client
        .post(format!("{}/signup", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "email": unique_email("admin"), "password": "secret", "role": "admin" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
#[ignore]
async fn test_book_lifecycle_requires_admin() {
    let client = Client::new();
    let book = json!({
        "title": "Beloved",
        "author": "Toni Morrison",
        "isbn": "isbn",
        "description": "description"
    });

    let user_token = get_auth_token(&client, BRIAN.1, BRIAN.2).await;
    let response = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(&user_token)
        .json(&book)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let admin_token = get_auth_token(&client, BATYA.1, BATYA.2).await;
    let response = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(&admin_token)
        .json(&book)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = response.json().await.expect("Failed to parse response");
    let id = created["id"].as_i64().expect("No id in response");
    assert_eq!(created["available"], true);

    let response = client
        .put(format!("{}/books/{}", BASE_URL, id))
        .bearer_auth(&admin_token)
        .json(&json!({
            "title": "Beloved",
            "author": "Toni Morrison",
            "isbn": "978-1400033416",
            "description": "description"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(updated["isbn"], "978-1400033416");

    let response = client
        .delete(format!("{}/books/{}", BASE_URL, id))
        .bearer_auth(&admin_token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(response.headers()["entity"], id.to_string().as_str());

    // Seeded book 1 is out with rob
    let response = client
        .delete(format!("{}/books/1", BASE_URL))
        .bearer_auth(&admin_token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore]
async fn test_checkout_flow() {
    let client = Client::new();
    let rob = get_auth_token(&client, ROB.1, ROB.2).await;
    let brian = get_auth_token(&client, BRIAN.1, BRIAN.2).await;

    // Rob holds books 1 to 4; book 5 is his fifth
    let response = client
        .post(format!("{}/checkouts/checkout", BASE_URL))
        .bearer_auth(&rob)
        .json(&json!({ "user_id": ROB.0, "book_id": 5 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let checkout: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(checkout["checked_in"], false);

    let response = client
        .post(format!("{}/checkouts/checkout", BASE_URL))
        .bearer_auth(&rob)
        .json(&json!({ "user_id": ROB.0, "book_id": 6 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    let response = client
        .post(format!("{}/checkouts/checkout", BASE_URL))
        .bearer_auth(&brian)
        .json(&json!({ "user_id": BRIAN.0, "book_id": 1 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = client
        .post(format!("{}/checkouts/checkin", BASE_URL))
        .bearer_auth(&brian)
        .json(&json!({ "user_id": BRIAN.0, "book_id": 5 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = client
        .post(format!("{}/checkouts/checkin", BASE_URL))
        .bearer_auth(&rob)
        .json(&json!({ "user_id": ROB.0, "book_id": 5 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let checkin: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(checkin["checked_in"], true);

    let response = client
        .get(format!("{}/checkouts/current-books/{}", BASE_URL, ROB.0))
        .bearer_auth(&rob)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let books: Vec<Value> = response.json().await.expect("Failed to parse response");
    assert_eq!(books.len(), 4);
}

#[tokio::test]
#[ignore]
async fn test_history_views() {
    let client = Client::new();
    let rob = get_auth_token(&client, ROB.1, ROB.2).await;

    let response = client
        .get(format!("{}/checkouts/all-books/{}", BASE_URL, ROB.0))
        .bearer_auth(&rob)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let records: Vec<Value> = response.json().await.expect("Failed to parse response");
    assert!(records.len() >= 4);

    let response = client
        .get(format!("{}/checkouts/all-books/{}", BASE_URL, BRIAN.0))
        .bearer_auth(&rob)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Any member may see who borrowed a book; the token may ride in the query string
    let response = client
        .get(format!("{}/checkouts/all-users/1?token={}", BASE_URL, rob))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let records: Vec<Value> = response.json().await.expect("Failed to parse response");
    assert!(records.iter().any(|r| r["email"] == ROB.1));
}

#[tokio::test]
#[ignore]
async fn test_delete_user_with_open_checkouts_conflicts() {
    let client = Client::new();
    let rob = get_auth_token(&client, ROB.1, ROB.2).await;

    let response = client
        .delete(format!("{}/users/{}", BASE_URL, ROB.0))
        .bearer_auth(&rob)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
