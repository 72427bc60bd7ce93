use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use contact_hub::core::import::ImportLimits;
use contact_hub::domain::model::{AuthSession, AuthUser, SignUpRequest};
use contact_hub::domain::ports::IdentityProvider;
use contact_hub::{router, AppState, ContactError, InMemoryContactStore, Result};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

/// Accepts the token "valid-token" only.
struct StubIdentity;

#[async_trait]
impl IdentityProvider for StubIdentity {
    async fn sign_up(&self, _request: &SignUpRequest) -> Result<AuthUser> {
        Err(ContactError::Upstream {
            status: Some(422),
            message: "signups disabled".to_string(),
        })
    }

    async fn sign_in(&self, _email: &str, _password: &str) -> Result<AuthSession> {
        Err(ContactError::Upstream {
            status: Some(400),
            message: "Invalid login credentials".to_string(),
        })
    }

    async fn get_user(&self, token: &str) -> Result<AuthUser> {
        if token == "valid-token" {
            Ok(AuthUser {
                id: "user-1".to_string(),
                email: Some("ada@example.com".to_string()),
                user_metadata: Value::Null,
                created_at: None,
            })
        } else {
            Err(ContactError::Upstream {
                status: Some(401),
                message: "invalid JWT".to_string(),
            })
        }
    }
}

fn app(upload_dir: &TempDir) -> Router {
    let limits = ImportLimits {
        upload_dir: upload_dir.path().to_path_buf(),
        max_file_bytes: 1024,
        max_rows: 100,
        timeout: Duration::from_secs(5),
    };
    router(AppState::new(
        Arc::new(InMemoryContactStore::new()),
        Arc::new(StubIdentity),
        limits,
    ))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

const BOUNDARY: &str = "contact-hub-test-boundary";

fn upload_request(field: &str, content: &str) -> Request<Body> {
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"contacts.csv\"\r\nContent-Type: text/csv\r\n\r\n{content}\r\n--{b}--\r\n",
        b = BOUNDARY,
    );
    Request::builder()
        .method("POST")
        .uri("/upload-csv")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn upload_dir_is_empty(dir: &TempDir) -> bool {
    std::fs::read_dir(dir.path()).unwrap().count() == 0
}

#[tokio::test]
async fn test_root_reports_running() {
    let dir = TempDir::new().unwrap();
    let response = app(&dir).oneshot(empty_request("GET", "/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_then_get_returns_same_fields() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    let (status, created) = send(
        &app,
        json_request(
            "POST",
            "/contact",
            json!({"name": "Ada", "email": "ada@example.com", "phone": "555-0100"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["contact"]["id"].as_str().unwrap().to_string();

    let (status, by_id) = send(&app, empty_request("GET", &format!("/contact/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_id["contact"], created["contact"]);

    let (status, by_name) = send(&app, empty_request("GET", "/contact/Ada")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_name["contact"]["email"], "ada@example.com");
    assert_eq!(by_name["contact"]["phone"], "555-0100");
}

#[tokio::test]
async fn test_create_without_name_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let (status, body) = send(
        &app(&dir),
        json_request("POST", "/contact", json!({"email": "ghost@example.com"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing required field: name");
}

#[tokio::test]
async fn test_create_with_token_stamps_owner() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    let mut request = json_request("POST", "/contact", json!({"name": "Ada"}));
    request
        .headers_mut()
        .insert(header::AUTHORIZATION, "Bearer valid-token".parse().unwrap());
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["contact"]["userId"], "user-1");

    let mut rejected = json_request("POST", "/contact", json!({"name": "Grace"}));
    rejected
        .headers_mut()
        .insert(header::AUTHORIZATION, "Bearer expired".parse().unwrap());
    let (status, _) = send(&app, rejected).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_update_and_delete_contact() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    send(&app, json_request("POST", "/contact", json!({"name": "Grace"}))).await;

    let (status, updated) = send(
        &app,
        json_request("PUT", "/contact/Grace", json!({"phone": "555-0199"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["contact"]["phone"], "555-0199");

    let (status, body) = send(&app, empty_request("DELETE", "/contact/Grace")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Contact deleted");

    for _ in 0..2 {
        let (status, body) = send(&app, empty_request("DELETE", "/contact/Grace")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("Grace"));
    }
}

#[tokio::test]
async fn test_shared_name_is_a_conflict() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    send(&app, json_request("POST", "/contact", json!({"name": "Sam", "email": "a@example.com"}))).await;
    send(&app, json_request("POST", "/contact", json!({"name": "Sam", "email": "b@example.com"}))).await;

    let (status, _) = send(&app, empty_request("GET", "/contact/Sam")).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(&app, empty_request("GET", "/contact?name=Sam")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["contacts"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_upload_csv_imports_rows_and_cleans_up() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    let csv = "name,email,phone\nAda,ada@example.com,1\n,missing@example.com,2\nGrace,grace@example.com,3";
    let (status, body) = send(&app, upload_request("file", csv)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["rowsSeen"], 3);
    assert_eq!(body["rejected"][0]["row"], 2);
    assert!(upload_dir_is_empty(&dir));

    let (_, listed) = send(&app, empty_request("GET", "/contact")).await;
    assert_eq!(listed["contacts"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let dir = TempDir::new().unwrap();
    let (status, body) = send(&app(&dir), upload_request("attachment", "name\nAda")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No file provided");
    assert_eq!(body["count"], 0);
    assert!(upload_dir_is_empty(&dir));
}

#[tokio::test]
async fn test_upload_empty_file_counts_zero() {
    let dir = TempDir::new().unwrap();
    let (status, body) = send(&app(&dir), upload_request("file", "")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
    assert!(upload_dir_is_empty(&dir));
}

#[tokio::test]
async fn test_upload_over_size_limit() {
    let dir = TempDir::new().unwrap();
    let mut csv = String::from("name\n");
    for i in 0..200 {
        csv.push_str(&format!("Contact {}\n", i));
    }

    let (status, body) = send(&app(&dir), upload_request("file", &csv)).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["count"], 0);
    assert!(upload_dir_is_empty(&dir));
}

#[tokio::test]
async fn test_profile_requires_token() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    let (status, body) = send(&app, empty_request("GET", "/profile")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "No token");

    let mut bad = empty_request("GET", "/profile");
    bad.headers_mut()
        .insert(header::AUTHORIZATION, "Bearer nope".parse().unwrap());
    let (status, body) = send(&app, bad).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "invalid JWT");

    let mut good = empty_request("GET", "/profile");
    good.headers_mut()
        .insert(header::AUTHORIZATION, "Bearer valid-token".parse().unwrap());
    let (status, body) = send(&app, good).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], "user-1");
}

#[tokio::test]
async fn test_signup_requires_credentials() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    let (status, body) = send(
        &app,
        json_request("POST", "/signup", json!({"email": "ada@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email and password required");

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/signup",
            json!({"email": "ada@example.com", "password": "secret"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "signups disabled");
}

#[tokio::test]
async fn test_malformed_json_gets_json_error() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    let request = Request::builder()
        .method("POST")
        .uri("/contact")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let no_content_type = Request::builder()
        .method("POST")
        .uri("/signin")
        .body(Body::from(r#"{"email":"ada@example.com","password":"secret"}"#))
        .unwrap();
    let (status, body) = send(&app, no_content_type).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_upload_without_multipart_body_gets_json_error() {
    let dir = TempDir::new().unwrap();
    let request = Request::builder()
        .method("POST")
        .uri("/upload-csv")
        .header(header::CONTENT_TYPE, "text/csv")
        .body(Body::from("name\nAda\n"))
        .unwrap();

    let (status, body) = send(&app(&dir), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert!(upload_dir_is_empty(&dir));
}

#[tokio::test]
async fn test_update_with_blank_email_clears_it() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    send(
        &app,
        json_request("POST", "/contact", json!({"name": "Ada", "email": "ada@example.com"})),
    )
    .await;

    let (status, body) = send(
        &app,
        json_request("PUT", "/contact/Ada", json!({"email": "  "})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["contact"]["email"].is_null());
}
