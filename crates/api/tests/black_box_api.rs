use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::{Value, json};

use tollgate_api::app::{AppState, build_app};
use tollgate_auth::{
    AuthConfig, AuthService, IdentityClaims, InMemoryDirectory, Role, RoleCode, User,
};
use tollgate_core::{RoleId, UserId};

const SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        let directory = InMemoryDirectory::with_default_roles();
        directory
            .register("admin@example.com", "Admin", "admin-pass", &RoleCode::ADMIN)
            .expect("seed admin");
        directory
            .register("alice@example.com", "Alice", "alice-pass", &RoleCode::CUSTOMER)
            .expect("seed customer");

        let auth = Arc::new(AuthService::new(&AuthConfig::new(SECRET)));
        let app = build_app(AppState::new(auth, Arc::new(directory)));

        // Same router as prod, bound to an ephemeral port.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn login(client: &reqwest::Client, srv: &TestServer, email: &str, password: &str) -> String {
    let res = client
        .post(srv.url("/auth/login"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    body["token"].as_str().unwrap().to_string()
}

async fn query(
    client: &reqwest::Client,
    srv: &TestServer,
    token: Option<&str>,
    operation: &str,
    variables: Value,
) -> Value {
    let mut req = client
        .post(srv.url("/query"))
        .json(&json!({ "operation": operation, "variables": variables }));
    if let Some(token) = token {
        req = req.bearer_auth(token);
    }
    let res = req.send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json().await.unwrap()
}

fn mint_jwt(algorithm: Algorithm, secret: &str) -> String {
    let user = User::with_password_hash(
        UserId::new(1),
        "admin@example.com",
        "Admin",
        "",
        Role::new(RoleId::new(1), "Administrator", RoleCode::ADMIN),
    );
    let claims = IdentityClaims::for_user(&user, Utc::now(), ChronoDuration::minutes(10));

    jsonwebtoken::encode(
        &Header::new(algorithm),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn hard_fail_routes_reject_missing_credentials() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.get(srv.url("/users/profile")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "unauthorized");
    assert_eq!(body["message"], "invalid or missing credentials");
}

#[tokio::test]
async fn basic_scheme_is_treated_like_a_missing_header() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(srv.url("/users/profile"))
        .header("Authorization", "Basic abc")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(srv.url("/whoami"))
        .header("Authorization", "Basic abc")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "authenticated": false }));
}

#[tokio::test]
async fn soft_fail_endpoint_continues_anonymously() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let body = query(&client, &srv, None, "viewer", Value::Null).await;
    assert_eq!(body["data"], json!({ "authenticated": false }));

    let body = query(&client, &srv, Some("not-a-token"), "viewer", Value::Null).await;
    assert_eq!(body["data"], json!({ "authenticated": false }));
}

#[tokio::test]
async fn login_then_profile() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = login(&client, &srv, "Alice@Example.com", "alice-pass").await;

    let res = client
        .get(srv.url("/users/profile"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["email"], "alice@example.com");
    assert_eq!(body["role"]["code"], "CUSTOMER");
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn wrong_password_is_invalid_credentials() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/auth/login"))
        .json(&json!({ "email": "alice@example.com", "password": "nope" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_credentials");
}

#[tokio::test]
async fn logout_revokes_the_token() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = login(&client, &srv, "alice@example.com", "alice-pass").await;

    let res = client
        .post(srv.url("/auth/logout"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(srv.url("/users/profile"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // The revoked token degrades to anonymous on the soft-fail chain.
    let body = query(&client, &srv, Some(&token), "viewer", Value::Null).await;
    assert_eq!(body["data"]["authenticated"], false);
}

#[tokio::test]
async fn admin_routes_require_the_admin_role() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let customer = login(&client, &srv, "alice@example.com", "alice-pass").await;
    let admin = login(&client, &srv, "admin@example.com", "admin-pass").await;

    let res = client
        .get(srv.url("/admin/users/2"))
        .bearer_auth(&customer)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client.get(srv.url("/admin/users/2")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(srv.url("/admin/users/2"))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["email"], "alice@example.com");

    let res = client
        .get(srv.url("/admin/users?page=1&page_size=1"))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["total_pages"], 2);
}

#[tokio::test]
async fn query_errors_distinguish_unauthenticated_from_forbidden() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let customer = login(&client, &srv, "alice@example.com", "alice-pass").await;

    let body = query(&client, &srv, None, "users", Value::Null).await;
    assert_eq!(body["data"], Value::Null);
    assert_eq!(body["errors"][0]["code"], "NOT_AUTHENTICATED");

    let body = query(&client, &srv, Some(&customer), "users", Value::Null).await;
    assert_eq!(body["data"], Value::Null);
    assert_eq!(body["errors"][0]["code"], "FORBIDDEN");

    let body = query(&client, &srv, Some(&customer), "me", Value::Null).await;
    assert_eq!(body["data"]["email"], "alice@example.com");
}

#[tokio::test]
async fn tokens_signed_with_another_algorithm_are_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let hs256 = mint_jwt(Algorithm::HS256, SECRET);
    let res = client
        .get(srv.url("/users/profile"))
        .bearer_auth(&hs256)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let hs512 = mint_jwt(Algorithm::HS512, SECRET);
    let res = client
        .get(srv.url("/users/profile"))
        .bearer_auth(&hs512)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let forged = mint_jwt(Algorithm::HS256, "some-other-secret");
    let res = client
        .get(srv.url("/users/profile"))
        .bearer_auth(&forged)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_creates_a_customer_that_can_log_in() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/auth/register"))
        .json(&json!({ "email": "bob@example.com", "password": "bob-pass", "full_name": "Bob" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["role"]["code"], "CUSTOMER");

    let res = client
        .post(srv.url("/auth/register"))
        .json(&json!({ "email": "bob@example.com", "password": "bob-pass", "full_name": "Bob" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    login(&client, &srv, "bob@example.com", "bob-pass").await;
}
