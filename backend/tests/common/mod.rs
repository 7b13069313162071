#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use backend::{
    auth::{issue_token, TokenSettings},
    models::{AppState, NewUser, User},
    system,
};
use serde_json::Value;
use shared::{Identity, Role};
use tower::ServiceExt;

pub const SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "password123";

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        let pool = system::connect("sqlite::memory:").await.unwrap();
        system::init_db(&pool, None).await.unwrap();
        let state = Arc::new(AppState {
            pool,
            tokens: TokenSettings::with_default_ttl(SECRET),
            bcrypt_cost: 4,
        });
        Self {
            router: backend::app(state.clone()),
            state,
        }
    }

    /// Inserts an account directly and returns it with a fresh token.
    pub async fn user(&self, email: &str, role: Role) -> (Identity, String) {
        let user = User::create(
            &self.state.pool,
            NewUser {
                email: email.to_string(),
                password_hash: bcrypt::hash(PASSWORD, 4).unwrap(),
                role,
            },
        )
        .await
        .unwrap();
        let identity = user.identity().unwrap();
        let token = issue_token(&identity, &self.state.tokens, chrono::Utc::now()).unwrap();
        (identity, token)
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.raw(request).await
    }

    pub async fn raw(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }
}
