//! テスト共通フィクスチャ
//!
//! モックリポジトリと手動時計でルーターを組み立て、JWT を発行するヘルパー。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使用しない関数に dead_code 警告が出る。モジュール全体で抑制する。
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{Router, body::Body, response::Response};
use chrono::{DateTime, Utc};
use http::{Method, Request, header};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use tasuku_api::{
    app_builder::{AppDependencies, build_app},
    config::JwtConfig,
    middleware::auth::JwtVerifier,
    usecase::{HealthCheck, HealthReporter},
};
use tasuku_domain::clock::ManualClock;
use tasuku_infra::mock::MockTodoItemRepository;
use tasuku_shared::CheckStatus;
use tower::ServiceExt;

pub const ISSUER: &str = "https://issuer.example.com";
pub const AUDIENCE: &str = "tasuku";
pub const SIGNING_KEY: &str = "test-signing-key";

pub fn start() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

/// 固定の結果を返すヘルスチェック
pub struct StubHealthCheck(pub CheckStatus);

#[async_trait]
impl HealthCheck for StubHealthCheck {
    fn name(&self) -> &str {
        "database"
    }

    async fn check(&self) -> CheckStatus {
        self.0
    }
}

/// テスト対象のアプリケーション
pub struct TestApp {
    pub router: Router,
    pub clock:  Arc<ManualClock>,
}

pub struct TestAppBuilder {
    database:             CheckStatus,
    health_requires_auth: bool,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self {
            database:             CheckStatus::Ok,
            health_requires_auth: false,
        }
    }
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn database(mut self, status: CheckStatus) -> Self {
        self.database = status;
        self
    }

    pub fn health_requires_auth(mut self, value: bool) -> Self {
        self.health_requires_auth = value;
        self
    }

    pub fn build(self) -> TestApp {
        let clock = Arc::new(ManualClock::new(start()));
        let checks: Vec<Arc<dyn HealthCheck>> = vec![Arc::new(StubHealthCheck(self.database))];
        let jwt = JwtConfig {
            issuer:      ISSUER.to_string(),
            audience:    AUDIENCE.to_string(),
            signing_key: SIGNING_KEY.to_string(),
        };

        let router = build_app(AppDependencies {
            todo_item_repository: Arc::new(MockTodoItemRepository::new(clock.clone())),
            clock:                clock.clone(),
            health_reporter:      HealthReporter::new("0.1.0", checks),
            jwt_verifier:         JwtVerifier::new(&jwt),
            health_requires_auth: self.health_requires_auth,
        });

        TestApp { router, clock }
    }
}

/// 有効な JWT を発行する
pub fn valid_token() -> String {
    let claims = json!({
        "sub": "user-1",
        "iss": ISSUER,
        "aud": AUDIENCE,
        "exp": Utc::now().timestamp() + 3600,
    });
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SIGNING_KEY.as_bytes()),
    )
    .unwrap()
}

impl TestApp {
    /// トークン付きでリクエストを送る
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        self.send_with_token(method, uri, body, Some(valid_token()))
            .await
    }

    pub async fn send_with_token(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<String>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.router.clone().oneshot(request).await.unwrap()
    }
}

/// レスポンスボディを JSON として読む
pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
