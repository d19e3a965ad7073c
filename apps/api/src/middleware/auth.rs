//! # 認証ミドルウェア（Bearer トークン）
//!
//! `Authorization: Bearer <JWT>` を検証し、通過したリクエストだけをハンドラに渡す。
//!
//! ## 状態遷移
//!
//! ```text
//! unauthenticated ──(署名・iss・aud・exp がすべて有効)──▶ authenticated → ハンドラ
//!        │
//!        └──(いずれかが無効、またはヘッダーなし)──▶ rejected → 401
//! ```
//!
//! ハンドラはユーザー単位の処理を持たないため、検証済みのクレームは下流に渡さない。
//!
//! ## 使い方
//!
//! ```rust,ignore
//! use axum::middleware::from_fn_with_state;
//!
//! let auth_state = AuthState::new(JwtVerifier::new(&config.jwt));
//!
//! Router::new()
//!     .route("/api/todoitems", get(list_todo_items))
//!     .route_layer(from_fn_with_state(auth_state, require_bearer_token))
//! ```

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{config::JwtConfig, error::ApiError};

/// 検証済みトークンのクレーム
///
/// `aud` の照合は [`JwtVerifier`] が行うため、ここでは保持しない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub exp: u64,
}

/// 認証の失敗理由
///
/// クライアントにはすべて 401 として返し、理由はログにのみ出力する。
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authorization ヘッダーがありません")]
    MissingHeader,

    #[error("Authorization ヘッダーが Bearer 形式ではありません")]
    InvalidScheme,

    #[error("トークンの有効期限が切れています")]
    Expired,

    #[error("トークンが不正です: {0}")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        if matches!(err.kind(), ErrorKind::ExpiredSignature) {
            AuthError::Expired
        } else {
            AuthError::InvalidToken(err)
        }
    }
}

/// HS256 の JWT 検証器
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation:   Validation,
}

impl JwtVerifier {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);

        Self {
            decoding_key: DecodingKey::from_secret(config.signing_key.as_bytes()),
            validation,
        }
    }

    /// トークンの署名・発行者・対象者・有効期限を検証する
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }
}

/// 認証ミドルウェアの状態
#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<JwtVerifier>,
}

impl AuthState {
    pub fn new(verifier: JwtVerifier) -> Self {
        Self {
            verifier: Arc::new(verifier),
        }
    }
}

/// `Authorization` ヘッダーから Bearer トークンを取り出す
///
/// スキーム名の大文字・小文字は区別しない。
fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidScheme)?;

    match value.split_once(' ') {
        Some((scheme, token))
            if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() =>
        {
            Ok(token.trim())
        }
        _ => Err(AuthError::InvalidScheme),
    }
}

/// 認証ミドルウェア
///
/// トークンが無効な場合は 401 Unauthorized を返す。
pub async fn require_bearer_token(
    State(state): State<AuthState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if let Err(e) = bearer_token(request.headers()).and_then(|t| state.verifier.verify(t)) {
        tracing::debug!(reason = %e, "認証に失敗しました");
        return ApiError::Unauthorized("有効な Bearer トークンが必要です".to_string())
            .into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        http::{Method, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
    };
    use chrono::Utc;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use rstest::rstest;
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;

    const ISSUER: &str = "https://issuer.example.com";
    const AUDIENCE: &str = "tasuku";
    const SIGNING_KEY: &str = "test-signing-key";

    fn jwt_config() -> JwtConfig {
        JwtConfig {
            issuer:      ISSUER.to_string(),
            audience:    AUDIENCE.to_string(),
            signing_key: SIGNING_KEY.to_string(),
        }
    }

    fn mint(iss: &str, aud: &str, exp_offset_secs: i64, key: &str) -> String {
        let claims = json!({
            "sub": "user-1",
            "iss": iss,
            "aud": aud,
            "exp": Utc::now().timestamp() + exp_offset_secs,
        });
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(key.as_bytes()),
        )
        .unwrap()
    }

    /// テスト用のダミーハンドラ
    async fn protected() -> &'static str {
        "reached"
    }

    fn test_app() -> Router {
        let auth_state = AuthState::new(JwtVerifier::new(&jwt_config()));
        Router::new()
            .route("/protected", get(protected))
            .route_layer(from_fn_with_state(auth_state, require_bearer_token))
    }

    async fn send(authorization: Option<String>) -> Response {
        let mut builder = Request::builder().method(Method::GET).uri("/protected");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        test_app()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_有効なトークンでハンドラに到達する() {
        let token = mint(ISSUER, AUDIENCE, 3600, SIGNING_KEY);

        let response = send(Some(format!("Bearer {token}"))).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"reached");
    }

    #[tokio::test]
    async fn test_スキーム名は大文字小文字を区別しない() {
        let token = mint(ISSUER, AUDIENCE, 3600, SIGNING_KEY);

        let response = send(Some(format!("bearer {token}"))).await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ヘッダーがなければ401とwww_authenticateを返す() {
        let response = send(None).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[rstest]
    #[case::別の発行者("https://evil.example.com", AUDIENCE, 3600, SIGNING_KEY)]
    #[case::別の対象者(ISSUER, "someone-else", 3600, SIGNING_KEY)]
    #[case::期限切れ(ISSUER, AUDIENCE, -3600, SIGNING_KEY)]
    #[case::別の鍵で署名(ISSUER, AUDIENCE, 3600, "another-key")]
    #[tokio::test]
    async fn test_不正なトークンは401になる(
        #[case] iss: &str,
        #[case] aud: &str,
        #[case] exp_offset_secs: i64,
        #[case] key: &str,
    ) {
        let token = mint(iss, aud, exp_offset_secs, key);

        let response = send(Some(format!("Bearer {token}"))).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[case("Basic dXNlcjpwYXNz")]
    #[case("Bearer")]
    #[case("Token abc.def.ghi")]
    #[case("not-a-jwt")]
    #[tokio::test]
    async fn test_bearer形式でないヘッダーは401になる(#[case] value: &str) {
        let response = send(Some(value.to_string())).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_検証に成功するとissとexpを返す() {
        let verifier = JwtVerifier::new(&jwt_config());
        let token = mint(ISSUER, AUDIENCE, 3600, SIGNING_KEY);

        let claims = verifier.verify(&token).unwrap();

        assert_eq!(claims.iss, ISSUER);
        assert!(claims.exp > Utc::now().timestamp() as u64);
    }

    #[test]
    fn test_期限切れはexpiredに分類される() {
        let verifier = JwtVerifier::new(&jwt_config());
        let token = mint(ISSUER, AUDIENCE, -3600, SIGNING_KEY);

        let result = verifier.verify(&token);

        assert!(matches!(result, Err(AuthError::Expired)));
    }
}
