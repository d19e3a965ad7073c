//! # API エラーハンドリング
//!
//! HTTP API のエラー定義と、axum レスポンスへの変換を行う。
//!
//! ## 設計方針
//!
//! - **RFC 9457 準拠**: レスポンスボディは `tasuku_shared::ErrorResponse`（Problem Details）
//! - **ハンドラ境界で回復**: どのエラーもプロセスを止めず、HTTP ステータスに変換する
//! - **内部情報を返さない**: データベースエラーの詳細はログにのみ出力する
//!
//! ## マッピング
//!
//! | ApiError | HTTP Status |
//! |----------|-------------|
//! | NotFound | 404 |
//! | Validation | 400（フィールドごとのメッセージ付き） |
//! | BadRequest | 400 |
//! | Unauthorized | 401（`WWW-Authenticate: Bearer` 付き） |
//! | Database | 500 |

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tasuku_domain::todo_item::FieldErrors;
use tasuku_infra::InfraError;
use tasuku_shared::{ErrorResponse, ValidationErrorResponse};
use thiserror::Error;

/// API 層で発生するエラー
#[derive(Debug, Error)]
pub enum ApiError {
    /// リソースが見つからない
    #[error("リソースが見つかりません: {0}")]
    NotFound(String),

    /// 入力検証エラー
    #[error("バリデーションエラー: {0:?}")]
    Validation(FieldErrors),

    /// リクエストを解釈できない（JSON の構文エラー、数値でない ID など）
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),

    /// 認証エラー
    #[error("認証エラー: {0}")]
    Unauthorized(String),

    /// データベースエラー
    #[error("データベースエラー: {0}")]
    Database(#[from] InfraError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(detail) => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::not_found(detail)),
            )
                .into_response(),
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(ValidationErrorResponse::new(errors)),
            )
                .into_response(),
            ApiError::BadRequest(detail) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request(detail)),
            )
                .into_response(),
            ApiError::Unauthorized(detail) => (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, "Bearer")],
                Json(ErrorResponse::unauthorized(detail)),
            )
                .into_response(),
            ApiError::Database(e) => {
                tracing::error!(
                    error = %e,
                    span_trace = %e.span_trace(),
                    "データベースエラー"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::internal_error()),
                )
                    .into_response()
            }
        }
    }
}
