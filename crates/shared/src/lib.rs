//! # Tasuku 共有ユーティリティ
//!
//! API サーバーとインフラ層の双方から使われる、ビジネスロジックを含まない型を提供する。
//!
//! ## 設計方針
//!
//! - axum に依存しない（`IntoResponse` 変換はアプリ側の責務）
//! - トレーシング関連の依存は `observability` feature の背後に置く

pub mod error_response;
pub mod health;
pub mod observability;

pub use error_response::{ErrorResponse, ValidationErrorResponse};
pub use health::{CheckStatus, HealthReport, HealthStatus};
