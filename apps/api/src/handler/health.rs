//! # ヘルスチェックハンドラ
//!
//! 依存先（データベース）の到達性を確認するエンドポイント。
//!
//! ```text
//! GET /api/health
//! ```
//!
//! 全チェック OK → 200、1 つでも失敗 → 503。どちらの場合もレポートを返す。
//!
//! ```json
//! {
//!   "status": "Healthy",
//!   "version": "0.1.0",
//!   "checks": { "database": "ok" }
//! }
//! ```

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::usecase::HealthReporter;

/// ヘルスチェック用の State
pub struct HealthState {
    pub reporter: HealthReporter,
}

/// ヘルスチェックエンドポイント
#[tracing::instrument(skip_all)]
pub async fn health_check(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    let report = state.reporter.report().await;

    let http_status = if report.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (http_status, Json(report))
}
