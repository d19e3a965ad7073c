//! # エラーレスポンス（RFC 9457 Problem Details）
//!
//! API が返すエラーレスポンスの構造体を提供する。
//!
//! ## 設計
//!
//! - `ErrorResponse` は純粋なデータ構造（`Serialize` / `Deserialize` のみ）
//! - よく使うエラー種別は便利コンストラクタで提供し、URI のハードコードを排除
//! - 入力検証エラーは [`ValidationErrorResponse`] でフィールドごとのメッセージを付加する

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// error_type URI のベースパス
const ERROR_TYPE_BASE: &str = "https://tasuku.example.com/errors";

/// エラーレスポンス（RFC 9457 Problem Details）
///
/// `type` フィールドは URI で問題の種類を識別する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    pub error_type: String,
    pub title:      String,
    pub status:     u16,
    pub detail:     String,
}

impl ErrorResponse {
    /// 汎用コンストラクタ
    ///
    /// `error_type_suffix` はベース URI に付加される（例: `"not-found"`）。
    pub fn new(
        error_type_suffix: &str,
        title: impl Into<String>,
        status: u16,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            error_type: format!("{ERROR_TYPE_BASE}/{error_type_suffix}"),
            title: title.into(),
            status,
            detail: detail.into(),
        }
    }

    /// 400 Bad Request
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new("bad-request", "Bad Request", 400, detail)
    }

    /// 401 Unauthorized
    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new("unauthorized", "Unauthorized", 401, detail)
    }

    /// 404 Not Found
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new("not-found", "Not Found", 404, detail)
    }

    /// 500 Internal Server Error
    ///
    /// detail は固定値（内部情報を漏らさないため）。
    pub fn internal_error() -> Self {
        Self::new(
            "internal-error",
            "Internal Server Error",
            500,
            "内部エラーが発生しました",
        )
    }
}

/// 入力検証エラーのレスポンス
///
/// Problem Details の各フィールドに加えて、`errors` にフィールド名 → メッセージ一覧を持つ。
///
/// ```json
/// {
///   "type": "https://tasuku.example.com/errors/validation-error",
///   "title": "Validation Error",
///   "status": 400,
///   "detail": "入力値が不正です",
///   "errors": { "title": ["Title is required"] }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorResponse {
    #[serde(flatten)]
    pub problem: ErrorResponse,
    pub errors:  BTreeMap<String, Vec<String>>,
}

impl ValidationErrorResponse {
    pub fn new(errors: BTreeMap<String, Vec<String>>) -> Self {
        Self {
            problem: ErrorResponse::new(
                "validation-error",
                "Validation Error",
                400,
                "入力値が不正です",
            ),
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_not_found_が404と正しいerror_typeを返す() {
        let error = ErrorResponse::not_found("TodoItem が見つかりません: 1");

        assert_eq!(
            error.error_type,
            "https://tasuku.example.com/errors/not-found"
        );
        assert_eq!(error.title, "Not Found");
        assert_eq!(error.status, 404);
        assert_eq!(error.detail, "TodoItem が見つかりません: 1");
    }

    #[test]
    fn test_全便利コンストラクタのstatusが正しい() {
        assert_eq!(ErrorResponse::bad_request("").status, 400);
        assert_eq!(ErrorResponse::unauthorized("").status, 401);
        assert_eq!(ErrorResponse::not_found("").status, 404);
        assert_eq!(ErrorResponse::internal_error().status, 500);
    }

    #[test]
    fn test_jsonシリアライズでtypeフィールド名が正しい() {
        let json = serde_json::to_value(ErrorResponse::unauthorized("トークンがありません")).unwrap();

        assert_eq!(
            json["type"],
            "https://tasuku.example.com/errors/unauthorized"
        );
        assert_eq!(json["status"], 401);
        assert!(json.get("error_type").is_none());
    }

    #[test]
    fn test_validation_error_responseはproblemをフラットに展開する() {
        let errors = BTreeMap::from([(
            "title".to_string(),
            vec!["Title is required".to_string()],
        )]);

        let json = serde_json::to_value(ValidationErrorResponse::new(errors)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "type": "https://tasuku.example.com/errors/validation-error",
                "title": "Validation Error",
                "status": 400,
                "detail": "入力値が不正です",
                "errors": { "title": ["Title is required"] }
            })
        );
    }
}
