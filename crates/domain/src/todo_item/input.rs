//! # Todo アイテム入力の検証
//!
//! 作成・更新リクエストのペイロードを、ストアに渡す前に検証する。
//! 検証は純粋関数であり I/O を行わない。
//!
//! ## ルール
//!
//! | フィールド | ルール | メッセージ |
//! |-----------|--------|-----------|
//! | `title` | 必須 | `Title is required` |
//! | `title` | 5 文字以上 | `Title must be longer then 5.` |
//!
//! `title` が欠落している場合は必須エラーのみを返す（文字数チェックは行わない）。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::TodoTitle;

/// フィールド名 → エラーメッセージ一覧
///
/// キーは JSON 上のフィールド名。
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// 作成・更新リクエストのペイロード
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TodoItemInput {
    #[validate(
        required(message = "Title is required"),
        length(min = 5, message = "Title must be longer then 5.")
    )]
    pub title:        Option<String>,
    #[serde(default)]
    pub is_completed: bool,
}

/// 検証済みの入力
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidTodoItemInput {
    pub title:        TodoTitle,
    pub is_completed: bool,
}

impl TodoItemInput {
    /// 入力を検証し、検証済みの値に変換する
    ///
    /// 失敗時はフィールドごとのエラーメッセージを返す。
    pub fn validated(self) -> Result<ValidTodoItemInput, FieldErrors> {
        if let Err(errors) = self.validate() {
            return Err(to_field_errors(&errors));
        }

        // validate() が通っていれば title は Some かつ 5 文字以上
        let title = self
            .title
            .ok_or_else(required_error)
            .and_then(|title| {
                TodoTitle::new(title).map_err(|e| {
                    FieldErrors::from([("title".to_string(), vec![e.to_string()])])
                })
            })?;

        Ok(ValidTodoItemInput {
            title,
            is_completed: self.is_completed,
        })
    }
}

fn required_error() -> FieldErrors {
    FieldErrors::from([("title".to_string(), vec!["Title is required".to_string()])])
}

fn to_field_errors(errors: &validator::ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let messages = errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map_or_else(|| e.code.to_string(), ToString::to_string)
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}
