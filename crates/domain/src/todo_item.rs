//! # Todo アイテム
//!
//! 管理対象となる唯一のリソース。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`TodoItem`] | Todo アイテム | 現在の状態。ID はストアが採番し、以後変わらない |
//! | [`TodoTitle`] | タイトル | 5 文字以上の文字列 |
//! | [`TodoItemAudit`] | 履歴（監査）エントリ | ある版が有効だった期間と、その時点の内容 |
//! | [`TodoItemInput`] | 入力 | 作成・更新リクエストのペイロード（永続化されない） |
//!
//! ## 不変条件
//!
//! - `id` は現在の行を高々 1 つだけ識別する
//! - 保存済みの行の `title` は空にならない（[`TodoTitle`] で保証）
//! - `created_on` は作成時に一度だけ設定され、更新で変わらない

mod input;

use chrono::{DateTime, Utc};
use derive_more::Display;
pub use input::{FieldErrors, TodoItemInput, ValidTodoItemInput};

use crate::DomainError;

/// タイトルの最小文字数
pub const TITLE_MIN_LENGTH: usize = 5;

/// Todo アイテム ID
///
/// ストアの連番（`SERIAL`）で採番される。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display("{_0}")]
pub struct TodoItemId(i32);

impl TodoItemId {
    pub fn new(value: i32) -> Self {
        Self(value)
    }

    pub fn as_i32(&self) -> i32 {
        self.0
    }
}

/// Todo アイテムのタイトル（値オブジェクト）
///
/// 文字数は Unicode スカラー値単位で数える。
/// 生成経路は [`TodoTitle::new`] だけに限定する。
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{_0}")]
pub struct TodoTitle(String);

impl TodoTitle {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();

        if value.chars().count() < TITLE_MIN_LENGTH {
            return Err(DomainError::Validation(format!(
                "Title must be longer then {TITLE_MIN_LENGTH}."
            )));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 未保存の Todo アイテム
///
/// ID はストアが採番するため持たない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodoItem {
    pub title:        TodoTitle,
    pub is_completed: bool,
    pub created_on:   DateTime<Utc>,
}

impl NewTodoItem {
    /// 検証済み入力と作成日時から未保存のアイテムを組み立てる
    ///
    /// `created_on` はサーバー側の時刻であり、クライアントからは受け付けない。
    pub fn from_input(input: ValidTodoItemInput, created_on: DateTime<Utc>) -> Self {
        Self {
            title: input.title,
            is_completed: input.is_completed,
            created_on,
        }
    }
}

/// Todo アイテムエンティティ（現在の状態）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItem {
    id:           TodoItemId,
    title:        TodoTitle,
    is_completed: bool,
    created_on:   DateTime<Utc>,
}

impl TodoItem {
    /// 既存のデータからアイテムを復元する（データベースから取得時）
    pub fn from_db(
        id: TodoItemId,
        title: TodoTitle,
        is_completed: bool,
        created_on: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            is_completed,
            created_on,
        }
    }

    /// `title` と `is_completed` だけを置き換えた新しいインスタンスを返す
    ///
    /// `id` と `created_on` は変わらない。
    pub fn with_changes(self, input: ValidTodoItemInput) -> Self {
        Self {
            title: input.title,
            is_completed: input.is_completed,
            ..self
        }
    }

    pub fn id(&self) -> TodoItemId {
        self.id
    }

    pub fn title(&self) -> &TodoTitle {
        &self.title
    }

    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    pub fn created_on(&self) -> DateTime<Utc> {
        self.created_on
    }
}

/// Todo アイテムの履歴エントリ
///
/// ある版の内容と、その版が有効だった期間 `[period_start, period_end)` を表す。
/// `period_end` が `None` の版は現在も有効（終端が開いている）。
///
/// ストアが変更のたびに自動で記録する読み取り専用の射影であり、
/// アプリケーションから直接書き込むことはない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItemAudit {
    pub id:           TodoItemId,
    pub title:        String,
    pub is_completed: bool,
    pub period_start: DateTime<Utc>,
    pub period_end:   Option<DateTime<Utc>>,
}

impl TodoItemAudit {
    /// 現在も有効な版かどうか
    pub fn is_current(&self) -> bool {
        self.period_end.is_none()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn created_on() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn valid_input(title: &str, is_completed: bool) -> ValidTodoItemInput {
        ValidTodoItemInput {
            title: TodoTitle::new(title).unwrap(),
            is_completed,
        }
    }

    #[rstest]
    #[case("Buy milk")]
    #[case("abcde")]
    #[case("牛乳を買う")]
    fn test_todo_titleは5文字以上を受け付ける(#[case] title: &str) {
        let result = TodoTitle::new(title);

        assert_eq!(result.unwrap().as_str(), title);
    }

    #[rstest]
    #[case("")]
    #[case("abcd")]
    #[case("牛乳買う")]
    fn test_todo_titleは5文字未満を拒否する(#[case] title: &str) {
        let result = TodoTitle::new(title);

        assert_eq!(
            result,
            Err(DomainError::Validation(
                "Title must be longer then 5.".to_string()
            ))
        );
    }

    #[test]
    fn test_new_todo_itemは入力と作成日時を引き継ぐ() {
        let sut = NewTodoItem::from_input(valid_input("Buy milk", false), created_on());

        assert_eq!(sut.title.as_str(), "Buy milk");
        assert!(!sut.is_completed);
        assert_eq!(sut.created_on, created_on());
    }

    #[test]
    fn test_with_changesはtitleとis_completedだけを変更する() {
        let item = TodoItem::from_db(
            TodoItemId::new(1),
            TodoTitle::new("Buy milk").unwrap(),
            false,
            created_on(),
        );

        let sut = item.with_changes(valid_input("Buy oat milk", true));

        assert_eq!(sut.id(), TodoItemId::new(1));
        assert_eq!(sut.title().as_str(), "Buy oat milk");
        assert!(sut.is_completed());
        assert_eq!(sut.created_on(), created_on());
    }

    #[test]
    fn test_period_endがない履歴は現在の版() {
        let audit = TodoItemAudit {
            id:           TodoItemId::new(1),
            title:        "Buy milk".to_string(),
            is_completed: false,
            period_start: created_on(),
            period_end:   None,
        };

        assert!(audit.is_current());
    }
}
