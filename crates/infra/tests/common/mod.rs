//! テスト共通フィクスチャ
//!
//! DB を使用する統合テストで共通利用するエンティティ生成ヘルパー。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使用しない関数に dead_code 警告が出る。モジュール全体で抑制する。
#![allow(dead_code)]

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tasuku_domain::todo_item::{NewTodoItem, TodoItem, TodoItemInput, TodoTitle};
use tasuku_infra::repository::{PostgresTodoItemRepository, TodoItemRepository};

/// テスト用の固定作成日時
pub fn test_created_on() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

/// 未保存のアイテムを組み立てる
pub fn new_item(title: &str) -> NewTodoItem {
    NewTodoItem {
        title:        TodoTitle::new(title).unwrap(),
        is_completed: false,
        created_on:   test_created_on(),
    }
}

/// アイテムを 1 件挿入して返す
pub async fn insert_item(pool: &PgPool, title: &str) -> TodoItem {
    PostgresTodoItemRepository::new(pool.clone())
        .insert(&new_item(title))
        .await
        .expect("アイテム作成に失敗")
}

/// `title` と `is_completed` を差し替えたアイテムを返す
pub fn changed(item: TodoItem, title: &str, is_completed: bool) -> TodoItem {
    let input = TodoItemInput {
        title: Some(title.to_string()),
        is_completed,
    }
    .validated()
    .unwrap();
    item.with_changes(input)
}

/// DB 側の現在時刻
///
/// 履歴の期間は DB の `now()` で記録されるため、as of の基準にはこちらを使う。
pub async fn db_now(pool: &PgPool) -> DateTime<Utc> {
    sqlx::query_scalar::<_, DateTime<Utc>>("SELECT clock_timestamp()")
        .fetch_one(pool)
        .await
        .expect("現在時刻の取得に失敗")
}
