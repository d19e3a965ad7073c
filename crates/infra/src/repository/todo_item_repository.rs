//! # TodoItemRepository
//!
//! Todo アイテムの永続化と、履歴（テンポラル）ビューの参照を担当するリポジトリ。
//!
//! ## 履歴の仕組み
//!
//! 履歴は `todo_items` のトリガーが `todo_items_history` に追記する。
//! アプリケーションは履歴テーブルに書き込まず、参照だけを行う。
//!
//! ```text
//! INSERT ──▶ todo_items.period_start = now()
//! UPDATE ──▶ 旧版を history に [period_start, now()) で退避、新版の period_start = now()
//! DELETE ──▶ 旧版を history に [period_start, now()) で退避
//! ```
//!
//! 期間は DB の時計で記録されるため、「現在時点」の履歴も DB 側の
//! `clock_timestamp()` を基準に絞り込む。
//!
//! ## 設計方針
//!
//! - **1 呼び出し = 1 SQL 文**: 各メソッドは単一の文で完結し、履歴の記録も同じ文の中で
//!   トリガーにより行われるため、呼び出し単位でアトミックになる
//! - **実行時クエリ**: `sqlx::query_as` と `FromRow` を使い、ビルド時に DB を必要としない

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tasuku_domain::todo_item::{NewTodoItem, TodoItem, TodoItemAudit, TodoItemId, TodoTitle};

use crate::error::InfraError;

/// Todo アイテムリポジトリトレイト
#[async_trait]
pub trait TodoItemRepository: Send + Sync {
    /// 現在のアイテムをすべて取得する（ID 昇順）
    async fn find_all(&self) -> Result<Vec<TodoItem>, InfraError>;

    /// ID でアイテムを検索する
    async fn find_by_id(&self, id: TodoItemId) -> Result<Option<TodoItem>, InfraError>;

    /// アイテムを挿入し、採番された ID を含むアイテムを返す
    async fn insert(&self, item: &NewTodoItem) -> Result<TodoItem, InfraError>;

    /// アイテムの `title` と `is_completed` を上書きする
    ///
    /// 対象の行が存在しなかった場合は `false` を返す。
    async fn update(&self, item: &TodoItem) -> Result<bool, InfraError>;

    /// アイテムを削除する
    ///
    /// 対象の行が存在しなかった場合は `false` を返す。
    async fn delete(&self, id: TodoItemId) -> Result<bool, InfraError>;

    /// `as_of` 時点までに存在したすべての版を `period_start` 昇順で取得する
    ///
    /// 削除済みアイテムの版も含む。現在の版は `period_end` が `None` になる。
    /// `as_of` が `None` の場合は、版の期間を記録しているストア自身の現在時刻を使う。
    async fn find_history_as_of(
        &self,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<Vec<TodoItemAudit>, InfraError>;
}

/// PostgreSQL 実装の TodoItemRepository
#[derive(Debug, Clone)]
pub struct PostgresTodoItemRepository {
    pool: PgPool,
}

impl PostgresTodoItemRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `todo_items` の行
#[derive(Debug, sqlx::FromRow)]
struct TodoItemRow {
    id:           i32,
    title:        String,
    is_completed: bool,
    created_on:   DateTime<Utc>,
}

impl TryFrom<TodoItemRow> for TodoItem {
    type Error = InfraError;

    fn try_from(row: TodoItemRow) -> Result<Self, Self::Error> {
        let title = TodoTitle::new(row.title).map_err(|e| {
            InfraError::corrupt_data(format!("todo_items.id={} の title: {e}", row.id))
        })?;

        Ok(TodoItem::from_db(
            TodoItemId::new(row.id),
            title,
            row.is_completed,
            row.created_on,
        ))
    }
}

/// 履歴ビューの行
#[derive(Debug, sqlx::FromRow)]
struct TodoItemVersionRow {
    id:           i32,
    title:        String,
    is_completed: bool,
    period_start: DateTime<Utc>,
    period_end:   Option<DateTime<Utc>>,
}

impl From<TodoItemVersionRow> for TodoItemAudit {
    fn from(row: TodoItemVersionRow) -> Self {
        Self {
            id:           TodoItemId::new(row.id),
            title:        row.title,
            is_completed: row.is_completed,
            period_start: row.period_start,
            period_end:   row.period_end,
        }
    }
}

#[async_trait]
impl TodoItemRepository for PostgresTodoItemRepository {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_all(&self) -> Result<Vec<TodoItem>, InfraError> {
        let rows = sqlx::query_as::<_, TodoItemRow>(
            r#"
            SELECT id, title, is_completed, created_on
            FROM todo_items
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TodoItem::try_from).collect()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_by_id(&self, id: TodoItemId) -> Result<Option<TodoItem>, InfraError> {
        let row = sqlx::query_as::<_, TodoItemRow>(
            r#"
            SELECT id, title, is_completed, created_on
            FROM todo_items
            WHERE id = $1
            "#,
        )
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TodoItem::try_from).transpose()
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn insert(&self, item: &NewTodoItem) -> Result<TodoItem, InfraError> {
        let row = sqlx::query_as::<_, TodoItemRow>(
            r#"
            INSERT INTO todo_items (title, is_completed, created_on)
            VALUES ($1, $2, $3)
            RETURNING id, title, is_completed, created_on
            "#,
        )
        .bind(item.title.as_str())
        .bind(item.is_completed)
        .bind(item.created_on)
        .fetch_one(&self.pool)
        .await?;

        TodoItem::try_from(row)
    }

    #[tracing::instrument(skip_all, level = "debug", fields(id = %item.id()))]
    async fn update(&self, item: &TodoItem) -> Result<bool, InfraError> {
        let result = sqlx::query(
            r#"
            UPDATE todo_items
            SET title = $2, is_completed = $3
            WHERE id = $1
            "#,
        )
        .bind(item.id().as_i32())
        .bind(item.title().as_str())
        .bind(item.is_completed())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn delete(&self, id: TodoItemId) -> Result<bool, InfraError> {
        let result = sqlx::query(
            r#"
            DELETE FROM todo_items
            WHERE id = $1
            "#,
        )
        .bind(id.as_i32())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip_all, level = "debug", fields(?as_of))]
    async fn find_history_as_of(
        &self,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<Vec<TodoItemAudit>, InfraError> {
        let rows = sqlx::query_as::<_, TodoItemVersionRow>(
            r#"
            SELECT id, title, is_completed, period_start, period_end
            FROM (
                SELECT id, title, is_completed, period_start, period_end
                FROM todo_items_history
                UNION ALL
                SELECT id, title, is_completed, period_start, NULL::timestamptz AS period_end
                FROM todo_items
            ) AS versions
            WHERE period_start <= COALESCE($1::timestamptz, clock_timestamp())
            ORDER BY period_start, id, period_end NULLS LAST
            "#,
        )
        .bind(as_of)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(TodoItemAudit::from).collect())
    }
}
