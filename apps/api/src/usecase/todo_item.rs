//! Todo アイテム管理ユースケース

use std::sync::Arc;

use tasuku_domain::{
    clock::Clock,
    todo_item::{NewTodoItem, TodoItem, TodoItemAudit, TodoItemId, TodoItemInput},
};
use tasuku_infra::repository::TodoItemRepository;

use crate::error::ApiError;

/// Todo アイテム管理ユースケース
pub struct TodoItemUseCaseImpl {
    repository: Arc<dyn TodoItemRepository>,
    clock:      Arc<dyn Clock>,
}

fn not_found(id: TodoItemId) -> ApiError {
    ApiError::NotFound(format!("ID {id} の Todo アイテムが見つかりません"))
}

impl TodoItemUseCaseImpl {
    pub fn new(repository: Arc<dyn TodoItemRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// 現在のアイテムをすべて取得する
    pub async fn list(&self) -> Result<Vec<TodoItem>, ApiError> {
        Ok(self.repository.find_all().await?)
    }

    /// ID でアイテムを取得する
    pub async fn get(&self, id: TodoItemId) -> Result<TodoItem, ApiError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// アイテムを作成する
    ///
    /// `created_on` はサーバーの現在時刻で設定する。
    pub async fn create(&self, input: TodoItemInput) -> Result<TodoItem, ApiError> {
        let valid = input.validated().map_err(ApiError::Validation)?;
        let item = NewTodoItem::from_input(valid, self.clock.now());

        Ok(self.repository.insert(&item).await?)
    }

    /// アイテムの `title` と `is_completed` を上書きする
    ///
    /// 1. 入力検証（400）
    /// 2. 存在確認（404）
    /// 3. 上書き。確認後に削除されていた場合も 404
    pub async fn update(&self, id: TodoItemId, input: TodoItemInput) -> Result<(), ApiError> {
        let valid = input.validated().map_err(ApiError::Validation)?;
        let current = self.get(id).await?;

        if self.repository.update(&current.with_changes(valid)).await? {
            Ok(())
        } else {
            Err(not_found(id))
        }
    }

    /// アイテムを削除する
    pub async fn delete(&self, id: TodoItemId) -> Result<(), ApiError> {
        if self.repository.delete(id).await? {
            Ok(())
        } else {
            Err(not_found(id))
        }
    }

    /// 現在時点の履歴を `period_start` 昇順で取得する
    ///
    /// 期間はリポジトリ側の時計で記録されるため、基準時刻もリポジトリに任せる。
    /// アプリと DB の時計がずれていても、直前の変更が履歴から漏れない。
    pub async fn history(&self) -> Result<Vec<TodoItemAudit>, ApiError> {
        Ok(self.repository.find_history_as_of(None).await?)
    }
}
