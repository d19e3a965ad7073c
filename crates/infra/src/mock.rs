//! # テスト用モックリポジトリ
//!
//! ユースケース・ハンドラのテストで使用するインメモリモックリポジトリ。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! tasuku-infra = { workspace = true, features = ["test-utils"] }
//! ```
//!
//! PostgreSQL のトリガーと同じ規則で履歴を記録するため、
//! 履歴エンドポイントのテストにも使える。

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tasuku_domain::{
    clock::Clock,
    todo_item::{NewTodoItem, TodoItem, TodoItemAudit, TodoItemId},
};

use crate::{error::InfraError, repository::TodoItemRepository};

// ===== MockTodoItemRepository =====

#[derive(Debug, Clone)]
struct StoredItem {
    item:         TodoItem,
    period_start: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct State {
    next_id: i32,
    items:   Vec<StoredItem>,
    history: Vec<TodoItemAudit>,
}

/// インメモリの TodoItemRepository
///
/// 版の期間は注入された [`Clock`] の時刻で区切る。
#[derive(Clone)]
pub struct MockTodoItemRepository {
    state: Arc<Mutex<State>>,
    clock: Arc<dyn Clock>,
}

impl MockTodoItemRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                next_id: 1,
                ..State::default()
            })),
            clock,
        }
    }

    /// 保存済みの現在のアイテム数
    pub fn len(&self) -> usize {
        self.state.lock().unwrap().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn close(stored: &StoredItem, period_end: DateTime<Utc>) -> TodoItemAudit {
    TodoItemAudit {
        id:           stored.item.id(),
        title:        stored.item.title().as_str().to_string(),
        is_completed: stored.item.is_completed(),
        period_start: stored.period_start,
        period_end:   Some(period_end),
    }
}

#[async_trait]
impl TodoItemRepository for MockTodoItemRepository {
    async fn find_all(&self) -> Result<Vec<TodoItem>, InfraError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .items
            .iter()
            .map(|s| s.item.clone())
            .collect())
    }

    async fn find_by_id(&self, id: TodoItemId) -> Result<Option<TodoItem>, InfraError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .items
            .iter()
            .find(|s| s.item.id() == id)
            .map(|s| s.item.clone()))
    }

    async fn insert(&self, item: &NewTodoItem) -> Result<TodoItem, InfraError> {
        let now = self.clock.now();
        let mut state = self.state.lock().unwrap();

        let id = TodoItemId::new(state.next_id);
        state.next_id += 1;

        let created = TodoItem::from_db(id, item.title.clone(), item.is_completed, item.created_on);
        state.items.push(StoredItem {
            item:         created.clone(),
            period_start: now,
        });
        Ok(created)
    }

    async fn update(&self, item: &TodoItem) -> Result<bool, InfraError> {
        let now = self.clock.now();
        let mut state = self.state.lock().unwrap();

        let Some(index) = state.items.iter().position(|s| s.item.id() == item.id()) else {
            return Ok(false);
        };

        let closed = close(&state.items[index], now);
        state.history.push(closed);

        // created_on は保存済みの値を維持する
        let created_on = state.items[index].item.created_on();
        state.items[index] = StoredItem {
            item:         TodoItem::from_db(
                item.id(),
                item.title().clone(),
                item.is_completed(),
                created_on,
            ),
            period_start: now,
        };
        Ok(true)
    }

    async fn delete(&self, id: TodoItemId) -> Result<bool, InfraError> {
        let now = self.clock.now();
        let mut state = self.state.lock().unwrap();

        let Some(index) = state.items.iter().position(|s| s.item.id() == id) else {
            return Ok(false);
        };

        let removed = state.items.remove(index);
        state.history.push(close(&removed, now));
        Ok(true)
    }

    async fn find_history_as_of(
        &self,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<Vec<TodoItemAudit>, InfraError> {
        let as_of = as_of.unwrap_or_else(|| self.clock.now());
        let state = self.state.lock().unwrap();

        let current = state.items.iter().map(|s| TodoItemAudit {
            id:           s.item.id(),
            title:        s.item.title().as_str().to_string(),
            is_completed: s.item.is_completed(),
            period_start: s.period_start,
            period_end:   None,
        });

        let mut versions: Vec<TodoItemAudit> = state
            .history
            .iter()
            .cloned()
            .chain(current)
            .filter(|v| v.period_start <= as_of)
            .collect();

        versions.sort_by(|a, b| {
            a.period_start
                .cmp(&b.period_start)
                .then(a.id.cmp(&b.id))
                .then(match (a.period_end, b.period_end) {
                    (Some(x), Some(y)) => x.cmp(&y),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                })
        });
        Ok(versions)
    }
}
