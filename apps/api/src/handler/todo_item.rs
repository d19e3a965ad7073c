//! # Todo アイテムハンドラ
//!
//! ## エンドポイント
//!
//! - `GET /api/todoitems` - 現在のアイテム一覧
//! - `GET /api/todoitems/{id}` - アイテム取得
//! - `POST /api/todoitems` - アイテム作成
//! - `PUT /api/todoitems/{id}` - アイテム更新（title / isCompleted）
//! - `DELETE /api/todoitems/{id}` - アイテム削除（ボディは無視）
//! - `GET /api/todoitems/history` - 現在時刻時点の履歴

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path,
        State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tasuku_domain::todo_item::{TodoItem, TodoItemAudit, TodoItemId, TodoItemInput};

use crate::{error::ApiError, usecase::TodoItemUseCaseImpl};

/// Todo アイテム API の共有状態
pub struct TodoItemState {
    pub usecase: TodoItemUseCaseImpl,
}

// --- リクエスト/レスポンス型 ---

/// Todo アイテム DTO
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TodoItemDto {
    pub id:           i32,
    pub title:        String,
    pub is_completed: bool,
    pub created_on:   String,
}

impl From<&TodoItem> for TodoItemDto {
    fn from(item: &TodoItem) -> Self {
        Self {
            id:           item.id().as_i32(),
            title:        item.title().as_str().to_string(),
            is_completed: item.is_completed(),
            created_on:   item.created_on().to_rfc3339(),
        }
    }
}

/// 履歴エントリ DTO
///
/// 現在も有効な版は `periodEnd` が `null` になる。
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TodoItemAuditDto {
    pub id:           i32,
    pub title:        String,
    pub is_completed: bool,
    pub period_start: String,
    pub period_end:   Option<String>,
}

impl From<&TodoItemAudit> for TodoItemAuditDto {
    fn from(audit: &TodoItemAudit) -> Self {
        Self {
            id:           audit.id.as_i32(),
            title:        audit.title.clone(),
            is_completed: audit.is_completed,
            period_start: audit.period_start.to_rfc3339(),
            period_end:   audit.period_end.map(|t| t.to_rfc3339()),
        }
    }
}

fn parse_id(path: Result<Path<i32>, PathRejection>) -> Result<TodoItemId, ApiError> {
    let Path(id) = path.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    Ok(TodoItemId::new(id))
}

fn parse_body(body: Result<Json<TodoItemInput>, JsonRejection>) -> Result<TodoItemInput, ApiError> {
    let Json(input) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    Ok(input)
}

// --- ハンドラ ---

/// GET /api/todoitems
#[tracing::instrument(skip_all)]
pub async fn list_todo_items(
    State(state): State<Arc<TodoItemState>>,
) -> Result<impl IntoResponse, ApiError> {
    let items = state.usecase.list().await?;

    let dtos: Vec<TodoItemDto> = items.iter().map(TodoItemDto::from).collect();
    Ok((StatusCode::OK, Json(dtos)))
}

/// GET /api/todoitems/{id}
#[tracing::instrument(skip_all)]
pub async fn get_todo_item(
    State(state): State<Arc<TodoItemState>>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(path)?;

    let item = state.usecase.get(id).await?;

    Ok((StatusCode::OK, Json(TodoItemDto::from(&item))))
}

/// POST /api/todoitems
///
/// ## レスポンス
///
/// - `201 Created`: 作成されたアイテム。`Location` ヘッダーに取得先 URI
/// - `400 Bad Request`: バリデーションエラー
#[tracing::instrument(skip_all)]
pub async fn create_todo_item(
    State(state): State<Arc<TodoItemState>>,
    body: Result<Json<TodoItemInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let input = parse_body(body)?;

    let item = state.usecase.create(input).await?;
    tracing::info!(id = %item.id(), "Todo アイテムを作成しました");

    let location = format!("/api/todoitems/{}", item.id());
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(TodoItemDto::from(&item)),
    ))
}

/// PUT /api/todoitems/{id}
///
/// ## レスポンス
///
/// - `204 No Content`: 更新成功
/// - `400 Bad Request`: バリデーションエラー
/// - `404 Not Found`: アイテムが存在しない
#[tracing::instrument(skip_all)]
pub async fn update_todo_item(
    State(state): State<Arc<TodoItemState>>,
    path: Result<Path<i32>, PathRejection>,
    body: Result<Json<TodoItemInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(path)?;
    let input = parse_body(body)?;

    state.usecase.update(id, input).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/todoitems/{id}
///
/// リクエストボディは読まない。
#[tracing::instrument(skip_all)]
pub async fn delete_todo_item(
    State(state): State<Arc<TodoItemState>>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(path)?;

    state.usecase.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/todoitems/history
///
/// 現在時刻時点で存在したすべての版を `periodStart` 昇順で返す。
#[tracing::instrument(skip_all)]
pub async fn list_todo_item_history(
    State(state): State<Arc<TodoItemState>>,
) -> Result<impl IntoResponse, ApiError> {
    let history = state.usecase.history().await?;

    let dtos: Vec<TodoItemAuditDto> = history.iter().map(TodoItemAuditDto::from).collect();
    Ok((StatusCode::OK, Json(dtos)))
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tasuku_domain::todo_item::TodoTitle;

    use super::*;

    fn timestamp() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn test_todo_item_dtoはcamel_caseでシリアライズされる() {
        let item = TodoItem::from_db(
            TodoItemId::new(1),
            TodoTitle::new("Buy milk").unwrap(),
            false,
            timestamp(),
        );

        let value = serde_json::to_value(TodoItemDto::from(&item)).unwrap();

        assert_eq!(
            value,
            json!({
                "id": 1,
                "title": "Buy milk",
                "isCompleted": false,
                "createdOn": "2023-11-14T22:13:20+00:00",
            })
        );
    }

    #[test]
    fn test_現在の版のperiod_endはnullになる() {
        let audit = TodoItemAudit {
            id:           TodoItemId::new(1),
            title:        "Buy milk".to_string(),
            is_completed: true,
            period_start: timestamp(),
            period_end:   None,
        };

        let value = serde_json::to_value(TodoItemAuditDto::from(&audit)).unwrap();

        assert_eq!(value["periodEnd"], serde_json::Value::Null);
        assert_eq!(value["periodStart"], json!("2023-11-14T22:13:20+00:00"));
    }
}
