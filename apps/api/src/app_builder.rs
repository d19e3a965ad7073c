//! # アプリケーション構築
//!
//! State の初期化とルーター構築を担当する。
//! `main.rs` はインフラ初期化とサーバー起動に集中する。
//!
//! ## リクエストの流れ
//!
//! ```text
//! SetRequestId → TraceLayer → PropagateRequestId → 認証 → ハンドラ
//! ```

use std::sync::Arc;

use axum::{Router, middleware::from_fn_with_state, routing::get};
use tasuku_domain::clock::Clock;
use tasuku_infra::repository::TodoItemRepository;
use tasuku_shared::observability::{MakeRequestUuidV7, make_request_span};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    handler::{
        HealthState,
        TodoItemState,
        create_todo_item,
        delete_todo_item,
        get_todo_item,
        health_check,
        list_todo_item_history,
        list_todo_items,
        update_todo_item,
    },
    middleware::{AuthState, auth::JwtVerifier, require_bearer_token},
    usecase::{HealthReporter, TodoItemUseCaseImpl},
};

/// ルーターの組み立てに必要な依存
pub struct AppDependencies {
    pub todo_item_repository: Arc<dyn TodoItemRepository>,
    pub clock:                Arc<dyn Clock>,
    pub health_reporter:      HealthReporter,
    pub jwt_verifier:         JwtVerifier,
    /// `true` の場合は `/api/health` も認証必須にする
    pub health_requires_auth: bool,
}

/// State → Router の順に組み立てる
pub fn build_app(deps: AppDependencies) -> Router {
    let todo_item_state = Arc::new(TodoItemState {
        usecase: TodoItemUseCaseImpl::new(deps.todo_item_repository, deps.clock),
    });
    let health_state = Arc::new(HealthState {
        reporter: deps.health_reporter,
    });
    let auth_state = AuthState::new(deps.jwt_verifier);

    // /history は静的ルートのため /{id} より優先される
    let todo_item_routes = Router::new()
        .route(
            "/api/todoitems",
            get(list_todo_items).post(create_todo_item),
        )
        .route("/api/todoitems/history", get(list_todo_item_history))
        .route(
            "/api/todoitems/{id}",
            get(get_todo_item)
                .put(update_todo_item)
                .delete(delete_todo_item),
        )
        .with_state(todo_item_state);

    let health_routes = Router::new()
        .route("/api/health", get(health_check))
        .with_state(health_state);

    let (protected, public) = if deps.health_requires_auth {
        (todo_item_routes.merge(health_routes), Router::new())
    } else {
        (todo_item_routes, health_routes)
    };

    Router::new()
        .merge(protected.route_layer(from_fn_with_state(auth_state, require_bearer_token)))
        .merge(public)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
