//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュール（この `handler.rs`）で re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、検証と永続化はユースケースに委譲
//!
//! ## モジュール構成
//!
//! ```text
//! handler.rs          # 親モジュール（re-export）
//! └── handler/
//!     ├── health.rs     # ヘルスチェック
//!     └── todo_item.rs  # Todo アイテム CRUD と履歴
//! ```

pub mod health;
pub mod todo_item;

pub use health::{HealthState, health_check};
pub use todo_item::{
    TodoItemState,
    create_todo_item,
    delete_todo_item,
    get_todo_item,
    list_todo_item_history,
    list_todo_items,
    update_todo_item,
};
