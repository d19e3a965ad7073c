//! # リポジトリ実装
//!
//! ドメインオブジェクトの永続化を担うリポジトリのトレイトと実装を提供する。
//!
//! ## 設計方針
//!
//! - **トレイト境界**: ユースケースは `Arc<dyn TodoItemRepository>` 経由で利用し、
//!   テストではインメモリ実装（`mock` モジュール）に差し替える
//! - **データベース抽象化**: sqlx を使用し、PostgreSQL 固有の処理をカプセル化

pub mod todo_item_repository;

pub use todo_item_repository::{PostgresTodoItemRepository, TodoItemRepository};
