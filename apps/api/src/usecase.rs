//! # ユースケース層
//!
//! ハンドラから呼ばれるアプリケーションロジック。
//! リポジトリと時計はトレイトオブジェクトで受け取り、テストではモックに差し替える。

pub mod health;
pub mod todo_item;

pub use health::{DatabaseHealthCheck, HealthCheck, HealthReporter};
pub use todo_item::TodoItemUseCaseImpl;
