//! # Tasuku ドメイン層
//!
//! Todo アイテムを中心としたドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **エンティティ**: 一意の識別子を持つオブジェクト（[`todo_item::TodoItem`]）
//! - **値オブジェクト**: 識別子を持たない不変オブジェクト（[`todo_item::TodoTitle`]）
//! - **入力検証**: 永続化前の入力 DTO を検証する純粋関数（[`todo_item::TodoItemInput`]）
//! - **ドメインエラー**: ビジネスルール違反を表現するエラー型
//!
//! ## 依存関係の方向
//!
//! ```text
//! api → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（DB、HTTP）には一切依存しない。
//!
//! ## モジュール構成
//!
//! - [`clock`] - 現在時刻の抽象化
//! - [`error`] - ドメイン層で発生するエラーの定義
//! - [`todo_item`] - Todo アイテムと履歴（監査）ビュー

pub mod clock;
pub mod error;
pub mod todo_item;

pub use error::DomainError;
