//! # Tasuku API サーバー
//!
//! Bearer トークンで保護された Todo アイテムの CRUD と、変更履歴の参照を提供する。
//!
//! ## アーキテクチャ
//!
//! ```text
//! request → 認証ミドルウェア → ハンドラ → ユースケース → リポジトリ → PostgreSQL
//!                                          (検証)                    (履歴はトリガーで記録)
//! ```
//!
//! ## モジュール構成
//!
//! - [`app_builder`] - State の初期化とルーター構築
//! - [`config`] - アプリケーション設定（環境変数からの読み込み）
//! - [`error`] - API エラー定義と HTTP レスポンスへの変換
//! - [`handler`] - HTTP リクエストハンドラ
//! - [`middleware`] - 認証ミドルウェア
//! - [`usecase`] - Todo アイテム管理とヘルスレポート
//!
//! ## 依存関係
//!
//! - `tasuku_domain`: ドメインモデル、入力検証
//! - `tasuku_infra`: データベース接続、リポジトリ
//! - `tasuku_shared`: エラーレスポンス、ヘルス型、トレーシング

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod usecase;
