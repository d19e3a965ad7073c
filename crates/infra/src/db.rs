//! # PostgreSQL データベース接続管理
//!
//! 接続プールの作成、マイグレーションの適用、疎通確認を行う。
//!
//! ## 設計方針
//!
//! - **接続プール**: リクエスト間で共有する唯一の可変リソース。プロセス起動時に一度だけ作成する
//! - **トランザクション**: 各リポジトリ呼び出しは単一の SQL 文で完結し、DB の自動コミットに委ねる
//! - **履歴管理**: 変更履歴はトリガーで DB 側が記録する（`migrations/` 参照）

use std::time::Duration;

use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::error::InfraError;

/// PostgreSQL 接続プールを作成する
///
/// # 設定値
///
/// - `max_connections(10)`: 最大接続数
/// - `acquire_timeout(5秒)`: 接続取得のタイムアウト。超過時はエラー
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

/// データベースマイグレーションを実行する
///
/// `sqlx::migrate!()` マクロで埋め込まれたマイグレーションファイルを
/// 順番に適用する。適用済みのマイグレーションはスキップされる。
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

/// データベースへの疎通を確認する
///
/// `SELECT 1` が成功すれば到達可能とみなす。ヘルスチェックから呼ばれる。
#[tracing::instrument(skip_all, err)]
pub async fn ping(pool: &PgPool) -> Result<(), InfraError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
