//! # ヘルスレポート
//!
//! 登録されたヘルスチェックを順に実行し、[`HealthReport`] に集約する。
//! 各チェックはタイムアウト付きで実行し、超過は失敗として扱う。

use std::{collections::BTreeMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use sqlx::PgPool;
use tasuku_infra::db;
use tasuku_shared::{CheckStatus, HealthReport};

/// チェック 1 件あたりのタイムアウト
const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// 個別のヘルスチェック
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// レポートに載せるチェック名
    fn name(&self) -> &str;

    async fn check(&self) -> CheckStatus;
}

/// データベースへの到達性チェック
pub struct DatabaseHealthCheck {
    pool: PgPool,
}

impl DatabaseHealthCheck {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthCheck for DatabaseHealthCheck {
    fn name(&self) -> &str {
        "database"
    }

    async fn check(&self) -> CheckStatus {
        match db::ping(&self.pool).await {
            Ok(()) => CheckStatus::Ok,
            Err(e) => {
                tracing::warn!(error = %e, "health check: database ping failed");
                CheckStatus::Error
            }
        }
    }
}

/// ヘルスチェックの集約
pub struct HealthReporter {
    version: String,
    checks:  Vec<Arc<dyn HealthCheck>>,
    timeout: Duration,
}

impl HealthReporter {
    pub fn new(version: impl Into<String>, checks: Vec<Arc<dyn HealthCheck>>) -> Self {
        Self {
            version: version.into(),
            checks,
            timeout: CHECK_TIMEOUT,
        }
    }

    /// タイムアウトを変更する
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// すべてのチェックを実行してレポートを返す
    pub async fn report(&self) -> HealthReport {
        let mut results = BTreeMap::new();

        for check in &self.checks {
            let status = match tokio::time::timeout(self.timeout, check.check()).await {
                Ok(status) => status,
                Err(_) => {
                    tracing::warn!(check = check.name(), "health check timed out");
                    CheckStatus::Error
                }
            };
            results.insert(check.name().to_string(), status);
        }

        HealthReport::from_checks(self.version.clone(), results)
    }
}
