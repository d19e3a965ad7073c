//! # ヘルスチェック共通型
//!
//! `/api/health` が返すレポートの型を提供する。
//! 登録されたチェック（現状はデータベース到達性のみ）の結果を集約し、
//! 全体の状態を `Healthy` / `Unhealthy` で表す。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// 個別チェックの結果ステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// チェック成功
    Ok,
    /// チェック失敗
    Error,
}

/// 全体のステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    /// 全チェックが成功
    Healthy,
    /// 1 つ以上のチェックが失敗
    Unhealthy,
}

/// ヘルスレポート
///
/// ## 使用例
///
/// ```
/// use std::collections::BTreeMap;
///
/// use tasuku_shared::{CheckStatus, HealthReport, HealthStatus};
///
/// let checks = BTreeMap::from([("database".to_string(), CheckStatus::Ok)]);
/// let report = HealthReport::from_checks("0.1.0", checks);
/// assert_eq!(report.status, HealthStatus::Healthy);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    /// 全体のステータス
    pub status:  HealthStatus,
    /// アプリケーションバージョン（Cargo.toml から取得）
    pub version: String,
    /// 個別チェック結果（キー: チェック名）
    pub checks:  BTreeMap<String, CheckStatus>,
}

impl HealthReport {
    /// 個別チェック結果から全体のステータスを決めてレポートを組み立てる
    ///
    /// チェックが 1 つもない場合は `Healthy` とする。
    pub fn from_checks(version: impl Into<String>, checks: BTreeMap<String, CheckStatus>) -> Self {
        let status = if checks.values().all(|s| *s == CheckStatus::Ok) {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy
        };

        Self {
            status,
            version: version.into(),
            checks,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}
