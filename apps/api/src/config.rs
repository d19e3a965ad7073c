//! # アプリケーション設定
//!
//! 環境変数からアプリケーション設定を読み込む。
//!
//! ## 設計方針
//!
//! [12-Factor App](https://12factor.net/ja/config) の原則に従い、
//! すべての設定を環境変数から読み込む。開発環境では `.env` を `dotenvy` で読み込む。
//!
//! ## 環境変数一覧
//!
//! | 変数名 | 必須 | デフォルト | 説明 |
//! |--------|------|------------|------|
//! | `API_HOST` | No | `0.0.0.0` | バインドアドレス |
//! | `API_PORT` | **Yes** | - | ポート番号 |
//! | `DATABASE_URL` | **Yes** | - | PostgreSQL 接続 URL |
//! | `JWT_ISSUER` | **Yes** | - | 受け付けるトークンの `iss` |
//! | `JWT_AUDIENCE` | **Yes** | - | 受け付けるトークンの `aud` |
//! | `JWT_SIGNING_KEY` | **Yes** | - | HS256 の共通鍵 |
//! | `HEALTH_REQUIRES_AUTH` | No | `false` | `/api/health` を認証必須にするか |
//!
//! ログ出力形式（`LOG_FORMAT`）は `tasuku_shared::observability` が読み込む。

use std::{env, fmt};

use thiserror::Error;

/// 設定読み込みのエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 必須の環境変数が未設定
    #[error("環境変数 {0} が設定されていません")]
    Missing(&'static str),

    /// 値を解釈できない
    #[error("環境変数 {name} の値が不正です: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// JWT 検証の設定
#[derive(Clone)]
pub struct JwtConfig {
    pub issuer:      String,
    pub audience:    String,
    pub signing_key: String,
}

// 署名鍵をログに出さない
impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("signing_key", &"[REDACTED]")
            .finish()
    }
}

/// API サーバーの設定
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// バインドアドレス
    pub host: String,
    /// ポート番号
    pub port: u16,
    /// データベース接続 URL
    pub database_url: String,
    /// JWT 検証の設定
    pub jwt: JwtConfig,
    /// ヘルスチェックを認証必須にするか
    pub health_requires_auth: bool,
}

impl ApiConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の参照関数から設定を読み込む
    ///
    /// テストでプロセスの環境変数を書き換えずに済むよう、参照先を差し替えられる。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| lookup(name).ok_or(ConfigError::Missing(name));

        let port = required("API_PORT")?;
        let port = port.parse().map_err(|_| ConfigError::Invalid {
            name:  "API_PORT",
            value: port,
        })?;

        let health_requires_auth = match lookup("HEALTH_REQUIRES_AUTH") {
            None => false,
            Some(value) => parse_bool(&value).ok_or(ConfigError::Invalid {
                name: "HEALTH_REQUIRES_AUTH",
                value,
            })?,
        };

        Ok(Self {
            host: lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            database_url: required("DATABASE_URL")?,
            jwt: JwtConfig {
                issuer:      required("JWT_ISSUER")?,
                audience:    required("JWT_AUDIENCE")?,
                signing_key: required("JWT_SIGNING_KEY")?,
            },
            health_requires_auth,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
