//! # Tasuku API サーバー
//!
//! ## 環境変数
//!
//! `config` モジュールを参照。`.env` が存在すれば読み込む。
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境
//! cargo run -p tasuku-api
//!
//! # 本番環境
//! LOG_FORMAT=json API_PORT=8080 DATABASE_URL=postgres://... cargo run -p tasuku-api --release
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use tasuku_api::{
    app_builder::{AppDependencies, build_app},
    config::ApiConfig,
    middleware::auth::JwtVerifier,
    usecase::{DatabaseHealthCheck, HealthCheck, HealthReporter},
};
use tasuku_domain::clock::SystemClock;
use tasuku_infra::{db, repository::PostgresTodoItemRepository};
use tasuku_shared::observability::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    init_tracing(&TracingConfig::from_env("tasuku-api"));

    let config = ApiConfig::from_env().context("設定の読み込みに失敗しました")?;
    tracing::info!(
        "API サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    let pool = db::create_pool(&config.database_url)
        .await
        .context("データベース接続に失敗しました")?;
    db::run_migrations(&pool)
        .await
        .context("マイグレーションの適用に失敗しました")?;
    tracing::info!("データベースに接続しました");

    let health_checks: Vec<Arc<dyn HealthCheck>> =
        vec![Arc::new(DatabaseHealthCheck::new(pool.clone()))];

    let app = build_app(AppDependencies {
        todo_item_repository: Arc::new(PostgresTodoItemRepository::new(pool)),
        clock:                Arc::new(SystemClock),
        health_reporter:      HealthReporter::new(env!("CARGO_PKG_VERSION"), health_checks),
        jwt_verifier:         JwtVerifier::new(&config.jwt),
        health_requires_auth: config.health_requires_auth,
    });

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("バインドアドレスが不正です")?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("API サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
