//! # Portfolio API サーバー
//!
//! ## 起動シーケンス
//! 1. `.env`（任意）と環境変数から設定を読み込む
//! 2. オブジェクトストアのクライアントを構築する
//! 3. ドキュメントストアに接続し、到達確認を行う
//! 4. 共有状態を構築し、リスナーを開始する
//!
//! いずれかの段階で失敗した場合はリスナーを開始せずに終了する。

use std::sync::Arc;

use portfolio_api::config::{ApiConfig, AppState};
use portfolio_api::db::MongoDocumentStore;
use portfolio_api::storage::S3ObjectStore;
use portfolio_api::{build_router, init_tracing, report_dotenv, RouterOptions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env は存在しなくてもよい
    let dotenv = dotenvy::dotenv();
    init_tracing();
    report_dotenv(dotenv)?;

    let config = ApiConfig::from_env()?;
    let options = RouterOptions::from_config(&config)?;

    let object_store = S3ObjectStore::from_config(&config.object_store)?;
    tracing::info!(bucket = %config.object_store.bucket_name, "オブジェクトストアを設定");

    let document_store = MongoDocumentStore::connect(&config.document_store).await?;

    let state = Arc::new(AppState::new(
        Arc::new(object_store),
        Arc::new(document_store),
        config.presign_expiry_secs,
    ));

    let app = build_router(state, &options);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("APIサーバーを {} で起動します", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
