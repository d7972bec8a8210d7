//! # Portfolio API
//!
//! ポートフォリオサイト用のREST API。
//!
//! ## 役割
//! - スキル・推薦文・職歴・制作物・ブランドロゴ・問い合わせのドキュメントストアへの保存と取得
//! - 画像アセットのオブジェクトストアへのアップロード
//! - 読み出し時の期限付き署名付きURLの付与
//!
//! ## API エンドポイント（`/api/users` 配下）
//! - `POST /upload-testimonial` — 画像付き推薦文の投稿
//! - `POST /contact-me` — 問い合わせの送信
//! - `GET /project-works` — 制作物一覧（署名付きURL付き）
//! - `GET /get-testimonial` — 推薦文一覧（署名付きURL付き）
//! - `GET /get-brands` — ブランド一覧（署名付きURL付き）
//! - `GET /get-skills` — スキル一覧（署名付きURL付き）
//! - `GET /get-experience` — 職歴一覧

pub mod assets;
pub mod config;
pub mod db;
pub mod endpoints;
pub mod error;
pub mod storage;

use std::sync::Arc;

use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::{ApiConfig, AppState, DEFAULT_CORS_ORIGIN, DEFAULT_MAX_UPLOAD_BYTES};

/// 全ルートの公開パス
pub const API_PREFIX: &str = "/api/users";

/// ルーターに適用するレイヤーの設定。
#[derive(Debug, Clone)]
pub struct RouterOptions {
    /// CORSで許可するオリジン
    pub allowed_origin: HeaderValue,
    /// リクエストボディの上限（バイト）
    pub max_upload_bytes: usize,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            allowed_origin: HeaderValue::from_static(DEFAULT_CORS_ORIGIN),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl RouterOptions {
    pub fn from_config(config: &ApiConfig) -> anyhow::Result<Self> {
        let allowed_origin = config
            .cors_allowed_origin
            .parse::<HeaderValue>()
            .with_context(|| {
                format!(
                    "CORS_ALLOWED_ORIGIN の値が不正です: {}",
                    config.cors_allowed_origin
                )
            })?;

        Ok(Self {
            allowed_origin,
            max_upload_bytes: config.max_upload_bytes,
        })
    }
}

/// 全エンドポイントを持つルーターを構築する。
pub fn build_router(state: Arc<AppState>, options: &RouterOptions) -> axum::Router {
    let routes = axum::Router::new()
        .route(
            "/upload-testimonial",
            post(endpoints::handle_upload_testimonial),
        )
        .route("/contact-me", post(endpoints::handle_contact_me))
        .route("/project-works", get(endpoints::handle_project_works))
        .route("/get-testimonial", get(endpoints::handle_get_testimonials))
        .route("/get-brands", get(endpoints::handle_get_brands))
        .route("/get-skills", get(endpoints::handle_get_skills))
        .route("/get-experience", get(endpoints::handle_get_experience));

    let cors = CorsLayer::new()
        .allow_origin(options.allowed_origin.clone())
        .allow_methods([Method::GET, Method::PUT, Method::DELETE, Method::POST])
        .allow_headers(Any);

    axum::Router::new()
        .nest(API_PREFIX, routes)
        .layer(DefaultBodyLimit::max(options.max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `RUST_LOG` に従うログ出力を初期化する（未設定時は `info`）。
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// `dotenvy::dotenv()` の結果をログに残す。トレーシング初期化後に呼ぶ。
///
/// `.env` が存在しない場合は環境変数のみで続行し、読み込みや解析に失敗した場合はエラーとする。
pub fn report_dotenv(result: Result<std::path::PathBuf, dotenvy::Error>) -> anyhow::Result<()> {
    match result {
        Ok(path) => {
            tracing::debug!(path = %path.display(), ".envを読み込みました");
            Ok(())
        }
        Err(e) if e.not_found() => {
            tracing::debug!(".envが見つからないため環境変数のみを使用");
            Ok(())
        }
        Err(e) => Err(e).context(".envの読み込みに失敗しました"),
    }
}
