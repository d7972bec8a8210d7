//! # API設定・共有状態
//!
//! 環境変数からの設定読み込みと、ハンドラに渡す共有状態の定義。
//! 必須項目の欠落や数値のパース失敗は起動時エラーとして扱う。

use std::sync::Arc;

use anyhow::{bail, Context};

use crate::assets::AssetResolver;
use crate::db::DocumentStore;
use crate::storage::ObjectStore;

/// 待ち受けポートの既定値
pub const DEFAULT_PORT: u16 = 8050;
/// 署名付きURLの有効期限の既定値（秒）
pub const DEFAULT_PRESIGN_EXPIRY_SECS: u32 = 3600;
/// CORSで許可するオリジンの既定値
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3001";
/// リクエストボディ上限の既定値（10 MiB）
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
/// データベース名の既定値（接続URIにも指定がない場合）
pub const DEFAULT_DATABASE_NAME: &str = "portfolio";

/// オブジェクトストアの接続設定。
#[derive(Debug, Clone)]
pub struct ObjectStoreConfig {
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    pub bucket_name: String,
    /// S3互換ストレージのエンドポイント。Noneの場合はAWS。
    pub endpoint: Option<String>,
}

/// ドキュメントストアの接続設定。
#[derive(Debug, Clone)]
pub struct DocumentStoreConfig {
    pub uri: String,
    /// Noneの場合は接続URIのデフォルトDB、それもなければ `portfolio`
    pub database: Option<String>,
}

/// API全体の設定。
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub object_store: ObjectStoreConfig,
    pub document_store: DocumentStoreConfig,
    pub port: u16,
    pub cors_allowed_origin: String,
    pub presign_expiry_secs: u32,
    pub max_upload_bytes: usize,
}

impl ApiConfig {
    /// プロセスの環境変数から構築する。
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 任意のルックアップ関数から構築する。
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // 空白のみの値は未設定とみなす
        let optional = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &str| {
            optional(name).with_context(|| format!("環境変数 {name} が設定されていません"))
        };

        let object_store = ObjectStoreConfig {
            access_key: required("AWS_ACCESS_KEY_ID")?,
            secret_key: required("AWS_SECRET_ACCESS_KEY")?,
            region: required("AWS_REGION")?,
            bucket_name: required("AWS_BUCKET_NAME")?,
            endpoint: optional("S3_ENDPOINT"),
        };

        let document_store = DocumentStoreConfig {
            // 既存デプロイの .env に合わせ、MONGOOSE_CONNECTION も受け付ける
            uri: optional("MONGODB_URI")
                .or_else(|| optional("MONGOOSE_CONNECTION"))
                .context("環境変数 MONGODB_URI または MONGOOSE_CONNECTION が設定されていません")?,
            database: optional("MONGODB_DATABASE"),
        };

        let port = parse_or(optional("PORT"), "PORT", DEFAULT_PORT)?;
        let presign_expiry_secs = parse_or(
            optional("PRESIGN_EXPIRY_SECS"),
            "PRESIGN_EXPIRY_SECS",
            DEFAULT_PRESIGN_EXPIRY_SECS,
        )?;
        if presign_expiry_secs == 0 {
            bail!("PRESIGN_EXPIRY_SECS は1以上である必要があります");
        }
        let max_upload_bytes = parse_or(
            optional("MAX_UPLOAD_BYTES"),
            "MAX_UPLOAD_BYTES",
            DEFAULT_MAX_UPLOAD_BYTES,
        )?;

        Ok(Self {
            object_store,
            document_store,
            port,
            cors_allowed_origin: optional("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
            presign_expiry_secs,
            max_upload_bytes,
        })
    }
}

fn parse_or<T>(value: Option<String>, name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("環境変数 {name} の値が不正です: {raw}")),
        None => Ok(default),
    }
}

/// APIの共有状態。
///
/// 起動時に一度だけ構築され、`Arc` で全ハンドラに共有される。
/// リクエスト間で共有される可変状態は持たない。
pub struct AppState {
    /// 画像アセットの保存先
    pub object_store: Arc<dyn ObjectStore>,
    /// エンティティの保存先
    pub document_store: Arc<dyn DocumentStore>,
    /// 署名付きURL生成器
    pub resolver: AssetResolver,
}

impl AppState {
    pub fn new(
        object_store: Arc<dyn ObjectStore>,
        document_store: Arc<dyn DocumentStore>,
        presign_expiry_secs: u32,
    ) -> Self {
        let resolver = AssetResolver::new(object_store.clone(), presign_expiry_secs);
        Self {
            object_store,
            document_store,
            resolver,
        }
    }
}
