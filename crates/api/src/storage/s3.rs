//! # S3互換オブジェクトストア実装
//!
//! AWS S3, MinIO, Cloudflare R2 等のS3互換APIを使用するオブジェクトストア実装。

use super::ObjectStore;
use crate::config::ObjectStoreConfig;
use crate::error::ApiError;

/// S3互換ストレージによるオブジェクトストア実装。
pub struct S3ObjectStore {
    bucket: s3::Bucket,
}

impl S3ObjectStore {
    /// 構築済みバケットから生成する。
    pub fn new(bucket: s3::Bucket) -> Self {
        Self { bucket }
    }

    /// 設定からバケットを初期化する。
    ///
    /// `endpoint` が設定されている場合はS3互換ストレージとみなし、
    /// パススタイルでアクセスする。未設定の場合はAWSのリージョンエンドポイントを使用する。
    pub fn from_config(config: &ObjectStoreConfig) -> anyhow::Result<Self> {
        let region = match &config.endpoint {
            Some(endpoint) => {
                tracing::info!(s3_endpoint = %endpoint, "S3互換エンドポイントを使用");
                s3::Region::Custom {
                    region: config.region.clone(),
                    endpoint: endpoint.clone(),
                }
            }
            None => config.region.parse::<s3::Region>()?,
        };

        let credentials = s3::creds::Credentials::new(
            Some(config.access_key.as_str()),
            Some(config.secret_key.as_str()),
            None,
            None,
            None,
        )?;

        let bucket = s3::Bucket::new(&config.bucket_name, region, credentials)?;
        let bucket = if config.endpoint.is_some() {
            bucket.with_path_style()
        } else {
            bucket
        };

        Ok(Self::new(*bucket))
    }
}

#[async_trait::async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(
        &self,
        object_key: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), ApiError> {
        let response = self
            .bucket
            .put_object_with_content_type(object_key, bytes, content_type)
            .await
            .map_err(|e| ApiError::ObjectStore(format!("アップロード失敗: {e}")))?;

        // fail-on-err無効のため、ステータスコードを自前で確認する
        let status = response.status_code();
        if !(200..300).contains(&status) {
            return Err(ApiError::ObjectStore(format!(
                "アップロードがエラーを返しました: HTTP {status}"
            )));
        }

        Ok(())
    }

    async fn presign_get(&self, object_key: &str, expiry_secs: u32) -> Result<String, ApiError> {
        self.bucket
            .presign_get(object_key, expiry_secs, None)
            .await
            .map_err(|e| ApiError::ObjectStore(format!("署名付きURL生成失敗: {e}")))
    }
}
