//! # オブジェクトストア
//!
//! 画像アセットの保存先の抽象インターフェース。
//! S3互換ストレージ実装は `s3` サブモジュールを参照。

pub mod s3;

pub use self::s3::S3ObjectStore;

use crate::error::ApiError;

/// オブジェクトストアの抽象インターフェース。
///
/// 運用者はAWS S3やS3互換ストレージ（MinIO, Cloudflare R2等）を実装として選択できる。
/// 失敗はすべて `ApiError::ObjectStore` として返す。
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// バイト列を指定キーでアップロードする。
    async fn put_object(
        &self,
        object_key: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), ApiError>;

    /// 読み出し用の署名付きURL（GET）を生成する。
    ///
    /// 署名はローカルでの暗号処理であり、オブジェクトの存在確認や転送は行わない。
    async fn presign_get(&self, object_key: &str, expiry_secs: u32) -> Result<String, ApiError>;
}
