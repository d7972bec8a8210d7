//! # アセット参照の解決とコレクションの拡充
//!
//! ## 構成
//! - `AssetResolver` — オブジェクトキーから期限付きの署名付きURLを生成する
//! - `enrich` — レコード一覧の各アセットキーを並行に解決し、(レコード, URL) の組にまとめる
//! - `store_asset_and_insert` — アセットをアップロードしてから、そのキーを参照するレコードを保存する
//!
//! 保存されるのはオブジェクトキーのみで、署名付きURLは読み出しのたびに生成する。

use std::sync::Arc;

use futures::future::try_join_all;
use portfolio_types::Entity;
use rand::RngCore;

use crate::config::AppState;
use crate::db::{insert_record, DocumentStore};
use crate::error::ApiError;
use crate::storage::ObjectStore;

/// 生成するオブジェクトキーの乱数バイト長
pub const ASSET_KEY_BYTES: usize = 32;

/// 期限付き署名付きURLの生成器。
#[derive(Clone)]
pub struct AssetResolver {
    store: Arc<dyn ObjectStore>,
    expiry_secs: u32,
}

impl AssetResolver {
    pub fn new(store: Arc<dyn ObjectStore>, expiry_secs: u32) -> Self {
        Self { store, expiry_secs }
    }

    /// 署名付きURLの有効期限（秒）
    pub fn expiry_secs(&self) -> u32 {
        self.expiry_secs
    }

    /// オブジェクトキーに対する読み出し用の署名付きURLを生成する。
    ///
    /// キーの存在確認は行わない。失敗時はリトライせず、そのまま呼び出し元に返す。
    /// 空のキーはバケット直下を指すため、署名せずにエラーとする。
    pub async fn resolve_signed_url(&self, object_key: &str) -> Result<String, ApiError> {
        if object_key.trim().is_empty() {
            tracing::warn!("空のオブジェクトキーは署名できません");
            return Err(ApiError::ObjectStore(
                "オブジェクトキーが空です".to_string(),
            ));
        }

        self.store
            .presign_get(object_key, self.expiry_secs)
            .await
            .inspect_err(|e| {
                tracing::warn!(object_key = %object_key, error = %e, "署名付きURLの生成に失敗");
            })
    }
}

/// レコード一覧の各アセットキーを署名付きURLに解決し、(レコード, URL) の組を返す。
///
/// - 全レコードの解決を並行に発行し、すべての完了を待つ
/// - 1件でも失敗した場合は全体を失敗とし、部分的な結果は返さない
/// - 結果は入力と同じ順序で返す
/// - 空の入力に対しては解決を一切行わずに空の一覧を返す
pub async fn enrich<R, F>(
    resolver: &AssetResolver,
    records: Vec<R>,
    key_of: F,
) -> Result<Vec<(R, String)>, ApiError>
where
    F: Fn(&R) -> &str,
{
    if records.is_empty() {
        return Ok(Vec::new());
    }

    let urls = try_join_all(
        records
            .iter()
            .map(|record| resolver.resolve_signed_url(key_of(record))),
    )
    .await?;

    Ok(records.into_iter().zip(urls).collect())
}

/// 新しいオブジェクトキーを生成する（32バイトの乱数を16進エンコード）。
pub fn new_asset_key() -> String {
    let mut bytes = [0u8; ASSET_KEY_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// アップロード対象のバイナリアセット。
#[derive(Debug, Clone)]
pub struct AssetUpload {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// アセットをアップロードし、成功した場合のみそのキーを参照するレコードを保存する。
///
/// `build` は生成されたオブジェクトキーを受け取り、保存するレコードを組み立てる。
/// アップロードに失敗した場合、ドキュメントストアへの書き込みは行わない。
/// レコードの保存に失敗した場合、アップロード済みのオブジェクトは残る。
pub async fn store_asset_and_insert<E, B>(
    object_store: &dyn ObjectStore,
    document_store: &dyn DocumentStore,
    asset: AssetUpload,
    build: B,
) -> Result<E, ApiError>
where
    E: Entity,
    B: FnOnce(String) -> E,
{
    let object_key = new_asset_key();

    object_store
        .put_object(&object_key, &asset.bytes, &asset.content_type)
        .await?;
    tracing::debug!(
        object_key = %object_key,
        size = asset.bytes.len(),
        content_type = %asset.content_type,
        "アセットをアップロード"
    );

    let record = build(object_key);
    insert_record(document_store, &record).await
}

impl AppState {
    /// 共有状態のストアで `store_asset_and_insert` を実行する。
    pub async fn store_asset_and_insert<E, B>(
        &self,
        asset: AssetUpload,
        build: B,
    ) -> Result<E, ApiError>
    where
        E: Entity,
        B: FnOnce(String) -> E,
    {
        store_asset_and_insert(
            self.object_store.as_ref(),
            self.document_store.as_ref(),
            asset,
            build,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use portfolio_types::{Brand, Skill, Testimonial};

    use super::*;
    use crate::endpoints::test_helpers::{Call, MockDocumentStore, MockObjectStore};

    fn skill(name: &str, icon: &str) -> Skill {
        Skill {
            name: name.to_string(),
            icon: icon.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_asset_key_format() {
        let a = new_asset_key();
        let b = new_asset_key();
        assert_eq!(a.len(), ASSET_KEY_BYTES * 2);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_resolve_signed_url_uses_expiry() {
        let store = Arc::new(MockObjectStore::new());
        let resolver = AssetResolver::new(store.clone(), 900);

        let url = resolver.resolve_signed_url("k1").await.unwrap();
        assert_eq!(url, MockObjectStore::signed_url("k1", 900));
        assert_eq!(store.calls(), vec![Call::PresignGet("k1".to_string(), 900)]);
    }

    /// N件の入力に対し、各レコードとそのキーの署名付きURLの組がN件返ることを確認
    #[tokio::test]
    async fn test_enrich_pairs_each_record_with_its_url() {
        let store = Arc::new(MockObjectStore::new());
        let resolver = AssetResolver::new(store.clone(), 3600);

        let records = vec![skill("Rust", "k-rust"), skill("Go", "k-go"), skill("Zig", "k-zig")];
        let enriched = enrich(&resolver, records.clone(), |s: &Skill| s.icon.as_str())
            .await
            .unwrap();

        assert_eq!(enriched.len(), 3);

        let mut expected = HashSet::new();
        for record in &records {
            let url = resolver.resolve_signed_url(&record.icon).await.unwrap();
            expected.insert((record.name.clone(), url));
        }
        let actual: HashSet<_> = enriched
            .iter()
            .map(|(record, url)| (record.name.clone(), url.clone()))
            .collect();
        assert_eq!(actual, expected);

        // 入力順を保持する
        let names: Vec<_> = enriched.iter().map(|(s, _)| s.name.as_str()).collect();
        assert_eq!(names, vec!["Rust", "Go", "Zig"]);
    }

    #[tokio::test]
    async fn test_enrich_empty_makes_no_calls() {
        let store = Arc::new(MockObjectStore::new());
        let resolver = AssetResolver::new(store.clone(), 3600);

        let enriched = enrich(&resolver, Vec::<Brand>::new(), |b: &Brand| {
            b.image_key.as_str()
        })
        .await
        .unwrap();

        assert!(enriched.is_empty());
        assert!(store.calls().is_empty());
    }

    /// 3件中1件の解決が失敗した場合、全体が失敗することを確認
    #[tokio::test]
    async fn test_enrich_fails_when_any_resolution_fails() {
        let store = Arc::new(MockObjectStore::new().fail_presign_for("k-broken"));
        let resolver = AssetResolver::new(store.clone(), 3600);

        let records = vec![skill("A", "k-a"), skill("B", "k-broken"), skill("C", "k-c")];
        let result = enrich(&resolver, records, |s: &Skill| s.icon.as_str()).await;

        assert!(matches!(result, Err(ApiError::ObjectStore(_))));
    }

    /// 空のキーは署名せずに失敗することを確認
    #[tokio::test]
    async fn test_resolve_signed_url_rejects_blank_key() {
        let store = Arc::new(MockObjectStore::new());
        let resolver = AssetResolver::new(store.clone(), 3600);

        for key in ["", "   "] {
            let result = resolver.resolve_signed_url(key).await;
            assert!(matches!(result, Err(ApiError::ObjectStore(_))), "{key:?}");
        }
        assert!(store.calls().is_empty());
    }

    /// アセットキーのないレコードが1件でもあれば一覧全体が失敗し、空キーの署名は行われないことを確認
    #[tokio::test]
    async fn test_enrich_fails_on_record_without_asset_key() {
        let store = Arc::new(MockObjectStore::new());
        let resolver = AssetResolver::new(store.clone(), 3600);

        let result = enrich(&resolver, vec![skill("NoIcon", "")], |s: &Skill| {
            s.icon.as_str()
        })
        .await;
        assert!(matches!(result, Err(ApiError::ObjectStore(_))));
        assert!(store.calls().is_empty());

        let records = vec![skill("A", "k-a"), skill("NoIcon", ""), skill("C", "k-c")];
        let result = enrich(&resolver, records, |s: &Skill| s.icon.as_str()).await;
        assert!(matches!(result, Err(ApiError::ObjectStore(_))));
        assert!(!store
            .calls()
            .iter()
            .any(|c| matches!(c, Call::PresignGet(key, _) if key.is_empty())));
    }

    /// アップロード→挿入の順で1回ずつ呼ばれ、保存レコードのキーがアップロード時のキーと一致することを確認
    #[tokio::test]
    async fn test_store_asset_and_insert_order_and_key() {
        let objects = MockObjectStore::new();
        let documents = MockDocumentStore::new();

        let stored: Testimonial = store_asset_and_insert(
            &objects,
            &documents,
            AssetUpload {
                bytes: vec![1, 2, 3],
                content_type: "image/png".to_string(),
            },
            |image_key| Testimonial {
                name: "Ada".to_string(),
                company: "AE".to_string(),
                feedback: "Nice".to_string(),
                image_key,
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let object_calls = objects.calls();
        assert_eq!(object_calls.len(), 1);
        let Call::PutObject(put_key, content_type, size) = &object_calls[0] else {
            panic!("expected put_object, got {object_calls:?}");
        };
        assert_eq!(content_type, "image/png");
        assert_eq!(*size, 3);
        assert_eq!(&stored.image_key, put_key);
        assert!(stored.id.is_some());

        assert_eq!(documents.insert_count(), 1);
        assert!(objects.last_sequence() < documents.first_sequence());
    }

    /// アップロード失敗時はドキュメントストアに書き込まないことを確認
    #[tokio::test]
    async fn test_store_asset_and_insert_skips_insert_on_upload_failure() {
        let objects = MockObjectStore::new().fail_all_puts();
        let documents = MockDocumentStore::new();

        let result: Result<Brand, _> = store_asset_and_insert(
            &objects,
            &documents,
            AssetUpload {
                bytes: vec![0xff],
                content_type: "image/svg+xml".to_string(),
            },
            |image_key| Brand {
                name: "Acme".to_string(),
                image_key,
                ..Default::default()
            },
        )
        .await;

        assert!(matches!(result, Err(ApiError::ObjectStore(_))));
        assert_eq!(documents.insert_count(), 0);
    }
}
