//! # ドキュメントストア
//!
//! エンティティの保存先の抽象インターフェースと、型付きレコードとの変換ヘルパー。
//! MongoDB実装は `mongo` サブモジュールを参照。

pub mod mongo;

pub use mongo::MongoDocumentStore;

use mongodb::bson::Document;
use portfolio_types::{Entity, EntityKind};

use crate::error::ApiError;

/// ドキュメントストアの抽象インターフェース。
///
/// レコードはスキーマレスなBSONドキュメントとして扱う。
/// 失敗はすべて `ApiError::DocumentStore` として返す。
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// ドキュメントを挿入し、採番されたIDやタイムスタンプを含む保存後のドキュメントを返す。
    async fn insert(&self, kind: EntityKind, document: Document) -> Result<Document, ApiError>;

    /// 指定種別の全ドキュメントを取得する。
    async fn find_all(&self, kind: EntityKind) -> Result<Vec<Document>, ApiError>;
}

/// 型付きレコードを挿入し、保存後のレコードを返す。
pub async fn insert_record<E: Entity>(
    store: &dyn DocumentStore,
    record: &E,
) -> Result<E, ApiError> {
    let document = mongodb::bson::to_document(record)
        .map_err(|e| ApiError::DocumentStore(format!("BSONへの変換に失敗: {e}")))?;

    let stored = store.insert(E::KIND, document).await?;

    mongodb::bson::from_document(stored)
        .map_err(|e| ApiError::DocumentStore(format!("保存後ドキュメントの変換に失敗: {e}")))
}

/// 指定種別の全レコードを型付きで取得する。
pub async fn find_records<E: Entity>(store: &dyn DocumentStore) -> Result<Vec<E>, ApiError> {
    store
        .find_all(E::KIND)
        .await?
        .into_iter()
        .map(|document| {
            mongodb::bson::from_document(document).map_err(|e| {
                ApiError::DocumentStore(format!(
                    "{}のドキュメント変換に失敗: {e}",
                    E::KIND.collection_name()
                ))
            })
        })
        .collect()
}
