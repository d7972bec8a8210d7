//! # MongoDB ドキュメントストア実装

use futures::TryStreamExt;
use mongodb::bson::{doc, Bson, DateTime, Document};
use portfolio_types::EntityKind;

use super::DocumentStore;
use crate::config::{DocumentStoreConfig, DEFAULT_DATABASE_NAME};
use crate::error::ApiError;

/// MongoDBによるドキュメントストア実装。
pub struct MongoDocumentStore {
    database: mongodb::Database,
}

impl MongoDocumentStore {
    /// 接続し、pingが成功するまで待つ。
    ///
    /// 起動時に接続不良を検出するため、返却前に必ずサーバーへ到達確認を行う。
    pub async fn connect(config: &DocumentStoreConfig) -> anyhow::Result<Self> {
        let client = mongodb::Client::with_uri_str(&config.uri).await?;

        let database = match &config.database {
            Some(name) => client.database(name),
            None => client
                .default_database()
                .unwrap_or_else(|| client.database(DEFAULT_DATABASE_NAME)),
        };

        database.run_command(doc! { "ping": 1 }).await?;
        tracing::info!(database = %database.name(), "ドキュメントストアに接続");

        Ok(Self { database })
    }

    fn collection(&self, kind: EntityKind) -> mongodb::Collection<Document> {
        self.database.collection(kind.collection_name())
    }
}

#[async_trait::async_trait]
impl DocumentStore for MongoDocumentStore {
    async fn insert(&self, kind: EntityKind, mut document: Document) -> Result<Document, ApiError> {
        if kind.has_timestamps() {
            let now = DateTime::now();
            document.insert("created_at", now);
            document.insert("updated_at", now);
        }

        let result = self
            .collection(kind)
            .insert_one(&document)
            .await
            .map_err(|e| {
                ApiError::DocumentStore(format!("{}への挿入に失敗: {e}", kind.collection_name()))
            })?;

        document.insert("_id", result.inserted_id);
        Ok(normalize_document(document))
    }

    async fn find_all(&self, kind: EntityKind) -> Result<Vec<Document>, ApiError> {
        let cursor = self
            .collection(kind)
            .find(doc! {})
            .await
            .map_err(|e| {
                ApiError::DocumentStore(format!("{}の取得に失敗: {e}", kind.collection_name()))
            })?;

        let documents: Vec<Document> = cursor.try_collect().await.map_err(|e| {
            ApiError::DocumentStore(format!("{}の読み出しに失敗: {e}", kind.collection_name()))
        })?;

        Ok(documents.into_iter().map(normalize_document).collect())
    }
}

/// 読み出したドキュメントをJSON向けの表現に揃える。
///
/// トップレベルの `ObjectId` は16進文字列に、日時はRFC 3339文字列に変換する。
pub(crate) fn normalize_document(document: Document) -> Document {
    document
        .into_iter()
        .map(|(key, value)| (key, normalize_value(value)))
        .collect()
}

fn normalize_value(value: Bson) -> Bson {
    match value {
        Bson::ObjectId(oid) => Bson::String(oid.to_hex()),
        Bson::DateTime(dt) => match dt.try_to_rfc3339_string() {
            Ok(s) => Bson::String(s),
            Err(_) => Bson::DateTime(dt),
        },
        other => other,
    }
}
