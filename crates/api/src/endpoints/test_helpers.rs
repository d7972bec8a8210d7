//! # テスト用共通ヘルパー
//!
//! 呼び出しを記録するインメモリのオブジェクトストア・ドキュメントストアと、
//! 実ルーターをローカルポートで起動するヘルパー。

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Bson, Document};
use portfolio_types::{Entity, EntityKind};

use crate::config::AppState;
use crate::db::DocumentStore;
use crate::error::ApiError;
use crate::storage::ObjectStore;

/// 両モック間で共有する呼び出し順序カウンタ
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

fn next_sequence() -> u64 {
    SEQUENCE.fetch_add(1, Ordering::SeqCst)
}

/// モックへの呼び出し記録。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// (キー, Content-Type, バイト数)
    PutObject(String, String, usize),
    /// (キー, 有効期限)
    PresignGet(String, u32),
    Insert(EntityKind),
    FindAll(EntityKind),
}

/// テスト用のモックObjectStore。
/// S3への接続なしでダミーの署名付きURLを返す。
#[derive(Default)]
pub struct MockObjectStore {
    calls: Mutex<Vec<(u64, Call)>>,
    fail_presign: HashSet<String>,
    fail_puts: bool,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定キーの署名付きURL生成を失敗させる
    pub fn fail_presign_for(mut self, object_key: &str) -> Self {
        self.fail_presign.insert(object_key.to_string());
        self
    }

    /// 全アップロードを失敗させる
    pub fn fail_all_puts(mut self) -> Self {
        self.fail_puts = true;
        self
    }

    /// モックが返す署名付きURL
    pub fn signed_url(object_key: &str, expiry_secs: u32) -> String {
        format!("http://mock-storage/{object_key}?expires={expiry_secs}&sig=test")
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().iter().map(|(_, c)| c.clone()).collect()
    }

    pub fn last_sequence(&self) -> u64 {
        self.calls.lock().unwrap().last().map(|(s, _)| *s).unwrap_or(0)
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push((next_sequence(), call));
    }
}

#[async_trait::async_trait]
impl ObjectStore for MockObjectStore {
    async fn put_object(
        &self,
        object_key: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), ApiError> {
        self.record(Call::PutObject(
            object_key.to_string(),
            content_type.to_string(),
            bytes.len(),
        ));
        if self.fail_puts {
            return Err(ApiError::ObjectStore("mock upload failure".to_string()));
        }
        Ok(())
    }

    async fn presign_get(&self, object_key: &str, expiry_secs: u32) -> Result<String, ApiError> {
        self.record(Call::PresignGet(object_key.to_string(), expiry_secs));
        if self.fail_presign.contains(object_key) {
            return Err(ApiError::ObjectStore(format!("mock presign failure: {object_key}")));
        }
        Ok(Self::signed_url(object_key, expiry_secs))
    }
}

/// テスト用のモックDocumentStore。
/// 種別ごとにドキュメントをメモリ上に保持する。
#[derive(Default)]
pub struct MockDocumentStore {
    collections: Mutex<HashMap<EntityKind, Vec<Document>>>,
    calls: Mutex<Vec<(u64, Call)>>,
    fail_all: bool,
}

impl MockDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 全操作を失敗させる
    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Self::default()
        }
    }

    /// 型付きレコードを事前投入する（呼び出し記録には残さない）
    pub fn seed<E: Entity>(self, records: &[E]) -> Self {
        {
            let mut collections = self.collections.lock().unwrap();
            let docs = collections.entry(E::KIND).or_default();
            for record in records {
                let mut document = mongodb::bson::to_document(record).unwrap();
                if !document.contains_key("_id") {
                    document.insert("_id", ObjectId::new().to_hex());
                }
                docs.push(document);
            }
        }
        self
    }

    /// 生のドキュメントを事前投入する（欠落フィールドを含む既存データの再現用）
    pub fn seed_documents(self, kind: EntityKind, documents: Vec<Document>) -> Self {
        self.collections
            .lock()
            .unwrap()
            .entry(kind)
            .or_default()
            .extend(documents);
        self
    }

    /// 指定種別の保存済みドキュメント
    pub fn documents(&self, kind: EntityKind) -> Vec<Document> {
        self.collections
            .lock()
            .unwrap()
            .get(&kind)
            .cloned()
            .unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().iter().map(|(_, c)| c.clone()).collect()
    }

    pub fn insert_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Insert(_)))
            .count()
    }

    pub fn first_sequence(&self) -> u64 {
        self.calls
            .lock()
            .unwrap()
            .first()
            .map(|(s, _)| *s)
            .unwrap_or(u64::MAX)
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push((next_sequence(), call));
    }
}

#[async_trait::async_trait]
impl DocumentStore for MockDocumentStore {
    async fn insert(&self, kind: EntityKind, mut document: Document) -> Result<Document, ApiError> {
        self.record(Call::Insert(kind));
        if self.fail_all {
            return Err(ApiError::DocumentStore("mock insert failure".to_string()));
        }

        document.insert("_id", ObjectId::new().to_hex());
        if kind.has_timestamps() {
            let now = Bson::String("2024-01-12T08:30:00Z".to_string());
            document.insert("created_at", now.clone());
            document.insert("updated_at", now);
        }

        self.collections
            .lock()
            .unwrap()
            .entry(kind)
            .or_default()
            .push(document.clone());
        Ok(document)
    }

    async fn find_all(&self, kind: EntityKind) -> Result<Vec<Document>, ApiError> {
        self.record(Call::FindAll(kind));
        if self.fail_all {
            return Err(ApiError::DocumentStore("mock find failure".to_string()));
        }
        Ok(self.documents(kind))
    }
}

/// モックストアで共有状態を構築する。
pub fn test_state(
    object_store: Arc<MockObjectStore>,
    document_store: Arc<MockDocumentStore>,
) -> Arc<AppState> {
    Arc::new(AppState::new(object_store, document_store, 3600))
}

/// 実ルーターをローカルの空きポートで起動し、ベースURLを返す。
pub async fn start_test_server(state: Arc<AppState>) -> String {
    let app = crate::build_router(state, &crate::RouterOptions::default());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    format!("http://127.0.0.1:{port}{}", crate::API_PREFIX)
}
