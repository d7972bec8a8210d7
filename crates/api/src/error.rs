//! # API エラー型
//!
//! 全エンドポイントで共通のエラー型。
//! 5xx系の詳細な原因はサーバー側のログにのみ出力し、クライアントには汎用メッセージを返す。

use axum::http::StatusCode;
use axum::Json;
use portfolio_types::MessageResponse;

/// 5xx系エラーでクライアントに返すメッセージ
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// APIエラー型。
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 必須フィールドの欠落・空文字、ファイル未添付、ボディのパース失敗
    #[error("不正なリクエスト: {0}")]
    Validation(String),
    /// オブジェクトストア操作に失敗（アップロード、署名付きURL生成）
    #[error("オブジェクトストア操作に失敗: {0}")]
    ObjectStore(String),
    /// ドキュメントストア操作に失敗（挿入、取得、BSON変換）
    #[error("ドキュメントストア操作に失敗: {0}")]
    DocumentStore(String),
    /// 内部エラー
    #[error("内部エラー: {0}")]
    Internal(String),
}

impl ApiError {
    /// エラーに対応するHTTPステータス。
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::ObjectStore(_) | ApiError::DocumentStore(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = match &self {
            ApiError::Validation(msg) => msg.clone(),
            _ => {
                tracing::error!(error = %self, "リクエスト処理に失敗");
                INTERNAL_ERROR_MESSAGE.to_string()
            }
        };
        (status, Json(MessageResponse { message })).into_response()
    }
}
