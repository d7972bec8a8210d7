//! # POST /contact-me
//!
//! 訪問者からの問い合わせの受付。アセットは扱わない。

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use portfolio_types::{ContactMessage, ContactRequest, MessageResponse};

use super::require_field;
use crate::config::AppState;
use crate::db::insert_record;
use crate::error::ApiError;

/// POST /contact-me — 問い合わせの保存。
///
/// `name`, `email`, `message` がすべて空でない場合のみ保存し、201を返す。
pub async fn handle_contact_me(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let Json(body) =
        payload.map_err(|e| ApiError::Validation(format!("Invalid JSON body: {}", e.body_text())))?;

    let contact = ContactMessage {
        name: require_field(body.name)?,
        email: require_field(body.email)?,
        message: require_field(body.message)?,
        ..Default::default()
    };

    let stored = insert_record(state.document_store.as_ref(), &contact).await?;
    tracing::info!(id = ?stored.id, "問い合わせを保存");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Message Sent Successfully!".to_string(),
        }),
    ))
}
