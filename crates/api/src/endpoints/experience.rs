//! # GET /get-experience
//!
//! 職歴はアセットを持たないため、保存内容をそのまま返す。

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use portfolio_types::WorkExperience;

use crate::config::AppState;
use crate::db::find_records;
use crate::error::ApiError;

/// GET /get-experience — 全職歴を返す。
pub async fn handle_get_experience(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<WorkExperience>>, ApiError> {
    let experience = find_records::<WorkExperience>(state.document_store.as_ref()).await?;
    Ok(Json(experience))
}
