//! # GET /project-works

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use portfolio_types::{ProjectEntry, ProjectList, Work};

use crate::assets::enrich;
use crate::config::AppState;
use crate::db::find_records;
use crate::error::ApiError;

/// GET /project-works — 全制作物をサムネイルの署名付きURL付きで返す。
pub async fn handle_project_works(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ProjectList>, ApiError> {
    let works = find_records::<Work>(state.document_store.as_ref()).await?;
    let enriched = enrich(&state.resolver, works, |w: &Work| w.image_key.as_str()).await?;

    Ok(Json(ProjectList {
        projects: enriched
            .into_iter()
            .map(|(project, photo_url)| ProjectEntry { project, photo_url })
            .collect(),
    }))
}
