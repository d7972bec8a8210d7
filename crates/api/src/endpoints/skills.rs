//! # GET /get-skills

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use portfolio_types::{Skill, SkillEntry, SkillList};

use crate::assets::enrich;
use crate::config::AppState;
use crate::db::find_records;
use crate::error::ApiError;

/// GET /get-skills — 全スキルをアイコンの署名付きURL付きで返す。
pub async fn handle_get_skills(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SkillList>, ApiError> {
    let skills = find_records::<Skill>(state.document_store.as_ref()).await?;
    let enriched = enrich(&state.resolver, skills, |s: &Skill| s.icon.as_str()).await?;

    Ok(Json(SkillList {
        skills: enriched
            .into_iter()
            .map(|(skill, icon_url)| SkillEntry { skill, icon_url })
            .collect(),
    }))
}
