//! # GET /get-brands

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use portfolio_types::{Brand, BrandEntry, BrandList};

use crate::assets::enrich;
use crate::config::AppState;
use crate::db::find_records;
use crate::error::ApiError;

/// GET /get-brands — 全ブランドをロゴの署名付きURL付きで返す。
pub async fn handle_get_brands(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BrandList>, ApiError> {
    let brands = find_records::<Brand>(state.document_store.as_ref()).await?;
    let enriched = enrich(&state.resolver, brands, |b: &Brand| b.image_key.as_str()).await?;

    Ok(Json(BrandList {
        brands: enriched
            .into_iter()
            .map(|(brand, image_url)| BrandEntry { brand, image_url })
            .collect(),
    }))
}
