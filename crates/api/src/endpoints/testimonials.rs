//! # 推薦文エンドポイント
//!
//! - `POST /upload-testimonial` — 画像とメタデータをまとめて受け付け、画像をアップロードしてから保存
//! - `GET /get-testimonial` — 全推薦文を画像の署名付きURL付きで返す

use std::sync::Arc;

use axum::extract::multipart::{Field, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use portfolio_types::{MessageResponse, Testimonial, TestimonialEntry, TestimonialList};

use super::require_field;
use crate::assets::{enrich, AssetUpload};
use crate::config::AppState;
use crate::db::find_records;
use crate::error::ApiError;

/// Content-Typeが指定されていないファイルに使用する値
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// 画像ファイル欠落時のメッセージ
pub const MISSING_FILE_MESSAGE: &str = "Image file is required!";

/// マルチパートフォームの解析結果。
/// 必須チェック前の状態で、各フィールドは欠落し得る。
#[derive(Debug, Default)]
pub struct TestimonialForm {
    pub name: Option<String>,
    pub company: Option<String>,
    pub feedback: Option<String>,
    pub image: Option<AssetUpload>,
}

/// マルチパートフォームを解析する。未知のフィールドは無視する。
pub async fn parse_testimonial_form(mut form: Multipart) -> Result<TestimonialForm, ApiError> {
    let mut parsed = TestimonialForm::default();

    while let Some(field) = form
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Invalid multipart content: {e}")))?
    {
        let Some(field_name) = field.name().map(str::to_string) else {
            continue;
        };

        match field_name.as_str() {
            "name" => parsed.name = Some(read_text(field).await?),
            "Company" => parsed.company = Some(read_text(field).await?),
            "Feedback" => parsed.feedback = Some(read_text(field).await?),
            // ファイル名のないテキストパートは画像として扱わない
            "ImageUrl" if field.file_name().is_none() => {
                tracing::debug!("ファイルではない画像フィールドを無視");
            }
            "ImageUrl" => {
                let content_type = field
                    .content_type()
                    .filter(|ct| !ct.trim().is_empty())
                    .unwrap_or(DEFAULT_CONTENT_TYPE)
                    .to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    ApiError::Validation(format!("Invalid bytes in multipart field 'ImageUrl': {e}"))
                })?;
                parsed.image = Some(AssetUpload {
                    bytes: bytes.to_vec(),
                    content_type,
                });
            }
            other => tracing::debug!(field = %other, "未知のマルチパートフィールドを無視"),
        }
    }

    Ok(parsed)
}

async fn read_text(field: Field<'_>) -> Result<String, ApiError> {
    let name = field.name().unwrap_or_default().to_string();
    field.text().await.map_err(|e| {
        ApiError::Validation(format!("Could not read multipart field '{name}' as text: {e}"))
    })
}

/// 解析済みフォームを検証し、画像のアップロードとレコードの保存を行う。
///
/// 検証に失敗した場合はどのストアにも触れない。
/// 0バイトのファイルは未添付として扱う。
pub async fn ingest_testimonial(
    state: &AppState,
    form: TestimonialForm,
) -> Result<Testimonial, ApiError> {
    let name = require_field(form.name)?;
    let company = require_field(form.company)?;
    let feedback = require_field(form.feedback)?;
    let image = form
        .image
        .filter(|image| !image.bytes.is_empty())
        .ok_or_else(|| ApiError::Validation(MISSING_FILE_MESSAGE.to_string()))?;

    state
        .store_asset_and_insert(image, |image_key| Testimonial {
            id: None,
            name,
            company,
            feedback,
            image_key,
        })
        .await
}

/// POST /upload-testimonial — 推薦文の投稿。
///
/// マルチパートの `name`, `Company`, `Feedback` と画像ファイル `ImageUrl` を受け付ける。
pub async fn handle_upload_testimonial(
    State(state): State<Arc<AppState>>,
    form: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let form = form.map_err(|e| ApiError::Validation(format!("Invalid multipart request: {e}")))?;

    let parsed = parse_testimonial_form(form).await?;
    let stored = ingest_testimonial(&state, parsed).await?;
    tracing::info!(id = ?stored.id, object_key = %stored.image_key, "推薦文を保存");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Testimonial uploaded Successfully".to_string(),
        }),
    ))
}

/// GET /get-testimonial — 全推薦文を画像の署名付きURL付きで返す。
pub async fn handle_get_testimonials(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TestimonialList>, ApiError> {
    let testimonials = find_records::<Testimonial>(state.document_store.as_ref()).await?;
    let enriched = enrich(&state.resolver, testimonials, |t: &Testimonial| {
        t.image_key.as_str()
    })
    .await?;

    Ok(Json(TestimonialList {
        testimonials: enriched
            .into_iter()
            .map(|(testimonial, image_url)| TestimonialEntry {
                testimonial,
                image_url,
            })
            .collect(),
    }))
}
