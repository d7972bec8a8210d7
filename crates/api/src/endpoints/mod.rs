//! # APIエンドポイント
//!
//! 全ルートは `/api/users` 配下に公開される。
//! 読み出し系は成功時に200、空のコレクションは空配列で返す。

pub mod brands;
pub mod contact;
pub mod experience;
pub mod skills;
pub mod testimonials;
pub mod works;

#[cfg(test)]
pub(crate) mod test_helpers;


pub use brands::handle_get_brands;
pub use contact::handle_contact_me;
pub use experience::handle_get_experience;
pub use skills::handle_get_skills;
pub use testimonials::{handle_get_testimonials, handle_upload_testimonial};
pub use works::handle_project_works;

use crate::error::ApiError;

/// 必須フィールド欠落時のメッセージ
pub const MISSING_FIELDS_MESSAGE: &str = "All fields are required!";

/// 必須テキストフィールドを取り出す。未設定・空白のみは検証エラー。
pub(crate) fn require_field(value: Option<String>) -> Result<String, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::Validation(MISSING_FIELDS_MESSAGE.to_string()))
}
