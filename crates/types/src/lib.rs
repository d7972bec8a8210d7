//! # Portfolio 共有型定義
//!
//! ドキュメントストアに保存されるエンティティと、HTTP APIのリクエスト/レスポンス型を
//! Rust構造体として提供する。
//!
//! ## フィールド名の規則
//! 既存データベースおよびフロントエンドとの互換性のため、保存時・JSON出力時の
//! フィールド名は既存のもの（`Name`, `bgColor`, `ImageUrl` 等）をそのまま使用する。
//!
//! ## アセットキー
//! 画像を持つエンティティは、オブジェクトストアのキー（不透明な文字列）のみを保存する。
//! 署名付きURLは読み出し時に毎回生成され、保存されることはない。

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// エンティティ種別
// ---------------------------------------------------------------------------

/// ドキュメントストアに保存されるエンティティの種別。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Skill,
    Testimonial,
    WorkExperience,
    Work,
    Brand,
    ContactMessage,
}

impl EntityKind {
    /// ドキュメントストア上のコレクション名。
    /// 既存データベースで使用されている複数形・小文字の名前に合わせる。
    pub fn collection_name(self) -> &'static str {
        match self {
            EntityKind::Skill => "skills",
            EntityKind::Testimonial => "testimonials",
            EntityKind::WorkExperience => "workexperiences",
            EntityKind::Work => "works",
            EntityKind::Brand => "brands",
            EntityKind::ContactMessage => "contacts",
        }
    }

    /// 挿入時に `created_at` / `updated_at` を付与するか。
    pub fn has_timestamps(self) -> bool {
        matches!(
            self,
            EntityKind::Skill | EntityKind::WorkExperience | EntityKind::ContactMessage
        )
    }
}

/// ドキュメントストアに保存可能なレコード。
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// このレコードが属するエンティティ種別
    const KIND: EntityKind;
}

// ---------------------------------------------------------------------------
// エンティティ
// ---------------------------------------------------------------------------

/// スキル。アイコン画像をアセットとして持つ。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skill {
    /// ドキュメントID（16進文字列）。挿入前はNone。
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// スキル名
    #[serde(rename = "Name")]
    pub name: String,
    /// 表示用の背景色
    #[serde(rename = "bgColor")]
    pub bg_color: String,
    /// アイコン画像のオブジェクトキー
    #[serde(rename = "Icon")]
    pub icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Skill {
    const KIND: EntityKind = EntityKind::Skill;
}

/// 推薦文。投稿者の画像をアセットとして持つ。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Testimonial {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// 投稿者名
    pub name: String,
    /// 投稿者の所属企業
    #[serde(rename = "Company")]
    pub company: String,
    /// 推薦文本文
    #[serde(rename = "Feedback")]
    pub feedback: String,
    /// 投稿者画像のオブジェクトキー
    #[serde(rename = "ImageUrl")]
    pub image_key: String,
}

impl Entity for Testimonial {
    const KIND: EntityKind = EntityKind::Testimonial;
}

/// 職歴。アセットを持たない。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkExperience {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// 役職名
    #[serde(rename = "workName")]
    pub work_name: String,
    #[serde(rename = "CompanyName")]
    pub company_name: String,
    #[serde(rename = "Details")]
    pub details: String,
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for WorkExperience {
    const KIND: EntityKind = EntityKind::WorkExperience;
}

/// 制作物（プロジェクト）。サムネイル画像をアセットとして持つ。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Work {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    /// 公開先URL
    #[serde(rename = "projectLink")]
    pub project_link: String,
    /// ソースコードのURL
    #[serde(rename = "codeLink")]
    pub code_link: String,
    /// サムネイル画像のオブジェクトキー
    #[serde(rename = "imageUrl")]
    pub image_key: String,
    /// フィルタ用タグ。未設定の場合は `["All"]`。
    pub tags: Vec<String>,
}

impl Default for Work {
    fn default() -> Self {
        Self {
            id: None,
            title: String::new(),
            description: String::new(),
            project_link: String::new(),
            code_link: String::new(),
            image_key: String::new(),
            tags: vec![DEFAULT_WORK_TAG.to_string()],
        }
    }
}

/// `Work.tags` の既定値
pub const DEFAULT_WORK_TAG: &str = "All";

impl Entity for Work {
    const KIND: EntityKind = EntityKind::Work;
}

/// ブランドロゴ。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Brand {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    /// ロゴ画像のオブジェクトキー
    #[serde(rename = "ImageUrl")]
    pub image_key: String,
}

impl Entity for Brand {
    const KIND: EntityKind = EntityKind::Brand;
}

/// 訪問者からの問い合わせ。書き込み専用で、APIから読み出されることはない。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactMessage {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for ContactMessage {
    const KIND: EntityKind = EntityKind::ContactMessage;
}

// ---------------------------------------------------------------------------
// リクエスト型
// ---------------------------------------------------------------------------

/// POST /contact-me のリクエストボディ。
/// 必須チェックはハンドラで行うため、全フィールドをOptionで受ける。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// レスポンス型
// ---------------------------------------------------------------------------

/// 書き込み系エンドポイントおよびエラー時の共通レスポンス。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// GET /project-works の1要素。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub project: Work,
    /// サムネイル画像の署名付きURL
    #[serde(rename = "photoUrl")]
    pub photo_url: String,
}

/// GET /project-works のレスポンス。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectList {
    #[serde(rename = "ProjectArray")]
    pub projects: Vec<ProjectEntry>,
}

/// GET /get-testimonial の1要素。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestimonialEntry {
    pub testimonial: Testimonial,
    #[serde(rename = "ImageUrl")]
    pub image_url: String,
}

/// GET /get-testimonial のレスポンス。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestimonialList {
    #[serde(rename = "testimonialArray")]
    pub testimonials: Vec<TestimonialEntry>,
}

/// GET /get-brands の1要素。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandEntry {
    pub brand: Brand,
    #[serde(rename = "ImageUrl")]
    pub image_url: String,
}

/// GET /get-brands のレスポンス。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandList {
    #[serde(rename = "brandsArray")]
    pub brands: Vec<BrandEntry>,
}

/// GET /get-skills の1要素。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillEntry {
    pub skill: Skill,
    /// アイコン画像の署名付きURL
    #[serde(rename = "Icon")]
    pub icon_url: String,
}

/// GET /get-skills のレスポンス。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillList {
    #[serde(rename = "skillArray")]
    pub skills: Vec<SkillEntry>,
}

// ---------------------------------------------------------------------------
// テスト
// ---------------------------------------------------------------------------
