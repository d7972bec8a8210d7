//! # Portfolio CLI
//!
//! 公開APIに書き込み経路がないエンティティ（スキル・制作物・ブランド・職歴）を登録する管理用CLI。
//! APIサーバーと同じ環境変数で接続し、画像付きのエンティティは
//! 推薦文の投稿と同じ「アップロード→保存」の流れで登録する。

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use portfolio_api::assets::AssetUpload;
use portfolio_api::config::{ApiConfig, AppState};
use portfolio_api::db::{insert_record, MongoDocumentStore};
use portfolio_api::storage::S3ObjectStore;
use portfolio_types::{Brand, Skill, Work, WorkExperience, DEFAULT_WORK_TAG};

#[derive(Parser, Debug)]
#[command(name = "portfolio-cli", version, about = "Portfolio backend admin CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// スキルをアイコン画像付きで登録する
    AddSkill {
        #[arg(long)]
        name: String,
        /// 表示用の背景色（例: "#dea584"）
        #[arg(long)]
        bg_color: String,
        /// アイコン画像ファイル
        #[arg(long)]
        icon: PathBuf,
    },
    /// 制作物をサムネイル画像付きで登録する
    AddWork {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        project_link: String,
        #[arg(long)]
        code_link: String,
        /// サムネイル画像ファイル
        #[arg(long)]
        image: PathBuf,
        /// タグ（複数指定可、未指定時は "All"）
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// ブランドをロゴ画像付きで登録する
    AddBrand {
        #[arg(long)]
        name: String,
        /// ロゴ画像ファイル
        #[arg(long)]
        image: PathBuf,
    },
    /// 職歴を登録する
    AddExperience {
        #[arg(long)]
        work_name: String,
        #[arg(long)]
        company_name: String,
        #[arg(long)]
        details: String,
        #[arg(long)]
        year: String,
    },
}

/// 拡張子から画像のContent-Typeを推定する。
fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

async fn read_asset(path: &Path) -> anyhow::Result<AssetUpload> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("画像ファイルの読み込みに失敗: {}", path.display()))?;
    if bytes.is_empty() {
        bail!("画像ファイルが空です: {}", path.display());
    }
    Ok(AssetUpload {
        bytes,
        content_type: content_type_for(path).to_string(),
    })
}

/// 空白のみの引数を拒否する。
fn non_blank(label: &str, value: String) -> anyhow::Result<String> {
    if value.trim().is_empty() {
        bail!("{label} は空にできません");
    }
    Ok(value)
}

fn work_tags(tags: Vec<String>) -> Vec<String> {
    let tags: Vec<String> = tags.into_iter().filter(|t| !t.trim().is_empty()).collect();
    if tags.is_empty() {
        vec![DEFAULT_WORK_TAG.to_string()]
    } else {
        tags
    }
}

async fn run(state: &AppState, command: Command) -> anyhow::Result<String> {
    let output = match command {
        Command::AddSkill {
            name,
            bg_color,
            icon,
        } => {
            let name = non_blank("--name", name)?;
            let asset = read_asset(&icon).await?;
            let skill = state
                .store_asset_and_insert(asset, |icon| Skill {
                    name,
                    bg_color,
                    icon,
                    ..Default::default()
                })
                .await?;
            serde_json::to_string_pretty(&skill)?
        }
        Command::AddWork {
            title,
            description,
            project_link,
            code_link,
            image,
            tags,
        } => {
            let title = non_blank("--title", title)?;
            let asset = read_asset(&image).await?;
            let work = state
                .store_asset_and_insert(asset, |image_key| Work {
                    id: None,
                    title,
                    description,
                    project_link,
                    code_link,
                    image_key,
                    tags: work_tags(tags),
                })
                .await?;
            serde_json::to_string_pretty(&work)?
        }
        Command::AddBrand { name, image } => {
            let name = non_blank("--name", name)?;
            let asset = read_asset(&image).await?;
            let brand = state
                .store_asset_and_insert(asset, |image_key| Brand {
                    id: None,
                    name,
                    image_key,
                })
                .await?;
            serde_json::to_string_pretty(&brand)?
        }
        Command::AddExperience {
            work_name,
            company_name,
            details,
            year,
        } => {
            let experience = WorkExperience {
                work_name: non_blank("--work-name", work_name)?,
                company_name: non_blank("--company-name", company_name)?,
                details,
                year: non_blank("--year", year)?,
                ..Default::default()
            };
            let stored = insert_record(state.document_store.as_ref(), &experience).await?;
            serde_json::to_string_pretty(&stored)?
        }
    };
    Ok(output)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let dotenv = dotenvy::dotenv();
    portfolio_api::init_tracing();
    portfolio_api::report_dotenv(dotenv)?;

    let config = ApiConfig::from_env()?;
    let object_store = S3ObjectStore::from_config(&config.object_store)?;
    let document_store = MongoDocumentStore::connect(&config.document_store).await?;
    let state = AppState::new(
        Arc::new(object_store),
        Arc::new(document_store),
        config.presign_expiry_secs,
    );

    let output = run(&state, cli.command).await?;
    tracing::info!("登録が完了しました");
    println!("{output}");

    Ok(())
}
