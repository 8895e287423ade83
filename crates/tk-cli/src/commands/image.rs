use std::path::{Path, PathBuf};

use clap::Subcommand;
use colored::Colorize;
use tk_core::CampaignImage;
use tk_store::Store;

#[derive(Subcommand)]
pub enum ImageAction {
    /// Attach an image file to a campaign
    Add {
        /// Campaign id
        campaign: i64,

        /// Image file
        file: PathBuf,

        /// Display name (default: the file name)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// List a campaign's images
    List {
        /// Campaign id
        campaign: i64,
    },

    /// Write an image back out to a file
    Extract {
        /// Image id
        id: i64,

        /// Output file (default: the image's name in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete an image
    Delete {
        /// Image id
        id: i64,
    },
}

fn human_size(bytes: i64) -> String {
    match bytes {
        b if b >= 1024 * 1024 => format!("{:.1} MiB", b as f64 / (1024.0 * 1024.0)),
        b if b >= 1024 => format!("{:.1} KiB", b as f64 / 1024.0),
        b => format!("{b} B"),
    }
}

pub async fn run(store: &Store, action: ImageAction) -> Result<(), String> {
    match action {
        ImageAction::Add {
            campaign,
            file,
            name,
        } => {
            let data = std::fs::read(&file)
                .map_err(|e| format!("cannot read {}: {e}", file.display()))?;
            let name = name.unwrap_or_else(|| {
                file.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "image".to_string())
            });
            let image = CampaignImage {
                campaign_id: campaign,
                name,
                data,
                ..CampaignImage::default()
            };
            let id = store.add_image(&image).await.map_err(|e| e.to_string())?;
            println!(
                "  {} image {id}: {} ({})",
                "Added".green().bold(),
                image.name,
                human_size(image.data.len() as i64)
            );
        }
        ImageAction::List { campaign } => {
            let images = store.list_images(campaign).await.map_err(|e| e.to_string())?;
            if images.is_empty() {
                println!("  No images.");
                return Ok(());
            }
            let mut table = super::table(&["ID", "Name", "Size", "Added"]);
            for i in &images {
                table.add_row(vec![
                    i.id.to_string(),
                    i.name.clone(),
                    human_size(i.size),
                    i.created_at.clone().unwrap_or_default(),
                ]);
            }
            println!("{table}");
            super::footer(images.len(), "image");
        }
        ImageAction::Extract { id, output } => {
            let image = store.get_image(id).await.map_err(|e| e.to_string())?;
            let path = output.unwrap_or_else(|| {
                let file_name = Path::new(&image.name)
                    .file_name()
                    .map(|n| n.to_os_string())
                    .unwrap_or_else(|| format!("image_{id}").into());
                PathBuf::from(file_name)
            });
            std::fs::write(&path, &image.data)
                .map_err(|e| format!("cannot write {}: {e}", path.display()))?;
            println!("  Wrote {} ({})", path.display(), human_size(image.data.len() as i64));
        }
        ImageAction::Delete { id } => {
            store.delete_image(id).await.map_err(|e| e.to_string())?;
            println!("  {} image {id}", "Deleted".red().bold());
        }
    }
    Ok(())
}
