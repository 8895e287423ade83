use clap::Subcommand;
use colored::Colorize;
use tk_core::Campaign;
use tk_store::Store;

#[derive(Subcommand)]
pub enum CampaignAction {
    /// Create a campaign
    New {
        /// Campaign name
        name: String,

        /// Short description
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// List all campaigns
    List,

    /// Show a campaign and everything recorded in it
    Show {
        /// Campaign id
        id: i64,
    },

    /// Rename or redescribe a campaign
    Edit {
        /// Campaign id
        id: i64,

        /// New name
        #[arg(short, long)]
        name: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete a campaign and all of its notes
    Delete {
        /// Campaign id
        id: i64,
    },
}

pub async fn run(store: &Store, action: CampaignAction) -> Result<(), String> {
    match action {
        CampaignAction::New { name, description } => {
            let id = store
                .create_campaign(&Campaign::new(name.trim(), description))
                .await
                .map_err(|e| e.to_string())?;
            println!("  {} campaign {id}: {}", "Created".green().bold(), name.trim());
        }
        CampaignAction::List => list(store).await?,
        CampaignAction::Show { id } => show(store, id).await?,
        CampaignAction::Edit {
            id,
            name,
            description,
        } => {
            let mut campaign = store.get_campaign(id).await.map_err(|e| e.to_string())?;
            if let Some(name) = name {
                campaign.name = name.trim().to_string();
            }
            if let Some(description) = description {
                campaign.description = description;
            }
            store
                .update_campaign(&campaign)
                .await
                .map_err(|e| e.to_string())?;
            println!("  {} campaign {id}", "Updated".green().bold());
        }
        CampaignAction::Delete { id } => {
            store.delete_campaign(id).await.map_err(|e| e.to_string())?;
            println!("  {} campaign {id}", "Deleted".red().bold());
        }
    }
    Ok(())
}

async fn list(store: &Store) -> Result<(), String> {
    let campaigns = store.list_campaigns().await.map_err(|e| e.to_string())?;
    if campaigns.is_empty() {
        println!("  No campaigns yet. Create one with `tk campaign new <name>`.");
        return Ok(());
    }

    let mut table = super::table(&["ID", "Name", "Description", "Created"]);
    for c in &campaigns {
        table.add_row(vec![
            c.id.unwrap_or_default().to_string(),
            c.name.clone(),
            super::cell(&c.description, 50),
            c.created_at.clone().unwrap_or_default(),
        ]);
    }
    println!("{table}");
    super::footer(campaigns.len(), "campaign");
    Ok(())
}

async fn show(store: &Store, id: i64) -> Result<(), String> {
    let campaign = store.get_campaign(id).await.map_err(|e| e.to_string())?;
    let err = |e: tk_store::StoreError| e.to_string();

    println!("  {} [campaign {id}]", campaign.name.bold());
    if !campaign.description.trim().is_empty() {
        println!();
        for line in campaign.description.lines() {
            println!("  {}", line.trim());
        }
    }
    println!();

    let quests = store.list_quests(id).await.map_err(err)?;
    let characters = store.list_characters(Some(id)).await.map_err(err)?;
    let locations = store.list_locations(id).await.map_err(err)?;
    let npcs = store.list_npcs(id).await.map_err(err)?;
    let events = store.list_events(id).await.map_err(err)?;
    let images = store.list_images(id).await.map_err(err)?;

    if !characters.is_empty() {
        println!("  {}", "Characters".underline());
        for c in &characters {
            println!(
                "    {} - level {} {} {} (HP {}/{})",
                c.name, c.level, c.race, c.class, c.hp_current, c.hp_max
            );
        }
        println!();
    }
    if !quests.is_empty() {
        println!("  {}", "Quests".underline());
        for q in &quests {
            println!("    [{}] {}", q.status, q.title);
        }
        println!();
    }
    if !locations.is_empty() {
        println!("  {}", "Locations".underline());
        for l in &locations {
            println!("    {}", l.name);
        }
        println!();
    }
    if !npcs.is_empty() {
        println!("  {}", "NPCs".underline());
        for n in &npcs {
            if n.relationship.is_empty() {
                println!("    {}", n.name);
            } else {
                println!("    {} ({})", n.name, n.relationship);
            }
        }
        println!();
    }
    if !events.is_empty() {
        println!("  {}", "Events".underline());
        for e in &events {
            println!("    {}", e.title);
        }
        println!();
    }
    println!(
        "  {} characters, {} quests, {} locations, {} NPCs, {} events, {} images",
        characters.len(),
        quests.len(),
        locations.len(),
        npcs.len(),
        events.len(),
        images.len()
    );
    Ok(())
}
