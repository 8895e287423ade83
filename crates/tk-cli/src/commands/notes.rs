//! Quests, locations, NPCs, and events: the per-campaign notes.

use clap::Subcommand;
use colored::Colorize;
use tk_core::{CampaignEvent, Location, Npc, Quest, QuestStatus};
use tk_store::Store;

#[derive(Subcommand)]
pub enum QuestAction {
    /// Add a quest to a campaign
    Add {
        /// Campaign id
        campaign: i64,

        /// Quest title
        title: String,

        /// Description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Initial status: active, completed, or failed
        #[arg(short, long, default_value = "active")]
        status: QuestStatus,
    },

    /// List a campaign's quests
    List {
        /// Campaign id
        campaign: i64,
    },

    /// Mark a quest active, completed, or failed
    SetStatus {
        /// Quest id
        id: i64,

        /// New status
        status: QuestStatus,
    },

    /// Delete a quest
    Delete {
        /// Quest id
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum LocationAction {
    /// Add a location to a campaign
    Add {
        /// Campaign id
        campaign: i64,

        /// Location name
        name: String,

        /// Description
        #[arg(short, long, default_value = "")]
        description: String,

        /// GM notes
        #[arg(short, long, default_value = "")]
        notes: String,
    },

    /// List a campaign's locations
    List {
        /// Campaign id
        campaign: i64,
    },

    /// Delete a location
    Delete {
        /// Location id
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum NpcAction {
    /// Add an NPC to a campaign
    Add {
        /// Campaign id
        campaign: i64,

        /// NPC name
        name: String,

        /// Description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Relationship to the party (ally, rival, ...)
        #[arg(short, long, default_value = "")]
        relationship: String,

        /// GM notes
        #[arg(short, long, default_value = "")]
        notes: String,
    },

    /// List a campaign's NPCs
    List {
        /// Campaign id
        campaign: i64,
    },

    /// Delete an NPC
    Delete {
        /// NPC id
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum EventAction {
    /// Record an event in a campaign
    Add {
        /// Campaign id
        campaign: i64,

        /// Event title
        title: String,

        /// Description
        #[arg(short, long, default_value = "")]
        description: String,

        /// In-world date
        #[arg(long, default_value = "")]
        date: String,
    },

    /// List a campaign's events, newest first
    List {
        /// Campaign id
        campaign: i64,
    },

    /// Delete an event
    Delete {
        /// Event id
        id: i64,
    },
}

fn added(what: &str, id: i64, name: &str) {
    println!("  {} {what} {id}: {name}", "Added".green().bold());
}

fn deleted(what: &str, id: i64) {
    println!("  {} {what} {id}", "Deleted".red().bold());
}

pub async fn quest(store: &Store, action: QuestAction) -> Result<(), String> {
    match action {
        QuestAction::Add {
            campaign,
            title,
            description,
            status,
        } => {
            let quest = Quest {
                campaign_id: campaign,
                title: title.trim().to_string(),
                description,
                status,
                ..Quest::default()
            };
            let id = store.save_quest(&quest).await.map_err(|e| e.to_string())?;
            added("quest", id, &quest.title);
        }
        QuestAction::List { campaign } => {
            let quests = store.list_quests(campaign).await.map_err(|e| e.to_string())?;
            if quests.is_empty() {
                println!("  No quests.");
                return Ok(());
            }
            let mut table = super::table(&["ID", "Title", "Status", "Description"]);
            for q in &quests {
                let status = match q.status {
                    QuestStatus::Active => q.status.to_string().yellow(),
                    QuestStatus::Completed => q.status.to_string().green(),
                    QuestStatus::Failed => q.status.to_string().red(),
                };
                table.add_row(vec![
                    q.id.unwrap_or_default().to_string(),
                    q.title.clone(),
                    status.to_string(),
                    super::cell(&q.description, 50),
                ]);
            }
            println!("{table}");
            super::footer(quests.len(), "quest");
        }
        QuestAction::SetStatus { id, status } => {
            store
                .set_quest_status(id, status)
                .await
                .map_err(|e| e.to_string())?;
            println!("  Quest {id} is now {status}");
        }
        QuestAction::Delete { id } => {
            store.delete_quest(id).await.map_err(|e| e.to_string())?;
            deleted("quest", id);
        }
    }
    Ok(())
}

pub async fn location(store: &Store, action: LocationAction) -> Result<(), String> {
    match action {
        LocationAction::Add {
            campaign,
            name,
            description,
            notes,
        } => {
            let location = Location {
                campaign_id: campaign,
                name: name.trim().to_string(),
                description,
                notes,
                ..Location::default()
            };
            let id = store
                .save_location(&location)
                .await
                .map_err(|e| e.to_string())?;
            added("location", id, &location.name);
        }
        LocationAction::List { campaign } => {
            let locations = store
                .list_locations(campaign)
                .await
                .map_err(|e| e.to_string())?;
            if locations.is_empty() {
                println!("  No locations.");
                return Ok(());
            }
            let mut table = super::table(&["ID", "Name", "Description", "Notes"]);
            for l in &locations {
                table.add_row(vec![
                    l.id.unwrap_or_default().to_string(),
                    l.name.clone(),
                    super::cell(&l.description, 40),
                    super::cell(&l.notes, 30),
                ]);
            }
            println!("{table}");
            super::footer(locations.len(), "location");
        }
        LocationAction::Delete { id } => {
            store.delete_location(id).await.map_err(|e| e.to_string())?;
            deleted("location", id);
        }
    }
    Ok(())
}

pub async fn npc(store: &Store, action: NpcAction) -> Result<(), String> {
    match action {
        NpcAction::Add {
            campaign,
            name,
            description,
            relationship,
            notes,
        } => {
            let npc = Npc {
                campaign_id: campaign,
                name: name.trim().to_string(),
                description,
                relationship,
                notes,
                ..Npc::default()
            };
            let id = store.save_npc(&npc).await.map_err(|e| e.to_string())?;
            added("NPC", id, &npc.name);
        }
        NpcAction::List { campaign } => {
            let npcs = store.list_npcs(campaign).await.map_err(|e| e.to_string())?;
            if npcs.is_empty() {
                println!("  No NPCs.");
                return Ok(());
            }
            let mut table = super::table(&["ID", "Name", "Relationship", "Description"]);
            for n in &npcs {
                table.add_row(vec![
                    n.id.unwrap_or_default().to_string(),
                    n.name.clone(),
                    super::cell(&n.relationship, 20),
                    super::cell(&n.description, 50),
                ]);
            }
            println!("{table}");
            super::footer(npcs.len(), "NPC");
        }
        NpcAction::Delete { id } => {
            store.delete_npc(id).await.map_err(|e| e.to_string())?;
            deleted("NPC", id);
        }
    }
    Ok(())
}

pub async fn event(store: &Store, action: EventAction) -> Result<(), String> {
    match action {
        EventAction::Add {
            campaign,
            title,
            description,
            date,
        } => {
            let event = CampaignEvent {
                campaign_id: campaign,
                title: title.trim().to_string(),
                description,
                date_in_game: date,
                ..CampaignEvent::default()
            };
            let id = store.save_event(&event).await.map_err(|e| e.to_string())?;
            added("event", id, &event.title);
        }
        EventAction::List { campaign } => {
            let events = store.list_events(campaign).await.map_err(|e| e.to_string())?;
            if events.is_empty() {
                println!("  No events.");
                return Ok(());
            }
            let mut table = super::table(&["ID", "Title", "In-game date", "Description"]);
            for e in &events {
                table.add_row(vec![
                    e.id.unwrap_or_default().to_string(),
                    e.title.clone(),
                    super::cell(&e.date_in_game, 20),
                    super::cell(&e.description, 50),
                ]);
            }
            println!("{table}");
            super::footer(events.len(), "event");
        }
        EventAction::Delete { id } => {
            store.delete_event(id).await.map_err(|e| e.to_string())?;
            deleted("event", id);
        }
    }
    Ok(())
}
