//! Campaigns and their notes: quests, locations, NPCs, events, and images.
//!
//! Notes belong to one campaign and are deleted with it. Saving a note
//! inserts it when its id is `None` and updates the existing row otherwise.

use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use tk_core::{
    Campaign, CampaignEvent, CampaignImage, CoreError, ImageInfo, Location, Npc, Quest,
    QuestStatus,
};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::rows::{opt_text, text};
use crate::Store;

fn campaign_from_row(row: &SqliteRow) -> StoreResult<Campaign> {
    Ok(Campaign {
        id: Some(row.try_get("id")?),
        name: text(row, "name")?,
        description: text(row, "description")?,
        created_at: opt_text(row, "created_at")?,
    })
}

fn quest_from_row(row: &SqliteRow) -> StoreResult<Quest> {
    let status = text(row, "status")?;
    Ok(Quest {
        id: Some(row.try_get("id")?),
        campaign_id: row.try_get("campaign_id")?,
        title: text(row, "title")?,
        description: text(row, "description")?,
        status: status.parse().unwrap_or_default(),
    })
}

fn location_from_row(row: &SqliteRow) -> StoreResult<Location> {
    Ok(Location {
        id: Some(row.try_get("id")?),
        campaign_id: row.try_get("campaign_id")?,
        name: text(row, "name")?,
        description: text(row, "description")?,
        notes: text(row, "notes")?,
    })
}

fn npc_from_row(row: &SqliteRow) -> StoreResult<Npc> {
    Ok(Npc {
        id: Some(row.try_get("id")?),
        campaign_id: row.try_get("campaign_id")?,
        name: text(row, "name")?,
        description: text(row, "description")?,
        relationship: text(row, "relationship")?,
        notes: text(row, "notes")?,
    })
}

fn event_from_row(row: &SqliteRow) -> StoreResult<CampaignEvent> {
    Ok(CampaignEvent {
        id: Some(row.try_get("id")?),
        campaign_id: row.try_get("campaign_id")?,
        title: text(row, "title")?,
        description: text(row, "description")?,
        date_in_game: text(row, "date_in_game")?,
        created_at: opt_text(row, "created_at")?,
    })
}

fn updated(table: &'static str, id: i64, rows_affected: u64) -> StoreResult<i64> {
    if rows_affected == 0 {
        Err(StoreError::NotFound { table, id })
    } else {
        Ok(id)
    }
}

impl Store {
    // =========================================================================
    // Campaigns
    // =========================================================================

    /// Insert a new campaign and return its id.
    pub async fn create_campaign(&self, campaign: &Campaign) -> StoreResult<i64> {
        campaign.validate()?;
        let result = sqlx::query("INSERT INTO campaigns (name, description) VALUES (?, ?)")
            .bind(campaign.name.trim())
            .bind(&campaign.description)
            .execute(self.pool())
            .await?;
        let id = result.last_insert_rowid();
        debug!(id, name = %campaign.name, "created campaign");
        Ok(id)
    }

    /// Update a saved campaign's name and description.
    pub async fn update_campaign(&self, campaign: &Campaign) -> StoreResult<()> {
        campaign.validate()?;
        let id = campaign
            .id
            .ok_or_else(|| CoreError::Validation("campaign has not been saved yet".into()))?;
        let result = sqlx::query("UPDATE campaigns SET name = ?, description = ? WHERE id = ?")
            .bind(campaign.name.trim())
            .bind(&campaign.description)
            .bind(id)
            .execute(self.pool())
            .await?;
        updated("campaigns", id, result.rows_affected()).map(|_| ())
    }

    /// Fetch one campaign.
    pub async fn get_campaign(&self, id: i64) -> StoreResult<Campaign> {
        let row = sqlx::query("SELECT * FROM campaigns WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or(StoreError::NotFound {
                table: "campaigns",
                id,
            })?;
        campaign_from_row(&row)
    }

    /// All campaigns, by name.
    pub async fn list_campaigns(&self) -> StoreResult<Vec<Campaign>> {
        let rows = sqlx::query("SELECT * FROM campaigns ORDER BY name COLLATE NOCASE, id")
            .fetch_all(self.pool())
            .await?;
        rows.iter().map(campaign_from_row).collect()
    }

    /// Delete a campaign and its notes. Its characters are kept, unassigned.
    pub async fn delete_campaign(&self, id: i64) -> StoreResult<()> {
        self.delete_row("campaigns", id).await
    }

    // =========================================================================
    // Quests
    // =========================================================================

    /// Insert or update a quest and return its id.
    pub async fn save_quest(&self, quest: &Quest) -> StoreResult<i64> {
        quest.validate()?;
        self.ensure_exists("campaigns", quest.campaign_id).await?;
        match quest.id {
            None => {
                let result = sqlx::query(
                    "INSERT INTO quests (campaign_id, title, description, status) VALUES (?, ?, ?, ?)",
                )
                .bind(quest.campaign_id)
                .bind(quest.title.trim())
                .bind(&quest.description)
                .bind(quest.status.as_str())
                .execute(self.pool())
                .await?;
                Ok(result.last_insert_rowid())
            }
            Some(id) => {
                let result = sqlx::query(
                    r#"
                    UPDATE quests
                    SET campaign_id = ?, title = ?, description = ?, status = ?,
                        updated_at = datetime('now')
                    WHERE id = ?
                    "#,
                )
                .bind(quest.campaign_id)
                .bind(quest.title.trim())
                .bind(&quest.description)
                .bind(quest.status.as_str())
                .bind(id)
                .execute(self.pool())
                .await?;
                updated("quests", id, result.rows_affected())
            }
        }
    }

    /// Quests of one campaign, active first, then by title.
    pub async fn list_quests(&self, campaign_id: i64) -> StoreResult<Vec<Quest>> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM quests WHERE campaign_id = ?
            ORDER BY CASE status WHEN 'active' THEN 0 ELSE 1 END, title COLLATE NOCASE
            "#,
        )
        .bind(campaign_id)
        .fetch_all(self.pool())
        .await?;
        rows.iter().map(quest_from_row).collect()
    }

    /// Change a quest's status.
    pub async fn set_quest_status(&self, id: i64, status: QuestStatus) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE quests SET status = ?, updated_at = datetime('now') WHERE id = ?",
        )
        .bind(status.as_str())
        .bind(id)
        .execute(self.pool())
        .await?;
        updated("quests", id, result.rows_affected()).map(|_| ())
    }

    /// Delete a quest.
    pub async fn delete_quest(&self, id: i64) -> StoreResult<()> {
        self.delete_row("quests", id).await
    }

    // =========================================================================
    // Locations
    // =========================================================================

    /// Insert or update a location and return its id.
    pub async fn save_location(&self, location: &Location) -> StoreResult<i64> {
        location.validate()?;
        self.ensure_exists("campaigns", location.campaign_id).await?;
        match location.id {
            None => {
                let result = sqlx::query(
                    "INSERT INTO locations (campaign_id, name, description, notes) VALUES (?, ?, ?, ?)",
                )
                .bind(location.campaign_id)
                .bind(location.name.trim())
                .bind(&location.description)
                .bind(&location.notes)
                .execute(self.pool())
                .await?;
                Ok(result.last_insert_rowid())
            }
            Some(id) => {
                let result = sqlx::query(
                    "UPDATE locations SET campaign_id = ?, name = ?, description = ?, notes = ? WHERE id = ?",
                )
                .bind(location.campaign_id)
                .bind(location.name.trim())
                .bind(&location.description)
                .bind(&location.notes)
                .bind(id)
                .execute(self.pool())
                .await?;
                updated("locations", id, result.rows_affected())
            }
        }
    }

    /// Locations of one campaign, by name.
    pub async fn list_locations(&self, campaign_id: i64) -> StoreResult<Vec<Location>> {
        let rows = sqlx::query(
            "SELECT * FROM locations WHERE campaign_id = ? ORDER BY name COLLATE NOCASE",
        )
        .bind(campaign_id)
        .fetch_all(self.pool())
        .await?;
        rows.iter().map(location_from_row).collect()
    }

    /// Delete a location.
    pub async fn delete_location(&self, id: i64) -> StoreResult<()> {
        self.delete_row("locations", id).await
    }

    // =========================================================================
    // NPCs
    // =========================================================================

    /// Insert or update an NPC and return its id.
    pub async fn save_npc(&self, npc: &Npc) -> StoreResult<i64> {
        npc.validate()?;
        self.ensure_exists("campaigns", npc.campaign_id).await?;
        match npc.id {
            None => {
                let result = sqlx::query(
                    r#"
                    INSERT INTO npcs (campaign_id, name, description, relationship, notes)
                    VALUES (?, ?, ?, ?, ?)
                    "#,
                )
                .bind(npc.campaign_id)
                .bind(npc.name.trim())
                .bind(&npc.description)
                .bind(&npc.relationship)
                .bind(&npc.notes)
                .execute(self.pool())
                .await?;
                Ok(result.last_insert_rowid())
            }
            Some(id) => {
                let result = sqlx::query(
                    r#"
                    UPDATE npcs
                    SET campaign_id = ?, name = ?, description = ?, relationship = ?, notes = ?
                    WHERE id = ?
                    "#,
                )
                .bind(npc.campaign_id)
                .bind(npc.name.trim())
                .bind(&npc.description)
                .bind(&npc.relationship)
                .bind(&npc.notes)
                .bind(id)
                .execute(self.pool())
                .await?;
                updated("npcs", id, result.rows_affected())
            }
        }
    }

    /// NPCs of one campaign, by name.
    pub async fn list_npcs(&self, campaign_id: i64) -> StoreResult<Vec<Npc>> {
        let rows =
            sqlx::query("SELECT * FROM npcs WHERE campaign_id = ? ORDER BY name COLLATE NOCASE")
                .bind(campaign_id)
                .fetch_all(self.pool())
                .await?;
        rows.iter().map(npc_from_row).collect()
    }

    /// Delete an NPC.
    pub async fn delete_npc(&self, id: i64) -> StoreResult<()> {
        self.delete_row("npcs", id).await
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Insert or update an event and return its id.
    pub async fn save_event(&self, event: &CampaignEvent) -> StoreResult<i64> {
        event.validate()?;
        self.ensure_exists("campaigns", event.campaign_id).await?;
        match event.id {
            None => {
                let result = sqlx::query(
                    r#"
                    INSERT INTO events (campaign_id, title, description, date_in_game)
                    VALUES (?, ?, ?, ?)
                    "#,
                )
                .bind(event.campaign_id)
                .bind(event.title.trim())
                .bind(&event.description)
                .bind(&event.date_in_game)
                .execute(self.pool())
                .await?;
                Ok(result.last_insert_rowid())
            }
            Some(id) => {
                let result = sqlx::query(
                    r#"
                    UPDATE events
                    SET campaign_id = ?, title = ?, description = ?, date_in_game = ?
                    WHERE id = ?
                    "#,
                )
                .bind(event.campaign_id)
                .bind(event.title.trim())
                .bind(&event.description)
                .bind(&event.date_in_game)
                .bind(id)
                .execute(self.pool())
                .await?;
                updated("events", id, result.rows_affected())
            }
        }
    }

    /// Events of one campaign, newest first.
    pub async fn list_events(&self, campaign_id: i64) -> StoreResult<Vec<CampaignEvent>> {
        let rows = sqlx::query(
            "SELECT * FROM events WHERE campaign_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(campaign_id)
        .fetch_all(self.pool())
        .await?;
        rows.iter().map(event_from_row).collect()
    }

    /// Delete an event.
    pub async fn delete_event(&self, id: i64) -> StoreResult<()> {
        self.delete_row("events", id).await
    }

    // =========================================================================
    // Images
    // =========================================================================

    /// Attach an image to a campaign and return its id.
    pub async fn add_image(&self, image: &CampaignImage) -> StoreResult<i64> {
        image.validate()?;
        self.ensure_exists("campaigns", image.campaign_id).await?;
        let result =
            sqlx::query("INSERT INTO campaign_images (campaign_id, name, data) VALUES (?, ?, ?)")
                .bind(image.campaign_id)
                .bind(image.name.trim())
                .bind(&image.data)
                .execute(self.pool())
                .await?;
        let id = result.last_insert_rowid();
        debug!(id, bytes = image.data.len(), "stored image");
        Ok(id)
    }

    /// Image metadata for one campaign, without the payloads.
    pub async fn list_images(&self, campaign_id: i64) -> StoreResult<Vec<ImageInfo>> {
        let rows = sqlx::query(
            r#"
            SELECT id, campaign_id, name, length(data) AS size, created_at
            FROM campaign_images WHERE campaign_id = ? ORDER BY id
            "#,
        )
        .bind(campaign_id)
        .fetch_all(self.pool())
        .await?;
        rows.iter()
            .map(|row| {
                Ok(ImageInfo {
                    id: row.try_get("id")?,
                    campaign_id: row.try_get("campaign_id")?,
                    name: text(row, "name")?,
                    size: row.try_get::<Option<i64>, _>("size")?.unwrap_or(0),
                    created_at: opt_text(row, "created_at")?,
                })
            })
            .collect()
    }

    /// One image with its payload.
    pub async fn get_image(&self, id: i64) -> StoreResult<CampaignImage> {
        let row = sqlx::query("SELECT id, campaign_id, name, data FROM campaign_images WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or(StoreError::NotFound {
                table: "campaign_images",
                id,
            })?;
        Ok(CampaignImage {
            id: Some(row.try_get("id")?),
            campaign_id: row.try_get("campaign_id")?,
            name: text(&row, "name")?,
            data: row.try_get("data")?,
        })
    }

    /// Delete an image.
    pub async fn delete_image(&self, id: i64) -> StoreResult<()> {
        self.delete_row("campaign_images", id).await
    }
}
