//! Campaign notes: quests, locations, NPCs, in-game events, and images.
//!
//! Every note belongs to exactly one campaign and is removed with it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

fn require(value: &str, what: &str) -> CoreResult<()> {
    if value.trim().is_empty() {
        Err(CoreError::Validation(format!("{what} is required")))
    } else {
        Ok(())
    }
}

/// A campaign, the root of all notes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Campaign {
    /// Row id, `None` until first saved.
    pub id: Option<i64>,
    /// Campaign name (required).
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Creation timestamp as stored.
    pub created_at: Option<String>,
}

impl Campaign {
    /// A new unsaved campaign.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    /// Check required fields.
    pub fn validate(&self) -> CoreResult<()> {
        require(&self.name, "campaign name")
    }
}

/// Progress of a quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    /// Still open.
    #[default]
    Active,
    /// Finished successfully.
    Completed,
    /// Abandoned or lost.
    Failed,
}

impl QuestStatus {
    /// Stored text form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for QuestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "completed" | "done" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(CoreError::UnknownQuestStatus(s.to_string())),
        }
    }
}

/// A quest tracked within a campaign.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Quest {
    /// Row id, `None` until first saved.
    pub id: Option<i64>,
    /// Owning campaign.
    pub campaign_id: i64,
    /// Quest title (required).
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Current status.
    pub status: QuestStatus,
}

impl Quest {
    /// Check required fields.
    pub fn validate(&self) -> CoreResult<()> {
        require(&self.title, "quest title")
    }
}

/// A place in the campaign world.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Location {
    /// Row id, `None` until first saved.
    pub id: Option<i64>,
    /// Owning campaign.
    pub campaign_id: i64,
    /// Location name (required).
    pub name: String,
    /// Description shown to players.
    pub description: String,
    /// GM notes.
    pub notes: String,
}

impl Location {
    /// Check required fields.
    pub fn validate(&self) -> CoreResult<()> {
        require(&self.name, "location name")
    }
}

/// A non-player character.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Npc {
    /// Row id, `None` until first saved.
    pub id: Option<i64>,
    /// Owning campaign.
    pub campaign_id: i64,
    /// NPC name (required).
    pub name: String,
    /// Description.
    pub description: String,
    /// Relationship to the party ("ally", "rival", ...).
    pub relationship: String,
    /// GM notes.
    pub notes: String,
}

impl Npc {
    /// Check required fields.
    pub fn validate(&self) -> CoreResult<()> {
        require(&self.name, "NPC name")
    }
}

/// Something that happened in the campaign's story.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CampaignEvent {
    /// Row id, `None` until first saved.
    pub id: Option<i64>,
    /// Owning campaign.
    pub campaign_id: i64,
    /// Event title (required).
    pub title: String,
    /// Description.
    pub description: String,
    /// In-world date, free text.
    pub date_in_game: String,
    /// Creation timestamp as stored.
    pub created_at: Option<String>,
}

impl CampaignEvent {
    /// Check required fields.
    pub fn validate(&self) -> CoreResult<()> {
        require(&self.title, "event title")
    }
}

/// An image attached to a campaign (maps, handouts, portraits).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CampaignImage {
    /// Row id, `None` until first saved.
    pub id: Option<i64>,
    /// Owning campaign.
    pub campaign_id: i64,
    /// Display name, usually the original file name (required).
    pub name: String,
    /// Raw image bytes.
    pub data: Vec<u8>,
}

impl CampaignImage {
    /// Check required fields.
    pub fn validate(&self) -> CoreResult<()> {
        require(&self.name, "image name")?;
        if self.data.is_empty() {
            return Err(CoreError::Validation("image data is empty".into()));
        }
        Ok(())
    }
}

/// Image metadata without the payload, for listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    /// Row id.
    pub id: i64,
    /// Owning campaign.
    pub campaign_id: i64,
    /// Display name.
    pub name: String,
    /// Payload size in bytes.
    pub size: i64,
    /// Creation timestamp as stored.
    pub created_at: Option<String>,
}
