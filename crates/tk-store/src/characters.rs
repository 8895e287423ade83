//! Character sheet persistence.
//!
//! Structured sheet attributes (ability scores, proficiencies, features,
//! equipment, currency, spells) are stored as JSON text and parsed back
//! into their typed forms on read.

use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use tk_core::{
    Ability, AbilityScores, Blob, Character, CoreError, Currency, Skill, SpellList, SpellSlots,
};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::rows::{int, opt_text, text};
use crate::Store;

fn character_from_row(row: &SqliteRow) -> StoreResult<Character> {
    Ok(Character {
        id: Some(row.try_get("id")?),
        campaign_id: row.try_get("campaign_id")?,
        name: text(row, "name")?,
        player_name: text(row, "player_name")?,
        race: text(row, "race")?,
        class: text(row, "class")?,
        subclass: text(row, "subclass")?,
        level: int(row, "level", 1)?,
        background: text(row, "background")?,
        alignment: text(row, "alignment")?,
        xp: row.try_get::<Option<i64>, _>("xp")?.unwrap_or(0),
        ability_scores: AbilityScores::parse_blob(&text(row, "ability_scores")?)?,
        save_proficiencies: Vec::<Ability>::parse_blob(&text(row, "save_profs")?)?,
        skill_proficiencies: Vec::<Skill>::parse_blob(&text(row, "skill_profs")?)?,
        hp_max: int(row, "hp_max", 0)?,
        hp_current: int(row, "hp_current", 0)?,
        hp_temp: int(row, "hp_temp", 0)?,
        armor_class: int(row, "ac", 10)?,
        speed: int(row, "speed", 30)?,
        initiative_bonus: int(row, "initiative_bonus", 0)?,
        features: Vec::<String>::parse_blob(&text(row, "features")?)?,
        equipment: Vec::<String>::parse_blob(&text(row, "equipment")?)?,
        currency: Currency::parse_blob(&text(row, "currency")?)?,
        spells: SpellList::parse_blob(&text(row, "spells")?)?,
        spell_slots: SpellSlots::parse_blob(&text(row, "spell_slots")?)?,
        notes: text(row, "notes")?,
        created_at: opt_text(row, "created_at")?,
        updated_at: opt_text(row, "updated_at")?,
    })
}

/// The blob columns of a sheet, encoded once for either statement.
struct EncodedBlobs {
    ability_scores: String,
    save_profs: String,
    skill_profs: String,
    features: String,
    equipment: String,
    currency: String,
    spells: String,
    spell_slots: String,
}

impl EncodedBlobs {
    fn of(c: &Character) -> Result<Self, CoreError> {
        Ok(Self {
            ability_scores: c.ability_scores.to_blob()?,
            save_profs: c.save_proficiencies.to_blob()?,
            skill_profs: c.skill_proficiencies.to_blob()?,
            features: c.features.to_blob()?,
            equipment: c.equipment.to_blob()?,
            currency: c.currency.to_blob()?,
            spells: c.spells.to_blob()?,
            spell_slots: c.spell_slots.to_blob()?,
        })
    }
}

impl Store {
    /// Insert or update a character sheet and return its id.
    ///
    /// Current hit points are clamped to `[0, hp_max]` before writing.
    pub async fn save_character(&self, character: &Character) -> StoreResult<i64> {
        character.validate()?;
        if let Some(campaign_id) = character.campaign_id {
            self.ensure_exists("campaigns", campaign_id).await?;
        }
        let blobs = EncodedBlobs::of(character)?;
        let hp_current = character.hp_current.clamp(0, character.hp_max);

        let sql = match character.id {
            None => {
                r#"
                INSERT INTO characters
                    (campaign_id, name, player_name, race, class, subclass, level, background,
                     alignment, xp, ability_scores, save_profs, skill_profs, hp_max, hp_current,
                     hp_temp, ac, speed, initiative_bonus, features, equipment, currency,
                     spells, spell_slots, notes)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#
            }
            Some(_) => {
                r#"
                UPDATE characters SET
                    campaign_id = ?, name = ?, player_name = ?, race = ?, class = ?,
                    subclass = ?, level = ?, background = ?, alignment = ?, xp = ?,
                    ability_scores = ?, save_profs = ?, skill_profs = ?, hp_max = ?,
                    hp_current = ?, hp_temp = ?, ac = ?, speed = ?, initiative_bonus = ?,
                    features = ?, equipment = ?, currency = ?, spells = ?, spell_slots = ?,
                    notes = ?, updated_at = datetime('now')
                WHERE id = ?
                "#
            }
        };

        let mut query = sqlx::query(sql)
            .bind(character.campaign_id)
            .bind(character.name.trim())
            .bind(&character.player_name)
            .bind(&character.race)
            .bind(&character.class)
            .bind(&character.subclass)
            .bind(character.level)
            .bind(&character.background)
            .bind(&character.alignment)
            .bind(character.xp)
            .bind(blobs.ability_scores)
            .bind(blobs.save_profs)
            .bind(blobs.skill_profs)
            .bind(character.hp_max)
            .bind(hp_current)
            .bind(character.hp_temp)
            .bind(character.armor_class)
            .bind(character.speed)
            .bind(character.initiative_bonus)
            .bind(blobs.features)
            .bind(blobs.equipment)
            .bind(blobs.currency)
            .bind(blobs.spells)
            .bind(blobs.spell_slots)
            .bind(&character.notes);
        if let Some(id) = character.id {
            query = query.bind(id);
        }

        let result = query.execute(self.pool()).await?;
        match character.id {
            None => {
                let id = result.last_insert_rowid();
                debug!(id, name = %character.name, "created character");
                Ok(id)
            }
            Some(id) if result.rows_affected() == 0 => Err(StoreError::NotFound {
                table: "characters",
                id,
            }),
            Some(id) => Ok(id),
        }
    }

    /// Fetch one character sheet.
    pub async fn get_character(&self, id: i64) -> StoreResult<Character> {
        let row = sqlx::query("SELECT * FROM characters WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or(StoreError::NotFound {
                table: "characters",
                id,
            })?;
        character_from_row(&row)
    }

    /// Characters by name, optionally only those in one campaign.
    pub async fn list_characters(&self, campaign_id: Option<i64>) -> StoreResult<Vec<Character>> {
        let rows = match campaign_id {
            Some(cid) => {
                sqlx::query(
                    "SELECT * FROM characters WHERE campaign_id = ? ORDER BY name COLLATE NOCASE",
                )
                .bind(cid)
                .fetch_all(self.pool())
                .await?
            }
            None => {
                sqlx::query("SELECT * FROM characters ORDER BY name COLLATE NOCASE")
                    .fetch_all(self.pool())
                    .await?
            }
        };
        rows.iter().map(character_from_row).collect()
    }

    /// Delete a character sheet.
    pub async fn delete_character(&self, id: i64) -> StoreResult<()> {
        self.delete_row("characters", id).await
    }

    /// Damage (negative) or heal (positive) a stored character, clamped to
    /// `[0, hp_max]`. Returns the new current hit points.
    pub async fn adjust_hp(&self, id: i64, delta: i32) -> StoreResult<i32> {
        let hp: Option<i32> = sqlx::query_scalar(
            r#"
            UPDATE characters
            SET hp_current = MAX(0, MIN(MAX(hp_max, 0), hp_current + ?)),
                updated_at = datetime('now')
            WHERE id = ?
            RETURNING hp_current
            "#,
        )
        .bind(delta)
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        hp.ok_or(StoreError::NotFound {
            table: "characters",
            id,
        })
    }
}
