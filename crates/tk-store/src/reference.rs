//! Creature, spell, and item reference data.
//!
//! Reference records are keyed by their unique name: saving a record whose
//! name already exists updates that row instead of failing.

use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};
use tk_core::{Blob, Creature, Item, ReferenceKind, ReferenceRecord, Spell};
use tracing::debug;

use crate::error::StoreResult;
use crate::rows::{int, text};
use crate::Store;

/// Filters for [`Store::search_creatures`]. Blank fields match everything.
#[derive(Debug, Clone, Default)]
pub struct CreatureFilter {
    /// Substring of the name.
    pub name: Option<String>,
    /// Challenge rating, matched against the start of the challenge text.
    pub challenge: Option<String>,
    /// Substring of the size/type line or the tags, e.g. "dragon".
    pub creature_type: Option<String>,
}

/// Filters for [`Store::search_spells`].
#[derive(Debug, Clone, Default)]
pub struct SpellFilter {
    /// Substring of the name.
    pub name: Option<String>,
    /// Exact spell level.
    pub level: Option<i32>,
    /// Substring of the school.
    pub school: Option<String>,
}

/// Filters for [`Store::search_items`].
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    /// Substring of the name.
    pub name: Option<String>,
    /// Substring of the item type.
    pub item_type: Option<String>,
    /// Exact rarity.
    pub rarity: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn contains(value: &str) -> String {
    format!("%{value}%")
}

fn creature_from_row(row: &SqliteRow) -> StoreResult<Creature> {
    Ok(Creature {
        id: Some(row.try_get("id")?),
        name: text(row, "name")?,
        size: text(row, "size")?,
        alignment: text(row, "alignment")?,
        challenge: text(row, "challenge")?,
        hit_points: text(row, "hit_points")?,
        armor_class: text(row, "armor_class")?,
        speed: text(row, "speed")?,
        str_score: int(row, "str_score", 10)?,
        dex_score: int(row, "dex_score", 10)?,
        con_score: int(row, "con_score", 10)?,
        int_score: int(row, "int_score", 10)?,
        wis_score: int(row, "wis_score", 10)?,
        cha_score: int(row, "cha_score", 10)?,
        str_mod: text(row, "str_mod")?,
        dex_mod: text(row, "dex_mod")?,
        con_mod: text(row, "con_mod")?,
        int_mod: text(row, "int_mod")?,
        wis_mod: text(row, "wis_mod")?,
        cha_mod: text(row, "cha_mod")?,
        skills: text(row, "skills")?,
        saving_throws: text(row, "saving_throws")?,
        senses: text(row, "senses")?,
        languages: text(row, "languages")?,
        abilities: text(row, "abilities")?,
        tags: Vec::<String>::parse_blob(&text(row, "tags")?)?,
        source: text(row, "source")?,
    })
}

fn spell_from_row(row: &SqliteRow) -> StoreResult<Spell> {
    Ok(Spell {
        id: Some(row.try_get("id")?),
        name: text(row, "name")?,
        level: int(row, "level", 0)?,
        school: text(row, "school")?,
        casting_time: text(row, "casting_time")?,
        range: text(row, "range")?,
        components: text(row, "components")?,
        duration: text(row, "duration")?,
        description: text(row, "description")?,
        classes: text(row, "classes")?,
        source: text(row, "source")?,
    })
}

fn item_from_row(row: &SqliteRow) -> StoreResult<Item> {
    let properties = text(row, "properties")?;
    Ok(Item {
        id: Some(row.try_get("id")?),
        name: text(row, "name")?,
        item_type: text(row, "type")?,
        rarity: text(row, "rarity")?,
        description: text(row, "description")?,
        properties: if properties.trim().is_empty() {
            Default::default()
        } else {
            serde_json::from_str(&properties)?
        },
        source: text(row, "source")?,
    })
}

impl Store {
    // =========================================================================
    // Upserts
    // =========================================================================

    /// Insert a creature, or update the one with the same name. Returns the id.
    pub async fn upsert_creature(&self, creature: &Creature) -> StoreResult<i64> {
        creature.validate()?;
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO creatures
                (name, size, alignment, challenge, hit_points, armor_class, speed,
                 str_score, dex_score, con_score, int_score, wis_score, cha_score,
                 str_mod, dex_mod, con_mod, int_mod, wis_mod, cha_mod,
                 skills, saving_throws, senses, languages, abilities, tags, source)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(name) DO UPDATE SET
                size = excluded.size, alignment = excluded.alignment,
                challenge = excluded.challenge, hit_points = excluded.hit_points,
                armor_class = excluded.armor_class, speed = excluded.speed,
                str_score = excluded.str_score, dex_score = excluded.dex_score,
                con_score = excluded.con_score, int_score = excluded.int_score,
                wis_score = excluded.wis_score, cha_score = excluded.cha_score,
                str_mod = excluded.str_mod, dex_mod = excluded.dex_mod,
                con_mod = excluded.con_mod, int_mod = excluded.int_mod,
                wis_mod = excluded.wis_mod, cha_mod = excluded.cha_mod,
                skills = excluded.skills, saving_throws = excluded.saving_throws,
                senses = excluded.senses, languages = excluded.languages,
                abilities = excluded.abilities, tags = excluded.tags,
                source = excluded.source
            RETURNING id
            "#,
        )
        .bind(creature.name.trim())
        .bind(&creature.size)
        .bind(&creature.alignment)
        .bind(&creature.challenge)
        .bind(&creature.hit_points)
        .bind(&creature.armor_class)
        .bind(&creature.speed)
        .bind(creature.str_score)
        .bind(creature.dex_score)
        .bind(creature.con_score)
        .bind(creature.int_score)
        .bind(creature.wis_score)
        .bind(creature.cha_score)
        .bind(&creature.str_mod)
        .bind(&creature.dex_mod)
        .bind(&creature.con_mod)
        .bind(&creature.int_mod)
        .bind(&creature.wis_mod)
        .bind(&creature.cha_mod)
        .bind(&creature.skills)
        .bind(&creature.saving_throws)
        .bind(&creature.senses)
        .bind(&creature.languages)
        .bind(&creature.abilities)
        .bind(creature.tags.to_blob()?)
        .bind(&creature.source)
        .fetch_one(self.pool())
        .await?;
        debug!(id, name = %creature.name, "upserted creature");
        Ok(id)
    }

    /// Insert a spell, or update the one with the same name. Returns the id.
    pub async fn upsert_spell(&self, spell: &Spell) -> StoreResult<i64> {
        spell.validate()?;
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO spells
                (name, level, school, casting_time, "range", components, duration,
                 description, classes, source)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(name) DO UPDATE SET
                level = excluded.level, school = excluded.school,
                casting_time = excluded.casting_time, "range" = excluded."range",
                components = excluded.components, duration = excluded.duration,
                description = excluded.description, classes = excluded.classes,
                source = excluded.source
            RETURNING id
            "#,
        )
        .bind(spell.name.trim())
        .bind(spell.level)
        .bind(&spell.school)
        .bind(&spell.casting_time)
        .bind(&spell.range)
        .bind(&spell.components)
        .bind(&spell.duration)
        .bind(&spell.description)
        .bind(&spell.classes)
        .bind(&spell.source)
        .fetch_one(self.pool())
        .await?;
        debug!(id, name = %spell.name, "upserted spell");
        Ok(id)
    }

    /// Insert an item, or update the one with the same name. Returns the id.
    pub async fn upsert_item(&self, item: &Item) -> StoreResult<i64> {
        item.validate()?;
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO items (name, type, rarity, description, properties, source)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(name) DO UPDATE SET
                type = excluded.type, rarity = excluded.rarity,
                description = excluded.description, properties = excluded.properties,
                source = excluded.source
            RETURNING id
            "#,
        )
        .bind(item.name.trim())
        .bind(&item.item_type)
        .bind(item.rarity.trim().to_lowercase())
        .bind(&item.description)
        .bind(serde_json::to_string(&item.properties)?)
        .bind(&item.source)
        .fetch_one(self.pool())
        .await?;
        debug!(id, name = %item.name, "upserted item");
        Ok(id)
    }

    /// Upsert any reference record.
    pub async fn upsert_reference(&self, record: &ReferenceRecord) -> StoreResult<i64> {
        match record {
            ReferenceRecord::Creature(c) => self.upsert_creature(c).await,
            ReferenceRecord::Spell(s) => self.upsert_spell(s).await,
            ReferenceRecord::Item(i) => self.upsert_item(i).await,
        }
    }

    // =========================================================================
    // Searches
    // =========================================================================

    /// Creatures matching every given filter, by name.
    ///
    /// The challenge filter matches the whole challenge text or its start
    /// followed by a space and parenthesis, so "5" finds "5 (1,800 XP)" but
    /// not "15 (13,000 XP)" or "1/5".
    pub async fn search_creatures(&self, filter: &CreatureFilter) -> StoreResult<Vec<Creature>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM creatures WHERE 1=1");
        if let Some(name) = present(&filter.name) {
            qb.push(" AND name LIKE ").push_bind(contains(name));
        }
        if let Some(cr) = present(&filter.challenge) {
            qb.push(" AND (challenge = ")
                .push_bind(cr.to_string())
                .push(" OR challenge LIKE ")
                .push_bind(format!("{cr} (%"))
                .push(")");
        }
        if let Some(kind) = present(&filter.creature_type) {
            qb.push(" AND (size LIKE ")
                .push_bind(contains(kind))
                .push(" OR tags LIKE ")
                .push_bind(contains(kind))
                .push(")");
        }
        qb.push(" ORDER BY name COLLATE NOCASE");
        let rows = qb.build().fetch_all(self.pool()).await?;
        rows.iter().map(creature_from_row).collect()
    }

    /// Spells matching every given filter, by level then name.
    pub async fn search_spells(&self, filter: &SpellFilter) -> StoreResult<Vec<Spell>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM spells WHERE 1=1");
        if let Some(name) = present(&filter.name) {
            qb.push(" AND name LIKE ").push_bind(contains(name));
        }
        if let Some(level) = filter.level {
            qb.push(" AND level = ").push_bind(level);
        }
        if let Some(school) = present(&filter.school) {
            qb.push(" AND school LIKE ").push_bind(contains(school));
        }
        qb.push(" ORDER BY level, name COLLATE NOCASE");
        let rows = qb.build().fetch_all(self.pool()).await?;
        rows.iter().map(spell_from_row).collect()
    }

    /// Items matching every given filter, by name.
    pub async fn search_items(&self, filter: &ItemFilter) -> StoreResult<Vec<Item>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM items WHERE 1=1");
        if let Some(name) = present(&filter.name) {
            qb.push(" AND name LIKE ").push_bind(contains(name));
        }
        if let Some(item_type) = present(&filter.item_type) {
            qb.push(" AND type LIKE ").push_bind(contains(item_type));
        }
        if let Some(rarity) = present(&filter.rarity) {
            qb.push(" AND rarity = ").push_bind(rarity.to_lowercase());
        }
        qb.push(" ORDER BY name COLLATE NOCASE");
        let rows = qb.build().fetch_all(self.pool()).await?;
        rows.iter().map(item_from_row).collect()
    }

    // =========================================================================
    // Lookup by name
    // =========================================================================

    /// A reference record by exact name, ignoring case.
    pub async fn get_reference(
        &self,
        kind: ReferenceKind,
        name: &str,
    ) -> StoreResult<Option<ReferenceRecord>> {
        let sql = format!(
            "SELECT * FROM {} WHERE name = ? COLLATE NOCASE",
            table_for(kind)
        );
        let row = sqlx::query(&sql)
            .bind(name.trim())
            .fetch_optional(self.pool())
            .await?;
        row.map(|row| match kind {
            ReferenceKind::Creature => creature_from_row(&row).map(ReferenceRecord::Creature),
            ReferenceKind::Spell => spell_from_row(&row).map(ReferenceRecord::Spell),
            ReferenceKind::Item => item_from_row(&row).map(ReferenceRecord::Item),
        })
        .transpose()
    }

    /// A creature by exact name, ignoring case.
    pub async fn get_creature(&self, name: &str) -> StoreResult<Option<Creature>> {
        Ok(match self.get_reference(ReferenceKind::Creature, name).await? {
            Some(ReferenceRecord::Creature(c)) => Some(c),
            _ => None,
        })
    }

    /// Delete a reference record by name. Returns whether a row was removed.
    pub async fn delete_reference(&self, kind: ReferenceKind, name: &str) -> StoreResult<bool> {
        let sql = format!("DELETE FROM {} WHERE name = ? COLLATE NOCASE", table_for(kind));
        let result = sqlx::query(&sql)
            .bind(name.trim())
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of stored records of one kind.
    pub async fn count_references(&self, kind: ReferenceKind) -> StoreResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", table_for(kind));
        Ok(sqlx::query_scalar(&sql).fetch_one(self.pool()).await?)
    }
}

fn table_for(kind: ReferenceKind) -> &'static str {
    match kind {
        ReferenceKind::Creature => "creatures",
        ReferenceKind::Spell => "spells",
        ReferenceKind::Item => "items",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_store;
    use crate::StoreError;

    fn creature(name: &str, size: &str, challenge: &str) -> Creature {
        Creature {
            size: size.into(),
            challenge: challenge.into(),
            source: "manual".into(),
            ..Creature::named(name)
        }
    }

    async fn seeded() -> Store {
        let store = test_store().await;
        for c in [
            creature("Troll", "Large giant", "5 (1,800 XP)"),
            creature("Adult Red Dragon", "Huge dragon", "17 (18,000 XP)"),
            creature("Young Green Dragon", "Large dragon", "8 (3,900 XP)"),
            creature("Bone Naga", "Large undead", "4 (1,100 XP)"),
            creature("Kobold", "Small humanoid", "1/8 (25 XP)"),
            creature("Fire Elemental", "Large elemental", "5"),
            creature("Storm Giant", "Huge giant", "15 (13,000 XP)"),
        ] {
            store.upsert_creature(&c).await.unwrap();
        }
        store
    }

    fn names(creatures: &[Creature]) -> Vec<&str> {
        creatures.iter().map(|c| c.name.as_str()).collect()
    }

    #[tokio::test]
    async fn challenge_filter_is_anchored() {
        let store = seeded().await;
        let found = store
            .search_creatures(&CreatureFilter {
                challenge: Some("5".into()),
                ..CreatureFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(names(&found), vec!["Fire Elemental", "Troll"]);

        let found = store
            .search_creatures(&CreatureFilter {
                challenge: Some("1/8".into()),
                ..CreatureFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(names(&found), vec!["Kobold"]);
    }

    #[tokio::test]
    async fn type_filter_checks_size_and_tags() {
        let store = seeded().await;
        let mut tagged = creature("Dracolich", "Huge undead", "17 (18,000 XP)");
        tagged.tags = vec!["dragon".into()];
        store.upsert_creature(&tagged).await.unwrap();

        let found = store
            .search_creatures(&CreatureFilter {
                creature_type: Some("dragon".into()),
                ..CreatureFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(
            names(&found),
            vec!["Adult Red Dragon", "Dracolich", "Young Green Dragon"]
        );
    }

    #[tokio::test]
    async fn filters_combine_and_blank_matches_all() {
        let store = seeded().await;
        let all = store
            .search_creatures(&CreatureFilter {
                name: Some("  ".into()),
                ..CreatureFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(all.len(), 7);

        let found = store
            .search_creatures(&CreatureFilter {
                name: Some("giant".into()),
                challenge: Some("15".into()),
                creature_type: None,
            })
            .await
            .unwrap();
        assert_eq!(names(&found), vec!["Storm Giant"]);
    }

    #[tokio::test]
    async fn upsert_by_name_updates_in_place() {
        let store = test_store().await;
        let first = store
            .upsert_creature(&creature("Goblin", "Small humanoid", "1/4 (50 XP)"))
            .await
            .unwrap();
        let mut changed = creature("Goblin", "Small humanoid (goblinoid)", "1/4 (50 XP)");
        changed.tags = vec!["goblinoid".into()];
        let second = store.upsert_creature(&changed).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(store.count_references(ReferenceKind::Creature).await.unwrap(), 1);

        let loaded = store.get_creature("goblin").await.unwrap().unwrap();
        assert_eq!(loaded.size, "Small humanoid (goblinoid)");
        assert_eq!(loaded.tags, vec!["goblinoid"]);
    }

    #[tokio::test]
    async fn spells_sorted_by_level_then_name() {
        let store = test_store().await;
        for (name, level, school) in [
            ("Shield", 1, "Abjuration"),
            ("Fireball", 3, "Evocation"),
            ("Fire Bolt", 0, "Evocation"),
            ("Burning Hands", 1, "Evocation"),
        ] {
            store
                .upsert_spell(&Spell {
                    name: name.into(),
                    level,
                    school: school.into(),
                    ..Spell::default()
                })
                .await
                .unwrap();
        }
        let all = store.search_spells(&SpellFilter::default()).await.unwrap();
        let order: Vec<&str> = all.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(order, vec!["Fire Bolt", "Burning Hands", "Shield", "Fireball"]);

        let evocation_1 = store
            .search_spells(&SpellFilter {
                level: Some(1),
                school: Some("evoc".into()),
                ..SpellFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(evocation_1.len(), 1);
        assert_eq!(evocation_1[0].name, "Burning Hands");
    }

    #[tokio::test]
    async fn invalid_spell_level_rejected() {
        let store = test_store().await;
        let err = store
            .upsert_spell(&Spell {
                name: "Wish+".into(),
                level: 10,
                ..Spell::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Core(_)));
    }

    #[tokio::test]
    async fn items_filter_and_properties() {
        let store = test_store().await;
        let mut sword = Item {
            name: "Flame Tongue".into(),
            item_type: "Weapon (any sword)".into(),
            rarity: "Rare".into(),
            ..Item::default()
        };
        sword
            .properties
            .insert("attunement".into(), serde_json::json!(true));
        store.upsert_item(&sword).await.unwrap();
        store
            .upsert_item(&Item {
                name: "Bag of Holding".into(),
                item_type: "Wondrous item".into(),
                rarity: "uncommon".into(),
                ..Item::default()
            })
            .await
            .unwrap();

        let rare = store
            .search_items(&ItemFilter {
                rarity: Some("rare".into()),
                ..ItemFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(rare.len(), 1);
        assert_eq!(rare[0].properties["attunement"], serde_json::json!(true));

        let weapons = store
            .search_items(&ItemFilter {
                item_type: Some("weapon".into()),
                ..ItemFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(weapons[0].name, "Flame Tongue");

        assert!(store.delete_reference(ReferenceKind::Item, "bag of holding").await.unwrap());
        assert!(!store.delete_reference(ReferenceKind::Item, "bag of holding").await.unwrap());
        assert_eq!(store.count_references(ReferenceKind::Item).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn get_reference_by_kind() {
        let store = seeded().await;
        let found = store
            .get_reference(ReferenceKind::Creature, "TROLL")
            .await
            .unwrap();
        assert_eq!(found.map(|r| r.name().to_string()), Some("Troll".to_string()));
        assert!(store
            .get_reference(ReferenceKind::Spell, "Troll")
            .await
            .unwrap()
            .is_none());
    }
}
