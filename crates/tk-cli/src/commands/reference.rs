use std::path::{Path, PathBuf};

use clap::Subcommand;
use colored::Colorize;
use tk_core::{Creature, Item, ReferenceKind, ReferenceRecord, Spell};
use tk_lookup::{ChatClient, ContentSource};
use tk_mechanics::Session;
use tk_store::{CreatureFilter, ItemFilter, SpellFilter, Store};

use crate::config::AppConfig;

#[derive(Subcommand)]
pub enum RefAction {
    /// Search stored reference data
    Search {
        #[command(subcommand)]
        target: SearchTarget,
    },

    /// Show one record in full
    Show {
        /// creature, spell, or item
        kind: ReferenceKind,

        /// Exact name (case-insensitive)
        name: String,
    },

    /// Delete one record
    Delete {
        /// creature, spell, or item
        kind: ReferenceKind,

        /// Exact name (case-insensitive)
        name: String,
    },

    /// Add or update a record from a JSON file
    Add {
        /// creature, spell, or item
        kind: ReferenceKind,

        /// JSON object with the record's fields
        file: PathBuf,
    },

    /// Ask the language model for a record and save it after confirmation
    Lookup {
        /// creature, spell, or item
        kind: ReferenceKind,

        /// What to look up, e.g. "Beholder"
        subject: String,

        /// Save without asking
        #[arg(short, long)]
        yes: bool,
    },

    /// Import creature stat blocks from a directory of Markdown files
    Import {
        /// Directory containing *.md creature files
        dir: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum SearchTarget {
    /// Search creatures
    Creature {
        /// Name contains
        #[arg(short, long)]
        name: Option<String>,

        /// Challenge rating, e.g. 5 or 1/4
        #[arg(long)]
        cr: Option<String>,

        /// Type or tag, e.g. dragon
        #[arg(short = 't', long = "type")]
        creature_type: Option<String>,
    },

    /// Search spells
    Spell {
        /// Name contains
        #[arg(short, long)]
        name: Option<String>,

        /// Spell level (0 for cantrips)
        #[arg(short, long)]
        level: Option<i32>,

        /// School contains
        #[arg(short, long)]
        school: Option<String>,
    },

    /// Search items
    Item {
        /// Name contains
        #[arg(short, long)]
        name: Option<String>,

        /// Item type contains
        #[arg(short = 't', long = "type")]
        item_type: Option<String>,

        /// Exact rarity
        #[arg(short, long)]
        rarity: Option<String>,
    },
}

pub async fn run(store: &Store, config: &AppConfig, action: RefAction) -> Result<(), String> {
    match action {
        RefAction::Search { target } => search(store, target).await,
        RefAction::Show { kind, name } => {
            let record = store
                .get_reference(kind, &name)
                .await
                .map_err(|e| e.to_string())?
                .ok_or_else(|| format!("{kind} not found: \"{name}\""))?;
            print!("{}", render_record(&record));
            Ok(())
        }
        RefAction::Delete { kind, name } => {
            if store
                .delete_reference(kind, &name)
                .await
                .map_err(|e| e.to_string())?
            {
                println!("  {} {kind} \"{name}\"", "Deleted".red().bold());
                Ok(())
            } else {
                Err(format!("{kind} not found: \"{name}\""))
            }
        }
        RefAction::Add { kind, file } => add(store, kind, &file).await,
        RefAction::Lookup { kind, subject, yes } => lookup(store, config, kind, &subject, yes).await,
        RefAction::Import { dir } => {
            if !dir.is_dir() {
                return Err(format!("not a directory: {}", dir.display()));
            }
            let report = store
                .ingest_bestiary(&dir)
                .await
                .map_err(|e| e.to_string())?;
            println!(
                "  {} {} creatures, skipped {}",
                "Imported".green().bold(),
                report.imported,
                report.skipped
            );
            Ok(())
        }
    }
}

async fn search(store: &Store, target: SearchTarget) -> Result<(), String> {
    match target {
        SearchTarget::Creature {
            name,
            cr,
            creature_type,
        } => {
            let filter = CreatureFilter {
                name,
                challenge: cr,
                creature_type,
            };
            let creatures = store
                .search_creatures(&filter)
                .await
                .map_err(|e| e.to_string())?;
            if creatures.is_empty() {
                println!("  No creatures found.");
                return Ok(());
            }
            let mut table = super::table(&["Name", "Size/Type", "CR", "HP", "AC"]);
            for c in &creatures {
                table.add_row(vec![
                    c.name.clone(),
                    super::cell(&c.size, 30),
                    super::cell(&c.challenge, 20),
                    c.hit_point_value().to_string(),
                    c.armor_class_value().to_string(),
                ]);
            }
            println!("{table}");
            super::footer(creatures.len(), "creature");
        }
        SearchTarget::Spell {
            name,
            level,
            school,
        } => {
            let filter = SpellFilter {
                name,
                level,
                school,
            };
            let spells = store
                .search_spells(&filter)
                .await
                .map_err(|e| e.to_string())?;
            if spells.is_empty() {
                println!("  No spells found.");
                return Ok(());
            }
            let mut table = super::table(&["Name", "Level", "School", "Casting time", "Range"]);
            for s in &spells {
                table.add_row(vec![
                    s.name.clone(),
                    s.level_label(),
                    super::cell(&s.school, 20),
                    super::cell(&s.casting_time, 20),
                    super::cell(&s.range, 20),
                ]);
            }
            println!("{table}");
            super::footer(spells.len(), "spell");
        }
        SearchTarget::Item {
            name,
            item_type,
            rarity,
        } => {
            let filter = ItemFilter {
                name,
                item_type,
                rarity,
            };
            let items = store
                .search_items(&filter)
                .await
                .map_err(|e| e.to_string())?;
            if items.is_empty() {
                println!("  No items found.");
                return Ok(());
            }
            let mut table = super::table(&["Name", "Type", "Rarity", "Description"]);
            for i in &items {
                table.add_row(vec![
                    i.name.clone(),
                    super::cell(&i.item_type, 20),
                    i.rarity.clone(),
                    super::cell(&i.description, 50),
                ]);
            }
            println!("{table}");
            super::footer(items.len(), "item");
        }
    }
    Ok(())
}

async fn add(store: &Store, kind: ReferenceKind, file: &Path) -> Result<(), String> {
    let text = std::fs::read_to_string(file)
        .map_err(|e| format!("cannot read {}: {e}", file.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&text).map_err(|e| format!("{} is not JSON: {e}", file.display()))?;
    let mut record = ReferenceRecord::from_json(kind, value).map_err(|e| e.to_string())?;
    record.set_source("manual");
    let id = store
        .upsert_reference(&record)
        .await
        .map_err(|e| e.to_string())?;
    println!("  {} {kind} {id}: {}", "Saved".green().bold(), record.name());
    Ok(())
}

async fn lookup(
    store: &Store,
    config: &AppConfig,
    kind: ReferenceKind,
    subject: &str,
    yes: bool,
) -> Result<(), String> {
    let client = ChatClient::new(config.lookup.clone()).map_err(|e| e.to_string())?;
    let record = client
        .lookup(kind, subject)
        .await
        .map_err(|e| e.to_string())?;

    let mut session = Session::new(config.session(None));
    print!("{}", render_record(&record));
    session.stage_draft(record);

    if !yes && !super::confirm(&format!("  Save this {kind}?"))? {
        session.discard_draft();
        println!("  Discarded.");
        return Ok(());
    }

    let record = session.confirm_draft().map_err(|e| e.to_string())?;
    let id = store
        .upsert_reference(&record)
        .await
        .map_err(|e| e.to_string())?;
    println!("  {} {kind} {id}: {}", "Saved".green().bold(), record.name());
    Ok(())
}

/// Multi-line text rendering of a record, as a stat block or card.
pub fn render_record(record: &ReferenceRecord) -> String {
    match record {
        ReferenceRecord::Creature(c) => render_creature(c),
        ReferenceRecord::Spell(s) => render_spell(s),
        ReferenceRecord::Item(i) => render_item(i),
    }
}

fn line(out: &mut String, label: &str, value: &str) {
    if !value.trim().is_empty() {
        out.push_str(&format!("  {label:<14}{}\n", value.trim()));
    }
}

fn body(out: &mut String, text: &str) {
    if !text.trim().is_empty() {
        out.push('\n');
        for l in text.trim().lines() {
            out.push_str(&format!("  {l}\n"));
        }
    }
}

fn render_creature(c: &Creature) -> String {
    let mut out = format!("  {}\n", c.name.bold());
    let kind = [c.size.trim(), c.alignment.trim()]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ");
    if !kind.is_empty() {
        out.push_str(&format!("  {}\n", kind.italic()));
    }
    out.push('\n');
    line(&mut out, "Armor Class", &c.armor_class);
    line(&mut out, "Hit Points", &c.hit_points);
    line(&mut out, "Speed", &c.speed);
    out.push_str(&format!(
        "\n  STR {} {}  DEX {} {}  CON {} {}  INT {} {}  WIS {} {}  CHA {} {}\n\n",
        c.str_score, c.str_mod, c.dex_score, c.dex_mod, c.con_score, c.con_mod,
        c.int_score, c.int_mod, c.wis_score, c.wis_mod, c.cha_score, c.cha_mod
    ));
    line(&mut out, "Saving Throws", &c.saving_throws);
    line(&mut out, "Skills", &c.skills);
    line(&mut out, "Senses", &c.senses);
    line(&mut out, "Languages", &c.languages);
    line(&mut out, "Challenge", &c.challenge);
    line(&mut out, "Tags", &c.tags.join(", "));
    line(&mut out, "Source", &c.source);
    body(&mut out, &c.abilities);
    out
}

fn render_spell(s: &Spell) -> String {
    let mut out = format!("  {}\n", s.name.bold());
    let header = if s.level == 0 {
        format!("{} cantrip", s.school)
    } else {
        format!("{} {}", s.level_label(), s.school.to_lowercase())
    };
    out.push_str(&format!("  {}\n\n", header.trim().italic()));
    line(&mut out, "Casting Time", &s.casting_time);
    line(&mut out, "Range", &s.range);
    line(&mut out, "Components", &s.components);
    line(&mut out, "Duration", &s.duration);
    line(&mut out, "Classes", &s.classes);
    line(&mut out, "Source", &s.source);
    body(&mut out, &s.description);
    out
}

fn render_item(i: &Item) -> String {
    let mut out = format!("  {}\n", i.name.bold());
    out.push_str(&format!("  {}\n\n", format!("{}, {}", i.item_type, i.rarity).italic()));
    for (key, value) in &i.properties {
        let value = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        line(&mut out, key, &value);
    }
    line(&mut out, "Source", &i.source);
    body(&mut out, &i.description);
    out
}
