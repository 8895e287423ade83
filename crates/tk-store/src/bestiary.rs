//! Import creature stat blocks from a directory of Markdown files.
//!
//! Each file starts with a YAML front-matter block delimited by `---`
//! lines; the Markdown after it is the creature's traits and actions.

use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use tk_core::ability::modifier_for;
use tk_core::reference::{modifier_label, signed_label, stat_value};
use tk_core::{Ability, Creature};
use tracing::{debug, info, warn};

use crate::error::StoreResult;
use crate::Store;

/// Counts from one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Creatures inserted or updated.
    pub imported: usize,
    /// Files that could not be read, parsed, or stored.
    pub skipped: usize,
}

/// Split a document into its front-matter text and body.
fn split_front_matter(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start_matches('\u{feff}').trim_start();
    let rest = text.strip_prefix("---")?;
    let rest = rest.strip_prefix('\r').unwrap_or(rest);
    let rest = rest.strip_prefix('\n')?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

fn scalar(meta: &Mapping, key: &str) -> String {
    match meta.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => serde_yaml::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

/// Score and printed modifier for one ability entry.
fn stat(meta: &Mapping, key: &str) -> (i32, String) {
    match meta.get(key) {
        Some(Value::Number(n)) => {
            let score = n.as_i64().and_then(|v| i32::try_from(v).ok()).unwrap_or(10);
            (score, signed_label(modifier_for(score)))
        }
        Some(Value::String(s)) => {
            let score = stat_value(s);
            let label = if s.contains('(') {
                modifier_label(s)
            } else {
                signed_label(modifier_for(score))
            };
            (score, label)
        }
        _ => (10, "(+0)".to_string()),
    }
}

fn tags(meta: &Mapping) -> Vec<String> {
    match meta.get("tags") {
        Some(Value::Sequence(items)) => items
            .iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|t| !t.is_empty())
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

/// Parse one bestiary document. Returns `None` when the document has no
/// front matter, the YAML is invalid, or there is no `name`.
pub fn parse_creature_document(text: &str) -> Option<Creature> {
    let (front, body) = split_front_matter(text)?;
    let Value::Mapping(meta) = serde_yaml::from_str::<Value>(front).ok()? else {
        return None;
    };

    let name = scalar(&meta, "name");
    if name.is_empty() {
        return None;
    }

    let mut creature = Creature {
        name,
        size: scalar(&meta, "size"),
        alignment: scalar(&meta, "alignment"),
        challenge: scalar(&meta, "challenge"),
        hit_points: scalar(&meta, "hit_points"),
        armor_class: scalar(&meta, "armor_class"),
        speed: scalar(&meta, "speed"),
        skills: scalar(&meta, "skills"),
        saving_throws: scalar(&meta, "saving_throws"),
        senses: scalar(&meta, "senses"),
        languages: scalar(&meta, "languages"),
        abilities: body.trim().to_string(),
        tags: tags(&meta),
        source: "bestiary".to_string(),
        ..Creature::default()
    };

    for (key, ability) in [
        ("str", Ability::Strength),
        ("dex", Ability::Dexterity),
        ("con", Ability::Constitution),
        ("int", Ability::Intelligence),
        ("wis", Ability::Wisdom),
        ("cha", Ability::Charisma),
    ] {
        let (score, label) = stat(&meta, key);
        creature.set_score(ability, score);
        let slot = match ability {
            Ability::Strength => &mut creature.str_mod,
            Ability::Dexterity => &mut creature.dex_mod,
            Ability::Constitution => &mut creature.con_mod,
            Ability::Intelligence => &mut creature.int_mod,
            Ability::Wisdom => &mut creature.wis_mod,
            Ability::Charisma => &mut creature.cha_mod,
        };
        *slot = label;
    }

    Some(creature)
}

fn markdown_files(dir: &Path) -> StoreResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "md") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

impl Store {
    /// Upsert every creature document in `dir`. A missing directory
    /// imports nothing.
    pub async fn ingest_bestiary(&self, dir: &Path) -> StoreResult<IngestReport> {
        let mut report = IngestReport::default();
        if !dir.is_dir() {
            warn!(dir = %dir.display(), "bestiary directory not found");
            return Ok(report);
        }

        for path in markdown_files(dir)? {
            let creature = match std::fs::read_to_string(&path) {
                Ok(text) => parse_creature_document(&text),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "could not read bestiary file");
                    None
                }
            };
            let Some(creature) = creature else {
                debug!(path = %path.display(), "skipped bestiary file");
                report.skipped += 1;
                continue;
            };
            match self.upsert_creature(&creature).await {
                Ok(_) => report.imported += 1,
                Err(e) => {
                    warn!(name = %creature.name, error = %e, "could not store creature");
                    report.skipped += 1;
                }
            }
        }

        info!(
            imported = report.imported,
            skipped = report.skipped,
            "bestiary ingestion finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_store;

    const TROLL: &str = "---
name: Troll
size: Large giant
alignment: chaotic evil
challenge: 5 (1,800 XP)
hit_points: 84 (8d10+40)
armor_class: 15 (natural armor)
speed: 30 ft.
str: 18 (+4)
dex: 13
con: \"20 (+5)\"
senses: darkvision 60 ft.
tags: giant, regenerating
---

***Regeneration.*** The troll regains 10 hit points at the start of its turn.
";

    #[test]
    fn parses_front_matter_and_body() {
        let troll = parse_creature_document(TROLL).unwrap();
        assert_eq!(troll.name, "Troll");
        assert_eq!(troll.size, "Large giant");
        assert_eq!(troll.challenge, "5 (1,800 XP)");
        assert_eq!(troll.hit_point_value(), 84);
        assert_eq!(troll.armor_class_value(), 15);
        assert_eq!((troll.str_score, troll.str_mod.as_str()), (18, "(+4)"));
        assert_eq!((troll.con_score, troll.con_mod.as_str()), (20, "(+5)"));
        assert_eq!(troll.tags, vec!["giant", "regenerating"]);
        assert!(troll.abilities.starts_with("***Regeneration.***"));
        assert_eq!(troll.source, "bestiary");
    }

    #[test]
    fn plain_integer_scores_get_computed_labels() {
        let troll = parse_creature_document(TROLL).unwrap();
        assert_eq!((troll.dex_score, troll.dex_mod.as_str()), (13, "(+1)"));
        assert_eq!((troll.wis_score, troll.wis_mod.as_str()), (10, "(+0)"));
    }

    #[test]
    fn tag_lists_and_missing_fields() {
        let doc = "---\nname: Bat\ntags: [beast, tiny]\nwis: 12 (+1)\n---\n";
        let bat = parse_creature_document(doc).unwrap();
        assert_eq!(bat.tags, vec!["beast", "tiny"]);
        assert_eq!(bat.wis_mod, "(+1)");
        assert_eq!(bat.abilities, "");
        assert_eq!(bat.speed, "");
    }

    #[test]
    fn rejects_documents_without_name_or_front_matter() {
        assert!(parse_creature_document("# Just markdown").is_none());
        assert!(parse_creature_document("---\nsize: Tiny\n---\nbody").is_none());
        assert!(parse_creature_document("---\nname: [unclosed\n---\n").is_none());
        assert!(parse_creature_document("---\nname: Rat\nno closing fence").is_none());
    }

    #[tokio::test]
    async fn ingest_counts_imports_and_skips() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("troll.md"), TROLL).unwrap();
        std::fs::write(dir.path().join("broken.md"), "---\nname: [unclosed\n---\n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "---\nname: Ignored\n---").unwrap();

        let store = test_store().await;
        let report = store.ingest_bestiary(dir.path()).await.unwrap();
        assert_eq!(report, IngestReport { imported: 1, skipped: 1 });

        let troll = store.get_creature("Troll").await.unwrap().unwrap();
        assert_eq!(troll.tags, vec!["giant", "regenerating"]);

        let again = store.ingest_bestiary(dir.path()).await.unwrap();
        assert_eq!(again.imported, 1);
        assert_eq!(
            store.count_references(tk_core::ReferenceKind::Creature).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn missing_directory_imports_nothing() {
        let store = test_store().await;
        let report = store
            .ingest_bestiary(Path::new("/nonexistent/bestiary"))
            .await
            .unwrap();
        assert_eq!(report, IngestReport::default());
    }
}
