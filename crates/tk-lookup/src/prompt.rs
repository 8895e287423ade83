//! Prompt templates.
//!
//! Lookup prompts show the model the exact field layout of the record so
//! the reply can be decoded straight into a [`ReferenceRecord`].
//!
//! [`ReferenceRecord`]: tk_core::ReferenceRecord

use serde_json::{Value, json};
use tk_core::ReferenceKind;

/// System message sent ahead of every lookup.
pub const LOOKUP_SYSTEM: &str = "You are a D&D 5e rules expert. You answer with a single JSON object and nothing else.";

/// System message sent ahead of encounter suggestions.
pub const SUGGEST_SYSTEM: &str = "You are an experienced D&D 5e Dungeon Master providing tactical advice.";

/// The field layout for one kind of record, with a hint per field.
pub fn schema(kind: ReferenceKind) -> Value {
    match kind {
        ReferenceKind::Creature => json!({
            "name": "string",
            "size": "string (e.g. Medium humanoid)",
            "alignment": "string",
            "challenge": "string (e.g. '5 (1,800 XP)')",
            "hit_points": "string (e.g. '65 (10d8+20)')",
            "armor_class": "string (e.g. '15 (chain mail)')",
            "speed": "string (e.g. '30 ft.')",
            "str_score": "integer",
            "dex_score": "integer",
            "con_score": "integer",
            "int_score": "integer",
            "wis_score": "integer",
            "cha_score": "integer",
            "str_mod": "string (e.g. '(+2)')",
            "dex_mod": "string",
            "con_mod": "string",
            "int_mod": "string",
            "wis_mod": "string",
            "cha_mod": "string",
            "skills": "string",
            "saving_throws": "string",
            "senses": "string",
            "languages": "string",
            "abilities": "string (Markdown: traits, actions, legendary actions)",
            "tags": "array of strings"
        }),
        ReferenceKind::Spell => json!({
            "name": "string",
            "level": "integer (0 = cantrip)",
            "school": "string",
            "casting_time": "string",
            "range": "string",
            "components": "string",
            "duration": "string",
            "description": "string",
            "classes": "string (comma-separated)"
        }),
        ReferenceKind::Item => json!({
            "name": "string",
            "type": "string (e.g. Weapon, Armor, Wondrous Item)",
            "rarity": "string (common/uncommon/rare/very rare/legendary/artifact)",
            "description": "string",
            "properties": "object (any additional key-value properties)"
        }),
    }
}

fn noun(kind: ReferenceKind) -> &'static str {
    match kind {
        ReferenceKind::Creature => "creature",
        ReferenceKind::Spell => "spell",
        ReferenceKind::Item => "magic item",
    }
}

/// The user message for a lookup.
pub fn lookup_prompt(kind: ReferenceKind, subject: &str) -> String {
    let layout = serde_json::to_string_pretty(&schema(kind)).unwrap_or_default();
    format!(
        "Return a JSON object describing the {} \"{}\" using exactly this schema (fill every field):\n\n{}\n\nRespond with only the JSON object, no extra text.",
        noun(kind),
        subject.trim(),
        layout
    )
}

/// The user message for encounter suggestions.
pub fn suggest_prompt(encounter_summary: &str, notes: &str) -> String {
    let notes = if notes.trim().is_empty() { "None" } else { notes.trim() };
    format!(
        "Current encounter:\n{}\n\nAdditional notes: {}\n\nProvide 3-5 concise tactical suggestions or narrative hooks for this encounter. Be specific and practical.",
        encounter_summary.trim_end(),
        notes
    )
}
