//! The [`ContentSource`] seam and its chat-backed implementation.

use async_trait::async_trait;
use serde_json::Value;
use tk_core::{ReferenceKind, ReferenceRecord};
use tracing::{debug, info};

use crate::client::{ChatClient, ChatMessage};
use crate::error::{LookupError, LookupResult};
use crate::extract::extract_json;
use crate::prompt;

/// Source label stamped on records that came from a lookup.
pub const LOOKUP_SOURCE: &str = "lookup";

/// Something that can describe reference records and advise on encounters.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Describe `subject` as a record of `kind`. The result is a draft and
    /// must not be stored without confirmation.
    async fn lookup(&self, kind: ReferenceKind, subject: &str) -> LookupResult<ReferenceRecord>;

    /// Free-text tactical suggestions for an encounter.
    async fn suggest(&self, encounter_summary: &str, notes: &str) -> LookupResult<String>;
}

/// Decode a model reply into a record of `kind`.
///
/// A missing or blank `name` falls back to the subject that was asked for.
/// A record that would not pass validation is rejected here, before it can
/// become a draft.
pub fn record_from_reply(kind: ReferenceKind, subject: &str, reply: &str) -> LookupResult<ReferenceRecord> {
    let no_record = || LookupError::NoRecord {
        subject: subject.to_string(),
    };
    let Some(Value::Object(mut object)) = extract_json(reply) else {
        return Err(no_record());
    };
    let blank_name = object
        .get("name")
        .and_then(Value::as_str)
        .is_none_or(|name| name.trim().is_empty());
    if blank_name {
        object.insert("name".to_string(), Value::String(subject.trim().to_string()));
    }
    object.remove("id");

    let mut record = ReferenceRecord::from_json(kind, Value::Object(object))?;
    record.set_source(LOOKUP_SOURCE);
    record.validate()?;
    Ok(record)
}

#[async_trait]
impl ContentSource for ChatClient {
    async fn lookup(&self, kind: ReferenceKind, subject: &str) -> LookupResult<ReferenceRecord> {
        let messages = [
            ChatMessage::system(prompt::LOOKUP_SYSTEM),
            ChatMessage::user(&prompt::lookup_prompt(kind, subject)),
        ];
        let reply = self.chat(&messages).await?;
        debug!(%kind, subject, chars = reply.len(), "lookup reply received");
        let record = record_from_reply(kind, subject, &reply)?;
        info!(%kind, name = record.name(), "looked up reference record");
        Ok(record)
    }

    async fn suggest(&self, encounter_summary: &str, notes: &str) -> LookupResult<String> {
        let messages = [
            ChatMessage::system(prompt::SUGGEST_SYSTEM),
            ChatMessage::user(&prompt::suggest_prompt(encounter_summary, notes)),
        ];
        self.chat(&messages).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_becomes_record_with_lookup_source() {
        let reply = "```json\n{\"name\": \"Fireball\", \"level\": 3, \"school\": \"Evocation\", \"source\": \"PHB\"}\n```";
        let record = record_from_reply(ReferenceKind::Spell, "fireball", reply).unwrap();
        let ReferenceRecord::Spell(spell) = record else {
            panic!("expected a spell");
        };
        assert_eq!(spell.name, "Fireball");
        assert_eq!(spell.level, 3);
        assert_eq!(spell.source, LOOKUP_SOURCE);
    }

    #[test]
    fn blank_name_uses_subject() {
        let record = record_from_reply(ReferenceKind::Item, " Rope ", r#"{"name": "", "type": "Gear"}"#).unwrap();
        assert_eq!(record.name(), "Rope");
    }

    #[test]
    fn prose_reply_is_no_record() {
        let err = record_from_reply(ReferenceKind::Creature, "Tarrasque", "Sorry, I can't help.").unwrap_err();
        assert!(matches!(err, LookupError::NoRecord { subject } if subject == "Tarrasque"));
    }

    #[test]
    fn invalid_records_are_rejected() {
        let reply = r#"{"name": "Cloak of Elvenkind", "type": "Wondrous Item", "rarity": "very rare (requires attunement)"}"#;
        let err = record_from_reply(ReferenceKind::Item, "Cloak of Elvenkind", reply).unwrap_err();
        assert!(err.to_string().contains("unknown rarity"));

        let err = record_from_reply(ReferenceKind::Spell, "Wish", r#"{"name": "Wish", "level": 12}"#).unwrap_err();
        assert!(matches!(err, LookupError::Core(_)));
    }

    #[test]
    fn wrong_field_types_are_core_errors() {
        let err = record_from_reply(ReferenceKind::Spell, "Wish", r#"{"name": "Wish", "level": "nine"}"#).unwrap_err();
        assert!(matches!(err, LookupError::Core(_)));
    }
}
