//! Pull a JSON object out of free-form model output.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"```(?:json|JSON)?").unwrap());

/// Extract the outermost `{...}` object from `text`, ignoring Markdown
/// code fences and any prose around it.
pub fn extract_json(text: &str) -> Option<Value> {
    let stripped = CODE_FENCE.replace_all(text, "");
    let start = stripped.find('{')?;
    let end = stripped.rfind('}')?;
    if end < start {
        return None;
    }
    match serde_json::from_str(&stripped[start..=end]) {
        Ok(value @ Value::Object(_)) => Some(value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_object() {
        let value = extract_json(r#"{"name": "Fireball", "level": 3}"#).unwrap();
        assert_eq!(value["level"], 3);
    }

    #[test]
    fn fenced_object_with_prose() {
        let reply = "Here you go:\n```json\n{\"name\": \"Goblin\", \"tags\": [\"goblinoid\"]}\n```\nEnjoy!";
        let value = extract_json(reply).unwrap();
        assert_eq!(value["name"], "Goblin");
        assert_eq!(value["tags"][0], "goblinoid");
    }

    #[test]
    fn nested_objects_take_the_outermost() {
        let value = extract_json(r#"x {"name": "Rope", "properties": {"length": "50 ft"}} y"#).unwrap();
        assert_eq!(value["properties"]["length"], "50 ft");
    }

    #[test]
    fn no_object() {
        assert!(extract_json("I don't know that creature.").is_none());
        assert!(extract_json("} backwards {").is_none());
        assert!(extract_json("{not: valid}").is_none());
    }
}
