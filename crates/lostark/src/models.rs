//! Wire types for the upstream `characters/{name}/siblings` response.

use dwarf_core::level::{parse_item_level, LevelParseError};
use serde::Deserialize;

/// One entry of the siblings response: a character on the same account
/// as the queried handle.
///
/// Field names mirror the upstream PascalCase JSON.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SiblingCharacter {
    #[serde(rename = "CharacterName")]
    pub character_name: String,
    #[serde(rename = "CharacterClassName")]
    pub class_name: String,
    #[serde(rename = "ServerName")]
    pub server_name: String,
    /// Localized item level string, e.g. `"1,620.00"`.
    #[serde(rename = "ItemMaxLevel")]
    pub item_max_level: String,
}

impl SiblingCharacter {
    /// Parse the localized item-level string into an `f64`.
    pub fn item_level(&self) -> Result<f64, LevelParseError> {
        parse_item_level(&self.item_max_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_upstream_field_names() {
        let json = r#"[
            {
                "ServerName": "Nineveh",
                "CharacterName": "alice",
                "CharacterLevel": 70,
                "CharacterClassName": "Bard",
                "ItemAvgLevel": "1,650.00",
                "ItemMaxLevel": "1,650.00"
            }
        ]"#;

        let parsed: Vec<SiblingCharacter> = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].character_name, "alice");
        assert_eq!(parsed[0].class_name, "Bard");
        assert_eq!(parsed[0].server_name, "Nineveh");
        assert_eq!(parsed[0].item_level().unwrap(), 1650.0);
    }

    #[test]
    fn bad_item_level_surfaces_parse_error() {
        let character = SiblingCharacter {
            character_name: "alice".into(),
            class_name: "Bard".into(),
            server_name: "Nineveh".into(),
            item_max_level: "???".into(),
        };
        assert!(character.item_level().is_err());
    }
}
