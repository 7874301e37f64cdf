use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{deserialize_id, deserialize_optional_text};

/// Icon shown next to a domain.
///
/// The catalog sends a free-form key; unknown or missing keys resolve to
/// [`IconKey::Brain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IconKey {
    #[default]
    Brain,
    Finance,
    Law,
    Entertainment,
    Technical,
    Psychology,
    Education,
    Business,
}

static ICON_REGISTRY: Lazy<HashMap<&'static str, IconKey>> = Lazy::new(|| {
    IconKey::ALL.iter().map(|icon| (icon.as_str(), *icon)).collect()
});

impl IconKey {
    pub const ALL: [IconKey; 8] = [
        IconKey::Brain,
        IconKey::Finance,
        IconKey::Law,
        IconKey::Entertainment,
        IconKey::Technical,
        IconKey::Psychology,
        IconKey::Education,
        IconKey::Business,
    ];

    /// Resolve a catalog key, case-insensitively, falling back to `Brain`.
    pub fn from_key(key: &str) -> Self {
        ICON_REGISTRY
            .get(key.trim().to_ascii_lowercase().as_str())
            .copied()
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IconKey::Brain => "brain",
            IconKey::Finance => "finance",
            IconKey::Law => "law",
            IconKey::Entertainment => "entertainment",
            IconKey::Technical => "technical",
            IconKey::Psychology => "psychology",
            IconKey::Education => "education",
            IconKey::Business => "business",
        }
    }

    /// Single-glyph rendering for terminals.
    pub fn glyph(&self) -> &'static str {
        match self {
            IconKey::Brain => "🧠",
            IconKey::Finance => "💲",
            IconKey::Law => "⚖",
            IconKey::Entertainment => "🎵",
            IconKey::Technical => "💻",
            IconKey::Psychology => "♥",
            IconKey::Education => "📖",
            IconKey::Business => "💼",
        }
    }
}

impl fmt::Display for IconKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for IconKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for IconKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = Option::<String>::deserialize(deserializer)?;
        Ok(key.map(|k| IconKey::from_key(&k)).unwrap_or_default())
    }
}

/// A specialization context from the backend catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub icon: IconKey,
}

impl Domain {
    /// Whether the backend answers in this domain with its own system prompt.
    pub fn is_specialized(&self) -> bool {
        self.system_prompt.is_some()
    }

    /// Hint about generation features the backend offers in this domain.
    ///
    /// Matched on the domain name, not the icon.
    pub fn generation_hint(&self) -> Option<&'static str> {
        match self.name.trim().to_ascii_lowercase().as_str() {
            "entertainment" => Some(
                "Image generation available! Try: 'Generate an image of a fantasy landscape'",
            ),
            "technical" => {
                Some("Technical diagrams available! Try: 'Generate a network diagram'")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_registry_resolves_known_keys() {
        for icon in IconKey::ALL {
            assert_eq!(IconKey::from_key(icon.as_str()), icon);
        }
        assert_eq!(IconKey::from_key("  Finance "), IconKey::Finance);
    }

    #[test]
    fn test_icon_registry_falls_back_to_brain() {
        assert_eq!(IconKey::from_key("astrology"), IconKey::Brain);
        assert_eq!(IconKey::from_key(""), IconKey::Brain);
    }

    #[test]
    fn test_domain_deserialize_from_catalog() {
        let json = r#"{
            "id": 3,
            "name": "Entertainment",
            "description": "Movies and music",
            "system_prompt": "You are a fun assistant.",
            "icon": "entertainment"
        }"#;
        let domain: Domain = serde_json::from_str(json).unwrap();
        assert_eq!(domain.id, "3");
        assert_eq!(domain.icon, IconKey::Entertainment);
        assert_eq!(domain.system_prompt.as_deref(), Some("You are a fun assistant."));
        assert!(domain.generation_hint().is_some());
        assert!(domain.is_specialized());
    }

    #[test]
    fn test_domain_without_icon_or_prompt() {
        let json = r#"{"id": "law", "name": "Law", "description": null, "icon": null}"#;
        let domain: Domain = serde_json::from_str(json).unwrap();
        assert_eq!(domain.icon, IconKey::Brain);
        assert!(domain.description.is_none());
        assert!(domain.system_prompt.is_none());
        assert!(domain.generation_hint().is_none());
        assert!(!domain.is_specialized());
    }
}
