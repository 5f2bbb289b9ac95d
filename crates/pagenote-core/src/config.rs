use serde::Deserialize;

use crate::DEFAULT_STORAGE_KEY;

/// Runtime settings for the overlay. Every field is optional in the
/// serialized form; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Storage key the note mapping lives under.
    pub storage_key: String,
    /// Delay before an opened editor grabs keyboard focus.
    pub focus_delay_ms: u32,
    /// Delay before a shown context menu starts listening for outside
    /// pointer-downs, so the opening click doesn't close it.
    pub menu_arm_delay_ms: u32,
    /// Log filter directive, e.g. `info` or `pagenote_web=debug`.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            focus_delay_ms: 100,
            menu_arm_delay_ms: 100,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Parse a JSON config object.
    pub fn from_json(raw: &str) -> Result<Self, crate::Error> {
        Ok(serde_json::from_str(raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.storage_key, "page_notes");
        assert_eq!(config.focus_delay_ms, 100);
        assert_eq!(config.menu_arm_delay_ms, 100);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = Config::from_json(r#"{"storageKey": "docs_notes", "focusDelayMs": 0}"#).unwrap();
        assert_eq!(
            config,
            Config {
                storage_key: "docs_notes".to_string(),
                focus_delay_ms: 0,
                ..Config::default()
            }
        );
    }

    #[test]
    fn test_invalid_json() {
        assert!(Config::from_json(r#"{"focusDelayMs": "soon"}"#).is_err());
    }
}
