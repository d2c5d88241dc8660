use serde::{Deserialize, Serialize};

/// A video resource attached to a catalog title. Only entries with both a
/// playable `key` and a known `site` can actually be handed to a player.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Video {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub official: Option<bool>,
}

impl Video {
    pub fn new(kind: &str, site: &str, key: &str) -> Self {
        Self {
            name: None,
            key: Some(key.to_string()),
            site: Some(site.to_string()),
            kind: Some(kind.to_string()),
            official: None,
        }
    }
}
