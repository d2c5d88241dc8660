use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::movie::Movie;

/// A saved title: the catalog's representation plus the two fields the list
/// layer stamps on insert. Stored under the scope key that added it and
/// never visible to any other scope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchListEntry {
    #[serde(flatten)]
    pub movie: Movie,
    #[serde(rename = "addedAt")]
    pub added_at: DateTime<Utc>,
    /// Origin tag, e.g. which surface the add came from.
    #[serde(rename = "addedFrom")]
    pub added_from: String,
}

/// Read-only snapshot of one scope's list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListExport {
    pub user: String,
    pub profile: String,
    pub movies: Vec<WatchListEntry>,
    #[serde(rename = "exportedAt")]
    pub exported_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_serializes_with_camel_case_stamps() {
        let entry = WatchListEntry {
            movie: Movie::new(42),
            added_at: Utc::now(),
            added_from: "browse".to_string(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["id"], 42);
        assert!(json.get("addedAt").is_some());
        assert_eq!(json["addedFrom"], "browse");
    }
}
