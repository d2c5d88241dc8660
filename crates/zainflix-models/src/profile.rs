use serde::{Deserialize, Serialize};

/// Display attributes of a profile identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileAttrs {
    pub icon: String,
    /// Hex color, `#`-prefixed.
    pub color: String,
    pub avatar: String,
}

/// Where a profile comes from. Built-ins are fixed in code and immutable;
/// custom profiles are user-created and persisted per user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProfileSource {
    Builtin,
    Custom,
}

/// A profile after merging built-in and custom sets, with provenance kept
/// explicit so callers can tell which set it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProfile {
    pub attrs: ProfileAttrs,
    pub source: ProfileSource,
}
