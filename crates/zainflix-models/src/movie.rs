use serde::{Deserialize, Serialize};

/// A movie or show as the catalog API returns it. List endpoints and the
/// detail endpoint populate different subsets, so everything past `id` is
/// optional; unknown fields are dropped on decode and absent fields are
/// dropped on encode to keep stored documents compact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: u64,
    /// Movie title. TV entries use `name` instead.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backdrop_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_air_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adult: Option<bool>,
    /// Detail endpoint only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<Genre>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

impl Movie {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            title: None,
            name: None,
            overview: None,
            poster_path: None,
            backdrop_path: None,
            vote_average: None,
            release_date: None,
            first_air_date: None,
            media_type: None,
            adult: None,
            runtime: None,
            genres: None,
        }
    }

    /// Title for display: movies carry `title`, shows carry `name`.
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("Unknown Title")
    }

    /// Release year parsed from the date prefix; shows fall back to
    /// `first_air_date`.
    pub fn release_year(&self) -> Option<i32> {
        self.release_date
            .as_deref()
            .or(self.first_air_date.as_deref())
            .and_then(|d| d.split('-').next())
            .and_then(|y| y.parse().ok())
    }

    /// Average score, with missing scores treated as zero.
    pub fn score(&self) -> f64 {
        self.vote_average.unwrap_or(0.0)
    }
}
