use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};
use zainflix_config::CatalogConfig;
use zainflix_models::{Movie, Video};

use crate::error::CatalogError;

/// List responses wrap their payload in a `results` field.
#[derive(Debug, Deserialize)]
struct Paged<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

/// Client for the external movie catalog API. Authentication is a static
/// bearer token on every request; there are no retries and no timeouts
/// beyond what the transport enforces.
pub struct CatalogClient {
    client: Client,
    base_url: String,
    access_token: String,
}

impl CatalogClient {
    pub fn new(config: &CatalogConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
        }
    }

    async fn get<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<T, CatalogError> {
        let url = format!("{}{}", self.base_url, path_and_query);
        debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.access_token))
            .header("Content-Type", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Status { status, body });
        }

        Ok(response.json().await?)
    }

    async fn get_list(&self, path_and_query: &str) -> Result<Vec<Movie>, CatalogError> {
        let page: Paged<Movie> = self.get(path_and_query).await?;
        Ok(page.results)
    }

    pub async fn popular_movies(&self) -> Result<Vec<Movie>, CatalogError> {
        self.get_list("/movie/popular").await
    }

    pub async fn trending(&self) -> Result<Vec<Movie>, CatalogError> {
        self.get_list("/trending/all/week").await
    }

    pub async fn popular_tv(&self) -> Result<Vec<Movie>, CatalogError> {
        self.get_list("/tv/popular").await
    }

    pub async fn now_playing(&self) -> Result<Vec<Movie>, CatalogError> {
        self.get_list("/movie/now_playing").await
    }

    pub async fn discover_by_genre(&self, genre_id: u32) -> Result<Vec<Movie>, CatalogError> {
        self.get_list(&format!("/discover/movie?with_genres={genre_id}"))
            .await
    }

    pub async fn movie_details(&self, id: u64) -> Result<Movie, CatalogError> {
        self.get(&format!("/movie/{id}")).await
    }

    /// Video resources for a title. Failures degrade to an empty list so
    /// playback surfaces "no video available" instead of an error.
    pub async fn videos(&self, id: u64) -> Vec<Video> {
        match self.get::<Paged<Video>>(&format!("/movie/{id}/videos")).await {
            Ok(page) => page.results,
            Err(e) => {
                warn!("Failed to fetch videos for {}: {}", id, e);
                Vec::new()
            }
        }
    }
}
