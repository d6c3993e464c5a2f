//! Movie catalog API client
//!
//! This module talks to the TMDB v3 API. Every request goes through the
//! request cache first and the retry wrapper second, and every response is
//! decoded into strict types before it reaches the rest of the program.

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;

use super::{MovieDetails, MoviesPage, Validate};
use crate::cache::{cache_key, RequestCache};
use crate::error::ApiError;
use crate::retry::{with_retries, RetryPolicy};

/// Base URL for the catalog API
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Language sent with every request unless configured otherwise
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Per-request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Curated movie lists offered by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Trending,
    TopRated,
    Upcoming,
    NowPlaying,
}

impl Category {
    /// All categories, in display order
    pub const ALL: [Category; 4] = [
        Category::Trending,
        Category::TopRated,
        Category::Upcoming,
        Category::NowPlaying,
    ];

    /// Parses a category name, accepting dashes, underscores or spaces
    pub fn from_str(s: &str) -> Option<Category> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "trending" => Some(Category::Trending),
            "top-rated" | "top" => Some(Category::TopRated),
            "upcoming" => Some(Category::Upcoming),
            "now-playing" | "playing" => Some(Category::NowPlaying),
            _ => None,
        }
    }

    /// Endpoint path relative to the API base
    pub fn path(&self) -> &'static str {
        match self {
            Category::Trending => "/trending/movie/week",
            Category::TopRated => "/movie/top_rated",
            Category::Upcoming => "/movie/upcoming",
            Category::NowPlaying => "/movie/now_playing",
        }
    }

    /// Human-readable name
    pub fn label(&self) -> &'static str {
        match self {
            Category::Trending => "Trending",
            Category::TopRated => "Top Rated",
            Category::Upcoming => "Upcoming",
            Category::NowPlaying => "Now Playing",
        }
    }

    /// Slug accepted on the command line
    pub fn slug(&self) -> &'static str {
        match self {
            Category::Trending => "trending",
            Category::TopRated => "top-rated",
            Category::Upcoming => "upcoming",
            Category::NowPlaying => "now-playing",
        }
    }
}

/// Connection settings for the catalog API
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// API base URL without a trailing slash
    pub base_url: String,
    /// API key sent as the `api_key` query parameter
    pub api_key: String,
    /// Language sent as the `language` query parameter
    pub language: String,
}

impl CatalogConfig {
    /// Config for the public catalog with the default language
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    /// Overrides the API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Overrides the language
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

/// Error body the catalog sends with failed requests
#[derive(Debug, Deserialize)]
struct ErrorBody {
    status_message: Option<String>,
}

/// Client for the movie catalog API
#[derive(Debug)]
pub struct CatalogClient {
    http_client: Client,
    config: CatalogConfig,
    cache: RequestCache,
    retry: RetryPolicy,
}

impl CatalogClient {
    /// Creates a client with a fresh 5 minute cache and the default retry policy
    pub fn new(config: CatalogConfig) -> Result<Self, ApiError> {
        Self::with_parts(config, RequestCache::new(), RetryPolicy::default())
    }

    /// Creates a client with an explicit cache and retry policy
    pub fn with_parts(
        config: CatalogConfig,
        cache: RequestCache,
        retry: RetryPolicy,
    ) -> Result<Self, ApiError> {
        let http_client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ApiError::from)?;
        Ok(Self {
            http_client,
            config,
            cache,
            retry,
        })
    }

    /// The request cache shared by every call on this client
    pub fn cache(&self) -> &RequestCache {
        &self.cache
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Fetches one page of a curated list
    pub async fn list(&self, category: Category, page: u32) -> Result<MoviesPage, ApiError> {
        self.get_cached(category.path(), vec![("page", page.max(1).to_string())])
            .await
    }

    /// Runs a full-text search
    ///
    /// A blank query is rejected without touching the network.
    pub async fn search(&self, query: &str, page: u32) -> Result<MoviesPage, ApiError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ApiError::InvalidRequest(
                "Please enter a search query".to_string(),
            ));
        }

        self.get_cached(
            "/search/movie",
            vec![
                ("query", query.to_string()),
                ("page", page.max(1).to_string()),
            ],
        )
        .await
    }

    /// Fetches full details for one movie
    ///
    /// # Returns
    /// * `Ok(Some(MovieDetails))` if the movie exists
    /// * `Ok(None)` if the catalog answered 404
    /// * `Err(ApiError)` for every other failure
    pub async fn details(&self, id: u64) -> Result<Option<MovieDetails>, ApiError> {
        let path = format!("/movie/{}", id);
        match self.get_cached::<MovieDetails>(&path, Vec::new()).await {
            Ok(details) => Ok(Some(details)),
            Err(e) if e.is_not_found() => {
                tracing::info!(id, "movie not found");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Fetches movies recommended alongside `id`
    pub async fn recommendations(&self, id: u64, page: u32) -> Result<MoviesPage, ApiError> {
        let path = format!("/movie/{}/recommendations", id);
        self.get_cached(&path, vec![("page", page.max(1).to_string())])
            .await
    }

    /// Serves `path` from the cache, or fetches it with retries and caches the result
    async fn get_cached<T>(&self, path: &str, mut params: Vec<(&str, String)>) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Serialize + Validate,
    {
        params.push(("language", self.config.language.clone()));
        let key = cache_key(path, &params);

        if let Some(cached) = self.cache.get::<T>(&key) {
            tracing::debug!(key = %key, "using cached response");
            return Ok(cached);
        }

        let data: T = with_retries(&self.retry, || self.fetch(path, &params)).await?;
        self.cache.set(&key, &data);
        Ok(data)
    }

    /// Performs one GET, then decodes and validates the body
    async fn fetch<T: DeserializeOwned + Validate>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.config.base_url, path);
        tracing::debug!(url = %url, "requesting");

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.config.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|body| body.status_message);
            return Err(ApiError::from_status(status.as_u16(), message));
        }

        let data: T = serde_json::from_str(&text)?;
        data.validate()?;
        Ok(data)
    }
}
