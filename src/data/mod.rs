//! Core data models for moviq
//!
//! This module contains the movie types returned by the catalog API and the
//! helpers for naming genres, building image URLs and ordering result lists.

pub mod catalog;
pub mod genres;
pub mod images;
pub mod sort;

pub use catalog::{CatalogClient, CatalogConfig, Category};
pub use genres::{genre_by_slug, genre_name, GenreEntry};
pub use images::{image_url, ImageSize};
pub use sort::{sort_movies, SortOrder};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ApiError;

/// A movie as it appears in catalog lists and in the favorites file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// Catalog identifier
    pub id: u64,
    /// Display title
    pub title: String,
    /// Synopsis
    #[serde(default)]
    pub overview: String,
    /// Poster image path fragment (e.g. "/qJ2tW6WMUDux911r6m7haRef0WH.jpg")
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path fragment
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Release date; unreleased titles often have none
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub release_date: Option<NaiveDate>,
    /// Average rating, 0 to 10
    pub vote_average: f64,
    /// Number of ratings
    pub vote_count: u64,
    /// Genre identifiers
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    /// Popularity score
    pub popularity: f64,
}

/// A genre as returned by the detail endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// Full details for a single movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    /// The list fields shared with `Movie`
    #[serde(flatten)]
    pub movie: Movie,
    /// Expanded genre list
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Runtime in minutes
    #[serde(default)]
    pub runtime: Option<u32>,
    /// Lifecycle status ("Released", "Post Production", ...)
    #[serde(default)]
    pub status: String,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub tagline: Option<String>,
    /// Budget in US dollars
    #[serde(default)]
    pub budget: u64,
    /// Revenue in US dollars
    #[serde(default)]
    pub revenue: u64,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub homepage: Option<String>,
}

/// One page of a paginated movie list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoviesPage {
    pub page: u32,
    pub results: Vec<Movie>,
    pub total_pages: u32,
    pub total_results: u64,
}

/// Domain checks applied to decoded responses before they are used or cached
pub trait Validate {
    fn validate(&self) -> Result<(), ApiError>;
}

impl Validate for Movie {
    /// Checks the values serde cannot: the rating scale and non-negative scores
    fn validate(&self) -> Result<(), ApiError> {
        if !(0.0..=10.0).contains(&self.vote_average) {
            return Err(ApiError::Malformed(format!(
                "movie {} has vote_average {} outside 0-10",
                self.id, self.vote_average
            )));
        }
        if !self.popularity.is_finite() || self.popularity < 0.0 {
            return Err(ApiError::Malformed(format!(
                "movie {} has invalid popularity {}",
                self.id, self.popularity
            )));
        }
        Ok(())
    }
}

impl Movie {
    /// Release year, if the release date is known
    pub fn year(&self) -> Option<i32> {
        use chrono::Datelike;
        self.release_date.map(|d| d.year())
    }

    /// Poster URL at the given size
    pub fn poster_url(&self, size: ImageSize) -> Option<String> {
        self.poster_path.as_deref().map(|p| image_url(p, size))
    }

    /// Backdrop URL at the given size
    pub fn backdrop_url(&self, size: ImageSize) -> Option<String> {
        self.backdrop_path.as_deref().map(|p| image_url(p, size))
    }
}

impl Validate for MovieDetails {
    fn validate(&self) -> Result<(), ApiError> {
        self.movie.validate()
    }
}

impl MovieDetails {
    /// The list-shaped view of these details, as stored in favorites.
    ///
    /// The detail endpoint has no `genre_ids`, so they are taken from `genres`.
    pub fn to_movie(&self) -> Movie {
        let mut movie = self.movie.clone();
        if movie.genre_ids.is_empty() {
            movie.genre_ids = self.genres.iter().map(|g| g.id).collect();
        }
        movie
    }
}

impl Validate for MoviesPage {
    /// Checks paging fields and every movie on the page
    fn validate(&self) -> Result<(), ApiError> {
        if self.page == 0 {
            return Err(ApiError::Malformed("page numbers start at 1".to_string()));
        }
        self.results.iter().try_for_each(Validate::validate)
    }
}

impl MoviesPage {
    /// Whether another page follows this one
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Accepts `null`, `""` or `"YYYY-MM-DD"`.
fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("invalid date '{}': {}", s, e))),
    }
}

/// Maps `null` and `""` to `None`.
fn deserialize_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()))
}
