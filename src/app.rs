//! Application state for moviq
//!
//! `App` owns the catalog client (and with it the request cache) and the
//! favorites store. It is built once at startup and handed to whichever front
//! end drives it: a single command or the interactive shell.

use futures::future;
use thiserror::Error;

use crate::cache::RequestCache;
use crate::cli::{Action, CliError, Settings};
use crate::data::sort::filter_by_genre;
use crate::data::{sort_movies, CatalogClient, Category, Movie, MovieDetails, MoviesPage, SortOrder};
use crate::error::ApiError;
use crate::favorites::{FavoritesError, FavoritesStore};
use crate::render;

/// Everything that can stop an action from completing
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Favorites(#[from] FavoritesError),

    #[error(transparent)]
    Cli(#[from] CliError),

    /// Terminal input or output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Home feed: trending movies plus recommendations for the top one
#[derive(Debug, Clone, PartialEq)]
pub struct HomeView {
    pub trending: MoviesPage,
    /// The movie recommendations are based on, and the recommendations
    pub recommended: Option<(Movie, Vec<Movie>)>,
}

/// A list of movies with paging information
#[derive(Debug, Clone, PartialEq)]
pub struct ListView {
    pub title: String,
    pub page: MoviesPage,
}

/// Everything the movie detail view shows
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub details: MovieDetails,
    pub recommendations: Vec<Movie>,
    pub is_favorite: bool,
}

/// What a favorites edit did
#[derive(Debug, Clone, PartialEq)]
pub enum FavoriteChange {
    Added(Movie),
    AlreadyFavorite(u64),
    Removed(Movie),
    NotFavorite(u64),
    /// The catalog has no movie with this id
    UnknownMovie(u64),
}

/// Main application struct owning the catalog client and favorites
pub struct App {
    catalog: CatalogClient,
    favorites: FavoritesStore,
    /// Whether the catalog can be reached at all (an API key is configured)
    online: bool,
}

impl App {
    /// Builds the app from resolved settings, loading favorites from disk
    pub fn new(settings: &Settings) -> Result<Self, AppError> {
        let catalog = CatalogClient::with_parts(
            settings.catalog.clone(),
            RequestCache::with_ttl(settings.cache_ttl),
            settings.retry,
        )?;
        let favorites = FavoritesStore::open(&settings.favorites_path)?;
        Ok(Self {
            catalog,
            favorites,
            online: settings.has_api_key(),
        })
    }

    /// Builds the app from already constructed parts
    pub fn with_parts(catalog: CatalogClient, favorites: FavoritesStore) -> Self {
        let online = !catalog.config().api_key.is_empty();
        Self {
            catalog,
            favorites,
            online,
        }
    }

    pub fn catalog(&self) -> &CatalogClient {
        &self.catalog
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    /// Loads the home feed
    ///
    /// Recommendations are best effort: if they fail the feed still shows.
    pub async fn home(&self) -> Result<HomeView, ApiError> {
        let trending = self.catalog.list(Category::Trending, 1).await?;

        let recommended = match trending.results.first() {
            Some(top) => match self.catalog.recommendations(top.id, 1).await {
                Ok(page) => Some((top.clone(), page.results)),
                Err(e) => {
                    tracing::warn!(id = top.id, error = %e, "recommendations unavailable");
                    None
                }
            },
            None => None,
        };

        Ok(HomeView {
            trending,
            recommended,
        })
    }

    /// Loads one page of a curated list, optionally filtered and sorted
    pub async fn list(
        &self,
        category: Category,
        page: u32,
        genre: Option<u32>,
        sort: Option<SortOrder>,
    ) -> Result<ListView, ApiError> {
        let mut page = self.catalog.list(category, page).await?;
        if let Some(genre) = genre {
            page.results = filter_by_genre(page.results, genre);
        }
        if let Some(order) = sort {
            sort_movies(&mut page.results, order);
        }
        Ok(ListView {
            title: category.label().to_string(),
            page,
        })
    }

    /// Runs a search
    pub async fn search(
        &self,
        query: &str,
        page: u32,
        sort: Option<SortOrder>,
    ) -> Result<ListView, ApiError> {
        let mut page = self.catalog.search(query, page).await?;
        if let Some(order) = sort {
            sort_movies(&mut page.results, order);
        }
        Ok(ListView {
            title: format!("Search results for \"{}\"", query.trim()),
            page,
        })
    }

    /// Loads the detail view, fetching details and recommendations concurrently
    ///
    /// # Returns
    /// * `Ok(None)` if the catalog does not know the movie
    pub async fn movie(&self, id: u64) -> Result<Option<DetailView>, ApiError> {
        let (details, recommendations) =
            future::join(self.catalog.details(id), self.catalog.recommendations(id, 1)).await;

        let Some(details) = details? else {
            return Ok(None);
        };

        let recommendations = recommendations
            .map(|page| page.results)
            .unwrap_or_else(|e| {
                tracing::warn!(id, error = %e, "recommendations unavailable");
                Vec::new()
            });

        Ok(Some(DetailView {
            is_favorite: self.favorites.is_favorite(id),
            details,
            recommendations,
        }))
    }

    /// Favorites in insertion order, or sorted
    pub fn favorites_list(&self, sort: Option<SortOrder>) -> Vec<Movie> {
        let mut movies = self.favorites.list().to_vec();
        if let Some(order) = sort {
            sort_movies(&mut movies, order);
        }
        movies
    }

    /// Adds a movie to favorites by id, fetching it from the catalog first
    pub async fn add_favorite(&mut self, id: u64) -> Result<FavoriteChange, AppError> {
        if self.favorites.is_favorite(id) {
            return Ok(FavoriteChange::AlreadyFavorite(id));
        }
        let Some(details) = self.catalog.details(id).await? else {
            return Ok(FavoriteChange::UnknownMovie(id));
        };
        self.add_movie(details.to_movie())
    }

    /// Adds an already fetched movie to favorites
    pub fn add_movie(&mut self, movie: Movie) -> Result<FavoriteChange, AppError> {
        let id = movie.id;
        if self.favorites.add(movie.clone())? {
            Ok(FavoriteChange::Added(movie))
        } else {
            Ok(FavoriteChange::AlreadyFavorite(id))
        }
    }

    /// Removes a movie from favorites
    pub fn remove_favorite(&mut self, id: u64) -> Result<FavoriteChange, AppError> {
        Ok(match self.favorites.remove(id)? {
            Some(movie) => FavoriteChange::Removed(movie),
            None => FavoriteChange::NotFavorite(id),
        })
    }

    /// Performs one action and renders its output as text
    pub async fn execute(&mut self, action: &Action) -> Result<String, AppError> {
        if action.needs_network() && !self.online {
            return Err(CliError::MissingApiKey.into());
        }

        let output = match action {
            Action::Home => render::home(&self.home().await?),
            Action::List {
                category,
                page,
                genre,
                sort,
            } => render::list(&self.list(*category, *page, *genre, *sort).await?),
            Action::Search { query, page, sort } => {
                render::list(&self.search(query, *page, *sort).await?)
            }
            Action::Movie(id) => match self.movie(*id).await? {
                Some(view) => render::detail(&view),
                None => render::not_found(*id),
            },
            Action::Favorites(sort) => render::favorites(&self.favorites_list(*sort)),
            Action::AddFavorite(id) => render::change(&self.add_favorite(*id).await?),
            Action::RemoveFavorite(id) => render::change(&self.remove_favorite(*id)?),
            Action::Shell => String::new(),
        };
        Ok(output)
    }
}
