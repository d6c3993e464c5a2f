//! Command-line interface parsing for moviq
//!
//! This module handles parsing of CLI arguments using clap, resolving them
//! (together with their environment fallbacks) into the `Settings` the app is
//! built from and the `Action` it should perform. The interactive shell reuses
//! the same subcommand grammar for each line it reads.

use chrono::Duration as TtlDuration;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::data::catalog::{DEFAULT_BASE_URL, DEFAULT_LANGUAGE};
use crate::data::{genre_by_slug, CatalogConfig, Category, SortOrder};
use crate::favorites::{FavoritesError, FavoritesStore};
use crate::retry::RetryPolicy;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified category name is not recognized
    #[error("Invalid category: '{0}'. Valid categories: trending, top-rated, upcoming, now-playing")]
    InvalidCategory(String),

    /// The specified sort key is not recognized
    #[error("Invalid sort order: '{0}'. Valid orders: popularity.desc, popularity.asc, vote_average.desc, vote_average.asc, release_date.desc, release_date.asc, original_title.asc, original_title.desc")]
    InvalidSort(String),

    /// The specified genre slug is not recognized
    #[error("Invalid genre: '{0}'")]
    InvalidGenre(String),

    /// A network command was requested without an API key
    #[error("No API key configured. Pass --api-key or set TMDB_API_KEY")]
    MissingApiKey,

    /// The favorites location could not be determined
    #[error(transparent)]
    Favorites(#[from] FavoritesError),

    /// A line typed into the shell did not parse
    #[error("{0}")]
    Shell(String),
}

/// moviq - Discover movies and keep a list of favorites
#[derive(Parser, Debug)]
#[command(name = "moviq")]
#[command(about = "Discover trending movies, search the catalog and keep a list of favorites")]
#[command(version)]
pub struct Cli {
    /// Catalog API key
    #[arg(long, env = "TMDB_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Language sent with every catalog request
    #[arg(long, env = "MOVIQ_LANGUAGE", default_value = DEFAULT_LANGUAGE, global = true)]
    pub language: String,

    /// Catalog API base URL
    #[arg(long, env = "MOVIQ_API_URL", default_value = DEFAULT_BASE_URL, global = true, hide = true)]
    pub api_url: String,

    /// Favorites file (defaults to the platform data directory)
    #[arg(long, env = "MOVIQ_FAVORITES", value_name = "PATH", global = true)]
    pub favorites_file: Option<PathBuf>,

    /// How long catalog responses are reused, in minutes
    #[arg(long, default_value_t = 5, value_name = "MINUTES", global = true)]
    pub cache_ttl: u32,

    /// How many times a failed request is retried
    #[arg(long, default_value_t = 3, global = true)]
    pub retries: u32,

    /// Delay before the first retry, in milliseconds (doubled for each retry)
    #[arg(long, default_value_t = 1000, value_name = "MS", global = true)]
    pub retry_delay: u64,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// What to show; defaults to the home feed
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Views and actions available from the command line and the shell
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Trending movies and recommendations for the top one
    Home,

    /// A curated list: trending, top-rated, upcoming or now-playing
    List {
        /// Category name
        category: String,
        /// Result page
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Only show movies of this genre (e.g. "action", "sci-fi")
        #[arg(long)]
        genre: Option<String>,
        /// Sort key, e.g. "vote_average.desc"
        #[arg(long)]
        sort: Option<String>,
    },

    /// Search the catalog by title
    Search {
        /// Search terms
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Result page
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Sort key, e.g. "release_date.desc"
        #[arg(long)]
        sort: Option<String>,
    },

    /// Details and recommendations for one movie
    Movie {
        /// Catalog movie id
        id: u64,
    },

    /// Show or edit the favorites list
    Favorites {
        #[command(subcommand)]
        action: Option<FavoritesCommand>,
    },

    /// Interactive session reusing one cache across commands
    Shell,
}

/// Favorites subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum FavoritesCommand {
    /// List favorites
    List {
        /// Sort key; insertion order if omitted
        #[arg(long)]
        sort: Option<String>,
    },
    /// Add a movie by id
    Add { id: u64 },
    /// Remove a movie by id
    Remove { id: u64 },
}

/// A fully validated request for the app
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Home,
    List {
        category: Category,
        page: u32,
        genre: Option<u32>,
        sort: Option<SortOrder>,
    },
    Search {
        query: String,
        page: u32,
        sort: Option<SortOrder>,
    },
    Movie(u64),
    Favorites(Option<SortOrder>),
    AddFavorite(u64),
    RemoveFavorite(u64),
    Shell,
}

impl Action {
    /// Resolves a parsed subcommand; no subcommand means the home feed
    pub fn from_command(command: Option<&Command>) -> Result<Self, CliError> {
        let Some(command) = command else {
            return Ok(Action::Home);
        };
        Ok(match command {
            Command::Home => Action::Home,
            Command::List {
                category,
                page,
                genre,
                sort,
            } => Action::List {
                category: parse_category_arg(category)?,
                page: *page,
                genre: genre.as_deref().map(parse_genre_arg).transpose()?,
                sort: sort.as_deref().map(parse_sort_arg).transpose()?,
            },
            Command::Search { query, page, sort } => Action::Search {
                query: query.join(" "),
                page: *page,
                sort: sort.as_deref().map(parse_sort_arg).transpose()?,
            },
            Command::Movie { id } => Action::Movie(*id),
            Command::Favorites { action } => match action {
                None => Action::Favorites(None),
                Some(FavoritesCommand::List { sort }) => {
                    Action::Favorites(sort.as_deref().map(parse_sort_arg).transpose()?)
                }
                Some(FavoritesCommand::Add { id }) => Action::AddFavorite(*id),
                Some(FavoritesCommand::Remove { id }) => Action::RemoveFavorite(*id),
            },
            Command::Shell => Action::Shell,
        })
    }

    /// Whether performing this action talks to the catalog API
    pub fn needs_network(&self) -> bool {
        !matches!(
            self,
            Action::Favorites(_) | Action::RemoveFavorite(_) | Action::Shell
        )
    }
}

/// Parses a category argument into a Category
pub fn parse_category_arg(s: &str) -> Result<Category, CliError> {
    Category::from_str(s).ok_or_else(|| CliError::InvalidCategory(s.to_string()))
}

/// Parses a sort argument into a SortOrder
pub fn parse_sort_arg(s: &str) -> Result<SortOrder, CliError> {
    SortOrder::from_str(s).ok_or_else(|| CliError::InvalidSort(s.to_string()))
}

/// Parses a genre slug into its catalog id
pub fn parse_genre_arg(s: &str) -> Result<u32, CliError> {
    genre_by_slug(s)
        .map(|g| g.id)
        .ok_or_else(|| CliError::InvalidGenre(s.to_string()))
}

/// Configuration derived from CLI arguments and environment for application startup
#[derive(Debug, Clone)]
pub struct Settings {
    /// Catalog connection settings; the API key may be empty
    pub catalog: CatalogConfig,
    /// Request cache time-to-live
    pub cache_ttl: TtlDuration,
    /// Retry policy for catalog requests
    pub retry: RetryPolicy,
    /// Where favorites are persisted
    pub favorites_path: PathBuf,
}

impl Settings {
    /// Creates Settings from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(Settings)` with every default resolved
    /// * `Err(CliError)` if no favorites location can be determined
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let favorites_path = match &cli.favorites_file {
            Some(path) => path.clone(),
            None => FavoritesStore::default_path()?,
        };

        let api_key = cli
            .api_key
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();

        Ok(Settings {
            catalog: CatalogConfig::new(api_key)
                .with_base_url(cli.api_url.as_str())
                .with_language(cli.language.as_str()),
            cache_ttl: TtlDuration::minutes(i64::from(cli.cache_ttl)),
            retry: RetryPolicy::new(cli.retries, Duration::from_millis(cli.retry_delay)),
            favorites_path,
        })
    }

    pub fn has_api_key(&self) -> bool {
        !self.catalog.api_key.is_empty()
    }

    /// Fails with `MissingApiKey` if `action` needs the network and no key is set
    pub fn check_action(&self, action: &Action) -> Result<(), CliError> {
        if action.needs_network() && !self.has_api_key() {
            return Err(CliError::MissingApiKey);
        }
        Ok(())
    }
}

/// One line typed into the interactive shell
#[derive(Parser, Debug)]
#[command(no_binary_name = true, name = "moviq", disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: Command,
}

/// Outcome of reading one shell line
#[derive(Debug, Clone, PartialEq)]
pub enum ShellInput {
    /// Nothing typed
    Empty,
    /// The user asked to leave
    Quit,
    /// Help text to print
    Help(String),
    /// Something to do
    Action(Action),
}

/// Parses one line of shell input with the same grammar as the command line
pub fn parse_shell_line(line: &str) -> Result<ShellInput, CliError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        [] => return Ok(ShellInput::Empty),
        ["quit" | "exit" | "q"] => return Ok(ShellInput::Quit),
        ["shell", ..] => return Err(CliError::Shell("Already in the shell".to_string())),
        _ => {}
    }

    match ShellLine::try_parse_from(words) {
        Ok(parsed) => Ok(ShellInput::Action(Action::from_command(Some(&parsed.command))?)),
        Err(e) if e.kind() == clap::error::ErrorKind::DisplayHelp => {
            Ok(ShellInput::Help(e.render().to_string()))
        }
        Err(e) => Err(CliError::Shell(e.render().to_string().trim_end().to_string())),
    }
}
