//! Favorites store backed by a JSON snapshot on disk
//!
//! Provides a `FavoritesStore` that keeps an ordered, id-unique list of movies
//! and rewrites the whole snapshot synchronously on every mutation.

use directories::ProjectDirs;
use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::data::Movie;

/// File name of the favorites snapshot inside the data directory
pub const FAVORITES_FILE: &str = "favorites.json";

/// Errors that can occur while persisting favorites
#[derive(Debug, Error)]
pub enum FavoritesError {
    /// No home/data directory could be determined
    #[error("Could not determine a data directory for favorites")]
    NoDataDir,

    /// Reading or writing the snapshot failed
    #[error("Favorites storage error: {0}")]
    Io(#[from] io::Error),

    /// The in-memory list could not be serialized
    #[error("Failed to serialize favorites: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Ordered list of favorite movies mirrored to a JSON file
///
/// The file is read once on `open` and overwritten after every `add` or
/// `remove` that changes the list.
#[derive(Debug)]
pub struct FavoritesStore {
    /// Where the snapshot is stored
    path: PathBuf,
    /// Favorites in insertion order, unique by id
    movies: Vec<Movie>,
    /// Set when a malformed snapshot was discarded during `open`
    recovery_notice: Option<String>,
}

impl FavoritesStore {
    /// Default snapshot location in the XDG data directory
    ///
    /// Uses `~/.local/share/moviq/favorites.json` on Linux, or the platform equivalent.
    pub fn default_path() -> Result<PathBuf, FavoritesError> {
        let project_dirs = ProjectDirs::from("", "", "moviq").ok_or(FavoritesError::NoDataDir)?;
        Ok(project_dirs.data_dir().join(FAVORITES_FILE))
    }

    /// Loads the store from `path`
    ///
    /// A missing file yields an empty store. A file that cannot be parsed is
    /// reset to an empty list and `recovery_notice` explains what happened.
    /// Duplicate ids in the snapshot are collapsed, keeping the first.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, FavoritesError> {
        let path = path.into();
        let mut store = Self {
            path,
            movies: Vec::new(),
            recovery_notice: None,
        };

        let content = match fs::read_to_string(&store.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(store),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<Vec<Movie>>(&content) {
            Ok(movies) => {
                let loaded = movies.len();
                store.movies = dedup_by_id(movies);
                if store.movies.len() != loaded {
                    tracing::warn!(
                        loaded,
                        kept = store.movies.len(),
                        "dropped duplicate favorites"
                    );
                    store.persist(&store.movies)?;
                }
                tracing::debug!(count = store.movies.len(), path = %store.path.display(), "loaded favorites");
            }
            Err(e) => {
                tracing::warn!(error = %e, path = %store.path.display(), "discarding malformed favorites");
                store.recovery_notice = Some(format!(
                    "Error loading favorites ({}). Your favorites list has been reset.",
                    e
                ));
                store.persist(&store.movies)?;
            }
        }

        Ok(store)
    }

    /// Path of the snapshot file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Message to show the user if the stored snapshot had to be discarded
    pub fn recovery_notice(&self) -> Option<&str> {
        self.recovery_notice.as_deref()
    }

    /// Adds `movie` unless a movie with the same id is already present
    ///
    /// The in-memory list only changes once the snapshot has been written.
    ///
    /// # Returns
    /// * `Ok(true)` if the movie was appended and the snapshot written
    /// * `Ok(false)` if it was already a favorite (nothing written)
    pub fn add(&mut self, movie: Movie) -> Result<bool, FavoritesError> {
        if self.is_favorite(movie.id) {
            return Ok(false);
        }
        let mut movies = self.movies.clone();
        movies.push(movie);
        self.persist(&movies)?;
        self.movies = movies;
        Ok(true)
    }

    /// Removes the movie with `id` if present
    ///
    /// # Returns
    /// * `Ok(Some(Movie))` with the removed movie after writing the snapshot
    /// * `Ok(None)` if no such favorite existed (nothing written)
    pub fn remove(&mut self, id: u64) -> Result<Option<Movie>, FavoritesError> {
        let Some(index) = self.movies.iter().position(|m| m.id == id) else {
            return Ok(None);
        };
        let mut movies = self.movies.clone();
        let removed = movies.remove(index);
        self.persist(&movies)?;
        self.movies = movies;
        Ok(Some(removed))
    }

    pub fn is_favorite(&self, id: u64) -> bool {
        self.movies.iter().any(|m| m.id == id)
    }

    /// Favorites in the order they were added
    pub fn list(&self) -> &[Movie] {
        &self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Writes `movies` as the new snapshot, creating the parent directory if needed
    ///
    /// The JSON goes to a temporary file next to the snapshot which is then
    /// renamed over it, so a crash mid-write leaves the old snapshot intact.
    fn persist(&self, movies: &[Movie]) -> Result<(), FavoritesError> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        let json = serde_json::to_string_pretty(movies)?;
        let mut file = NamedTempFile::new_in(parent)?;
        file.write_all(json.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

fn dedup_by_id(movies: Vec<Movie>) -> Vec<Movie> {
    let mut seen = HashSet::new();
    movies.into_iter().filter(|m| seen.insert(m.id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tests::movie;
    use tempfile::TempDir;

    fn create_test_store() -> (FavoritesStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = FavoritesStore::open(temp_dir.path().join(FAVORITES_FILE))
            .expect("Opening a missing file should succeed");
        (store, temp_dir)
    }

    fn ids(store: &FavoritesStore) -> Vec<u64> {
        store.list().iter().map(|m| m.id).collect()
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let (store, temp_dir) = create_test_store();

        assert!(store.is_empty());
        assert!(store.recovery_notice().is_none());
        assert!(!temp_dir.path().join(FAVORITES_FILE).exists(), "Nothing written yet");
    }

    #[test]
    fn test_add_same_id_twice_keeps_one() {
        let (mut store, _temp_dir) = create_test_store();

        assert!(store.add(movie(27205, "Inception")).unwrap());
        assert!(!store.add(movie(27205, "Inception")).unwrap());

        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_missing_id_is_noop() {
        let (mut store, _temp_dir) = create_test_store();
        store.add(movie(155, "The Dark Knight")).unwrap();

        let removed = store.remove(27205).unwrap();

        assert!(removed.is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_add_add_remove_scenario() {
        let (mut store, _temp_dir) = create_test_store();

        store.add(movie(27205, "Inception")).unwrap();
        store.add(movie(155, "The Dark Knight")).unwrap();
        let removed = store.remove(27205).unwrap();

        assert_eq!(removed.map(|m| m.title), Some("Inception".to_string()));
        assert_eq!(store.list(), &[movie(155, "The Dark Knight")]);
        assert!(store.is_favorite(155));
        assert!(!store.is_favorite(27205));
    }

    #[test]
    fn test_snapshot_reload_preserves_ids_and_order() {
        let (mut store, temp_dir) = create_test_store();
        store.add(movie(3, "C")).unwrap();
        store.add(movie(1, "A")).unwrap();
        store.add(movie(2, "B")).unwrap();
        store.remove(1).unwrap();
        store.add(movie(4, "D")).unwrap();

        let reloaded = FavoritesStore::open(temp_dir.path().join(FAVORITES_FILE)).unwrap();

        assert_eq!(ids(&reloaded), vec![3, 2, 4]);
        assert_eq!(ids(&reloaded), ids(&store));
        assert_eq!(reloaded.list(), store.list());
    }

    #[test]
    fn test_malformed_snapshot_is_discarded_with_notice() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(FAVORITES_FILE);
        fs::write(&path, "{ not json").unwrap();

        let store = FavoritesStore::open(&path).expect("Malformed data should not be fatal");

        assert!(store.is_empty());
        let notice = store.recovery_notice().expect("A notice should be reported");
        assert!(notice.contains("Error loading favorites"));
        assert_eq!(fs::read_to_string(&path).unwrap().trim(), "[]");
    }

    #[test]
    fn test_duplicate_ids_in_snapshot_are_collapsed() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(FAVORITES_FILE);
        let snapshot = vec![movie(1, "First"), movie(2, "Second"), movie(1, "First again")];
        fs::write(&path, serde_json::to_string(&snapshot).unwrap()).unwrap();

        let store = FavoritesStore::open(&path).unwrap();

        assert_eq!(ids(&store), vec![1, 2]);
        assert_eq!(store.list()[0].title, "First");
        let reloaded = FavoritesStore::open(&path).unwrap();
        assert_eq!(ids(&reloaded), vec![1, 2]);
    }

    #[test]
    fn test_add_creates_parent_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("nested").join("moviq").join(FAVORITES_FILE);
        let mut store = FavoritesStore::open(&path).unwrap();

        store.add(movie(603, "The Matrix")).unwrap();

        assert!(path.exists(), "Snapshot should be written");
    }

    /// Replaces the snapshot's parent directory with a plain file so writes fail
    fn break_parent_dir(temp_dir: &TempDir) {
        let parent = temp_dir.path().join("sub");
        fs::remove_dir_all(&parent).unwrap();
        fs::write(&parent, "not a directory").unwrap();
    }

    #[test]
    fn test_failed_add_leaves_list_unchanged() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let mut store = FavoritesStore::open(temp_dir.path().join("sub").join(FAVORITES_FILE)).unwrap();
        store.add(movie(155, "The Dark Knight")).unwrap();
        break_parent_dir(&temp_dir);

        assert!(store.add(movie(27205, "Inception")).is_err());

        assert!(!store.is_favorite(27205), "Unsaved favorite should not be reported");
        assert_eq!(ids(&store), vec![155]);
        assert!(store.add(movie(27205, "Inception")).is_err(), "Retry should try to write again");
    }

    #[test]
    fn test_failed_remove_keeps_movie() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let mut store = FavoritesStore::open(temp_dir.path().join("sub").join(FAVORITES_FILE)).unwrap();
        store.add(movie(155, "The Dark Knight")).unwrap();
        break_parent_dir(&temp_dir);

        assert!(store.remove(155).is_err());

        assert!(store.is_favorite(155));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_writes_leave_no_temporary_files() {
        let (mut store, temp_dir) = create_test_store();
        store.add(movie(27205, "Inception")).unwrap();
        store.add(movie(155, "The Dark Knight")).unwrap();
        store.remove(27205).unwrap();

        let names: Vec<String> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![FAVORITES_FILE.to_string()]);
        let on_disk: Vec<Movie> =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(on_disk, store.list());
    }

    #[test]
    fn test_default_path_names_project() {
        if let Ok(path) = FavoritesStore::default_path() {
            let path_str = path.to_string_lossy();
            assert!(path_str.contains("moviq"), "Data path should contain project name");
            assert!(path_str.ends_with(FAVORITES_FILE));
        }
        // Test passes if no home directory is available (e.g. in CI)
    }
}
