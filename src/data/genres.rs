//! Static genre table for the movie catalog
//!
//! The catalog identifies genres by number in list responses. This table maps
//! those numbers to display names, and URL-style slugs to numbers so lists can
//! be filtered from the command line.

/// A catalog genre with its slug and display name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenreEntry {
    /// Lowercase slug accepted on the command line (e.g. "science-fiction")
    pub slug: &'static str,
    /// Catalog genre identifier
    pub id: u32,
    /// Human-readable name
    pub name: &'static str,
}

/// Every movie genre the catalog knows about
///
/// "sci-fi" is an alias of "science-fiction" and shares its identifier;
/// `genre_name` resolves 878 to the first entry.
pub static GENRES: [GenreEntry; 20] = [
    GenreEntry { slug: "action", id: 28, name: "Action" },
    GenreEntry { slug: "adventure", id: 12, name: "Adventure" },
    GenreEntry { slug: "animation", id: 16, name: "Animation" },
    GenreEntry { slug: "comedy", id: 35, name: "Comedy" },
    GenreEntry { slug: "crime", id: 80, name: "Crime" },
    GenreEntry { slug: "documentary", id: 99, name: "Documentary" },
    GenreEntry { slug: "drama", id: 18, name: "Drama" },
    GenreEntry { slug: "family", id: 10751, name: "Family" },
    GenreEntry { slug: "fantasy", id: 14, name: "Fantasy" },
    GenreEntry { slug: "history", id: 36, name: "History" },
    GenreEntry { slug: "horror", id: 27, name: "Horror" },
    GenreEntry { slug: "music", id: 10402, name: "Music" },
    GenreEntry { slug: "mystery", id: 9648, name: "Mystery" },
    GenreEntry { slug: "romance", id: 10749, name: "Romance" },
    GenreEntry { slug: "science-fiction", id: 878, name: "Science Fiction" },
    GenreEntry { slug: "sci-fi", id: 878, name: "Sci-Fi" },
    GenreEntry { slug: "tv-movie", id: 10770, name: "TV Movie" },
    GenreEntry { slug: "thriller", id: 53, name: "Thriller" },
    GenreEntry { slug: "war", id: 10752, name: "War" },
    GenreEntry { slug: "western", id: 37, name: "Western" },
];

/// Looks up a genre by slug, ignoring case and surrounding whitespace
pub fn genre_by_slug(slug: &str) -> Option<&'static GenreEntry> {
    let slug = slug.trim().to_lowercase();
    GENRES.iter().find(|g| g.slug == slug)
}

/// Display name for a catalog genre identifier
pub fn genre_name(id: u32) -> Option<&'static str> {
    GENRES.iter().find(|g| g.id == id).map(|g| g.name)
}

/// Comma-separated display names for a list of genre identifiers, skipping unknown ones
pub fn genre_names(ids: &[u32]) -> String {
    ids.iter()
        .filter_map(|id| genre_name(*id))
        .collect::<Vec<_>>()
        .join(", ")
}
