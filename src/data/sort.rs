//! Client-side ordering of movie lists

use std::cmp::Ordering;

use super::Movie;

/// Sort options offered for result and favorites lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    PopularityDesc,
    PopularityAsc,
    RatingDesc,
    RatingAsc,
    ReleaseDateDesc,
    ReleaseDateAsc,
    TitleAsc,
    TitleDesc,
}

impl SortOrder {
    /// All options, in the order they are listed to the user
    pub const ALL: [SortOrder; 8] = [
        SortOrder::PopularityDesc,
        SortOrder::PopularityAsc,
        SortOrder::RatingDesc,
        SortOrder::RatingAsc,
        SortOrder::ReleaseDateDesc,
        SortOrder::ReleaseDateAsc,
        SortOrder::TitleAsc,
        SortOrder::TitleDesc,
    ];

    /// Parses the catalog-style key (e.g. "vote_average.desc")
    pub fn from_str(s: &str) -> Option<SortOrder> {
        let s = s.trim().to_lowercase();
        SortOrder::ALL.into_iter().find(|o| o.key() == s)
    }

    pub fn key(&self) -> &'static str {
        match self {
            SortOrder::PopularityDesc => "popularity.desc",
            SortOrder::PopularityAsc => "popularity.asc",
            SortOrder::RatingDesc => "vote_average.desc",
            SortOrder::RatingAsc => "vote_average.asc",
            SortOrder::ReleaseDateDesc => "release_date.desc",
            SortOrder::ReleaseDateAsc => "release_date.asc",
            SortOrder::TitleAsc => "original_title.asc",
            SortOrder::TitleDesc => "original_title.desc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::PopularityDesc => "Popularity (High to Low)",
            SortOrder::PopularityAsc => "Popularity (Low to High)",
            SortOrder::RatingDesc => "Rating (High to Low)",
            SortOrder::RatingAsc => "Rating (Low to High)",
            SortOrder::ReleaseDateDesc => "Release Date (Newest)",
            SortOrder::ReleaseDateAsc => "Release Date (Oldest)",
            SortOrder::TitleAsc => "Title (A-Z)",
            SortOrder::TitleDesc => "Title (Z-A)",
        }
    }

    fn compare(&self, a: &Movie, b: &Movie) -> Ordering {
        match self {
            SortOrder::PopularityDesc => b.popularity.total_cmp(&a.popularity),
            SortOrder::PopularityAsc => a.popularity.total_cmp(&b.popularity),
            SortOrder::RatingDesc => b.vote_average.total_cmp(&a.vote_average),
            SortOrder::RatingAsc => a.vote_average.total_cmp(&b.vote_average),
            // Undated movies go last in both directions
            SortOrder::ReleaseDateDesc => match (a.release_date, b.release_date) {
                (Some(x), Some(y)) => y.cmp(&x),
                (x, y) => y.is_none().cmp(&x.is_none()).reverse(),
            },
            SortOrder::ReleaseDateAsc => match (a.release_date, b.release_date) {
                (Some(x), Some(y)) => x.cmp(&y),
                (x, y) => y.is_none().cmp(&x.is_none()).reverse(),
            },
            SortOrder::TitleAsc => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            SortOrder::TitleDesc => b.title.to_lowercase().cmp(&a.title.to_lowercase()),
        }
    }
}

/// Sorts in place; the sort is stable, so ties keep catalog order
pub fn sort_movies(movies: &mut [Movie], order: SortOrder) {
    movies.sort_by(|a, b| order.compare(a, b));
}

/// Keeps only the movies tagged with `genre_id`
pub fn filter_by_genre(movies: Vec<Movie>, genre_id: u32) -> Vec<Movie> {
    movies
        .into_iter()
        .filter(|m| m.genre_ids.contains(&genre_id))
        .collect()
}
