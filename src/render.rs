//! Plain-text rendering of app views
//!
//! Every function returns the full text of a view so the same output can go to
//! stdout for one-shot commands or be interleaved with the shell prompt.

use crate::app::{AppError, DetailView, FavoriteChange, HomeView, ListView};
use crate::data::genres::genre_names;
use crate::data::{ImageSize, Movie, MoviesPage};

/// One numbered line per movie: title, year, rating, id and genres
fn movie_lines(out: &mut String, movies: &[Movie]) {
    for (i, movie) in movies.iter().enumerate() {
        let year = movie
            .year()
            .map(|y| format!(" ({})", y))
            .unwrap_or_default();
        out.push_str(&format!(
            "{:>3}. {}{}  {:.1}/10  #{}",
            i + 1,
            movie.title,
            year,
            movie.vote_average,
            movie.id
        ));
        let genres = genre_names(&movie.genre_ids);
        if !genres.is_empty() {
            out.push_str(&format!("  [{}]", genres));
        }
        out.push('\n');
    }
}

fn page_summary(page: &MoviesPage) -> String {
    format!(
        "page {} of {}, {} results",
        page.page,
        page.total_pages.max(1),
        page.total_results
    )
}

/// Home feed
pub fn home(view: &HomeView) -> String {
    let mut out = String::from("Trending this week\n");
    if view.trending.results.is_empty() {
        out.push_str("  No trending movies right now.\n");
    } else {
        movie_lines(&mut out, &view.trending.results);
    }

    if let Some((top, recommended)) = &view.recommended {
        if !recommended.is_empty() {
            out.push_str(&format!("\nBecause \"{}\" is trending\n", top.title));
            movie_lines(&mut out, recommended);
        }
    }
    out
}

/// A list or search result page
pub fn list(view: &ListView) -> String {
    let mut out = format!("{} ({})\n", view.title, page_summary(&view.page));
    if view.page.results.is_empty() {
        out.push_str("  No movies found. Try searching for a different term.\n");
    } else {
        movie_lines(&mut out, &view.page.results);
    }
    if view.page.has_next() {
        out.push_str(&format!("  More results: --page {}\n", view.page.page + 1));
    }
    out
}

/// Movie detail view
pub fn detail(view: &DetailView) -> String {
    let details = &view.details;
    let movie = &details.movie;
    let mut out = String::new();

    let year = movie.year().map(|y| format!(" ({})", y)).unwrap_or_default();
    let marker = if view.is_favorite { "  * favorite" } else { "" };
    out.push_str(&format!("{}{}{}\n", movie.title, year, marker));
    if let Some(tagline) = &details.tagline {
        out.push_str(&format!("\"{}\"\n", tagline));
    }
    out.push('\n');

    out.push_str(&format!(
        "Rating:   {:.1}/10 ({} votes)\n",
        movie.vote_average, movie.vote_count
    ));
    if let Some(runtime) = details.runtime.filter(|r| *r > 0) {
        out.push_str(&format!("Runtime:  {}\n", format_runtime(runtime)));
    }
    if !details.genres.is_empty() {
        let names: Vec<&str> = details.genres.iter().map(|g| g.name.as_str()).collect();
        out.push_str(&format!("Genres:   {}\n", names.join(", ")));
    }
    if let Some(date) = movie.release_date {
        out.push_str(&format!("Released: {}\n", date.format("%B %-d, %Y")));
    }
    if !details.status.is_empty() {
        out.push_str(&format!("Status:   {}\n", details.status));
    }
    if details.budget > 0 {
        out.push_str(&format!("Budget:   {}\n", format_dollars(details.budget)));
    }
    if details.revenue > 0 {
        out.push_str(&format!("Revenue:  {}\n", format_dollars(details.revenue)));
    }
    if let Some(homepage) = &details.homepage {
        out.push_str(&format!("Homepage: {}\n", homepage));
    }
    if let Some(url) = movie.poster_url(ImageSize::POSTER) {
        out.push_str(&format!("Poster:   {}\n", url));
    }
    if let Some(url) = movie.backdrop_url(ImageSize::BACKDROP) {
        out.push_str(&format!("Backdrop: {}\n", url));
    }

    if !movie.overview.is_empty() {
        out.push_str(&format!("\n{}\n", movie.overview));
    }

    if !view.recommendations.is_empty() {
        out.push_str("\nRecommended\n");
        movie_lines(&mut out, &view.recommendations);
    }
    out
}

/// Shown when the catalog has no movie with the requested id
pub fn not_found(id: u64) -> String {
    format!("Movie #{} not found.\n", id)
}

/// Favorites view
pub fn favorites(movies: &[Movie]) -> String {
    if movies.is_empty() {
        return "No favorites yet. Add one with `favorites add <id>`.\n".to_string();
    }
    let mut out = format!("Favorites ({})\n", movies.len());
    movie_lines(&mut out, movies);
    out
}

/// Confirmation for a favorites edit
pub fn change(change: &FavoriteChange) -> String {
    match change {
        FavoriteChange::Added(movie) => format!("\"{}\" added to favorites\n", movie.title),
        FavoriteChange::AlreadyFavorite(id) => format!("Movie #{} is already a favorite\n", id),
        FavoriteChange::Removed(movie) => format!("\"{}\" removed from favorites\n", movie.title),
        FavoriteChange::NotFavorite(id) => format!("Movie #{} is not a favorite\n", id),
        FavoriteChange::UnknownMovie(id) => not_found(*id),
    }
}

/// User-facing text for an error
pub fn error_message(err: &AppError) -> String {
    match err {
        AppError::Api(api) if api.is_rate_limited() => {
            "Rate limit exceeded. Please try again later.".to_string()
        }
        AppError::Api(api) if api.status() == Some(401) => {
            format!("{}. Check your API key.", api)
        }
        _ => err.to_string(),
    }
}

/// Formats minutes as "2h 28m"
pub fn format_runtime(minutes: u32) -> String {
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

/// Formats a whole dollar amount with thousands separators
pub fn format_dollars(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push('$');
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tests::movie;
    use crate::data::{Genre, MovieDetails};
    use crate::error::ApiError;

    #[test]
    fn test_format_runtime() {
        assert_eq!(format_runtime(148), "2h 28m");
        assert_eq!(format_runtime(45), "45m");
        assert_eq!(format_runtime(120), "2h");
    }

    #[test]
    fn test_format_dollars() {
        assert_eq!(format_dollars(0), "$0");
        assert_eq!(format_dollars(999), "$999");
        assert_eq!(format_dollars(1000), "$1,000");
        assert_eq!(format_dollars(160_000_000), "$160,000,000");
        assert_eq!(format_dollars(1_004_558_444), "$1,004,558,444");
    }

    #[test]
    fn test_list_shows_titles_genres_and_paging() {
        let view = ListView {
            title: "Trending".to_string(),
            page: MoviesPage {
                page: 1,
                results: vec![movie(27205, "Inception")],
                total_pages: 2,
                total_results: 21,
            },
        };

        let text = list(&view);

        assert!(text.contains("Trending (page 1 of 2, 21 results)"));
        assert!(text.contains("1. Inception (2010)  8.4/10  #27205  [Action, Science Fiction]"));
        assert!(text.contains("--page 2"));
    }

    #[test]
    fn test_home_lists_trending_then_recommendations() {
        let view = HomeView {
            trending: MoviesPage {
                page: 1,
                results: vec![movie(27205, "Inception"), movie(155, "The Dark Knight")],
                total_pages: 1,
                total_results: 2,
            },
            recommended: Some((movie(27205, "Inception"), vec![movie(157336, "Interstellar")])),
        };

        let text = home(&view);

        assert!(text.starts_with("Trending this week\n  1. Inception (2010)"));
        assert!(text.contains("  2. The Dark Knight (2010)"));
        assert!(text.contains("\nBecause \"Inception\" is trending\n  1. Interstellar (2010)"));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_empty_favorites_message() {
        assert!(favorites(&[]).contains("No favorites yet"));
        assert!(favorites(&[movie(1, "A")]).starts_with("Favorites (1)"));
    }

    #[test]
    fn test_detail_view() {
        let view = DetailView {
            details: MovieDetails {
                movie: movie(27205, "Inception"),
                genres: vec![Genre {
                    id: 28,
                    name: "Action".to_string(),
                }],
                runtime: Some(148),
                status: "Released".to_string(),
                tagline: Some("Your mind is the scene of the crime.".to_string()),
                budget: 160_000_000,
                revenue: 0,
                homepage: None,
            },
            recommendations: vec![movie(157336, "Interstellar")],
            is_favorite: true,
        };

        let text = detail(&view);

        assert!(text.starts_with("Inception (2010)  * favorite"));
        assert!(text.contains("Runtime:  2h 28m"));
        assert!(text.contains("Budget:   $160,000,000"));
        assert!(!text.contains("Revenue"));
        assert!(text.contains("Released: July 15, 2010"));
        assert!(text.contains("https://image.tmdb.org/t/p/w500/poster_27205.jpg"));
        assert!(text.contains("Recommended"));
        assert!(text.contains("Interstellar"));
    }

    #[test]
    fn test_change_messages() {
        assert_eq!(
            change(&FavoriteChange::Added(movie(1, "Inception"))),
            "\"Inception\" added to favorites\n"
        );
        assert_eq!(
            change(&FavoriteChange::Removed(movie(1, "Inception"))),
            "\"Inception\" removed from favorites\n"
        );
        assert!(change(&FavoriteChange::UnknownMovie(9)).contains("not found"));
    }

    #[test]
    fn test_rate_limit_error_message() {
        let err = AppError::Api(ApiError::from_status(429, None));
        assert_eq!(error_message(&err), "Rate limit exceeded. Please try again later.");

        let err = AppError::Api(ApiError::Network("dns failure".into()));
        assert!(error_message(&err).contains("dns failure"));
    }
}
