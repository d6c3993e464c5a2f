//! Image CDN URL construction
//!
//! Posters and backdrops are never downloaded or processed here; a movie only
//! carries a path fragment, which is joined onto the CDN base with a size token.

use std::fmt;

/// Base URL of the catalog's image CDN
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Size tokens understood by the image CDN
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    W92,
    W154,
    W185,
    W342,
    W500,
    W780,
    Original,
}

impl ImageSize {
    /// Default size for posters
    pub const POSTER: ImageSize = ImageSize::W500;
    /// Default size for backdrops
    pub const BACKDROP: ImageSize = ImageSize::Original;

    /// The token as it appears in the URL
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::W92 => "w92",
            ImageSize::W154 => "w154",
            ImageSize::W185 => "w185",
            ImageSize::W342 => "w342",
            ImageSize::W500 => "w500",
            ImageSize::W780 => "w780",
            ImageSize::Original => "original",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full CDN URL for an image path fragment
///
/// A missing leading slash on `path` is tolerated.
pub fn image_url(path: &str, size: ImageSize) -> String {
    if path.starts_with('/') {
        format!("{}/{}{}", IMAGE_BASE_URL, size, path)
    } else {
        format!("{}/{}/{}", IMAGE_BASE_URL, size, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poster_url_default_size() {
        assert_eq!(
            image_url("/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg", ImageSize::POSTER),
            "https://image.tmdb.org/t/p/w500/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg"
        );
    }

    #[test]
    fn test_backdrop_url_default_size() {
        assert_eq!(
            image_url("/8ZTVqvKDQ8emSGUEMjsS4yHAwrp.jpg", ImageSize::BACKDROP),
            "https://image.tmdb.org/t/p/original/8ZTVqvKDQ8emSGUEMjsS4yHAwrp.jpg"
        );
    }

    #[test]
    fn test_path_without_leading_slash() {
        assert_eq!(
            image_url("abc.jpg", ImageSize::W92),
            "https://image.tmdb.org/t/p/w92/abc.jpg"
        );
    }
}
