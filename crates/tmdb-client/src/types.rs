//! Results returned by the TMDb collaborators.

use data_loader::MovieId;
use serde::Deserialize;

/// Shown when TMDb has no poster for a movie or the lookup was rejected
pub const NO_IMAGE_PLACEHOLDER: &str =
    "https://via.placeholder.com/500x750?text=No+Image+Available";

/// Shown when the poster lookup itself failed
pub const ERROR_IMAGE_PLACEHOLDER: &str =
    "https://via.placeholder.com/500x750?text=Error+Fetching+Image";

/// One candidate returned by a title search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub id: MovieId,
    pub title: String,
}

/// Outcome of a poster lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PosterImage {
    /// Full URL of the poster image
    Found(String),
    /// The movie has no poster, or TMDb answered with a non-success status
    Fallback,
    /// The request failed or the response could not be decoded
    Error,
}

impl PosterImage {
    /// URL to display: the poster itself or the matching placeholder
    pub fn url(&self) -> &str {
        match self {
            PosterImage::Found(url) => url,
            PosterImage::Fallback => NO_IMAGE_PLACEHOLDER,
            PosterImage::Error => ERROR_IMAGE_PLACEHOLDER,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, PosterImage::Found(_))
    }
}

/// Poster and title of one movie as reported by TMDb
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieMetadata {
    pub poster: PosterImage,
    pub title: Option<String>,
}

impl MovieMetadata {
    pub fn fallback() -> Self {
        Self {
            poster: PosterImage::Fallback,
            title: None,
        }
    }

    pub fn error() -> Self {
        Self {
            poster: PosterImage::Error,
            title: None,
        }
    }
}

// =============================================================================
// Wire formats
// =============================================================================
// Every field is optional so a partial response degrades instead of failing.

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchResult {
    #[serde(default)]
    pub id: Option<MovieId>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MovieDetails {
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl SearchResponse {
    /// Keep the results that carry both an id and a title, in ranking order
    pub(crate) fn into_hits(self) -> Vec<SearchHit> {
        self.results
            .into_iter()
            .filter_map(|value| serde_json::from_value::<SearchResult>(value).ok())
            .filter_map(|result| {
                Some(SearchHit {
                    id: result.id?,
                    title: result.title?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_poster_urls() {
        let found = PosterImage::Found("https://image.tmdb.org/t/p/w500/a.jpg".to_string());
        assert_eq!(found.url(), "https://image.tmdb.org/t/p/w500/a.jpg");
        assert!(found.is_found());
        assert_eq!(PosterImage::Fallback.url(), NO_IMAGE_PLACEHOLDER);
        assert_eq!(PosterImage::Error.url(), ERROR_IMAGE_PLACEHOLDER);
    }

    #[test]
    fn test_search_response_skips_incomplete_results() {
        let response: SearchResponse = serde_json::from_value(json!({
            "page": 1,
            "results": [
                {"id": 862, "title": "Toy Story", "popularity": 80.1},
                {"id": 863},
                {"title": "No Id"},
                {"id": "not-a-number", "title": "Bad Id"},
                {"id": 10193, "title": "Toy Story 3"}
            ]
        }))
        .unwrap();

        let hits = response.into_hits();
        assert_eq!(
            hits,
            vec![
                SearchHit { id: 862, title: "Toy Story".to_string() },
                SearchHit { id: 10193, title: "Toy Story 3".to_string() },
            ]
        );
    }

    #[test]
    fn test_search_response_without_results() {
        let response: SearchResponse = serde_json::from_value(json!({"page": 1})).unwrap();
        assert!(response.into_hits().is_empty());
    }

    #[test]
    fn test_movie_details_missing_fields() {
        let details: MovieDetails = serde_json::from_value(json!({"id": 1})).unwrap();
        assert!(details.poster_path.is_none());
        assert!(details.title.is_none());
    }
}
