use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::{MediaDetail, MediaDetails, MediaKind, MovieDetails, TvDetails},
    services::providers::{MetadataProvider, ProviderError},
};

/// Fetches one title and normalizes it into the stable `MediaDetail` shape.
///
/// An upstream 404 becomes a caller-visible not-found; anything else is a
/// generic fetch failure.
pub async fn fetch_details(
    provider: &dyn MetadataProvider,
    kind: MediaKind,
    id: u64,
    image_base_url: &str,
) -> AppResult<MediaDetail> {
    let details = provider.details(kind, id).await.map_err(|e| match e {
        ProviderError::NotFound => AppError::NotFound("Media item not found on TMDB.".to_string()),
        other => AppError::upstream("Failed to fetch media details from TMDB")(other),
    })?;

    Ok(normalize(details, image_base_url))
}

pub fn normalize(details: MediaDetails, image_base_url: &str) -> MediaDetail {
    match details {
        MediaDetails::Movie { details, raw } => normalize_movie(details, raw, image_base_url),
        MediaDetails::Tv { details, raw } => normalize_tv(details, raw, image_base_url),
    }
}

fn poster_url(image_base_url: &str, poster_path: Option<&str>) -> Option<String> {
    poster_path
        .filter(|path| !path.is_empty())
        .map(|path| format!("{}{}", image_base_url, path))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn normalize_movie(movie: MovieDetails, raw: Value, image_base_url: &str) -> MediaDetail {
    let origin_country = if movie.origin_country.is_empty() {
        movie
            .production_countries
            .into_iter()
            .map(|c| c.iso_3166_1)
            .collect()
    } else {
        movie.origin_country
    };
    let credits = movie.credits.unwrap_or_default();

    MediaDetail {
        id: movie.id,
        media_type: MediaKind::Movie,
        poster_url: poster_url(image_base_url, movie.poster_path.as_deref()),
        title: movie.title.clone().unwrap_or_default(),
        original_title: movie.original_title.or(movie.title),
        synopsis: non_blank(movie.overview),
        poster_path: movie.poster_path,
        rating: movie.vote_average,
        vote_count: movie.vote_count,
        release_date: non_blank(movie.release_date),
        genres: movie.genres,
        runtime: movie.runtime.filter(|minutes| *minutes > 0),
        original_language: movie.original_language,
        origin_country,
        status: movie.status,
        cast: credits.cast,
        crew: credits.crew,
        raw,
    }
}

fn normalize_tv(show: TvDetails, raw: Value, image_base_url: &str) -> MediaDetail {
    let credits = show.credits.unwrap_or_default();

    MediaDetail {
        id: show.id,
        media_type: MediaKind::Tv,
        poster_url: poster_url(image_base_url, show.poster_path.as_deref()),
        title: show.name.clone().unwrap_or_default(),
        original_title: show.original_name.or(show.name),
        synopsis: non_blank(show.overview),
        poster_path: show.poster_path,
        rating: show.vote_average,
        vote_count: show.vote_count,
        release_date: non_blank(show.first_air_date),
        genres: show.genres,
        runtime: show.episode_run_time.first().copied(),
        original_language: show.original_language,
        origin_country: show.origin_country,
        status: show.status,
        cast: credits.cast,
        crew: credits.crew,
        raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::MockMetadataProvider;
    use serde_json::json;

    const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";

    fn fight_club() -> Value {
        json!({
            "id": 550,
            "title": "Fight Club",
            "original_title": "Fight Club",
            "overview": "An insomniac office worker...",
            "poster_path": "/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg",
            "vote_average": 8.4,
            "vote_count": 29000,
            "release_date": "1999-10-15",
            "genres": [{ "id": 18, "name": "Drama" }],
            "runtime": 139,
            "original_language": "en",
            "production_countries": [{ "iso_3166_1": "US", "name": "United States of America" }],
            "status": "Released",
            "credits": {
                "cast": [{ "name": "Edward Norton", "character": "Narrator", "profile_path": null, "order": 0 }],
                "crew": [{ "name": "David Fincher", "job": "Director", "department": "Directing" }]
            }
        })
    }

    fn breaking_bad() -> Value {
        json!({
            "id": 1396,
            "name": "Breaking Bad",
            "original_name": "Breaking Bad",
            "overview": "",
            "poster_path": null,
            "vote_average": 8.9,
            "vote_count": 15000,
            "first_air_date": "2008-01-20",
            "genres": [{ "id": 18, "name": "Drama" }],
            "episode_run_time": [45, 47],
            "original_language": "en",
            "origin_country": ["US"],
            "status": "Ended"
        })
    }

    fn movie_details(raw: Value) -> MediaDetails {
        MediaDetails::Movie {
            details: serde_json::from_value(raw.clone()).unwrap(),
            raw,
        }
    }

    #[test]
    fn test_normalize_movie() {
        let detail = normalize(movie_details(fight_club()), IMAGE_BASE);

        assert_eq!(detail.media_type, MediaKind::Movie);
        assert_eq!(detail.title, "Fight Club");
        assert_eq!(detail.release_date.as_deref(), Some("1999-10-15"));
        assert_eq!(detail.runtime, Some(139));
        assert_eq!(
            detail.poster_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg")
        );
        assert_eq!(detail.origin_country, vec!["US".to_string()]);
        assert_eq!(detail.cast[0].name, "Edward Norton");
        assert_eq!(detail.crew[0].job.as_deref(), Some("Director"));
        assert_eq!(detail.raw["runtime"], 139);
    }

    #[test]
    fn test_normalize_tv() {
        let raw = breaking_bad();
        let details = MediaDetails::Tv {
            details: serde_json::from_value(raw.clone()).unwrap(),
            raw,
        };
        let detail = normalize(details, IMAGE_BASE);

        assert_eq!(detail.media_type, MediaKind::Tv);
        assert_eq!(detail.title, "Breaking Bad");
        assert_eq!(detail.release_date.as_deref(), Some("2008-01-20"));
        assert_eq!(detail.runtime, Some(45));
        assert_eq!(detail.synopsis, None);
        assert_eq!(detail.poster_url, None);
        assert!(detail.cast.is_empty());
    }

    #[test]
    fn test_normalized_shape_serializes_media_type_lowercase() {
        let detail = normalize(movie_details(fight_club()), IMAGE_BASE);
        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["media_type"], "movie");
        assert_eq!(value["rating"], 8.4);
        assert_eq!(value["raw"]["title"], "Fight Club");
    }

    #[tokio::test]
    async fn test_not_found_is_distinct() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_details()
            .returning(|_, _| Err(ProviderError::NotFound));

        let err = fetch_details(&provider, MediaKind::Movie, 999_999, IMAGE_BASE)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.public_message(), "Media item not found on TMDB.");
    }

    #[tokio::test]
    async fn test_other_failures_are_generic() {
        let mut provider = MockMetadataProvider::new();
        provider.expect_details().returning(|_, _| {
            Err(ProviderError::Status {
                status: 502,
                body: "bad gateway".to_string(),
            })
        });

        let err = fetch_details(&provider, MediaKind::Tv, 1396, IMAGE_BASE)
            .await
            .unwrap_err();
        assert_eq!(err.public_message(), "Failed to fetch media details from TMDB");
    }
}
