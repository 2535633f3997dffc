use futures::future::{join_all, try_join_all};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

use crate::{
    error::{AppError, AppResult},
    models::{
        paginate, recommendation::MAX_SELECTIONS, AggregatedRecommendation, MediaItem, MediaKey,
        MediaKind, PageRequest, PaginatedResult, Selection, POOL_CAP,
    },
    services::providers::MetadataProvider,
};

/// Upstream recommendation pages fetched per selected title
pub const PAGES_PER_SELECTION: u32 = 2;

const ITEMS_REQUIRED: &str = "An array of 'items' is required in the request body.";
const TOO_MANY_ITEMS: &str = "Maximum of 5 items allowed for recommendations.";
const ITEM_SHAPE: &str = "Each item must contain an 'id' and 'type' (e.g., 'movie' or 'tv').";

/// Validates the `items` array of a recommendation request body.
///
/// Runs before any upstream call. An entry's `type` must be present but an
/// unrecognized value falls back to `movie`.
pub fn parse_selections(body: &Value) -> AppResult<Vec<Selection>> {
    let items = match body.get("items").and_then(Value::as_array) {
        Some(items) if !items.is_empty() => items,
        _ => return Err(AppError::InvalidInput(ITEMS_REQUIRED.to_string())),
    };

    if items.len() > MAX_SELECTIONS {
        return Err(AppError::InvalidInput(TOO_MANY_ITEMS.to_string()));
    }

    items
        .iter()
        .enumerate()
        .map(|(position, entry)| parse_selection(position, entry))
        .collect()
}

fn parse_selection(position: usize, entry: &Value) -> AppResult<Selection> {
    let id = entry.get("id").filter(|v| is_present(v));
    let kind = entry.get("type").filter(|v| is_present(v));

    let (Some(id), Some(kind)) = (id, kind) else {
        return Err(AppError::InvalidInput(ITEM_SHAPE.to_string()));
    };

    let id = numeric_id(id).ok_or_else(|| {
        AppError::InvalidInput(format!(
            "Item {} has id {}; each item 'id' must be a numeric TMDB id.",
            position + 1,
            id
        ))
    })?;

    let kind = kind
        .as_str()
        .and_then(MediaKind::from_param)
        .unwrap_or(MediaKind::Movie);

    Ok(Selection { id, kind })
}

/// Accepts `550`, `550.0` and `"550"`
fn numeric_id(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 1.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
    .filter(|id| *id > 0)
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Number(n) => n.as_f64() != Some(0.0),
        _ => true,
    }
}

/// Fetches the recommendations of every selection and returns one page of the
/// merged, scored pool.
///
/// A selection whose fetch fails is logged and contributes no candidates; it
/// never fails the request.
pub async fn aggregate_recommendations(
    provider: &dyn MetadataProvider,
    selections: &[Selection],
    window: PageRequest,
) -> PaginatedResult<AggregatedRecommendation> {
    let fetches = selections
        .iter()
        .map(|selection| fetch_candidates(provider, *selection));
    let per_selection = join_all(fetches).await;

    let pool = merge_recommendations(selections, per_selection);

    tracing::info!(
        selections = selections.len(),
        pool = pool.len(),
        "Recommendations aggregated"
    );

    paginate(pool, window)
}

async fn fetch_candidates(provider: &dyn MetadataProvider, selection: Selection) -> Vec<MediaItem> {
    let pages = (1..=PAGES_PER_SELECTION)
        .map(|page| provider.recommendations(selection.kind, selection.id, page));

    match try_join_all(pages).await {
        Ok(pages) => pages.into_iter().flat_map(|page| page.results).collect(),
        Err(e) => {
            tracing::warn!(
                id = selection.id,
                media_type = %selection.kind,
                error = %e,
                "Recommendation fetch failed for item; it contributes no candidates"
            );
            Vec::new()
        }
    }
}

/// Merges per-selection candidate lists into a ranked pool.
///
/// `per_selection[i]` holds what the upstream recommended for `selections[i]`.
/// A candidate's score is the number of selections whose list contained it.
/// Candidates that are themselves selections are skipped. Ranking is by score,
/// then popularity, both descending; ties keep first-encounter order. The
/// result is capped at `POOL_CAP`.
pub fn merge_recommendations(
    selections: &[Selection],
    per_selection: Vec<Vec<MediaItem>>,
) -> Vec<AggregatedRecommendation> {
    let selected_ids: HashSet<u64> = selections.iter().map(|s| s.id).collect();

    let mut index: HashMap<MediaKey, usize> = HashMap::new();
    let mut pool: Vec<AggregatedRecommendation> = Vec::new();

    for candidates in per_selection {
        // one vote per selection even if its pages overlap
        let mut voted: HashSet<MediaKey> = HashSet::new();

        for mut item in candidates {
            if selected_ids.contains(&item.id) {
                continue;
            }
            let Some(key) = item.key() else {
                continue;
            };
            if !voted.insert(key) {
                continue;
            }

            match index.get(&key) {
                Some(&position) => pool[position].score += 1,
                None => {
                    if item.media_type.is_none() {
                        item.media_type = Some(key.kind.to_string());
                    }
                    item.extra.remove("score");
                    index.insert(key, pool.len());
                    pool.push(AggregatedRecommendation { item, score: 1 });
                }
            }
        }
    }

    pool.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| b.item.popularity().total_cmp(&a.item.popularity()))
    });
    pool.truncate(POOL_CAP);
    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::{MockMetadataProvider, ProviderError};
    use serde_json::json;

    fn movie(id: u64, popularity: f64) -> MediaItem {
        serde_json::from_value(json!({
            "id": id,
            "media_type": "movie",
            "title": format!("Movie {}", id),
            "popularity": popularity,
            "vote_average": 7.0
        }))
        .unwrap()
    }

    fn show(id: u64, popularity: f64) -> MediaItem {
        serde_json::from_value(json!({
            "id": id,
            "name": format!("Show {}", id),
            "popularity": popularity
        }))
        .unwrap()
    }

    fn selection(id: u64) -> Selection {
        Selection {
            id,
            kind: MediaKind::Movie,
        }
    }

    fn page_of(items: Vec<MediaItem>) -> PaginatedResult<MediaItem> {
        PaginatedResult {
            page: 1,
            total_pages: 2,
            total_results: items.len() as u32,
            results: items,
        }
    }

    fn ids(pool: &[AggregatedRecommendation]) -> Vec<u64> {
        pool.iter().map(|r| r.item.id).collect()
    }

    #[test]
    fn test_parse_valid_selections() {
        let body = json!({ "items": [
            { "id": 550, "type": "movie" },
            { "id": "1396", "type": "tv" },
            { "id": 13, "type": "anime" }
        ]});
        let selections = parse_selections(&body).unwrap();
        assert_eq!(
            selections,
            vec![
                Selection { id: 550, kind: MediaKind::Movie },
                Selection { id: 1396, kind: MediaKind::Tv },
                Selection { id: 13, kind: MediaKind::Movie },
            ]
        );
    }

    #[test]
    fn test_parse_rejects_bad_item_lists() {
        let six: Vec<Value> = (1..=6).map(|i| json!({ "id": i, "type": "movie" })).collect();
        let cases = [
            json!({}),
            json!({ "items": "550" }),
            json!({ "items": [] }),
            json!({ "items": six }),
        ];
        for body in cases {
            let err = parse_selections(&body).unwrap_err();
            assert!(matches!(err, AppError::InvalidInput(_)), "{body}");
        }
    }

    #[test]
    fn test_parse_rejects_incomplete_entries() {
        for entry in [
            json!({ "id": 550 }),
            json!({ "type": "movie" }),
            json!({ "id": "", "type": "movie" }),
            json!({ "id": 550, "type": "" }),
            json!({ "id": "abc", "type": "movie" }),
        ] {
            let body = json!({ "items": [entry] });
            assert!(parse_selections(&body).is_err(), "{body}");
        }
    }

    #[test]
    fn test_parse_accepts_integral_float_ids() {
        let body = json!({ "items": [{ "id": 550.0, "type": "movie" }] });
        assert_eq!(parse_selections(&body).unwrap()[0].id, 550);
    }

    #[test]
    fn test_parse_names_the_entry_with_a_bad_id() {
        let body = json!({ "items": [
            { "id": 550, "type": "movie" },
            { "id": "tt0137523", "type": "movie" }
        ]});
        let err = parse_selections(&body).unwrap_err();
        assert_eq!(
            err.public_message(),
            "Item 2 has id \"tt0137523\"; each item 'id' must be a numeric TMDB id."
        );

        let body = json!({ "items": [{ "id": 550.5, "type": "movie" }] });
        assert!(parse_selections(&body).is_err());
    }

    #[test]
    fn test_score_counts_distinct_selections() {
        // X (id 100) recommended by selections 1 and 3 but not 2
        let selections = [selection(1), selection(2), selection(3)];
        let lists = vec![
            vec![movie(100, 5.0), movie(200, 50.0)],
            vec![movie(300, 10.0)],
            vec![movie(100, 5.0)],
        ];

        let pool = merge_recommendations(&selections, lists);
        assert_eq!(ids(&pool), vec![100, 200, 300]);
        assert_eq!(pool[0].score, 2);
        assert_eq!(pool[1].score, 1);
    }

    #[test]
    fn test_selected_ids_are_never_recommended() {
        let selections = [selection(1), selection(2)];
        let lists = vec![
            vec![movie(2, 99.0), movie(10, 1.0)],
            vec![movie(1, 99.0), show(1, 99.0), movie(10, 1.0)],
        ];

        let pool = merge_recommendations(&selections, lists);
        assert_eq!(ids(&pool), vec![10]);
        assert_eq!(pool[0].score, 2);
    }

    #[test]
    fn test_movie_and_tv_with_same_id_stay_separate() {
        let selections = [selection(1)];
        let pool = merge_recommendations(&selections, vec![vec![movie(42, 2.0), show(42, 1.0)]]);
        assert_eq!(pool.len(), 2);
        assert_eq!(pool[1].item.media_type.as_deref(), Some("tv"));
    }

    #[test]
    fn test_overlapping_pages_count_once_per_selection() {
        let selections = [selection(1)];
        let pool = merge_recommendations(&selections, vec![vec![movie(7, 1.0), movie(7, 1.0)]]);
        assert_eq!(pool[0].score, 1);
    }

    #[test]
    fn test_ties_break_on_popularity_then_encounter_order() {
        let selections = [selection(1)];
        let lists = vec![vec![movie(10, 1.0), movie(11, 9.0), movie(12, 1.0), movie(13, 1.0)]];
        let pool = merge_recommendations(&selections, lists);
        assert_eq!(ids(&pool), vec![11, 10, 12, 13]);
    }

    #[test]
    fn test_pool_is_capped() {
        let selections = [selection(1)];
        let list = (1000..1080).map(|id| movie(id, id as f64)).collect();
        let pool = merge_recommendations(&selections, vec![list]);
        assert_eq!(pool.len(), POOL_CAP);
        assert_eq!(pool[0].item.id, 1079);
    }

    #[test]
    fn test_score_serializes_alongside_item_fields() {
        let pool = merge_recommendations(&[selection(1)], vec![vec![movie(5, 3.0)]]);
        let value = serde_json::to_value(&pool[0]).unwrap();
        assert_eq!(value["id"], 5);
        assert_eq!(value["title"], "Movie 5");
        assert_eq!(value["score"], 1);
    }

    #[tokio::test]
    async fn test_failed_selection_is_isolated() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_recommendations()
            .returning(|kind, id, page| match (id, page) {
                (1, 1) => Ok(page_of(vec![movie(100, 1.0), movie(101, 2.0)])),
                (1, _) => Ok(page_of(vec![movie(102, 3.0)])),
                (2, _) => Err(ProviderError::Status {
                    status: 500,
                    body: String::new(),
                }),
                (3, _) => {
                    assert_eq!(kind, MediaKind::Tv);
                    Ok(page_of(vec![movie(100, 1.0)]))
                }
                _ => Ok(page_of(Vec::new())),
            });

        let selections = [
            selection(1),
            selection(2),
            Selection {
                id: 3,
                kind: MediaKind::Tv,
            },
        ];
        let result =
            aggregate_recommendations(&provider, &selections, PageRequest { page: 1, limit: 2 })
                .await;

        assert_eq!(result.total_results, 3);
        assert_eq!(result.total_pages, 2);
        assert_eq!(ids(&result.results), vec![100, 102]);
        assert_eq!(result.results[0].score, 2);
    }

    #[tokio::test]
    async fn test_fetches_two_pages_per_selection() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_recommendations()
            .times(4)
            .returning(|_, _, page| {
                assert!(page == 1 || page == 2);
                Ok(page_of(Vec::new()))
            });

        let result = aggregate_recommendations(
            &provider,
            &[selection(1), selection(2)],
            PageRequest::default(),
        )
        .await;
        assert!(result.results.is_empty());
        assert_eq!(result.page, 1);
    }
}
