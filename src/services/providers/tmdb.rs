/// TMDB API provider
///
/// Thin authenticated GET client over the TMDB v3 API. Every request carries
/// the shared `api_key` query parameter; there is no caching and no retry.
///
/// Endpoints used:
/// - /configuration, /configuration/languages, /configuration/countries
/// - /genre/{kind}/list
/// - /discover/{kind}
/// - /search/multi
/// - /{kind}/{id}/recommendations
/// - /{kind}/{id}?append_to_response=credits
use crate::{
    models::{
        Country, Language, MediaDetails, MediaItem, MediaKind, MovieDetails, PaginatedResult,
        TvDetails,
    },
    services::providers::{MetadataProvider, ProviderError, ProviderResult},
};
use reqwest::{Client as HttpClient, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;

/// List response as sent by the upstream. Results stay untyped so one
/// malformed entry drops that entry instead of the whole page.
#[derive(Debug, Deserialize)]
struct RawPage {
    #[serde(default)]
    page: u32,
    #[serde(default)]
    results: Vec<Value>,
    #[serde(default)]
    total_pages: u32,
    #[serde(default)]
    total_results: u32,
}

impl From<RawPage> for PaginatedResult<MediaItem> {
    fn from(raw: RawPage) -> Self {
        let received = raw.results.len();
        let results: Vec<MediaItem> = raw
            .results
            .into_iter()
            .filter_map(|value| serde_json::from_value::<MediaItem>(value).ok())
            .collect();

        if results.len() < received {
            tracing::debug!(
                dropped = received - results.len(),
                "Skipped list entries without a usable id"
            );
        }

        PaginatedResult {
            page: raw.page,
            results,
            total_pages: raw.total_pages,
            total_results: raw.total_results,
        }
    }
}

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
}

impl TmdbProvider {
    /// Creates a provider against the given API base URL.
    ///
    /// A missing key is not fatal: calls still go out and the upstream's 401
    /// comes back as `ProviderError::Unauthorized`.
    pub fn new(api_key: Option<String>, api_url: impl Into<String>) -> Self {
        if api_key.is_none() {
            tracing::warn!("TMDB_API_KEY is not set; upstream calls will be rejected");
        }

        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Maps a non-success status onto the provider error taxonomy
    fn status_error(status: StatusCode, body: String) -> ProviderError {
        match status {
            StatusCode::NOT_FOUND => ProviderError::NotFound,
            StatusCode::UNAUTHORIZED => ProviderError::Unauthorized,
            other => ProviderError::Status {
                status: other.as_u16(),
                body,
            },
        }
    }

    /// Issues an authenticated GET and decodes the JSON body
    async fn get_json<T, Q>(&self, path: &str, params: &Q) -> ProviderResult<T>
    where
        T: DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let url = format!("{}{}", self.api_url, path);

        let mut request = self.http_client.get(&url);
        if let Some(api_key) = &self.api_key {
            request = request.query(&[("api_key", api_key.as_str())]);
        }

        let response = request.query(params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::status_error(status, body));
        }

        let response_text = response.text().await?;
        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                path = %path,
                "Failed to deserialize TMDB response"
            );
            ProviderError::InvalidResponse(format!("Failed to parse TMDB response: {}", e))
        })
    }

    async fn get_page<Q>(&self, path: &str, params: &Q) -> ProviderResult<PaginatedResult<MediaItem>>
    where
        Q: serde::Serialize + ?Sized,
    {
        let raw: RawPage = self.get_json(path, params).await?;
        Ok(raw.into())
    }
}

const NO_PARAMS: &[(&str, &str)] = &[];

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn configuration(&self) -> ProviderResult<Value> {
        self.get_json("/configuration", NO_PARAMS).await
    }

    async fn genres(&self, kind: MediaKind) -> ProviderResult<Value> {
        self.get_json(&format!("/genre/{}/list", kind), NO_PARAMS)
            .await
    }

    async fn languages(&self) -> ProviderResult<Vec<Language>> {
        self.get_json("/configuration/languages", NO_PARAMS).await
    }

    async fn countries(&self) -> ProviderResult<Vec<Country>> {
        self.get_json("/configuration/countries", NO_PARAMS).await
    }

    async fn discover(
        &self,
        kind: MediaKind,
        params: &[(String, String)],
        page: u32,
    ) -> ProviderResult<PaginatedResult<MediaItem>> {
        let mut query: Vec<(&str, String)> = params
            .iter()
            .map(|(key, value)| (key.as_str(), value.clone()))
            .collect();
        query.push(("page", page.to_string()));

        let result = self
            .get_page(&format!("/discover/{}", kind), &query)
            .await?;

        tracing::debug!(
            media_type = %kind,
            page,
            results = result.results.len(),
            provider = self.name(),
            "Discovery page fetched"
        );

        Ok(result)
    }

    async fn search_multi(
        &self,
        query: &str,
        page: u32,
    ) -> ProviderResult<PaginatedResult<MediaItem>> {
        let page = page.to_string();
        let result = self
            .get_page("/search/multi", &[("query", query), ("page", page.as_str())])
            .await?;

        tracing::info!(
            query = %query,
            results = result.results.len(),
            provider = self.name(),
            "Search completed"
        );

        Ok(result)
    }

    async fn recommendations(
        &self,
        kind: MediaKind,
        id: u64,
        page: u32,
    ) -> ProviderResult<PaginatedResult<MediaItem>> {
        let page = page.to_string();
        self.get_page(
            &format!("/{}/{}/recommendations", kind, id),
            &[("page", page.as_str())],
        )
        .await
    }

    async fn details(&self, kind: MediaKind, id: u64) -> ProviderResult<MediaDetails> {
        let raw: Value = self
            .get_json(
                &format!("/{}/{}", kind, id),
                &[("append_to_response", "credits")],
            )
            .await?;

        let invalid = |e: serde_json::Error| {
            ProviderError::InvalidResponse(format!("Unexpected {} detail shape: {}", kind, e))
        };

        let details = match kind {
            MediaKind::Movie => MediaDetails::Movie {
                details: serde_json::from_value::<MovieDetails>(raw.clone()).map_err(invalid)?,
                raw,
            },
            MediaKind::Tv => MediaDetails::Tv {
                details: serde_json::from_value::<TvDetails>(raw.clone()).map_err(invalid)?,
                raw,
            },
        };

        Ok(details)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_error_mapping() {
        assert!(matches!(
            TmdbProvider::status_error(StatusCode::NOT_FOUND, String::new()),
            ProviderError::NotFound
        ));
        assert!(matches!(
            TmdbProvider::status_error(StatusCode::UNAUTHORIZED, String::new()),
            ProviderError::Unauthorized
        ));
        assert!(matches!(
            TmdbProvider::status_error(StatusCode::BAD_GATEWAY, "oops".to_string()),
            ProviderError::Status { status: 502, .. }
        ));
    }

    #[test]
    fn test_raw_page_drops_unusable_entries() {
        let raw: RawPage = serde_json::from_value(json!({
            "page": 2,
            "results": [
                { "id": 1, "title": "Kept" },
                { "title": "No id" },
                { "id": "not-a-number" },
                { "id": 2, "name": "Also kept" }
            ],
            "total_pages": 7,
            "total_results": 130
        }))
        .unwrap();

        let page: PaginatedResult<MediaItem> = raw.into();
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 7);
        assert_eq!(page.total_results, 130);
        assert_eq!(
            page.results.iter().map(|item| item.id).collect::<Vec<_>>(),
            vec![1, 2]
        );
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let provider = TmdbProvider::new(Some("key".to_string()), "http://test.local/3/");
        assert_eq!(provider.api_url, "http://test.local/3");
        assert_eq!(provider.name(), "tmdb");
    }
}
