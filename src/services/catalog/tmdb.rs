//! TMDB catalog provider
//!
//! Thin client over the TMDB v3 REST API. Responses are converted to the
//! internal [`CatalogItem`] shape immediately after deserialization; nothing
//! outside this module sees TMDB field names or the movie/TV shape split.

use std::collections::HashMap;

use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

use crate::error::{AppError, AppResult};
use crate::models::{CatalogItem, MediaKind, TmdbDetails, TmdbGenreList, TmdbKeywordsResponse, TmdbPage};
use crate::services::catalog::CatalogProvider;

/// Minimum vote count for the top-rated candidate pool
const TOP_RATED_MIN_VOTES: u32 = 500;

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    base_url: String,
}

impl TmdbProvider {
    /// Creates a provider sharing the application's HTTP client
    ///
    /// The client carries the configured request timeout, which bounds every
    /// upstream call made here.
    pub fn new(http_client: HttpClient, api_key: String, base_url: String) -> Self {
        Self {
            http_client,
            api_key,
            base_url,
        }
    }

    /// Issues a GET against a TMDB path and deserializes the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", "en-US"),
            ])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB returned status {} for {}: {}",
                status, path, body
            )));
        }

        Ok(response.json().await?)
    }

    /// Fetches a listing page and normalizes its entries
    async fn get_listing(
        &self,
        path: &str,
        params: &[(&str, String)],
        kind: MediaKind,
    ) -> AppResult<Vec<CatalogItem>> {
        let page: TmdbPage = self.get_json(path, params).await?;
        Ok(page
            .results
            .into_iter()
            .map(|raw| raw.into_item(kind, None))
            .collect())
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbProvider {
    async fn details_with_keywords(&self, kind: MediaKind, id: u64) -> AppResult<CatalogItem> {
        let base = format!("/{}/{}", kind.tmdb_path(), id);
        let keywords_path = format!("{}/keywords", base);

        let (details, keywords) = tokio::join!(
            self.get_json::<TmdbDetails>(&base, &[]),
            self.get_json::<TmdbKeywordsResponse>(&keywords_path, &[]),
        );
        let (details, keywords) = (details?, keywords?);

        tracing::debug!(
            kind = %kind,
            id = id,
            genres = details.genres.len(),
            "Fetched item details with keywords"
        );

        Ok(details.into_item(kind, keywords.into_names()))
    }

    async fn similar(&self, kind: MediaKind, id: u64) -> AppResult<Vec<CatalogItem>> {
        let path = format!("/{}/{}/similar", kind.tmdb_path(), id);
        self.get_listing(&path, &[], kind).await
    }

    async fn recommendations(&self, kind: MediaKind, id: u64) -> AppResult<Vec<CatalogItem>> {
        let path = format!("/{}/{}/recommendations", kind.tmdb_path(), id);
        self.get_listing(&path, &[], kind).await
    }

    async fn discover_by_genres(
        &self,
        kind: MediaKind,
        genre_ids: Vec<u64>,
        page: u32,
    ) -> AppResult<Vec<CatalogItem>> {
        let with_genres = genre_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let path = format!("/discover/{}", kind.tmdb_path());
        let params = [
            ("with_genres", with_genres),
            ("sort_by", "popularity.desc".to_string()),
            ("page", page.to_string()),
        ];
        self.get_listing(&path, &params, kind).await
    }

    async fn trending(&self, kind: MediaKind, page: u32) -> AppResult<Vec<CatalogItem>> {
        let path = format!("/trending/{}/week", kind.tmdb_path());
        self.get_listing(&path, &[("page", page.to_string())], kind)
            .await
    }

    async fn top_rated(&self, kind: MediaKind, page: u32) -> AppResult<Vec<CatalogItem>> {
        let path = format!("/discover/{}", kind.tmdb_path());
        let params = [
            ("sort_by", "vote_average.desc".to_string()),
            ("vote_count.gte", TOP_RATED_MIN_VOTES.to_string()),
            ("page", page.to_string()),
        ];
        self.get_listing(&path, &params, kind).await
    }

    async fn popular(&self, kind: MediaKind, page: u32) -> AppResult<Vec<CatalogItem>> {
        let path = format!("/{}/popular", kind.tmdb_path());
        self.get_listing(&path, &[("page", page.to_string())], kind)
            .await
    }

    async fn genre_names(&self, kind: MediaKind) -> AppResult<HashMap<u64, String>> {
        let path = format!("/genre/{}/list", kind.tmdb_path());
        let list: TmdbGenreList = self.get_json(&path, &[]).await?;
        Ok(list.genres.into_iter().map(|g| (g.id, g.name)).collect())
    }
}
