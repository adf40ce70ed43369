//! Media catalog abstraction
//!
//! The similarity pipeline and the batch job consume catalog data through
//! this trait so they never depend on TMDB specifics; [`tmdb::TmdbProvider`]
//! is the production implementation. All calls are read-only GETs and a
//! non-success response surfaces as an error for the orchestrator's
//! fallback chain to handle.

pub mod tmdb;

use std::collections::HashMap;

use crate::error::AppResult;
use crate::models::{CatalogItem, MediaKind};

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Fetches an item's full metadata with its keyword labels attached
    ///
    /// Details and keywords live on separate endpoints and are fetched in
    /// parallel, then merged into one [`CatalogItem`] at the ingestion
    /// boundary.
    async fn details_with_keywords(&self, kind: MediaKind, id: u64) -> AppResult<CatalogItem>;

    /// The catalog's own "similar titles" listing for an item
    async fn similar(&self, kind: MediaKind, id: u64) -> AppResult<Vec<CatalogItem>>;

    /// The catalog's own "recommendations" listing for an item
    async fn recommendations(&self, kind: MediaKind, id: u64) -> AppResult<Vec<CatalogItem>>;

    /// Discovery listing filtered by genre ids, sorted by popularity
    async fn discover_by_genres(
        &self,
        kind: MediaKind,
        genre_ids: Vec<u64>,
        page: u32,
    ) -> AppResult<Vec<CatalogItem>>;

    /// Items trending this week
    async fn trending(&self, kind: MediaKind, page: u32) -> AppResult<Vec<CatalogItem>>;

    /// Top-rated items with a minimum vote count, one page
    async fn top_rated(&self, kind: MediaKind, page: u32) -> AppResult<Vec<CatalogItem>>;

    /// Popular items, paginated; drives the batch cursor
    async fn popular(&self, kind: MediaKind, page: u32) -> AppResult<Vec<CatalogItem>>;

    /// Genre id -> name mapping for a media kind
    async fn genre_names(&self, kind: MediaKind) -> AppResult<HashMap<u64, String>>;
}
