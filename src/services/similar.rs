//! Cache-or-compute orchestration for similar-title requests
//!
//! The only place upstream failures are caught: a cached result is served
//! verbatim, a miss runs the candidate collector and scoring pipeline, and
//! any upstream error during compute routes to a fallback chain built from
//! the catalog's own listings. The TTL of a persisted entry encodes how much
//! confidence the path that produced it deserves.

use crate::db::{Cache, CacheKey};
use crate::error::{AppError, AppResult};
use crate::models::{CatalogItem, MediaKind, SimilarList};
use crate::services::candidates::{self, CandidateStrategy, MIN_POOL_SIZE};
use crate::services::catalog::CatalogProvider;
use crate::services::similarity::ScoringPool;

/// Full TF-IDF result: highest confidence, longest freshness window
pub const FULL_RESULT_TTL: u64 = 60 * 60 * 24 * 30;
/// Raw catalog passthrough when the pool was too small to score
pub const PASSTHROUGH_TTL: u64 = 60 * 60 * 24 * 7;
/// Fallback-chain result: lowest confidence, retried soonest
pub const FALLBACK_TTL: u64 = 60 * 60 * 24;

/// What the compute step produced, before persistence
#[derive(Debug, PartialEq)]
pub enum Computed {
    /// Ranked pipeline output, persisted for [`FULL_RESULT_TTL`]
    Scored(SimilarList),
    /// Raw candidate pool returned as-is, persisted for [`PASSTHROUGH_TTL`]
    Passthrough(SimilarList),
}

/// Serves "items similar to X", computing and persisting on a cache miss
pub async fn get_similar(
    cache: &Cache,
    provider: &dyn CatalogProvider,
    strategy: CandidateStrategy,
    kind: MediaKind,
    id: u64,
) -> AppResult<SimilarList> {
    let key = CacheKey::Similar(kind, id);

    if let Some(cached) = cache.get_from_cache::<SimilarList>(&key).await? {
        tracing::debug!(key = %key, results = cached.len(), "Cache hit");
        return Ok(cached);
    }

    tracing::info!(key = %key, strategy = ?strategy, "Cache miss, computing similarity");

    match compute(provider, strategy, kind, id).await {
        Ok(Computed::Scored(list)) => {
            if !list.is_empty() {
                cache.set_in_background(&key, &list, Some(FULL_RESULT_TTL));
            }
            Ok(list)
        }
        Ok(Computed::Passthrough(list)) => {
            cache.set_in_background(&key, &list, Some(PASSTHROUGH_TTL));
            Ok(list)
        }
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Computation failed, using fallback");
            let items = fallback_pool(provider, kind, id).await.map_err(|fe| {
                tracing::error!(key = %key, error = %fe, "Fallback failed too");
                AppError::Internal("Both calculation and fallback failed".to_string())
            })?;

            let list = SimilarList::Plain(items);
            cache.set_in_background(&key, &list, Some(FALLBACK_TTL));
            Ok(list)
        }
    }
}

/// Runs the candidate collector and the scoring pipeline for one target
///
/// A pool below [`MIN_POOL_SIZE`] short-circuits to passthrough: the raw
/// candidates are returned unscored rather than ranked against a corpus too
/// small to carry meaningful statistics.
pub async fn compute(
    provider: &dyn CatalogProvider,
    strategy: CandidateStrategy,
    kind: MediaKind,
    id: u64,
) -> AppResult<Computed> {
    // The catalog-native pool needs only the target's identity, so the floor
    // is checked before the details fetch; a sparse listing passes through
    // without ever touching the details endpoint
    if strategy == CandidateStrategy::CatalogNative {
        let pool = candidates::catalog_native(provider, kind, id).await?;
        if pool.len() < MIN_POOL_SIZE {
            return Ok(short_circuit(kind, id, pool));
        }
        let target = provider.details_with_keywords(kind, id).await?;
        return Ok(score(&target, pool, strategy, kind));
    }

    // Discovery and fixed-pool queries are seeded from the target's own
    // genres, so its metadata comes first
    let target = provider.details_with_keywords(kind, id).await?;
    let pool = candidates::collect(provider, strategy, &target).await?;

    if pool.len() < MIN_POOL_SIZE {
        return Ok(short_circuit(kind, id, pool));
    }

    Ok(score(&target, pool, strategy, kind))
}

fn short_circuit(kind: MediaKind, id: u64, pool: Vec<CatalogItem>) -> Computed {
    tracing::info!(
        kind = %kind,
        id = id,
        candidates = pool.len(),
        "Candidate pool below minimum, returning raw pool"
    );
    Computed::Passthrough(SimilarList::Plain(pool))
}

fn score(
    target: &CatalogItem,
    pool: Vec<CatalogItem>,
    strategy: CandidateStrategy,
    kind: MediaKind,
) -> Computed {
    let ranked = ScoringPool::build(target, pool).rank(
        target.id,
        strategy.score_threshold(),
        strategy.max_results(),
    );

    tracing::info!(kind = %kind, id = target.id, results = ranked.len(), "Similarity computed");

    Computed::Scored(SimilarList::Scored(ranked))
}

/// Degraded alternative when the compute path fails
///
/// Fetches the catalog's "similar" and "recommendations" listings in
/// parallel, tolerating either failing alone, and merges them by id with
/// the later source overwriting the earlier. Errors only when both fail.
async fn fallback_pool(
    provider: &dyn CatalogProvider,
    kind: MediaKind,
    id: u64,
) -> AppResult<Vec<CatalogItem>> {
    let (similar, recommendations) =
        tokio::join!(provider.similar(kind, id), provider.recommendations(kind, id));

    let mut sources = Vec::new();
    match similar {
        Ok(items) => sources.push(items),
        Err(e) => tracing::warn!(error = %e, "Fallback similar fetch failed"),
    }
    match recommendations {
        Ok(items) => sources.push(items),
        Err(e) => tracing::warn!(error = %e, "Fallback recommendations fetch failed"),
    }

    if sources.is_empty() {
        return Err(AppError::ExternalApi(
            "All fallback sources failed".to_string(),
        ));
    }

    // Merge preserving first-seen position, later source wins on collisions
    let mut merged: Vec<CatalogItem> = Vec::new();
    let mut index_of: std::collections::HashMap<u64, usize> = std::collections::HashMap::new();
    for items in sources {
        for item in items {
            match index_of.get(&item.id) {
                Some(&i) => merged[i] = item,
                None => {
                    index_of.insert(item.id, merged.len());
                    merged.push(item);
                }
            }
        }
    }

    Ok(merged)
}
