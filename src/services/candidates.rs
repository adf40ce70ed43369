//! Candidate pool assembly
//!
//! One strategy-selectable collector builds the comparison pool for a target
//! item. Every returned candidate has a non-empty overview and a poster
//! reference; anything else is dropped silently before scoring ever sees it.

use std::collections::HashSet;

use serde::Deserialize;

use crate::error::AppResult;
use crate::models::{CatalogItem, MediaKind};
use crate::services::catalog::CatalogProvider;

/// Below this pool size the orchestrator skips scoring and returns the raw
/// pool; statistics over a near-empty corpus are meaningless.
pub const MIN_POOL_SIZE: usize = 5;

/// Hard cap on the discovery pool before scoring
const DISCOVERY_POOL_CAP: usize = 400;
/// How many of the target's genres seed the discovery queries
const DISCOVERY_GENRE_LIMIT: usize = 3;
/// Discovery pages fetched per run
const DISCOVERY_PAGES: u32 = 2;

/// How the comparison pool is assembled for a target item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStrategy {
    /// The catalog's own "similar" listing; pre-vetted for relevance, so a
    /// low score threshold suffices
    #[default]
    CatalogNative,
    /// Genre-filtered discovery queries unioned with this week's trending
    /// titles; broader and noisier, so the threshold is higher
    Discovery,
    /// One page of top-rated titles with a minimum vote count
    FixedPool,
}

impl CandidateStrategy {
    /// Minimum cosine score a candidate must exceed to stay in the result
    pub fn score_threshold(self) -> f64 {
        match self {
            CandidateStrategy::CatalogNative => 0.01,
            CandidateStrategy::Discovery | CandidateStrategy::FixedPool => 0.05,
        }
    }

    /// Cap on the ranked result list
    pub fn max_results(self) -> usize {
        match self {
            CandidateStrategy::CatalogNative => 50,
            CandidateStrategy::Discovery => 100,
            CandidateStrategy::FixedPool => 20,
        }
    }
}

/// An item qualifies for scoring only with synopsis text and a poster
fn is_eligible(item: &CatalogItem) -> bool {
    !item.overview.trim().is_empty() && item.poster_path.is_some()
}

/// Deduplicates by `(kind, id)`, first occurrence wins, capped at `cap`
fn dedupe_by_key(pools: Vec<Vec<CatalogItem>>, cap: usize) -> Vec<CatalogItem> {
    let mut seen: HashSet<(MediaKind, u64)> = HashSet::new();
    let mut merged = Vec::new();

    for pool in pools {
        for item in pool {
            if merged.len() >= cap {
                return merged;
            }
            if seen.insert((item.kind, item.id)) {
                merged.push(item);
            }
        }
    }

    merged
}

/// Resolves genre ids to names on listing items that arrived without them
fn resolve_genres(
    items: &mut [CatalogItem],
    genre_map: &std::collections::HashMap<u64, String>,
) {
    for item in items.iter_mut() {
        if item.genres.is_empty() {
            item.genres = item
                .genre_ids
                .iter()
                .filter_map(|id| genre_map.get(id).cloned())
                .collect();
        }
    }
}

/// Fetches the catalog's own "similar" pool for an item
///
/// Needs only the target's identity, so the orchestrator can check the pool
/// floor before spending a details fetch on the target's rich metadata.
pub async fn catalog_native(
    provider: &dyn CatalogProvider,
    kind: MediaKind,
    id: u64,
) -> AppResult<Vec<CatalogItem>> {
    let pool = provider.similar(kind, id).await?;
    let eligible: Vec<CatalogItem> = pool.into_iter().filter(is_eligible).collect();

    tracing::debug!(
        kind = %kind,
        target_id = id,
        candidates = eligible.len(),
        "Candidate pool assembled"
    );

    Ok(eligible)
}

/// Assembles the comparison pool for `target` per the chosen strategy
pub async fn collect(
    provider: &dyn CatalogProvider,
    strategy: CandidateStrategy,
    target: &CatalogItem,
) -> AppResult<Vec<CatalogItem>> {
    let pool = match strategy {
        CandidateStrategy::CatalogNative => {
            return catalog_native(provider, target.kind, target.id).await;
        }
        CandidateStrategy::Discovery => {
            let genre_ids: Vec<u64> = target
                .genre_ids
                .iter()
                .copied()
                .take(DISCOVERY_GENRE_LIMIT)
                .collect();

            let (trending, genre_map) = tokio::join!(
                provider.trending(target.kind, 1),
                provider.genre_names(target.kind),
            );
            let genre_map = genre_map?;

            let mut pools = Vec::with_capacity(DISCOVERY_PAGES as usize + 1);
            for page in 1..=DISCOVERY_PAGES {
                pools.push(
                    provider
                        .discover_by_genres(target.kind, genre_ids.clone(), page)
                        .await?,
                );
            }
            pools.push(trending?);

            let mut merged = dedupe_by_key(pools, DISCOVERY_POOL_CAP);
            resolve_genres(&mut merged, &genre_map);
            merged
        }
        CandidateStrategy::FixedPool => {
            let (pool, genre_map) = tokio::join!(
                provider.top_rated(target.kind, 1),
                provider.genre_names(target.kind),
            );
            let mut pool = pool?;
            resolve_genres(&mut pool, &genre_map?);
            pool
        }
    };

    let eligible: Vec<CatalogItem> = pool.into_iter().filter(is_eligible).collect();

    tracing::debug!(
        strategy = ?strategy,
        target_id = target.id,
        candidates = eligible.len(),
        "Candidate pool assembled"
    );

    Ok(eligible)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::catalog::MockCatalogProvider;
    use std::collections::HashMap;

    fn item(id: u64, overview: &str) -> CatalogItem {
        CatalogItem {
            id,
            kind: MediaKind::Movie,
            title: format!("Item {}", id),
            overview: overview.to_string(),
            genres: Vec::new(),
            genre_ids: vec![80],
            keywords: Vec::new(),
            popularity: 1.0,
            vote_average: 7.0,
            release_date: None,
            poster_path: Some("/p.jpg".to_string()),
        }
    }

    #[test]
    fn test_strategy_thresholds() {
        assert_eq!(CandidateStrategy::CatalogNative.score_threshold(), 0.01);
        assert_eq!(CandidateStrategy::Discovery.score_threshold(), 0.05);
        assert_eq!(CandidateStrategy::FixedPool.score_threshold(), 0.05);
    }

    #[test]
    fn test_strategy_result_caps() {
        assert_eq!(CandidateStrategy::CatalogNative.max_results(), 50);
        assert_eq!(CandidateStrategy::Discovery.max_results(), 100);
        assert_eq!(CandidateStrategy::FixedPool.max_results(), 20);
    }

    #[test]
    fn test_eligibility_requires_overview_and_poster() {
        assert!(is_eligible(&item(1, "Has an overview.")));

        assert!(!is_eligible(&item(2, "")));
        assert!(!is_eligible(&item(3, "   ")));

        let mut no_poster = item(4, "Has an overview.");
        no_poster.poster_path = None;
        assert!(!is_eligible(&no_poster));
    }

    #[test]
    fn test_dedupe_first_occurrence_wins() {
        let mut renamed = item(1, "Overview.");
        renamed.title = "Second copy".to_string();

        let merged = dedupe_by_key(
            vec![vec![item(1, "Overview."), item(2, "Overview.")], vec![renamed, item(3, "Overview.")]],
            10,
        );

        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].title, "Item 1");
    }

    #[test]
    fn test_dedupe_same_id_different_kind_kept() {
        let mut series = item(1, "Overview.");
        series.kind = MediaKind::Series;

        let merged = dedupe_by_key(vec![vec![item(1, "Overview."), series]], 10);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_dedupe_respects_cap() {
        let pool: Vec<CatalogItem> = (0..20).map(|i| item(i, "Overview.")).collect();
        let merged = dedupe_by_key(vec![pool], 5);
        assert_eq!(merged.len(), 5);
    }

    #[tokio::test]
    async fn test_collect_catalog_native_filters_ineligible() {
        let mut provider = MockCatalogProvider::new();
        provider.expect_similar().returning(|_, _| {
            let mut no_poster = item(3, "Overview.");
            no_poster.poster_path = None;
            Ok(vec![item(1, "Overview."), item(2, ""), no_poster])
        });

        let target = item(99, "Target overview.");
        let pool = collect(&provider, CandidateStrategy::CatalogNative, &target)
            .await
            .unwrap();

        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].id, 1);
    }

    #[tokio::test]
    async fn test_collect_discovery_dedupes_overlapping_pages() {
        let mut provider = MockCatalogProvider::new();
        // Every page in 1..=DISCOVERY_PAGES is fetched exactly once
        for page in 1..=DISCOVERY_PAGES {
            provider
                .expect_discover_by_genres()
                .withf(move |_, _, p| *p == page)
                .times(1)
                .returning(|_, _, page| {
                    if page == 1 {
                        Ok(vec![item(1, "Overview."), item(2, "Overview.")])
                    } else {
                        Ok(vec![item(2, "Overview."), item(3, "Overview.")])
                    }
                });
        }
        provider
            .expect_trending()
            .returning(|_, _| Ok(vec![item(3, "Overview."), item(4, "Overview.")]));
        provider.expect_genre_names().returning(|_| {
            let mut map = HashMap::new();
            map.insert(80, "Crime".to_string());
            Ok(map)
        });

        let target = item(99, "Target overview.");
        let pool = collect(&provider, CandidateStrategy::Discovery, &target)
            .await
            .unwrap();

        let ids: Vec<u64> = pool.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        // Genre ids were resolved to names through the fetched map
        assert!(pool.iter().all(|c| c.genres == vec!["Crime".to_string()]));
    }

    #[tokio::test]
    async fn test_collect_fixed_pool_resolves_genres() {
        let mut provider = MockCatalogProvider::new();
        provider
            .expect_top_rated()
            .returning(|_, _| Ok(vec![item(1, "Overview."), item(2, "Overview.")]));
        provider.expect_genre_names().returning(|_| {
            let mut map = HashMap::new();
            map.insert(80, "Crime".to_string());
            Ok(map)
        });

        let target = item(99, "Target overview.");
        let pool = collect(&provider, CandidateStrategy::FixedPool, &target)
            .await
            .unwrap();

        assert_eq!(pool.len(), 2);
        assert_eq!(pool[0].genres, vec!["Crime".to_string()]);
    }
}
