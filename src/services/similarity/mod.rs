//! Content-similarity scoring pipeline
//!
//! Turns catalog metadata into weighted term documents, builds per-request
//! TF-IDF statistics over `[target, candidates...]` as one corpus, and ranks
//! the candidates by cosine similarity against the target. Every function
//! here is total: empty inputs degrade to empty or zero results.

pub mod text;
pub mod tfidf;

use crate::models::{CatalogItem, ScoredItem};
use text::tokenize;
use tfidf::{term_frequencies, IdfTable, TfMap, WeightedVector};

/// Repetitions of the genre labels inside a document
const GENRE_BOOST: usize = 5;
/// Repetitions of the keyword labels inside the target document
const KEYWORD_BOOST: usize = 10;

/// Builds the target's rich document: overview + genres x5 + keywords x10
///
/// The repetition is the weighting mechanism: it inflates the term-frequency
/// contribution of structured metadata so genre and keyword overlap dominate
/// raw overview wording.
pub fn target_document(item: &CatalogItem) -> String {
    let genres = item.genres.join(" ");
    let keywords = item.keywords.join(" ");

    let mut parts = vec![item.overview.clone()];
    parts.extend(std::iter::repeat(genres).take(GENRE_BOOST));
    parts.extend(std::iter::repeat(keywords).take(KEYWORD_BOOST));
    parts.join(" ")
}

/// Builds a candidate's lighter document: overview + genres x5, no keywords
///
/// Candidates from catalog-native pools arrive without resolved genre names;
/// for those this degrades to the overview alone.
pub fn candidate_document(item: &CatalogItem) -> String {
    if item.genres.is_empty() {
        return item.overview.clone();
    }

    let genres = item.genres.join(" ");
    let mut parts = vec![item.overview.clone()];
    parts.extend(std::iter::repeat(genres).take(GENRE_BOOST));
    parts.join(" ")
}

/// The target document paired explicitly with each candidate's document
///
/// Keeping the pairing in one structure means no downstream step relies on
/// positional arithmetic between a corpus index and a candidate index.
pub struct ScoringPool {
    target: TfMap,
    candidates: Vec<(CatalogItem, TfMap)>,
}

impl ScoringPool {
    /// Tokenizes and counts the target and every candidate
    pub fn build(target: &CatalogItem, candidates: Vec<CatalogItem>) -> Self {
        let target_tf = term_frequencies(&tokenize(&target_document(target)));
        let candidates = candidates
            .into_iter()
            .map(|item| {
                let tf = term_frequencies(&tokenize(&candidate_document(&item)));
                (item, tf)
            })
            .collect();

        Self {
            target: target_tf,
            candidates,
        }
    }

    /// Ranks candidates by cosine similarity against the target
    ///
    /// IDF is computed fresh over this pool's corpus. Candidates scoring at
    /// or below `threshold`, and the target itself, are dropped; the rest are
    /// sorted descending (ties in arbitrary order) and capped at `limit`.
    pub fn rank(self, target_id: u64, threshold: f64, limit: usize) -> Vec<ScoredItem> {
        let corpus: Vec<&TfMap> = std::iter::once(&self.target)
            .chain(self.candidates.iter().map(|(_, tf)| tf))
            .collect();
        let idf = IdfTable::build(&corpus);
        let target_vec = WeightedVector::from_tf(&self.target, &idf);

        let mut scored: Vec<ScoredItem> = self
            .candidates
            .iter()
            .map(|(item, tf)| {
                let vec = WeightedVector::from_tf(tf, &idf);
                ScoredItem {
                    item: item.clone(),
                    score: target_vec.cosine(&vec),
                }
            })
            .filter(|s| s.score > threshold && s.item.id != target_id)
            .collect();

        scored.sort_unstable_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(limit);
        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaKind;

    fn item(id: u64, overview: &str, genres: &[&str]) -> CatalogItem {
        CatalogItem {
            id,
            kind: MediaKind::Movie,
            title: format!("Item {}", id),
            overview: overview.to_string(),
            genres: genres.iter().map(|g| g.to_string()).collect(),
            genre_ids: Vec::new(),
            keywords: Vec::new(),
            popularity: 1.0,
            vote_average: 7.0,
            release_date: None,
            poster_path: Some("/p.jpg".to_string()),
        }
    }

    #[test]
    fn test_target_document_boosts_metadata() {
        let mut target = item(1, "A story.", &["Crime"]);
        target.keywords = vec!["heist".to_string()];
        let doc = target_document(&target);

        assert_eq!(doc.matches("Crime").count(), 5);
        assert_eq!(doc.matches("heist").count(), 10);
        assert_eq!(doc.matches("story").count(), 1);
    }

    #[test]
    fn test_candidate_document_no_keyword_boost() {
        let mut candidate = item(2, "A story.", &["Crime"]);
        candidate.keywords = vec!["heist".to_string()];
        let doc = candidate_document(&candidate);

        assert_eq!(doc.matches("Crime").count(), 5);
        assert_eq!(doc.matches("heist").count(), 0);
    }

    #[test]
    fn test_candidate_document_without_genres_is_overview() {
        let candidate = item(2, "Just the overview.", &[]);
        assert_eq!(candidate_document(&candidate), "Just the overview.");
    }

    #[test]
    fn test_rank_prefers_matching_genre_and_plot() {
        let target = item(
            1,
            "A detective investigates a murder in a rainy city",
            &["Crime", "Drama"],
        );
        let similar = item(2, "A cop solves a killing downtown", &["Crime", "Drama"]);
        let unrelated = item(3, "A romantic comedy about two chefs", &["Comedy"]);

        let pool = ScoringPool::build(&target, vec![similar, unrelated]);
        let ranked = pool.rank(1, 0.0, 10);

        for s in &ranked {
            assert!(s.score >= 0.0 && s.score <= 1.0);
        }
        let crime_score = ranked
            .iter()
            .find(|s| s.item.id == 2)
            .map(|s| s.score)
            .unwrap_or(0.0);
        let comedy_score = ranked
            .iter()
            .find(|s| s.item.id == 3)
            .map(|s| s.score)
            .unwrap_or(0.0);
        assert!(
            crime_score > comedy_score,
            "crime {} vs comedy {}",
            crime_score,
            comedy_score
        );
    }

    #[test]
    fn test_rank_excludes_target_itself() {
        let target = item(1, "A detective investigates a murder", &["Crime"]);
        let self_copy = item(1, "A detective investigates a murder", &["Crime"]);
        let other = item(2, "A detective investigates a killing", &["Crime"]);

        let pool = ScoringPool::build(&target, vec![self_copy, other]);
        let ranked = pool.rank(1, 0.0, 10);

        assert!(ranked.iter().all(|s| s.item.id != 1));
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn test_rank_applies_threshold_and_limit() {
        let target = item(1, "A detective investigates a murder", &["Crime"]);
        let a = item(2, "A detective hunts a murderer", &["Crime"]);
        let b = item(3, "A detective story about murder", &["Crime"]);
        let c = item(4, "Completely unrelated gardening documentary", &[]);

        let pool = ScoringPool::build(&target, vec![a, b, c]);
        let ranked = pool.rank(1, 0.05, 1);

        assert_eq!(ranked.len(), 1);
        assert!(ranked[0].score > 0.05);
    }

    #[test]
    fn test_rank_sorted_descending() {
        let target = item(1, "A detective investigates a murder in the city", &["Crime"]);
        let close = item(2, "A detective investigates a murder downtown", &["Crime"]);
        let far = item(3, "A detective retires to the countryside", &[]);

        let pool = ScoringPool::build(&target, vec![far, close]);
        let ranked = pool.rank(1, 0.0, 10);

        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_rank_empty_candidates() {
        let target = item(1, "A detective investigates a murder", &["Crime"]);
        let pool = ScoringPool::build(&target, Vec::new());
        assert!(pool.rank(1, 0.01, 50).is_empty());
    }

    #[test]
    fn test_rank_empty_overviews_score_zero_and_drop() {
        let target = item(1, "A detective investigates a murder", &["Crime"]);
        let blank = item(2, "", &[]);

        let pool = ScoringPool::build(&target, vec![blank]);
        assert!(pool.rank(1, 0.01, 50).is_empty());
    }
}
