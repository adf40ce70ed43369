use std::collections::HashMap;

/// Term -> raw occurrence count within one document
pub type TfMap = HashMap<String, u32>;

/// Counts term occurrences in a token sequence
///
/// Empty input yields an empty map, which vectorizes to a zero vector
/// downstream rather than an error.
pub fn term_frequencies(tokens: &[String]) -> TfMap {
    let mut counts = TfMap::new();
    for token in tokens {
        *counts.entry(token.clone()).or_insert(0) += 1;
    }
    counts
}

/// Smoothed inverse-document-frequency weights for one request's corpus
///
/// Valid only for the corpus it was built from; the corpus changes with
/// every request, so tables are never reused or cached.
#[derive(Debug)]
pub struct IdfTable {
    weights: HashMap<String, f64>,
}

impl IdfTable {
    /// Builds the table from the document frequencies of the given corpus
    ///
    /// `idf(t) = ln((N + 1) / (df(t) + 1)) + 1`, the Laplace-smoothed form:
    /// a term present in every document weighs exactly 1 instead of
    /// collapsing toward 0, and nothing divides by zero.
    pub fn build(corpus: &[&TfMap]) -> Self {
        let mut doc_freq: HashMap<&str, u32> = HashMap::new();
        for doc in corpus {
            for term in doc.keys() {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let n = corpus.len() as f64;
        let weights = doc_freq
            .into_iter()
            .map(|(term, df)| (term.to_owned(), ((n + 1.0) / (df as f64 + 1.0)).ln() + 1.0))
            .collect();

        Self { weights }
    }

    /// Weight for a term, 0 for terms the corpus never saw
    pub fn weight(&self, term: &str) -> f64 {
        self.weights.get(term).copied().unwrap_or(0.0)
    }
}

/// A document's TF-IDF weights with the precomputed Euclidean norm
#[derive(Debug)]
pub struct WeightedVector {
    weights: HashMap<String, f64>,
    pub norm: f64,
}

impl WeightedVector {
    /// Combines raw counts with corpus IDF using sub-linear TF scaling
    ///
    /// `weight = (1 + ln(count)) * idf(term)`, so a term occurring 10x does
    /// not dominate 10x as much as one occurring once.
    pub fn from_tf(tf: &TfMap, idf: &IdfTable) -> Self {
        let mut weights = HashMap::with_capacity(tf.len());
        let mut norm_sq = 0.0;

        for (term, &count) in tf {
            let w = (1.0 + (count as f64).ln()) * idf.weight(term);
            norm_sq += w * w;
            weights.insert(term.clone(), w);
        }

        Self {
            weights,
            norm: norm_sq.sqrt(),
        }
    }

    /// Cosine similarity against another vector
    ///
    /// Returns 0 when either norm is 0 (empty or degenerate document); a
    /// missing comparison is "no similarity", never an error. Non-negative
    /// weights keep the result in [0, 1].
    pub fn cosine(&self, other: &WeightedVector) -> f64 {
        if self.norm == 0.0 || other.norm == 0.0 {
            return 0.0;
        }

        // Iterate the smaller map; only overlapping terms contribute
        let (small, large) = if self.weights.len() <= other.weights.len() {
            (&self.weights, &other.weights)
        } else {
            (&other.weights, &self.weights)
        };

        let dot: f64 = small
            .iter()
            .filter_map(|(term, w)| large.get(term).map(|w2| w * w2))
            .sum();

        dot / (self.norm * other.norm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::similarity::text::tokenize;

    fn tf_of(text: &str) -> TfMap {
        term_frequencies(&tokenize(text))
    }

    #[test]
    fn test_term_frequencies_counts() {
        let tf = tf_of("murder murder detective");
        assert_eq!(tf.get("murder"), Some(&2));
        assert_eq!(tf.get("detective"), Some(&1));
        assert_eq!(tf.len(), 2);
    }

    #[test]
    fn test_term_frequencies_empty() {
        assert!(term_frequencies(&[]).is_empty());
    }

    #[test]
    fn test_idf_ubiquitous_term_is_exactly_one() {
        let a = tf_of("shark attack");
        let b = tf_of("shark week");
        let c = tf_of("shark tale");
        let idf = IdfTable::build(&[&a, &b, &c]);

        // df = N = 3, so ln((3+1)/(3+1)) + 1 = 1
        assert_eq!(idf.weight("shark"), 1.0);
    }

    #[test]
    fn test_idf_rare_term_weighs_more() {
        let a = tf_of("shark attack ocean");
        let b = tf_of("shark week ocean");
        let c = tf_of("shark submarine");
        let idf = IdfTable::build(&[&a, &b, &c]);

        assert!(idf.weight("submarine") > idf.weight("ocean"));
        assert!(idf.weight("ocean") > idf.weight("shark"));
    }

    #[test]
    fn test_idf_unknown_term_is_zero() {
        let a = tf_of("shark attack");
        let idf = IdfTable::build(&[&a]);
        assert_eq!(idf.weight("zebra"), 0.0);
    }

    #[test]
    fn test_vector_norm_positive_for_nonempty() {
        let tf = tf_of("detective murder city");
        let idf = IdfTable::build(&[&tf]);
        let vec = WeightedVector::from_tf(&tf, &idf);
        assert!(vec.norm > 0.0);
    }

    #[test]
    fn test_vector_norm_zero_for_empty() {
        let tf = TfMap::new();
        let idf = IdfTable::build(&[&tf]);
        let vec = WeightedVector::from_tf(&tf, &idf);
        assert_eq!(vec.norm, 0.0);
    }

    #[test]
    fn test_cosine_self_similarity_is_one() {
        let tf = tf_of("detective investigates murder rainy city detective");
        let other = tf_of("unrelated words entirely");
        let idf = IdfTable::build(&[&tf, &other]);
        let vec = WeightedVector::from_tf(&tf, &idf);

        let score = vec.cosine(&vec);
        assert!((score - 1.0).abs() < 1e-10, "self cosine was {}", score);
    }

    #[test]
    fn test_cosine_symmetry() {
        let a_tf = tf_of("detective investigates murder rainy city");
        let b_tf = tf_of("cop solves killing downtown city");
        let idf = IdfTable::build(&[&a_tf, &b_tf]);
        let a = WeightedVector::from_tf(&a_tf, &idf);
        let b = WeightedVector::from_tf(&b_tf, &idf);

        assert_eq!(a.cosine(&b), b.cosine(&a));
    }

    #[test]
    fn test_cosine_empty_document_is_zero() {
        let a_tf = tf_of("detective investigates murder");
        let empty = TfMap::new();
        let idf = IdfTable::build(&[&a_tf, &empty]);
        let a = WeightedVector::from_tf(&a_tf, &idf);
        let zero = WeightedVector::from_tf(&empty, &idf);

        assert_eq!(a.cosine(&zero), 0.0);
        assert_eq!(zero.cosine(&a), 0.0);
        assert_eq!(zero.cosine(&zero), 0.0);
    }

    #[test]
    fn test_cosine_disjoint_documents_is_zero() {
        let a_tf = tf_of("detective murder");
        let b_tf = tf_of("romantic comedy");
        let idf = IdfTable::build(&[&a_tf, &b_tf]);
        let a = WeightedVector::from_tf(&a_tf, &idf);
        let b = WeightedVector::from_tf(&b_tf, &idf);

        assert_eq!(a.cosine(&b), 0.0);
    }

    #[test]
    fn test_cosine_in_unit_interval() {
        let a_tf = tf_of("detective investigates murder rainy city crime drama");
        let b_tf = tf_of("cop solves killing downtown crime drama");
        let idf = IdfTable::build(&[&a_tf, &b_tf]);
        let a = WeightedVector::from_tf(&a_tf, &idf);
        let b = WeightedVector::from_tf(&b_tf, &idf);

        let score = a.cosine(&b);
        assert!(score > 0.0);
        assert!(score <= 1.0);
    }
}
