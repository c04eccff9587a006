//! TF-IDF vector space over tokenized documents.
//!
//! - term frequency: raw counts
//! - smoothed idf: `ln((1 + n) / (1 + df)) + 1`
//! - every document vector is L2-normalized
//!
//! The model is cheap to build and is meant to be fitted per query over the
//! candidate questions plus the utterance.

use std::collections::BTreeMap;

/// Sparse vector as `(term index, weight)` pairs sorted by index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    pub fn entries(&self) -> &[(usize, f64)] { &self.entries }

    pub fn is_zero(&self) -> bool { self.entries.iter().all(|&(_, w)| w == 0.0) }

    pub fn norm(&self) -> f64 { self.entries.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt() }

    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j, mut acc) = (0usize, 0usize, 0.0f64);
        while i < self.entries.len() && j < other.entries.len() {
            let (ai, aw) = self.entries[i];
            let (bj, bw) = other.entries[j];
            match ai.cmp(&bj) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => { acc += aw * bw; i += 1; j += 1; }
            }
        }
        acc
    }

    fn normalized(mut self) -> Self {
        let norm = self.norm();
        if norm > 0.0 { for (_, w) in &mut self.entries { *w /= norm; } }
        self
    }
}

/// Cosine similarity, 0 when either vector is zero. Clamped to [0, 1] since
/// TF-IDF weights are never negative and rounding can overshoot 1.
pub fn cosine(a: &SparseVector, b: &SparseVector) -> f64 {
    let (na, nb) = (a.norm(), b.norm());
    if na == 0.0 || nb == 0.0 { return 0.0; }
    (a.dot(b) / (na * nb)).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Default)]
pub struct TfidfModel {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfModel {
    /// Fits vocabulary and idf weights. Terms are indexed in sorted order.
    pub fn fit<D: AsRef<[String]>>(docs: &[D]) -> Self {
        let mut df: BTreeMap<&str, usize> = BTreeMap::new();
        for doc in docs {
            let mut seen: Vec<&str> = doc.as_ref().iter().map(String::as_str).collect();
            seen.sort_unstable();
            seen.dedup();
            for term in seen { *df.entry(term).or_insert(0) += 1; }
        }
        let n = docs.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(df.len());
        for (index, (term, count)) in df.into_iter().enumerate() {
            vocabulary.insert(term.to_string(), index);
            idf.push(((1.0 + n) / (1.0 + count as f64)).ln() + 1.0);
        }
        Self { vocabulary, idf }
    }

    /// L2-normalized TF-IDF vector of a tokenized document. Terms outside the
    /// vocabulary are ignored.
    pub fn transform(&self, tokens: &[String]) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for t in tokens {
            if let Some(&index) = self.vocabulary.get(t) { *counts.entry(index).or_insert(0.0) += 1.0; }
        }
        let entries = counts.into_iter().map(|(index, tf)| (index, tf * self.idf[index])).collect();
        SparseVector { entries }.normalized()
    }

    pub fn idf(&self, term: &str) -> Option<f64> { self.vocabulary.get(term).map(|&i| self.idf[i]) }

    pub fn vocabulary_len(&self) -> usize { self.vocabulary.len() }

    pub fn is_empty(&self) -> bool { self.vocabulary.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(words: &[&str]) -> Vec<String> { words.iter().map(|w| w.to_string()).collect() }

    #[test]
    fn smoothed_idf() {
        let model = TfidfModel::fit(&[doc(&["mais", "riz"]), doc(&["mais"])]);
        assert_eq!(model.vocabulary_len(), 2);
        assert!((model.idf("mais").unwrap() - 1.0).abs() < 1e-12);
        assert!((model.idf("riz").unwrap() - ((3.0f64 / 2.0).ln() + 1.0)).abs() < 1e-12);
        assert_eq!(model.idf("mil"), None);
    }

    #[test]
    fn document_frequency_counts_each_doc_once() {
        let model = TfidfModel::fit(&[doc(&["eau", "eau", "eau"]), doc(&["sol"])]);
        assert!((model.idf("eau").unwrap() - model.idf("sol").unwrap()).abs() < 1e-12);
    }

    #[test]
    fn vectors_are_unit_length() {
        let model = TfidfModel::fit(&[doc(&["mais", "riz", "riz"]), doc(&["mil"])]);
        let v = model.transform(&doc(&["mais", "riz", "riz"]));
        assert!((v.norm() - 1.0).abs() < 1e-12);
        assert_eq!(v.entries().len(), 2);
        // same idf, riz counted twice
        assert!(v.entries()[1].1 > v.entries()[0].1);
    }

    #[test]
    fn unknown_terms_give_zero_vector() {
        let model = TfidfModel::fit(&[doc(&["mais"])]);
        let v = model.transform(&doc(&["sorgho"]));
        assert!(v.is_zero());
        assert_eq!(cosine(&v, &model.transform(&doc(&["mais"]))), 0.0);
    }

    #[test]
    fn cosine_bounds() {
        let model = TfidfModel::fit(&[doc(&["semer", "mil"]), doc(&["semer", "riz"]), doc(&["compost"])]);
        let a = model.transform(&doc(&["semer", "mil"]));
        let b = model.transform(&doc(&["semer", "riz"]));
        let c = model.transform(&doc(&["compost"]));
        assert!((cosine(&a, &a) - 1.0).abs() < 1e-12);
        let ab = cosine(&a, &b);
        assert!(ab > 0.0 && ab < 1.0);
        assert_eq!(cosine(&a, &c), 0.0);
    }

    #[test]
    fn empty_corpus_has_empty_vocabulary() {
        let docs: Vec<Vec<String>> = vec![vec![], vec![]];
        assert!(TfidfModel::fit(&docs).is_empty());
    }
}
