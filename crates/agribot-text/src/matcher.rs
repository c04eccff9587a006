use tracing::debug;

use agribot_core::traits::Matcher;
use agribot_core::types::{Candidates, MatchResult};

use crate::analyzer::WordTokenizer;
use crate::vectorizer::{cosine, TfidfModel};

/// Best-match selection over a TF-IDF space re-fitted for every query.
///
/// The vocabulary covers the candidate questions and the utterance itself, so
/// the same utterance may score differently against different candidate sets.
/// Within one call the result depends only on the inputs.
#[derive(Clone, Default)]
pub struct TfidfMatcher {
    tokenizer: WordTokenizer,
}

impl TfidfMatcher {
    pub fn new() -> Self { Self::default() }

    /// Cosine similarity of `utterance` against each question, index-aligned.
    ///
    /// An utterance with no tokens scores 0 everywhere.
    pub fn similarities(&self, questions: &[String], utterance: &str) -> Vec<f64> {
        let query = self.tokenizer.tokenize(utterance);
        if query.is_empty() { return vec![0.0; questions.len()]; }

        let mut docs: Vec<Vec<String>> = questions.iter().map(|q| self.tokenizer.tokenize(q)).collect();
        docs.push(query);
        let model = TfidfModel::fit(&docs);
        let Some((query, questions)) = docs.split_last() else { return Vec::new(); };
        let query_vec = model.transform(query);
        questions.iter().map(|q| cosine(&query_vec, &model.transform(q))).collect()
    }
}

impl Matcher for TfidfMatcher {
    fn best_match(&self, candidates: &Candidates, utterance: &str, threshold: f64) -> MatchResult {
        if candidates.is_empty() { return MatchResult::NoCandidates; }
        let scores = self.similarities(candidates.questions(), utterance);
        let Some((index, score)) = argmax(&scores) else { return MatchResult::BelowThreshold { best_score: 0.0 }; };
        debug!(candidates = candidates.len(), index, score, threshold, "Scored utterance");
        match candidates.answer(index) {
            Some(answer) if score > threshold => MatchResult::Matched { index, score, answer: answer.to_string() },
            _ => MatchResult::BelowThreshold { best_score: score },
        }
    }
}

/// Slice-based entry point: `questions[i]` pairs with `answers[i]`; extra
/// elements of the longer slice are ignored.
pub fn match_answer(questions: &[String], answers: &[String], utterance: &str, threshold: f64) -> MatchResult {
    let candidates: Candidates = questions.iter().zip(answers).map(|(q, a)| (q.as_str(), a.as_str())).collect();
    TfidfMatcher::new().best_match(&candidates, utterance, threshold)
}

/// Index of the highest score; the earliest index wins ties.
fn argmax(scores: &[f64]) -> Option<(usize, f64)> {
    scores.iter().copied().enumerate().fold(None, |best, (i, s)| match best {
        Some((_, b)) if s <= b => best,
        _ => Some((i, s)),
    })
}
