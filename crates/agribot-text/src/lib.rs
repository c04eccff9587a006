//! agribot-text
//!
//! Text side of matching: a tantivy-based word analyzer, a TF-IDF vector
//! space fitted per query, and the cosine best-match selector built on them.

pub mod analyzer;
pub mod matcher;
pub mod vectorizer;

pub use analyzer::{WordCharTokenizer, WordTokenizer};
pub use matcher::{match_answer, TfidfMatcher};
pub use vectorizer::{cosine, SparseVector, TfidfModel};
