//! Text analysis used while processing field terms
//!
//! The parser only depends on the [`Analyzer`] trait. [`TokenizerAnalyzer`]
//! is the bundled implementation.

mod tokenizer;

pub use tokenizer::TokenizerAnalyzer;

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Splits the text of a field term into index terms
pub trait Analyzer: Send + Sync + Debug {
    /// Analyze `text` as it would be indexed in `field`
    fn analyze(&self, field: &str, text: &str) -> Vec<String>;
}

/// Tokenizer configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerConfig {
    pub lowercase: bool,
    pub remove_stopwords: bool,
    pub stem: bool,
    pub min_token_length: usize,
    pub max_token_length: usize,
    pub language: String,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            remove_stopwords: true,
            stem: true,
            min_token_length: 2,
            max_token_length: 50,
            language: "english".to_string(),
        }
    }
}

/// Analyzer that keeps the text as a single term
#[derive(Clone, Copy, Debug, Default)]
pub struct KeywordAnalyzer;

impl Analyzer for KeywordAnalyzer {
    fn analyze(&self, _field: &str, text: &str) -> Vec<String> {
        if text.is_empty() {
            Vec::new()
        } else {
            vec![text.to_string()]
        }
    }
}
