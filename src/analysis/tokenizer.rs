use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use std::fmt;
use stop_words::{get, LANGUAGE};
use unicode_segmentation::UnicodeSegmentation;

use super::{Analyzer, TokenizerConfig};

/// Analyzer splitting text on unicode word boundaries with optional
/// lowercasing, stopword removal and stemming
pub struct TokenizerAnalyzer {
    config: TokenizerConfig,
    stemmer: Option<Stemmer>,
    stopwords: HashSet<String>,
}

impl TokenizerAnalyzer {
    /// Create a new analyzer from configuration
    ///
    /// Unknown languages disable stemming and stopword removal.
    pub fn new(config: &TokenizerConfig) -> Self {
        let (stemmer, stopwords) = match language_support(&config.language) {
            Some((algorithm, stop_language)) => {
                let stemmer = config.stem.then(|| Stemmer::create(algorithm));
                let stopwords = if config.remove_stopwords {
                    get(stop_language)
                        .into_iter()
                        .map(|s| s.to_lowercase())
                        .collect()
                } else {
                    HashSet::new()
                };
                (stemmer, stopwords)
            }
            None => (None, HashSet::new()),
        };

        Self {
            config: config.clone(),
            stemmer,
            stopwords,
        }
    }

    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    /// Tokenize text into a vector of terms
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.unicode_words()
            .map(|word| {
                if self.config.lowercase {
                    word.to_lowercase()
                } else {
                    word.to_string()
                }
            })
            .filter(|token| {
                let len = token.chars().count();
                len >= self.config.min_token_length
                    && len <= self.config.max_token_length
                    && !self.stopwords.contains(token)
            })
            .map(|token| match &self.stemmer {
                Some(stemmer) => stemmer.stem(&token).to_string(),
                None => token,
            })
            .collect()
    }
}

impl Analyzer for TokenizerAnalyzer {
    fn analyze(&self, _field: &str, text: &str) -> Vec<String> {
        self.tokenize(text)
    }
}

impl Default for TokenizerAnalyzer {
    fn default() -> Self {
        Self::new(&TokenizerConfig::default())
    }
}

impl fmt::Debug for TokenizerAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenizerAnalyzer")
            .field("config", &self.config)
            .field("stemming", &self.stemmer.is_some())
            .field("stopwords", &self.stopwords.len())
            .finish()
    }
}

fn language_support(language: &str) -> Option<(Algorithm, LANGUAGE)> {
    match language.to_lowercase().as_str() {
        "english" | "en" => Some((Algorithm::English, LANGUAGE::English)),
        "french" | "fr" => Some((Algorithm::French, LANGUAGE::French)),
        "german" | "de" => Some((Algorithm::German, LANGUAGE::German)),
        "spanish" | "es" => Some((Algorithm::Spanish, LANGUAGE::Spanish)),
        "italian" | "it" => Some((Algorithm::Italian, LANGUAGE::Italian)),
        "portuguese" | "pt" => Some((Algorithm::Portuguese, LANGUAGE::Portuguese)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_config() -> TokenizerConfig {
        TokenizerConfig {
            lowercase: true,
            remove_stopwords: false,
            stem: false,
            min_token_length: 1,
            max_token_length: 50,
            language: "english".to_string(),
        }
    }

    #[test]
    fn test_basic_tokenization() {
        let analyzer = TokenizerAnalyzer::new(&plain_config());
        let tokens = analyzer.analyze("body", "Hello World-Wide");
        assert_eq!(tokens, vec!["hello", "world", "wide"]);
    }

    #[test]
    fn test_stopword_removal() {
        let config = TokenizerConfig {
            remove_stopwords: true,
            ..plain_config()
        };
        let analyzer = TokenizerAnalyzer::new(&config);
        let tokens = analyzer.tokenize("the system");

        assert!(!tokens.contains(&"the".to_string()));
        assert!(tokens.contains(&"system".to_string()));
    }

    #[test]
    fn test_stemming() {
        let config = TokenizerConfig {
            stem: true,
            ..plain_config()
        };
        let analyzer = TokenizerAnalyzer::new(&config);
        let tokens = analyzer.tokenize("running runs");

        assert!(tokens.iter().all(|t| t.starts_with("run")));
    }

    #[test]
    fn test_min_max_token_length() {
        let config = TokenizerConfig {
            min_token_length: 3,
            max_token_length: 5,
            ..plain_config()
        };
        let analyzer = TokenizerAnalyzer::new(&config);
        let tokens = analyzer.tokenize("a ab abc abcdef");

        assert_eq!(tokens, vec!["abc"]);
    }

    #[test]
    fn test_unknown_language_disables_stemming() {
        let config = TokenizerConfig {
            stem: true,
            remove_stopwords: true,
            language: "klingon".to_string(),
            ..plain_config()
        };
        let analyzer = TokenizerAnalyzer::new(&config);
        assert_eq!(analyzer.tokenize("the running"), vec!["the", "running"]);
    }

    #[test]
    fn test_case_preserved_without_lowercase() {
        let config = TokenizerConfig {
            lowercase: false,
            ..plain_config()
        };
        let analyzer = TokenizerAnalyzer::new(&config);
        assert_eq!(analyzer.tokenize("Rust"), vec!["Rust"]);
    }
}
