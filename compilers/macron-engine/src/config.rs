// Run configuration for the macronizer.
//
// Everything a caller may tune about a run lives in `MacronizerConfig`,
// loaded from JSON. Every field has a default, so `{}` is a valid config
// and a partial file only overrides what it names.
//
// See also: `lib.rs` where `Macronizer` reads the config, `screening.rs`
// for the stop words and the open-dichrona gate, `orchestrator.rs` for the
// ambiguity policy.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::evidence::AmbiguityPolicy;

/// How the annotated text is written out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// `_` and `^` after the vowel.
    #[default]
    Markup,
    /// Combining macron U+0304 and breve U+0306.
    Unicode,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacronizerConfig {
    pub ambiguity_policy: AmbiguityPolicy,
    pub output: OutputFormat,
    /// Forms that are never annotated, compared without markers.
    pub stop_words: Vec<String>,
    /// Skip tokens that have no dichronon in an open syllable (ἄν excepted).
    pub skip_without_dichrona: bool,
    /// Resolve chunks on the rayon pool.
    pub parallel: bool,
    /// Sentences per chunk.
    pub chunk_sentences: usize,
    /// Remove editorial brackets, daggers and hyphens before tagging.
    pub clean_editorial_signs: bool,
}

impl Default for MacronizerConfig {
    fn default() -> Self {
        Self {
            ambiguity_policy: AmbiguityPolicy::default(),
            output: OutputFormat::default(),
            stop_words: Vec::new(),
            skip_without_dichrona: true,
            parallel: true,
            chunk_sentences: 64,
            clean_editorial_signs: false,
        }
    }
}

impl MacronizerConfig {
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(MacronizerConfig::from_json("{}").unwrap(), MacronizerConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = MacronizerConfig::from_json(
            r#"{"ambiguity_policy": "propagate", "output": "unicode", "stop_words": ["καί"]}"#,
        )
        .unwrap();
        assert_eq!(config.ambiguity_policy, AmbiguityPolicy::Propagate);
        assert_eq!(config.output, OutputFormat::Unicode);
        assert_eq!(config.stop_words, ["καί"]);
        assert!(config.parallel);
        assert_eq!(config.chunk_sentences, 64);
    }

    #[test]
    fn test_roundtrip_and_errors() {
        let config = MacronizerConfig {
            parallel: false,
            ..Default::default()
        };
        let json = config.to_json().unwrap();
        assert_eq!(MacronizerConfig::from_json(&json).unwrap(), config);

        let err = MacronizerConfig::from_json(r#"{"output": "html"}"#).unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }
}
