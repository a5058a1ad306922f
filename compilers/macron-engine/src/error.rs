use std::path::PathBuf;

use macron_prosody::MarkupError;
use thiserror::Error;

/// Failures of a lexical store. The resolution path never propagates these:
/// a failing store counts as "no evidence".
#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("cannot read lexicon {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{name}:{line}: {reason}")]
    Malformed {
        name: String,
        line: usize,
        reason: String,
    },

    #[error("lexicon archive {0} failed validation")]
    InvalidArchive(String),

    #[error("lexicon archive {name} has version {found}, expected {expected}")]
    Version {
        name: String,
        found: u32,
        expected: u32,
    },

    #[error("lexicon store {0} is unavailable")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum EngineError {
    /// A pass chain nested too deep for one token. Recorded in the
    /// diagnostics; the token stays unmarked and the run goes on.
    #[error("gave up on {token:?} at recursion depth {depth}")]
    DepthExceeded { token: String, depth: u32 },

    #[error("{module} changed the letters of {token:?}")]
    PervertedToken {
        module: &'static str,
        token: String,
        #[source]
        source: MarkupError,
    },

    #[error("{module} put a quantity marker on a diphthong in {token:?}: {markup:?}")]
    MacronizedDiphthong {
        module: &'static str,
        token: String,
        markup: String,
    },

    #[error("could not find occurrence {occurrence} of {form:?} in the text")]
    OccurrenceNotFound { form: String, occurrence: usize },

    #[error("integration changed the text beyond its markers at offset {offset}")]
    Corrupted { offset: usize },

    #[error("CoNLL-U line {line}: {reason}")]
    Conllu { line: usize, reason: String },

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Markup(#[from] MarkupError),

    #[error(transparent)]
    Lexicon(#[from] LexiconError),
}

impl EngineError {
    /// Whether the error ends the whole run rather than one token.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, EngineError::DepthExceeded { .. })
    }
}
