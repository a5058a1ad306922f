use rkyv::{Archive, Deserialize, Serialize};
use crate::ids::{SentenceId, TokenId};
use crate::morphology::{MorphFlags, PartOfSpeech};
use alloc::string::String;
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// Sentence-level facts a token cannot see on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub struct ClauseContext {
    /// The sentence contains a verb in the subjunctive.
    pub has_subjunctive: bool,
    /// The sentence contains the conditional particle εἰ.
    pub has_conditional: bool,
}

/// One tagged word of a document.
///
/// `form` is the orthographic surface form exactly as it occurs in the
/// text and never carries quantity markers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub struct Token {
    pub id: TokenId,
    pub sentence: SentenceId,
    pub form: String,
    pub lemma: String,
    pub pos: PartOfSpeech,
    pub features: MorphFlags,
    pub clause: ClauseContext,
}

impl Token {
    pub fn new(form: impl Into<String>, lemma: impl Into<String>, pos: PartOfSpeech, features: MorphFlags) -> Self {
        Self {
            id: TokenId::default(),
            sentence: SentenceId::default(),
            form: form.into(),
            lemma: lemma.into(),
            pos,
            features,
            clause: ClauseContext::default(),
        }
    }

    /// The same token with another surface form. Used by the retry passes,
    /// which never mutate the token they were given.
    pub fn with_form(&self, form: impl Into<String>) -> Self {
        Self {
            form: form.into(),
            ..self.clone()
        }
    }
}

/// A lexical-store entry: the marker-free lookup key and every markup
/// candidate the source knows for it, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct LexEntry {
    pub key: String,
    pub candidates: Vec<String>,
}

/// Compiled form of a quantity lexicon, written by `lexicon-compiler`.
#[derive(Debug, Clone, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct LexiconArchive {
    pub version: u32,
    pub name: String,
    pub entries: Vec<LexEntry>,
}

impl LexiconArchive {
    pub const VERSION: u32 = 1;
}
