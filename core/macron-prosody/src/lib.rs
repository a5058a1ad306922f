//! Vowel-quantity prosody for polytonic Greek.
//!
//! Words travel through the engine in *markup*: ordinary NFC text where a
//! `_` after a vowel marks it long and a `^` marks it short. This crate owns
//! that format (codec, merge), the syllable and accent analysis built on it,
//! and the quantities the accent alone decides.

pub mod accent;
pub mod codec;
pub mod letters;
pub mod merge;
pub mod rules;
pub mod syllable;

pub use accent::{accent_class, is_barytone, oxytonize, AccentClass};
pub use codec::{
    has_markers, integrate_positional, normalize, parse_positional, strip, to_markup, to_unicode,
    transplant_markers,
};
pub use letters::{has_acute, has_grave, is_word_char, Quantity, LONG, SHORT};
pub use merge::{merge, project_quantities, transfer_quantities};
pub use rules::{apply_accent_rules, apply_accent_rules_with};
pub use syllable::{count_open_dichrona, marks_diphthong, Word};

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MarkupError {
    #[error("markup {newer:?} does not spell the same word as {older:?}")]
    Perverted { newer: String, older: String },

    #[error("cannot carry quantities from {origin:?} onto {target:?}")]
    ShapeMismatch { target: String, origin: String },

    #[error("invalid positional notation {0:?}")]
    Notation(String),

    #[error("position {position} is outside {word:?}")]
    PositionOutOfRange { word: String, position: usize },
}
