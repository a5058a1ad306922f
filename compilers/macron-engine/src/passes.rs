//! Retry passes: transformed variants of a token that are resolved on their
//! own and whose quantities are carried back onto the original form.

use bitflags::bitflags;
use macron_prosody::letters::{capitalize, decapitalize, starts_upper};
use macron_prosody::{is_barytone, marks_diphthong, oxytonize, project_quantities, transfer_quantities, MarkupError};
use macron_protocol::{MorphFlags, PartOfSpeech, Token};

use crate::endings::citation_reference;

bitflags! {
    /// Transformations already applied on the way to the current call.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct PassFlags: u8 {
        const OXYTONIZED = 1;
        const CAPITALIZED = 1 << 1;
        const DECAPITALIZED = 1 << 2;
        const IS_LEMMA = 1 << 3;
        const DIFFERENT_ENDING = 1 << 4;

        const CASE_CHANGED = Self::CAPITALIZED.bits() | Self::DECAPITALIZED.bits();
    }
}

/// The pass a call was entered through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pass {
    Base,
    Oxytonized,
    Capitalized,
    Decapitalized,
    DifferentEnding,
    Lemma,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassState {
    pub flags: PassFlags,
    pub entered: Pass,
    pub depth: u32,
}

impl PassState {
    pub fn base() -> Self {
        Self {
            flags: PassFlags::empty(),
            entered: Pass::Base,
            depth: 0,
        }
    }

    /// The state of a call entered through `pass`.
    pub fn enter(self, pass: Pass, flag: PassFlags) -> Self {
        Self {
            flags: self.flags | flag,
            entered: pass,
            depth: self.depth + 1,
        }
    }
}

impl Default for PassState {
    fn default() -> Self {
        Self::base()
    }
}

pub trait RetryPass: Send + Sync {
    fn name(&self) -> &'static str;

    fn pass(&self) -> Pass;

    /// Flag recorded on the state of the recursive call.
    fn flag(&self) -> PassFlags;

    /// The token to resolve instead, or `None` when the pass does not apply
    /// in `state`.
    fn variant(&self, token: &Token, state: &PassState) -> Option<Token>;

    /// Carries the variant's resolution back onto `token`'s form.
    fn map_back(&self, token: &Token, resolved: &str) -> Result<String, MarkupError>;
}

/// Resolves a declined nominal through its citation form, keeping the
/// stem's quantities and the ending vowel's only where the paradigm
/// guarantees it.
pub struct DifferentEnding;

impl RetryPass for DifferentEnding {
    fn name(&self) -> &'static str {
        "different-ending"
    }

    fn pass(&self) -> Pass {
        Pass::DifferentEnding
    }

    fn flag(&self) -> PassFlags {
        PassFlags::DIFFERENT_ENDING
    }

    fn variant(&self, token: &Token, state: &PassState) -> Option<Token> {
        if state.flags.intersects(PassFlags::DIFFERENT_ENDING | PassFlags::IS_LEMMA) {
            return None;
        }
        let reference = citation_reference(token)?;
        let mut variant = token.with_form(reference.form);
        variant.features = (token.features - MorphFlags::CASES - MorphFlags::NUMBERS)
            | MorphFlags::NOMINATIVE
            | MorphFlags::SINGULAR;
        Some(variant)
    }

    fn map_back(&self, token: &Token, resolved: &str) -> Result<String, MarkupError> {
        let shape_mismatch = || MarkupError::ShapeMismatch {
            target: token.form.clone(),
            origin: resolved.to_string(),
        };
        let reference = citation_reference(token).ok_or_else(shape_mismatch)?;
        let mapped = project_quantities(&token.form, resolved, |i| reference.letter_map(i))?;
        // a stem vowel can meet the new ending in a diphthong
        if marks_diphthong(&mapped) {
            return Err(shape_mismatch());
        }
        Ok(mapped)
    }
}

/// Looks a grave-accented word up under its acute.
pub struct Oxytonize;

impl RetryPass for Oxytonize {
    fn name(&self) -> &'static str {
        "oxytonize"
    }

    fn pass(&self) -> Pass {
        Pass::Oxytonized
    }

    fn flag(&self) -> PassFlags {
        PassFlags::OXYTONIZED
    }

    fn variant(&self, token: &Token, state: &PassState) -> Option<Token> {
        if state.flags.contains(PassFlags::OXYTONIZED) || !is_barytone(&token.form) {
            return None;
        }
        Some(token.with_form(oxytonize(&token.form)))
    }

    fn map_back(&self, token: &Token, resolved: &str) -> Result<String, MarkupError> {
        transfer_quantities(&token.form, resolved)
    }
}

/// Sentence-initial capitals: retry lower-cased.
pub struct Decapitalize;

impl RetryPass for Decapitalize {
    fn name(&self) -> &'static str {
        "decapitalize"
    }

    fn pass(&self) -> Pass {
        Pass::Decapitalized
    }

    fn flag(&self) -> PassFlags {
        PassFlags::DECAPITALIZED
    }

    fn variant(&self, token: &Token, state: &PassState) -> Option<Token> {
        if state.flags.intersects(PassFlags::CASE_CHANGED) || !starts_upper(&token.form) {
            return None;
        }
        Some(token.with_form(decapitalize(&token.form)))
    }

    fn map_back(&self, token: &Token, resolved: &str) -> Result<String, MarkupError> {
        transfer_quantities(&token.form, resolved)
    }
}

/// Proper nouns written lower-case: retry capitalized.
pub struct Capitalize;

impl RetryPass for Capitalize {
    fn name(&self) -> &'static str {
        "capitalize"
    }

    fn pass(&self) -> Pass {
        Pass::Capitalized
    }

    fn flag(&self) -> PassFlags {
        PassFlags::CAPITALIZED
    }

    fn variant(&self, token: &Token, state: &PassState) -> Option<Token> {
        if state.flags.intersects(PassFlags::CASE_CHANGED)
            || token.pos != PartOfSpeech::ProperNoun
            || starts_upper(&token.form)
        {
            return None;
        }
        Some(token.with_form(capitalize(&token.form)))
    }

    fn map_back(&self, token: &Token, resolved: &str) -> Result<String, MarkupError> {
        transfer_quantities(&token.form, resolved)
    }
}

/// Extension point for resolving a token through its lemma. Applies to
/// nothing until a generalisation from lemma to form is plugged in.
pub struct Lemma;

impl RetryPass for Lemma {
    fn name(&self) -> &'static str {
        "lemma"
    }

    fn pass(&self) -> Pass {
        Pass::Lemma
    }

    fn flag(&self) -> PassFlags {
        PassFlags::IS_LEMMA
    }

    fn variant(&self, _token: &Token, _state: &PassState) -> Option<Token> {
        None
    }

    fn map_back(&self, token: &Token, resolved: &str) -> Result<String, MarkupError> {
        transfer_quantities(&token.form, resolved)
    }
}

/// Different ending, oxytonize, decapitalize, capitalize, lemma.
pub fn default_passes() -> Vec<Box<dyn RetryPass>> {
    vec![
        Box::new(DifferentEnding),
        Box::new(Oxytonize),
        Box::new(Decapitalize),
        Box::new(Capitalize),
        Box::new(Lemma),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(form: &str, pos: PartOfSpeech) -> Token {
        Token::new(form, form, pos, MorphFlags::empty())
    }

    #[test]
    fn test_state_enter() {
        let state = PassState::base().enter(Pass::Oxytonized, PassFlags::OXYTONIZED);
        assert_eq!(state.depth, 1);
        assert_eq!(state.entered, Pass::Oxytonized);
        let state = state.enter(Pass::Decapitalized, PassFlags::DECAPITALIZED);
        assert!(state.flags.contains(PassFlags::OXYTONIZED | PassFlags::DECAPITALIZED));
        assert_eq!(state.depth, 2);
    }

    #[test]
    fn test_oxytonize_variant_and_back() {
        let word = token("καλὰ", PartOfSpeech::Adjective);
        let variant = Oxytonize.variant(&word, &PassState::base()).unwrap();
        assert_eq!(variant.form, "καλά");
        assert_eq!(Oxytonize.map_back(&word, "κα^λά^").unwrap(), "κα^λὰ^");

        let entered = PassState::base().enter(Pass::Oxytonized, PassFlags::OXYTONIZED);
        assert!(Oxytonize.variant(&variant, &entered).is_none());
    }

    #[test]
    fn test_case_passes_exclusive() {
        let proper = token("ἀθῆναι", PartOfSpeech::ProperNoun);
        let state = PassState::base();
        assert_eq!(Capitalize.variant(&proper, &state).unwrap().form, "Ἀθῆναι");
        assert!(Decapitalize.variant(&proper, &state).is_none());

        let capital = token("Ἀθῆναι", PartOfSpeech::ProperNoun);
        let lowered = Decapitalize.variant(&capital, &state).unwrap();
        let entered = state.enter(Pass::Decapitalized, PassFlags::DECAPITALIZED);
        assert!(Capitalize.variant(&lowered, &entered).is_none());
    }

    #[test]
    fn test_different_ending_round_trip() {
        let mut word = token("νεανίαν", PartOfSpeech::Noun);
        word.lemma = "νεανίας".into();
        word.features = MorphFlags::ACCUSATIVE | MorphFlags::SINGULAR | MorphFlags::MASCULINE;

        let variant = DifferentEnding.variant(&word, &PassState::base()).unwrap();
        assert_eq!(variant.form, "νεανίας");
        assert!(variant.features.contains(MorphFlags::NOMINATIVE | MorphFlags::SINGULAR | MorphFlags::MASCULINE));
        assert!(!variant.features.contains(MorphFlags::ACCUSATIVE));

        assert_eq!(DifferentEnding.map_back(&word, "νεα_νί^α_ς").unwrap(), "νεα_νί^α_ν");
    }

    #[test]
    fn test_different_ending_drops_unshared_vowel() {
        let mut word = token("χώρας", PartOfSpeech::Noun);
        word.lemma = "χώρα".into();
        assert_eq!(DifferentEnding.map_back(&word, "χώρα_").unwrap(), "χώρας");

        // the subscript spelling has the lemma's letters: nothing to retry
        word.form = "χώρᾳ".into();
        assert!(DifferentEnding.variant(&word, &PassState::base()).is_none());
    }

    #[test]
    fn test_lemma_pass_is_inert() {
        assert!(Lemma.variant(&token("λόγος", PartOfSpeech::Noun), &PassState::base()).is_none());
    }
}
