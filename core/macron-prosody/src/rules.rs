//! Quantities that follow from the accent alone.
//!
//! * A paroxytone whose ultima is short by rule has a short penult: had the
//!   penult been long under a short ultima it would carry a circumflex.
//! * A paroxytone whose penult is long and accented has a long ultima, for
//!   the same reason.
//! * A properispomenon or proparoxytone has a short ultima.
//!
//! Only open, still ambiguous dichrona receive a marker.

use crate::accent::{accent_class, AccentClass};
use crate::letters::{Diacritics, Quantity};
use crate::merge::merge;
use crate::syllable::Word;
use crate::MarkupError;

fn ultima_short_by_rule(word: &Word<'_>, ultima: usize, final_diphthongs_short: bool) -> bool {
    let syllable = word.syllables()[ultima];
    match word.nucleus(ultima) {
        [unit] => unit.letter.is_some_and(|l| {
            l.is_short_vowel() || (l.is_dichronon() && unit.quantity == Some(Quantity::Short))
        }),
        // final -αι and -οι count short for the accent
        [first, second] => {
            let word_final = syllable.nucleus.is_some_and(|(_, end)| end == syllable.end);
            final_diphthongs_short
                && word_final
                && first.letter.is_some_and(|l| matches!(l.base, 'α' | 'ο'))
                && second.letter.is_some_and(|l| l.base == 'ι')
        }
        _ => false,
    }
}

fn penult_long_accented(word: &Word<'_>, penult: usize) -> bool {
    let nucleus = word.nucleus(penult);
    let acute = nucleus
        .iter()
        .filter_map(|u| u.letter)
        .any(|l| l.has(Diacritics::ACUTE));
    if !acute {
        return false;
    }
    match nucleus {
        [unit] => unit.letter.is_some_and(|l| {
            l.is_long_vowel()
                || l.has(Diacritics::IOTA_SUBSCRIPT)
                || l.unicode_quantity() == Some(Quantity::Long)
                || unit.quantity == Some(Quantity::Long)
        }),
        [_, _] => true,
        _ => false,
    }
}

/// Adds the quantities the accent rules force on `markup` and merges them
/// over the input, which keeps every marker already present.
pub fn apply_accent_rules(markup: &str) -> Result<String, MarkupError> {
    apply_accent_rules_with(markup, true)
}

/// [`apply_accent_rules`] with the final `-αι`/`-οι` clause switchable:
/// optative endings in `-αι`/`-οι` are long for the accent.
pub fn apply_accent_rules_with(markup: &str, final_diphthongs_short: bool) -> Result<String, MarkupError> {
    let word = Word::parse(markup);
    let count = word.syllables().len();
    let Some(ultima) = count.checked_sub(1) else {
        return Ok(markup.to_string());
    };

    let class = accent_class(markup);
    let mut forced = Vec::new();

    match class {
        AccentClass::Paroxytone if count >= 2 => {
            let penult = count - 2;
            if ultima_short_by_rule(&word, ultima, final_diphthongs_short) {
                forced.push((penult, Quantity::Short));
            }
            if penult_long_accented(&word, penult) {
                forced.push((ultima, Quantity::Long));
            }
        }
        AccentClass::Properispomenon | AccentClass::Proparoxytone => {
            forced.push((ultima, Quantity::Short));
        }
        _ => {}
    }

    forced.retain(|&(idx, _)| word.is_open_dichronon(idx));
    if forced.is_empty() {
        return Ok(markup.to_string());
    }
    merge(&word.render_with(&forced), markup)
}
