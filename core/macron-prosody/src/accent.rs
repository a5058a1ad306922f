//! Accent classification of a word by position and kind of its accent.

use crate::codec::strip;
use crate::letters::{swap_mark, Diacritics, COMBINING_ACUTE, COMBINING_GRAVE};
use crate::syllable::Word;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccentClass {
    /// Acute (or grave) on the ultima.
    Oxytone,
    /// Circumflex on the ultima.
    Perispomenon,
    /// Acute on the penult.
    Paroxytone,
    /// Circumflex on the penult.
    Properispomenon,
    /// Acute on the antepenult.
    Proparoxytone,
    Unaccented,
    /// An accent Greek accentuation does not allow where it stands.
    Irregular,
}

/// Classifies `word` (markup or plain) by its leftmost accent. A second
/// accent thrown back by an enclitic does not change the class.
pub fn accent_class(word: &str) -> AccentClass {
    let plain = strip(word);
    let parsed = Word::parse(&plain);
    let syllables = parsed.syllables();

    let accented = syllables.iter().enumerate().find_map(|(idx, s)| {
        parsed.units()[s.start..s.end]
            .iter()
            .filter_map(|u| u.letter)
            .find(|l| l.has(Diacritics::ACCENTS))
            .map(|l| (syllables.len() - idx, l.marks))
    });

    let Some((from_end, marks)) = accented else {
        return AccentClass::Unaccented;
    };
    let circumflex = marks.contains(Diacritics::CIRCUMFLEX);
    let acute = marks.contains(Diacritics::ACUTE);

    match from_end {
        1 if circumflex => AccentClass::Perispomenon,
        1 => AccentClass::Oxytone,
        2 if circumflex => AccentClass::Properispomenon,
        2 if acute => AccentClass::Paroxytone,
        3 if acute => AccentClass::Proparoxytone,
        _ => AccentClass::Irregular,
    }
}

/// An oxytone written with a grave because another word follows.
pub fn is_barytone(word: &str) -> bool {
    word.chars().any(crate::letters::has_grave)
}

/// Turns every grave into an acute.
pub fn oxytonize(word: &str) -> String {
    word.chars()
        .flat_map(|c| {
            if crate::letters::has_grave(c) {
                swap_mark(c, COMBINING_GRAVE, COMBINING_ACUTE).chars().collect::<Vec<_>>()
            } else {
                vec![c]
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classes() {
        assert_eq!(accent_class("λίθος"), AccentClass::Paroxytone);
        assert_eq!(accent_class("χώρα"), AccentClass::Paroxytone);
        assert_eq!(accent_class("θάλαττα"), AccentClass::Proparoxytone);
        assert_eq!(accent_class("σῶμα"), AccentClass::Properispomenon);
        assert_eq!(accent_class("ποταμός"), AccentClass::Oxytone);
        assert_eq!(accent_class("ποταμὸς"), AccentClass::Oxytone);
        assert_eq!(accent_class("θεοῦ"), AccentClass::Perispomenon);
        assert_eq!(accent_class("ἀνθρωπος"), AccentClass::Unaccented);
    }

    #[test]
    fn test_markers_do_not_change_class() {
        assert_eq!(accent_class("θά_λαττα^"), AccentClass::Proparoxytone);
    }

    #[test]
    fn test_enclitic_accent_ignored() {
        assert_eq!(accent_class("ἄνθρωπός"), AccentClass::Proparoxytone);
    }

    #[test]
    fn test_irregular() {
        // acute on the fourth syllable from the end
        assert_eq!(accent_class("ἄνθρωποισι"), AccentClass::Irregular);
    }

    #[test]
    fn test_oxytonize() {
        assert!(is_barytone("καλὰ"));
        assert!(!is_barytone("καλά"));
        assert_eq!(oxytonize("καλὰ"), "καλά");
        assert_eq!(oxytonize("κα^λὰ^"), "κα^λά^");
    }
}
