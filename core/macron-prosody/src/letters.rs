//! Character-level classification of polytonic Greek letters.
//!
//! Every predicate looks through the precomposed code point at its NFD
//! decomposition, so `ἄ`, `ά` and `α` + U+0301 classify identically.

use bitflags::bitflags;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Marker for a long vowel in the markup format.
pub const LONG: char = '_';
/// Marker for a short vowel in the markup format.
pub const SHORT: char = '^';

pub const COMBINING_GRAVE: char = '\u{0300}';
pub const COMBINING_ACUTE: char = '\u{0301}';
pub const COMBINING_MACRON: char = '\u{0304}';
pub const COMBINING_BREVE: char = '\u{0306}';
pub const COMBINING_DIAERESIS: char = '\u{0308}';
pub const COMBINING_SMOOTH: char = '\u{0313}';
pub const COMBINING_ROUGH: char = '\u{0314}';
pub const COMBINING_CIRCUMFLEX: char = '\u{0342}';
pub const COMBINING_IOTA_SUBSCRIPT: char = '\u{0345}';

/// Quantity carried by a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    Long,
    Short,
}

impl Quantity {
    pub fn marker(self) -> char {
        match self {
            Quantity::Long => LONG,
            Quantity::Short => SHORT,
        }
    }

    pub fn from_marker(c: char) -> Option<Self> {
        match c {
            LONG => Some(Quantity::Long),
            SHORT => Some(Quantity::Short),
            _ => None,
        }
    }

    /// The combining diacritic used for this quantity in Unicode text.
    pub fn combining_mark(self) -> char {
        match self {
            Quantity::Long => COMBINING_MACRON,
            Quantity::Short => COMBINING_BREVE,
        }
    }
}

bitflags! {
    /// Diacritics found on one letter.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Diacritics: u16 {
        const ACUTE = 1;
        const GRAVE = 1 << 1;
        const CIRCUMFLEX = 1 << 2;
        const SMOOTH = 1 << 3;
        const ROUGH = 1 << 4;
        const DIAERESIS = 1 << 5;
        const IOTA_SUBSCRIPT = 1 << 6;
        const MACRON = 1 << 7;
        const BREVE = 1 << 8;

        const ACCENTS = Self::ACUTE.bits() | Self::GRAVE.bits() | Self::CIRCUMFLEX.bits();
        const BREATHINGS = Self::SMOOTH.bits() | Self::ROUGH.bits();
    }
}

impl Diacritics {
    fn from_mark(mark: char) -> Self {
        match mark {
            COMBINING_ACUTE => Diacritics::ACUTE,
            COMBINING_GRAVE => Diacritics::GRAVE,
            COMBINING_CIRCUMFLEX => Diacritics::CIRCUMFLEX,
            COMBINING_SMOOTH => Diacritics::SMOOTH,
            COMBINING_ROUGH => Diacritics::ROUGH,
            COMBINING_DIAERESIS => Diacritics::DIAERESIS,
            COMBINING_IOTA_SUBSCRIPT => Diacritics::IOTA_SUBSCRIPT,
            COMBINING_MACRON => Diacritics::MACRON,
            COMBINING_BREVE => Diacritics::BREVE,
            _ => Diacritics::empty(),
        }
    }
}

/// A letter reduced to its lower-case base and its diacritics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Letter {
    pub base: char,
    pub upper: bool,
    pub marks: Diacritics,
}

impl Letter {
    /// Analyses a letter together with any loose combining marks that
    /// follow it (`cluster` is one base character plus marks).
    pub fn of(cluster: &str) -> Self {
        let mut decomposed = cluster.nfd();
        let first = decomposed.next().unwrap_or(' ');
        let base = first.to_lowercase().next().unwrap_or(first);
        let marks = decomposed.fold(Diacritics::empty(), |acc, m| acc | Diacritics::from_mark(m));

        Letter {
            base,
            upper: first.is_uppercase(),
            marks,
        }
    }

    pub fn of_char(c: char) -> Self {
        let mut buf = [0u8; 4];
        Self::of(c.encode_utf8(&mut buf))
    }

    pub fn is_vowel(&self) -> bool {
        matches!(self.base, 'α' | 'ε' | 'η' | 'ι' | 'ο' | 'υ' | 'ω')
    }

    /// α, ι, υ: vowels whose length the spelling does not fix.
    pub fn is_dichronon(&self) -> bool {
        matches!(self.base, 'α' | 'ι' | 'υ')
    }

    /// ε and ο are always short.
    pub fn is_short_vowel(&self) -> bool {
        matches!(self.base, 'ε' | 'ο')
    }

    /// η and ω are always long.
    pub fn is_long_vowel(&self) -> bool {
        matches!(self.base, 'η' | 'ω')
    }

    pub fn is_consonant(&self) -> bool {
        self.base.is_alphabetic() && !self.is_vowel()
    }

    /// ζ, ξ, ψ close the preceding syllable on their own.
    pub fn is_double_consonant(&self) -> bool {
        matches!(self.base, 'ζ' | 'ξ' | 'ψ')
    }

    pub fn is_stop(&self) -> bool {
        matches!(self.base, 'π' | 'β' | 'φ' | 'κ' | 'γ' | 'χ' | 'τ' | 'δ' | 'θ')
    }

    pub fn is_liquid_or_nasal(&self) -> bool {
        matches!(self.base, 'λ' | 'ρ' | 'μ' | 'ν')
    }

    pub fn has(&self, marks: Diacritics) -> bool {
        self.marks.intersects(marks)
    }

    /// The quantity a precomposed Unicode macron or breve gives the letter.
    pub fn unicode_quantity(&self) -> Option<Quantity> {
        if self.marks.contains(Diacritics::MACRON) {
            Some(Quantity::Long)
        } else if self.marks.contains(Diacritics::BREVE) {
            Some(Quantity::Short)
        } else {
            None
        }
    }
}

pub fn is_marker(c: char) -> bool {
    c == LONG || c == SHORT
}

/// A character that can be part of a word in markup text.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || is_combining_mark(c) || is_marker(c)
}

pub fn is_vowel(c: char) -> bool {
    Letter::of_char(c).is_vowel()
}

pub fn has_grave(c: char) -> bool {
    Letter::of_char(c).has(Diacritics::GRAVE)
}

pub fn has_acute(c: char) -> bool {
    Letter::of_char(c).has(Diacritics::ACUTE)
}

/// Rewrites one diacritic of a letter into another, recomposing to NFC.
pub fn swap_mark(c: char, from: char, to: char) -> String {
    core::iter::once(c)
        .nfd()
        .map(|m| if m == from { to } else { m })
        .nfc()
        .collect()
}

/// Lower-cases the first letter of a word, keeping its diacritics.
pub fn decapitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Upper-cases the first letter of a word, keeping its diacritics.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn starts_upper(word: &str) -> bool {
    word.chars().next().is_some_and(|c| c.is_uppercase())
}
