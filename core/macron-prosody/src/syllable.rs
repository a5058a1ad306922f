//! Syllabification of markup words and the open-dichronon predicates.
//!
//! A word is first cut into [`Unit`]s (one letter with its combining marks
//! and the quantity marker written after it), vowels are grouped into
//! nuclei, and the consonants between two nuclei are divided so that a
//! stop followed by a liquid or nasal begins the next syllable while any
//! other cluster leaves its first consonant behind.

use crate::codec::clusters;
use crate::letters::{is_word_char, Diacritics, Letter, Quantity};

/// One letter of a markup word, or a character that is not a letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unit<'a> {
    pub text: &'a str,
    pub letter: Option<Letter>,
    pub quantity: Option<Quantity>,
}

impl Unit<'_> {
    fn vowel(&self) -> Option<Letter> {
        self.letter.filter(Letter::is_vowel)
    }

    fn consonant(&self) -> Option<Letter> {
        self.letter.filter(Letter::is_consonant)
    }
}

/// A syllable as a range of units, with the range of its vowel nucleus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Syllable {
    pub start: usize,
    pub end: usize,
    pub nucleus: Option<(usize, usize)>,
}

fn units(markup: &str) -> Vec<Unit<'_>> {
    let mut out: Vec<Unit<'_>> = Vec::new();

    for cluster in clusters(markup) {
        let first = match cluster.chars().next() {
            Some(c) => c,
            None => continue,
        };
        if let Some(q) = Quantity::from_marker(first) {
            if let Some(last) = out.last_mut() {
                if last.letter.is_some() && last.quantity.is_none() {
                    last.quantity = Some(q);
                    continue;
                }
            }
        }
        let letter = first.is_alphabetic().then(|| Letter::of(cluster));
        out.push(Unit {
            text: cluster,
            letter,
            quantity: None,
        });
    }
    out
}

/// Whether `first` and `second` are read as one diphthong. The first element
/// must be bare: an accent, breathing or diaeresis on it, or a quantity
/// marker after it, puts the two vowels in separate syllables. A long vowel
/// followed by a bare ι is written iota adscript and also counts.
pub fn forms_diphthong(first: &Letter, second: &Letter) -> bool {
    if !first.is_vowel() || !second.is_vowel() || second.has(Diacritics::DIAERESIS) {
        return false;
    }
    let bare = !first.has(
        Diacritics::ACCENTS | Diacritics::BREATHINGS | Diacritics::DIAERESIS | Diacritics::IOTA_SUBSCRIPT,
    );
    match second.base {
        'ι' => {
            (bare && matches!(first.base, 'α' | 'ε' | 'ο' | 'υ'))
                || (matches!(first.base, 'α' | 'η' | 'ω') && second.marks.is_empty())
        }
        'υ' => bare && matches!(first.base, 'α' | 'ε' | 'η' | 'ο'),
        _ => false,
    }
}

/// A syllabified markup word.
#[derive(Debug, Clone)]
pub struct Word<'a> {
    units: Vec<Unit<'a>>,
    syllables: Vec<Syllable>,
}

impl<'a> Word<'a> {
    pub fn parse(markup: &'a str) -> Self {
        let units = units(markup);
        let nuclei = nuclei(&units);
        let syllables = divide(&units, &nuclei);
        Word { units, syllables }
    }

    pub fn units(&self) -> &[Unit<'a>] {
        &self.units
    }

    pub fn syllables(&self) -> &[Syllable] {
        &self.syllables
    }

    /// The markup text of each syllable, markers included.
    pub fn texts(&self) -> Vec<String> {
        self.syllables
            .iter()
            .map(|s| {
                self.units[s.start..s.end]
                    .iter()
                    .map(|u| match u.quantity {
                        Some(q) => format!("{}{}", u.text, q.marker()),
                        None => u.text.to_string(),
                    })
                    .collect()
            })
            .collect()
    }

    pub fn nucleus(&self, idx: usize) -> &[Unit<'a>] {
        match self.syllables.get(idx).and_then(|s| s.nucleus) {
            Some((start, end)) => &self.units[start..end],
            None => &[],
        }
    }

    /// Consonants written after the nucleus inside the syllable itself.
    fn coda(&self, idx: usize) -> Vec<Letter> {
        let s = self.syllables[idx];
        let from = s.nucleus.map_or(s.end, |(_, end)| end);
        self.units[from..s.end].iter().filter_map(Unit::consonant).collect()
    }

    /// Open syllable: ends in its vowel and is not closed by a following
    /// ζ, ξ or ψ. The final syllable still counts as open with a single
    /// simple consonant after its vowel.
    pub fn is_open(&self, idx: usize) -> bool {
        let Some(syllable) = self.syllables.get(idx) else {
            return false;
        };
        if syllable.nucleus.is_none() {
            return false;
        }
        let coda = self.coda(idx);

        if idx + 1 == self.syllables.len() {
            return match coda.as_slice() {
                [] => true,
                [single] => !single.is_double_consonant(),
                _ => false,
            };
        }
        if !coda.is_empty() {
            return false;
        }
        let next = self.syllables[idx + 1];
        let onset = self.units[next.start..next.end].iter().find_map(Unit::consonant);
        !onset.is_some_and(|c| c.is_double_consonant())
    }

    /// The nucleus is a lone α, ι or υ whose length nothing in the spelling
    /// or markup decides.
    pub fn is_ambiguous(&self, idx: usize) -> bool {
        match self.nucleus(idx) {
            [unit] => unit.quantity.is_none()
                && unit.letter.is_some_and(|l| {
                    l.is_dichronon()
                        && !l.has(Diacritics::CIRCUMFLEX | Diacritics::IOTA_SUBSCRIPT)
                        && l.unicode_quantity().is_none()
                }),
            _ => false,
        }
    }

    pub fn is_open_dichronon(&self, idx: usize) -> bool {
        self.is_open(idx) && self.is_ambiguous(idx)
    }

    pub fn count_open_dichrona(&self) -> usize {
        (0..self.syllables.len()).filter(|&i| self.is_open_dichronon(i)).count()
    }

    /// Renders the word back to markup, adding `forced` quantities on the
    /// nuclei of the given syllables where no marker is present yet.
    pub fn render_with(&self, forced: &[(usize, Quantity)]) -> String {
        let mut extra = vec![None; self.units.len()];
        for &(idx, quantity) in forced {
            if let Some((_, end)) = self.syllables.get(idx).and_then(|s| s.nucleus) {
                extra[end - 1] = Some(quantity);
            }
        }
        let mut out = String::new();
        for (unit, forced) in self.units.iter().zip(extra) {
            out.push_str(unit.text);
            if let Some(q) = unit.quantity.or(forced) {
                out.push(q.marker());
            }
        }
        out
    }

    /// A quantity marker sits on either element of a diphthong.
    pub fn marks_diphthong(&self) -> bool {
        self.units.windows(2).any(|pair| match (pair[0].vowel(), pair[1].vowel()) {
            (Some(a), Some(b)) => {
                (pair[0].quantity.is_some() || pair[1].quantity.is_some()) && forms_diphthong(&a, &b)
            }
            _ => false,
        })
    }
}

fn nuclei(units: &[Unit<'_>]) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < units.len() {
        let Some(first) = units[i].vowel() else {
            i += 1;
            continue;
        };
        let joined = units[i].quantity.is_none()
            && units
                .get(i + 1)
                .and_then(Unit::vowel)
                .is_some_and(|second| forms_diphthong(&first, &second));
        let end = if joined { i + 2 } else { i + 1 };
        out.push((i, end));
        i = end;
    }
    out
}

fn divide(units: &[Unit<'_>], nuclei: &[(usize, usize)]) -> Vec<Syllable> {
    if nuclei.is_empty() {
        return vec![Syllable {
            start: 0,
            end: units.len(),
            nucleus: None,
        }];
    }

    let mut out = Vec::with_capacity(nuclei.len());
    let mut start = 0;
    for (j, &nucleus) in nuclei.iter().enumerate() {
        let end = match nuclei.get(j + 1) {
            Some(&(next_start, _)) => {
                let between: Vec<usize> = (nucleus.1..next_start)
                    .filter(|&k| units[k].consonant().is_some())
                    .collect();
                match between.as_slice() {
                    [] => nucleus.1,
                    [only] => *only,
                    [.., a, b] => {
                        let stop = units[*a].consonant().is_some_and(|l| l.is_stop());
                        let liquid = units[*b].consonant().is_some_and(|l| l.is_liquid_or_nasal());
                        if stop && liquid {
                            *a
                        } else {
                            *b
                        }
                    }
                }
            }
            None => units.len(),
        };
        out.push(Syllable {
            start,
            end,
            nucleus: Some(nucleus),
        });
        start = end;
    }
    out
}

/// Counts open, ambiguous dichrona over a whole markup text.
pub fn count_open_dichrona(text: &str) -> usize {
    text.split(|c: char| !is_word_char(c))
        .filter(|w| !w.is_empty())
        .map(|w| Word::parse(w).count_open_dichrona())
        .sum()
}

/// Whether a word carries a marker on a diphthong.
pub fn marks_diphthong(markup: &str) -> bool {
    Word::parse(markup).marks_diphthong()
}
