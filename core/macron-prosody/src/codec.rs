//! Conversion between Unicode combining macron/breve and the inline
//! `_`/`^` markup, plus the positional notation used by external sources.

use nom::{
    branch::alt,
    character::complete::{char, digit1, space0},
    combinator::{all_consuming, map, map_res},
    multi::separated_list1,
    sequence::{delimited, pair},
    IResult,
};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::letters::{is_marker, Quantity, COMBINING_BREVE, COMBINING_MACRON};
use crate::MarkupError;

const ANO_TELEIA: char = '\u{0387}';
const GREEK_QUESTION_MARK: char = '\u{037E}';

/// Splits `text` into runs: a letter with the combining marks that follow
/// it, or any single other character.
pub(crate) fn clusters(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = None;

    for (i, c) in text.char_indices() {
        if is_combining_mark(c) && start.is_some() {
            continue;
        }
        if let Some(s) = start.take() {
            out.push(&text[s..i]);
        }
        if c.is_alphabetic() && !is_combining_mark(c) {
            start = Some(i);
        } else {
            out.push(&text[i..i + c.len_utf8()]);
        }
    }
    if let Some(s) = start {
        out.push(&text[s..]);
    }
    out
}

/// Converts Unicode macrons and breves into `_`/`^` markers placed after
/// their letter. Everything else, including markers already present, is
/// kept; letters come out in NFC.
pub fn to_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());

    for cluster in clusters(text) {
        let mut chars = cluster.chars();
        let first = match chars.next() {
            Some(c) => c,
            None => continue,
        };
        // NFD would turn these into U+00B7 and ';'.
        if first == ANO_TELEIA || first == GREEK_QUESTION_MARK || !first.is_alphabetic() {
            out.push_str(cluster);
            continue;
        }

        let mut quantity = None;
        let kept: String = cluster
            .nfd()
            .filter(|&m| match m {
                COMBINING_MACRON => {
                    quantity = Some(Quantity::Long);
                    false
                }
                COMBINING_BREVE => {
                    quantity = Some(Quantity::Short);
                    false
                }
                _ => true,
            })
            .collect();

        out.extend(kept.nfc());
        if let Some(q) = quantity {
            out.push(q.marker());
        }
    }
    out
}

/// Inverse of [`to_markup`]: folds each marker back into its letter as a
/// combining macron or breve placed directly on the base letter, then
/// recomposes. A marker that does not follow a letter is left as is.
pub fn to_unicode(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let parts = clusters(markup);
    let mut i = 0;

    while i < parts.len() {
        let cluster = parts[i];
        let is_letter = cluster.chars().next().is_some_and(|c| c.is_alphabetic());
        let quantity = parts
            .get(i + 1)
            .and_then(|next| next.chars().next())
            .and_then(Quantity::from_marker);

        match (is_letter, quantity) {
            (true, Some(q)) => {
                let mut decomposed = cluster.nfd();
                let mut rebuilt = String::new();
                if let Some(base) = decomposed.next() {
                    rebuilt.push(base);
                }
                rebuilt.push(q.combining_mark());
                rebuilt.extend(decomposed);
                out.extend(rebuilt.nfc());
                i += 2;
            }
            _ => {
                out.push_str(cluster);
                i += 1;
            }
        }
    }
    out
}

/// Removes every quantity marker.
pub fn strip(markup: &str) -> String {
    markup.chars().filter(|&c| !is_marker(c)).collect()
}

pub fn has_markers(markup: &str) -> bool {
    markup.chars().any(is_marker)
}

/// NFC form used for every lookup key and occurrence comparison. Ano
/// teleia and the Greek question mark are kept as written, although NFC
/// would replace them.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for piece in text.split_inclusive([ANO_TELEIA, GREEK_QUESTION_MARK]) {
        match piece.char_indices().next_back() {
            Some((i, last)) if last == ANO_TELEIA || last == GREEK_QUESTION_MARK => {
                out.extend(piece[..i].nfc());
                out.push(last);
            }
            _ => out.extend(piece.nfc()),
        }
    }
    out
}

/// Re-applies the markers of `markup` to `original`, the text it was
/// produced from, leaving every character of `original` as written.
///
/// `markup` must spell the normalized, marker-free form of `original`.
/// Clusters of `original` are matched to those of `markup` by their
/// normalized spelling; each matched group gets the marker that closes it
/// in `markup`, unless the group already shows its quantity with a
/// combining macron or breve. Markers already in `original` are replaced.
pub fn transplant_markers(original: &str, markup: &str) -> Result<String, MarkupError> {
    let mismatch = || MarkupError::ShapeMismatch {
        target: original.to_string(),
        origin: markup.to_string(),
    };

    let mut units: Vec<(&str, Option<char>)> = Vec::new();
    for part in clusters(markup) {
        let first = part.chars().next();
        if first.is_some_and(is_marker) {
            // a marker with nothing before it has no letter to go on
            if let Some(last) = units.last_mut() {
                last.1 = first;
            }
        } else {
            units.push((part, None));
        }
    }
    let mut units = units.into_iter();

    let mut out = String::with_capacity(markup.len() + original.len() / 4);
    let mut written = String::new();
    let mut read = String::new();
    let mut marked_in_place = false;
    let mut marker = None;

    for part in clusters(original) {
        if part.chars().all(is_marker) {
            continue;
        }
        let converted = to_markup(&normalize(part));
        written.push_str(&strip(&converted));
        marked_in_place |= has_markers(&converted);
        out.push_str(part);

        while read.len() < written.len() {
            let (text, m) = units.next().ok_or_else(mismatch)?;
            read.push_str(text);
            marker = m;
        }
        if read == written {
            if let Some(m) = marker.filter(|_| !marked_in_place) {
                out.push(m);
            }
            written.clear();
            read.clear();
            marked_in_place = false;
            marker = None;
        } else if !read.starts_with(&written) {
            return Err(mismatch());
        }
    }
    if !written.is_empty() || units.next().is_some() {
        return Err(mismatch());
    }
    Ok(out)
}

fn quantity_marker(input: &str) -> IResult<&str, Quantity> {
    alt((
        map(char('_'), |_| Quantity::Long),
        map(char('^'), |_| Quantity::Short),
    ))(input)
}

fn position(input: &str) -> IResult<&str, usize> {
    map_res(digit1, |digits: &str| digits.parse::<usize>())(input)
}

fn notation(input: &str) -> IResult<&str, Vec<(Quantity, usize)>> {
    separated_list1(
        delimited(space0, char(','), space0),
        pair(quantity_marker, position),
    )(input)
}

/// Parses positional notation such as `"_3,^5,_6"`: long after the third
/// letter, short after the fifth, long after the sixth. Positions are
/// 1-based and count letters only.
pub fn parse_positional(positions: &str) -> Result<Vec<(Quantity, usize)>, MarkupError> {
    all_consuming(delimited(space0, notation, space0))(positions)
        .map(|(_, marks)| marks)
        .map_err(|_| MarkupError::Notation(positions.to_string()))
}

/// Inserts the quantities of a positional notation into a plain word.
pub fn integrate_positional(word: &str, positions: &str) -> Result<String, MarkupError> {
    let marks = parse_positional(positions)?;
    let parts = clusters(word);
    let letters = parts
        .iter()
        .filter(|p| p.chars().next().is_some_and(|c| c.is_alphabetic()))
        .count();

    let mut slots: Vec<Option<Quantity>> = vec![None; letters];
    for (quantity, pos) in marks {
        if pos == 0 || pos > letters {
            return Err(MarkupError::PositionOutOfRange {
                word: word.to_string(),
                position: pos,
            });
        }
        slots[pos - 1] = Some(quantity);
    }

    let mut out = String::with_capacity(word.len() + slots.len());
    let mut letter = 0;
    for part in parts {
        out.push_str(part);
        if part.chars().next().is_some_and(|c| c.is_alphabetic()) {
            if let Some(q) = slots[letter] {
                out.push(q.marker());
            }
            letter += 1;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_unicode_to_markup() {
        assert_eq!(to_markup("νεᾱνῐ́ᾱς"), "νεα_νί^α_ς");
        assert_eq!(to_markup("ᾱ̓γαθός"), "ἀ_γαθός");
    }

    #[test]
    fn test_markup_to_unicode() {
        assert_eq!(to_unicode("νεα_νί^α_ς"), "νεᾱνῐ́ᾱς");
    }

    #[test]
    fn test_greek_punctuation_survives() {
        let text = "ἦλθεν\u{0387} τί ποιεῖς\u{037E}";
        assert_eq!(to_markup(text), text);
        assert_eq!(to_unicode(text), text);
    }

    #[test]
    fn test_markup_is_fixed_point() {
        let markup = "νεα_νί^α_ς καὶ λί^θος";
        assert_eq!(to_markup(markup), markup);
    }

    #[test]
    fn test_stray_marker_passes_through() {
        assert_eq!(to_unicode("^α"), "^α");
        assert_eq!(to_unicode("α ^"), "α ^");
    }

    #[test]
    fn test_normalize_keeps_greek_punctuation() {
        assert_eq!(normalize("ἦλθεν\u{0387} τί\u{037E}"), "ἦλθεν\u{0387} τί\u{037E}");
        assert_eq!(normalize("α\u{0301}"), "\u{03AC}");
    }

    #[test]
    fn test_strip() {
        assert_eq!(strip("νεα_νί^α_ς"), "νεανίας");
        assert!(has_markers("α_"));
        assert!(!has_markers("α"));
    }

    #[test]
    fn test_integrate_positional() {
        assert_eq!(integrate_positional("νεανίας", "_3,^5,_6").unwrap(), "νεα_νί^α_ς");
        assert_eq!(integrate_positional("νεανίας", " _3 , ^5 ").unwrap(), "νεα_νί^ας");
    }

    #[test]
    fn test_integrate_positional_errors() {
        assert!(matches!(
            integrate_positional("νεανίας", "_9"),
            Err(MarkupError::PositionOutOfRange { position: 9, .. })
        ));
        assert!(matches!(
            integrate_positional("νεανίας", "3_"),
            Err(MarkupError::Notation(_))
        ));
    }

    #[test]
    fn test_transplant_keeps_original_code_points() {
        // oxia iota, and a decomposed acute
        let oxia = "λ\u{1F77}θος.";
        assert_eq!(transplant_markers(oxia, "λί^θος.").unwrap(), "λ\u{1F77}^θος.");
        let decomposed = "χω\u{0301}ρα λι\u{0301}θος";
        let out = transplant_markers(decomposed, "χώρα_ λί^θος").unwrap();
        assert_eq!(out, "χω\u{0301}ρα_ λι\u{0301}^θος");
        assert_eq!(strip(&out), decomposed);
    }

    #[test]
    fn test_transplant_respects_written_quantities() {
        // the macron already on the alpha stays, the old marker is replaced
        let out = transplant_markers("λί_θος χώρᾱ", "λί^θος χώρα_").unwrap();
        assert_eq!(out, "λί^θος χώρᾱ");
    }

    #[test]
    fn test_transplant_rejects_other_words() {
        assert!(matches!(
            transplant_markers("λίθος", "λίθον"),
            Err(MarkupError::ShapeMismatch { .. })
        ));
        assert!(transplant_markers("λίθος", "λίθος καί").is_err());
    }

    proptest! {
        #[test]
        fn test_round_trip(word in "[αιυεοηω][αιυ]?[ᾱᾰῑῐῡῠ]?[νσκλ]?[ᾱῐῡ]") {
            let unicode = normalize(&word);
            prop_assert_eq!(to_unicode(&to_markup(&unicode)), unicode);
        }

        #[test]
        fn test_round_trip_with_diacritics(
            vowels in proptest::collection::vec(
                (
                    prop::sample::select(vec!['α', 'ι', 'υ', 'Α', 'Ι']),
                    any::<bool>(),
                    prop::option::of(prop::sample::select(vec!['\u{0313}', '\u{0314}'])),
                    any::<bool>(),
                    prop::option::of(prop::sample::select(vec!['\u{0301}', '\u{0300}'])),
                ),
                1..4,
            )
        ) {
            let mut word = String::new();
            for &(base, long, breathing, diaeresis, accent) in &vowels {
                word.push('κ');
                word.push(base);
                word.push(if long { COMBINING_MACRON } else { COMBINING_BREVE });
                word.extend(breathing);
                if diaeresis {
                    word.push('\u{0308}');
                }
                word.extend(accent);
            }
            let unicode = normalize(&word);
            let markup = to_markup(&unicode);
            prop_assert_eq!(markup.chars().filter(|&c| is_marker(c)).count(), vowels.len());
            prop_assert_eq!(to_unicode(&markup), unicode);
        }

        #[test]
        fn test_markup_idempotent(word in "[αιυ][_^]?[κλμ][αιυ][_^]?") {
            prop_assert_eq!(to_markup(&word), word.clone());
        }
    }
}
