//! Combining two markup variants of the same word.

use crate::codec::strip;
use crate::letters::{is_marker, Letter};
use crate::MarkupError;

/// A markup string split into its plain characters and the marker that
/// follows each of them. Slot 0 holds a marker before the first character.
struct Slots {
    chars: Vec<char>,
    markers: Vec<Option<char>>,
}

impl Slots {
    fn of(markup: &str) -> Self {
        let mut chars = Vec::new();
        let mut markers = vec![None];

        for c in markup.chars() {
            if is_marker(c) {
                let slot = markers.len() - 1;
                if markers[slot].is_none() {
                    markers[slot] = Some(c);
                }
            } else {
                chars.push(c);
                markers.push(None);
            }
        }
        Slots { chars, markers }
    }

    fn render(&self) -> String {
        let mut out = String::with_capacity(self.chars.len() * 3);
        if let Some(m) = self.markers[0] {
            out.push(m);
        }
        for (c, m) in self.chars.iter().zip(&self.markers[1..]) {
            out.push(*c);
            if let Some(m) = m {
                out.push(*m);
            }
        }
        out
    }
}

/// Merges two markup variants of the same word: wherever `newer` has a
/// marker it wins, elsewhere `older`'s marker is kept.
///
/// Both inputs must strip to the same plain form; anything else means a
/// module rewrote the word itself.
pub fn merge(newer: &str, older: &str) -> Result<String, MarkupError> {
    let newer_slots = Slots::of(newer);
    let older_slots = Slots::of(older);

    if newer_slots.chars != older_slots.chars {
        return Err(MarkupError::Perverted {
            newer: newer.to_string(),
            older: older.to_string(),
        });
    }

    let markers = newer_slots
        .markers
        .iter()
        .zip(&older_slots.markers)
        .map(|(n, o)| n.or(*o))
        .collect();

    Ok(Slots {
        chars: newer_slots.chars,
        markers,
    }
    .render())
}

/// Letter positions (indices into the char sequence) of a plain string.
fn letter_positions(chars: &[char]) -> Vec<usize> {
    chars
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_alphabetic() && !unicode_normalization::char::is_combining_mark(**c))
        .map(|(i, _)| i)
        .collect()
}

/// Copies markers from `source` onto the plain word `target` through a
/// letter-index mapping: target letter `i` receives the marker of source
/// letter `map(i)`, if any.
pub fn project_quantities(
    target: &str,
    source: &str,
    map: impl Fn(usize) -> Option<usize>,
) -> Result<String, MarkupError> {
    let source_slots = Slots::of(source);
    let source_letters = letter_positions(&source_slots.chars);

    let mut target_slots = Slots::of(&strip(target));
    let target_letters = letter_positions(&target_slots.chars);

    for (i, &pos) in target_letters.iter().enumerate() {
        let Some(j) = map(i) else { continue };
        let Some(&src_pos) = source_letters.get(j) else {
            return Err(MarkupError::ShapeMismatch {
                target: target.to_string(),
                origin: source.to_string(),
            });
        };
        if let Some(m) = source_slots.markers[src_pos + 1] {
            target_slots.markers[pos + 1] = Some(m);
        }
    }
    Ok(target_slots.render())
}

/// Carries the markers of a transformed variant (accent or case changed)
/// back onto the original plain word. The two must have the same letters
/// once case and diacritics are ignored.
pub fn transfer_quantities(target: &str, source: &str) -> Result<String, MarkupError> {
    let plain_source = strip(source);
    let target_bases: Vec<char> = strip(target).chars().filter(|c| c.is_alphabetic()).map(|c| Letter::of_char(c).base).collect();
    let source_bases: Vec<char> = plain_source.chars().filter(|c| c.is_alphabetic()).map(|c| Letter::of_char(c).base).collect();

    if target_bases != source_bases {
        return Err(MarkupError::ShapeMismatch {
            target: target.to_string(),
            origin: source.to_string(),
        });
    }
    project_quantities(target, source, Some)
}
