//! Writing resolved tokens back into the text they came from.

use std::collections::HashMap;

use macron_prosody::{has_markers, is_word_char, normalize, strip};
use tracing::debug;

use crate::error::EngineError;

/// A resolved token's markup replacing the byte range `start..end`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Replacement {
    start: usize,
    end: usize,
    markup: String,
}

fn is_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

/// Byte range of the `n`-th (0-based) whole-word occurrence of `word`.
fn nth_occurrence(text: &str, word: &str, n: usize) -> Option<(usize, usize)> {
    text.match_indices(word)
        .map(|(start, m)| (start, start + m.len()))
        .filter(|&(start, end)| is_boundary(text, start, end))
        .nth(n)
}

/// Inserts the markers of `resolved` (markup words in document order) into
/// `text`. The k-th resolved spelling of a word goes to the k-th whole-word
/// occurrence of that word; tokens without markers are skipped. Only
/// markers are ever added.
pub fn integrate<S: AsRef<str>>(text: &str, resolved: &[S]) -> Result<String, EngineError> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut replacements = Vec::new();

    for markup in resolved.iter().map(AsRef::as_ref) {
        if !has_markers(markup) {
            continue;
        }
        let word = normalize(&strip(markup));
        if word.is_empty() {
            continue;
        }
        let count = seen.entry(word.clone()).or_insert(0);

        let (start, end) = nth_occurrence(text, &word, *count).ok_or_else(|| EngineError::OccurrenceNotFound {
            form: word.clone(),
            occurrence: *count + 1,
        })?;
        *count += 1;

        replacements.push(Replacement {
            start,
            end,
            markup: normalize(markup),
        });
    }

    // Right to left, so earlier offsets stay valid.
    replacements.sort_by(|a, b| b.start.cmp(&a.start));

    let mut out = text.to_string();
    for r in &replacements {
        out.replace_range(r.start..r.end, &r.markup);
    }
    debug!(replacements = replacements.len(), "integrated");

    verify(text, &out)?;
    Ok(out)
}

/// Checks that `annotated` differs from `original` in markers only.
pub fn verify(original: &str, annotated: &str) -> Result<(), EngineError> {
    let expected = strip(original);
    let found = strip(annotated);
    if expected == found {
        return Ok(());
    }
    let offset = expected
        .chars()
        .zip(found.chars())
        .position(|(a, b)| a != b)
        .unwrap_or_else(|| expected.chars().count().min(found.chars().count()));
    Err(EngineError::Corrupted { offset })
}
