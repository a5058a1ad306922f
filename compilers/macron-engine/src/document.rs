//! A text prepared for annotation together with its tagged tokens.

use std::collections::HashSet;
use std::ops::Range;

use macron_prosody::{merge, normalize, strip, to_markup, transplant_markers};
use macron_protocol::{ClauseContext, Mood, SentenceId, Token, TokenId};

use crate::error::EngineError;
use crate::lexicon::lookup_key;
use crate::parser;

const EDITORIAL_SIGNS: &[char] = &['-', '<', '>', '[', ']', '«', '»', '†'];

/// Drops editorial brackets, daggers and hyphens and normalizes the elision
/// mark to an apostrophe.
pub fn clean_editorial_signs(text: &str) -> String {
    text.chars()
        .filter(|c| !EDITORIAL_SIGNS.contains(c))
        .map(|c| if c == '\u{2019}' { '\'' } else { c })
        .collect()
}

/// Fills in each token's clause context from its sentence: whether the
/// sentence has a subjunctive and whether it has εἰ.
pub fn assign_clause_context(tokens: &mut [Token]) {
    let mut start = 0;
    while start < tokens.len() {
        let sentence = tokens[start].sentence;
        let end = tokens[start..]
            .iter()
            .position(|t| t.sentence != sentence)
            .map_or(tokens.len(), |offset| start + offset);

        let context = ClauseContext {
            has_subjunctive: tokens[start..end]
                .iter()
                .any(|t| t.features.has_mood(Mood::Subjunctive)),
            has_conditional: tokens[start..end]
                .iter()
                .any(|t| matches!(lookup_key(&t.form).as_str(), "εἰ" | "εἴ")),
        };
        for token in &mut tokens[start..end] {
            token.clause = context;
        }
        start = end;
    }
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    /// The submitted text as written, after editorial cleaning if asked.
    source: String,
    /// The submitted text in NFC markup, earlier markers included.
    prior: String,
    /// `prior` without markers: what is tagged and integrated into.
    text: String,
    tokens: Vec<Token>,
}

impl Document {
    pub fn new(text: &str) -> Self {
        Self::prepare(text, false)
    }

    pub fn prepare(text: &str, clean: bool) -> Self {
        let source = if clean {
            clean_editorial_signs(text)
        } else {
            text.to_string()
        };
        let prior = to_markup(&normalize(&source));
        let text = strip(&prior);
        Self {
            source,
            prior,
            text,
            tokens: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn prior(&self) -> &str {
        &self.prior
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Takes the tagger's tokens: forms are normalized like the text,
    /// ids renumbered in document order and clause contexts filled in.
    pub fn set_tokens(&mut self, mut tokens: Vec<Token>) {
        for (i, token) in tokens.iter_mut().enumerate() {
            let form: String = token
                .form
                .chars()
                .filter(|&c| c != '\u{0387}' && c != '\u{037E}')
                .collect();
            token.form = normalize(&strip(&form));
            token.lemma = normalize(&strip(&token.lemma));
            token.id = TokenId::new(i as u32);
        }
        assign_clause_context(&mut tokens);
        self.tokens = tokens;
    }

    /// Every word of the text as the scanner sees it.
    pub fn word_list(&self) -> HashSet<&str> {
        parser::words(&self.text).into_iter().collect()
    }

    /// Token ranges holding at most `sentences` whole sentences each.
    pub fn chunks(&self, sentences: usize) -> Vec<Range<usize>> {
        let per_chunk = sentences.max(1);
        let mut out = Vec::new();
        let mut start = 0;
        let mut in_chunk = 0;
        let mut current: Option<SentenceId> = None;

        for (i, token) in self.tokens.iter().enumerate() {
            if current != Some(token.sentence) {
                if in_chunk == per_chunk {
                    out.push(start..i);
                    start = i;
                    in_chunk = 0;
                }
                in_chunk += 1;
                current = Some(token.sentence);
            }
        }
        if start < self.tokens.len() {
            out.push(start..self.tokens.len());
        }
        out
    }

    /// Merges the markers the text was submitted with back under the
    /// integrated result, new markers winning, and writes the outcome into
    /// the text as it was submitted.
    pub fn finish(&self, annotated: &str) -> Result<String, EngineError> {
        let merged = merge(annotated, &self.prior)?;
        Ok(transplant_markers(&self.source, &merged)?)
    }
}
