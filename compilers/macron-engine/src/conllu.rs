//! Reader for CoNLL-U treebank files, used as a ready-made tagger.

use macron_protocol::{MorphFlags, PartOfSpeech, SentenceId, Token, TokenId};

use crate::error::EngineError;
use crate::tagger::Tagger;

const COLUMNS: usize = 10;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConlluSentence {
    /// The `# text = ...` comment, when present.
    pub text: Option<String>,
    pub tokens: Vec<Token>,
}

/// Parses a CoNLL-U document. Multiword-token ranges (`3-4`) and empty
/// nodes (`5.1`) are skipped, as are rows without a form or UPOS tag.
pub fn parse(input: &str) -> Result<Vec<ConlluSentence>, EngineError> {
    let mut sentences = Vec::new();
    let mut current = ConlluSentence::default();
    let mut next_id = 0u32;

    let flush = |current: &mut ConlluSentence, sentences: &mut Vec<ConlluSentence>| {
        if !current.tokens.is_empty() || current.text.is_some() {
            sentences.push(std::mem::take(current));
        }
    };

    for (idx, line) in input.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            flush(&mut current, &mut sentences);
            continue;
        }
        if let Some(comment) = line.strip_prefix('#') {
            if let Some(text) = comment.trim_start().strip_prefix("text") {
                if let Some(text) = text.trim_start().strip_prefix('=') {
                    current.text = Some(text.trim().to_string());
                }
            }
            continue;
        }

        let columns: Vec<&str> = line.split('\t').collect();
        if columns.len() != COLUMNS {
            return Err(EngineError::Conllu {
                line: idx + 1,
                reason: format!("expected {} columns, found {}", COLUMNS, columns.len()),
            });
        }
        let id = columns[0];
        if id.contains('-') || id.contains('.') {
            continue;
        }
        let (form, lemma, upos, feats) = (columns[1], columns[2], columns[3], columns[5]);
        if form.is_empty() || form == "_" || upos == "_" {
            continue;
        }

        let features = MorphFlags::parse_ud(feats).map_err(|err| EngineError::Conllu {
            line: idx + 1,
            reason: err.to_string(),
        })?;
        let lemma = if lemma == "_" { "" } else { lemma };

        let mut token = Token::new(form, lemma, PartOfSpeech::from_upos(upos), features);
        token.id = TokenId::new(next_id);
        token.sentence = SentenceId::new(sentences.len() as u32);
        next_id += 1;
        current.tokens.push(token);
    }
    flush(&mut current, &mut sentences);
    Ok(sentences)
}

/// A parsed treebank acting as the tagger for its own text.
#[derive(Debug, Clone, Default)]
pub struct ConlluDocument {
    pub sentences: Vec<ConlluSentence>,
}

impl ConlluDocument {
    pub fn parse(input: &str) -> Result<Self, EngineError> {
        Ok(Self {
            sentences: parse(input)?,
        })
    }

    /// The running text: the `# text` comments joined by spaces, or the
    /// forms where a sentence has none.
    pub fn text(&self) -> String {
        self.sentences
            .iter()
            .map(|s| match &s.text {
                Some(text) => text.clone(),
                None => s.tokens.iter().map(|t| t.form.as_str()).collect::<Vec<_>>().join(" "),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Tagger for ConlluDocument {
    fn tag(&self, _text: &str) -> Result<Vec<Token>, EngineError> {
        Ok(self.sentences.iter().flat_map(|s| s.tokens.iter().cloned()).collect())
    }
}
