//! Vowel-quantity annotation for tagged Ancient Greek text.
//!
//! A text goes through [`Macronizer::macronize`]: it is tagged, each token
//! is screened and then resolved by the [`Orchestrator`] (evidence modules
//! in priority order, retry passes while open dichrona remain), and the
//! resolved spellings are integrated back into the original text, adding
//! nothing but `_` and `^` markers.

pub mod config;
pub mod conllu;
pub mod diagnostics;
pub mod document;
pub mod endings;
pub mod error;
pub mod evidence;
pub mod integrate;
pub mod lexicon;
pub mod orchestrator;
pub mod parser;
pub mod passes;
pub mod screening;
pub mod tagger;

use std::ops::Range;

use macron_prosody::{count_open_dichrona, normalize, to_markup, to_unicode};
use macron_protocol::Token;
use rayon::prelude::*;
use tracing::{debug, info};

pub use config::{MacronizerConfig, OutputFormat};
pub use conllu::ConlluDocument;
pub use diagnostics::Diagnostics;
pub use document::Document;
pub use error::{EngineError, LexiconError};
pub use evidence::{AmbiguityPolicy, Evidence, EvidenceModule};
pub use integrate::{integrate, verify};
pub use lexicon::{Lexicon, LexiconStore};
pub use orchestrator::{Orchestrator, PendingChoice, Resolution, Stores, MAX_DEPTH};
pub use passes::{PassFlags, RetryPass};
pub use screening::{Screen, Screener};
pub use tagger::{Pretagged, Tagger};

/// The result of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotated {
    pub text: String,
    pub diagnostics: Diagnostics,
    /// Tokens an ambiguous module left undecided under
    /// [`AmbiguityPolicy::Propagate`], in document order.
    pub pending: Vec<Resolution>,
}

#[derive(Default)]
struct ChunkOutput {
    markups: Vec<String>,
    diagnostics: Diagnostics,
    pending: Vec<Resolution>,
}

pub struct Macronizer {
    config: MacronizerConfig,
    orchestrator: Orchestrator,
}

impl Macronizer {
    /// The standard module list over `stores`.
    pub fn new(config: MacronizerConfig, stores: Stores) -> Self {
        let orchestrator = Orchestrator::standard(stores, config.ambiguity_policy);
        Self { config, orchestrator }
    }

    pub fn with_orchestrator(config: MacronizerConfig, orchestrator: Orchestrator) -> Self {
        Self { config, orchestrator }
    }

    pub fn config(&self) -> &MacronizerConfig {
        &self.config
    }

    pub fn resolve_token(&self, token: &Token) -> Result<Resolution, EngineError> {
        self.orchestrator.resolve(token)
    }

    pub fn macronize(&self, text: &str, tagger: &dyn Tagger) -> Result<Annotated, EngineError> {
        let mut document = Document::prepare(text, self.config.clean_editorial_signs);
        let tokens = tagger.tag(document.text())?;
        document.set_tokens(tokens);

        let screener = Screener::new(&self.config, document.word_list());
        let chunks = document.chunks(self.config.chunk_sentences);
        let run = |range: &Range<usize>| self.resolve_chunk(&document.tokens()[range.clone()], &screener);

        let outputs: Vec<ChunkOutput> = if self.config.parallel {
            chunks.par_iter().map(run).collect::<Result<Vec<_>, EngineError>>()?
        } else {
            chunks.iter().map(run).collect::<Result<Vec<_>, EngineError>>()?
        };

        let mut diagnostics = Diagnostics::default();
        let mut markups = Vec::new();
        let mut pending = Vec::new();
        for output in outputs {
            diagnostics.absorb(output.diagnostics);
            markups.extend(output.markups);
            pending.extend(output.pending);
        }

        let integrated = integrate(document.text(), &markups)?;
        let finished = document.finish(&integrated)?;
        verify(document.source(), &finished)?;
        diagnostics.dichrona_before = count_open_dichrona(document.prior());
        diagnostics.dichrona_after = count_open_dichrona(&to_markup(&normalize(&finished)));

        info!(
            tokens = diagnostics.tokens,
            resolved = diagnostics.resolved,
            chunks = chunks.len(),
            ratio = diagnostics.ratio(),
            "macronized"
        );

        let text = match self.config.output {
            OutputFormat::Markup => finished,
            OutputFormat::Unicode => to_unicode(&finished),
        };
        Ok(Annotated {
            text,
            diagnostics,
            pending,
        })
    }

    /// Annotates the text of a CoNLL-U file using its own analyses.
    pub fn macronize_conllu(&self, input: &str) -> Result<Annotated, EngineError> {
        let treebank = ConlluDocument::parse(input)?;
        self.macronize(&treebank.text(), &treebank)
    }

    fn resolve_chunk(&self, tokens: &[Token], screener: &Screener<'_>) -> Result<ChunkOutput, EngineError> {
        let mut out = ChunkOutput::default();

        for token in tokens {
            out.diagnostics.tokens += 1;
            match screener.screen(token) {
                Screen::Accept => {}
                Screen::Malformed => {
                    debug!(token = %token.form, "malformed");
                    out.diagnostics.malformed += 1;
                    continue;
                }
                Screen::StopWord => {
                    out.diagnostics.stop_words += 1;
                    continue;
                }
                Screen::TaggerMismatch => {
                    debug!(token = %token.form, "not in the text");
                    out.diagnostics.tagger_mismatches += 1;
                    continue;
                }
                Screen::NoDichrona => {
                    out.diagnostics.skipped += 1;
                    continue;
                }
            }

            match self.orchestrator.resolve(token) {
                Ok(resolution) => {
                    if resolution.is_marked() {
                        out.diagnostics.resolved += 1;
                    }
                    if !resolution.pending.is_empty() {
                        out.diagnostics.ambiguous += 1;
                        out.pending.push(resolution.clone());
                    }
                    out.markups.push(resolution.markup);
                }
                Err(EngineError::DepthExceeded { token, .. }) => out.diagnostics.depth_exceeded.push(token),
                Err(err) => return Err(err),
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macron_protocol::{MorphFlags, PartOfSpeech, SentenceId};

    fn tagged(words: &[(&str, &str, &str)]) -> Pretagged {
        Pretagged(
            words
                .iter()
                .map(|&(form, upos, feats)| {
                    let mut token = Token::new(
                        form,
                        form,
                        PartOfSpeech::from_upos(upos),
                        MorphFlags::parse_ud(feats).unwrap(),
                    );
                    token.sentence = SentenceId::new(0);
                    token
                })
                .collect(),
        )
    }

    #[test]
    fn test_rules_only_run() {
        let tagger = tagged(&[
            ("ὁ", "DET", "_"),
            ("λίθος", "NOUN", "Case=Nom|Gender=Masc|Number=Sing"),
            (".", "PUNCT", "_"),
        ]);
        let macronizer = Macronizer::new(MacronizerConfig::default(), Stores::default());
        let out = macronizer.macronize("ὁ λίθος.", &tagger).unwrap();

        assert_eq!(out.text, "ὁ λί^θος.");
        assert_eq!(out.diagnostics.tokens, 3);
        assert_eq!(out.diagnostics.resolved, 1);
        assert_eq!(out.diagnostics.skipped, 2);
        assert_eq!(out.diagnostics.ratio(), 1.0);
    }

    #[test]
    fn test_unicode_output() {
        let tagger = tagged(&[("λίθος", "NOUN", "Case=Nom")]);
        let config = MacronizerConfig {
            output: OutputFormat::Unicode,
            parallel: false,
            ..Default::default()
        };
        let out = Macronizer::new(config, Stores::default())
            .macronize("λίθος", &tagger)
            .unwrap();
        assert_eq!(out.text, to_unicode("λί^θος"));
    }

    #[test]
    fn test_submitted_spelling_is_kept() {
        // oxia iota, which NFC would replace with the tonos form
        let text = "ὁ λ\u{1F77}θος.";
        let tagger = tagged(&[
            ("ὁ", "DET", "_"),
            ("λ\u{1F77}θος", "NOUN", "Case=Nom|Gender=Masc|Number=Sing"),
            (".", "PUNCT", "_"),
        ]);
        let out = Macronizer::new(MacronizerConfig::default(), Stores::default())
            .macronize(text, &tagger)
            .unwrap();
        assert_eq!(out.text, "ὁ λ\u{1F77}^θος.");
        assert_eq!(macron_prosody::strip(&out.text), text);
        assert_eq!(out.diagnostics.dichrona_after, 0);
    }

    #[test]
    fn test_tagger_mismatch_is_counted() {
        let tagger = tagged(&[("λίθον", "NOUN", "Case=Acc")]);
        let out = Macronizer::new(MacronizerConfig::default(), Stores::default())
            .macronize("λίθος", &tagger)
            .unwrap();
        assert_eq!(out.text, "λίθος");
        assert_eq!(out.diagnostics.tagger_mismatches, 1);
    }
}
