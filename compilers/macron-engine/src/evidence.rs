//! Independent sources of quantity evidence for one token.

use std::sync::Arc;

use macron_prosody::apply_accent_rules_with;
use macron_protocol::{Mood, Token};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::endings;
use crate::lexicon::{lookup_key, LexiconStore};

/// What one module knows about a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evidence {
    NoEvidence,
    Single(String),
    /// Several spellings the module cannot choose between.
    Ambiguous(Vec<String>),
}

impl Evidence {
    fn from_candidates(mut candidates: Vec<String>) -> Self {
        match candidates.len() {
            0 => Evidence::NoEvidence,
            1 => Evidence::Single(candidates.remove(0)),
            _ => Evidence::Ambiguous(candidates),
        }
    }
}

/// How the orchestrator treats [`Evidence::Ambiguous`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguityPolicy {
    /// Merge the first candidate.
    #[default]
    FirstCandidate,
    /// Merge nothing; hand the candidates to an external disambiguator.
    Propagate,
}

pub trait EvidenceModule: Send + Sync {
    fn name(&self) -> &'static str;

    /// Evidence for `token`, given the markup accumulated so far.
    fn resolve(&self, token: &Token, current: &str) -> Evidence;
}

/// Lookup in a lexical store. Store failures are logged and treated as a
/// miss.
pub struct LexiconModule {
    name: &'static str,
    store: Arc<dyn LexiconStore>,
}

impl LexiconModule {
    pub fn new(name: &'static str, store: Arc<dyn LexiconStore>) -> Self {
        Self { name, store }
    }
}

impl EvidenceModule for LexiconModule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn resolve(&self, token: &Token, _current: &str) -> Evidence {
        let key = lookup_key(&token.form);
        match self.store.lookup(&key) {
            Ok(candidates) => Evidence::from_candidates(candidates),
            Err(err) => {
                warn!(module = self.name, store = self.store.name(), %err, "store failed, treating as no evidence");
                Evidence::NoEvidence
            }
        }
    }
}

pub fn is_modal_particle(form: &str) -> bool {
    matches!(lookup_key(form).as_str(), "ἄν" | "ἂν")
}

/// ἄν is long in a clause with a subjunctive and no εἰ, short otherwise.
pub struct ModalParticle;

impl EvidenceModule for ModalParticle {
    fn name(&self) -> &'static str {
        "modal-particle"
    }

    fn resolve(&self, token: &Token, _current: &str) -> Evidence {
        if !is_modal_particle(&token.form) {
            return Evidence::NoEvidence;
        }
        let marker = if token.clause.has_subjunctive && !token.clause.has_conditional {
            '_'
        } else {
            '^'
        };
        let mut chars = token.form.chars();
        match chars.next() {
            Some(first) => Evidence::Single(format!("{}{}{}", first, marker, chars.as_str())),
            None => Evidence::NoEvidence,
        }
    }
}

pub struct NominalEndings;

impl EvidenceModule for NominalEndings {
    fn name(&self) -> &'static str {
        "nominal-endings"
    }

    fn resolve(&self, token: &Token, current: &str) -> Evidence {
        match endings::nominal(token, current) {
            Some(markup) => Evidence::Single(markup),
            None => Evidence::NoEvidence,
        }
    }
}

pub struct VerbalEndings;

impl EvidenceModule for VerbalEndings {
    fn name(&self) -> &'static str {
        "verbal-endings"
    }

    fn resolve(&self, token: &Token, current: &str) -> Evidence {
        match endings::verbal(token, current) {
            Some(markup) => Evidence::Single(markup),
            None => Evidence::NoEvidence,
        }
    }
}

pub struct AccentRules;

impl EvidenceModule for AccentRules {
    fn name(&self) -> &'static str {
        "accent-rules"
    }

    fn resolve(&self, token: &Token, current: &str) -> Evidence {
        let optative = token.features.has_mood(Mood::Optative);
        match apply_accent_rules_with(current, !optative) {
            Ok(markup) if markup != current => Evidence::Single(markup),
            _ => Evidence::NoEvidence,
        }
    }
}
