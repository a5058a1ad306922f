//! Per-token resolution: fold the evidence modules in priority order, then
//! retry through transformed variants while open dichrona remain.

use std::sync::Arc;

use macron_prosody::{count_open_dichrona, has_markers, marks_diphthong, merge, strip, MarkupError};
use macron_protocol::Token;
use tracing::{debug, warn};

use crate::error::EngineError;
use crate::evidence::{
    AccentRules, AmbiguityPolicy, Evidence, EvidenceModule, LexiconModule, ModalParticle, NominalEndings,
    VerbalEndings,
};
use crate::lexicon::LexiconStore;
use crate::passes::{default_passes, PassState, RetryPass};

/// Nested entries allowed on one path of the pass tree, the base call
/// included. Sibling passes do not count against each other.
pub const MAX_DEPTH: u32 = 10;

/// Candidates an ambiguous module left for an external disambiguator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingChoice {
    pub module: &'static str,
    pub candidates: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub form: String,
    pub markup: String,
    pub pending: Vec<PendingChoice>,
    /// Calls made for this token, the base call included.
    pub entries: u32,
}

impl Resolution {
    pub fn is_marked(&self) -> bool {
        has_markers(&self.markup)
    }
}

/// The lexical stores the standard module list consults, by priority.
#[derive(Clone, Default)]
pub struct Stores {
    pub overrides: Option<Arc<dyn LexiconStore>>,
    pub dictionary: Option<Arc<dyn LexiconStore>>,
    pub corpus: Option<Arc<dyn LexiconStore>>,
}

pub struct Orchestrator {
    modules: Vec<Box<dyn EvidenceModule>>,
    passes: Vec<Box<dyn RetryPass>>,
    policy: AmbiguityPolicy,
    max_depth: u32,
}

/// Bookkeeping shared by every recursive call for one token.
#[derive(Default)]
struct Call {
    entries: u32,
    pending: Vec<PendingChoice>,
}

impl Orchestrator {
    pub fn new(modules: Vec<Box<dyn EvidenceModule>>, policy: AmbiguityPolicy) -> Self {
        Self {
            modules,
            passes: default_passes(),
            policy,
            max_depth: MAX_DEPTH,
        }
    }

    /// Overrides, modal particle, dictionary, corpus, nominal endings, verbal
    /// endings, accent rules. Absent stores are left out.
    pub fn standard(stores: Stores, policy: AmbiguityPolicy) -> Self {
        let mut modules: Vec<Box<dyn EvidenceModule>> = Vec::new();
        if let Some(store) = stores.overrides {
            modules.push(Box::new(LexiconModule::new("overrides", store)));
        }
        modules.push(Box::new(ModalParticle));
        if let Some(store) = stores.dictionary {
            modules.push(Box::new(LexiconModule::new("dictionary", store)));
        }
        if let Some(store) = stores.corpus {
            modules.push(Box::new(LexiconModule::new("corpus", store)));
        }
        modules.push(Box::new(NominalEndings));
        modules.push(Box::new(VerbalEndings));
        modules.push(Box::new(AccentRules));
        Self::new(modules, policy)
    }

    /// Replaces the retry passes; they run in the given order.
    pub fn with_passes(mut self, passes: Vec<Box<dyn RetryPass>>) -> Self {
        self.passes = passes;
        self
    }

    pub fn policy(&self) -> AmbiguityPolicy {
        self.policy
    }

    pub fn resolve(&self, token: &Token) -> Result<Resolution, EngineError> {
        let mut call = Call::default();
        let markup = self.resolve_in(token, PassState::base(), &mut call)?;

        Ok(Resolution {
            form: token.form.clone(),
            markup,
            pending: call.pending,
            entries: call.entries,
        })
    }

    fn resolve_in(&self, token: &Token, state: PassState, call: &mut Call) -> Result<String, EngineError> {
        call.entries += 1;
        if state.depth >= self.max_depth {
            warn!(token = %token.form, depth = state.depth, "recursion ceiling reached");
            return Err(EngineError::DepthExceeded {
                token: token.form.clone(),
                depth: state.depth,
            });
        }

        let mut accumulated = token.form.clone();
        if count_open_dichrona(&accumulated) == 0 {
            return Ok(accumulated);
        }

        for module in &self.modules {
            let output = match module.resolve(token, &accumulated) {
                Evidence::NoEvidence => continue,
                Evidence::Single(markup) => markup,
                Evidence::Ambiguous(candidates) => match self.policy {
                    AmbiguityPolicy::FirstCandidate => match candidates.into_iter().next() {
                        Some(first) => first,
                        None => continue,
                    },
                    AmbiguityPolicy::Propagate => {
                        call.pending.push(PendingChoice {
                            module: module.name(),
                            candidates,
                        });
                        continue;
                    }
                },
            };
            accumulated = checked_merge(module.name(), token, &output, &accumulated)?;
            debug!(module = module.name(), token = %token.form, markup = %accumulated, depth = state.depth, "module hit");
            if count_open_dichrona(&accumulated) == 0 {
                return Ok(accumulated);
            }
        }

        for pass in &self.passes {
            let Some(variant) = pass.variant(token, &state) else {
                continue;
            };
            debug!(pass = pass.name(), token = %token.form, variant = %variant.form, "entering pass");

            let resolved = self.resolve_in(&variant, state.enter(pass.pass(), pass.flag()), call)?;
            if !has_markers(&resolved) {
                continue;
            }
            let mapped = match pass.map_back(token, &resolved) {
                Ok(mapped) => mapped,
                Err(err) => {
                    debug!(pass = pass.name(), token = %token.form, %err, "could not map variant back");
                    continue;
                }
            };
            accumulated = checked_merge(pass.name(), token, &mapped, &accumulated)?;
            if count_open_dichrona(&accumulated) == 0 {
                break;
            }
        }
        Ok(accumulated)
    }
}

/// Merges one module's output and checks that the letters are untouched and
/// no diphthong carries a marker.
fn checked_merge(module: &'static str, token: &Token, output: &str, accumulated: &str) -> Result<String, EngineError> {
    let merged = merge(output, accumulated).map_err(|source| EngineError::PervertedToken {
        module,
        token: token.form.clone(),
        source,
    })?;

    if strip(&merged) != token.form {
        return Err(EngineError::PervertedToken {
            module,
            token: token.form.clone(),
            source: MarkupError::Perverted {
                newer: merged,
                older: token.form.clone(),
            },
        });
    }
    if marks_diphthong(&merged) {
        return Err(EngineError::MacronizedDiphthong {
            module,
            token: token.form.clone(),
            markup: merged,
        });
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::Lexicon;
    use crate::passes::{Pass, PassFlags};
    use macron_protocol::{MorphFlags, PartOfSpeech};
    use proptest::prelude::*;

    fn noun(form: &str) -> Token {
        Token::new(form, form, PartOfSpeech::Noun, MorphFlags::empty())
    }

    fn tagged(form: &str, lemma: &str, pos: PartOfSpeech, feats: &str) -> Token {
        Token::new(form, lemma, pos, MorphFlags::parse_ud(feats).unwrap())
    }

    fn dictionary(words: &str) -> Stores {
        Stores {
            dictionary: Some(Arc::new(Lexicon::from_word_list("dictionary", words))),
            ..Stores::default()
        }
    }

    struct Fixed(&'static str, &'static str);

    impl EvidenceModule for Fixed {
        fn name(&self) -> &'static str {
            self.0
        }

        fn resolve(&self, _token: &Token, _current: &str) -> Evidence {
            Evidence::Single(self.1.to_string())
        }
    }

    /// Always applies and never records a flag.
    struct Cycle;

    impl RetryPass for Cycle {
        fn name(&self) -> &'static str {
            "cycle"
        }

        fn pass(&self) -> Pass {
            Pass::Lemma
        }

        fn flag(&self) -> PassFlags {
            PassFlags::empty()
        }

        fn variant(&self, token: &Token, _state: &PassState) -> Option<Token> {
            Some(token.clone())
        }

        fn map_back(&self, _token: &Token, resolved: &str) -> Result<String, MarkupError> {
            Ok(resolved.to_string())
        }
    }

    #[test]
    fn test_dictionary_then_rules() {
        let orchestrator = Orchestrator::standard(dictionary("νεα_νί^ας"), AmbiguityPolicy::FirstCandidate);
        let resolution = orchestrator.resolve(&noun("νεανίας")).unwrap();
        // the dictionary leaves the ultima open; nothing else decides it
        assert_eq!(resolution.markup, "νεα_νί^ας");
        assert_eq!(resolution.entries, 1);
    }

    #[test]
    fn test_accent_rules_alone() {
        let orchestrator = Orchestrator::standard(Stores::default(), AmbiguityPolicy::FirstCandidate);
        assert_eq!(orchestrator.resolve(&noun("λίθος")).unwrap().markup, "λί^θος");
        assert_eq!(orchestrator.resolve(&noun("θάλαττα")).unwrap().markup, "θάλαττα^");
    }

    #[test]
    fn test_no_dichrona_short_circuits() {
        let orchestrator = Orchestrator::standard(Stores::default(), AmbiguityPolicy::FirstCandidate);
        let resolution = orchestrator.resolve(&noun("λόγος")).unwrap();
        assert_eq!(resolution.markup, "λόγος");
        assert!(!resolution.is_marked());
    }

    #[test]
    fn test_oxytonize_pass() {
        let orchestrator = Orchestrator::standard(dictionary("κα^λά^"), AmbiguityPolicy::FirstCandidate);
        let resolution = orchestrator.resolve(&noun("καλὰ")).unwrap();
        assert_eq!(resolution.markup, "κα^λὰ^");
        assert_eq!(resolution.entries, 2);
    }

    #[test]
    fn test_decapitalize_pass() {
        let orchestrator = Orchestrator::standard(dictionary("ἰ_σχυρός"), AmbiguityPolicy::FirstCandidate);
        let resolution = orchestrator.resolve(&noun("Ἰσχυρός")).unwrap();
        assert_eq!(resolution.markup, "Ἰ_σχυρός");
        assert_eq!(resolution.entries, 2);
    }

    #[test]
    fn test_different_ending_pass() {
        let orchestrator = Orchestrator::standard(dictionary("νεα_νί^α_ς"), AmbiguityPolicy::FirstCandidate);
        let token = tagged("νεανίαν", "νεανίας", PartOfSpeech::Noun, "Case=Acc|Gender=Masc|Number=Sing");
        let resolution = orchestrator.resolve(&token).unwrap();
        assert_eq!(resolution.markup, "νεα_νί^α_ν");
    }

    #[test]
    fn test_capitalize_pass() {
        let orchestrator = Orchestrator::standard(dictionary("Ἰ_ά_σων"), AmbiguityPolicy::FirstCandidate);
        let token = tagged("ἰάσων", "ἰάσων", PartOfSpeech::ProperNoun, "Case=Nom|Number=Sing");
        let resolution = orchestrator.resolve(&token).unwrap();
        assert_eq!(resolution.markup, "ἰ_ά_σων");
        assert_eq!(resolution.entries, 2);
    }

    #[test]
    fn test_wide_pass_tree_stays_under_ceiling() {
        // capital, grave and an oblique case: every pass applies somewhere
        let orchestrator = Orchestrator::standard(dictionary("Κα_ϊκός"), AmbiguityPolicy::FirstCandidate);
        let token = tagged("Καϊκὸν", "Καϊκός", PartOfSpeech::ProperNoun, "Case=Acc|Gender=Masc|Number=Sing");
        let resolution = orchestrator.resolve(&token).unwrap();
        assert!(resolution.markup.starts_with("Κα_ϊ"), "{}", resolution.markup);
        assert_eq!(strip(&resolution.markup), token.form);
    }

    #[test]
    fn test_ambiguity_policies() {
        let stores = dictionary("ἀ^νήρ\nἀ_νήρ");
        let first = Orchestrator::standard(stores.clone(), AmbiguityPolicy::FirstCandidate);
        assert_eq!(first.resolve(&noun("ἀνήρ")).unwrap().markup, "ἀ^νήρ");

        let propagate = Orchestrator::standard(stores, AmbiguityPolicy::Propagate);
        let resolution = propagate.resolve(&noun("ἀνήρ")).unwrap();
        assert_eq!(resolution.markup, "ἀνήρ");
        assert_eq!(resolution.pending.len(), 1);
        assert_eq!(resolution.pending[0].module, "dictionary");
        assert_eq!(resolution.pending[0].candidates.len(), 2);
    }

    #[test]
    fn test_perverted_token_is_fatal() {
        let orchestrator = Orchestrator::new(vec![Box::new(Fixed("broken", "λί^θου"))], AmbiguityPolicy::FirstCandidate);
        let err = orchestrator.resolve(&noun("λίθος")).unwrap_err();
        assert!(matches!(err, EngineError::PervertedToken { module: "broken", .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_marked_diphthong_is_fatal() {
        let orchestrator = Orchestrator::new(vec![Box::new(Fixed("broken", "παι_δί^α"))], AmbiguityPolicy::FirstCandidate);
        let err = orchestrator.resolve(&noun("παιδία")).unwrap_err();
        assert!(matches!(err, EngineError::MacronizedDiphthong { module: "broken", .. }));
    }

    #[test]
    fn test_depth_ceiling() {
        let orchestrator =
            Orchestrator::new(Vec::new(), AmbiguityPolicy::FirstCandidate).with_passes(vec![Box::new(Cycle)]);
        let err = orchestrator.resolve(&noun("λίθος")).unwrap_err();
        // ten calls on one path, the base call included; the next is refused
        assert!(matches!(err, EngineError::DepthExceeded { depth: MAX_DEPTH, .. }));
        assert!(!err.is_fatal());
    }

    const WORDS: &[(&str, &str, PartOfSpeech, &str)] = &[
        ("λίθος", "λίθος", PartOfSpeech::Noun, "Case=Nom|Gender=Masc|Number=Sing"),
        ("Λίθος", "λίθος", PartOfSpeech::Noun, "Case=Nom|Gender=Masc|Number=Sing"),
        ("καλὰ", "καλός", PartOfSpeech::Adjective, "Case=Nom|Gender=Neut|Number=Plur"),
        ("Ἰσχυρὸν", "ἰσχυρός", PartOfSpeech::Adjective, "Case=Acc|Gender=Masc|Number=Sing"),
        ("νεανίαν", "νεανίας", PartOfSpeech::Noun, "Case=Acc|Gender=Masc|Number=Sing"),
        ("Καϊκὸν", "Καϊκός", PartOfSpeech::ProperNoun, "Case=Acc|Gender=Masc|Number=Sing"),
        ("χώραν", "χώρα", PartOfSpeech::Noun, "Case=Acc|Gender=Fem|Number=Sing"),
        ("ἰάσων", "ἰάσων", PartOfSpeech::ProperNoun, "Case=Nom|Number=Sing"),
    ];

    proptest! {
        #[test]
        fn test_resolution_only_adds_markers(index in 0..WORDS.len()) {
            let stores = dictionary("λί^θος\nκα^λά^\nἰ_σχυρός\nνεα_νί^α_ς\nΚα_ϊκός\nχώρα_\nἸ_ά_σων");
            let orchestrator = Orchestrator::standard(stores, AmbiguityPolicy::FirstCandidate);
            let (form, lemma, pos, feats) = WORDS[index];
            let resolution = orchestrator.resolve(&tagged(form, lemma, pos, feats)).unwrap();
            prop_assert_eq!(strip(&resolution.markup), form);
            prop_assert!(!marks_diphthong(&resolution.markup));
        }
    }
}
