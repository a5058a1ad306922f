//! Which tagged tokens are worth resolving at all.

use std::collections::HashSet;

use macron_prosody::{count_open_dichrona, has_acute, has_grave};
use macron_protocol::Token;

use crate::config::MacronizerConfig;
use crate::evidence::is_modal_particle;
use crate::lexicon::lookup_key;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Accept,
    /// A spelling no Greek word has: a final sigma inside the word, two
    /// graves, or a grave beside an acute.
    Malformed,
    StopWord,
    /// The tagger produced a form that is not in the text.
    TaggerMismatch,
    /// Nothing to decide, punctuation included.
    NoDichrona,
}

pub fn is_malformed(form: &str) -> bool {
    let inner_final_sigma = form
        .char_indices()
        .any(|(i, c)| c == 'ς' && i + c.len_utf8() < form.len());
    let graves = form.chars().filter(|&c| has_grave(c)).count();
    let acutes = form.chars().filter(|&c| has_acute(c)).count();
    inner_final_sigma || graves > 1 || (graves > 0 && acutes > 0)
}

pub struct Screener<'a> {
    stop_words: HashSet<String>,
    words: HashSet<&'a str>,
    skip_without_dichrona: bool,
}

impl<'a> Screener<'a> {
    /// `words` is the word list of the text the tokens were tagged from.
    pub fn new(config: &MacronizerConfig, words: HashSet<&'a str>) -> Self {
        Self {
            stop_words: config.stop_words.iter().map(|w| lookup_key(w)).collect(),
            words,
            skip_without_dichrona: config.skip_without_dichrona,
        }
    }

    pub fn screen(&self, token: &Token) -> Screen {
        let form = token.form.as_str();
        if !form.chars().any(char::is_alphabetic) {
            return Screen::NoDichrona;
        }
        if is_malformed(form) {
            return Screen::Malformed;
        }
        if self.stop_words.contains(&lookup_key(form)) {
            return Screen::StopWord;
        }
        let particle = is_modal_particle(form);
        if !particle && !self.words.contains(form) {
            return Screen::TaggerMismatch;
        }
        if self.skip_without_dichrona && !particle && count_open_dichrona(form) == 0 {
            return Screen::NoDichrona;
        }
        Screen::Accept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macron_protocol::{MorphFlags, PartOfSpeech};

    fn token(form: &str) -> Token {
        Token::new(form, form, PartOfSpeech::Other, MorphFlags::empty())
    }

    #[test]
    fn test_malformed() {
        assert!(is_malformed("λίςθος"));
        assert!(is_malformed("καὶὰ"));
        assert!(is_malformed("τὸν λόγον"));
        assert!(!is_malformed("λίθος"));
        assert!(!is_malformed("καὶ"));
    }

    #[test]
    fn test_screen_order() {
        let config = MacronizerConfig {
            stop_words: vec!["καί".into()],
            ..Default::default()
        };
        let words: HashSet<&str> = ["λίθος", "καί", "τόν", "μῆλον"].into_iter().collect();
        let screener = Screener::new(&config, words);

        assert_eq!(screener.screen(&token("λίθος")), Screen::Accept);
        assert_eq!(screener.screen(&token("καί")), Screen::StopWord);
        assert_eq!(screener.screen(&token("χώρα")), Screen::TaggerMismatch);
        assert_eq!(screener.screen(&token("ἂν")), Screen::Accept);
        assert_eq!(screener.screen(&token("τόν")), Screen::NoDichrona);
        assert_eq!(screener.screen(&token("μῆλον")), Screen::NoDichrona);
        assert_eq!(screener.screen(&token(".")), Screen::NoDichrona);
    }

    #[test]
    fn test_dichrona_gate_can_be_lifted() {
        let config = MacronizerConfig {
            skip_without_dichrona: false,
            ..Default::default()
        };
        let screener = Screener::new(&config, ["τόν"].into_iter().collect());
        assert_eq!(screener.screen(&token("τόν")), Screen::Accept);
    }
}
