//! Read-only quantity lexicons.
//!
//! A lexicon maps the NFC, marker-free, case-preserving form of a word to
//! every markup spelling its source knows, in source order. It can be built
//! from a plain word list (one markup word per line), from TSV
//! (`form<TAB>markup`, where the markup may also be positional notation such
//! as `_3,^5`) or from an rkyv archive written by `lexicon-compiler`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use macron_prosody::{integrate_positional, normalize, strip, to_markup};
use macron_protocol::{LexEntry, LexiconArchive};
use rkyv::AlignedVec;

use crate::error::LexiconError;

/// A source of candidate markups for a lookup key.
pub trait LexiconStore: Send + Sync {
    fn name(&self) -> &str;

    /// Candidates for `key`, empty on a miss.
    fn lookup(&self, key: &str) -> Result<Vec<String>, LexiconError>;
}

/// The lookup key of a word or markup string.
pub fn lookup_key(word: &str) -> String {
    normalize(&strip(word))
}

#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    name: String,
    entries: HashMap<String, Vec<String>>,
}

impl Lexicon {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: HashMap::new(),
        }
    }

    /// Adds one markup spelling. Unicode macrons and breves are accepted and
    /// converted; duplicates are dropped.
    pub fn insert(&mut self, markup: &str) {
        let markup = normalize(&to_markup(markup.trim()));
        if markup.is_empty() {
            return;
        }
        let candidates = self.entries.entry(lookup_key(&markup)).or_default();
        if !candidates.contains(&markup) {
            candidates.push(markup);
        }
    }

    pub fn from_word_list(name: impl Into<String>, source: &str) -> Self {
        let mut lexicon = Self::new(name);
        for line in source.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            lexicon.insert(line);
        }
        lexicon
    }

    pub fn from_tsv(name: impl Into<String>, source: &str) -> Result<Self, LexiconError> {
        let mut lexicon = Self::new(name);

        for (idx, line) in source.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let malformed = |reason: &str| LexiconError::Malformed {
                name: lexicon.name.clone(),
                line: idx + 1,
                reason: reason.to_string(),
            };

            let (form, markup) = line
                .split_once('\t')
                .ok_or_else(|| malformed("expected form<TAB>markup"))?;
            let form = normalize(form.trim());
            let markup = markup.trim();

            let markup = if markup.starts_with(['_', '^']) && markup[1..].starts_with(|c: char| c.is_ascii_digit()) {
                integrate_positional(&form, markup).map_err(|e| malformed(&e.to_string()))?
            } else {
                normalize(&to_markup(markup))
            };

            if lookup_key(&markup) != form {
                return Err(malformed("markup does not spell the form"));
            }
            lexicon.insert(&markup);
        }
        Ok(lexicon)
    }

    /// Loads an archive written by `lexicon-compiler`, validating it first.
    /// Every candidate must strip back to its entry's key; `line` in a
    /// [`LexiconError::Malformed`] is then the 1-based entry index.
    pub fn from_archive_bytes(name: impl Into<String>, bytes: &[u8]) -> Result<Self, LexiconError> {
        let name = name.into();
        let mut aligned = AlignedVec::with_capacity(bytes.len());
        aligned.extend_from_slice(bytes);

        let archived = rkyv::check_archived_root::<LexiconArchive>(&aligned)
            .map_err(|_| LexiconError::InvalidArchive(name.clone()))?;

        if archived.version != LexiconArchive::VERSION {
            return Err(LexiconError::Version {
                name,
                found: archived.version,
                expected: LexiconArchive::VERSION,
            });
        }

        let mut entries = HashMap::with_capacity(archived.entries.len());
        for (idx, entry) in archived.entries.iter().enumerate() {
            let key = entry.key.as_str();
            if let Some(bad) = entry.candidates.iter().find(|c| lookup_key(c.as_str()) != key) {
                return Err(LexiconError::Malformed {
                    name,
                    line: idx + 1,
                    reason: format!("candidate {:?} does not spell key {:?}", bad.as_str(), key),
                });
            }
            let candidates = entry.candidates.iter().map(|c| c.as_str().to_string()).collect();
            entries.insert(key.to_string(), candidates);
        }
        Ok(Self { name, entries })
    }

    /// Loads a lexicon file, choosing the format by extension: `.rkyv` for
    /// an archive, `.tsv` for tab-separated pairs, anything else as a word
    /// list.
    pub fn load(path: &Path) -> Result<Self, LexiconError> {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "lexicon".to_string());
        let io = |source| LexiconError::Io {
            path: path.to_path_buf(),
            source,
        };

        match path.extension().and_then(|e| e.to_str()) {
            Some("rkyv") => Self::from_archive_bytes(name, &fs::read(path).map_err(io)?),
            Some("tsv") => Self::from_tsv(name, &fs::read_to_string(path).map_err(io)?),
            _ => Ok(Self::from_word_list(name, &fs::read_to_string(path).map_err(io)?)),
        }
    }

    /// The archive form, entries sorted by key so output is reproducible.
    pub fn to_archive(&self) -> LexiconArchive {
        let mut entries: Vec<LexEntry> = self
            .entries
            .iter()
            .map(|(key, candidates)| LexEntry {
                key: key.clone(),
                candidates: candidates.clone(),
            })
            .collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));

        LexiconArchive {
            version: LexiconArchive::VERSION,
            name: self.name.clone(),
            entries,
        }
    }

    /// Folds another lexicon in; candidates it adds come after ours.
    pub fn extend(&mut self, other: &Lexicon) {
        for candidates in other.entries.values() {
            for markup in candidates {
                self.insert(markup);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LexiconStore for Lexicon {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookup(&self, key: &str) -> Result<Vec<String>, LexiconError> {
        Ok(self.entries.get(key).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rkyv::ser::{serializers::AllocSerializer, Serializer};

    #[test]
    fn test_word_list_keys() {
        let lexicon = Lexicon::from_word_list("words", "# comment\nνεα_νί^α_ς\nλί^θος\n\nλί^θος\n");
        assert_eq!(lexicon.len(), 2);
        assert_eq!(lexicon.lookup("λίθος").unwrap(), vec!["λί^θος".to_string()]);
        assert!(lexicon.lookup("λιθος").unwrap().is_empty());
    }

    #[test]
    fn test_unicode_source_converted() {
        let lexicon = Lexicon::from_word_list("words", "νεᾱνῐ́ᾱς");
        assert_eq!(lexicon.lookup("νεανίας").unwrap(), vec!["νεα_νί^α_ς".to_string()]);
    }

    #[test]
    fn test_keys_preserve_case() {
        let lexicon = Lexicon::from_word_list("words", "Ἀ_θῆναι");
        assert!(lexicon.lookup("ἀθῆναι").unwrap().is_empty());
        assert_eq!(lexicon.lookup("Ἀθῆναι").unwrap().len(), 1);
    }

    #[test]
    fn test_tsv_with_positional_notation() {
        let lexicon = Lexicon::from_tsv("tsv", "νεανίας\t_3,^5,_6\nχώρα\tχώρα_\n").unwrap();
        assert_eq!(lexicon.lookup("νεανίας").unwrap(), vec!["νεα_νί^α_ς".to_string()]);
        assert_eq!(lexicon.lookup("χώρα").unwrap(), vec!["χώρα_".to_string()]);
    }

    #[test]
    fn test_tsv_rejects_mismatch() {
        let err = Lexicon::from_tsv("tsv", "χώρα\tχώρας_").unwrap_err();
        assert!(matches!(err, LexiconError::Malformed { line: 1, .. }));
        assert!(Lexicon::from_tsv("tsv", "no tab here").is_err());
    }

    #[test]
    fn test_archive_round_trip() {
        let mut lexicon = Lexicon::new("corpus");
        lexicon.insert("ἀ^νήρ");
        lexicon.insert("ἀ_νήρ");

        let mut serializer = AllocSerializer::<256>::default();
        serializer.serialize_value(&lexicon.to_archive()).unwrap();
        let bytes = serializer.into_serializer().into_inner();

        let loaded = Lexicon::from_archive_bytes("corpus", &bytes).unwrap();
        assert_eq!(loaded.lookup("ἀνήρ").unwrap(), vec!["ἀ^νήρ".to_string(), "ἀ_νήρ".to_string()]);
    }

    #[test]
    fn test_archive_candidate_must_spell_key() {
        let archive = LexiconArchive {
            version: LexiconArchive::VERSION,
            name: "corpus".into(),
            entries: vec![
                LexEntry {
                    key: "λίθος".into(),
                    candidates: vec!["λί^θος".into()],
                },
                LexEntry {
                    key: "χώρα".into(),
                    candidates: vec!["χώρα_".into(), "χώρας_".into()],
                },
            ],
        };
        let mut serializer = AllocSerializer::<256>::default();
        serializer.serialize_value(&archive).unwrap();
        let bytes = serializer.into_serializer().into_inner();

        let err = Lexicon::from_archive_bytes("corpus", &bytes).unwrap_err();
        assert!(matches!(err, LexiconError::Malformed { line: 2, .. }), "{err}");
    }

    #[test]
    fn test_garbage_archive_rejected() {
        let err = Lexicon::from_archive_bytes("junk", &[1, 2, 3]).unwrap_err();
        assert!(matches!(err, LexiconError::InvalidArchive(_)));
    }
}
