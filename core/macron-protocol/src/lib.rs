#![no_std] // The protocol types carry no I/O

extern crate alloc;

// Enable std if the feature is active (for tests/tools)
#[cfg(feature = "std")]
extern crate std;

pub mod ids;
pub mod morphology;

// Re-export core types for convenience
pub use ids::{SentenceId, TokenId};
pub use morphology::*;

pub mod model;
pub use model::*;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;
    use rkyv::{from_bytes, to_bytes};

    #[test]
    fn test_enum_serialization() {
        let original = Case::Dative;

        let bytes = to_bytes::<_, 256>(&original).expect("Failed to serialize Case");
        let deserialized: Case = from_bytes(&bytes).expect("Failed to deserialize Case");

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_id_layout() {
        // TokenId(u32) should be exactly 4 bytes
        assert_eq!(core::mem::size_of::<TokenId>(), 4);
        assert_eq!(core::mem::size_of::<SentenceId>(), 4);
    }

    #[test]
    fn test_lexicon_archive_round_trip() {
        let archive = LexiconArchive {
            version: LexiconArchive::VERSION,
            name: "test".to_string(),
            entries: vec![LexEntry {
                key: "νεανίας".to_string(),
                candidates: vec!["νεα_νί^α_ς".to_string()],
            }],
        };

        let bytes = to_bytes::<_, 1024>(&archive).expect("Failed to serialize archive");
        let archived = rkyv::check_archived_root::<LexiconArchive>(&bytes).expect("invalid archive");

        assert_eq!(archived.version, LexiconArchive::VERSION);
        assert_eq!(archived.entries[0].key.as_str(), "νεανίας");
        assert_eq!(archived.entries[0].candidates[0].as_str(), "νεα_νί^α_ς");
    }

    #[test]
    fn test_parse_ud_features() {
        let flags = MorphFlags::parse_ud("Case=Acc|Gender=Fem|Number=Plur").unwrap();
        assert!(flags.has_case(Case::Accusative));
        assert!(flags.has_gender(Gender::Feminine));
        assert!(flags.has_number(Number::Plural));
        assert!(!flags.has_number(Number::Singular));
    }

    #[test]
    fn test_parse_positional_codes_and_lists() {
        let flags = MorphFlags::parse_ud("Case=d|Number=s|Gender=m,n").unwrap();
        assert!(flags.has_case(Case::Dative));
        assert!(flags.has_gender(Gender::Masculine));
        assert!(flags.has_gender(Gender::Neuter));
    }

    #[test]
    fn test_parse_ignores_unused_categories() {
        let flags = MorphFlags::parse_ud("Degree=Pos|Mood=Sub").unwrap();
        assert_eq!(flags, MorphFlags::SUBJUNCTIVE);
        assert!(flags.has_mood(Mood::Subjunctive));
        assert!(!flags.has_mood(Mood::Optative));
        assert_eq!(MorphFlags::parse_ud("_").unwrap(), MorphFlags::empty());
    }

    #[test]
    fn test_parse_rejects_bad_values() {
        assert_eq!(
            MorphFlags::parse_ud("Case=Xyz"),
            Err(FeatureError::UnknownValue { category: "Case" })
        );
        assert_eq!(MorphFlags::parse_ud("Case"), Err(FeatureError::Malformed));
    }

    #[test]
    fn test_upos_mapping() {
        assert_eq!(PartOfSpeech::from_upos("PROPN"), PartOfSpeech::ProperNoun);
        assert_eq!(PartOfSpeech::from_upos("X"), PartOfSpeech::Other);
        assert!(PartOfSpeech::Adjective.is_nominal());
        assert!(PartOfSpeech::Auxiliary.is_verbal());
    }
}
