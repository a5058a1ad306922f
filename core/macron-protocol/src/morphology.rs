use rkyv::{Archive, Deserialize, Serialize};

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

use bitflags::bitflags;
use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
#[repr(u8)]
pub enum Case {
    Nominative = 0,
    Genitive = 1,
    Dative = 2,
    Accusative = 3,
    Vocative = 4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
#[repr(u8)]
pub enum Gender {
    Masculine = 0,
    Feminine = 1,
    Neuter = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
#[repr(u8)]
pub enum Number {
    Singular = 0,
    Plural = 1,
    Dual = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
#[repr(u8)]
pub enum Mood {
    Indicative = 0,
    Subjunctive = 1,
    Optative = 2,
    Imperative = 3,
    Infinitive = 4,
    Participle = 5,
}

/// Coarse part of speech, following the Universal Dependencies tag set
/// the tagger collaborator emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
#[repr(u8)]
pub enum PartOfSpeech {
    Noun = 0,
    ProperNoun = 1,
    Adjective = 2,
    Verb = 3,
    Auxiliary = 4,
    Adverb = 5,
    Determiner = 6,
    Adposition = 7,
    Conjunction = 8,
    Pronoun = 9,
    Particle = 10,
    Numeral = 11,
    Interjection = 12,
    Punctuation = 13,
    Other = 14,
}

impl PartOfSpeech {
    /// Maps a UPOS tag (`NOUN`, `PROPN`, `VERB`, ...). Unknown tags map to `Other`.
    pub fn from_upos(tag: &str) -> Self {
        match tag {
            "NOUN" => PartOfSpeech::Noun,
            "PROPN" => PartOfSpeech::ProperNoun,
            "ADJ" => PartOfSpeech::Adjective,
            "VERB" => PartOfSpeech::Verb,
            "AUX" => PartOfSpeech::Auxiliary,
            "ADV" => PartOfSpeech::Adverb,
            "DET" => PartOfSpeech::Determiner,
            "ADP" => PartOfSpeech::Adposition,
            "CCONJ" | "SCONJ" => PartOfSpeech::Conjunction,
            "PRON" => PartOfSpeech::Pronoun,
            "PART" => PartOfSpeech::Particle,
            "NUM" => PartOfSpeech::Numeral,
            "INTJ" => PartOfSpeech::Interjection,
            "PUNCT" => PartOfSpeech::Punctuation,
            _ => PartOfSpeech::Other,
        }
    }

    /// Nouns, proper nouns and adjectives: the parts of speech the nominal
    /// ending rules apply to.
    pub fn is_nominal(self) -> bool {
        matches!(
            self,
            PartOfSpeech::Noun | PartOfSpeech::ProperNoun | PartOfSpeech::Adjective
        )
    }

    pub fn is_verbal(self) -> bool {
        matches!(self, PartOfSpeech::Verb | PartOfSpeech::Auxiliary)
    }
}

bitflags! {
    /// Morphological features of one token. A category may carry several
    /// values at once when the tagger could not decide between them.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
    pub struct MorphFlags: u32 {
        // Case (Bits 0-4)
        const NOMINATIVE = 1;
        const GENITIVE = 1 << 1;
        const DATIVE = 1 << 2;
        const ACCUSATIVE = 1 << 3;
        const VOCATIVE = 1 << 4;

        // Gender (Bits 5-7)
        const MASCULINE = 1 << 5;
        const FEMININE = 1 << 6;
        const NEUTER = 1 << 7;

        // Number (Bits 8-10)
        const SINGULAR = 1 << 8;
        const PLURAL = 1 << 9;
        const DUAL = 1 << 10;

        // Person (Bits 11-13)
        const FIRST_PERSON = 1 << 11;
        const SECOND_PERSON = 1 << 12;
        const THIRD_PERSON = 1 << 13;

        // Voice (Bits 14-16)
        const ACTIVE = 1 << 14;
        const MIDDLE = 1 << 15;
        const PASSIVE = 1 << 16;

        // Tense (Bits 17-23)
        const PRESENT = 1 << 17;
        const IMPERFECT = 1 << 18;
        const FUTURE = 1 << 19;
        const AORIST = 1 << 20;
        const PERFECT = 1 << 21;
        const PLUPERFECT = 1 << 22;
        const FUTURE_PERFECT = 1 << 23;

        // Mood (Bits 24-29)
        const INDICATIVE = 1 << 24;
        const SUBJUNCTIVE = 1 << 25;
        const OPTATIVE = 1 << 26;
        const IMPERATIVE = 1 << 27;
        const INFINITIVE = 1 << 28;
        const PARTICIPLE = 1 << 29;

        const CASES = Self::NOMINATIVE.bits() | Self::GENITIVE.bits() | Self::DATIVE.bits()
            | Self::ACCUSATIVE.bits() | Self::VOCATIVE.bits();
        const GENDERS = Self::MASCULINE.bits() | Self::FEMININE.bits() | Self::NEUTER.bits();
        const NUMBERS = Self::SINGULAR.bits() | Self::PLURAL.bits() | Self::DUAL.bits();
    }
}

impl From<Case> for MorphFlags {
    fn from(case: Case) -> Self {
        match case {
            Case::Nominative => MorphFlags::NOMINATIVE,
            Case::Genitive => MorphFlags::GENITIVE,
            Case::Dative => MorphFlags::DATIVE,
            Case::Accusative => MorphFlags::ACCUSATIVE,
            Case::Vocative => MorphFlags::VOCATIVE,
        }
    }
}

impl From<Gender> for MorphFlags {
    fn from(gender: Gender) -> Self {
        match gender {
            Gender::Masculine => MorphFlags::MASCULINE,
            Gender::Feminine => MorphFlags::FEMININE,
            Gender::Neuter => MorphFlags::NEUTER,
        }
    }
}

impl From<Number> for MorphFlags {
    fn from(number: Number) -> Self {
        match number {
            Number::Singular => MorphFlags::SINGULAR,
            Number::Plural => MorphFlags::PLURAL,
            Number::Dual => MorphFlags::DUAL,
        }
    }
}

impl From<Mood> for MorphFlags {
    fn from(mood: Mood) -> Self {
        match mood {
            Mood::Indicative => MorphFlags::INDICATIVE,
            Mood::Subjunctive => MorphFlags::SUBJUNCTIVE,
            Mood::Optative => MorphFlags::OPTATIVE,
            Mood::Imperative => MorphFlags::IMPERATIVE,
            Mood::Infinitive => MorphFlags::INFINITIVE,
            Mood::Participle => MorphFlags::PARTICIPLE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureError {
    /// A `Name=Value` pair without the `=`.
    Malformed,
    /// A known category with a value we have no flag for.
    UnknownValue { category: &'static str },
}

impl fmt::Display for FeatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureError::Malformed => write!(f, "malformed feature pair"),
            FeatureError::UnknownValue { category } => {
                write!(f, "unknown value for feature category {}", category)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FeatureError {}

impl MorphFlags {
    /// Parses a UD feature column (`Case=Nom|Number=Sing`, `_` for none).
    ///
    /// Values may be given in full UD spelling or as the single-letter
    /// positional codes used by Perseus-derived treebanks (`Case=n`), and a
    /// category may list several comma-separated values. Categories the
    /// engine has no use for (`Degree`, `Aspect`, ...) are ignored.
    pub fn parse_ud(feats: &str) -> Result<Self, FeatureError> {
        let feats = feats.trim();
        if feats.is_empty() || feats == "_" {
            return Ok(MorphFlags::empty());
        }

        let mut flags = MorphFlags::empty();
        for pair in feats.split('|') {
            let (category, values) = pair.split_once('=').ok_or(FeatureError::Malformed)?;
            for value in values.split(',') {
                flags |= Self::parse_feature(category, value)?;
            }
        }
        Ok(flags)
    }

    /// Maps a single `category`/`value` pair to its flag.
    pub fn parse_feature(category: &str, value: &str) -> Result<Self, FeatureError> {
        let flag = match category {
            "Case" => match value {
                "Nom" | "n" | "nom" => MorphFlags::NOMINATIVE,
                "Gen" | "g" => MorphFlags::GENITIVE,
                "Dat" | "d" => MorphFlags::DATIVE,
                "Acc" | "a" | "acc" => MorphFlags::ACCUSATIVE,
                "Voc" | "v" => MorphFlags::VOCATIVE,
                _ => return Err(FeatureError::UnknownValue { category: "Case" }),
            },
            "Gender" => match value {
                "Masc" | "m" => MorphFlags::MASCULINE,
                "Fem" | "f" => MorphFlags::FEMININE,
                "Neut" | "n" => MorphFlags::NEUTER,
                _ => return Err(FeatureError::UnknownValue { category: "Gender" }),
            },
            "Number" => match value {
                "Sing" | "s" => MorphFlags::SINGULAR,
                "Plur" | "p" => MorphFlags::PLURAL,
                "Dual" | "d" => MorphFlags::DUAL,
                _ => return Err(FeatureError::UnknownValue { category: "Number" }),
            },
            "Person" => match value {
                "1" => MorphFlags::FIRST_PERSON,
                "2" => MorphFlags::SECOND_PERSON,
                "3" => MorphFlags::THIRD_PERSON,
                _ => return Err(FeatureError::UnknownValue { category: "Person" }),
            },
            "Voice" => match value {
                "Act" | "a" => MorphFlags::ACTIVE,
                "Mid" | "m" => MorphFlags::MIDDLE,
                "Pass" | "p" => MorphFlags::PASSIVE,
                "MidPass" | "e" => MorphFlags::MIDDLE | MorphFlags::PASSIVE,
                _ => return Err(FeatureError::UnknownValue { category: "Voice" }),
            },
            "Tense" => match value {
                "Pres" | "p" => MorphFlags::PRESENT,
                "Imp" | "Impf" | "Imperf" | "i" => MorphFlags::IMPERFECT,
                "Fut" | "f" => MorphFlags::FUTURE,
                "Aor" | "a" => MorphFlags::AORIST,
                "Perf" | "r" => MorphFlags::PERFECT,
                "Plup" | "Pqp" | "l" => MorphFlags::PLUPERFECT,
                "FutPerf" | "t" => MorphFlags::FUTURE_PERFECT,
                // UD "Past" does not distinguish imperfect from aorist.
                "Past" => MorphFlags::IMPERFECT | MorphFlags::AORIST,
                _ => return Err(FeatureError::UnknownValue { category: "Tense" }),
            },
            "Mood" => match value {
                "Ind" | "i" => MorphFlags::INDICATIVE,
                "Sub" | "s" | "subj" => MorphFlags::SUBJUNCTIVE,
                "Opt" | "o" => MorphFlags::OPTATIVE,
                "Imp" | "m" => MorphFlags::IMPERATIVE,
                "Inf" | "n" => MorphFlags::INFINITIVE,
                "Part" | "p" => MorphFlags::PARTICIPLE,
                _ => return Err(FeatureError::UnknownValue { category: "Mood" }),
            },
            "VerbForm" => match value {
                "Inf" => MorphFlags::INFINITIVE,
                "Part" => MorphFlags::PARTICIPLE,
                // Finite forms carry their mood separately.
                _ => MorphFlags::empty(),
            },
            _ => MorphFlags::empty(),
        };
        Ok(flag)
    }

    pub fn has_case(self, case: Case) -> bool {
        self.contains(case.into())
    }

    pub fn has_number(self, number: Number) -> bool {
        self.contains(number.into())
    }

    pub fn has_gender(self, gender: Gender) -> bool {
        self.contains(gender.into())
    }

    pub fn has_mood(self, mood: Mood) -> bool {
        self.contains(mood.into())
    }
}
