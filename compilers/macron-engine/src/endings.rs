//! Quantities fixed by inflectional endings.

use macron_prosody::letters::{is_marker, Letter};
use macron_prosody::{normalize, strip, Quantity, Word};
use macron_protocol::{Case, Gender, Mood, MorphFlags, Number, Token};
use unicode_normalization::char::is_combining_mark;

/// Lower-case base letters of a word, diacritics and markers dropped.
pub fn bases(word: &str) -> String {
    word.chars()
        .filter(|&c| c.is_alphabetic() && !is_combining_mark(c) && !is_marker(c))
        .map(|c| Letter::of_char(c).base)
        .collect()
}

/// Forces `quantity` on the last vowel when it is still an open dichronon.
fn force_last(current: &str, quantity: Quantity) -> Option<String> {
    let word = Word::parse(current);
    let last = word.syllables().len().checked_sub(1)?;
    word.is_open_dichronon(last)
        .then(|| word.render_with(&[(last, quantity)]))
}

/// Nominal endings:
/// * first-declension `-ας` (lemma in -α or -η) is long in the feminine
///   accusative plural and, for lemmas in -α, in the genitive singular;
/// * `-α` of a masculine or neuter is short;
/// * dative `-ι` and `-ιν` are short.
pub fn nominal(token: &Token, current: &str) -> Option<String> {
    if !token.pos.is_nominal() {
        return None;
    }
    let form = bases(&token.form);
    let lemma = bases(&token.lemma);
    let f = token.features;
    let feminine = f.has_gender(Gender::Feminine);

    let quantity = if form.ends_with("ας") && feminine {
        let acc_pl = f.has_case(Case::Accusative)
            && f.has_number(Number::Plural)
            && (lemma.ends_with('α') || lemma.ends_with('η'));
        let gen_sg = f.has_case(Case::Genitive) && f.has_number(Number::Singular) && lemma.ends_with('α');
        if acc_pl || gen_sg {
            Quantity::Long
        } else {
            return None;
        }
    } else if form.ends_with('α')
        && (f.has_gender(Gender::Masculine) || f.has_gender(Gender::Neuter))
        && !feminine
    {
        Quantity::Short
    } else if f.has_case(Case::Dative) && (form.ends_with('ι') || form.ends_with("ιν")) {
        Quantity::Short
    } else {
        return None;
    };
    force_last(current, quantity)
}

/// Athematic first person singular `-μι` has a short ι.
pub fn verbal(token: &Token, current: &str) -> Option<String> {
    if !token.pos.is_verbal() || !bases(&token.form).ends_with("μι") {
        return None;
    }
    let f = token.features;
    let persons = MorphFlags::FIRST_PERSON | MorphFlags::SECOND_PERSON | MorphFlags::THIRD_PERSON;
    let non_finite = f.has_mood(Mood::Infinitive) || f.has_mood(Mood::Participle);
    if non_finite || (f.intersects(persons) && !f.contains(MorphFlags::FIRST_PERSON)) {
        return None;
    }
    force_last(current, Quantity::Short)
}

/// Citation endings the different-ending pass knows, with the surface
/// endings whose first vowel always has the same quantity as the citation
/// ending's.
const PARADIGMS: &[(&str, &[&str])] = &[
    ("ας", &["αν", "α"]),
    ("ος", &[]),
    ("ον", &[]),
    ("α", &["αν"]),
    ("η", &[]),
];

/// The citation form a declined token is resolved through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub form: String,
    /// Letters shared by token and citation form.
    pub stem_letters: usize,
    /// The first vowel of the token's ending matches the citation ending.
    pub shared_vowel: bool,
}

impl Reference {
    /// Letter index mapping from the token onto the citation form.
    pub fn letter_map(&self, i: usize) -> Option<usize> {
        (i < self.stem_letters || (self.shared_vowel && i == self.stem_letters)).then_some(i)
    }
}

/// Stem plus citation ending for a nominal token whose own ending differs
/// from its lemma's.
pub fn citation_reference(token: &Token) -> Option<Reference> {
    if !token.pos.is_nominal() {
        return None;
    }
    let lemma = normalize(&strip(&token.lemma));
    let lemma_bases: Vec<char> = bases(&lemma).chars().collect();
    let form_bases: Vec<char> = bases(&token.form).chars().collect();

    let (ending, shared) = PARADIGMS.iter().find(|(ending, _)| {
        let ending: Vec<char> = ending.chars().collect();
        lemma_bases.ends_with(&ending) && lemma_bases.len() > ending.len()
    })?;
    let stem_letters = lemma_bases.len() - ending.chars().count();

    if form_bases == lemma_bases
        || form_bases.len() <= stem_letters
        || form_bases[..stem_letters] != lemma_bases[..stem_letters]
    {
        return None;
    }
    let surface: String = form_bases[stem_letters..].iter().collect();

    Some(Reference {
        form: lemma,
        stem_letters,
        shared_vowel: shared.contains(&surface.as_str()),
    })
}
