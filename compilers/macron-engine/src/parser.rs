use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{multispace0, satisfy},
    combinator::map,
    IResult,
};

use macron_prosody::is_word_char;

/// Byte range of a scanned piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawToken<'a> {
    Word(&'a str),
    Punct(char),
}

/// Letters, combining marks, markers and the elision apostrophe.
fn is_word_piece(c: char) -> bool {
    is_word_char(c) || matches!(c, '\'' | '\u{2019}' | '\u{1FBD}')
}

fn token(input: &str) -> IResult<&str, RawToken<'_>> {
    alt((
        map(take_while1(is_word_piece), RawToken::Word),
        map(satisfy(|c| !c.is_whitespace()), RawToken::Punct),
    ))(input)
}

/// Splits `text` into words and single punctuation characters with their
/// byte spans. Whitespace separates tokens and is dropped.
pub fn scan(original: &str) -> Vec<(Span, RawToken<'_>)> {
    let mut input = original;
    let mut result = Vec::new();

    loop {
        let (rest, _) = match multispace0::<&str, nom::error::Error<&str>>(input) {
            Ok(res) => res,
            Err(_) => break,
        };
        input = rest;
        if input.is_empty() {
            break;
        }

        match token(input) {
            Ok((rest, tok)) => {
                let start = original.len() - input.len();
                let end = original.len() - rest.len();
                result.push((Span::new(start, end), tok));
                input = rest;
            }
            // every non-space char is a token, so this cannot loop
            Err(_) => break,
        }
    }
    result
}

/// The words of a text, in order, with elision marks kept.
pub fn words(text: &str) -> Vec<&str> {
    scan(text)
        .into_iter()
        .filter_map(|(_, tok)| match tok {
            RawToken::Word(w) => Some(w),
            RawToken::Punct(_) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_spans() {
        let input = "ὁ λίθος, καὶ";
        let tokens = scan(input);
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[1].1, RawToken::Word("λίθος"));
        assert_eq!(&input[tokens[1].0.start..tokens[1].0.end], "λίθος");
        assert_eq!(tokens[2].1, RawToken::Punct(','));
    }

    #[test]
    fn test_words_keep_markers_and_elision() {
        assert_eq!(words("λί^θος· δ' ἔχει"), ["λί^θος", "δ'", "ἔχει"]);
    }

    #[test]
    fn test_greek_punctuation() {
        assert_eq!(words("τί ποιεῖς\u{037E} ἦλθεν\u{0387}"), ["τί", "ποιεῖς", "ἦλθεν"]);
    }
}
