use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_while, take_while1},
    character::complete::{one_of, satisfy},
    combinator::{map, recognize},
    multi::many0,
    sequence::pair,
    IResult,
};

use grammar_protocol::Span;

/// Characters emitted as standalone punctuation tokens.
pub const PUNCTUATION: &str = ",;.!?:'\"()-–—[]{}";

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric()
}

fn is_joiner(c: char) -> bool {
    matches!(c, '\'' | '’' | '-')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawToken<'a> {
    Word(&'a str),
    Punct(char),
    /// Any other non-space character ("$", "@", "%").
    Symbol(char),
}

/// A word with internal apostrophes or hyphens ("o'clock", "well-known").
fn word(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(is_word_char),
        many0(pair(satisfy(is_joiner), take_while1(is_word_char))),
    ))(input)
}

fn raw_token(input: &str) -> IResult<&str, RawToken<'_>> {
    alt((
        map(word, RawToken::Word),
        map(one_of(PUNCTUATION), RawToken::Punct),
        map(satisfy(|c| !c.is_whitespace()), RawToken::Symbol),
    ))(input)
}

/// Byte length of a trailing "n't" clitic, if the word carries one.
fn negation_clitic(word: &str) -> Option<usize> {
    let tail_len = "n't".len();
    if word.len() <= tail_len || !word.is_char_boundary(word.len() - tail_len) {
        return None;
    }
    let tail = &word[word.len() - tail_len..];
    match tag_no_case::<_, _, nom::error::Error<&str>>("n't")(tail) {
        Ok(("", _)) => Some(tail_len),
        _ => None,
    }
}

/// Splits `input` into words, punctuation and symbols with byte spans.
/// Every non-space character lands in exactly one token.
/// Negation clitics are split off ("didn't" -> "did" + "n't").
pub fn scan(original_input: &str) -> Vec<(Span, RawToken<'_>)> {
    let mut input = original_input;
    let mut result = Vec::new();

    loop {
        let (next_input, _) = match take_while::<_, &str, nom::error::Error<&str>>(char::is_whitespace)(input) {
            Ok(res) => res,
            Err(_) => break,
        };
        input = next_input;

        if input.is_empty() {
            break;
        }

        let (next_input, token) = match raw_token(input) {
            Ok(res) => res,
            Err(_) => break,
        };
        let len = input.len() - next_input.len();
        let start = original_input.len() - input.len();

        match token {
            RawToken::Word(w) => match negation_clitic(w) {
                Some(tail) => {
                    let split = len - tail;
                    result.push((Span::new(start, start + split), RawToken::Word(&w[..split])));
                    result.push((Span::new(start + split, start + len), RawToken::Word(&w[split..])));
                }
                None => result.push((Span::new(start, start + len), token)),
            },
            RawToken::Punct(_) | RawToken::Symbol(_) => result.push((Span::new(start, start + len), token)),
        }
        input = next_input;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts<'a>(input: &'a str) -> Vec<&'a str> {
        scan(input).into_iter().map(|(s, _)| &input[s.start..s.end]).collect()
    }

    #[test]
    fn words_and_punctuation() {
        assert_eq!(
            texts("She had, once codified, come."),
            vec!["She", "had", ",", "once", "codified", ",", "come", "."]
        );
    }

    #[test]
    fn joined_words_stay_whole() {
        assert_eq!(texts("a well-known o'clock"), vec!["a", "well-known", "o'clock"]);
    }

    #[test]
    fn negation_is_split() {
        assert_eq!(texts("didn't go"), vec!["did", "n't", "go"]);
    }

    #[test]
    fn unicode_spaces_separate_tokens() {
        assert_eq!(texts("ten\u{a0}$ off"), vec!["ten", "$", "off"]);
    }

    #[test]
    fn spans_are_byte_offsets() {
        let input = "café ok";
        let spans: Vec<Span> = scan(input).into_iter().map(|(s, _)| s).collect();
        assert_eq!(spans, vec![Span::new(0, 5), Span::new(6, 8)]);
    }

    #[test]
    fn symbols_become_single_char_tokens() {
        assert_eq!(texts("a @ b"), vec!["a", "@", "b"]);
        let kinds: Vec<RawToken> = scan("$5").into_iter().map(|(_, t)| t).collect();
        assert_eq!(kinds, vec![RawToken::Symbol('$'), RawToken::Word("5")]);
    }

    #[test]
    fn no_character_is_dropped() {
        let input = "Pay $5 @ noon & 10% off #1 = 2+2 / x*y";
        let tokens = scan(input);
        for (at, c) in input.char_indices().filter(|(_, c)| !c.is_whitespace()) {
            assert!(
                tokens.iter().any(|(s, _)| s.start <= at && at < s.end),
                "{c:?} at {at} not covered"
            );
        }
        assert_eq!(
            texts(input),
            vec!["Pay", "$", "5", "@", "noon", "&", "10", "%", "off", "#", "1", "=", "2", "+", "2", "/", "x", "*", "y"]
        );
    }
}
