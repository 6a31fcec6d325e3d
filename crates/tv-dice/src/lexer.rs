//! Tokenizer for dice notation.
//!
//! Whitespace is removed before lexing, so `2 d 6` and `2d6` produce the same
//! tokens. Spans are mapped back onto the original input.

use std::ops::Range;

use logos::Logos;

/// A notation token. Keywords are matched case-insensitively.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token {
    #[regex("[0-9]+")]
    Number,

    #[token("d", ignore(ascii_case))]
    Dice,

    #[token("kh", ignore(ascii_case))]
    KeepHighest,

    #[token("kl", ignore(ascii_case))]
    KeepLowest,

    #[token("dh", ignore(ascii_case))]
    DropHighest,

    #[token("dl", ignore(ascii_case))]
    DropLowest,

    /// A bare `k` that did not start a known operation.
    #[token("k", ignore(ascii_case))]
    Keep,

    #[token("!")]
    Bang,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    /// A character outside the grammar. Lexing stops after the first one.
    Unknown,
}

/// A token with its source text and its span in the original input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Lexeme {
    pub token: Token,
    pub text: String,
    pub span: Range<usize>,
}

impl Lexeme {
    /// Quoted source text, for error messages.
    pub fn quoted(&self) -> String {
        format!("'{}'", self.text)
    }
}

/// Lexer output: the token stream plus the offset just past the last
/// non-whitespace character of the input.
#[derive(Debug, Clone)]
pub(crate) struct Lexed {
    pub lexemes: Vec<Lexeme>,
    pub end: usize,
}

/// Strip whitespace and tokenize.
pub(crate) fn lex(input: &str) -> Lexed {
    let mut compact = String::with_capacity(input.len());
    // Original byte offset of every byte in `compact`.
    let mut origin = Vec::with_capacity(input.len());
    for (offset, ch) in input.char_indices().filter(|(_, c)| !c.is_whitespace()) {
        compact.push(ch);
        origin.extend(offset..offset + ch.len_utf8());
    }
    let end = origin.last().map_or(0, |&last| last + 1);
    let to_original = |span: Range<usize>| origin[span.start]..origin[span.end - 1] + 1;

    let mut lexemes = Vec::new();
    let mut lexer = Token::lexer(&compact);
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(token) => lexemes.push(Lexeme {
                token,
                text: lexer.slice().to_string(),
                span: to_original(span),
            }),
            Err(()) => {
                if let Some(ch) = compact[span.start..].chars().next() {
                    let char_span = span.start..span.start + ch.len_utf8();
                    lexemes.push(Lexeme {
                        token: Token::Unknown,
                        text: ch.to_string(),
                        span: to_original(char_span),
                    });
                }
                break;
            }
        }
    }

    Lexed { lexemes, end }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        lex(input).lexemes.into_iter().map(|l| l.token).collect()
    }

    #[test]
    fn lex_full_expression() {
        assert_eq!(
            tokens("4d6kh3+2"),
            vec![
                Token::Number,
                Token::Dice,
                Token::Number,
                Token::KeepHighest,
                Token::Number,
                Token::Plus,
                Token::Number,
            ]
        );
    }

    #[test]
    fn keywords_ignore_case() {
        assert_eq!(
            tokens("2D6DL1"),
            vec![
                Token::Number,
                Token::Dice,
                Token::Number,
                Token::DropLowest,
                Token::Number,
            ]
        );
    }

    #[test]
    fn whitespace_is_removed_before_lexing() {
        let lexed = lex(" 1 0 d 6 ");
        assert_eq!(lexed.lexemes[0].text, "10");
        assert_eq!(lexed.lexemes[0].span, 1..4);
        assert_eq!(lexed.lexemes[1].span, 5..6);
        assert_eq!(lexed.end, 8);
    }

    #[test]
    fn stops_at_first_unknown_character() {
        let lexed = lex("2d6xyz");
        let last = lexed.lexemes.last().unwrap();
        assert_eq!(last.token, Token::Unknown);
        assert_eq!(last.text, "x");
        assert_eq!(last.span, 3..4);
        assert_eq!(lexed.lexemes.len(), 4);
    }

    #[test]
    fn unknown_multibyte_character_spans_whole_char() {
        let lexed = lex("d6é");
        let last = lexed.lexemes.last().unwrap();
        assert_eq!(last.text, "é");
        assert_eq!(last.span, 2..4);
    }

    #[test]
    fn empty_input() {
        let lexed = lex("   ");
        assert!(lexed.lexemes.is_empty());
        assert_eq!(lexed.end, 0);
    }
}
