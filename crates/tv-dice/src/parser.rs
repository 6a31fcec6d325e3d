//! Notation parser.
//!
//! Grammar, after whitespace removal:
//!
//! ```text
//! expr   := count? 'd' sides clause*
//! clause := '!' | ('kh'|'kl'|'dh'|'dl') digits | ('+'|'-') digits
//! ```
//!
//! Clauses may repeat in any order. A later operation replaces an earlier
//! one, and likewise for the modifier.

use std::ops::Range;

use tracing::debug;

use crate::error::NotationError;
use crate::expression::{Expression, MAX_DICE, Operation};
use crate::lexer::{Lexeme, Token, lex};

/// Parse dice notation into a validated [`Expression`].
///
/// ```
/// use tv_dice::{Operation, parse};
///
/// let expr = parse("4d6kh3+2").unwrap();
/// assert_eq!(expr.count, 4);
/// assert_eq!(expr.operation, Some(Operation::KeepHighest(3)));
/// assert_eq!(expr.modifier, 2);
/// ```
pub fn parse(input: &str) -> Result<Expression, NotationError> {
    let lexed = lex(input);
    if lexed.lexemes.is_empty() {
        return Err(NotationError::Empty);
    }
    Parser {
        lexemes: &lexed.lexemes,
        pos: 0,
        end: lexed.end,
    }
    .expression()
}

struct Parser<'a> {
    lexemes: &'a [Lexeme],
    pos: usize,
    end: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Lexeme> {
        self.lexemes.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'a Lexeme> {
        let lexeme = self.lexemes.get(self.pos)?;
        self.pos += 1;
        Some(lexeme)
    }

    /// Consume a number token if one is next.
    fn number(&mut self) -> Option<&'a Lexeme> {
        match self.peek() {
            Some(l) if l.token == Token::Number => self.advance(),
            _ => None,
        }
    }

    fn end_span(&self) -> Range<usize> {
        self.end..self.end
    }

    /// What sits at the cursor, for "found ..." messages.
    fn found(&self) -> (Range<usize>, String) {
        match self.peek() {
            Some(l) => (l.span.clone(), l.quoted()),
            None => (self.end_span(), "end of input".to_string()),
        }
    }

    fn expression(mut self) -> Result<Expression, NotationError> {
        let count = match self.number() {
            Some(lexeme) => parse_count(lexeme)?,
            None => 1,
        };

        self.separator()?;
        let sides = self.sides()?;
        let mut expr = Expression::new(count, sides);

        while let Some(lexeme) = self.advance() {
            match lexeme.token {
                Token::Bang => expr.advantage = true,
                Token::KeepHighest | Token::KeepLowest | Token::DropHighest | Token::DropLowest => {
                    let op = self.operation(lexeme)?;
                    if let Some(previous) = expr.operation.replace(op) {
                        debug!(%previous, replacement = %op, "operation clause overridden");
                    }
                }
                Token::Keep | Token::Dice => return Err(self.unknown_operation(lexeme)),
                Token::Plus | Token::Minus => {
                    let modifier = self.modifier(lexeme)?;
                    if expr.modifier != 0 {
                        debug!(previous = expr.modifier, replacement = modifier, "modifier clause overridden");
                    }
                    expr.modifier = modifier;
                }
                Token::Number | Token::Unknown => {
                    // Report the first character of whatever is out of place.
                    let ch = lexeme.text.chars().next().unwrap_or_default();
                    let start = lexeme.span.start;
                    return Err(NotationError::UnexpectedCharacter {
                        span: start..start + ch.len_utf8(),
                        ch,
                    });
                }
            }
        }

        Ok(expr)
    }

    fn separator(&mut self) -> Result<(), NotationError> {
        match self.peek().map(|l| l.token) {
            Some(Token::Dice) => {
                self.pos += 1;
                Ok(())
            }
            // `dh`/`dl` here is the separator followed by a letter where the sides belong.
            Some(Token::DropHighest | Token::DropLowest) => {
                let lexeme = &self.lexemes[self.pos];
                let span = lexeme.span.end - 1..lexeme.span.end;
                Err(NotationError::MissingSides {
                    span,
                    found: format!("'{}'", &lexeme.text[1..]),
                })
            }
            _ => {
                let (span, found) = self.found();
                Err(NotationError::MissingSeparator { span, found })
            }
        }
    }

    fn sides(&mut self) -> Result<u32, NotationError> {
        let Some(lexeme) = self.number() else {
            let (span, found) = self.found();
            return Err(NotationError::MissingSides { span, found });
        };
        let sides = lexeme
            .text
            .parse::<u32>()
            .map_err(|_| NotationError::SidesOutOfRange {
                span: lexeme.span.clone(),
            })?;
        if sides < 2 {
            return Err(NotationError::TooFewSides {
                span: lexeme.span.clone(),
            });
        }
        Ok(sides)
    }

    fn operation(&mut self, keyword: &Lexeme) -> Result<Operation, NotationError> {
        let Some(digits) = self.number() else {
            return Err(NotationError::MissingOperationCount {
                span: keyword.span.clone(),
                op: keyword.text.to_ascii_lowercase(),
            });
        };
        let n = digits
            .text
            .parse::<u32>()
            .map_err(|_| NotationError::OperationCountOutOfRange {
                span: digits.span.clone(),
            })?;
        if n == 0 {
            return Err(NotationError::ZeroOperationCount {
                span: digits.span.clone(),
            });
        }
        Ok(match keyword.token {
            Token::KeepHighest => Operation::KeepHighest(n),
            Token::KeepLowest => Operation::KeepLowest(n),
            Token::DropHighest => Operation::DropHighest(n),
            _ => Operation::DropLowest(n),
        })
    }

    /// A bare `k` or `d` in clause position, reported together with the
    /// character after it.
    fn unknown_operation(&self, keyword: &Lexeme) -> NotationError {
        let mut found = keyword.text.to_ascii_lowercase();
        let mut span = keyword.span.clone();
        if let Some(next) = self.peek() {
            if let Some(ch) = next.text.chars().next() {
                found.push(ch);
                span.end = next.span.start + ch.len_utf8();
            }
        }
        NotationError::UnknownOperation {
            span,
            found: format!("'{found}'"),
        }
    }

    fn modifier(&mut self, sign: &Lexeme) -> Result<i32, NotationError> {
        let sign_char = if sign.token == Token::Minus { '-' } else { '+' };
        let Some(digits) = self.number() else {
            return Err(NotationError::MissingModifier {
                span: sign.span.clone(),
                sign: sign_char,
            });
        };
        let span = sign.span.start..digits.span.end;
        let magnitude = digits
            .text
            .parse::<i64>()
            .map_err(|_| NotationError::ModifierOutOfRange { span: span.clone() })?;
        let value = if sign_char == '-' { -magnitude } else { magnitude };
        i32::try_from(value).map_err(|_| NotationError::ModifierOutOfRange { span })
    }
}

fn parse_count(lexeme: &Lexeme) -> Result<u32, NotationError> {
    let too_large = || NotationError::CountTooLarge {
        span: lexeme.span.clone(),
        max: MAX_DICE,
    };
    let count = lexeme.text.parse::<u32>().map_err(|_| too_large())?;
    if count < 1 {
        return Err(NotationError::CountTooSmall {
            span: lexeme.span.clone(),
        });
    }
    if count > MAX_DICE {
        return Err(too_large());
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_basic() {
        let cases = [
            ("2d6", 2, 6),
            ("d20", 1, 20),
            ("4d8", 4, 8),
            ("1d12", 1, 12),
            ("10d10", 10, 10),
            ("100d6", 100, 6),
            ("1000d2", 1000, 2),
        ];
        for (notation, count, sides) in cases {
            let expr = parse(notation).unwrap();
            assert_eq!((expr.count, expr.sides), (count, sides), "{notation}");
            assert_eq!(expr.modifier, 0);
            assert_eq!(expr.operation, None);
            assert!(!expr.advantage);
        }
    }

    #[test]
    fn parse_modifiers() {
        let cases = [
            ("2d6+3", 3),
            ("1d20-2", -2),
            ("d8+5", 5),
            ("3d10-10", -10),
            ("2d6+0", 0),
        ];
        for (notation, modifier) in cases {
            assert_eq!(parse(notation).unwrap().modifier, modifier, "{notation}");
        }
    }

    #[test]
    fn parse_advantage() {
        let expr = parse("d20!+5").unwrap();
        assert_eq!(expr, Expression::new(1, 20).with_advantage().with_modifier(5));

        let expr = parse("4d10!-2").unwrap();
        assert!(expr.advantage);
        assert_eq!(expr.modifier, -2);
    }

    #[test]
    fn parse_operations() {
        let cases = [
            ("4d6kh3", Operation::KeepHighest(3)),
            ("4d6kl2", Operation::KeepLowest(2)),
            ("5d10dh1", Operation::DropHighest(1)),
            ("4d6dl1", Operation::DropLowest(1)),
            ("10d6KH5", Operation::KeepHighest(5)),
        ];
        for (notation, op) in cases {
            assert_eq!(parse(notation).unwrap().operation, Some(op), "{notation}");
        }
    }

    #[test]
    fn parse_combined_clauses_in_any_order() {
        for notation in ["4d6kh3+2", "2d20kh1", "4d10!kh3", "3d8dl1-1", "4d6+2kh3", "4d6kh3!"] {
            assert!(parse(notation).is_ok(), "{notation}");
        }
        let a = parse("4d6!kh3+2").unwrap();
        let b = parse("4d6+2kh3!").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn later_clauses_win() {
        let expr = parse("4d6kh3dl1+2-5").unwrap();
        assert_eq!(expr.operation, Some(Operation::DropLowest(1)));
        assert_eq!(expr.modifier, -5);
    }

    #[test]
    fn whitespace_and_case_are_ignored() {
        assert_eq!(parse("2d6 + 3").unwrap(), Expression::new(2, 6).with_modifier(3));
        assert_eq!(parse("d20 !").unwrap(), Expression::new(1, 20).with_advantage());
        assert_eq!(parse("2 d 6").unwrap(), Expression::new(2, 6));
        assert_eq!(parse("\t2D6\n").unwrap(), Expression::new(2, 6));
        assert_eq!(
            parse(" 4d6kh3 ").unwrap().operation,
            Some(Operation::KeepHighest(3))
        );
    }

    #[test]
    fn parse_errors() {
        let cases = [
            "", "2d", "d", "2x6", "0d6", "2d1", "1001d6", "2d6kh", "2d6+", "2d6xyz", "2d6kh0",
            "20", "   ", "2d6k3", "2d6d", "d20!5", "2dh",
        ];
        for notation in cases {
            assert!(parse(notation).is_err(), "{notation:?} should be rejected");
        }
    }

    #[test]
    fn error_variants() {
        assert_eq!(parse(""), Err(NotationError::Empty));
        assert_eq!(
            parse("2x6"),
            Err(NotationError::MissingSeparator {
                span: 1..2,
                found: "'x'".into()
            })
        );
        assert_eq!(
            parse("2d"),
            Err(NotationError::MissingSides {
                span: 2..2,
                found: "end of input".into()
            })
        );
        assert_eq!(parse("0d6"), Err(NotationError::CountTooSmall { span: 0..1 }));
        assert_eq!(
            parse("1001d6"),
            Err(NotationError::CountTooLarge { span: 0..4, max: 1000 })
        );
        assert_eq!(parse("2d1"), Err(NotationError::TooFewSides { span: 2..3 }));
        assert_eq!(
            parse("2d6kh"),
            Err(NotationError::MissingOperationCount {
                span: 3..5,
                op: "kh".into()
            })
        );
        assert_eq!(parse("2d6kh0"), Err(NotationError::ZeroOperationCount { span: 5..6 }));
        assert_eq!(
            parse("2d6+"),
            Err(NotationError::MissingModifier { span: 3..4, sign: '+' })
        );
        assert_eq!(
            parse("2d6xyz"),
            Err(NotationError::UnexpectedCharacter { span: 3..4, ch: 'x' })
        );
        assert_eq!(
            parse("2d6k3"),
            Err(NotationError::UnknownOperation {
                span: 3..5,
                found: "'k3'".into()
            })
        );
    }

    #[test]
    fn error_positions_refer_to_original_text() {
        let err = parse("2d6 + 3 x").unwrap_err();
        assert_eq!(err, NotationError::UnexpectedCharacter { span: 8..9, ch: 'x' });
        assert_eq!(err.to_string(), "unexpected character 'x' at position 8");
    }

    #[test]
    fn out_of_range_literals() {
        assert!(matches!(
            parse("99999999999d6"),
            Err(NotationError::CountTooLarge { .. })
        ));
        assert!(matches!(
            parse("d99999999999"),
            Err(NotationError::SidesOutOfRange { .. })
        ));
        assert!(matches!(
            parse("d6kh99999999999"),
            Err(NotationError::OperationCountOutOfRange { .. })
        ));
        assert!(matches!(
            parse("d6+3000000000"),
            Err(NotationError::ModifierOutOfRange { .. })
        ));
        assert_eq!(parse("d6-2147483648").unwrap().modifier, i32::MIN);
    }

    #[test]
    fn parse_is_idempotent() {
        assert_eq!(parse("3d8!dl1-1"), parse("3d8!dl1-1"));
    }
}
