//! Dice expression engine for Tavern.
//!
//! Parses compact dice notation (`2d6+3`, `d20!`, `4d6kh3`) into an
//! [`Expression`] and evaluates it into a [`RollResult`] that records every
//! die rolled and whether it counted. Rolls draw from the operating
//! system's secure random source.
//!
//! ```
//! let result = tv_dice::roll("4d6dl1").unwrap();
//! assert_eq!(result.dice.len(), 4);
//! assert_eq!(result.kept().count(), 3);
//! assert_eq!(result.total, result.kept_total);
//! ```

pub mod error;
pub mod evaluator;
pub mod expression;
mod lexer;
pub mod parser;
pub mod roll;

pub use error::{DiceError, DiceResult, NotationError, RollError};
pub use evaluator::{evaluate, evaluate_with};
pub use expression::{Expression, MAX_DICE, Operation};
pub use parser::parse;
pub use roll::{Die, RollResult};

/// Parse `notation` and roll it with the secure random source.
pub fn roll(notation: &str) -> DiceResult<RollResult> {
    let expr = parse(notation)?;
    Ok(evaluate(&expr)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roll_valid_notation() {
        for notation in ["2d6", "d20", "4d8", "d20!+5", "4d6kh3"] {
            let result = roll(notation).unwrap();
            assert_eq!(result.expression, parse(notation).unwrap());
            assert!(result.dice.iter().all(|d| d.value >= 1 && d.value <= d.sides));
        }
    }

    #[test]
    fn roll_invalid_notation() {
        for notation in ["invalid", "", "2x6"] {
            assert!(matches!(roll(notation), Err(DiceError::Notation(_))), "{notation}");
        }
    }
}
