//! Parsed dice expressions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{NotationError, RollError};

/// Largest number of logical dice a single expression may roll.
pub const MAX_DICE: u32 = 1000;

/// A post-roll filter that keeps or discards a fixed number of dice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// Keep the N highest dice.
    KeepHighest(u32),
    /// Keep the N lowest dice.
    KeepLowest(u32),
    /// Drop the N highest dice.
    DropHighest(u32),
    /// Drop the N lowest dice.
    DropLowest(u32),
}

impl Operation {
    /// How many dice the operation keeps or drops.
    pub fn count(self) -> u32 {
        match self {
            Self::KeepHighest(n) | Self::KeepLowest(n) | Self::DropHighest(n) | Self::DropLowest(n) => n,
        }
    }

    /// Human-readable description, e.g. "kept highest 3".
    pub fn describe(self) -> String {
        match self {
            Self::KeepHighest(n) => format!("kept highest {n}"),
            Self::KeepLowest(n) => format!("kept lowest {n}"),
            Self::DropHighest(n) => format!("dropped highest {n}"),
            Self::DropLowest(n) => format!("dropped lowest {n}"),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeepHighest(n) => write!(f, "kh{n}"),
            Self::KeepLowest(n) => write!(f, "kl{n}"),
            Self::DropHighest(n) => write!(f, "dh{n}"),
            Self::DropLowest(n) => write!(f, "dl{n}"),
        }
    }
}

/// A validated dice expression such as `4d6kh3+2` or `d20!`.
///
/// The parser guarantees `count` in `1..=MAX_DICE`, `sides >= 2` and a
/// non-zero operation count. Expressions built by hand are checked by
/// [`Expression::validate`] before they are rolled, and deserialization
/// rejects anything out of bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawExpression")]
pub struct Expression {
    /// Number of logical dice.
    pub count: u32,
    /// Faces per die.
    pub sides: u32,
    /// Flat adjustment added to the total.
    pub modifier: i32,
    /// Optional keep/drop filter.
    pub operation: Option<Operation>,
    /// Roll every logical die twice and keep the better one.
    pub advantage: bool,
}

impl Expression {
    /// A plain `{count}d{sides}` expression with no clauses.
    pub fn new(count: u32, sides: u32) -> Self {
        Self {
            count,
            sides,
            modifier: 0,
            operation: None,
            advantage: false,
        }
    }

    /// Set the modifier.
    pub fn with_modifier(mut self, modifier: i32) -> Self {
        self.modifier = modifier;
        self
    }

    /// Set the keep/drop operation.
    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operation = Some(operation);
        self
    }

    /// Enable advantage.
    pub fn with_advantage(mut self) -> Self {
        self.advantage = true;
        self
    }

    /// Check the bounds the parser enforces.
    pub fn validate(&self) -> Result<(), RollError> {
        if !(1..=MAX_DICE).contains(&self.count) {
            return Err(RollError::InvalidExpression(format!(
                "die count {} outside 1..={MAX_DICE}",
                self.count
            )));
        }
        if self.sides < 2 {
            return Err(RollError::InvalidExpression(format!(
                "die must have at least 2 sides, got {}",
                self.sides
            )));
        }
        if self.operation.is_some_and(|op| op.count() == 0) {
            return Err(RollError::InvalidExpression(
                "operation count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of physical dice an evaluation rolls.
    pub fn physical_dice(&self) -> usize {
        let count = self.count as usize;
        if self.advantage { count * 2 } else { count }
    }
}

#[derive(Deserialize)]
struct RawExpression {
    count: u32,
    sides: u32,
    #[serde(default)]
    modifier: i32,
    #[serde(default)]
    operation: Option<Operation>,
    #[serde(default)]
    advantage: bool,
}

impl TryFrom<RawExpression> for Expression {
    type Error = RollError;

    fn try_from(raw: RawExpression) -> Result<Self, Self::Error> {
        let expr = Self {
            count: raw.count,
            sides: raw.sides,
            modifier: raw.modifier,
            operation: raw.operation,
            advantage: raw.advantage,
        };
        expr.validate()?;
        Ok(expr)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;
        if self.advantage {
            write!(f, "!")?;
        }
        if let Some(op) = self.operation {
            write!(f, "{op}")?;
        }
        if self.modifier != 0 {
            write!(f, "{:+}", self.modifier)?;
        }
        Ok(())
    }
}

impl FromStr for Expression {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parser::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_notation() {
        assert_eq!(Expression::new(2, 6).to_string(), "2d6");
        assert_eq!(
            Expression::new(1, 20).with_advantage().with_modifier(5).to_string(),
            "1d20!+5"
        );
        assert_eq!(
            Expression::new(4, 6)
                .with_operation(Operation::KeepHighest(3))
                .with_modifier(-2)
                .to_string(),
            "4d6kh3-2"
        );
    }

    #[test]
    fn operation_display_and_description() {
        assert_eq!(Operation::DropLowest(1).to_string(), "dl1");
        assert_eq!(Operation::KeepLowest(2).describe(), "kept lowest 2");
        assert_eq!(Operation::DropHighest(4).count(), 4);
    }

    #[test]
    fn physical_dice_doubles_with_advantage() {
        assert_eq!(Expression::new(3, 8).physical_dice(), 3);
        assert_eq!(Expression::new(3, 8).with_advantage().physical_dice(), 6);
    }

    #[test]
    fn validate_rejects_out_of_bounds() {
        assert!(Expression::new(4, 6).validate().is_ok());
        assert!(matches!(
            Expression::new(1, 0).validate(),
            Err(RollError::InvalidExpression(_))
        ));
        assert!(Expression::new(0, 6).validate().is_err());
        assert!(Expression::new(MAX_DICE + 1, 6).validate().is_err());
        assert!(
            Expression::new(2, 6)
                .with_operation(Operation::KeepHighest(0))
                .validate()
                .is_err()
        );
    }

    #[test]
    fn deserialize_checks_bounds() {
        let expr: Expression =
            serde_json::from_str(r#"{"count":4,"sides":6,"modifier":2,"operation":{"KeepHighest":3},"advantage":false}"#)
                .unwrap();
        assert_eq!(expr.to_string(), "4d6kh3+2");

        let err = serde_json::from_str::<Expression>(
            r#"{"count":2,"sides":0,"modifier":0,"operation":null,"advantage":false}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("at least 2 sides"), "{err}");

        assert!(serde_json::from_str::<Expression>(r#"{"count":4294967295,"sides":6}"#).is_err());
    }

    #[test]
    fn from_str_delegates_to_parser() {
        let expr: Expression = "4d6dl1".parse().unwrap();
        assert_eq!(expr.operation, Some(Operation::DropLowest(1)));
        assert!("4x6".parse::<Expression>().is_err());
    }
}
