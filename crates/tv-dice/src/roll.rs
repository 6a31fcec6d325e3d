//! Roll results and their display form.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::expression::Expression;

/// A single physical die after rolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Die {
    /// The rolled value (1 to `sides`).
    pub value: u32,
    /// Number of faces.
    pub sides: u32,
    /// Whether the value counts toward the total.
    pub kept: bool,
}

/// The outcome of evaluating an [`Expression`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    /// The expression that was rolled.
    pub expression: Expression,
    /// Every die rolled, in roll order, dropped ones included.
    pub dice: Vec<Die>,
    /// Sum of the kept dice.
    pub kept_total: i64,
    /// `kept_total` plus the modifier.
    pub total: i64,
}

impl RollResult {
    /// Dice that count toward the total.
    pub fn kept(&self) -> impl Iterator<Item = &Die> {
        self.dice.iter().filter(|d| d.kept)
    }

    /// Dice that were discarded by advantage or a keep/drop operation.
    pub fn dropped(&self) -> impl Iterator<Item = &Die> {
        self.dice.iter().filter(|d| !d.kept)
    }

    /// Why dice were dropped, or `None` when every die was kept.
    pub fn drop_reason(&self) -> Option<String> {
        self.dropped().next()?;
        if self.expression.advantage {
            Some("advantage".to_string())
        } else {
            self.expression.operation.map(|op| op.describe())
        }
    }
}

impl fmt::Display for RollResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dice: Vec<String> = self
            .dice
            .iter()
            .map(|d| {
                if d.kept {
                    d.value.to_string()
                } else {
                    format!("‹{}›", d.value)
                }
            })
            .collect();
        write!(f, "{}: [{}]", self.expression, dice.join(", "))?;
        if self.expression.modifier != 0 {
            write!(f, " {:+}", self.expression.modifier)?;
        }
        write!(f, " = {}", self.total)?;
        if let Some(reason) = self.drop_reason() {
            write!(f, " ({reason})")?;
        }
        Ok(())
    }
}
