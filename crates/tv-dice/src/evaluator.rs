//! Roll evaluation: draw, pair for advantage, apply keep/drop, total.

use rand::TryRngCore;
use rand::rngs::OsRng;
use tracing::debug;

use crate::error::RollError;
use crate::expression::{Expression, Operation};
use crate::roll::{Die, RollResult};

/// Roll an expression using the operating system's secure random source.
pub fn evaluate(expr: &Expression) -> Result<RollResult, RollError> {
    evaluate_with(expr, &mut OsRng)
}

/// Roll an expression drawing from `rng`.
///
/// Expressions that break the parser's bounds are rejected with
/// [`RollError::InvalidExpression`] before anything is drawn.
///
/// Any infallible `RngCore` also works here through `rand`'s blanket
/// `TryRngCore` impl, which is how tests feed a fixed draw sequence.
pub fn evaluate_with<R: TryRngCore + ?Sized>(
    expr: &Expression,
    rng: &mut R,
) -> Result<RollResult, RollError> {
    expr.validate()?;
    let mut dice = roll_dice(expr, rng)?;
    if expr.advantage {
        apply_advantage(&mut dice);
    }
    if let Some(op) = expr.operation {
        apply_operation(&mut dice, op);
    }

    let kept_total: i64 = dice.iter().filter(|d| d.kept).map(|d| i64::from(d.value)).sum();
    let total = kept_total + i64::from(expr.modifier);
    debug!(expression = %expr, kept_total, total, "evaluated roll");

    Ok(RollResult {
        expression: *expr,
        dice,
        kept_total,
        total,
    })
}

/// Draw every physical die. All dice start kept.
///
/// Each value is a full 64-bit draw reduced modulo `sides`. For sides that
/// are not a power of two this favours low faces by at most `sides / 2^64`,
/// which is negligible for any `u32` face count.
fn roll_dice<R: TryRngCore + ?Sized>(expr: &Expression, rng: &mut R) -> Result<Vec<Die>, RollError> {
    let sides = u64::from(expr.sides);
    (0..expr.physical_dice())
        .map(|_| {
            let draw = rng
                .try_next_u64()
                .map_err(|e| RollError::Entropy(e.to_string()))?;
            // The remainder is below `sides`, which itself fits in a u32.
            let face = draw.checked_rem(sides).unwrap_or(0);
            let value = u32::try_from(face).unwrap_or(u32::MAX - 1) + 1;
            Ok(Die {
                value,
                sides: expr.sides,
                kept: true,
            })
        })
        .collect()
}

/// Drop the lower die of each consecutive `(2i, 2i+1)` pair in roll order.
/// On a tie the first of the pair stays.
pub(crate) fn apply_advantage(dice: &mut [Die]) {
    for pair in dice.chunks_exact_mut(2) {
        if pair[1].value > pair[0].value {
            pair[0].kept = false;
        } else {
            pair[1].kept = false;
        }
    }
}

/// Apply a keep/drop operation to the dice that are still kept.
///
/// Kept dice are ordered by value, ties by roll index. A request that cannot
/// be satisfied leaves the dice unchanged.
pub(crate) fn apply_operation(dice: &mut [Die], op: Operation) {
    let mut order: Vec<usize> = (0..dice.len()).filter(|&i| dice[i].kept).collect();
    order.sort_by_key(|&i| (dice[i].value, i));

    let len = order.len();
    let n = op.count() as usize;
    let dropped = match op {
        Operation::KeepHighest(_) if len > n => &order[..len - n],
        Operation::KeepLowest(_) if len > n => &order[n..],
        Operation::DropHighest(_) if n <= len => &order[len - n..],
        Operation::DropLowest(_) if n <= len => &order[..n],
        _ => &[][..],
    };
    for &i in dropped {
        dice[i].kept = false;
    }
}
