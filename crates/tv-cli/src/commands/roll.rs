use rand::TryRngCore;
use rand::rngs::OsRng;
use tracing::warn;
use tv_dice::{Expression, RollResult};

use crate::diagnostics::render_notation_error;

pub fn run(notation: &str, json: bool) -> Result<(), String> {
    let expr = tv_dice::parse(notation).map_err(|e| {
        eprint!("{}", render_notation_error(notation, &e));
        e.to_string()
    })?;
    let result = roll_with(&expr, &mut OsRng)?;

    if json {
        let out = serde_json::to_string_pretty(&result).map_err(|e| e.to_string())?;
        println!("{out}");
    } else {
        println!("🎲 {result}");
    }
    Ok(())
}

fn roll_with<R: TryRngCore + ?Sized>(expr: &Expression, rng: &mut R) -> Result<RollResult, String> {
    tv_dice::evaluate_with(expr, rng).map_err(|err| {
        warn!(%err, expression = %expr, "roll failed");
        err.to_string()
    })
}
