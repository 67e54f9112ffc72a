//! Known model budget listing — `cinder models`.

use cinder::compression::{DEFAULT_LIMITS, known_models};

pub fn cmd_models() {
    println!();
    println!("Known model context budgets:");
    for (pattern, limits) in known_models() {
        println!(
            "  {:<12} {:>9} context / {:>6} output",
            pattern, limits.context, limits.output
        );
    }
    println!(
        "  {:<12} {:>9} context / {:>6} output",
        "(default)", DEFAULT_LIMITS.context, DEFAULT_LIMITS.output
    );
}
