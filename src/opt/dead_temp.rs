//! Dead Temporary Elimination
//!
//! Removes every quad whose result is a temporary that no quad reads as an
//! operand. Named variables are always kept since their final values are
//! observable.

use std::collections::HashSet;

use crate::ir::{Operand, Quad};

pub fn eliminate_dead_temps(quads: &[Quad]) -> Vec<Quad> {
    let used: HashSet<u32> = quads
        .iter()
        .flat_map(|quad| [&quad.arg1, &quad.arg2])
        .filter_map(|arg| arg.as_temp().copied())
        .collect();

    quads
        .iter()
        .filter(|quad| match quad.result {
            Operand::Temp(n) => used.contains(&n),
            _ => true,
        })
        .cloned()
        .collect()
}
