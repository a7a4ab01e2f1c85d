//! Algebraic Simplification
//!
//! Rewrites `x+0`, `0+x`, `x-0`, `x*1`, `1*x` and `x/1` to a copy of `x`, and
//! `x*0`, `0*x` to a copy of `0`.

use crate::{ir::Quad, opt::identity_value};

pub fn simplify_algebra(quads: &[Quad]) -> Vec<Quad> {
    quads
        .iter()
        .map(
            |quad| match identity_value(quad.op, &quad.arg1, &quad.arg2) {
                Some(value) => Quad::assign(value, quad.result.clone()),
                None => quad.clone(),
            },
        )
        .collect()
}
