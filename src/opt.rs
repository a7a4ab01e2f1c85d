//! Optimization Pipeline
//!
//! Five peephole rewrites over the quad sequence, each applied exactly once
//! and in a fixed order:
//!
//! 1. [`remove_redundant`]
//! 2. [`fold_constants`]
//! 3. [`propagate_constants`]
//! 4. [`simplify_algebra`]
//! 5. [`eliminate_dead_temps`]
//!
//! The passes are not iterated, so a rewrite enabled by a later pass is left
//! for the next run.

use crate::ir::{Opcode, Operand, Quad};

mod algebraic;
mod dead_temp;
mod fold;
mod propagate;
mod redundant;

pub use algebraic::simplify_algebra;
pub use dead_temp::eliminate_dead_temps;
pub use fold::fold_constants;
pub use propagate::propagate_constants;
pub use redundant::remove_redundant;

pub fn optimize(quads: &[Quad]) -> Vec<Quad> {
    let quads = remove_redundant(quads);
    let quads = fold_constants(&quads);
    let quads = propagate_constants(&quads);
    let quads = simplify_algebra(&quads);
    eliminate_dead_temps(&quads)
}

/// Identity rewrites shared by folding and algebraic simplification. Returns
/// the value `op(lhs, rhs)` reduces to when one side is a neutral or
/// absorbing literal.
pub(crate) fn identity_value(op: Opcode, lhs: &Operand, rhs: &Operand) -> Option<Operand> {
    let is = |operand: &Operand, n: i64| operand.as_int() == Some(&n);

    match op {
        Opcode::Add if is(lhs, 0) => Some(rhs.clone()),
        Opcode::Add | Opcode::Sub if is(rhs, 0) => Some(lhs.clone()),
        Opcode::Mul if is(lhs, 1) => Some(rhs.clone()),
        Opcode::Mul | Opcode::Div if is(rhs, 1) => Some(lhs.clone()),
        Opcode::Mul if is(lhs, 0) || is(rhs, 0) => Some(Operand::Int(0)),
        _ => None,
    }
}


#[cfg(test)]
mod tests {
    use super::{test_util::*, *};

    #[test]
    fn single_pass_properties() {
        let folded = fold_constants(&[bin(Opcode::Add, int(3), int(4), temp(1))]);
        assert_eq!(folded, vec![Quad::assign(int(7), temp(1))]);

        let simplified = simplify_algebra(&[bin(Opcode::Mul, var("x"), int(0), temp(2))]);
        assert_eq!(simplified, vec![Quad::assign(int(0), temp(2))]);
    }

    #[test]
    fn propagated_constants_are_not_refolded() {
        let quads = vec![
            bin(Opcode::Add, int(3), int(1), temp(1)),
            Quad::assign(temp(1), var("x")),
            bin(Opcode::Add, var("x"), int(2), temp(2)),
            Quad::assign(temp(2), var("y")),
        ];

        let once = optimize(&quads);
        assert_eq!(
            once,
            vec![
                Quad::assign(int(4), var("x")),
                bin(Opcode::Add, int(4), int(2), temp(2)),
                Quad::assign(temp(2), var("y")),
            ]
        );

        assert_eq!(
            optimize(&once),
            vec![
                Quad::assign(int(4), var("x")),
                Quad::assign(int(6), var("y")),
            ]
        );
    }

    #[test]
    fn clean_sequence_is_a_fixed_point() {
        let quads = vec![
            Quad::label(crate::ir::Label::Func("main".to_owned())),
            Quad::assign(int(0), var("i")),
            goto(2),
            label(1),
            bin(Opcode::Add, var("i"), int(1), temp(1)),
            Quad::assign(temp(1), var("i")),
            label(2),
            bin(Opcode::Lt, var("i"), int(10), temp(2)),
            jump(Opcode::If, temp(2), 1),
        ];

        let once = optimize(&quads);
        assert_eq!(once, quads);
        assert_eq!(optimize(&once), once);
    }
}
