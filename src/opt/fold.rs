//! Constant Folding
//!
//! A binary quad whose operands are both integer literals becomes
//! `(=, value, _, result)`. When the result is a temporary, its value is
//! substituted into the operands of later quads. Values are computed in
//! 16-bit word arithmetic. Division by zero and `-32768 / -1` are left
//! for the target to fault on.

use std::collections::HashMap;

use crate::{
    ir::{Opcode, Operand, Quad},
    opt::identity_value,
};

pub fn fold_constants(quads: &[Quad]) -> Vec<Quad> {
    let mut known: HashMap<u32, i64> = HashMap::new();
    let mut folded = Vec::with_capacity(quads.len());

    for quad in quads {
        let mut quad = quad.clone();
        substitute(&mut quad.arg1, &known);
        substitute(&mut quad.arg2, &known);

        if quad.op.is_binary() {
            if let (Operand::Int(lhs), Operand::Int(rhs)) = (&quad.arg1, &quad.arg2)
                && let Some(value) = evaluate(quad.op, *lhs, *rhs)
            {
                if let Operand::Temp(n) = quad.result {
                    known.insert(n, value);
                }
                quad = Quad::assign(Operand::Int(value), quad.result);
            } else if let Some(value) = identity_value(quad.op, &quad.arg1, &quad.arg2) {
                quad = Quad::assign(value, quad.result);
            }
        }

        folded.push(quad);
    }

    folded
}

fn substitute(operand: &mut Operand, known: &HashMap<u32, i64>) {
    if let Operand::Temp(n) = operand
        && let Some(value) = known.get(n)
    {
        *operand = Operand::Int(*value);
    }
}

/// Evaluates `op` the way the 16-bit target does: operands are taken as
/// words, arithmetic wraps and division truncates. Comparisons and logical
/// ops yield 0 or 1. Divisions that fault on the target are not evaluated.
pub(crate) fn evaluate(op: Opcode, lhs: i64, rhs: i64) -> Option<i64> {
    let (lhs, rhs) = (lhs as i16, rhs as i16);
    let value = match op {
        Opcode::Add => lhs.wrapping_add(rhs),
        Opcode::Sub => lhs.wrapping_sub(rhs),
        Opcode::Mul => lhs.wrapping_mul(rhs),
        Opcode::Div => lhs.checked_div(rhs)?,
        Opcode::Lt => (lhs < rhs) as i16,
        Opcode::Le => (lhs <= rhs) as i16,
        Opcode::Gt => (lhs > rhs) as i16,
        Opcode::Ge => (lhs >= rhs) as i16,
        Opcode::Eq => (lhs == rhs) as i16,
        Opcode::Ne => (lhs != rhs) as i16,
        Opcode::And => (lhs != 0 && rhs != 0) as i16,
        Opcode::Or => (lhs != 0 || rhs != 0) as i16,
        _ => return None,
    };
    Some(i64::from(value))
}
