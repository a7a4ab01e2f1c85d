//! Constant Propagation
//!
//! Forward scan recording names assigned a literal by `(=, c, _, x)`. Later
//! operand uses of `x` are replaced by `c` until `x` is redefined. Every
//! `LABEL` is a join point and forgets all recorded values. Result slots are
//! never rewritten.

use std::collections::HashMap;

use crate::ir::{Opcode, Operand, Quad};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Slot {
    Var(String),
    Temp(u32),
}

impl Slot {
    fn of(operand: &Operand) -> Option<Slot> {
        match operand {
            Operand::Var(name) => Some(Slot::Var(name.clone())),
            Operand::Temp(n) => Some(Slot::Temp(*n)),
            _ => None,
        }
    }
}

pub fn propagate_constants(quads: &[Quad]) -> Vec<Quad> {
    let mut known: HashMap<Slot, Operand> = HashMap::new();
    let mut propagated = Vec::with_capacity(quads.len());

    for quad in quads {
        let mut quad = quad.clone();

        if quad.op == Opcode::Label {
            known.clear();
            propagated.push(quad);
            continue;
        }

        for arg in [&mut quad.arg1, &mut quad.arg2] {
            if let Some(value) = Slot::of(arg).and_then(|slot| known.get(&slot)) {
                *arg = value.clone();
            }
        }

        if let Some(slot) = Slot::of(&quad.result) {
            if quad.op == Opcode::Assign && quad.arg1.is_immediate() {
                known.insert(slot, quad.arg1.clone());
            } else {
                known.remove(&slot);
            }
        }

        propagated.push(quad);
    }

    propagated
}
