//! Redundant Control Flow Removal
//!
//! Drops a `LABEL` that directly follows another `LABEL`, and a `GOTO L` that
//! directly precedes `LABEL L`. Adjacency is judged on the input sequence.
//! Jumps to a dropped label are retargeted to the label that survives in
//! front of it.

use std::collections::HashMap;

use crate::ir::{Label, Opcode, Operand, Quad};

pub fn remove_redundant(quads: &[Quad]) -> Vec<Quad> {
    let mut kept: Vec<Quad> = Vec::with_capacity(quads.len());
    let mut aliases: HashMap<Label, Label> = HashMap::new();

    for (i, quad) in quads.iter().enumerate() {
        let prev = i.checked_sub(1).and_then(|j| quads.get(j));
        let next = quads.get(i + 1);

        if quad.op == Opcode::Label
            && prev.is_some_and(|prev| prev.op == Opcode::Label)
        {
            // The previous input label is either kept or itself folded into
            // the first label of the run, which is the last kept quad.
            if let (Some(dropped), Some(survivor)) =
                (quad.target(), kept.last().and_then(Quad::target))
            {
                aliases.insert(dropped.clone(), survivor.clone());
            }
            continue;
        }

        if quad.op == Opcode::Goto
            && let Some(next) = next
            && next.op == Opcode::Label
            && next.target() == quad.target()
        {
            continue;
        }

        kept.push(quad.clone());
    }

    if !aliases.is_empty() {
        for quad in kept.iter_mut().filter(|quad| quad.op != Opcode::Label) {
            if let Some(survivor) = quad.target().and_then(|label| aliases.get(label)) {
                quad.result = Operand::Label(survivor.clone());
            }
        }
    }

    kept
}
