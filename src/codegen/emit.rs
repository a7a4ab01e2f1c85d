use crate::{
    codegen::{CodeGenerator, slot_name},
    ir::{Label, Opcode, Operand, Quad},
};

fn condition_jump(op: Opcode) -> Option<&'static str> {
    Some(match op {
        Opcode::Lt => "JL",
        Opcode::Le => "JLE",
        Opcode::Gt => "JG",
        Opcode::Ge => "JGE",
        Opcode::Eq => "JE",
        Opcode::Ne => "JNE",
        _ => return None,
    })
}

impl CodeGenerator {
    pub(super) fn visit_quad(&mut self, quad: &Quad) {
        if quad.op != Opcode::Label {
            self.code.instr(&format!("; {quad}"));
        }

        match quad.op {
            Opcode::Label => {
                if let Some(label) = quad.target() {
                    self.code.label(&label.to_string());
                }
            }
            Opcode::Assign => {
                self.load(&quad.arg1);
                self.store(&quad.result);
            }
            Opcode::Add | Opcode::Sub => {
                let mnemonic = if quad.op == Opcode::Add { "ADD" } else { "SUB" };
                self.load(&quad.arg1);
                let rhs = self.value(&quad.arg2);
                self.code.instr(&format!("{mnemonic} AX, {rhs}"));
                self.store(&quad.result);
            }
            Opcode::Mul | Opcode::Div => {
                self.load(&quad.arg1);
                let rhs = self.value(&quad.arg2);
                self.code.instr(&format!("MOV BX, {rhs}"));
                if quad.op == Opcode::Mul {
                    self.code.instr("IMUL BX");
                } else {
                    self.code.instr("CWD");
                    self.code.instr("IDIV BX");
                }
                self.store(&quad.result);
            }
            Opcode::Lt | Opcode::Le | Opcode::Gt | Opcode::Ge | Opcode::Eq | Opcode::Ne => {
                self.visit_comparison(quad)
            }
            Opcode::And | Opcode::Or => self.visit_logical(quad),
            Opcode::If | Opcode::IfNot => self.visit_branch(quad),
            Opcode::Goto => {
                if let Some(label) = quad.target() {
                    self.code.instr(&format!("JMP {label}"));
                }
            }
            // Storage comes from the layout; the exit sequence follows the body.
            Opcode::Declare | Opcode::Ret => {}
        }

        if quad.op != Opcode::Label {
            self.code.blank();
        }
    }

    fn load(&mut self, operand: &Operand) {
        let value = self.value(operand);
        self.code.instr(&format!("MOV AX, {value}"));
    }

    /// Stores `AX` into the slot of `result`. A result without storage has
    /// nowhere to go and is dropped.
    fn store(&mut self, result: &Operand) {
        if let Some(slot) = slot_name(result) {
            self.code.instr(&format!("MOV [{slot}], AX"));
        }
    }

    fn store_flag(&mut self, result: &Operand, flag: u8) {
        if let Some(slot) = slot_name(result) {
            self.code.instr(&format!("MOV WORD PTR [{slot}], {flag}"));
        }
    }

    fn visit_comparison(&mut self, quad: &Quad) {
        let Some(jump) = condition_jump(quad.op) else {
            return;
        };
        let id = self.next_label_id();

        self.load(&quad.arg1);
        let rhs = self.value(&quad.arg2);
        self.code.instr(&format!("CMP AX, {rhs}"));
        self.code.instr(&format!("{jump} TRUE_{id}"));
        self.store_flag(&quad.result, 0);
        self.code.instr(&format!("JMP END_{id}"));
        self.code.label(&format!("TRUE_{id}"));
        self.store_flag(&quad.result, 1);
        self.code.label(&format!("END_{id}"));
    }

    /// `&&` falls to `FALSE_n` on the first zero operand, `||` to `TRUE_n` on
    /// the first non-zero one.
    fn visit_logical(&mut self, quad: &Quad) {
        let id = self.next_label_id();
        let (jump, short_label, short_flag) = if quad.op == Opcode::And {
            ("JE", format!("FALSE_{id}"), 0)
        } else {
            ("JNE", format!("TRUE_{id}"), 1)
        };

        for operand in [&quad.arg1, &quad.arg2] {
            self.load(operand);
            self.code.instr("CMP AX, 0");
            self.code.instr(&format!("{jump} {short_label}"));
        }
        self.store_flag(&quad.result, 1 - short_flag);
        self.code.instr(&format!("JMP END_{id}"));
        self.code.label(&short_label);
        self.store_flag(&quad.result, short_flag);
        self.code.label(&format!("END_{id}"));
    }

    /// Conditional jumps on the 8086 are short, so the branch skips over a
    /// near `JMP` when the condition does not hold.
    fn visit_branch(&mut self, quad: &Quad) {
        let Some(target) = quad.target().map(Label::to_string) else {
            return;
        };
        let id = self.next_label_id();
        let skip = if quad.op == Opcode::If { "JNE" } else { "JE" };

        self.load(&quad.arg1);
        self.code.instr("CMP AX, 1");
        self.code.instr(&format!("{skip} SKIP_{id}"));
        self.code.instr(&format!("JMP {target}"));
        self.code.label(&format!("SKIP_{id}"));
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        codegen::emit,
        ir::{Label, Opcode, Operand, Quad},
    };

    fn var(name: &str) -> Operand {
        Operand::Var(name.to_owned())
    }

    #[test]
    fn division_is_signed() {
        let asm = emit(&[Quad::new(
            Opcode::Div,
            var("a"),
            Operand::Int(-2),
            Operand::Temp(1),
        )]);
        assert!(asm.text.contains(
            "    MOV AX, [a]\n    MOV BX, -2\n    CWD\n    IDIV BX\n    MOV [t1], AX\n"
        ));
    }

    #[test]
    fn comparisons_write_flags() {
        let asm = emit(&[Quad::new(
            Opcode::Lt,
            var("i"),
            Operand::Int(10),
            Operand::Temp(1),
        )]);
        assert!(asm.text.contains(concat!(
            "    CMP AX, 10\n",
            "    JL TRUE_0\n",
            "    MOV WORD PTR [t1], 0\n",
            "    JMP END_0\n",
            "TRUE_0:\n",
            "    MOV WORD PTR [t1], 1\n",
            "END_0:\n",
        )));
    }

    #[test]
    fn branches_skip_over_far_jumps() {
        let asm = emit(&[
            Quad::label(Label::Numbered(1)),
            Quad::new(
                Opcode::IfNot,
                Operand::Temp(1),
                Operand::Empty,
                Operand::Label(Label::Numbered(1)),
            ),
        ]);
        assert!(asm.text.contains("L1:\n"));
        assert!(asm.text.contains(
            "    MOV AX, [t1]\n    CMP AX, 1\n    JE SKIP_0\n    JMP L1\nSKIP_0:\n"
        ));
    }

    #[test]
    fn user_names_never_shadow_registers() {
        let asm = emit(&[Quad::assign(Operand::Int(1), var("ax"))]);
        assert!(asm.text.contains("    MOV [var_ax], AX\n"));
        assert!(asm.text.contains("    var_ax DW 0\n"));
    }
}
