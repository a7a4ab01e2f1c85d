//! Target Code Generation
//!
//! Translates quads into a 16-bit 8086 program in MASM syntax with three
//! segments: `DATAS` (one word per variable and temporary plus the report
//! messages), `STACKS` and `CODES`. `AX` is the accumulator and `BX` the
//! second operand. After the lowered body the program prints every
//! variable's final value and waits for a key before exiting.

use crate::ir::{Operand, Quad};

mod emit;
mod runtime;
mod symbols;

pub use symbols::{DataLayout, safe_name};

const INDENT: &str = "    ";

/// Output of [`emit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembly {
    pub text: String,
    pub layout: DataLayout,
}

#[derive(Debug, Default)]
struct AsmWriter {
    result: String,
}

impl AsmWriter {
    fn line(&mut self, s: &str) {
        self.result += s;
        self.result += "\n";
    }

    fn instr(&mut self, s: &str) {
        self.result += INDENT;
        self.line(s);
    }

    fn label(&mut self, name: &str) {
        self.result += name;
        self.line(":");
    }

    fn blank(&mut self) {
        self.line("");
    }
}

/// Per-run state: the discovered layout and the counter behind
/// `TRUE_n`/`FALSE_n`/`END_n`/`SKIP_n`.
#[derive(Debug, Default)]
pub struct CodeGenerator {
    layout: DataLayout,
    code: AsmWriter,
    label_count: u32,
}

impl CodeGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generate(&mut self, quads: &[Quad]) -> Assembly {
        *self = Self {
            layout: DataLayout::discover(quads),
            ..Self::default()
        };

        self.code.label("START");
        self.code.instr("MOV AX, DATAS");
        self.code.instr("MOV DS, AX");
        self.code.blank();

        for quad in quads {
            self.visit_quad(quad);
        }

        self.report_and_exit();
        runtime::print_number(&mut self.code);

        let mut program = AsmWriter::default();
        self.data_segment(&mut program);
        program.blank();
        runtime::stack_segment(&mut program);
        program.blank();
        program.line("CODES SEGMENT");
        program.instr("ASSUME CS:CODES, DS:DATAS, SS:STACKS");
        program.result += &std::mem::take(&mut self.code.result);
        program.line("CODES ENDS");
        program.instr("END START");

        Assembly {
            text: program.result,
            layout: std::mem::take(&mut self.layout),
        }
    }

    fn next_label_id(&mut self) -> u32 {
        let id = self.label_count;
        self.label_count += 1;
        id
    }

    /// Source operand text: an immediate or a memory reference.
    fn value(&self, operand: &Operand) -> String {
        match operand {
            Operand::Int(v) => word_immediate(*v).to_string(),
            Operand::Real(v) => word_immediate(v.trunc() as i64).to_string(),
            Operand::Var(_) | Operand::Temp(_) => {
                format!("[{}]", slot_name(operand).unwrap_or_default())
            }
            Operand::Label(_) | Operand::Empty => "0".to_owned(),
        }
    }
}

/// Wraps to the 16-bit word, matching the target's arithmetic.
fn word_immediate(value: i64) -> i16 {
    value as i16
}

/// The data-segment name backing `operand`, if it has storage.
fn slot_name(operand: &Operand) -> Option<String> {
    match operand {
        Operand::Var(name) => Some(safe_name(name)),
        Operand::Temp(n) => Some(symbols::temp_name(*n)),
        _ => None,
    }
}

pub fn emit(quads: &[Quad]) -> Assembly {
    CodeGenerator::new().generate(quads)
}
