use crate::{
    ast::{Item, Program, StmtKind},
    ir::{Label, Operand, Quad},
};

mod expr;
mod stmt;

/// Per-run state. A fresh context is built for every [`IRGenerator::generate`]
/// call, so temporaries and labels restart at 1 for each program.
#[derive(Debug, Default)]
struct GenContext {
    quads: Vec<Quad>,
    temp_count: u32,
    label_count: u32,
}

impl GenContext {
    fn emit(&mut self, quad: Quad) {
        self.quads.push(quad);
    }

    fn new_temp(&mut self) -> Operand {
        self.temp_count += 1;
        Operand::Temp(self.temp_count)
    }

    fn new_label(&mut self) -> Label {
        self.label_count += 1;
        Label::Numbered(self.label_count)
    }
}

#[derive(Debug, Default)]
pub struct IRGenerator {
    ctx: GenContext,
}

impl IRGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Global initializers come first, then each function body.
    pub fn generate(&mut self, program: &Program) -> Vec<Quad> {
        self.ctx = GenContext::default();

        for item in &program.items {
            if let Item::Stmt(stmt) = item
                && let StmtKind::Decl(_) = stmt.kind
            {
                self.visit_stmt(stmt);
            }
        }

        for func in program.functions() {
            self.visit_fn(func);
        }

        std::mem::take(&mut self.ctx.quads)
    }
}

pub fn lower(program: &Program) -> Vec<Quad> {
    IRGenerator::new().generate(program)
}
