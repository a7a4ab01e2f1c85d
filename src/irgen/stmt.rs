use crate::{
    ast::{FnItem, Stmt, StmtKind, TypeName},
    ir::{Label, Opcode, Operand, Quad},
    irgen::IRGenerator,
};

impl IRGenerator {
    pub(super) fn visit_fn(&mut self, func: &FnItem) {
        self.ctx.emit(Quad::label(Label::Func(func.name.clone())));
        self.visit_block(&func.body);
        if func.ret_ty == TypeName::Void {
            self.ctx.emit(Quad::new(
                Opcode::Ret,
                Operand::Empty,
                Operand::Empty,
                Operand::Empty,
            ));
        }
    }

    fn visit_block(&mut self, body: &[Stmt]) {
        for stmt in body {
            self.visit_stmt(stmt);
        }
    }

    fn jump_if(&mut self, op: Opcode, cond: Operand, target: &Label) {
        self.ctx.emit(Quad::new(
            op,
            cond,
            Operand::Empty,
            Operand::Label(target.clone()),
        ));
    }

    pub(super) fn visit_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Decl(decl) => {
                if let Some(init) = &decl.init {
                    let value = self.visit_expr(init);
                    self.ctx
                        .emit(Quad::assign(value, Operand::Var(decl.name.clone())));
                }
            }
            StmtKind::Assign(assign) => {
                let value = self.visit_expr(&assign.value);
                self.ctx
                    .emit(Quad::assign(value, Operand::Var(assign.target.clone())));
            }
            StmtKind::If(cond_stmt) => {
                let cond = self.visit_expr(&cond_stmt.cond);
                let false_label = self.ctx.new_label();
                let end_label = self.ctx.new_label();

                self.jump_if(Opcode::IfNot, cond, &false_label);
                self.visit_block(&cond_stmt.body);
                self.ctx.emit(Quad::goto(end_label.clone()));
                self.ctx.emit(Quad::label(false_label));
                self.ctx.emit(Quad::label(end_label));
            }
            StmtKind::While(cond_stmt) => {
                let start_label = self.ctx.new_label();
                let cond_label = self.ctx.new_label();
                let end_label = self.ctx.new_label();

                self.ctx.emit(Quad::goto(cond_label.clone()));
                self.ctx.emit(Quad::label(start_label.clone()));
                self.visit_block(&cond_stmt.body);
                self.ctx.emit(Quad::label(cond_label));
                let cond = self.visit_expr(&cond_stmt.cond);
                self.jump_if(Opcode::If, cond, &start_label);
                self.ctx.emit(Quad::label(end_label));
            }
            StmtKind::DoWhile(cond_stmt) => {
                let start_label = self.ctx.new_label();
                let end_label = self.ctx.new_label();

                self.ctx.emit(Quad::label(start_label.clone()));
                self.visit_block(&cond_stmt.body);
                let cond = self.visit_expr(&cond_stmt.cond);
                self.jump_if(Opcode::If, cond, &start_label);
                self.ctx.emit(Quad::label(end_label));
            }
            StmtKind::For(for_stmt) => {
                if let Some(init) = &for_stmt.init {
                    self.visit_stmt(init);
                }

                let start_label = self.ctx.new_label();
                let cond_label = self.ctx.new_label();
                let end_label = self.ctx.new_label();

                self.ctx.emit(Quad::goto(cond_label.clone()));
                self.ctx.emit(Quad::label(start_label.clone()));
                self.visit_block(&for_stmt.body);
                if let Some(update) = &for_stmt.update {
                    self.visit_stmt(update);
                }
                self.ctx.emit(Quad::label(cond_label));
                match &for_stmt.cond {
                    Some(cond) => {
                        let cond = self.visit_expr(cond);
                        self.jump_if(Opcode::If, cond, &start_label);
                    }
                    None => self.ctx.emit(Quad::goto(start_label)),
                }
                self.ctx.emit(Quad::label(end_label));
            }
        }
    }
}
