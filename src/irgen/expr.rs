use crate::{
    ast::{Expr, ExprKind},
    ir::{Opcode, Operand, Quad},
    irgen::IRGenerator,
};

impl IRGenerator {
    /// Lowers `expr` and returns the operand holding its value. Leaves emit
    /// nothing and return themselves.
    pub(super) fn visit_expr(&mut self, expr: &Expr) -> Operand {
        match &expr.kind {
            ExprKind::Binary(op, lhs, rhs) => {
                let lhs = self.visit_expr(lhs);
                let rhs = self.visit_expr(rhs);
                let temp = self.ctx.new_temp();
                self.ctx
                    .emit(Quad::new(Opcode::from(*op), lhs, rhs, temp.clone()));
                temp
            }
            ExprKind::Int(value) => Operand::Int(*value),
            ExprKind::Float(value) => Operand::Real(*value),
            ExprKind::Var(name) => Operand::Var(name.clone()),
            ExprKind::Error => Operand::Int(0),
        }
    }
}
