use crate::{
    ast::{BinOp, Expr, ExprKind},
    make_semantic_error,
    semantics::{SemanticChecker, Type},
};

impl SemanticChecker {
    /// Infers the type of `expr`, reporting each problem once. Operands that
    /// are already `error` do not produce further mismatches.
    pub(crate) fn type_of(&mut self, expr: &Expr) -> Type {
        match &expr.kind {
            ExprKind::Int(_) => Type::Int,
            ExprKind::Float(_) => Type::Float,
            ExprKind::Error => Type::Error,
            ExprKind::Var(name) => match self.lookup(name) {
                Some(symbol) => symbol.ty,
                None => {
                    self.report(make_semantic_error!(expr.pos, name, Undeclared(name.clone())));
                    Type::Error
                }
            },
            ExprKind::Binary(op, lhs, rhs) => {
                let lhs = self.type_of(lhs);
                let rhs = self.type_of(rhs);
                self.type_of_binary(expr, *op, lhs, rhs)
            }
        }
    }

    fn type_of_binary(&mut self, expr: &Expr, op: BinOp, lhs: Type, rhs: Type) -> Type {
        let poisoned = lhs == Type::Error || rhs == Type::Error;

        if op.is_comparison() {
            if !poisoned && lhs != rhs {
                self.report(make_semantic_error!(
                    expr.pos,
                    op.spelling(),
                    ComparisonMismatch(lhs, rhs)
                ));
            }
            return Type::Bool;
        }

        if op.is_logical() {
            if !poisoned && (lhs != Type::Bool || rhs != Type::Bool) {
                self.report(make_semantic_error!(
                    expr.pos,
                    op.spelling(),
                    LogicalNotBool(lhs, rhs)
                ));
            }
            return Type::Bool;
        }

        if poisoned {
            return Type::Error;
        }
        if lhs != rhs {
            self.report(make_semantic_error!(
                expr.pos,
                op.spelling(),
                ArithmeticMismatch(lhs, rhs)
            ));
        }
        lhs
    }

    pub(crate) fn check_condition(&mut self, construct: &'static str, cond: &Expr) {
        let found = self.type_of(cond);
        if found != Type::Bool && found != Type::Error {
            self.report(make_semantic_error!(
                cond.pos,
                construct,
                ConditionNotBool { construct, found }
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        ast::parse,
        diagnostic::DiagnosticKind,
        lexer::tokenize,
        semantics::{check, error::SemanticErrorKind},
        tokens::TokenTable,
    };

    fn semantic_errors(src: &str) -> Vec<SemanticErrorKind> {
        let (tokens, _) = tokenize(src, &TokenTable::default());
        let (program, _) = parse(&tokens);
        let (_, diagnostics) = check(&program);
        diagnostics
            .into_iter()
            .filter_map(|d| match d.kind {
                DiagnosticKind::Semantic(kind) => Some(kind),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn undeclared_operand_does_not_cascade() {
        let errors = semantic_errors("void main() { int x = 1; x = y + 1; }");
        assert_eq!(errors, vec![SemanticErrorKind::Undeclared("y".to_owned())]);
    }

    #[test]
    fn int_float_arithmetic_is_rejected() {
        let errors = semantic_errors("void main() { float f = 1.0; int x = 1; f = f + x; }");
        assert!(matches!(
            errors.as_slice(),
            [SemanticErrorKind::ArithmeticMismatch(_, _)]
        ));
    }

    #[test]
    fn logical_needs_comparisons() {
        let errors = semantic_errors("void main() { int a = 1; if ((a < 2) && a) { a = 2; } }");
        assert!(matches!(
            errors.as_slice(),
            [SemanticErrorKind::LogicalNotBool(_, _)]
        ));
    }
}
