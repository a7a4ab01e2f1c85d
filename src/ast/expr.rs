use std::fmt::Display;

use enum_as_inner::EnumAsInner;

use crate::{
    ast::Parser,
    diagnostic::SyntaxErrorKind,
    lexer::{Literal, TokenPosition},
    tokens::TokenType,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub pos: TokenPosition,
}

#[derive(Debug, Clone, PartialEq, EnumAsInner)]
pub enum ExprKind {
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Int(i64),
    Float(f64),
    Var(String),
    /// Placeholder for a missing operand.
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Mul,
    Div,
    Add,
    Sub,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

impl BinOp {
    pub fn from_token(token_type: TokenType) -> Option<Self> {
        let op = match token_type {
            TokenType::Star => BinOp::Mul,
            TokenType::Slash => BinOp::Div,
            TokenType::Plus => BinOp::Add,
            TokenType::Minus => BinOp::Sub,
            TokenType::Lt => BinOp::Lt,
            TokenType::Le => BinOp::Le,
            TokenType::Gt => BinOp::Gt,
            TokenType::Ge => BinOp::Ge,
            TokenType::EqEq => BinOp::Eq,
            TokenType::Ne => BinOp::Ne,
            TokenType::AndAnd => BinOp::And,
            TokenType::OrOr => BinOp::Or,
            _ => return None,
        };
        Some(op)
    }

    pub fn spelling(&self) -> &'static str {
        match self {
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge | BinOp::Eq | BinOp::Ne
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinOp::And | BinOp::Or)
    }
}

impl Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.spelling())
    }
}

impl Expr {
    pub fn new(kind: ExprKind, pos: TokenPosition) -> Self {
        Self { kind, pos }
    }

    fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Self {
        let pos = lhs.pos;
        Self::new(ExprKind::Binary(op, Box::new(lhs), Box::new(rhs)), pos)
    }

    /// Full condition grammar, loosest operator first.
    pub fn eat_logical_or(parser: &mut Parser) -> Expr {
        let mut lhs = Self::eat_logical_and(parser);
        while parser.eat_if(TokenType::OrOr) {
            let rhs = Self::eat_logical_and(parser);
            lhs = Self::binary(BinOp::Or, lhs, rhs);
        }
        lhs
    }

    fn eat_logical_and(parser: &mut Parser) -> Expr {
        let mut lhs = Self::eat_equality(parser);
        while parser.eat_if(TokenType::AndAnd) {
            let rhs = Self::eat_equality(parser);
            lhs = Self::binary(BinOp::And, lhs, rhs);
        }
        lhs
    }

    /// Equality and relational levels apply at most once each.
    fn eat_equality(parser: &mut Parser) -> Expr {
        let lhs = Self::eat_relational(parser);
        Self::eat_single_op(parser, lhs, &[TokenType::EqEq, TokenType::Ne], Self::eat_relational)
    }

    fn eat_relational(parser: &mut Parser) -> Expr {
        let lhs = Self::eat_additive(parser);
        Self::eat_single_op(
            parser,
            lhs,
            &[TokenType::Lt, TokenType::Le, TokenType::Gt, TokenType::Ge],
            Self::eat_additive,
        )
    }

    fn eat_single_op(
        parser: &mut Parser,
        lhs: Expr,
        ops: &[TokenType],
        operand: fn(&mut Parser) -> Expr,
    ) -> Expr {
        let token_type = parser.peek_type();
        if !ops.contains(&token_type) {
            return lhs;
        }
        parser.advance();
        let rhs = operand(parser);
        match BinOp::from_token(token_type) {
            Some(op) => Self::binary(op, lhs, rhs),
            None => lhs,
        }
    }

    /// Right-hand sides of assignments and initializers stop here.
    pub fn eat_additive(parser: &mut Parser) -> Expr {
        Self::eat_left_assoc(
            parser,
            &[TokenType::Plus, TokenType::Minus],
            Self::eat_multiplicative,
        )
    }

    fn eat_multiplicative(parser: &mut Parser) -> Expr {
        Self::eat_left_assoc(parser, &[TokenType::Star, TokenType::Slash], Self::eat_primary)
    }

    fn eat_left_assoc(
        parser: &mut Parser,
        ops: &[TokenType],
        operand: fn(&mut Parser) -> Expr,
    ) -> Expr {
        let mut lhs = operand(parser);
        loop {
            let token_type = parser.peek_type();
            let Some(op) = BinOp::from_token(token_type).filter(|_| ops.contains(&token_type))
            else {
                break lhs;
            };
            parser.advance();
            let rhs = operand(parser);
            lhs = Self::binary(op, lhs, rhs);
        }
    }

    fn eat_primary(parser: &mut Parser) -> Expr {
        let pos = parser.pos();
        let token = parser.peek();

        match token.token_type {
            TokenType::OpenPar => {
                parser.advance();
                let inner = Self::eat_logical_or(parser);
                parser.expect(TokenType::ClosePar);
                inner
            }
            TokenType::Integer | TokenType::Octal | TokenType::Hex | TokenType::Real => {
                parser.advance();
                match token.value {
                    Some(Literal::Integer(value)) => Expr::new(ExprKind::Int(value), pos),
                    Some(Literal::Real(value)) => Expr::new(ExprKind::Float(value), pos),
                    None => Expr::new(ExprKind::Error, pos),
                }
            }
            TokenType::Id => {
                parser.advance();
                Expr::new(ExprKind::Var(token.lexeme.clone()), pos)
            }
            _ => {
                parser.error(SyntaxErrorKind::MissingExpr);
                Expr::new(ExprKind::Error, pos)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        ast::{BinOp, Expr, ExprKind, Parser},
        lexer::tokenize,
        tokens::TokenTable,
    };

    fn condition(src: &str) -> (Expr, usize) {
        let (tokens, _) = tokenize(src, &TokenTable::default());
        let mut parser = Parser::new(&tokens);
        let expr = Expr::eat_logical_or(&mut parser);
        (expr, parser.into_diagnostics().len())
    }

    fn shape(expr: &Expr) -> String {
        match &expr.kind {
            ExprKind::Binary(op, lhs, rhs) => format!("({} {op} {})", shape(lhs), shape(rhs)),
            ExprKind::Int(v) => v.to_string(),
            ExprKind::Float(v) => format!("{v:?}"),
            ExprKind::Var(name) => name.clone(),
            ExprKind::Error => "?".to_owned(),
        }
    }

    #[test]
    fn precedence_and_associativity() {
        let (expr, errors) = condition("a - b - c * d / 2 < 3 && x == y || z > 0");
        assert_eq!(errors, 0);
        assert_eq!(
            shape(&expr),
            "(((((a - b) - ((c * d) / 2)) < 3) && (x == y)) || (z > 0))"
        );
    }

    #[test]
    fn relational_applies_once() {
        let (expr, _) = condition("a < b < c");
        assert_eq!(shape(&expr), "(a < b)");
        assert_eq!(expr.kind.as_binary().map(|(op, _, _)| *op), Some(BinOp::Lt));
    }

    #[test]
    fn parenthesised_condition() {
        let (expr, errors) = condition("(a < b) && (0x10 >= 1.5)");
        assert_eq!(errors, 0);
        assert_eq!(shape(&expr), "((a < b) && (16 >= 1.5))");
    }

    #[test]
    fn missing_operand_is_placeholder() {
        let (expr, errors) = condition("a + ;");
        assert_eq!(errors, 1);
        assert_eq!(shape(&expr), "(a + ?)");
    }
}
