use std::fmt::{self, Display, Write};

use crate::{
    diagnostic::{Diagnostic, SyntaxErrorKind},
    lexer::{Token, TokenIter, TokenPosition},
    make_diagnostic,
    tokens::TokenType,
};

pub mod expr;
pub mod item;
pub mod stmt;

pub use expr::{BinOp, Expr, ExprKind};
pub use item::{FnItem, Item, Program};
pub use stmt::{AssignStmt, CondStmt, DeclStmt, ForStmt, Stmt, StmtKind};

/// A construct that was eaten: the node if one could be built, and whether
/// the caller has to resynchronize before going on.
pub type Eaten<T> = (Option<T>, bool);

pub trait Eatable: Sized {
    fn eat(parser: &mut Parser) -> Eaten<Self>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeName {
    Int,
    Float,
    Char,
    Void,
}

impl TypeName {
    pub fn from_token(token_type: TokenType) -> Option<Self> {
        match token_type {
            TokenType::Int => Some(TypeName::Int),
            TokenType::Float => Some(TypeName::Float),
            TokenType::Char => Some(TypeName::Char),
            TokenType::Void => Some(TypeName::Void),
            _ => None,
        }
    }
}

impl Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeName::Int => "int",
            TypeName::Float => "float",
            TypeName::Char => "char",
            TypeName::Void => "void",
        };
        f.write_str(name)
    }
}

pub struct Parser<'a> {
    iter: TokenIter<'a>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            iter: TokenIter::new(tokens),
            diagnostics: Vec::new(),
        }
    }

    pub fn peek(&self) -> &'a Token {
        self.iter.peek()
    }

    pub fn peek_type(&self) -> TokenType {
        self.iter.peek().token_type
    }

    pub fn peek_nth_type(&self, n: usize) -> TokenType {
        self.iter.peek_nth(n).token_type
    }

    pub fn check(&self, token_type: TokenType) -> bool {
        self.peek_type() == token_type
    }

    pub fn at_eof(&self) -> bool {
        self.iter.at_eof()
    }

    pub fn pos(&self) -> TokenPosition {
        self.iter.current_pos()
    }

    pub fn next(&mut self) -> &'a Token {
        self.iter.next()
    }

    pub fn advance(&mut self) {
        self.iter.advance();
    }

    pub fn eat_if(&mut self, token_type: TokenType) -> bool {
        if self.check(token_type) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes `token_type` or records it as missing. Nothing is skipped on
    /// a mismatch.
    pub fn expect(&mut self, token_type: TokenType) -> bool {
        if self.eat_if(token_type) {
            return true;
        }
        self.error(SyntaxErrorKind::Missing(token_type.spelling()));
        false
    }

    /// Records a diagnostic against the current token.
    pub fn error(&mut self, kind: SyntaxErrorKind) {
        let token = self.peek();
        let text = if self.at_eof() {
            "EOF"
        } else {
            token.lexeme.as_str()
        };
        self.diagnostics
            .push(make_diagnostic!(Syntax(kind), text, self.pos()));
    }

    pub fn skip_until(&mut self, stops: &[TokenType]) {
        while !self.at_eof() && !stops.contains(&self.peek_type()) {
            self.advance();
        }
    }

    /// Panic-mode recovery: skip to a statement start or a structural
    /// delimiter. A `;` is consumed, the others are left in place.
    pub fn synchronize(&mut self) {
        while !self.at_eof() {
            match self.peek_type() {
                TokenType::Semi => {
                    self.advance();
                    return;
                }
                TokenType::If
                | TokenType::Int
                | TokenType::Float
                | TokenType::Char
                | TokenType::Id
                | TokenType::Do
                | TokenType::While
                | TokenType::For
                | TokenType::ClosePar
                | TokenType::OpenCurly
                | TokenType::CloseCurly => return,
                _ => self.advance(),
            }
        }
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

/// Builds a best-effort tree; malformed input only ever adds diagnostics.
pub fn parse(tokens: &[Token]) -> (Program, Vec<Diagnostic>) {
    let mut parser = Parser::new(tokens);
    let program = Program::eat_all(&mut parser);
    (program, parser.into_diagnostics())
}

fn indent(f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        f.write_str("  ")?;
    }
    Ok(())
}

fn write_expr(f: &mut fmt::Formatter<'_>, expr: &Expr, depth: usize) -> fmt::Result {
    indent(f, depth)?;
    match &expr.kind {
        ExprKind::Binary(op, lhs, rhs) => {
            writeln!(f, "BinaryOp {op}")?;
            write_expr(f, lhs, depth + 1)?;
            write_expr(f, rhs, depth + 1)
        }
        ExprKind::Int(value) => writeln!(f, "IntLiteral {value}"),
        ExprKind::Float(value) => writeln!(f, "FloatLiteral {value:?}"),
        ExprKind::Var(name) => writeln!(f, "VarRef {name}"),
        ExprKind::Error => writeln!(f, "<error>"),
    }
}

fn write_clause(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    depth: usize,
    body: impl FnOnce(&mut fmt::Formatter<'_>) -> fmt::Result,
) -> fmt::Result {
    indent(f, depth)?;
    writeln!(f, "{label}:")?;
    body(f)
}

fn write_stmt(f: &mut fmt::Formatter<'_>, stmt: &Stmt, depth: usize) -> fmt::Result {
    indent(f, depth)?;
    match &stmt.kind {
        StmtKind::Decl(decl) => {
            let mut head = String::new();
            if decl.is_const {
                head.push_str("const ");
            }
            write!(head, "{} {}", decl.ty, decl.name)?;
            writeln!(f, "VarDecl {head}")?;
            if let Some(init) = &decl.init {
                write_expr(f, init, depth + 1)?;
            }
            Ok(())
        }
        StmtKind::Assign(assign) => {
            writeln!(f, "Assignment {}", assign.target)?;
            write_expr(f, &assign.value, depth + 1)
        }
        StmtKind::If(cond) | StmtKind::While(cond) | StmtKind::DoWhile(cond) => {
            let name = match &stmt.kind {
                StmtKind::If(_) => "If",
                StmtKind::While(_) => "While",
                _ => "DoWhile",
            };
            writeln!(f, "{name}")?;
            write_clause(f, "condition", depth + 1, |f| {
                write_expr(f, &cond.cond, depth + 2)
            })?;
            write_block(f, &cond.body, depth + 1)
        }
        StmtKind::For(for_stmt) => {
            writeln!(f, "For")?;
            if let Some(init) = &for_stmt.init {
                write_clause(f, "init", depth + 1, |f| write_stmt(f, init, depth + 2))?;
            }
            if let Some(cond) = &for_stmt.cond {
                write_clause(f, "condition", depth + 1, |f| write_expr(f, cond, depth + 2))?;
            }
            if let Some(update) = &for_stmt.update {
                write_clause(f, "update", depth + 1, |f| {
                    write_stmt(f, update, depth + 2)
                })?;
            }
            write_block(f, &for_stmt.body, depth + 1)
        }
    }
}

fn write_block(f: &mut fmt::Formatter<'_>, body: &[Stmt], depth: usize) -> fmt::Result {
    write_clause(f, "body", depth, |f| {
        body.iter().try_for_each(|stmt| write_stmt(f, stmt, depth + 1))
    })
}

impl Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Program")?;
        for item in &self.items {
            match item {
                Item::Fn(func) => {
                    indent(f, 1)?;
                    writeln!(f, "FunctionDef {} -> {}", func.name, func.ret_ty)?;
                    write_block(f, &func.body, 2)?;
                }
                Item::Stmt(stmt) => write_stmt(f, stmt, 1)?,
            }
        }
        Ok(())
    }
}
