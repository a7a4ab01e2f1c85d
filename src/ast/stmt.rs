use enum_as_inner::EnumAsInner;

use crate::{
    ast::{Eatable, Eaten, Parser, TypeName, expr::Expr},
    diagnostic::SyntaxErrorKind,
    lexer::TokenPosition,
    tokens::TokenType,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub pos: TokenPosition,
}

#[derive(Debug, Clone, PartialEq, EnumAsInner)]
pub enum StmtKind {
    Decl(DeclStmt),
    Assign(AssignStmt),
    If(CondStmt),
    While(CondStmt),
    DoWhile(CondStmt),
    For(ForStmt),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeclStmt {
    pub ty: TypeName,
    pub name: String,
    pub init: Option<Expr>,
    pub is_const: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignStmt {
    pub target: String,
    pub value: Expr,
}

/// Shared by `if`, `while` and `do ... while`.
#[derive(Debug, Clone, PartialEq)]
pub struct CondStmt {
    pub cond: Expr,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub init: Option<Box<Stmt>>,
    pub cond: Option<Expr>,
    pub update: Option<Box<Stmt>>,
    pub body: Vec<Stmt>,
}

impl Eatable for Stmt {
    fn eat(parser: &mut Parser) -> Eaten<Self> {
        match parser.peek_type() {
            TokenType::If => eat_if(parser),
            TokenType::Do => eat_do_while(parser),
            TokenType::While => eat_while(parser),
            TokenType::For => eat_for(parser),
            TokenType::Const | TokenType::Int | TokenType::Float | TokenType::Char => {
                eat_declaration(parser)
            }
            TokenType::Id if parser.peek_nth_type(1) == TokenType::OpenPar => {
                parser.error(SyntaxErrorKind::FunctionCall);
                parser.skip_until(&[TokenType::Semi]);
                parser.eat_if(TokenType::Semi);
                (None, false)
            }
            TokenType::Id => eat_assignment(parser, true),
            TokenType::OpenCurly
            | TokenType::CloseCurly
            | TokenType::OpenPar
            | TokenType::ClosePar => {
                parser.advance();
                (None, false)
            }
            _ => {
                parser.error(SyntaxErrorKind::InvalidStatement);
                parser.advance();
                (None, false)
            }
        }
    }
}

/// Statements up to the closing `}`. Returns whether the `}` was found;
/// reaching end of input is reported against `construct`.
pub(crate) fn eat_block_body(parser: &mut Parser, construct: &'static str) -> (Vec<Stmt>, bool) {
    let mut body = Vec::new();

    while !parser.at_eof() && !parser.check(TokenType::CloseCurly) {
        let (stmt, recover) = Stmt::eat(parser);
        body.extend(stmt);
        if recover {
            parser.synchronize();
        }
    }

    if parser.at_eof() {
        parser.error(SyntaxErrorKind::UnclosedBlock(construct));
        return (body, false);
    }
    parser.advance();
    (body, true)
}

fn eat_type(parser: &mut Parser) -> (TypeName, bool) {
    match TypeName::from_token(parser.peek_type()) {
        Some(ty) => {
            parser.advance();
            (ty, true)
        }
        None => {
            parser.error(SyntaxErrorKind::MissingType);
            (TypeName::Int, false)
        }
    }
}

fn eat_declaration(parser: &mut Parser) -> Eaten<Stmt> {
    let pos = parser.pos();
    let is_const = parser.eat_if(TokenType::Const);
    let (ty, mut ok) = eat_type(parser);

    let name = if parser.check(TokenType::Id) {
        Some(parser.next().lexeme.clone())
    } else {
        parser.error(SyntaxErrorKind::MissingIdent);
        ok = false;
        None
    };

    let init = if is_const || parser.check(TokenType::Eq) {
        ok &= parser.expect(TokenType::Eq);
        Some(Expr::eat_additive(parser))
    } else {
        None
    };

    ok &= parser.expect(TokenType::Semi);

    let stmt = name.map(|name| Stmt {
        kind: StmtKind::Decl(DeclStmt {
            ty,
            name,
            init,
            is_const,
        }),
        pos,
    });
    (stmt, !ok)
}

/// `ID = additive`, with the trailing `;` when `terminated`.
fn eat_assignment(parser: &mut Parser, terminated: bool) -> Eaten<Stmt> {
    let pos = parser.pos();
    let target = parser.next().lexeme.clone();
    let mut ok = parser.expect(TokenType::Eq);
    let value = Expr::eat_additive(parser);
    if terminated {
        ok &= parser.expect(TokenType::Semi);
    }

    let stmt = Stmt {
        kind: StmtKind::Assign(AssignStmt { target, value }),
        pos,
    };
    (Some(stmt), !ok)
}

/// `( condition ) {` shared by `if` and `while`.
fn eat_cond_head(parser: &mut Parser) -> (Expr, bool) {
    let mut ok = parser.expect(TokenType::OpenPar);
    let cond = Expr::eat_logical_or(parser);
    ok &= parser.expect(TokenType::ClosePar);
    ok &= parser.expect(TokenType::OpenCurly);
    (cond, ok)
}

fn eat_if(parser: &mut Parser) -> Eaten<Stmt> {
    let pos = parser.pos();
    parser.advance();
    let (cond, _) = eat_cond_head(parser);
    let (body, _) = eat_block_body(parser, "if");

    let stmt = Stmt {
        kind: StmtKind::If(CondStmt { cond, body }),
        pos,
    };
    (Some(stmt), false)
}

fn eat_while(parser: &mut Parser) -> Eaten<Stmt> {
    let pos = parser.pos();
    parser.advance();
    let (cond, _) = eat_cond_head(parser);
    let (body, _) = eat_block_body(parser, "while");

    let stmt = Stmt {
        kind: StmtKind::While(CondStmt { cond, body }),
        pos,
    };
    (Some(stmt), false)
}

fn eat_do_while(parser: &mut Parser) -> Eaten<Stmt> {
    let pos = parser.pos();
    parser.advance();
    parser.expect(TokenType::OpenCurly);
    let (body, closed) = eat_block_body(parser, "do-while");
    if !closed {
        return (None, false);
    }

    let mut ok = parser.expect(TokenType::While);
    ok &= parser.expect(TokenType::OpenPar);
    let cond = Expr::eat_logical_or(parser);
    ok &= parser.expect(TokenType::ClosePar);
    ok &= parser.expect(TokenType::Semi);

    let stmt = Stmt {
        kind: StmtKind::DoWhile(CondStmt { cond, body }),
        pos,
    };
    (Some(stmt), !ok)
}

fn is_assignment_start(parser: &Parser) -> bool {
    parser.check(TokenType::Id) && parser.peek_nth_type(1) == TokenType::Eq
}

/// Skips a broken clause up to its `;`, consuming it, or up to the `)`.
fn skip_clause(parser: &mut Parser) {
    parser.skip_until(&[TokenType::Semi, TokenType::ClosePar]);
    parser.eat_if(TokenType::Semi);
}

fn eat_for_init(parser: &mut Parser) -> Option<Box<Stmt>> {
    match parser.peek_type() {
        TokenType::Const | TokenType::Int | TokenType::Float | TokenType::Char => {
            let (stmt, recover) = eat_declaration(parser);
            if recover {
                skip_clause(parser);
            }
            stmt.map(Box::new)
        }
        _ if is_assignment_start(parser) => {
            let (stmt, recover) = eat_assignment(parser, true);
            if recover {
                skip_clause(parser);
            }
            stmt.map(Box::new)
        }
        TokenType::Semi => {
            parser.error(SyntaxErrorKind::EmptyForInit);
            parser.advance();
            None
        }
        _ => {
            parser.error(SyntaxErrorKind::BadForInit);
            skip_clause(parser);
            None
        }
    }
}

fn eat_for_cond(parser: &mut Parser) -> Option<Expr> {
    let cond = if matches!(parser.peek_type(), TokenType::Semi | TokenType::ClosePar) {
        parser.error(SyntaxErrorKind::EmptyForCond);
        None
    } else {
        Some(Expr::eat_logical_or(parser))
    };

    if !parser.expect(TokenType::Semi) {
        skip_clause(parser);
    }
    cond
}

fn eat_for_update(parser: &mut Parser) -> Option<Box<Stmt>> {
    if parser.check(TokenType::ClosePar) {
        parser.error(SyntaxErrorKind::EmptyForUpdate);
        return None;
    }
    if !is_assignment_start(parser) {
        parser.error(SyntaxErrorKind::BadForUpdate);
        parser.skip_until(&[TokenType::ClosePar, TokenType::OpenCurly]);
        return None;
    }

    let (stmt, _) = eat_assignment(parser, false);
    stmt.map(Box::new)
}

fn eat_for(parser: &mut Parser) -> Eaten<Stmt> {
    let pos = parser.pos();
    parser.advance();
    parser.expect(TokenType::OpenPar);

    let init = eat_for_init(parser);
    let cond = eat_for_cond(parser);
    let update = eat_for_update(parser);

    if !parser.expect(TokenType::ClosePar) {
        parser.skip_until(&[TokenType::OpenCurly]);
    }
    parser.expect(TokenType::OpenCurly);
    let (body, _) = eat_block_body(parser, "for");

    let stmt = Stmt {
        kind: StmtKind::For(ForStmt {
            init,
            cond,
            update,
            body,
        }),
        pos,
    };
    (Some(stmt), false)
}
