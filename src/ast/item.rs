use enum_as_inner::EnumAsInner;

use crate::{
    ast::{
        Eatable, Eaten, Parser, TypeName,
        stmt::{Stmt, eat_block_body},
    },
    diagnostic::SyntaxErrorKind,
    lexer::TokenPosition,
    tokens::TokenType,
};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, EnumAsInner)]
pub enum Item {
    Fn(FnItem),
    Stmt(Stmt),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FnItem {
    pub name: String,
    pub ret_ty: TypeName,
    pub body: Vec<Stmt>,
    pub pos: TokenPosition,
}

impl Program {
    /// Items in source order. A `type ID (` head starts a function
    /// definition; anything else is parsed as a statement.
    pub fn eat_all(parser: &mut Parser) -> Program {
        let mut items = Vec::new();

        while !parser.at_eof() {
            let (item, recover) = if FnItem::starts_here(parser) {
                let (func, recover) = FnItem::eat(parser);
                (func.map(Item::Fn), recover)
            } else {
                let (stmt, recover) = Stmt::eat(parser);
                (stmt.map(Item::Stmt), recover)
            };

            items.extend(item);
            if recover {
                parser.synchronize();
            }
        }

        Program { items }
    }

    pub fn functions(&self) -> impl Iterator<Item = &FnItem> {
        self.items.iter().filter_map(Item::as_fn)
    }
}

impl FnItem {
    /// `type ID (`, which can never start a declaration.
    fn starts_here(parser: &Parser) -> bool {
        parser.peek_type().is_type_keyword()
            && parser.peek_nth_type(1) == TokenType::Id
            && parser.peek_nth_type(2) == TokenType::OpenPar
    }

    /// Skips a rejected definition through the `}` matching its first `{`.
    fn skip_definition(parser: &mut Parser) {
        parser.skip_until(&[TokenType::OpenCurly]);
        let mut depth = 0usize;
        while !parser.at_eof() {
            match parser.next().token_type {
                TokenType::OpenCurly => depth += 1,
                TokenType::CloseCurly => {
                    depth -= 1;
                    if depth == 0 {
                        return;
                    }
                }
                _ => {}
            }
        }
    }
}

impl Eatable for FnItem {
    fn eat(parser: &mut Parser) -> Eaten<Self> {
        let pos = parser.pos();
        let Some(ret_ty) = TypeName::from_token(parser.peek_type()) else {
            parser.error(SyntaxErrorKind::MissingType);
            return (None, true);
        };
        parser.advance();

        let name = parser.peek();
        if name.token_type != TokenType::Id || name.lexeme != "main" {
            parser.error(SyntaxErrorKind::NotMainFunction);
            Self::skip_definition(parser);
            return (None, false);
        }
        parser.advance();

        parser.expect(TokenType::OpenPar);
        parser.expect(TokenType::ClosePar);
        parser.expect(TokenType::OpenCurly);
        let (body, _) = eat_block_body(parser, "main");

        let func = FnItem {
            name: name.lexeme.clone(),
            ret_ty,
            body,
            pos,
        };
        (Some(func), false)
    }
}
