use std::fmt::Display;

use crate::{
    ast::{FnItem, Item, Program, Stmt, StmtKind, TypeName},
    diagnostic::Diagnostic,
    lexer::TokenPosition,
    make_semantic_error,
    semantics::scope::{Scope, Symbol, SymbolTable},
};

pub mod error;
pub mod expr;
pub mod scope;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Int,
    Float,
    Char,
    Void,
    Bool,
    /// Type of an expression that already produced a diagnostic.
    Error,
}

impl From<TypeName> for Type {
    fn from(value: TypeName) -> Self {
        match value {
            TypeName::Int => Type::Int,
            TypeName::Float => Type::Float,
            TypeName::Char => Type::Char,
            TypeName::Void => Type::Void,
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Type::Int => "int",
            Type::Float => "float",
            Type::Char => "char",
            Type::Void => "void",
            Type::Bool => "bool",
            Type::Error => "error",
        };
        f.write_str(name)
    }
}

pub struct SemanticChecker {
    table: SymbolTable,
    scope: Scope,
    diagnostics: Vec<Diagnostic>,
}

/// Checks the whole program. Never stops early; every problem is collected.
pub fn check(program: &Program) -> (SymbolTable, Vec<Diagnostic>) {
    let mut checker = SemanticChecker::new();
    checker.visit_program(program);
    (checker.table, checker.diagnostics)
}

impl SemanticChecker {
    fn new() -> Self {
        Self {
            table: SymbolTable::default(),
            scope: Scope::Global,
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.table.lookup(self.scope, name)
    }

    fn visit_program(&mut self, program: &Program) {
        if program.items.is_empty() {
            let pos = TokenPosition { line: 1, col: 1 };
            self.report(make_semantic_error!(pos, "", EmptyProgram));
            return;
        }

        for item in &program.items {
            match item {
                Item::Fn(func) => self.visit_fn(func),
                Item::Stmt(stmt) => match &stmt.kind {
                    StmtKind::Decl(_) => self.visit_stmt(stmt),
                    other => {
                        let kind = statement_name(other);
                        self.report(make_semantic_error!(stmt.pos, kind, TopLevelStatement(kind)));
                    }
                },
            }
        }
    }

    fn visit_fn(&mut self, func: &FnItem) {
        if func.ret_ty != TypeName::Void {
            let ty = Type::from(func.ret_ty);
            self.report(make_semantic_error!(func.pos, &func.name, MainReturnType(ty)));
        }

        self.scope = Scope::Main;
        for stmt in &func.body {
            self.visit_stmt(stmt);
        }
        self.scope = Scope::Global;
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Decl(decl) => {
                if self.table.declared_anywhere(&decl.name) {
                    self.report(make_semantic_error!(
                        stmt.pos,
                        &decl.name,
                        Redeclared(decl.name.clone())
                    ));
                    return;
                }

                let declared = Type::from(decl.ty);
                if let Some(init) = &decl.init {
                    let found = self.type_of(init);
                    self.check_assignable(stmt.pos, &decl.name, declared, found);
                }

                let symbol = Symbol {
                    ty: declared,
                    is_const: decl.is_const,
                    line: stmt.pos.line,
                };
                self.table.declare(self.scope, &decl.name, symbol);
            }
            StmtKind::Assign(assign) => {
                let Some(&Symbol { ty: expected, is_const, .. }) = self.lookup(&assign.target)
                else {
                    self.report(make_semantic_error!(
                        stmt.pos,
                        &assign.target,
                        Undeclared(assign.target.clone())
                    ));
                    return;
                };
                if is_const {
                    self.report(make_semantic_error!(
                        stmt.pos,
                        &assign.target,
                        AssignToConst(assign.target.clone())
                    ));
                    return;
                }

                let found = self.type_of(&assign.value);
                self.check_assignable(stmt.pos, &assign.target, expected, found);
            }
            StmtKind::If(cond_stmt) => {
                self.check_condition("if", &cond_stmt.cond);
                self.visit_block(&cond_stmt.body);
            }
            StmtKind::While(cond_stmt) => {
                self.check_condition("while", &cond_stmt.cond);
                self.visit_block(&cond_stmt.body);
            }
            StmtKind::DoWhile(cond_stmt) => {
                self.visit_block(&cond_stmt.body);
                self.check_condition("do-while", &cond_stmt.cond);
            }
            StmtKind::For(for_stmt) => {
                if let Some(init) = &for_stmt.init {
                    self.visit_stmt(init);
                }
                if let Some(cond) = &for_stmt.cond {
                    self.check_condition("for", cond);
                }
                if let Some(update) = &for_stmt.update {
                    self.visit_stmt(update);
                }
                self.visit_block(&for_stmt.body);
            }
        }
    }

    fn visit_block(&mut self, body: &[Stmt]) {
        for stmt in body {
            self.visit_stmt(stmt);
        }
    }

    fn check_assignable(&mut self, pos: TokenPosition, name: &str, expected: Type, found: Type) {
        if found != expected && found != Type::Error {
            self.report(make_semantic_error!(
                pos,
                name,
                TypeMismatch {
                    name: name.to_owned(),
                    expected,
                    found,
                }
            ));
        }
    }
}

fn statement_name(kind: &StmtKind) -> &'static str {
    match kind {
        StmtKind::Decl(_) => "declaration",
        StmtKind::Assign(_) => "assignment",
        StmtKind::If(_) => "if",
        StmtKind::While(_) => "while",
        StmtKind::DoWhile(_) => "do-while",
        StmtKind::For(_) => "for",
    }
}
