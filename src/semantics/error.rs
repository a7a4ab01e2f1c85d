use std::fmt::Display;

use crate::semantics::Type;

#[derive(Debug, Clone, PartialEq)]
pub enum SemanticErrorKind {
    EmptyProgram,
    /// Holds the statement kind, e.g. `assignment`.
    TopLevelStatement(&'static str),
    MainReturnType(Type),
    Redeclared(String),
    Undeclared(String),
    AssignToConst(String),
    TypeMismatch {
        name: String,
        expected: Type,
        found: Type,
    },
    ConditionNotBool {
        construct: &'static str,
        found: Type,
    },
    ComparisonMismatch(Type, Type),
    LogicalNotBool(Type, Type),
    ArithmeticMismatch(Type, Type),
}

#[macro_export]
macro_rules! make_semantic_error {
    ($pos:expr, $text:expr, $kind:ident $($tail:tt)*) => {
        $crate::make_diagnostic!(
            Semantic($crate::semantics::error::SemanticErrorKind::$kind $($tail)*),
            $text,
            $pos
        )
    };
}

impl Display for SemanticErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SemanticErrorKind::EmptyProgram => write!(f, "empty program"),
            SemanticErrorKind::TopLevelStatement(kind) => {
                write!(f, "{kind} statement is not allowed at top level")
            }
            SemanticErrorKind::MainReturnType(ty) => {
                write!(f, "main should return void, not {ty}")
            }
            SemanticErrorKind::Redeclared(name) => {
                write!(f, "variable '{name}' is already declared")
            }
            SemanticErrorKind::Undeclared(name) => write!(f, "variable '{name}' is not declared"),
            SemanticErrorKind::AssignToConst(name) => write!(f, "cannot modify constant '{name}'"),
            SemanticErrorKind::TypeMismatch {
                name,
                expected,
                found,
            } => write!(
                f,
                "type mismatch: cannot assign {found} to {expected} variable '{name}'"
            ),
            SemanticErrorKind::ConditionNotBool { construct, found } => {
                write!(f, "{construct} condition should be bool, not {found}")
            }
            SemanticErrorKind::ComparisonMismatch(lhs, rhs) => {
                write!(f, "comparison operand types differ: {lhs} and {rhs}")
            }
            SemanticErrorKind::LogicalNotBool(lhs, rhs) => {
                write!(f, "logical operator requires bool operands, found {lhs} and {rhs}")
            }
            SemanticErrorKind::ArithmeticMismatch(lhs, rhs) => {
                write!(f, "arithmetic operand types differ: {lhs} and {rhs}")
            }
        }
    }
}
