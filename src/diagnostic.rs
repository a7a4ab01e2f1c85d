use std::fmt::Display;

use strum::Display as StrumDisplay;

use crate::{lexer::TokenPosition, semantics::error::SemanticErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
pub enum Stage {
    #[strum(to_string = "lexical")]
    Lexical,
    #[strum(to_string = "syntax")]
    Syntax,
    #[strum(to_string = "semantic")]
    Semantic,
    #[strum(to_string = "internal")]
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
pub enum LexErrorKind {
    #[strum(to_string = "Invalid hexadecimal")]
    InvalidHex,
    #[strum(to_string = "Invalid hexadecimal format")]
    InvalidHexFormat,
    #[strum(to_string = "Invalid octal")]
    InvalidOctal,
    #[strum(to_string = "Invalid octal format")]
    InvalidOctalFormat,
    #[strum(to_string = "Invalid decimal")]
    InvalidDecimal,
    #[strum(to_string = "Invalid decimal format")]
    InvalidDecimalFormat,
    #[strum(to_string = "Invalid Real")]
    InvalidReal,
    #[strum(to_string = "Integer literal out of range")]
    IntegerOutOfRange,
    #[strum(to_string = "Invalid operator")]
    InvalidOperator,
    #[strum(to_string = "Invalid character")]
    InvalidCharacter,
    #[strum(to_string = "Invalid string")]
    InvalidString,
    #[strum(to_string = "Invalid comment format")]
    InvalidComment,
    #[strum(to_string = "Unexpected character")]
    UnexpectedCharacter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// A specific token was expected; holds its spelling.
    Missing(&'static str),
    MissingType,
    MissingIdent,
    MissingExpr,
    InvalidStatement,
    FunctionCall,
    NotMainFunction,
    /// A body reached end of input before its `}`; holds the construct name.
    UnclosedBlock(&'static str),
    BadForInit,
    EmptyForInit,
    EmptyForCond,
    BadForUpdate,
    EmptyForUpdate,
}

impl Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyntaxErrorKind::Missing(what) => write!(f, "missing '{what}'"),
            SyntaxErrorKind::MissingType => write!(f, "missing type specifier"),
            SyntaxErrorKind::MissingIdent => write!(f, "missing identifier"),
            SyntaxErrorKind::MissingExpr => write!(f, "missing expression"),
            SyntaxErrorKind::InvalidStatement => write!(f, "invalid statement"),
            SyntaxErrorKind::FunctionCall => write!(f, "function calls are not supported"),
            SyntaxErrorKind::NotMainFunction => {
                write!(f, "only the 'main' function may be defined")
            }
            SyntaxErrorKind::UnclosedBlock(what) => {
                write!(f, "{what} body is not closed, missing '}}'")
            }
            SyntaxErrorKind::BadForInit => {
                write!(f, "for-loop initializer must be a declaration or an assignment")
            }
            SyntaxErrorKind::EmptyForInit => write!(f, "for-loop initializer must not be empty"),
            SyntaxErrorKind::EmptyForCond => write!(f, "for-loop condition must not be empty"),
            SyntaxErrorKind::BadForUpdate => write!(f, "for-loop update must be an assignment"),
            SyntaxErrorKind::EmptyForUpdate => write!(f, "for-loop update must not be empty"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticKind {
    Lex(LexErrorKind),
    Syntax(SyntaxErrorKind),
    Semantic(SemanticErrorKind),
    Internal(String),
}

impl DiagnosticKind {
    pub fn stage(&self) -> Stage {
        match self {
            DiagnosticKind::Lex(_) => Stage::Lexical,
            DiagnosticKind::Syntax(_) => Stage::Syntax,
            DiagnosticKind::Semantic(_) => Stage::Semantic,
            DiagnosticKind::Internal(_) => Stage::Internal,
        }
    }
}

impl Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticKind::Lex(kind) => write!(f, "{kind}"),
            DiagnosticKind::Syntax(kind) => write!(f, "{kind}"),
            DiagnosticKind::Semantic(kind) => write!(f, "{kind}"),
            DiagnosticKind::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

/// One recorded problem. Diagnostics are collected per stage in detection
/// order and never used to unwind between stages.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// The offending source text (a lexeme, or the token found instead of the
    /// expected one).
    pub text: String,
    pub pos: TokenPosition,
}

impl Diagnostic {
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    pub fn stage(&self) -> Stage {
        self.kind.stage()
    }
}

#[macro_export]
macro_rules! make_diagnostic {
    ($variant:ident($kind:expr), $text:expr, $pos:expr) => {
        $crate::diagnostic::Diagnostic {
            kind: $crate::diagnostic::DiagnosticKind::$variant($kind),
            text: ($text).to_string(),
            pos: ($pos).clone(),
        }
    };
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} error: {}",
            self.pos,
            self.stage(),
            self.kind
        )?;
        if !self.text.is_empty() {
            write!(f, " (found '{}')", self.text)?;
        }
        Ok(())
    }
}
