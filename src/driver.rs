use std::{
    fs,
    panic::{self, AssertUnwindSafe},
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::{
    ast::{self, Program},
    codegen::{self, Assembly},
    diagnostic::Diagnostic,
    ir::Quad,
    irgen,
    lexer::{self, Token, TokenPosition},
    opt,
    semantics::{self, scope::SymbolTable},
    tokens::TokenTable,
};

/// Failures at the boundary: files, the token table and listings. Problems
/// in the compiled program are [`Diagnostic`]s, never `DriverError`s.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("cannot read '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("malformed token table: {0}")]
    Json(#[from] serde_json::Error),
    #[error("token table entry '{0}' has a non-numeric code '{1}'")]
    BadTokenCode(String, String),
    #[error("line {line}: {reason}")]
    Listing { line: usize, reason: String },
    #[error("unrecognised operand '{0}'")]
    Operand(String),
    #[error("invalid built-in pattern: {0}")]
    Pattern(String),
    #[error(transparent)]
    Regex(#[from] fancy_regex::Error),
}

/// Every artifact and diagnostic of one run. Stages that did not run leave
/// their artifact empty.
#[derive(Debug, Clone, Default)]
pub struct Compilation {
    pub tokens: Vec<Token>,
    pub lex_diagnostics: Vec<Diagnostic>,
    pub program: Program,
    pub parse_diagnostics: Vec<Diagnostic>,
    pub symbols: SymbolTable,
    pub sema_diagnostics: Vec<Diagnostic>,
    pub ir: Vec<Quad>,
    pub optimized: Vec<Quad>,
    pub assembly: Option<Assembly>,
    /// Faults raised after semantic checking.
    pub internal_diagnostics: Vec<Diagnostic>,
}

impl Compilation {
    /// All diagnostics, stage by stage, each stage in detection order.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.lex_diagnostics
            .iter()
            .chain(&self.parse_diagnostics)
            .chain(&self.sema_diagnostics)
            .chain(&self.internal_diagnostics)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics().next().is_some()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_owned()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "stage panicked".to_owned()
    }
}

/// Runs `stage`, turning a panic into an internal diagnostic.
fn guarded<T>(stage: &str, sink: &mut Vec<Diagnostic>, f: impl FnOnce() -> T) -> Option<T> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Some(value),
        Err(payload) => {
            sink.push(crate::make_diagnostic!(
                Internal(format!("{stage}: {}", panic_message(payload.as_ref()))),
                "",
                TokenPosition::default()
            ));
            None
        }
    }
}

/// Runs the whole pipeline. Later stages work on the best-effort output of
/// earlier ones; with `strict`, nothing past semantic checking runs once a
/// diagnostic has been recorded.
pub fn compile(source: &str, table: &TokenTable, strict: bool) -> Compilation {
    let mut out = Compilation::default();

    if let Some((tokens, diagnostics)) =
        guarded("scanner", &mut out.lex_diagnostics, || lexer::tokenize(source, table))
    {
        out.tokens = tokens;
        out.lex_diagnostics.extend(diagnostics);
    }

    let tokens = &out.tokens;
    if let Some((program, diagnostics)) =
        guarded("parser", &mut out.parse_diagnostics, || ast::parse(tokens))
    {
        out.program = program;
        out.parse_diagnostics.extend(diagnostics);
    }

    let program = &out.program;
    if let Some((symbols, diagnostics)) =
        guarded("semantic checker", &mut out.sema_diagnostics, || {
            semantics::check(program)
        })
    {
        out.symbols = symbols;
        out.sema_diagnostics.extend(diagnostics);
    }

    if strict && out.has_errors() {
        return out;
    }

    let program = &out.program;
    let Some(ir) = guarded("IR generator", &mut out.internal_diagnostics, || {
        irgen::lower(program)
    }) else {
        return out;
    };
    out.ir = ir;

    let ir = &out.ir;
    let Some(optimized) = guarded("optimizer", &mut out.internal_diagnostics, || {
        opt::optimize(ir)
    }) else {
        return out;
    };
    out.optimized = optimized;

    let optimized = &out.optimized;
    out.assembly = guarded("code generator", &mut out.internal_diagnostics, || {
        codegen::emit(optimized)
    });

    out
}

pub fn read_source(path: &Path) -> Result<String, DriverError> {
    fs::read_to_string(path).map_err(|source| DriverError::Read {
        path: path.to_owned(),
        source,
    })
}

/// The built-in table, or the JSON table at `path`.
pub fn load_token_table(path: Option<&Path>) -> Result<TokenTable, DriverError> {
    match path {
        Some(path) => TokenTable::from_json(&read_source(path)?),
        None => Ok(TokenTable::default()),
    }
}

pub fn compile_file(path: &Path, table: &TokenTable, strict: bool) -> Result<Compilation, DriverError> {
    Ok(compile(&read_source(path)?, table, strict))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticKind;

    #[test]
    fn panics_become_internal_diagnostics() {
        let mut sink = Vec::new();
        let value: Option<()> = guarded("optimizer", &mut sink, || panic!("boom"));
        assert!(value.is_none());
        assert_eq!(sink.len(), 1);
        assert!(matches!(sink[0].kind, DiagnosticKind::Internal(_)));
        assert_eq!(sink[0].message(), "internal error: optimizer: boom");
    }

    #[test]
    fn strict_mode_stops_before_lowering() {
        let source = "void main() { x = 1; }";
        let lenient = compile(source, &TokenTable::default(), false);
        assert!(lenient.has_errors());
        assert!(lenient.assembly.is_some());

        let strict = compile(source, &TokenTable::default(), true);
        assert!(strict.ir.is_empty());
        assert!(strict.assembly.is_none());
    }
}
