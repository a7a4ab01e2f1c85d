use std::{
    collections::{BTreeMap, HashMap},
    fmt::Display,
};

use crate::semantics::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scope {
    Global,
    Main,
}

impl Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::Global => write!(f, "global"),
            Scope::Main => write!(f, "main"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub ty: Type,
    pub is_const: bool,
    pub line: usize,
}

/// Two flat scopes. Each name appears at most once per scope.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    scopes: HashMap<Scope, BTreeMap<String, Symbol>>,
}

impl SymbolTable {
    /// Returns `false`, leaving the existing entry alone, if `name` is
    /// already declared in `scope`.
    pub fn declare(&mut self, scope: Scope, name: &str, symbol: Symbol) -> bool {
        let entries = self.scopes.entry(scope).or_default();
        if entries.contains_key(name) {
            return false;
        }
        entries.insert(name.to_owned(), symbol);
        true
    }

    pub fn get(&self, scope: Scope, name: &str) -> Option<&Symbol> {
        self.scopes.get(&scope)?.get(name)
    }

    /// Resolves in `scope` first, then in the global scope.
    pub fn lookup(&self, scope: Scope, name: &str) -> Option<&Symbol> {
        self.get(scope, name)
            .or_else(|| self.get(Scope::Global, name))
    }

    /// Globals and `main` locals share one flat data segment, so a name may
    /// only be declared once across both scopes.
    pub fn declared_anywhere(&self, name: &str) -> bool {
        self.scopes.values().any(|entries| entries.contains_key(name))
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.values().all(BTreeMap::is_empty)
    }

    pub fn len(&self) -> usize {
        self.scopes.values().map(BTreeMap::len).sum()
    }

    /// Entries of one scope, sorted by name.
    pub fn entries(&self, scope: Scope) -> impl Iterator<Item = (&str, &Symbol)> {
        self.scopes
            .get(&scope)
            .into_iter()
            .flat_map(|entries| entries.iter().map(|(name, symbol)| (name.as_str(), symbol)))
    }
}

impl Display for SymbolTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return writeln!(f, "symbol table is empty");
        }

        let rule = "-".repeat(50);
        for scope in [Scope::Global, Scope::Main] {
            if self.entries(scope).next().is_none() {
                continue;
            }
            writeln!(f, "scope: {scope}")?;
            writeln!(f, "{rule}")?;
            writeln!(f, "{:<15} {:<10} {:<10} {:<10}", "name", "type", "const", "line")?;
            writeln!(f, "{rule}")?;
            for (name, symbol) in self.entries(scope) {
                let is_const = if symbol.is_const { "yes" } else { "no" };
                writeln!(
                    f,
                    "{:<15} {:<10} {:<10} {:<10}",
                    name,
                    symbol.ty.to_string(),
                    is_const,
                    symbol.line
                )?;
            }
        }
        Ok(())
    }
}
