//! Parser-scoped context: disambiguation flags and name caches.
//!
//! The flags toggle at a small number of well-defined points; all toggling
//! goes through [`Parser::with_flags`](crate::parser::Parser::with_flags) so
//! the previous state is restored even when the parse inside fails.

use rustc_hash::FxHashSet;

/// Disambiguation flags threaded through recursive parse calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ContextFlags {
    /// Parsing a `when`-clause pattern; suppresses `is`-expression parsing.
    pub in_when_pattern: bool,
    /// Parsing a `when`-clause body; suppresses `is`-expression parsing and
    /// the bare-identifier lambda shortcut (`x => ...` would swallow the next
    /// clause separator).
    pub in_when_clause_body: bool,
    /// Parsing the member list of a record body; suppresses the
    /// bare-identifier lambda shortcut in field initializers.
    pub parsing_record_body: bool,
    /// Parsing a branch of an inline conditional; suppresses the
    /// bare-identifier lambda shortcut so a trailing identifier cannot
    /// swallow a following `=>`.
    pub parsing_inline_conditional: bool,
}

impl ContextFlags {
    /// Whether `is` / `isnot` / `follows` parsing is currently suppressed.
    pub(crate) fn suppresses_is(self) -> bool {
        self.in_when_pattern || self.in_when_clause_body
    }

    /// Whether the bare-identifier lambda shortcut is currently suppressed.
    pub(crate) fn suppresses_bare_lambda(self) -> bool {
        self.in_when_clause_body || self.parsing_record_body || self.parsing_inline_conditional
    }
}

/// Name caches used only for disambiguation heuristics. Reset per parse; the
/// parser owns one instance per file.
#[derive(Debug, Default)]
pub(crate) struct NameScopes {
    /// Type names declared so far in this file.
    pub known_types: FxHashSet<String>,
    /// Namespaces brought in by `import`.
    pub imported_namespaces: FxHashSet<String>,
    /// Stack of generic-parameter scopes, innermost last.
    generic_scopes: Vec<FxHashSet<String>>,
}

impl NameScopes {
    /// Push a fresh generic-parameter scope.
    pub(crate) fn push_generic_scope(&mut self) {
        self.generic_scopes.push(FxHashSet::default());
    }

    /// Pop the innermost generic-parameter scope.
    pub(crate) fn pop_generic_scope(&mut self) {
        self.generic_scopes.pop();
    }

    /// Declare a generic parameter in the innermost scope.
    pub(crate) fn declare_generic(&mut self, name: &str) {
        if let Some(scope) = self.generic_scopes.last_mut() {
            scope.insert(name.to_string());
        }
    }

    /// Whether `name` is a generic parameter in any enclosing scope.
    pub(crate) fn is_generic_param(&self, name: &str) -> bool {
        self.generic_scopes.iter().rev().any(|scope| scope.contains(name))
    }
}
