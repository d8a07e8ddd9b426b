//! Symbol tables: chained name to value maps implementing lexical scope

mod modules;
mod prelude;

pub use modules::native_module;
pub use prelude::build_standard_environment;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::suggest::suggest_similar;
use crate::token::Keyword;
use crate::value::Value;

/// A scope: bindings plus an optional parent scope for fallback lookups.
///
/// Tables are shared (`Rc`) between the frame that owns them and every
/// function defined in them, and mutated through `&self`.
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use quill::{SymbolTable, Value};
///
/// let globals = Rc::new(SymbolTable::new());
/// globals.set("x", Value::Int(1));
///
/// let local = SymbolTable::with_parent(Rc::clone(&globals));
/// local.set("y", Value::Int(2));
///
/// assert_eq!(local.get("x", true), Some(Value::Int(1)));
/// assert_eq!(local.get("x", false), None); // no fallback unless asked
/// assert_eq!(globals.get("y", true), None);
/// ```
#[derive(Default)]
pub struct SymbolTable {
    symbols: RefCell<IndexMap<String, Value>>,
    parent: Option<Rc<SymbolTable>>,
}

impl SymbolTable {
    /// Create an empty table with no parent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table falling back to `parent`.
    pub fn with_parent(parent: Rc<SymbolTable>) -> Self {
        Self {
            symbols: RefCell::default(),
            parent: Some(parent),
        }
    }

    /// Create a table pre-filled with `symbols`.
    pub fn from_symbols(symbols: IndexMap<String, Value>, parent: Option<Rc<SymbolTable>>) -> Self {
        Self {
            symbols: RefCell::new(symbols),
            parent,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Bindings
    // ═══════════════════════════════════════════════════════════════════

    /// Look up a name; parents are searched only when `ascend` is set.
    pub fn get(&self, name: &str, ascend: bool) -> Option<Value> {
        if let Some(value) = self.symbols.borrow().get(name) {
            return Some(value.clone());
        }
        match &self.parent {
            Some(parent) if ascend => parent.get(name, true),
            _ => None,
        }
    }

    /// Bind a name in this table, replacing any existing binding.
    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.symbols.borrow_mut().insert(name.into(), value);
    }

    /// Remove a binding from this table only. Returns the removed value.
    pub fn remove(&self, name: &str) -> Option<Value> {
        self.symbols.borrow_mut().shift_remove(name)
    }

    /// Whether a name is bound here (or, with `ascend`, in any parent).
    pub fn exists(&self, name: &str, ascend: bool) -> bool {
        if self.symbols.borrow().contains_key(name) {
            return true;
        }
        match &self.parent {
            Some(parent) if ascend => parent.exists(name, true),
            _ => false,
        }
    }

    /// Snapshot of this table's own bindings, in definition order.
    pub fn locals(&self) -> IndexMap<String, Value> {
        self.symbols.borrow().clone()
    }

    /// Names bound in this table, in definition order.
    pub fn names(&self) -> Vec<String> {
        self.symbols.borrow().keys().cloned().collect()
    }

    /// Number of bindings in this table.
    pub fn len(&self) -> usize {
        self.symbols.borrow().len()
    }

    /// Whether this table has no bindings of its own.
    pub fn is_empty(&self) -> bool {
        self.symbols.borrow().is_empty()
    }

    // ═══════════════════════════════════════════════════════════════════
    // Suggestions
    // ═══════════════════════════════════════════════════════════════════

    /// Closest visible name (innermost scope first) or keyword to `name`.
    pub fn best_match(&self, name: &str) -> Option<String> {
        let mut candidates = Vec::new();
        let mut table = Some(self);
        while let Some(t) = table {
            candidates.extend(t.names());
            table = t.parent.as_deref();
        }
        candidates.extend(Keyword::all().map(str::to_string));

        suggest_similar(name, candidates.iter().map(String::as_str)).map(str::to_string)
    }
}

impl fmt::Debug for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolTable")
            .field("names", &self.names())
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces() {
        let table = SymbolTable::new();
        table.set("x", Value::Int(1));
        table.set("x", Value::Int(2));
        assert_eq!(table.get("x", false), Some(Value::Int(2)));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_shadowing_and_ascend() {
        let outer = Rc::new(SymbolTable::new());
        outer.set("x", Value::Int(1));
        let inner = SymbolTable::with_parent(Rc::clone(&outer));
        inner.set("x", Value::Int(10));

        assert_eq!(inner.get("x", true), Some(Value::Int(10)));
        assert!(inner.exists("x", false));
        assert!(!inner.exists("missing", true));

        inner.remove("x");
        assert_eq!(inner.get("x", true), Some(Value::Int(1)));
        assert_eq!(inner.get("x", false), None);
    }

    #[test]
    fn test_remove_only_touches_own_table() {
        let outer = Rc::new(SymbolTable::new());
        outer.set("x", Value::Int(1));
        let inner = SymbolTable::with_parent(Rc::clone(&outer));

        assert_eq!(inner.remove("x"), None);
        assert!(outer.exists("x", false));
    }

    #[test]
    fn test_best_match_prefers_inner_scope() {
        let outer = Rc::new(SymbolTable::new());
        outer.set("counter", Value::Int(0));
        let inner = SymbolTable::with_parent(Rc::clone(&outer));
        inner.set("countr", Value::Int(0));

        assert_eq!(inner.best_match("counte"), Some("countr".to_string()));
        assert_eq!(inner.best_match("whiel"), Some("while".to_string()));
        assert_eq!(inner.best_match("zzzzzz"), None);
    }
}
