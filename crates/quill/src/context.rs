//! Evaluation frames
//!
//! A [`Context`] is created per function call, class body and module load.
//! It owns the frame's symbol table and remembers the frame that created it
//! together with the call-site position; walking that chain produces the
//! traceback of a runtime error.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::environment::SymbolTable;
use crate::position::Position;
use crate::value::Value;

/// An evaluation frame.
pub struct Context {
    /// Name shown in tracebacks (`<program>`, a function name, `<module m>`)
    pub display_name: String,

    /// The frame this one was entered from
    pub parent: Option<Rc<Context>>,

    /// Where in the parent frame this frame was entered
    pub parent_entry_pos: Option<Position>,

    /// Bindings of this frame
    pub symbol_table: Rc<SymbolTable>,

    /// Bindings marked with `export`
    pub exports: RefCell<IndexMap<String, Value>>,
}

impl Context {
    /// The outermost frame.
    pub fn root(display_name: impl Into<String>, symbol_table: Rc<SymbolTable>) -> Rc<Self> {
        Rc::new(Self {
            display_name: display_name.into(),
            parent: None,
            parent_entry_pos: None,
            symbol_table,
            exports: RefCell::default(),
        })
    }

    /// A frame entered from `parent` at `entry`.
    pub fn child(
        display_name: impl Into<String>,
        parent: &Rc<Context>,
        entry: Position,
        symbol_table: Rc<SymbolTable>,
    ) -> Rc<Self> {
        Rc::new(Self {
            display_name: display_name.into(),
            parent: Some(Rc::clone(parent)),
            parent_entry_pos: Some(entry),
            symbol_table,
            exports: RefCell::default(),
        })
    }

    /// A transient frame sharing this frame's identity (name and traceback
    /// parent) but resolving names through `symbol_table`.
    ///
    /// Used for the steps of an attribute chain.
    pub fn with_table(&self, symbol_table: Rc<SymbolTable>) -> Rc<Self> {
        Rc::new(Self {
            display_name: self.display_name.clone(),
            parent: self.parent.clone(),
            parent_entry_pos: self.parent_entry_pos.clone(),
            symbol_table,
            exports: RefCell::default(),
        })
    }

    /// Record an exported binding.
    pub fn export(&self, name: impl Into<String>, value: Value) {
        self.exports.borrow_mut().insert(name.into(), value);
    }

    /// Snapshot of the exported bindings.
    pub fn exported(&self) -> IndexMap<String, Value> {
        self.exports.borrow().clone()
    }

    /// Number of frames from this one to the root, inclusive.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut frame = self.parent.as_deref();
        while let Some(f) = frame {
            depth += 1;
            frame = f.parent.as_deref();
        }
        depth
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("display_name", &self.display_name)
            .field("depth", &self.depth())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_records_entry() {
        let root = Context::root("<program>", Rc::new(SymbolTable::new()));
        let entry = Position::start_of("main.ql", "f()");
        let child = Context::child("f", &root, entry, Rc::new(SymbolTable::new()));

        assert_eq!(child.depth(), 2);
        assert_eq!(child.parent.as_ref().map(|p| p.display_name.as_str()), Some("<program>"));
        assert!(child.parent_entry_pos.is_some());
    }

    #[test]
    fn test_with_table_keeps_identity() {
        let root = Context::root("<program>", Rc::new(SymbolTable::new()));
        let entry = Position::start_of("main.ql", "f()");
        let child = Context::child("f", &root, entry, Rc::new(SymbolTable::new()));

        let attrs = Rc::new(SymbolTable::with_parent(Rc::clone(&child.symbol_table)));
        attrs.set("a", Value::Int(1));
        let step = child.with_table(attrs);

        assert_eq!(step.display_name, "f");
        assert_eq!(step.depth(), 2);
        assert_eq!(step.symbol_table.get("a", false), Some(Value::Int(1)));
    }

    #[test]
    fn test_exports() {
        let root = Context::root("<module m>", Rc::new(SymbolTable::new()));
        root.export("x", Value::Int(3));
        assert_eq!(root.exported().get("x"), Some(&Value::Int(3)));
    }
}
