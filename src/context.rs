//! Scoping: symbol tables chained through their parents, and execution
//! contexts chained through their callers.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::position::Span;
use crate::value::Value;

/// Name to value bindings with an optional enclosing table.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: RefCell<HashMap<String, Value>>,
    parent: Option<Rc<SymbolTable>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parent(parent: Rc<SymbolTable>) -> Self {
        SymbolTable {
            symbols: RefCell::new(HashMap::new()),
            parent: Some(parent),
        }
    }

    /// Looks `name` up here, then in each enclosing table.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.symbols.borrow().get(name) {
            return Some(value.clone());
        }
        self.parent.as_ref().and_then(|parent| parent.get(name))
    }

    /// Binds `name` in this table, never in a parent.
    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.symbols.borrow_mut().insert(name.into(), value);
    }

    /// Removes a binding from this table.
    pub fn remove(&self, name: &str) -> Option<Value> {
        self.symbols.borrow_mut().remove(name)
    }

    /// Drops every local binding.
    pub(crate) fn clear(&self) {
        self.symbols.borrow_mut().clear();
    }
}

/// One frame of execution: `<program>` at the root, then one per call.
///
/// `parent` and `parent_span` describe the caller and the call site; they
/// are only used to build tracebacks. Name resolution goes through
/// `symbols`, whose parent is the table the callee was defined in.
#[derive(Debug)]
pub struct Context {
    pub name: String,
    pub parent: Option<Rc<Context>>,
    pub parent_span: Option<Span>,
    pub symbols: Rc<SymbolTable>,
    depth: usize,
}

impl Context {
    pub fn root(name: impl Into<String>, symbols: Rc<SymbolTable>) -> Self {
        Context {
            name: name.into(),
            parent: None,
            parent_span: None,
            symbols,
            depth: 0,
        }
    }

    /// Root frame of a script started from inside another one, `depth`
    /// frames deep.
    pub(crate) fn nested_root(name: impl Into<String>, symbols: Rc<SymbolTable>, depth: usize) -> Self {
        Context {
            depth,
            ..Context::root(name, symbols)
        }
    }

    /// A frame called from `parent` at `call_site`.
    pub fn call(
        name: impl Into<String>,
        parent: &Rc<Context>,
        call_site: Span,
        symbols: Rc<SymbolTable>,
    ) -> Self {
        Context {
            name: name.into(),
            parent: Some(Rc::clone(parent)),
            parent_span: Some(call_site),
            symbols,
            depth: parent.depth + 1,
        }
    }

    /// Number of frames above this one.
    pub fn depth(&self) -> usize {
        self.depth
    }
}
