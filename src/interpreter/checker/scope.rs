use std::collections::HashMap;

use crate::ast::VariableId;

/// One frame of the scope chain.
///
/// A lambda body gets a child frame that borrows its enclosing frame. The
/// child lives on the stack of the checking function and disappears when
/// that function returns, so there is nothing to pop.
#[derive(Debug, Default)]
pub struct Scope<'a> {
    variables: HashMap<String, VariableId>,
    outer:     Option<&'a Scope<'a>>,
}

impl<'a> Scope<'a> {
    /// The outermost frame.
    #[must_use]
    pub fn global() -> Self {
        Self::default()
    }

    /// A new frame nested inside `outer`.
    #[must_use]
    pub fn child(outer: &'a Scope<'a>) -> Self {
        Self { variables: HashMap::new(),
               outer:     Some(outer), }
    }

    /// Adds `name` to this frame, shadowing any outer variable of that name.
    pub fn declare(&mut self, name: impl Into<String>, id: VariableId) {
        self.variables.insert(name.into(), id);
    }

    /// Whether this frame itself declares `name`. Outer frames are ignored.
    #[must_use]
    pub fn declares(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Resolves `name`, searching from this frame outward.
    ///
    /// # Example
    /// ```
    /// use seqcalc::{ast::VariableId, interpreter::checker::Scope};
    ///
    /// let mut global = Scope::global();
    /// global.declare("x", VariableId::new(0));
    ///
    /// let mut lambda = Scope::child(&global);
    /// lambda.declare("x", VariableId::new(1));
    ///
    /// assert_eq!(lambda.lookup("x"), Some(VariableId::new(1)));
    /// assert_eq!(global.lookup("x"), Some(VariableId::new(0)));
    /// assert!(!lambda.declares("y"));
    /// assert_eq!(lambda.lookup("y"), None);
    /// ```
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<VariableId> {
        let mut scope = Some(self);
        while let Some(current) = scope {
            if let Some(id) = current.variables.get(name) {
                return Some(*id);
            }
            scope = current.outer;
        }
        None
    }
}
