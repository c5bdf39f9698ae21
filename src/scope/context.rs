use thiserror::Error;

use crate::history::History;

use super::RouterScope;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContextError {
    #[error("no enclosing router scope; open one with RouterContext::enter_scope first")]
    NoActiveScope,
}

pub type ContextResult<T> = Result<T, ContextError>;

/// Explicit stack of enclosing router scopes, threaded through a
/// construction or render pass instead of an ambient global lookup. Scope
/// lookups outside any open scope fail loudly.
#[derive(Default)]
pub struct RouterContext {
    stack: Vec<RouterScope>,
}

impl RouterContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a routing boundary: nests under the innermost open scope, or
    /// becomes the root when none is open. `basepath` only applies to the
    /// root; nested scopes inherit the parent's router base.
    pub fn enter_scope(&mut self, history: &History, basepath: &str) -> RouterScope {
        let scope = match self.stack.last() {
            Some(parent) => {
                if basepath != "/" {
                    tracing::debug!(basepath, "basepath is ignored on nested scopes");
                }
                RouterScope::nested(parent)
            }
            None => RouterScope::root(history, basepath),
        };
        self.stack.push(scope.clone());
        scope
    }

    pub fn exit_scope(&mut self) -> ContextResult<RouterScope> {
        self.stack.pop().ok_or(ContextError::NoActiveScope)
    }

    /// Innermost open scope.
    pub fn current(&self) -> ContextResult<&RouterScope> {
        self.stack.last().ok_or(ContextError::NoActiveScope)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}
