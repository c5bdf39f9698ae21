mod context;
mod tree;

pub use context::{ContextError, ContextResult, RouterContext};
pub use tree::{Base, RouterScope};
