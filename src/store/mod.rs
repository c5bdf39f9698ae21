mod cell;
mod derived;
mod equality;

pub use cell::{StopFn, Store, Unsubscriber};
pub use derived::derived2;
pub use equality::SafeNotEqual;

pub(crate) use equality::safe_not_equal_via_partial_eq;
