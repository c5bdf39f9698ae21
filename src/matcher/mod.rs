mod pick;
mod rank;
mod types;

pub use pick::pick;
pub use rank::{RankedRoute, rank_routes};
pub use types::{Params, RouteEntry, RouteHandle, RouteMatch};
