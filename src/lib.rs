pub mod history;
pub mod link;
pub mod matcher;
pub mod path;
pub mod scope;
pub mod store;

pub use history::{
    Action, History, HistoryEntry, HistoryError, HistorySource, Location, MemorySource,
    NavigateOptions, NavigationEvent,
};
pub use link::{LinkState, link_state};
pub use matcher::{Params, RankedRoute, RouteEntry, RouteHandle, RouteMatch, pick, rank_routes};
pub use path::{SegmentKind, combine_paths, resolve, segment_kind, segmentize, strip_splat};
pub use scope::{Base, ContextError, RouterContext, RouterScope};
pub use store::{SafeNotEqual, Store, Unsubscriber, derived2};
