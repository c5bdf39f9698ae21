use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::store::safe_not_equal_via_partial_eq;

pub type Params = HashMap<String, String>;

/// Identity of a registered route within its scope. Registration order is
/// encoded in the handle, but ties are broken by list position, never by
/// handle value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteHandle(pub u64);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteEntry {
    pub handle: RouteHandle,
    /// Absolute pattern, always `combine_paths(base.path, original_pattern)`.
    pub pattern: String,
    /// Pattern as registered; patterns are re-rooted from this on base
    /// changes, never from the previous `pattern`.
    pub original_pattern: String,
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteMatch {
    pub route: RouteEntry,
    pub params: Params,
    /// Portion of the requested path actually consumed by the match.
    pub uri: String,
}

safe_not_equal_via_partial_eq!(RouteHandle, RouteEntry, RouteMatch);
