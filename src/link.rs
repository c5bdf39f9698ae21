use serde::{Deserialize, Serialize};

use crate::history::Location;
use crate::path::resolve;
use crate::store::safe_not_equal_via_partial_eq;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkState {
    pub href: String,
    pub is_current: bool,
    pub is_partially_current: bool,
}

safe_not_equal_via_partial_eq!(LinkState);

/// Resolves `to` against the nearest scope's base uri and reports, by string
/// comparison against the current pathname, whether the link points at the
/// current location (exactly or as a prefix) for active-link styling.
pub fn link_state(to: &str, base_uri: &str, location: &Location) -> LinkState {
    let href = resolve(to, base_uri);
    let is_current = location.pathname == href;
    let is_partially_current = location.pathname.starts_with(&href);
    LinkState {
        href,
        is_current,
        is_partially_current,
    }
}
