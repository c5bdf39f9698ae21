use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::history::{History, Location};
use crate::matcher::{RouteEntry, RouteHandle, RouteMatch, pick};
use crate::path::{combine_paths, strip_splat};
use crate::store::{Store, Unsubscriber, derived2, safe_not_equal_via_partial_eq};

/// Absolute prefix a scope's registered routes are resolved against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Base {
    pub path: String,
    pub uri: String,
}

safe_not_equal_via_partial_eq!(Base);

struct ScopeState {
    location: Store<Location>,
    base: Store<Base>,
    routes: Store<Vec<RouteEntry>>,
    active_route: Store<Option<RouteMatch>>,
    router_base: Store<Base>,
    next_handle: Cell<u64>,
    // Held for the scope lifetime; dropping the scope tears the wiring down.
    _guards: Vec<Unsubscriber>,
}

/// A nested routing boundary: owns a base, a registration-ordered route list
/// and the derived active route. Nested scopes share the root's location
/// store and inherit the parent's router base as their own base.
pub struct RouterScope {
    state: Rc<ScopeState>,
}

impl Clone for RouterScope {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl RouterScope {
    /// Outermost scope. Owns the canonical location store; the history
    /// listener attaches lazily with the store's first subscriber and
    /// detaches when the last one leaves.
    pub fn root(history: &History, basepath: &str) -> Self {
        let history = history.clone();
        let initial = history.location();
        let location = Store::with_start(initial, move |store: &Store<Location>| {
            // Navigations that happened while the store was cold are folded in
            // before the listener attaches.
            store.set(history.location());
            let store = store.clone();
            let listener = history.listen(move |event| store.set(event.location.clone()));
            Some(Box::new(move || drop(listener)) as Box<dyn FnOnce()>)
        });
        let base = Store::new(Base {
            path: basepath.to_string(),
            uri: basepath.to_string(),
        });
        Self::assemble(location, base)
    }

    /// Scope nested inside `parent`: same location store reference, and the
    /// parent's router base as its base.
    pub fn nested(parent: &RouterScope) -> Self {
        Self::assemble(
            parent.state.location.clone(),
            parent.state.router_base.clone(),
        )
    }

    fn assemble(location: Store<Location>, base: Store<Base>) -> Self {
        let routes: Store<Vec<RouteEntry>> = Store::new(Vec::new());

        let active_route = derived2(&routes, &location, |routes, location: &Location| {
            pick(routes, &location.pathname)
        });

        let router_base = derived2(
            &base,
            &active_route,
            |base: &Base, active: &Option<RouteMatch>| match active {
                None => base.clone(),
                Some(found) => Base {
                    path: if found.route.is_default {
                        base.path.clone()
                    } else {
                        strip_splat(&found.route.pattern).to_string()
                    },
                    uri: found.uri.clone(),
                },
            },
        );

        // Keep registered patterns rooted at the current base; recomputed
        // from original_pattern, never from the previous pattern, so
        // prefixes cannot compound.
        let routes_for_base = routes.clone();
        let rebase = base.subscribe(move |current: &Base| {
            let mut list = routes_for_base.get();
            let mut changed = false;
            for entry in list.iter_mut() {
                let pattern = combine_paths(&current.path, &entry.original_pattern);
                if pattern != entry.pattern {
                    entry.pattern = pattern;
                    changed = true;
                }
            }
            if changed {
                routes_for_base.set(list);
            }
        });

        Self {
            state: Rc::new(ScopeState {
                location,
                base,
                routes,
                active_route,
                router_base,
                next_handle: Cell::new(0),
                _guards: vec![rebase],
            }),
        }
    }

    /// Declares a route on this scope. `None` registers the scope's default
    /// route. The returned handle is the route's identity for unregistration;
    /// two routes may share a pattern string.
    pub fn register_route(&self, pattern: Option<&str>) -> RouteHandle {
        let handle = RouteHandle(self.state.next_handle.get());
        self.state.next_handle.set(handle.0 + 1);
        let original_pattern = pattern.unwrap_or("").to_string();
        let base = self.state.base.get();
        let entry = RouteEntry {
            handle,
            pattern: combine_paths(&base.path, &original_pattern),
            original_pattern,
            is_default: pattern.is_none(),
        };
        let mut list = self.state.routes.get();
        list.push(entry);
        self.state.routes.set(list);
        handle
    }

    /// Removes a route by identity. Unknown handles are ignored.
    pub fn unregister_route(&self, handle: RouteHandle) {
        let mut list = self.state.routes.get();
        let before = list.len();
        list.retain(|entry| entry.handle != handle);
        if list.len() != before {
            self.state.routes.set(list);
        }
    }

    pub fn location(&self) -> Store<Location> {
        self.state.location.clone()
    }

    pub fn base(&self) -> Store<Base> {
        self.state.base.clone()
    }

    pub fn routes(&self) -> Store<Vec<RouteEntry>> {
        self.state.routes.clone()
    }

    pub fn active_route(&self) -> Store<Option<RouteMatch>> {
        self.state.active_route.clone()
    }

    pub fn router_base(&self) -> Store<Base> {
        self.state.router_base.clone()
    }
}
