mod error;
mod source;

pub use error::{HistoryError, HistoryResult};
pub use source::{HistoryEntry, HistorySource, MemorySource};

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::path::split_query;
use crate::store::{Unsubscriber, safe_not_equal_via_partial_eq};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub pathname: String,
    /// Query string with its leading `?`, or empty.
    pub search: String,
    pub state: Value,
    /// Unique per push/replace within a session.
    pub key: String,
}

safe_not_equal_via_partial_eq!(Location);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Push,
    Pop,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavigationEvent {
    pub location: Location,
    pub action: Action,
}

#[derive(Debug, Clone, Default)]
pub struct NavigateOptions {
    pub state: Option<Value>,
    pub replace: bool,
}

type ListenerCell = Rc<RefCell<dyn FnMut(&NavigationEvent)>>;

struct HistoryState {
    source: Box<dyn HistorySource>,
    listeners: Vec<(u64, ListenerCell)>,
    next_listener: u64,
    next_key: u64,
    // Events queued while a notification pass is already running.
    pending: VecDeque<NavigationEvent>,
    notifying: bool,
}

/// Front-end over a [`HistorySource`]: exposes the current location, imperative
/// navigation and a location-change subscription surface.
pub struct History {
    state: Rc<RefCell<HistoryState>>,
}

impl Clone for History {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl History {
    pub fn new(source: impl HistorySource + 'static) -> Self {
        Self {
            state: Rc::new(RefCell::new(HistoryState {
                source: Box::new(source),
                listeners: Vec::new(),
                next_listener: 0,
                next_key: 1,
                pending: VecDeque::new(),
                notifying: false,
            })),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemorySource::new())
    }

    pub fn location(&self) -> Location {
        let entry = self.state.borrow().source.entry();
        location_from_entry(&entry)
    }

    /// Registers a listener invoked synchronously after every navigation,
    /// imperative or history-driven.
    pub fn listen(&self, listener: impl FnMut(&NavigationEvent) + 'static) -> Unsubscriber {
        let id = {
            let mut state = self.state.borrow_mut();
            let id = state.next_listener;
            state.next_listener += 1;
            state.listeners.push((id, Rc::new(RefCell::new(listener))));
            id
        };
        let history = self.clone();
        Unsubscriber::new(move || {
            history
                .state
                .borrow_mut()
                .listeners
                .retain(|(lid, _)| *lid != id);
        })
    }

    /// Pushes (or replaces with) `to`, stamping the persisted state with a
    /// fresh unique key. A rejected write falls back to a full reassignment;
    /// either way listeners observe the fresh location synchronously.
    #[tracing::instrument(level = "debug", skip(self, options), fields(to = %to, replace = options.replace))]
    pub fn navigate(&self, to: &str, options: NavigateOptions) {
        let event = {
            let mut state = self.state.borrow_mut();
            let key = state.next_key.to_string();
            state.next_key += 1;
            let entry = HistoryEntry::new(to, options.state.clone().unwrap_or(Value::Null), key);
            let write = if options.replace {
                state.source.replace(entry.clone())
            } else {
                state.source.push(entry.clone())
            };
            if let Err(error) = write {
                tracing::debug!(%error, "history write rejected; falling back to full reassignment");
                state.source.assign(entry);
            }
            NavigationEvent {
                location: location_from_entry(&state.source.entry()),
                action: Action::Push,
            }
        };
        self.notify(event);
    }

    pub fn back(&self) -> bool {
        self.go(-1)
    }

    pub fn forward(&self) -> bool {
        self.go(1)
    }

    /// Moves the cursor; listeners observe the restored location with
    /// [`Action::Pop`]. Returns false when the target is out of range.
    pub fn go(&self, delta: isize) -> bool {
        let event = {
            let mut state = self.state.borrow_mut();
            if !state.source.go(delta) {
                return false;
            }
            NavigationEvent {
                location: location_from_entry(&state.source.entry()),
                action: Action::Pop,
            }
        };
        self.notify(event);
        true
    }

    /// Delivers `event` to every listener. A listener that navigates again
    /// re-enters here; the nested event is queued and delivered after the
    /// current pass, so listeners observe navigations in the order they
    /// happened.
    fn notify(&self, event: NavigationEvent) {
        {
            let mut state = self.state.borrow_mut();
            state.pending.push_back(event);
            if state.notifying {
                return;
            }
            state.notifying = true;
        }
        loop {
            let event = {
                let mut state = self.state.borrow_mut();
                match state.pending.pop_front() {
                    Some(event) => event,
                    None => {
                        state.notifying = false;
                        break;
                    }
                }
            };
            let listeners: Vec<ListenerCell> = self
                .state
                .borrow()
                .listeners
                .iter()
                .map(|(_, cell)| Rc::clone(cell))
                .collect();
            for listener in listeners {
                let mut listener = listener.borrow_mut();
                (&mut *listener)(&event);
            }
        }
    }
}

fn location_from_entry(entry: &HistoryEntry) -> Location {
    let (pathname, query) = split_query(&entry.uri);
    Location {
        pathname: if pathname.is_empty() {
            "/".to_string()
        } else {
            pathname.to_string()
        },
        search: match query {
            Some(query) => format!("?{query}"),
            None => String::new(),
        },
        state: entry.state.clone(),
        key: entry.key.clone(),
    }
}
