use std::cell::RefCell;
use std::rc::Rc;

use super::SafeNotEqual;

pub type StopFn = Box<dyn FnOnce()>;
type Job = Box<dyn FnOnce()>;

thread_local! {
    // Pending subscriber notifications. Only the outermost `set` drains the
    // queue, so nested sets issued from inside a notification are deferred
    // until the current notification pass completes.
    static SUBSCRIBER_QUEUE: RefCell<Vec<Option<Job>>> = const { RefCell::new(Vec::new()) };
}

struct Subscriber<T> {
    run: Box<dyn FnMut(&T)>,
    invalidate: Option<Box<dyn FnMut()>>,
}

struct StoreState<T> {
    value: T,
    subscribers: Vec<(u64, Rc<RefCell<Subscriber<T>>>)>,
    next_id: u64,
    start: Option<Box<dyn FnMut(&Store<T>) -> Option<StopFn>>>,
    stop: Option<StopFn>,
}

/// Single-threaded observable value cell with synchronous, batched
/// notification in subscription order.
pub struct Store<T> {
    state: Rc<RefCell<StoreState<T>>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<T: Clone + SafeNotEqual + 'static> Store<T> {
    pub fn new(value: T) -> Self {
        Self {
            state: Rc::new(RefCell::new(StoreState {
                value,
                subscribers: Vec::new(),
                next_id: 0,
                start: None,
                stop: None,
            })),
        }
    }

    /// A store whose `start` callback runs when the subscriber count goes
    /// from zero to one. The returned stop closure runs exactly once when the
    /// last subscriber leaves.
    pub fn with_start(
        value: T,
        start: impl FnMut(&Store<T>) -> Option<StopFn> + 'static,
    ) -> Self {
        let store = Self::new(value);
        store.state.borrow_mut().start = Some(Box::new(start));
        store
    }

    /// Stores `value` and, when it differs under the [`SafeNotEqual`]
    /// contract, notifies all current subscribers.
    pub fn set(&self, next: T) {
        let subscribers: Vec<Rc<RefCell<Subscriber<T>>>> = {
            let mut state = self.state.borrow_mut();
            if !state.value.safe_not_equal(&next) {
                return;
            }
            state.value = next.clone();
            state
                .subscribers
                .iter()
                .map(|(_, cell)| Rc::clone(cell))
                .collect()
        };
        if subscribers.is_empty() {
            return;
        }

        let mut jobs: Vec<Job> = Vec::with_capacity(subscribers.len());
        for subscriber in subscribers {
            // User callbacks may re-enter this store, so the cell borrow is
            // never held across a call.
            let invalidate = subscriber.borrow_mut().invalidate.take();
            if let Some(mut invalidate) = invalidate {
                invalidate();
                subscriber.borrow_mut().invalidate = Some(invalidate);
            }
            let value = next.clone();
            let cell = Rc::clone(&subscriber);
            jobs.push(Box::new(move || run_detached(&cell, &value)));
        }
        flush_or_enqueue(jobs);
    }

    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let next = {
            let state = self.state.borrow();
            f(&state.value)
        };
        self.set(next);
    }

    /// Current value, observed through a transient subscription so that
    /// lazily-started stores report a live value.
    pub fn get(&self) -> T {
        let captured: Rc<RefCell<Option<T>>> = Rc::new(RefCell::new(None));
        let slot = Rc::clone(&captured);
        let subscription = self.subscribe(move |value: &T| {
            *slot.borrow_mut() = Some(value.clone());
        });
        subscription.dispose();
        let value = captured.borrow_mut().take();
        match value {
            Some(value) => value,
            None => self.state.borrow().value.clone(),
        }
    }

    pub fn subscribe(&self, run: impl FnMut(&T) + 'static) -> Unsubscriber {
        self.subscribe_full(run, None)
    }

    /// Registers a subscriber and synchronously delivers the current value.
    /// `invalidate` fires eagerly when an upstream change is in flight, before
    /// the deferred `run` delivers the settled value.
    pub fn subscribe_full(
        &self,
        run: impl FnMut(&T) + 'static,
        invalidate: Option<Box<dyn FnMut()>>,
    ) -> Unsubscriber {
        let subscriber = Rc::new(RefCell::new(Subscriber {
            run: Box::new(run),
            invalidate,
        }));
        let (id, first) = {
            let mut state = self.state.borrow_mut();
            let id = state.next_id;
            state.next_id += 1;
            let first = state.subscribers.is_empty();
            state.subscribers.push((id, Rc::clone(&subscriber)));
            (id, first)
        };

        if first {
            let taken = self.state.borrow_mut().start.take();
            if let Some(mut start) = taken {
                let stop = start(self);
                let mut state = self.state.borrow_mut();
                state.stop = stop;
                state.start = Some(start);
            }
        }

        let current = self.state.borrow().value.clone();
        run_detached(&subscriber, &current);

        let store = self.clone();
        Unsubscriber::new(move || store.remove_subscriber(id))
    }

    fn remove_subscriber(&self, id: u64) {
        let stop = {
            let mut state = self.state.borrow_mut();
            let before = state.subscribers.len();
            state.subscribers.retain(|(sid, _)| *sid != id);
            if before > 0 && state.subscribers.is_empty() {
                state.stop.take()
            } else {
                None
            }
        };
        if let Some(stop) = stop {
            stop();
        }
    }
}

// Runs the subscriber callback with its cell borrow released; a callback
// that sets the same store again is enqueued instead of double-borrowing.
fn run_detached<T>(cell: &Rc<RefCell<Subscriber<T>>>, value: &T) {
    let mut run = {
        let mut subscriber = cell.borrow_mut();
        std::mem::replace(&mut subscriber.run, Box::new(|_: &T| {}))
    };
    run(value);
    cell.borrow_mut().run = run;
}

fn flush_or_enqueue(jobs: Vec<Job>) {
    let outermost = SUBSCRIBER_QUEUE.with(|queue| {
        let mut queue = queue.borrow_mut();
        let outermost = queue.is_empty();
        queue.extend(jobs.into_iter().map(Some));
        outermost
    });
    if !outermost {
        return;
    }

    // Jobs appended while draining are picked up in the same pass.
    let mut index = 0;
    loop {
        let job = SUBSCRIBER_QUEUE.with(|queue| {
            queue.borrow_mut().get_mut(index).and_then(Option::take)
        });
        match job {
            Some(job) => {
                job();
                index += 1;
            }
            None => break,
        }
    }
    SUBSCRIBER_QUEUE.with(|queue| queue.borrow_mut().clear());
}

/// Disposer returned by subscriptions and listeners. Disposing is idempotent
/// and also happens on drop.
pub struct Unsubscriber {
    action: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl Unsubscriber {
    pub(crate) fn new(action: impl FnOnce() + 'static) -> Self {
        Self {
            action: RefCell::new(Some(Box::new(action))),
        }
    }

    pub fn dispose(&self) {
        let action = self.action.borrow_mut().take();
        if let Some(action) = action {
            action();
        }
    }
}

impl Drop for Unsubscriber {
    fn drop(&mut self) {
        self.dispose();
    }
}
