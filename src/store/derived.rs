use std::cell::RefCell;
use std::rc::Rc;

use super::{SafeNotEqual, Store, StopFn};

const INPUT_A: u8 = 1 << 0;
const INPUT_B: u8 = 1 << 1;

struct DerivedState<A, B> {
    va: Option<A>,
    vb: Option<B>,
    // One bit per input with an in-flight update; the combine function only
    // runs once the mask is clear for the current tick.
    pending: u8,
    ready: bool,
}

/// Store computed from two input stores.
///
/// Inputs are subscribed when the derived store gains its first subscriber
/// and unsubscribed when the last one leaves. An input that has signalled an
/// in-flight update (via its invalidate callback) defers recomputation until
/// its settled value arrives, so a single upstream event touching both
/// inputs recombines exactly once.
pub fn derived2<A, B, T, F>(a: &Store<A>, b: &Store<B>, combine: F) -> Store<T>
where
    A: Clone + SafeNotEqual + 'static,
    B: Clone + SafeNotEqual + 'static,
    T: Clone + SafeNotEqual + 'static,
    F: FnMut(&A, &B) -> T + 'static,
{
    let combine = Rc::new(RefCell::new(combine));
    let initial = {
        let va = a.get();
        let vb = b.get();
        let mut combine = combine.borrow_mut();
        (*combine)(&va, &vb)
    };

    let a = a.clone();
    let b = b.clone();
    Store::with_start(initial, move |out: &Store<T>| {
        let state = Rc::new(RefCell::new(DerivedState::<A, B> {
            va: None,
            vb: None,
            pending: 0,
            ready: false,
        }));

        let recompute: Rc<dyn Fn()> = {
            let state = Rc::clone(&state);
            let combine = Rc::clone(&combine);
            let out = out.clone();
            Rc::new(move || {
                let settled = {
                    let state = state.borrow();
                    if !state.ready || state.pending != 0 {
                        None
                    } else {
                        match (&state.va, &state.vb) {
                            (Some(va), Some(vb)) => Some((va.clone(), vb.clone())),
                            _ => None,
                        }
                    }
                };
                if let Some((va, vb)) = settled {
                    let next = {
                        let mut combine = combine.borrow_mut();
                        (*combine)(&va, &vb)
                    };
                    out.set(next);
                }
            })
        };

        let sub_a = {
            let state = Rc::clone(&state);
            let invalidated = Rc::clone(&state);
            let recompute = Rc::clone(&recompute);
            a.subscribe_full(
                move |value: &A| {
                    {
                        let mut state = state.borrow_mut();
                        state.va = Some(value.clone());
                        state.pending &= !INPUT_A;
                    }
                    recompute();
                },
                Some(Box::new(move || {
                    invalidated.borrow_mut().pending |= INPUT_A;
                })),
            )
        };
        let sub_b = {
            let state = Rc::clone(&state);
            let invalidated = Rc::clone(&state);
            let recompute = Rc::clone(&recompute);
            b.subscribe_full(
                move |value: &B| {
                    {
                        let mut state = state.borrow_mut();
                        state.vb = Some(value.clone());
                        state.pending &= !INPUT_B;
                    }
                    recompute();
                },
                Some(Box::new(move || {
                    invalidated.borrow_mut().pending |= INPUT_B;
                })),
            )
        };

        state.borrow_mut().ready = true;
        recompute();

        Some(Box::new(move || {
            sub_a.dispose();
            sub_b.dispose();
        }) as StopFn)
    })
}
