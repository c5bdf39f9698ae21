/// Explicit change-detection contract for store values.
///
/// `set` notifies subscribers iff the previous value reports
/// `safe_not_equal(&next)`. Deep equality counts as unchanged; `NaN` is
/// unchanged relative to `NaN`.
pub trait SafeNotEqual {
    fn safe_not_equal(&self, next: &Self) -> bool;
}

macro_rules! safe_not_equal_via_partial_eq {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::store::SafeNotEqual for $ty {
                fn safe_not_equal(&self, next: &Self) -> bool {
                    self != next
                }
            }
        )+
    };
}
pub(crate) use safe_not_equal_via_partial_eq;

safe_not_equal_via_partial_eq!(
    (),
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    String,
);

impl SafeNotEqual for f32 {
    fn safe_not_equal(&self, next: &Self) -> bool {
        !(self == next || (self.is_nan() && next.is_nan()))
    }
}

impl SafeNotEqual for f64 {
    fn safe_not_equal(&self, next: &Self) -> bool {
        !(self == next || (self.is_nan() && next.is_nan()))
    }
}

impl<T: SafeNotEqual> SafeNotEqual for Option<T> {
    fn safe_not_equal(&self, next: &Self) -> bool {
        match (self, next) {
            (None, None) => false,
            (Some(a), Some(b)) => a.safe_not_equal(b),
            _ => true,
        }
    }
}

impl<T: SafeNotEqual> SafeNotEqual for Vec<T> {
    fn safe_not_equal(&self, next: &Self) -> bool {
        self.len() != next.len() || self.iter().zip(next).any(|(a, b)| a.safe_not_equal(b))
    }
}

impl<A: SafeNotEqual, B: SafeNotEqual> SafeNotEqual for (A, B) {
    fn safe_not_equal(&self, next: &Self) -> bool {
        self.0.safe_not_equal(&next.0) || self.1.safe_not_equal(&next.1)
    }
}
