//! FILENAME: table-core/src/memo.rs
//! Cached derivations keyed on a dependency tuple.
//!
//! A `Memo` stores the last dependency tuple and the value computed from it.
//! Calling `get` with an equal tuple returns the stored value; any difference
//! recomputes once and replaces the entry. Row models and column lists take
//! part in the tuple through `Ptr`, which compares by `Rc` identity, so an
//! upstream stage that returned the same allocation counts as unchanged.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;
use std::time::Instant;

// ============================================================================
// IDENTITY WRAPPER
// ============================================================================

/// An `Rc` compared by pointer identity instead of by value.
pub struct Ptr<T: ?Sized>(pub Rc<T>);

impl<T: ?Sized> Ptr<T> {
    pub fn new(value: &Rc<T>) -> Self {
        Ptr(Rc::clone(value))
    }
}

impl<T: ?Sized> Clone for Ptr<T> {
    fn clone(&self) -> Self {
        Ptr(Rc::clone(&self.0))
    }
}

impl<T: ?Sized> PartialEq for Ptr<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T: ?Sized> Eq for Ptr<T> {}

impl<T: ?Sized> Deref for Ptr<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: ?Sized> fmt::Debug for Ptr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ptr({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

// ============================================================================
// MEMO
// ============================================================================

pub struct Memo<D, R> {
    key: &'static str,
    entry: RefCell<Option<(D, R)>>,
    computations: Cell<usize>,
}

impl<D: PartialEq, R: Clone> Memo<D, R> {
    pub fn new(key: &'static str) -> Self {
        Memo {
            key,
            entry: RefCell::new(None),
            computations: Cell::new(0),
        }
    }

    /// Returns the cached value for `deps`, computing it when the tuple differs
    /// from the previous call (or when nothing has been computed yet).
    ///
    /// The cache is not borrowed while `compute` runs, so a derivation may
    /// freely read other memos.
    pub fn get(&self, deps: D, compute: impl FnOnce(&D) -> R) -> R {
        if let Some((previous, value)) = &*self.entry.borrow() {
            if *previous == deps {
                return value.clone();
            }
        }

        let started = Instant::now();
        let value = compute(&deps);
        self.computations.set(self.computations.get() + 1);

        if log::log_enabled!(log::Level::Debug) {
            log::debug!(
                "[memo] {} recomputed in {:.3}ms",
                self.key,
                started.elapsed().as_secs_f64() * 1000.0
            );
        }

        *self.entry.borrow_mut() = Some((deps, value.clone()));
        value
    }

    /// Drops the cached entry; the next `get` recomputes unconditionally.
    pub fn invalidate(&self) {
        self.entry.borrow_mut().take();
    }

    /// Number of times the compute function has run.
    pub fn computations(&self) -> usize {
        self.computations.get()
    }

    pub fn key(&self) -> &'static str {
        self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_deps_do_not_recompute() {
        let memo: Memo<(u32, String), u32> = Memo::new("test");
        let calls = Cell::new(0);

        let first = memo.get((1, "a".to_string()), |(n, _)| {
            calls.set(calls.get() + 1);
            n * 10
        });
        let second = memo.get((1, "a".to_string()), |(n, _)| {
            calls.set(calls.get() + 1);
            n * 100
        });

        assert_eq!(first, 10);
        assert_eq!(second, 10);
        assert_eq!(calls.get(), 1);
        assert_eq!(memo.computations(), 1);
    }

    #[test]
    fn test_changed_deps_recompute_exactly_once() {
        let memo: Memo<u32, u32> = Memo::new("test");
        memo.get(1, |n| *n);
        assert_eq!(memo.get(2, |n| n + 40), 42);
        assert_eq!(memo.get(2, |_| 0), 42);
        assert_eq!(memo.computations(), 2);
    }

    #[test]
    fn test_ptr_identity_dependency() {
        let memo: Memo<Ptr<Vec<u32>>, usize> = Memo::new("test");
        let a = Rc::new(vec![1, 2, 3]);
        let same_contents = Rc::new(vec![1, 2, 3]);

        memo.get(Ptr::new(&a), |v| v.len());
        memo.get(Ptr::new(&a), |v| v.len());
        assert_eq!(memo.computations(), 1);

        memo.get(Ptr::new(&same_contents), |v| v.len());
        assert_eq!(memo.computations(), 2);
    }

    #[test]
    fn test_invalidate_forces_recompute() {
        let memo: Memo<(), u8> = Memo::new("test");
        memo.get((), |_| 1);
        memo.invalidate();
        assert_eq!(memo.get((), |_| 2), 2);
    }
}
