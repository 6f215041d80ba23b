//! FILENAME: table-core/src/updater.rs
//! Value-or-function state updates.

use std::fmt;
use std::rc::Rc;

/// A state write: either the next value, or a function of the previous one.
pub enum Updater<S> {
    Value(S),
    Fn(Box<dyn FnOnce(&S) -> S>),
}

impl<S> Updater<S> {
    pub fn from_fn(f: impl FnOnce(&S) -> S + 'static) -> Self {
        Updater::Fn(Box::new(f))
    }

    /// Resolves the update against `old`.
    pub fn apply(self, old: &S) -> S {
        match self {
            Updater::Value(value) => value,
            Updater::Fn(f) => f(old),
        }
    }
}

impl<S> From<S> for Updater<S> {
    fn from(value: S) -> Self {
        Updater::Value(value)
    }
}

impl<S: fmt::Debug> fmt::Debug for Updater<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Updater::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Updater::Fn(_) => f.write_str("Fn(..)"),
        }
    }
}

/// Handler invoked with every write to a state slice it controls.
pub type OnChangeFn<S> = Rc<dyn Fn(Updater<S>)>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_and_fn_updates() {
        assert_eq!(Updater::Value(3).apply(&1), 3);
        assert_eq!(Updater::from_fn(|old: &i32| old + 1).apply(&1), 2);
        let updater: Updater<Vec<u8>> = vec![1, 2].into();
        assert_eq!(updater.apply(&vec![]), vec![1, 2]);
    }
}
