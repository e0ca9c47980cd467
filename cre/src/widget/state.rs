use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    rc::Rc,
};

use crate::value::Value;

type Observer = Rc<dyn Fn()>;

struct Inner {
    values: RefCell<BTreeMap<String, Value>>,
    observer: RefCell<Option<Observer>>,
    held: Cell<u32>,
}

/// Observed widget state.
///
/// A key/value mapping with an explicit setter interface. Every write notifies
/// the registered observer once the write has completed, unless notifications
/// are currently held (see [`State::hold`]).
///
/// `State` is a cheap handle: clones share the same mapping.
#[derive(Clone)]
pub struct State(Rc<Inner>);

impl State {
    pub fn new(initial: BTreeMap<String, Value>) -> Self {
        Self(Rc::new(Inner {
            values: RefCell::new(initial),
            observer: RefCell::new(None),
            held: Cell::new(0),
        }))
    }

    /// Register the post-write callback, replacing any previous one.
    pub fn observe(&self, observer: impl Fn() + 'static) {
        *self.0.observer.borrow_mut() = Some(Rc::new(observer));
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.0.values.borrow().get(key).cloned()
    }

    /// Read a value without cloning it.
    ///
    /// The state is borrowed while `f` runs: `f` may read but must not write
    /// to this state.
    pub fn with<O>(&self, key: &str, f: impl FnOnce(Option<&Value>) -> O) -> O {
        f(self.0.values.borrow().get(key))
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.with(key, |v| v.and_then(Value::as_f64))
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.with(key, |v| v.and_then(Value::as_str).map(str::to_string))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.values.borrow().contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.0.values.borrow().keys().cloned().collect()
    }

    /// A copy of the whole mapping.
    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        self.0.values.borrow().clone()
    }

    pub fn set<K: Into<String>, V: Into<Value>>(&self, key: K, value: V) {
        self.0
            .values
            .borrow_mut()
            .insert(key.into(), value.into());
        self.written();
    }

    /// Read-modify-write a single key. Counts as one write.
    ///
    /// Missing keys are passed to `f` as [`Value::Null`]. The state is not
    /// borrowed while `f` runs, so `f` may read other keys.
    pub fn update<K: Into<String>>(&self, key: K, f: impl FnOnce(&mut Value)) {
        let key = key.into();
        let mut value = self.get(&key).unwrap_or_default();
        f(&mut value);
        self.0.values.borrow_mut().insert(key, value);
        self.written();
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        let removed = self.0.values.borrow_mut().remove(key);
        if removed.is_some() {
            self.written();
        }
        removed
    }

    /// Run `f` with write notifications suppressed.
    ///
    /// Writes inside `f` still land, but the observer is not called for them.
    /// Nested holds are allowed.
    pub fn hold<O>(&self, f: impl FnOnce() -> O) -> O {
        struct Release<'a>(&'a Cell<u32>);

        impl Drop for Release<'_> {
            fn drop(&mut self) {
                self.0.set(self.0.get() - 1);
            }
        }

        self.0.held.set(self.0.held.get() + 1);
        let _release = Release(&self.0.held);
        f()
    }

    /// Call the observer, regardless of whether a write happened.
    pub fn notify(&self) {
        // Cloned out so the observer may freely access the state.
        let observer = self.0.observer.borrow().clone();
        if let Some(observer) = observer {
            observer();
        }
    }

    fn written(&self) {
        if self.0.held.get() == 0 {
            self.notify();
        }
    }

    /// Returns `true` if both handles refer to the same state.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.0.values.borrow().iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counting(state: &State) -> Rc<Cell<u32>> {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        state.observe(move || c.set(c.get() + 1));
        count
    }

    #[test]
    fn test_one_notification_per_write() {
        let state = State::new(BTreeMap::new());
        let count = counting(&state);

        state.set("a", 1);
        assert_eq!(count.get(), 1);
        state.set("a", 2);
        state.set("b", "x");
        assert_eq!(count.get(), 3);
        assert_eq!(state.get("a"), Some(Value::from(2)));

        state.update("a", |v| *v = Value::from(v.as_f64().unwrap_or(0.0) + 1.0));
        assert_eq!(count.get(), 4);
        assert_eq!(state.get_f64("a"), Some(3.0));
    }

    #[test]
    fn test_observer_sees_completed_write() {
        let state = State::new(BTreeMap::new());
        let seen = Rc::new(RefCell::new(Vec::new()));

        let s = state.clone();
        let seen2 = seen.clone();
        state.observe(move || seen2.borrow_mut().push(s.get("k")));

        state.set("k", "v");
        assert_eq!(*seen.borrow(), vec![Some(Value::from("v"))]);
    }

    #[test]
    fn test_hold_suppresses_notifications() {
        let state = State::new(BTreeMap::new());
        let count = counting(&state);

        state.hold(|| {
            state.set("a", 1);
            state.hold(|| state.set("b", 2));
            state.set("c", 3);
        });
        assert_eq!(count.get(), 0);
        assert_eq!(state.keys(), vec!["a", "b", "c"]);

        state.set("a", 5);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_remove_missing_key_does_not_notify() {
        let mut initial = BTreeMap::new();
        initial.insert("x".to_string(), Value::from(true));
        let state = State::new(initial);
        let count = counting(&state);

        assert_eq!(state.remove("nope"), None);
        assert_eq!(count.get(), 0);
        assert_eq!(state.remove("x"), Some(Value::Bool(true)));
        assert_eq!(count.get(), 1);
        assert!(!state.contains("x"));
    }

    #[test]
    fn test_update_may_read_state() {
        let mut initial = BTreeMap::new();
        initial.insert("step".to_string(), Value::from(5));
        let state = State::new(initial);
        let count = counting(&state);

        let s = state.clone();
        state.update("total", |v| {
            let step = s.get_f64("step").unwrap_or(0.0);
            *v = Value::from(v.as_f64().unwrap_or(0.0) + step);
        });
        assert_eq!(count.get(), 1);

        let mut expected = BTreeMap::new();
        expected.insert("step".to_string(), Value::from(5));
        expected.insert("total".to_string(), Value::from(5));
        assert_eq!(state.snapshot(), expected);
    }

    #[test]
    fn test_clones_share_values() {
        let state = State::new(BTreeMap::new());
        let other = state.clone();
        other.set("n", 1);
        assert_eq!(state.get_f64("n"), Some(1.0));
        assert!(state.ptr_eq(&other));
        assert!(!state.ptr_eq(&State::new(BTreeMap::new())));
    }
}
