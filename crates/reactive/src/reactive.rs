use crate::effect::Effect;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::Arc;

/// Shallow reactive map.
///
/// Only top-level key writes are observed. A write that stores a value equal to
/// the current one does not notify. Clones share the same storage.
pub struct Reactive<V> {
    inner: Rc<RefCell<Inner<V>>>,
}

struct Inner<V> {
    values: BTreeMap<Arc<str>, V>,
    subscribers: Vec<Weak<Effect>>,
}

impl<V> Clone for Reactive<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<V: Clone + PartialEq> Default for Reactive<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + PartialEq> Reactive<V> {
    pub fn new() -> Self {
        Self::from_map(BTreeMap::new())
    }

    pub fn from_map(values: BTreeMap<Arc<str>, V>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                values,
                subscribers: Vec::new(),
            })),
        }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        self.inner.borrow().values.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.borrow().values.contains_key(key)
    }

    /// Store `value` under `key`. Returns whether anything changed.
    pub fn set(&self, key: impl Into<Arc<str>>, value: V) -> bool {
        let key = key.into();
        let changed = {
            let mut inner = self.inner.borrow_mut();
            if inner.values.get(&key) == Some(&value) {
                false
            } else {
                inner.values.insert(key, value);
                true
            }
        };
        if changed {
            self.notify();
        }
        changed
    }

    pub fn remove(&self, key: &str) -> Option<V> {
        let removed = self.inner.borrow_mut().values.remove(key);
        if removed.is_some() {
            self.notify();
        }
        removed
    }

    pub fn keys(&self) -> Vec<Arc<str>> {
        self.inner.borrow().values.keys().cloned().collect()
    }

    pub fn snapshot(&self) -> BTreeMap<Arc<str>, V> {
        self.inner.borrow().values.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().values.is_empty()
    }

    pub fn subscribe(&self, effect: &Rc<Effect>) {
        let weak = Rc::downgrade(effect);
        let mut inner = self.inner.borrow_mut();
        if !inner.subscribers.iter().any(|s| s.ptr_eq(&weak)) {
            inner.subscribers.push(weak);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner
            .borrow()
            .subscribers
            .iter()
            .filter(|s| s.strong_count() > 0)
            .count()
    }

    /// Whether both handles share storage.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // Effects may read this map from inside `trigger`, so the borrow ends first.
    fn notify(&self) {
        let live: Vec<Rc<Effect>> = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|s| s.strong_count() > 0);
            inner.subscribers.iter().filter_map(Weak::upgrade).collect()
        };
        for effect in live {
            effect.trigger();
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for Reactive<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.inner.borrow().values.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{JobQueue, register_effect};
    use core_types::{JobId, Value};

    #[test]
    fn write_schedules_subscribed_effect_once() {
        let queue = Rc::new(JobQueue::new());
        let effect = register_effect(JobId(1), queue.clone());
        let state: Reactive<Value> = Reactive::new();
        state.subscribe(&effect);
        state.subscribe(&effect);
        state.set("count", Value::Int(1));
        state.set("count", Value::Int(2));
        assert_eq!(queue.len(), 1);
        assert_eq!(state.subscriber_count(), 1);
    }

    #[test]
    fn equal_write_does_not_notify() {
        let queue = Rc::new(JobQueue::new());
        let effect = register_effect(JobId(1), queue.clone());
        let state: Reactive<Value> = Reactive::new();
        state.set("a", Value::from("x"));
        state.subscribe(&effect);
        assert!(!state.set("a", Value::from("x")));
        assert!(queue.is_empty());
        assert_eq!(state.remove("a"), Some(Value::from("x")));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn dropped_effects_are_pruned() {
        let queue = Rc::new(JobQueue::new());
        let state: Reactive<Value> = Reactive::new();
        {
            let effect = register_effect(JobId(9), queue.clone());
            state.subscribe(&effect);
        }
        state.set("k", Value::Bool(true));
        assert!(queue.is_empty());
        assert_eq!(state.subscriber_count(), 0);
    }

    #[test]
    fn clones_share_storage() {
        let a: Reactive<Value> = Reactive::new();
        let b = a.clone();
        b.set("k", Value::Int(4));
        assert_eq!(a.get("k"), Some(Value::Int(4)));
        assert!(a.ptr_eq(&b));
    }
}
