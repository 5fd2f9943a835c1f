//! Multicast notification channel.

use std::fmt;

/// Registration token returned by [`Delegate::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DelegateHandle(u64);

/// A list of observers called synchronously, in registration order, on every
/// broadcast.
///
/// Observers must not call back into the object that owns the delegate.
pub struct Delegate<T> {
    observers: Vec<(DelegateHandle, Box<dyn FnMut(T)>)>,
    next_id: u64,
}

impl<T> Default for Delegate<T> {
    fn default() -> Self {
        Self {
            observers: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T> fmt::Debug for Delegate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Delegate")
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl<T: Clone> Delegate<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, observer: impl FnMut(T) + 'static) -> DelegateHandle {
        let handle = DelegateHandle(self.next_id);
        self.next_id += 1;
        self.observers.push((handle, Box::new(observer)));
        handle
    }

    /// Remove an observer. Returns false if it was not registered.
    pub fn remove(&mut self, handle: DelegateHandle) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(h, _)| *h != handle);
        self.observers.len() != before
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn broadcast(&mut self, value: T) {
        for (_, observer) in &mut self.observers {
            observer(value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn broadcast_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut d = Delegate::new();
        let a = log.clone();
        d.add(move |v: u32| a.borrow_mut().push(("a", v)));
        let b = log.clone();
        d.add(move |v: u32| b.borrow_mut().push(("b", v)));

        d.broadcast(7);
        assert_eq!(*log.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn removed_observer_is_not_called() {
        let hits = Rc::new(RefCell::new(0));
        let mut d = Delegate::new();
        let h = hits.clone();
        let handle = d.add(move |_: bool| *h.borrow_mut() += 1);

        assert!(d.remove(handle));
        assert!(!d.remove(handle));
        d.broadcast(true);
        assert_eq!(*hits.borrow(), 0);
        assert!(d.is_empty());
    }

    #[test]
    fn broadcast_without_observers_is_fine() {
        let mut d: Delegate<f32> = Delegate::new();
        d.broadcast(1.0);
        assert_eq!(d.len(), 0);
    }
}
