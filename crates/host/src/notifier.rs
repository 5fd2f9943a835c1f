use loadscreen_common::WorldInfo;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Receiver of map-load lifecycle notifications.
pub trait MapLoadListener {
    /// A new map is about to be loaded.
    fn on_pre_load_map(&mut self, map_name: &str);

    /// A map finished loading; `world` is the newly created world, if any.
    fn on_post_load_map(&mut self, world: Option<&WorldInfo>);
}

/// Registration token returned by [`MapLoadNotifier::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Engine-side source of map-load notifications.
///
/// Listeners are held weakly: a dropped listener is skipped and pruned on the
/// next broadcast.
#[derive(Default)]
pub struct MapLoadNotifier {
    listeners: Vec<(ListenerId, Weak<RefCell<dyn MapLoadListener>>)>,
    next_id: u64,
}

impl MapLoadNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<L: MapLoadListener + 'static>(&mut self, listener: &Rc<RefCell<L>>) -> ListenerId {
        let weak = Rc::downgrade(listener);
        let weak: Weak<RefCell<dyn MapLoadListener>> = weak;
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, weak));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn broadcast_pre_load_map(&mut self, map_name: &str) {
        tracing::debug!(map_name, listeners = self.listeners.len(), "pre load map");
        self.dispatch(|l| l.on_pre_load_map(map_name));
    }

    pub fn broadcast_post_load_map(&mut self, world: Option<&WorldInfo>) {
        tracing::debug!(map = ?world.map(|w| &w.map_name), "post load map");
        self.dispatch(|l| l.on_post_load_map(world));
    }

    fn dispatch(&mut self, mut f: impl FnMut(&mut dyn MapLoadListener)) {
        self.listeners.retain(|(_, weak)| weak.strong_count() > 0);
        for (id, weak) in &self.listeners {
            let Some(listener) = weak.upgrade() else {
                continue;
            };
            match listener.try_borrow_mut() {
                Ok(mut l) => f(&mut *l),
                Err(_) => tracing::warn!(?id, "listener is busy, skipping map load notification"),
            }
        }
    }
}
