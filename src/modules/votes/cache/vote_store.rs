// Session wide, observable cache of vote state per item.
//
// Purpose
// - Single source of truth for every tally a view renders.
//
// Responsibilities
// - Create an entry once per item (hydrate), then only ever replace it whole (apply, refresh).
// - Bump the entry version on every replacement.
// - Fan one copied snapshot out to every subscriber of the item, synchronously.
// - Late subscribers can receive the current snapshot atomically with registration.
// - Drop entries on item deletion (purge) and everything on logout (clear).
//
// Concurrency
// - Fan-outs are serialized, so a subscriber never sees an older snapshot after a newer one.
// - Subscriber callbacks may read the store but must not write to it.
// - `clear` advances the generation; writes tagged with an older generation are discarded.

use crate::modules::votes::core::entry::{CacheEntry, VoteSnapshot};
use crate::shared::core::primitives::{Direction, ItemId};
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tracing::{debug, trace};

type SubscriberCallback = Arc<dyn Fn(&VoteSnapshot) + Send + Sync>;

struct Subscriber {
    id: u64,
    callback: SubscriberCallback,
}

#[derive(Default)]
struct Slots {
    entries: HashMap<ItemId, CacheEntry>,
    subscribers: HashMap<ItemId, Vec<Subscriber>>,
    generation: u64,
    next_subscriber_id: u64,
}

impl Slots {
    fn callbacks_for(&self, item_id: &ItemId) -> Vec<SubscriberCallback> {
        self.subscribers
            .get(item_id)
            .map(|subscribers| subscribers.iter().map(|s| s.callback.clone()).collect())
            .unwrap_or_default()
    }
}

#[derive(Default)]
pub struct VoteStore {
    slots: Mutex<Slots>,
    fanout: Mutex<()>,
}

impl VoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> MutexGuard<'_, Slots> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn fanout(&self) -> MutexGuard<'_, ()> {
        self.fanout.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// `None` means the item has not been hydrated in this session.
    pub fn get(&self, item_id: &ItemId) -> Option<CacheEntry> {
        self.slots().entries.get(item_id).cloned()
    }

    pub fn generation(&self) -> u64 {
        self.slots().generation
    }

    /// Entry and generation read under the same lock.
    pub(crate) fn observe(&self, item_id: &ItemId) -> Option<(CacheEntry, u64)> {
        let slots = self.slots();
        slots
            .entries
            .get(item_id)
            .map(|entry| (entry.clone(), slots.generation))
    }

    pub fn len(&self) -> usize {
        self.slots().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert the entry if the item has none yet; an existing entry always wins.
    pub fn hydrate(&self, item_id: ItemId, count: u64, direction: Direction) -> CacheEntry {
        match self.insert_once(item_id, count, direction, |_| Ok::<(), Infallible>(())) {
            Ok(entry) => entry,
            Err(never) => match never {},
        }
    }

    /// Like `hydrate`, but discarded if the store was cleared after `generation` was observed.
    pub(crate) fn hydrate_at(
        &self,
        generation: u64,
        item_id: ItemId,
        count: u64,
        direction: Direction,
    ) -> Option<CacheEntry> {
        self.insert_once(item_id, count, direction, |current| {
            if current == generation { Ok(()) } else { Err(()) }
        })
        .ok()
    }

    fn insert_once<F, E>(
        &self,
        item_id: ItemId,
        count: u64,
        direction: Direction,
        admit: F,
    ) -> Result<CacheEntry, E>
    where
        F: FnOnce(u64) -> Result<(), E>,
    {
        let _fanout = self.fanout();
        let (entry, callbacks) = {
            let mut slots = self.slots();
            admit(slots.generation)?;
            if let Some(existing) = slots.entries.get(&item_id) {
                trace!(item_id = %item_id, version = existing.version, "hydration skipped");
                return Ok(existing.clone());
            }
            let entry = CacheEntry {
                item_id: item_id.clone(),
                count,
                direction,
                version: 1,
            };
            slots.entries.insert(item_id.clone(), entry.clone());
            (entry, slots.callbacks_for(&item_id))
        };
        debug!(item_id = %entry.item_id, count, %direction, "vote state hydrated");
        notify(&callbacks, entry.snapshot());
        Ok(entry)
    }

    /// Replace the entry and notify its subscribers. Returns `None` if the item is not hydrated.
    pub fn apply(&self, item_id: &ItemId, count: u64, direction: Direction) -> Option<CacheEntry> {
        self.replace(item_id, count, direction, |_, _| true)
    }

    /// Like `apply`, but discarded if the store was cleared after `generation` was observed.
    pub(crate) fn apply_at(
        &self,
        generation: u64,
        item_id: &ItemId,
        count: u64,
        direction: Direction,
    ) -> Option<CacheEntry> {
        self.replace(item_id, count, direction, |_, current| current == generation)
    }

    /// Replace the entry only if nothing replaced it since `observed_version` was read.
    pub fn refresh(
        &self,
        item_id: &ItemId,
        count: u64,
        direction: Direction,
        observed_version: u64,
    ) -> Option<CacheEntry> {
        self.replace(item_id, count, direction, |entry, _| {
            entry.version == observed_version
        })
    }

    fn replace<F>(
        &self,
        item_id: &ItemId,
        count: u64,
        direction: Direction,
        admit: F,
    ) -> Option<CacheEntry>
    where
        F: FnOnce(&CacheEntry, u64) -> bool,
    {
        let _fanout = self.fanout();
        let (entry, callbacks) = {
            let mut slots = self.slots();
            let generation = slots.generation;
            let current = slots.entries.get_mut(item_id)?;
            if !admit(current, generation) {
                trace!(item_id = %item_id, version = current.version, "stale write discarded");
                return None;
            }
            let entry = CacheEntry {
                item_id: item_id.clone(),
                count,
                direction,
                version: current.version + 1,
            };
            *current = entry.clone();
            (entry, slots.callbacks_for(item_id))
        };
        trace!(item_id = %item_id, count, %direction, version = entry.version, "vote state applied");
        notify(&callbacks, entry.snapshot());
        Some(entry)
    }

    /// Register a callback for every future snapshot of `item_id`. Dropping the guard unsubscribes.
    pub fn subscribe<F>(self: &Arc<Self>, item_id: ItemId, callback: F) -> Subscription
    where
        F: Fn(&VoteSnapshot) + Send + Sync + 'static,
    {
        let mut slots = self.slots();
        self.register(&mut slots, item_id, Arc::new(callback))
    }

    /// Like `subscribe`, but first hands the callback the current snapshot, if any.
    /// No write can land between that snapshot and the first notification.
    pub fn subscribe_with_current<F>(self: &Arc<Self>, item_id: ItemId, callback: F) -> Subscription
    where
        F: Fn(&VoteSnapshot) + Send + Sync + 'static,
    {
        let _fanout = self.fanout();
        let callback: SubscriberCallback = Arc::new(callback);
        let (subscription, current) = {
            let mut slots = self.slots();
            let current = slots.entries.get(&item_id).map(CacheEntry::snapshot);
            (self.register(&mut slots, item_id, callback.clone()), current)
        };
        if let Some(snapshot) = current {
            callback(&snapshot);
        }
        subscription
    }

    fn register(
        self: &Arc<Self>,
        slots: &mut Slots,
        item_id: ItemId,
        callback: SubscriberCallback,
    ) -> Subscription {
        slots.next_subscriber_id += 1;
        let id = slots.next_subscriber_id;
        slots
            .subscribers
            .entry(item_id.clone())
            .or_default()
            .push(Subscriber { id, callback });
        Subscription {
            store: Arc::downgrade(self),
            item_id,
            id,
            generation: slots.generation,
        }
    }

    pub fn subscriber_count(&self, item_id: &ItemId) -> usize {
        self.slots().subscribers.get(item_id).map_or(0, Vec::len)
    }

    fn unsubscribe(&self, item_id: &ItemId, id: u64) {
        let mut slots = self.slots();
        if let Some(subscribers) = slots.subscribers.get_mut(item_id) {
            subscribers.retain(|s| s.id != id);
            if subscribers.is_empty() {
                slots.subscribers.remove(item_id);
            }
        }
    }

    /// Forget a deleted item.
    pub fn purge(&self, item_id: &ItemId) -> Option<CacheEntry> {
        let _fanout = self.fanout();
        let mut slots = self.slots();
        slots.subscribers.remove(item_id);
        let removed = slots.entries.remove(item_id);
        if removed.is_some() {
            debug!(item_id = %item_id, "vote state purged");
        }
        removed
    }

    /// Drop every entry and subscriber. Called when the session ends.
    pub fn clear(&self) {
        let _fanout = self.fanout();
        let mut slots = self.slots();
        let dropped = slots.entries.len();
        slots.entries.clear();
        slots.subscribers.clear();
        slots.generation += 1;
        debug!(dropped, generation = slots.generation, "vote store cleared");
    }
}

fn notify(callbacks: &[SubscriberCallback], snapshot: VoteSnapshot) {
    for callback in callbacks {
        callback(&snapshot);
    }
}

/// Handle returned by [`VoteStore::subscribe`].
#[must_use = "dropping a subscription unsubscribes immediately"]
pub struct Subscription {
    store: Weak<VoteStore>,
    item_id: ItemId,
    id: u64,
    generation: u64,
}

impl Subscription {
    pub fn item_id(&self) -> &ItemId {
        &self.item_id
    }

    /// Store generation at the time of subscribing. A `clear` since then has dropped this subscription.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(store) = self.store.upgrade() {
            store.unsubscribe(&self.item_id, self.id);
        }
    }
}
