// Per item gates shared by every controller of a session.
//
// Responsibilities
// - Hold the Idle/Pending state of each item; entering Pending is a single atomic step.
// - Hand out one async hydration lock per item so concurrent views share one fetch.

use crate::modules::votes::core::state::ControllerState;
use crate::shared::core::primitives::ItemId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Default)]
pub struct ItemGates {
    states: Mutex<HashMap<ItemId, ControllerState>>,
    hydrations: Mutex<HashMap<ItemId, Arc<tokio::sync::Mutex<()>>>>,
}

impl ItemGates {
    pub fn new() -> Self {
        Self::default()
    }

    fn states(&self) -> MutexGuard<'_, HashMap<ItemId, ControllerState>> {
        self.states.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self, item_id: &ItemId) -> ControllerState {
        self.states().get(item_id).copied().unwrap_or_default()
    }

    /// Idle -> Pending. Returns false if the item already has a mutation in flight.
    pub fn try_enter(&self, item_id: &ItemId) -> bool {
        let mut states = self.states();
        let state = states.entry(item_id.clone()).or_default();
        match *state {
            ControllerState::Idle => {
                *state = ControllerState::Pending;
                true
            }
            ControllerState::Pending => false,
        }
    }

    /// Pending -> Idle.
    pub fn release(&self, item_id: &ItemId) {
        self.states().insert(item_id.clone(), ControllerState::Idle);
    }

    pub(crate) fn hydration_lock(&self, item_id: &ItemId) -> Arc<tokio::sync::Mutex<()>> {
        self.hydrations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(item_id.clone())
            .or_default()
            .clone()
    }

    /// Drop bookkeeping for a deleted item. A gate that is still pending is kept until it resolves.
    pub fn forget(&self, item_id: &ItemId) {
        let mut states = self.states();
        if states.get(item_id) != Some(&ControllerState::Pending) {
            states.remove(item_id);
        }
        self.hydrations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(item_id);
    }

    pub fn forget_all(&self) {
        self.states()
            .retain(|_, state| *state == ControllerState::Pending);
        self.hydrations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
