// Toggle handler: the per item state machine that owns every vote mutation.
//
// Responsibilities
// - Reject anonymous viewers, busy items and unhydrated items before anything changes.
// - Apply the decided transition to the VoteStore optimistically and mark the item Pending.
// - Persist through the gateway in a spawned task, so a dropped caller never cancels resolution.
// - On success adopt the authoritative count when one is returned; on failure restore the
//   exact snapshot read before the optimistic write. Either way the item returns to Idle.

use crate::modules::votes::cache::vote_store::VoteStore;
use crate::modules::votes::core::entry::VoteSnapshot;
use crate::modules::votes::core::state::ControllerState;
use crate::modules::votes::use_cases::toggle_vote::command::ToggleVote;
use crate::modules::votes::use_cases::toggle_vote::decide::decide_toggle;
use crate::modules::votes::use_cases::toggle_vote::decision::{DecideError, Decision, Transition};
use crate::modules::votes::use_cases::toggle_vote::pending_gate::ItemGates;
use crate::shared::core::counting::CountingModel;
use crate::shared::core::primitives::{ItemId, UserId};
use crate::shared::infrastructure::persistence_gateway::{
    GatewayError, PersistenceGateway, SetVoteOutcome,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleErrorKind {
    Unauthenticated,
    Busy,
    NotHydrated,
    UnsupportedDirection,
    Unauthorized,
    Conflict,
    NotFound,
    NetworkFailure,
    Interrupted,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToggleError {
    #[error("sign in to vote")]
    Unauthenticated,

    #[error("a vote on item {0} is still being saved")]
    Busy(ItemId),

    #[error("vote state for item {0} was used before it was hydrated")]
    NotHydrated(ItemId),

    #[error("domain rejected: {0}")]
    Rejected(#[from] DecideError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("saving the vote on item {0} was interrupted")]
    Interrupted(ItemId),
}

impl ToggleError {
    pub fn kind(&self) -> ToggleErrorKind {
        match self {
            ToggleError::Unauthenticated => ToggleErrorKind::Unauthenticated,
            ToggleError::Busy(_) => ToggleErrorKind::Busy,
            ToggleError::NotHydrated(_) => ToggleErrorKind::NotHydrated,
            ToggleError::Rejected(DecideError::UnsupportedDirection { .. }) => {
                ToggleErrorKind::UnsupportedDirection
            }
            ToggleError::Gateway(GatewayError::Unauthorized { .. }) => ToggleErrorKind::Unauthorized,
            ToggleError::Gateway(GatewayError::Conflict { .. }) => ToggleErrorKind::Conflict,
            ToggleError::Gateway(GatewayError::NotFound { .. }) => ToggleErrorKind::NotFound,
            ToggleError::Gateway(GatewayError::UnsupportedDirection { .. }) => {
                ToggleErrorKind::UnsupportedDirection
            }
            ToggleError::Gateway(GatewayError::NetworkFailure(_)) => ToggleErrorKind::NetworkFailure,
            ToggleError::Interrupted(_) => ToggleErrorKind::Interrupted,
        }
    }

    /// True when the optimistic write was undone.
    pub fn rolled_back(&self) -> bool {
        matches!(self, ToggleError::Gateway(_) | ToggleError::Interrupted(_))
    }
}

pub struct VoteController<TGateway>
where
    TGateway: PersistenceGateway + 'static,
{
    store: Arc<VoteStore>,
    gateway: Arc<TGateway>,
    gates: Arc<ItemGates>,
    model: CountingModel,
}

impl<TGateway> Clone for VoteController<TGateway>
where
    TGateway: PersistenceGateway + 'static,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            gateway: self.gateway.clone(),
            gates: self.gates.clone(),
            model: self.model,
        }
    }
}

impl<TGateway> VoteController<TGateway>
where
    TGateway: PersistenceGateway + 'static,
{
    pub fn new(
        store: Arc<VoteStore>,
        gateway: Arc<TGateway>,
        gates: Arc<ItemGates>,
        model: CountingModel,
    ) -> Self {
        Self {
            store,
            gateway,
            gates,
            model,
        }
    }

    /// A controller for another call site. Store, gateway and gates stay shared.
    pub fn with_model(&self, model: CountingModel) -> Self {
        Self {
            model,
            ..self.clone()
        }
    }

    pub fn model(&self) -> CountingModel {
        self.model
    }

    pub fn store(&self) -> &Arc<VoteStore> {
        &self.store
    }

    pub(crate) fn gateway(&self) -> &Arc<TGateway> {
        &self.gateway
    }

    pub(crate) fn gates(&self) -> &Arc<ItemGates> {
        &self.gates
    }

    pub fn is_pending(&self, item_id: &ItemId) -> bool {
        self.gates.state(item_id) == ControllerState::Pending
    }

    pub async fn toggle(&self, command: ToggleVote) -> Result<VoteSnapshot, ToggleError> {
        let ToggleVote {
            item_id,
            requested,
            acting_user,
        } = command;

        let Some(acting_user) = acting_user else {
            debug!(item_id = %item_id, "anonymous vote rejected");
            return Err(ToggleError::Unauthenticated);
        };

        if !self.gates.try_enter(&item_id) {
            debug!(item_id = %item_id, "vote rejected while another is pending");
            return Err(ToggleError::Busy(item_id));
        }
        let mut in_flight = InFlight::new(self.store.clone(), self.gates.clone(), item_id.clone());

        let Some((entry, generation)) = self.store.observe(&item_id) else {
            return Err(ToggleError::NotHydrated(item_id));
        };
        let before = entry.snapshot();

        let transition = match decide_toggle(self.model, &before, requested) {
            Decision::Accepted { transition } => transition,
            Decision::Rejected { reason } => return Err(reason.into()),
        };

        self.store.apply_at(
            generation,
            &item_id,
            transition.next_count,
            transition.next_direction,
        );
        in_flight.arm(generation, before);
        debug!(
            item_id = %item_id,
            from = %before.direction,
            to = %transition.next_direction,
            delta = transition.delta,
            "optimistic vote applied"
        );

        let task = tokio::spawn(persist(
            self.gateway.clone(),
            in_flight,
            acting_user,
            transition,
        ));
        match task.await {
            Ok(result) => result,
            Err(join_error) => {
                warn!(item_id = %item_id, error = %join_error, "vote resolution task failed");
                Err(ToggleError::Interrupted(item_id))
            }
        }
    }
}

async fn persist<TGateway>(
    gateway: Arc<TGateway>,
    in_flight: InFlight,
    acting_user: UserId,
    transition: Transition,
) -> Result<VoteSnapshot, ToggleError>
where
    TGateway: PersistenceGateway + 'static,
{
    let item_id = in_flight.item_id.clone();
    match gateway
        .set_vote(&item_id, &acting_user, transition.next_direction)
        .await
    {
        Ok(SetVoteOutcome { count: Some(count) }) => {
            if count != transition.next_count {
                debug!(
                    item_id = %item_id,
                    optimistic = transition.next_count,
                    authoritative = count,
                    "reconciled with authoritative count"
                );
            }
            Ok(in_flight.settle(VoteSnapshot::new(count, transition.next_direction)))
        }
        Ok(SetVoteOutcome { count: None }) => Ok(in_flight.keep(VoteSnapshot::new(
            transition.next_count,
            transition.next_direction,
        ))),
        Err(error) => {
            warn!(item_id = %item_id, error = %error, "vote rolled back");
            in_flight.roll_back();
            Err(error.into())
        }
    }
}

// Owns the Pending gate of one item until the toggle resolves. Dropping it while
// armed restores the pre-toggle snapshot; dropping it always returns the item to Idle.
struct InFlight {
    store: Arc<VoteStore>,
    gates: Arc<ItemGates>,
    item_id: ItemId,
    generation: u64,
    rollback_to: Option<VoteSnapshot>,
}

impl InFlight {
    fn new(store: Arc<VoteStore>, gates: Arc<ItemGates>, item_id: ItemId) -> Self {
        Self {
            store,
            gates,
            item_id,
            generation: 0,
            rollback_to: None,
        }
    }

    fn arm(&mut self, generation: u64, before: VoteSnapshot) {
        self.generation = generation;
        self.rollback_to = Some(before);
    }

    fn settle(mut self, snapshot: VoteSnapshot) -> VoteSnapshot {
        self.rollback_to = None;
        self.store.apply_at(
            self.generation,
            &self.item_id,
            snapshot.count,
            snapshot.direction,
        );
        snapshot
    }

    fn keep(mut self, snapshot: VoteSnapshot) -> VoteSnapshot {
        self.rollback_to = None;
        snapshot
    }

    fn roll_back(self) {}
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if let Some(before) = self.rollback_to.take() {
            self.store
                .apply_at(self.generation, &self.item_id, before.count, before.direction);
        }
        self.gates.release(&self.item_id);
    }
}
