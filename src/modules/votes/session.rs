// Explicit lifecycle for the vote cache of one signed-in session.
//
// Responsibilities
// - start: create the VoteStore and the item gates shared by every controller of the session.
// - item_deleted: forget an item that no longer exists.
// - end: clear the store on logout, so the next viewer never sees the previous viewer's directions.

use crate::modules::votes::cache::vote_store::VoteStore;
use crate::modules::votes::use_cases::toggle_vote::handler::VoteController;
use crate::modules::votes::use_cases::toggle_vote::pending_gate::ItemGates;
use crate::shared::core::counting::CountingModel;
use crate::shared::core::primitives::ItemId;
use crate::shared::infrastructure::persistence_gateway::PersistenceGateway;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub struct VoteSession<TGateway>
where
    TGateway: PersistenceGateway + 'static,
{
    id: Uuid,
    controller: VoteController<TGateway>,
}

impl<TGateway> VoteSession<TGateway>
where
    TGateway: PersistenceGateway + 'static,
{
    pub fn start(gateway: Arc<TGateway>, default_model: CountingModel) -> Self {
        let id = Uuid::now_v7();
        let controller = VoteController::new(
            Arc::new(VoteStore::new()),
            gateway,
            Arc::new(ItemGates::new()),
            default_model,
        );
        info!(session_id = %id, model = %default_model, "vote session started");
        Self { id, controller }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn store(&self) -> &Arc<VoteStore> {
        self.controller.store()
    }

    pub fn controller(&self) -> &VoteController<TGateway> {
        &self.controller
    }

    /// Controller for a call site that counts under `model`, e.g. upvote-only post cards.
    pub fn controller_for(&self, model: CountingModel) -> VoteController<TGateway> {
        self.controller.with_model(model)
    }

    pub fn item_deleted(&self, item_id: &ItemId) {
        self.store().purge(item_id);
        self.controller.gates().forget(item_id);
    }

    pub fn end(self) {
        self.store().clear();
        self.controller.gates().forget_all();
        info!(session_id = %self.id, "vote session ended");
    }
}
