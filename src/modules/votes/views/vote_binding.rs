// Read-only view binding for one rendered vote control (list card, detail page, comment row).
//
// Responsibilities
// - Render whatever the VoteStore last published for the item.
// - Forward clicks to the controller; keep the last failure message for a non-modal notice.
// - Never retry. Unmounting drops only this view's subscription.
// - Render nothing once the item was purged or the session cleared since mounting.

use crate::modules::votes::cache::vote_store::Subscription;
use crate::modules::votes::core::entry::VoteSnapshot;
use crate::modules::votes::use_cases::toggle_vote::command::ToggleVote;
use crate::modules::votes::use_cases::toggle_vote::handler::{ToggleError, VoteController};
use crate::shared::core::primitives::{ItemId, UserId, Vote};
use crate::shared::infrastructure::persistence_gateway::PersistenceGateway;
use std::sync::{Arc, Mutex, PoisonError};

pub struct VoteBinding<TGateway>
where
    TGateway: PersistenceGateway + 'static,
{
    item_id: ItemId,
    controller: VoteController<TGateway>,
    rendered: Arc<Mutex<Option<VoteSnapshot>>>,
    last_error: Mutex<Option<String>>,
    subscription: Subscription,
}

impl<TGateway> VoteBinding<TGateway>
where
    TGateway: PersistenceGateway + 'static,
{
    pub fn mount(controller: VoteController<TGateway>, item_id: ItemId) -> Self {
        let rendered = Arc::new(Mutex::new(None));
        let sink = rendered.clone();
        let subscription =
            controller
                .store()
                .subscribe_with_current(item_id.clone(), move |snapshot| {
                    *sink.lock().unwrap_or_else(PoisonError::into_inner) = Some(*snapshot);
                });
        Self {
            item_id,
            controller,
            rendered,
            last_error: Mutex::new(None),
            subscription,
        }
    }

    pub fn item_id(&self) -> &ItemId {
        &self.item_id
    }

    /// What the control currently shows; `None` until the item is hydrated and after it is gone.
    pub fn rendered(&self) -> Option<VoteSnapshot> {
        let store = self.controller.store();
        if store.generation() != self.subscription.generation() || store.get(&self.item_id).is_none()
        {
            return None;
        }
        *self.rendered.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_disabled(&self) -> bool {
        self.rendered().is_none() || self.controller.is_pending(&self.item_id)
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub async fn click(
        &self,
        vote: Vote,
        viewer: Option<UserId>,
    ) -> Result<VoteSnapshot, ToggleError> {
        let result = self
            .controller
            .toggle(ToggleVote::new(self.item_id.clone(), vote, viewer))
            .await;
        *self.last_error.lock().unwrap_or_else(PoisonError::into_inner) =
            result.as_ref().err().map(ToString::to_string);
        result
    }

    pub fn unmount(self) {}
}
