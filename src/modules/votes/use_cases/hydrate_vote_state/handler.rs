// Hydration and refresh of cached vote state.
//
// Responsibilities
// - hydrate: pages that already fetched count and direction with their content seed the cache.
// - ensure_hydrated: fetch once per item, however many views ask at the same time.
// - refresh: heal drift with a fresh fetch, unless a toggle is pending or landed meanwhile.
// - Fetches that straddle a logout are discarded.

use crate::modules::votes::core::entry::VoteSnapshot;
use crate::modules::votes::use_cases::toggle_vote::handler::VoteController;
use crate::shared::core::primitives::{Direction, ItemId, UserId};
use crate::shared::infrastructure::persistence_gateway::{GatewayError, PersistenceGateway};
use tracing::debug;

impl<TGateway> VoteController<TGateway>
where
    TGateway: PersistenceGateway + 'static,
{
    pub fn hydrate(&self, item_id: ItemId, count: u64, direction: Direction) -> VoteSnapshot {
        self.store().hydrate(item_id, count, direction).snapshot()
    }

    /// Returns `None` if the session ended while the fetch was in flight.
    pub async fn ensure_hydrated(
        &self,
        item_id: &ItemId,
        viewer: Option<&UserId>,
    ) -> Result<Option<VoteSnapshot>, GatewayError> {
        if let Some(entry) = self.store().get(item_id) {
            return Ok(Some(entry.snapshot()));
        }

        let lock = self.gates().hydration_lock(item_id);
        let _hydrating = lock.lock().await;
        if let Some(entry) = self.store().get(item_id) {
            return Ok(Some(entry.snapshot()));
        }

        let generation = self.store().generation();
        let state = self.gateway().fetch_vote_state(item_id, viewer).await?;
        let hydrated = self
            .store()
            .hydrate_at(generation, item_id.clone(), state.count, state.direction);
        if hydrated.is_none() {
            debug!(item_id = %item_id, "hydration discarded after session ended");
        }
        Ok(hydrated.map(|entry| entry.snapshot()))
    }

    /// Returns the healed snapshot, or `None` when the refresh was skipped or superseded.
    pub async fn refresh(
        &self,
        item_id: &ItemId,
        viewer: Option<&UserId>,
    ) -> Result<Option<VoteSnapshot>, GatewayError> {
        let Some(observed) = self.store().get(item_id) else {
            return self.ensure_hydrated(item_id, viewer).await;
        };
        if self.is_pending(item_id) {
            debug!(item_id = %item_id, "refresh skipped while a vote is pending");
            return Ok(None);
        }

        let state = self.gateway().fetch_vote_state(item_id, viewer).await?;
        let refreshed =
            self.store()
                .refresh(item_id, state.count, state.direction, observed.version);
        if refreshed.is_none() {
            debug!(item_id = %item_id, "refresh superseded by a newer write");
        }
        Ok(refreshed.map(|entry| entry.snapshot()))
    }
}
