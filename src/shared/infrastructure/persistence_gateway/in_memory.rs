// In memory implementation of the PersistenceGateway port.
//
// Purpose
// - Back the vote service binary and the controller tests without a database.
//
// Responsibilities
// - Keep at most one VoteRecord per (item, user) and derive tallies from the records.
// - Track which items exist; deleting an item purges its records.
// - Simulate latency, outages and one-off failures for tests.

use crate::shared::core::counting::CountingModel;
use crate::shared::core::primitives::{Direction, ItemId, UserId};
use crate::shared::core::vote_record::VoteRecord;
use crate::shared::infrastructure::persistence_gateway::{
    GatewayError, PersistenceGateway, SetVoteOutcome, VoteState,
};
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

pub struct InMemoryVoteRecords {
    model: CountingModel,
    report_counts: bool,
    items: RwLock<HashSet<ItemId>>,
    records: RwLock<HashMap<(ItemId, UserId), VoteRecord>>,
    is_offline: bool,
    delay_ms: AtomicU64,
    fail_next: Mutex<Option<GatewayError>>,
    set_vote_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
}

impl Default for InMemoryVoteRecords {
    fn default() -> Self {
        Self::new(CountingModel::default())
    }
}

impl InMemoryVoteRecords {
    pub fn new(model: CountingModel) -> Self {
        Self {
            model,
            report_counts: true,
            items: RwLock::new(HashSet::new()),
            records: RwLock::new(HashMap::new()),
            is_offline: false,
            delay_ms: AtomicU64::new(0),
            fail_next: Mutex::new(None),
            set_vote_calls: AtomicUsize::new(0),
            fetch_calls: AtomicUsize::new(0),
        }
    }

    /// When disabled, successful writes do not return a recomputed tally.
    pub fn with_counts(mut self, report_counts: bool) -> Self {
        self.report_counts = report_counts;
        self
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    pub fn set_delay_ms(&self, delay_ms: u64) {
        self.delay_ms.store(delay_ms, Ordering::SeqCst);
    }

    /// Fail the next set_vote call with `error`.
    pub fn fail_next(&self, error: GatewayError) {
        *self.fail_next.lock().unwrap_or_else(|e| e.into_inner()) = Some(error);
    }

    pub fn set_vote_calls(&self) -> usize {
        self.set_vote_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// Returns false if the item was already registered.
    pub async fn register_item(&self, item_id: ItemId) -> bool {
        self.items.write().await.insert(item_id)
    }

    /// Removes the item and every vote recorded against it. Returns false if the item was unknown.
    pub async fn delete_item(&self, item_id: &ItemId) -> bool {
        let existed = self.items.write().await.remove(item_id);
        if existed {
            self.records
                .write()
                .await
                .retain(|(record_item, _), _| record_item != item_id);
        }
        existed
    }

    pub async fn record(&self, item_id: &ItemId, user_id: &UserId) -> Option<VoteRecord> {
        self.records
            .read()
            .await
            .get(&(item_id.clone(), user_id.clone()))
            .cloned()
    }

    pub async fn records_for(&self, item_id: &ItemId) -> Vec<VoteRecord> {
        let mut rows: Vec<VoteRecord> = self
            .records
            .read()
            .await
            .values()
            .filter(|record| &record.item_id == item_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        rows
    }

    pub async fn tally(&self, item_id: &ItemId) -> u64 {
        let guard = self.records.read().await;
        self.tally_locked(&guard, item_id)
    }

    fn tally_locked(
        &self,
        records: &HashMap<(ItemId, UserId), VoteRecord>,
        item_id: &ItemId,
    ) -> u64 {
        self.model.tally(
            records
                .values()
                .filter(|record| &record.item_id == item_id)
                .map(|record| record.direction),
        )
    }

    async fn simulate_latency(&self) {
        let delay_ms = self.delay_ms.load(Ordering::SeqCst);
        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
    }

    async fn ensure_item(&self, item_id: &ItemId) -> Result<(), GatewayError> {
        if self.items.read().await.contains(item_id) {
            Ok(())
        } else {
            Err(GatewayError::NotFound {
                item_id: item_id.clone(),
            })
        }
    }
}

#[async_trait::async_trait]
impl PersistenceGateway for InMemoryVoteRecords {
    async fn set_vote(
        &self,
        item_id: &ItemId,
        user_id: &UserId,
        direction: Direction,
    ) -> Result<SetVoteOutcome, GatewayError> {
        self.set_vote_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        if self.is_offline {
            return Err(GatewayError::NetworkFailure("Vote store offline".into()));
        }
        let injected = self
            .fail_next
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(error) = injected {
            return Err(error);
        }
        if user_id.is_blank() {
            return Err(GatewayError::Unauthorized {
                item_id: item_id.clone(),
            });
        }
        self.ensure_item(item_id).await?;
        if !self.model.supports(direction) {
            return Err(GatewayError::UnsupportedDirection {
                item_id: item_id.clone(),
                direction,
            });
        }

        let mut guard = self.records.write().await;
        let key = (item_id.clone(), user_id.clone());
        match direction {
            Direction::None => {
                guard.remove(&key);
            }
            direction => {
                guard.insert(
                    key,
                    VoteRecord {
                        item_id: item_id.clone(),
                        user_id: user_id.clone(),
                        direction,
                        voted_at: Utc::now().timestamp_millis(),
                    },
                );
            }
        }

        let count = self
            .report_counts
            .then(|| self.tally_locked(&guard, item_id));
        Ok(SetVoteOutcome { count })
    }

    async fn fetch_vote_state(
        &self,
        item_id: &ItemId,
        user_id: Option<&UserId>,
    ) -> Result<VoteState, GatewayError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        if self.is_offline {
            return Err(GatewayError::NetworkFailure("Vote store offline".into()));
        }
        self.ensure_item(item_id).await?;

        let guard = self.records.read().await;
        let direction = user_id
            .and_then(|user| guard.get(&(item_id.clone(), user.clone())))
            .map(|record| record.direction)
            .unwrap_or_default();
        Ok(VoteState {
            count: self.tally_locked(&guard, item_id),
            direction,
        })
    }
}
