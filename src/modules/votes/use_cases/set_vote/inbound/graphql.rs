use async_graphql::{Context, Object, Result as GqlResult};

use crate::modules::votes::use_cases::fetch_vote_state::inbound::graphql::GqlDirection;
use crate::shared::core::primitives::{ItemId, UserId};
use crate::shared::infrastructure::persistence_gateway::PersistenceGateway;
use crate::shell::state::AppState;

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Returns the recomputed tally, or null when the store does not report one.
    async fn set_vote(
        &self,
        context: &Context<'_>,
        item_id: String,
        user_id: String,
        direction: GqlDirection,
    ) -> GqlResult<Option<u64>> {
        let state = context.data_unchecked::<AppState>();
        let outcome = state
            .votes
            .set_vote(&ItemId::new(item_id), &UserId::new(user_id), direction.into())
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;
        Ok(outcome.count)
    }
}
