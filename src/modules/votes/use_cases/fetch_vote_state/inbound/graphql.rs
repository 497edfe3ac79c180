use async_graphql::{Context, Enum, Object, Result as GqlResult, SimpleObject};

use crate::shared::core::primitives::{Direction, ItemId, UserId};
use crate::shared::infrastructure::persistence_gateway::{PersistenceGateway, VoteState};
use crate::shell::state::AppState;

#[derive(Enum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum GqlDirection {
    None,
    Up,
    Down,
}

impl From<Direction> for GqlDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::None => GqlDirection::None,
            Direction::Up => GqlDirection::Up,
            Direction::Down => GqlDirection::Down,
        }
    }
}

impl From<GqlDirection> for Direction {
    fn from(direction: GqlDirection) -> Self {
        match direction {
            GqlDirection::None => Direction::None,
            GqlDirection::Up => Direction::Up,
            GqlDirection::Down => Direction::Down,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct GqlVoteState {
    pub count: u64,
    pub direction: GqlDirection,
}

impl From<VoteState> for GqlVoteState {
    fn from(v: VoteState) -> Self {
        Self {
            count: v.count,
            direction: v.direction.into(),
        }
    }
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn vote_state(
        &self,
        context: &Context<'_>,
        item_id: String,
        user_id: Option<String>,
    ) -> GqlResult<GqlVoteState> {
        let state = context.data_unchecked::<AppState>();
        let viewer = user_id.map(UserId::new);
        let vote_state = state
            .votes
            .fetch_vote_state(&ItemId::new(item_id), viewer.as_ref())
            .await?;
        Ok(vote_state.into())
    }
}
