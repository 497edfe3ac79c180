use async_graphql::{EmptySubscription, Schema};

pub use crate::modules::votes::use_cases::fetch_vote_state::inbound::graphql::QueryRoot;
pub use crate::modules::votes::use_cases::set_vote::inbound::graphql::MutationRoot;
pub use crate::shell::state::AppState;

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn schema(state: AppState) -> AppSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(state)
        .finish()
}
