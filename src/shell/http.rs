use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Extension, Router,
    http::StatusCode,
    response::Html,
    routing::{get, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::modules::votes::use_cases::fetch_vote_state::inbound::http as fetch_http;
use crate::modules::votes::use_cases::manage_items::inbound::http as items_http;
use crate::modules::votes::use_cases::set_vote::inbound::http as set_vote_http;
use crate::shared::infrastructure::persistence_gateway::GatewayError;
use crate::shell::graphql::{AppSchema, schema};
use crate::shell::state::AppState;

pub fn gateway_error_status(error: &GatewayError) -> StatusCode {
    match error {
        GatewayError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        GatewayError::Conflict { .. } => StatusCode::CONFLICT,
        GatewayError::NotFound { .. } => StatusCode::NOT_FOUND,
        GatewayError::UnsupportedDirection { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        GatewayError::NetworkFailure(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

pub fn router(state: AppState) -> Router {
    let schema = schema(state.clone());
    Router::new()
        .route(
            "/items/{item_id}/votes",
            put(set_vote_http::handle).get(fetch_http::handle),
        )
        .route(
            "/items/{item_id}",
            post(items_http::register).delete(items_http::delete),
        )
        .with_state(state)
        .route("/gql", get(graphiql).post(graphql))
        .layer(Extension(schema))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn graphql(Extension(schema): Extension<AppSchema>, req: GraphQLRequest) -> GraphQLResponse {
    schema.execute(req.into_inner()).await.into()
}

async fn graphiql() -> Html<String> {
    Html(GraphiQLSource::build().endpoint("/gql").finish())
}
