use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt};

use item_votes::shared::infrastructure::persistence_gateway::in_memory::InMemoryVoteRecords;
use item_votes::shell::config::Config;
use item_votes::shell::http::router;
use item_votes::shell::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = Config::from_env()?;

    let votes = Arc::new(
        InMemoryVoteRecords::new(config.counting_model).with_counts(config.report_counts),
    );
    let app = router(AppState::new(votes));

    tracing::info!(model = %config.counting_model, "vote service listening on http://{}", config.bind_addr);
    tracing::info!("GraphQL endpoint: http://{}/gql", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
