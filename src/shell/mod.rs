// Composition root for the vote service.
//
// Responsibilities
// - Read config from environment.
// - Instantiate the in memory vote store behind the PersistenceGateway port.
// - Expose it over HTTP and GraphQL.

pub mod config;
pub mod graphql;
pub mod http;
pub mod state;
