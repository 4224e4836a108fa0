//! Trainbook API - GraphQL server
//!
//! Exposes the booking system over a single GraphQL endpoint. Every
//! resolver follows the same template: authenticate the caller, apply the
//! operation's guard (if any), perform one logical store operation.

pub mod auth;
pub mod error;
pub mod graphql;
pub mod routes;
pub mod state;

pub use routes::create_router;
