//! GraphQL schema and resolvers

pub mod mutation;
pub mod query;
pub mod types;

use std::sync::Arc;

use async_graphql::{Context, EmptySubscription, Schema};

use crate::state::AppState;

pub use mutation::MutationRoot;
pub use query::QueryRoot;

/// The application GraphQL schema
pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Per-request context
///
/// Built by the transport handler from the incoming HTTP request and
/// attached to the GraphQL request data. Carries only what the resolvers
/// need: the raw `Authorization` header value, if one was sent.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub token: Option<String>,
}

/// Build the schema with the shared application state attached
pub fn build_schema(state: Arc<AppState>) -> AppSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(state)
        .finish()
}

/// Shared application state, attached once at schema build time
pub(crate) fn state<'a>(ctx: &'a Context<'_>) -> &'a Arc<AppState> {
    ctx.data_unchecked::<Arc<AppState>>()
}

/// Authenticate the caller of the current request
///
/// Reads the bearer credential out of the request context and resolves it
/// to a user record. A request that never attached a context (or attached
/// one without a token) fails as unauthenticated like any bad credential.
pub(crate) async fn current_user(ctx: &Context<'_>) -> async_graphql::Result<trainbook_core::User> {
    let token = ctx
        .data_opt::<RequestContext>()
        .and_then(|request| request.token.as_deref());

    let user = state(ctx)
        .auth
        .authenticate(token)
        .await
        .map_err(crate::error::ApiError::into_graphql)?;
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_exposes_every_operation() {
        let schema = Schema::build(QueryRoot, MutationRoot, EmptySubscription).finish();
        let sdl = schema.sdl();

        let queries = [
            "checkToken",
            "getAllUsers",
            "getOneUser",
            "getAllCheckins",
            "getCheckinForUser",
            "getAllTrainingTypes",
            "getAllPlaces",
            "getAllReservations",
            "getAllReservationsForUser",
            "getAllTrainings",
            "getTrainingThisDay",
            "getFeedbacksForUser",
        ];
        let mutations = [
            "login",
            "signup",
            "makeReservation",
            "removeReservation",
            "addFeedback",
            "addCheckin",
            "switchBlockStatus",
            "addTrainingType",
            "modifyTrainingType",
            "removeTrainingType",
            "addTraining",
            "modifyTraining",
            "removeTraining",
            "addPlace",
            "modifyPlace",
            "removePlace",
        ];

        for operation in queries.iter().chain(mutations.iter()) {
            assert!(sdl.contains(operation), "schema is missing {operation}");
        }
    }

    #[test]
    fn test_user_type_has_no_password_field() {
        let schema = Schema::build(QueryRoot, MutationRoot, EmptySubscription).finish();
        let sdl = schema.sdl();

        assert!(sdl.contains("type User"));
        assert!(!sdl.to_lowercase().contains("password_hash"));
        assert!(!sdl.contains("passwordHash"));
    }
}
