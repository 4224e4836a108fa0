//! Mutation resolvers
//!
//! Same template as the queries. `login` and `signup` are the only
//! operations that skip authentication. Every remove operation returns
//! the pre-deletion record.

use async_graphql::{Context, Object, Result};
use chrono::NaiveDate;
use uuid::Uuid;

use crate::auth::{require_admin, require_not_blocked};
use crate::error::ApiError;
use crate::graphql::types::{
    AuthPayload, Checkin, Feedback, Place, Reservation, Training, TrainingType, User,
};
use crate::graphql::{current_user, state};

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Exchange email and password for a signed token
    async fn login(&self, ctx: &Context<'_>, email: String, password: String) -> Result<AuthPayload> {
        let (token, user) = state(ctx)
            .auth
            .login(&email, &password)
            .await
            .map_err(ApiError::into_graphql)?;
        Ok(AuthPayload {
            token,
            user: user.into(),
        })
    }

    /// Create an account and log it in
    async fn signup(
        &self,
        ctx: &Context<'_>,
        email: String,
        password: String,
        first_name: String,
        last_name: String,
    ) -> Result<AuthPayload> {
        let (token, user) = state(ctx)
            .auth
            .signup(&email, &password, &first_name, &last_name)
            .await
            .map_err(ApiError::into_graphql)?;
        Ok(AuthPayload {
            token,
            user: user.into(),
        })
    }

    /// Reserve a training for a user
    async fn make_reservation(
        &self,
        ctx: &Context<'_>,
        user_id: Uuid,
        training_id: Uuid,
    ) -> Result<Reservation> {
        let caller = current_user(ctx).await?;
        require_not_blocked(&caller).map_err(ApiError::into_graphql)?;

        let reservation = state(ctx)
            .store
            .create_reservation(user_id, training_id)
            .await
            .map_err(ApiError::from).map_err(ApiError::into_graphql)?;
        Ok(reservation.into())
    }

    /// Cancel a reservation, returning the cancelled record
    async fn remove_reservation(
        &self,
        ctx: &Context<'_>,
        reservation_id: Uuid,
    ) -> Result<Reservation> {
        let caller = current_user(ctx).await?;
        require_not_blocked(&caller).map_err(ApiError::into_graphql)?;

        let reservation = state(ctx)
            .store
            .delete_reservation(reservation_id)
            .await
            .map_err(ApiError::from).map_err(ApiError::into_graphql)?;
        Ok(reservation.into())
    }

    /// Leave feedback for a training
    async fn add_feedback(
        &self,
        ctx: &Context<'_>,
        user_id: Uuid,
        training_id: Uuid,
        content: String,
    ) -> Result<Feedback> {
        let caller = current_user(ctx).await?;
        require_not_blocked(&caller).map_err(ApiError::into_graphql)?;

        let feedback = state(ctx)
            .store
            .create_feedback(user_id, training_id, &content)
            .await
            .map_err(ApiError::from).map_err(ApiError::into_graphql)?;
        Ok(feedback.into())
    }

    /// Record a gym checkin
    async fn add_checkin(
        &self,
        ctx: &Context<'_>,
        user_id: Uuid,
        note: Option<String>,
    ) -> Result<Checkin> {
        let caller = current_user(ctx).await?;
        require_not_blocked(&caller).map_err(ApiError::into_graphql)?;

        let checkin = state(ctx)
            .store
            .create_checkin(user_id, note.as_deref())
            .await
            .map_err(ApiError::from).map_err(ApiError::into_graphql)?;
        Ok(checkin.into())
    }

    /// Toggle a user's blocked flag (admin only)
    async fn switch_block_status(&self, ctx: &Context<'_>, user_id: Uuid) -> Result<User> {
        let caller = current_user(ctx).await?;
        require_admin(&caller).map_err(ApiError::into_graphql)?;

        let user = state(ctx)
            .store
            .toggle_user_blocked(user_id)
            .await
            .map_err(ApiError::from).map_err(ApiError::into_graphql)?;
        Ok(user.into())
    }

    /// Create a training type (admin only)
    async fn add_training_type(
        &self,
        ctx: &Context<'_>,
        name: String,
        description: Option<String>,
    ) -> Result<TrainingType> {
        let caller = current_user(ctx).await?;
        require_admin(&caller).map_err(ApiError::into_graphql)?;

        let tt = state(ctx)
            .store
            .create_training_type(&name, description.as_deref())
            .await
            .map_err(ApiError::from).map_err(ApiError::into_graphql)?;
        Ok(tt.into())
    }

    /// Update a training type; absent arguments leave fields unchanged (admin only)
    async fn modify_training_type(
        &self,
        ctx: &Context<'_>,
        training_type_id: Uuid,
        name: Option<String>,
        description: Option<String>,
    ) -> Result<TrainingType> {
        let caller = current_user(ctx).await?;
        require_admin(&caller).map_err(ApiError::into_graphql)?;

        let tt = state(ctx)
            .store
            .update_training_type(training_type_id, name.as_deref(), description.as_deref())
            .await
            .map_err(ApiError::from).map_err(ApiError::into_graphql)?;
        Ok(tt.into())
    }

    /// Delete a training type, returning the deleted record (admin only)
    async fn remove_training_type(
        &self,
        ctx: &Context<'_>,
        training_type_id: Uuid,
    ) -> Result<TrainingType> {
        let caller = current_user(ctx).await?;
        require_admin(&caller).map_err(ApiError::into_graphql)?;

        let tt = state(ctx)
            .store
            .delete_training_type(training_type_id)
            .await
            .map_err(ApiError::from).map_err(ApiError::into_graphql)?;
        Ok(tt.into())
    }

    /// Schedule a training (admin only)
    async fn add_training(
        &self,
        ctx: &Context<'_>,
        date: NaiveDate,
        training_type_id: Uuid,
        place_id: Uuid,
    ) -> Result<Training> {
        let caller = current_user(ctx).await?;
        require_admin(&caller).map_err(ApiError::into_graphql)?;

        let training = state(ctx)
            .store
            .create_training(date, training_type_id, place_id)
            .await
            .map_err(ApiError::from).map_err(ApiError::into_graphql)?;
        Ok(training.into())
    }

    /// Update a training; absent arguments leave fields unchanged (admin only)
    async fn modify_training(
        &self,
        ctx: &Context<'_>,
        training_id: Uuid,
        date: Option<NaiveDate>,
        training_type_id: Option<Uuid>,
        place_id: Option<Uuid>,
    ) -> Result<Training> {
        let caller = current_user(ctx).await?;
        require_admin(&caller).map_err(ApiError::into_graphql)?;

        let training = state(ctx)
            .store
            .update_training(training_id, date, training_type_id, place_id)
            .await
            .map_err(ApiError::from).map_err(ApiError::into_graphql)?;
        Ok(training.into())
    }

    /// Delete a training, returning the deleted record (admin only)
    async fn remove_training(&self, ctx: &Context<'_>, training_id: Uuid) -> Result<Training> {
        let caller = current_user(ctx).await?;
        require_admin(&caller).map_err(ApiError::into_graphql)?;

        let training = state(ctx)
            .store
            .delete_training(training_id)
            .await
            .map_err(ApiError::from).map_err(ApiError::into_graphql)?;
        Ok(training.into())
    }

    /// Create a place (admin only)
    async fn add_place(
        &self,
        ctx: &Context<'_>,
        name: String,
        address: Option<String>,
    ) -> Result<Place> {
        let caller = current_user(ctx).await?;
        require_admin(&caller).map_err(ApiError::into_graphql)?;

        let place = state(ctx)
            .store
            .create_place(&name, address.as_deref())
            .await
            .map_err(ApiError::from).map_err(ApiError::into_graphql)?;
        Ok(place.into())
    }

    /// Update a place; absent arguments leave fields unchanged (admin only)
    async fn modify_place(
        &self,
        ctx: &Context<'_>,
        place_id: Uuid,
        name: Option<String>,
        address: Option<String>,
    ) -> Result<Place> {
        let caller = current_user(ctx).await?;
        require_admin(&caller).map_err(ApiError::into_graphql)?;

        let place = state(ctx)
            .store
            .update_place(place_id, name.as_deref(), address.as_deref())
            .await
            .map_err(ApiError::from).map_err(ApiError::into_graphql)?;
        Ok(place.into())
    }

    /// Delete a place, returning the deleted record (admin only)
    async fn remove_place(&self, ctx: &Context<'_>, place_id: Uuid) -> Result<Place> {
        let caller = current_user(ctx).await?;
        require_admin(&caller).map_err(ApiError::into_graphql)?;

        let place = state(ctx)
            .store
            .delete_place(place_id)
            .await
            .map_err(ApiError::from).map_err(ApiError::into_graphql)?;
        Ok(place.into())
    }
}
