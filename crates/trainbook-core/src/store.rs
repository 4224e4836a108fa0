//! PostgreSQL store
//!
//! CRUD access to the booking data using SQLx and PostgreSQL. Reads that
//! the API exposes with related entities are single JOIN queries; creates
//! and updates use `RETURNING`; destroys return the pre-deletion record.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    Checkin, CoreError, Feedback, NewUser, Place, Reservation, Result, Training, TrainingType,
    User,
};

/// PostgreSQL store
///
/// Cheap to clone (wraps a connection pool); a single instance is created
/// at startup and injected into every request's context.
#[derive(Clone)]
pub struct Store {
    pool: PgPool,
}

impl Store {
    /// Create a new store connection
    pub async fn new(database_url: &str, pool_size: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(pool_size)
            .connect(database_url)
            .await
            .map_err(|e| CoreError::DatabaseError(format!("PostgreSQL connection failed: {e}")))?;

        Ok(Self { pool })
    }

    /// Create from an existing pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn write_error(context: &str, e: sqlx::Error) -> CoreError {
    match e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            CoreError::UniqueViolation(format!("{context}: {}", db.message()))
        }
        other => CoreError::DatabaseError(format!("{context}: {other}")),
    }
}

// ============================================================================
// Row types
// ============================================================================

/// User row from database
#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    first_name: String,
    last_name: String,
    is_admin: bool,
    is_blocked: bool,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            first_name: row.first_name,
            last_name: row.last_name,
            is_admin: row.is_admin,
            is_blocked: row.is_blocked,
            created_at: row.created_at,
        }
    }
}

/// Training type row from database
#[derive(Debug, FromRow)]
struct TrainingTypeRow {
    id: Uuid,
    name: String,
    description: Option<String>,
}

impl From<TrainingTypeRow> for TrainingType {
    fn from(row: TrainingTypeRow) -> Self {
        TrainingType {
            id: row.id,
            name: row.name,
            description: row.description,
        }
    }
}

/// Place row from database
#[derive(Debug, FromRow)]
struct PlaceRow {
    id: Uuid,
    name: String,
    address: Option<String>,
}

impl From<PlaceRow> for Place {
    fn from(row: PlaceRow) -> Self {
        Place {
            id: row.id,
            name: row.name,
            address: row.address,
        }
    }
}

/// Training row joined with its type and place
#[derive(Debug, FromRow)]
struct TrainingRow {
    id: Uuid,
    date: NaiveDate,
    training_type_id: Uuid,
    training_type_name: String,
    training_type_description: Option<String>,
    place_id: Uuid,
    place_name: String,
    place_address: Option<String>,
}

impl From<TrainingRow> for Training {
    fn from(row: TrainingRow) -> Self {
        Training {
            id: row.id,
            date: row.date,
            training_type: TrainingType {
                id: row.training_type_id,
                name: row.training_type_name,
                description: row.training_type_description,
            },
            place: Place {
                id: row.place_id,
                name: row.place_name,
                address: row.place_address,
            },
        }
    }
}

/// Reservation row joined with its user and training
#[derive(Debug, FromRow)]
struct ReservationRow {
    id: Uuid,
    created_at: DateTime<Utc>,
    user_id: Uuid,
    user_email: String,
    user_password_hash: String,
    user_first_name: String,
    user_last_name: String,
    user_is_admin: bool,
    user_is_blocked: bool,
    user_created_at: DateTime<Utc>,
    training_id: Uuid,
    training_date: NaiveDate,
    training_type_id: Uuid,
    training_type_name: String,
    training_type_description: Option<String>,
    place_id: Uuid,
    place_name: String,
    place_address: Option<String>,
}

impl From<ReservationRow> for Reservation {
    fn from(row: ReservationRow) -> Self {
        Reservation {
            id: row.id,
            created_at: row.created_at,
            user: User {
                id: row.user_id,
                email: row.user_email,
                password_hash: row.user_password_hash,
                first_name: row.user_first_name,
                last_name: row.user_last_name,
                is_admin: row.user_is_admin,
                is_blocked: row.user_is_blocked,
                created_at: row.user_created_at,
            },
            training: Training {
                id: row.training_id,
                date: row.training_date,
                training_type: TrainingType {
                    id: row.training_type_id,
                    name: row.training_type_name,
                    description: row.training_type_description,
                },
                place: Place {
                    id: row.place_id,
                    name: row.place_name,
                    address: row.place_address,
                },
            },
        }
    }
}

/// Checkin row joined with its user
#[derive(Debug, FromRow)]
struct CheckinRow {
    id: Uuid,
    note: Option<String>,
    created_at: DateTime<Utc>,
    user_id: Uuid,
    user_email: String,
    user_password_hash: String,
    user_first_name: String,
    user_last_name: String,
    user_is_admin: bool,
    user_is_blocked: bool,
    user_created_at: DateTime<Utc>,
}

impl From<CheckinRow> for Checkin {
    fn from(row: CheckinRow) -> Self {
        Checkin {
            id: row.id,
            note: row.note,
            created_at: row.created_at,
            user: User {
                id: row.user_id,
                email: row.user_email,
                password_hash: row.user_password_hash,
                first_name: row.user_first_name,
                last_name: row.user_last_name,
                is_admin: row.user_is_admin,
                is_blocked: row.user_is_blocked,
                created_at: row.user_created_at,
            },
        }
    }
}

/// Feedback row joined with its training
#[derive(Debug, FromRow)]
struct FeedbackRow {
    id: Uuid,
    user_id: Uuid,
    content: String,
    created_at: DateTime<Utc>,
    training_id: Uuid,
    training_date: NaiveDate,
    training_type_id: Uuid,
    training_type_name: String,
    training_type_description: Option<String>,
    place_id: Uuid,
    place_name: String,
    place_address: Option<String>,
}

impl From<FeedbackRow> for Feedback {
    fn from(row: FeedbackRow) -> Self {
        Feedback {
            id: row.id,
            user_id: row.user_id,
            content: row.content,
            created_at: row.created_at,
            training: Training {
                id: row.training_id,
                date: row.training_date,
                training_type: TrainingType {
                    id: row.training_type_id,
                    name: row.training_type_name,
                    description: row.training_type_description,
                },
                place: Place {
                    id: row.place_id,
                    name: row.place_name,
                    address: row.place_address,
                },
            },
        }
    }
}

// ============================================================================
// Shared SELECT fragments
// ============================================================================

const TRAINING_SELECT: &str = r#"
    SELECT
        t.id, t.date,
        tt.id AS training_type_id, tt.name AS training_type_name,
        tt.description AS training_type_description,
        p.id AS place_id, p.name AS place_name, p.address AS place_address
    FROM trainings t
    JOIN training_types tt ON tt.id = t.training_type_id
    JOIN places p ON p.id = t.place_id
"#;

const RESERVATION_SELECT: &str = r#"
    SELECT
        r.id, r.created_at,
        u.id AS user_id, u.email AS user_email,
        u.password_hash AS user_password_hash,
        u.first_name AS user_first_name, u.last_name AS user_last_name,
        u.is_admin AS user_is_admin, u.is_blocked AS user_is_blocked,
        u.created_at AS user_created_at,
        t.id AS training_id, t.date AS training_date,
        tt.id AS training_type_id, tt.name AS training_type_name,
        tt.description AS training_type_description,
        p.id AS place_id, p.name AS place_name, p.address AS place_address
    FROM reservations r
    JOIN users u ON u.id = r.user_id
    JOIN trainings t ON t.id = r.training_id
    JOIN training_types tt ON tt.id = t.training_type_id
    JOIN places p ON p.id = t.place_id
"#;

const CHECKIN_SELECT: &str = r#"
    SELECT
        c.id, c.note, c.created_at,
        u.id AS user_id, u.email AS user_email,
        u.password_hash AS user_password_hash,
        u.first_name AS user_first_name, u.last_name AS user_last_name,
        u.is_admin AS user_is_admin, u.is_blocked AS user_is_blocked,
        u.created_at AS user_created_at
    FROM checkins c
    JOIN users u ON u.id = c.user_id
"#;

const FEEDBACK_SELECT: &str = r#"
    SELECT
        f.id, f.user_id, f.content, f.created_at,
        t.id AS training_id, t.date AS training_date,
        tt.id AS training_type_id, tt.name AS training_type_name,
        tt.description AS training_type_description,
        p.id AS place_id, p.name AS place_name, p.address AS place_address
    FROM feedback f
    JOIN trainings t ON t.id = f.training_id
    JOIN training_types tt ON tt.id = t.training_type_id
    JOIN places p ON p.id = t.place_id
"#;

// ============================================================================
// Users
// ============================================================================

impl Store {
    /// Create a new user; the email must be unique
    pub async fn create_user(&self, new: &NewUser) -> Result<User> {
        let row: UserRow = sqlx::query_as(
            r#"
            INSERT INTO users (id, email, password_hash, first_name, last_name,
                               is_admin, is_blocked, created_at)
            VALUES ($1, $2, $3, $4, $5, false, false, NOW())
            RETURNING id, email, password_hash, first_name, last_name,
                      is_admin, is_blocked, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error("Failed to create user", e))?;

        Ok(row.into())
    }

    /// Find user by ID
    pub async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, email, password_hash, first_name, last_name,
                   is_admin, is_blocked, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CoreError::DatabaseError(format!("Failed to fetch user: {e}")))?;

        Ok(row.map(User::from))
    }

    /// Find user by email
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, email, password_hash, first_name, last_name,
                   is_admin, is_blocked, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CoreError::DatabaseError(format!("Failed to fetch user by email: {e}")))?;

        Ok(row.map(User::from))
    }

    /// List all users
    pub async fn list_users(&self) -> Result<Vec<User>> {
        let rows: Vec<UserRow> = sqlx::query_as(
            r#"
            SELECT id, email, password_hash, first_name, last_name,
                   is_admin, is_blocked, created_at
            FROM users
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CoreError::DatabaseError(format!("Failed to list users: {e}")))?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    /// Flip a user's blocked flag and return the updated record
    ///
    /// A single statement rather than read-then-write, so two concurrent
    /// toggles cannot lose an update.
    pub async fn toggle_user_blocked(&self, id: Uuid) -> Result<User> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            UPDATE users
            SET is_blocked = NOT is_blocked
            WHERE id = $1
            RETURNING id, email, password_hash, first_name, last_name,
                      is_admin, is_blocked, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CoreError::DatabaseError(format!("Failed to update user: {e}")))?;

        row.map(User::from)
            .ok_or_else(|| CoreError::NotFound(format!("user {id}")))
    }
}

// ============================================================================
// Training types
// ============================================================================

impl Store {
    /// List all training types
    pub async fn list_training_types(&self) -> Result<Vec<TrainingType>> {
        let rows: Vec<TrainingTypeRow> = sqlx::query_as(
            "SELECT id, name, description FROM training_types ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CoreError::DatabaseError(format!("Failed to list training types: {e}")))?;

        Ok(rows.into_iter().map(TrainingType::from).collect())
    }

    /// Create a training type
    pub async fn create_training_type(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<TrainingType> {
        let row: TrainingTypeRow = sqlx::query_as(
            r#"
            INSERT INTO training_types (id, name, description)
            VALUES ($1, $2, $3)
            RETURNING id, name, description
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error("Failed to create training type", e))?;

        Ok(row.into())
    }

    /// Update a training type; absent fields are left unchanged
    pub async fn update_training_type(
        &self,
        id: Uuid,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<TrainingType> {
        let row: Option<TrainingTypeRow> = sqlx::query_as(
            r#"
            UPDATE training_types
            SET name = COALESCE($2, name),
                description = COALESCE($3, description)
            WHERE id = $1
            RETURNING id, name, description
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CoreError::DatabaseError(format!("Failed to update training type: {e}")))?;

        row.map(TrainingType::from)
            .ok_or_else(|| CoreError::NotFound(format!("training type {id}")))
    }

    /// Delete a training type and return the pre-deletion record
    pub async fn delete_training_type(&self, id: Uuid) -> Result<TrainingType> {
        let row: Option<TrainingTypeRow> = sqlx::query_as(
            "DELETE FROM training_types WHERE id = $1 RETURNING id, name, description",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CoreError::DatabaseError(format!("Failed to delete training type: {e}")))?;

        row.map(TrainingType::from)
            .ok_or_else(|| CoreError::NotFound(format!("training type {id}")))
    }
}

// ============================================================================
// Places
// ============================================================================

impl Store {
    /// List all places
    pub async fn list_places(&self) -> Result<Vec<Place>> {
        let rows: Vec<PlaceRow> =
            sqlx::query_as("SELECT id, name, address FROM places ORDER BY name")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| CoreError::DatabaseError(format!("Failed to list places: {e}")))?;

        Ok(rows.into_iter().map(Place::from).collect())
    }

    /// Create a place
    pub async fn create_place(&self, name: &str, address: Option<&str>) -> Result<Place> {
        let row: PlaceRow = sqlx::query_as(
            r#"
            INSERT INTO places (id, name, address)
            VALUES ($1, $2, $3)
            RETURNING id, name, address
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(address)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error("Failed to create place", e))?;

        Ok(row.into())
    }

    /// Update a place; absent fields are left unchanged
    pub async fn update_place(
        &self,
        id: Uuid,
        name: Option<&str>,
        address: Option<&str>,
    ) -> Result<Place> {
        let row: Option<PlaceRow> = sqlx::query_as(
            r#"
            UPDATE places
            SET name = COALESCE($2, name),
                address = COALESCE($3, address)
            WHERE id = $1
            RETURNING id, name, address
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(address)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CoreError::DatabaseError(format!("Failed to update place: {e}")))?;

        row.map(Place::from)
            .ok_or_else(|| CoreError::NotFound(format!("place {id}")))
    }

    /// Delete a place and return the pre-deletion record
    pub async fn delete_place(&self, id: Uuid) -> Result<Place> {
        let row: Option<PlaceRow> =
            sqlx::query_as("DELETE FROM places WHERE id = $1 RETURNING id, name, address")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| CoreError::DatabaseError(format!("Failed to delete place: {e}")))?;

        row.map(Place::from)
            .ok_or_else(|| CoreError::NotFound(format!("place {id}")))
    }
}

// ============================================================================
// Trainings
// ============================================================================

impl Store {
    /// List all trainings with their type and place
    pub async fn list_trainings(&self) -> Result<Vec<Training>> {
        let query = format!("{TRAINING_SELECT} ORDER BY t.date");
        let rows: Vec<TrainingRow> = sqlx::query_as(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| CoreError::DatabaseError(format!("Failed to list trainings: {e}")))?;

        Ok(rows.into_iter().map(Training::from).collect())
    }

    /// List trainings scheduled on a given date
    pub async fn list_trainings_on(&self, date: NaiveDate) -> Result<Vec<Training>> {
        let query = format!("{TRAINING_SELECT} WHERE t.date = $1 ORDER BY t.id");
        let rows: Vec<TrainingRow> = sqlx::query_as(&query)
            .bind(date)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| CoreError::DatabaseError(format!("Failed to list trainings: {e}")))?;

        Ok(rows.into_iter().map(Training::from).collect())
    }

    /// Find a training by ID
    pub async fn find_training(&self, id: Uuid) -> Result<Option<Training>> {
        let query = format!("{TRAINING_SELECT} WHERE t.id = $1");
        let row: Option<TrainingRow> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| CoreError::DatabaseError(format!("Failed to fetch training: {e}")))?;

        Ok(row.map(Training::from))
    }

    /// Create a training and return it with its type and place
    pub async fn create_training(
        &self,
        date: NaiveDate,
        training_type_id: Uuid,
        place_id: Uuid,
    ) -> Result<Training> {
        let row: (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO trainings (id, date, training_type_id, place_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(date)
        .bind(training_type_id)
        .bind(place_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error("Failed to create training", e))?;

        self.find_training(row.0)
            .await?
            .ok_or_else(|| CoreError::DatabaseError("created training vanished".to_string()))
    }

    /// Update a training; absent fields are left unchanged
    pub async fn update_training(
        &self,
        id: Uuid,
        date: Option<NaiveDate>,
        training_type_id: Option<Uuid>,
        place_id: Option<Uuid>,
    ) -> Result<Training> {
        let row: Option<(Uuid,)> = sqlx::query_as(
            r#"
            UPDATE trainings
            SET date = COALESCE($2, date),
                training_type_id = COALESCE($3, training_type_id),
                place_id = COALESCE($4, place_id)
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(date)
        .bind(training_type_id)
        .bind(place_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CoreError::DatabaseError(format!("Failed to update training: {e}")))?;

        let (id,) = row.ok_or_else(|| CoreError::NotFound(format!("training {id}")))?;
        self.find_training(id)
            .await?
            .ok_or_else(|| CoreError::DatabaseError("updated training vanished".to_string()))
    }

    /// Delete a training and return the pre-deletion record
    pub async fn delete_training(&self, id: Uuid) -> Result<Training> {
        let training = self
            .find_training(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("training {id}")))?;

        sqlx::query("DELETE FROM trainings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| CoreError::DatabaseError(format!("Failed to delete training: {e}")))?;

        Ok(training)
    }
}

// ============================================================================
// Reservations
// ============================================================================

impl Store {
    /// List all reservations with their user and training
    pub async fn list_reservations(&self) -> Result<Vec<Reservation>> {
        let query = format!("{RESERVATION_SELECT} ORDER BY r.created_at");
        let rows: Vec<ReservationRow> = sqlx::query_as(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| CoreError::DatabaseError(format!("Failed to list reservations: {e}")))?;

        Ok(rows.into_iter().map(Reservation::from).collect())
    }

    /// List the reservations belonging to a user
    pub async fn list_reservations_for_user(&self, user_id: Uuid) -> Result<Vec<Reservation>> {
        let query = format!("{RESERVATION_SELECT} WHERE r.user_id = $1 ORDER BY r.created_at");
        let rows: Vec<ReservationRow> = sqlx::query_as(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| CoreError::DatabaseError(format!("Failed to list reservations: {e}")))?;

        Ok(rows.into_iter().map(Reservation::from).collect())
    }

    /// Find a reservation by ID
    pub async fn find_reservation(&self, id: Uuid) -> Result<Option<Reservation>> {
        let query = format!("{RESERVATION_SELECT} WHERE r.id = $1");
        let row: Option<ReservationRow> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| CoreError::DatabaseError(format!("Failed to fetch reservation: {e}")))?;

        Ok(row.map(Reservation::from))
    }

    /// Create a reservation and return it with its user and training
    pub async fn create_reservation(&self, user_id: Uuid, training_id: Uuid) -> Result<Reservation> {
        let row: (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO reservations (id, user_id, training_id, created_at)
            VALUES ($1, $2, $3, NOW())
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(training_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error("Failed to create reservation", e))?;

        self.find_reservation(row.0)
            .await?
            .ok_or_else(|| CoreError::DatabaseError("created reservation vanished".to_string()))
    }

    /// Delete a reservation and return the pre-deletion record
    pub async fn delete_reservation(&self, id: Uuid) -> Result<Reservation> {
        let reservation = self
            .find_reservation(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("reservation {id}")))?;

        sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| CoreError::DatabaseError(format!("Failed to delete reservation: {e}")))?;

        Ok(reservation)
    }
}

// ============================================================================
// Checkins
// ============================================================================

impl Store {
    /// List all checkins with their user
    pub async fn list_checkins(&self) -> Result<Vec<Checkin>> {
        let query = format!("{CHECKIN_SELECT} ORDER BY c.created_at");
        let rows: Vec<CheckinRow> = sqlx::query_as(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| CoreError::DatabaseError(format!("Failed to list checkins: {e}")))?;

        Ok(rows.into_iter().map(Checkin::from).collect())
    }

    /// List the checkins belonging to a user
    pub async fn list_checkins_for_user(&self, user_id: Uuid) -> Result<Vec<Checkin>> {
        let query = format!("{CHECKIN_SELECT} WHERE c.user_id = $1 ORDER BY c.created_at");
        let rows: Vec<CheckinRow> = sqlx::query_as(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| CoreError::DatabaseError(format!("Failed to list checkins: {e}")))?;

        Ok(rows.into_iter().map(Checkin::from).collect())
    }

    /// Create a checkin and return it with its user
    pub async fn create_checkin(&self, user_id: Uuid, note: Option<&str>) -> Result<Checkin> {
        let row: (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO checkins (id, user_id, note, created_at)
            VALUES ($1, $2, $3, NOW())
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(note)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error("Failed to create checkin", e))?;

        let query = format!("{CHECKIN_SELECT} WHERE c.id = $1");
        let created: Option<CheckinRow> = sqlx::query_as(&query)
            .bind(row.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| CoreError::DatabaseError(format!("Failed to fetch checkin: {e}")))?;

        created
            .map(Checkin::from)
            .ok_or_else(|| CoreError::DatabaseError("created checkin vanished".to_string()))
    }
}

// ============================================================================
// Feedback
// ============================================================================

impl Store {
    /// List the feedback a user left, with each training eager-loaded
    pub async fn list_feedback_for_user(&self, user_id: Uuid) -> Result<Vec<Feedback>> {
        let query = format!("{FEEDBACK_SELECT} WHERE f.user_id = $1 ORDER BY f.created_at");
        let rows: Vec<FeedbackRow> = sqlx::query_as(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| CoreError::DatabaseError(format!("Failed to list feedback: {e}")))?;

        Ok(rows.into_iter().map(Feedback::from).collect())
    }

    /// Create feedback and return it with its training
    pub async fn create_feedback(
        &self,
        user_id: Uuid,
        training_id: Uuid,
        content: &str,
    ) -> Result<Feedback> {
        let row: (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO feedback (id, user_id, training_id, content, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(training_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error("Failed to create feedback", e))?;

        let query = format!("{FEEDBACK_SELECT} WHERE f.id = $1");
        let created: Option<FeedbackRow> = sqlx::query_as(&query)
            .bind(row.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| CoreError::DatabaseError(format!("Failed to fetch feedback: {e}")))?;

        created
            .map(Feedback::from)
            .ok_or_else(|| CoreError::DatabaseError("created feedback vanished".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_error_maps_unique_violation_passthrough() {
        // Non-database errors stay database errors with context
        let err = write_error("Failed to create user", sqlx::Error::RowNotFound);
        match err {
            CoreError::DatabaseError(msg) => {
                assert!(msg.starts_with("Failed to create user"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_training_row_conversion() {
        let row = TrainingRow {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            training_type_id: Uuid::new_v4(),
            training_type_name: "Yoga".to_string(),
            training_type_description: Some("Beginner friendly".to_string()),
            place_id: Uuid::new_v4(),
            place_name: "Studio B".to_string(),
            place_address: None,
        };

        let training = Training::from(row);
        assert_eq!(training.training_type.name, "Yoga");
        assert_eq!(training.place.name, "Studio B");
        assert!(training.place.address.is_none());
    }
}
