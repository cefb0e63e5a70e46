//! Repository for the `users` table.

use guardian_core::plan::Plan;
use guardian_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, first_name, last_name, avatar, plan, is_active, \
                        email_verified, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, first_name, last_name, avatar, plan)
             VALUES ($1, $2, $3, COALESCE($4, '/placeholder.svg?height=40&width=40'), $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.avatar)
            .bind(&input.plan)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List all users in creation order.
    pub async fn list(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY id ASC");
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// Change a user's plan. `updated_at` is refreshed by trigger.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_plan(
        pool: &PgPool,
        id: DbId,
        plan: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("UPDATE users SET plan = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(plan)
            .fetch_optional(pool)
            .await
    }

    /// Lock a user's row for the rest of the transaction and return its plan.
    ///
    /// Plan-limited inserts take this lock before counting, so two requests
    /// for the same user cannot both observe room under the limit.
    pub(crate) async fn lock_plan(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Plan>, sqlx::Error> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT plan FROM users WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?;
        // `ck_users_plan` keeps stored plans parseable.
        Ok(row.map(|(plan,)| plan.parse().unwrap_or_default()))
    }
}
