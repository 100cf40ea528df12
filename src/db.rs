use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info};

use crate::geo::GeoPoint;
use crate::store::LocationStore;

/// Initialize the database schema
pub async fn init_database_schema(pool: &PgPool) -> Result<()> {
    info!("Initializing database schema...");

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            id SERIAL PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            latitude DOUBLE PRECISION CHECK (latitude BETWEEN -90 AND 90),
            longitude DOUBLE PRECISION CHECK (longitude BETWEEN -180 AND 180)
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create users table")?;

    info!("Database schema initialized successfully");
    Ok(())
}

/// Register a user, ignoring users that already exist
pub async fn add_user(pool: &PgPool, username: &str) -> Result<()> {
    debug!(username = %username, "Registering user");

    sqlx::query("INSERT INTO users (username) VALUES ($1) ON CONFLICT (username) DO NOTHING")
        .bind(username)
        .execute(pool)
        .await
        .context("Failed to insert user")?;

    Ok(())
}

/// Store a user's latest location, creating the user row if missing
pub async fn update_user_location(pool: &PgPool, username: &str, point: GeoPoint) -> Result<()> {
    debug!(username = %username, "Updating user location");

    sqlx::query(
        "INSERT INTO users (username, latitude, longitude) VALUES ($1, $2, $3)
         ON CONFLICT (username)
         DO UPDATE SET latitude = EXCLUDED.latitude, longitude = EXCLUDED.longitude",
    )
    .bind(username)
    .bind(point.latitude)
    .bind(point.longitude)
    .execute(pool)
    .await
    .context("Failed to update user location")?;

    Ok(())
}

/// Read a user's last known location
pub async fn get_user_location(pool: &PgPool, username: &str) -> Result<Option<GeoPoint>> {
    let row: Option<(Option<f64>, Option<f64>)> =
        sqlx::query_as("SELECT latitude, longitude FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(pool)
            .await
            .context("Failed to read user location")?;

    match row {
        Some((Some(latitude), Some(longitude))) => {
            let point = GeoPoint::new(latitude, longitude)
                .with_context(|| format!("Stored location of {username} is invalid"))?;
            Ok(Some(point))
        }
        _ => Ok(None),
    }
}

/// List all registered usernames in registration order
pub async fn get_all_users(pool: &PgPool) -> Result<Vec<String>> {
    let usernames: Vec<String> = sqlx::query_scalar("SELECT username FROM users ORDER BY id")
        .fetch_all(pool)
        .await
        .context("Failed to list users")?;

    Ok(usernames)
}

/// [`LocationStore`] backed by a PostgreSQL connection pool
#[derive(Debug, Clone)]
pub struct PgLocationStore {
    pool: PgPool,
}

impl PgLocationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to `database_url` and make sure the schema exists
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .context("Failed to connect to database")?;

        init_database_schema(&pool).await?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl LocationStore for PgLocationStore {
    async fn add_user(&self, user_id: &str) -> Result<()> {
        add_user(&self.pool, user_id).await
    }

    async fn update_user_location(&self, user_id: &str, point: GeoPoint) -> Result<()> {
        update_user_location(&self.pool, user_id, point).await
    }

    async fn get_user_location(&self, user_id: &str) -> Result<Option<GeoPoint>> {
        get_user_location(&self.pool, user_id).await
    }

    async fn get_all_users(&self) -> Result<Vec<String>> {
        get_all_users(&self.pool).await
    }
}
