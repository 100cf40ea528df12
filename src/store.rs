//! Location storage seam.
//!
//! The bot only needs four operations from persistence. `PgLocationStore`
//! in [`crate::db`] implements them over PostgreSQL; [`InMemoryLocationStore`]
//! keeps everything in process memory for tests and database-less runs.

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::geo::GeoPoint;

#[async_trait]
pub trait LocationStore: Send + Sync {
    /// Register a user; registering twice is a no-op
    async fn add_user(&self, user_id: &str) -> Result<()>;

    /// Record the user's latest location, registering them if needed
    async fn update_user_location(&self, user_id: &str, point: GeoPoint) -> Result<()>;

    /// Last known location, `None` for unknown users or users without one
    async fn get_user_location(&self, user_id: &str) -> Result<Option<GeoPoint>>;

    /// All registered users in registration order
    async fn get_all_users(&self) -> Result<Vec<String>>;
}

#[derive(Debug, Default)]
pub struct InMemoryLocationStore {
    users: RwLock<Vec<(String, Option<GeoPoint>)>>,
}

impl InMemoryLocationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocationStore for InMemoryLocationStore {
    async fn add_user(&self, user_id: &str) -> Result<()> {
        let mut users = self.users.write().await;
        if !users.iter().any(|(id, _)| id == user_id) {
            users.push((user_id.to_string(), None));
        }
        Ok(())
    }

    async fn update_user_location(&self, user_id: &str, point: GeoPoint) -> Result<()> {
        let mut users = self.users.write().await;
        match users.iter_mut().find(|(id, _)| id == user_id) {
            Some((_, location)) => *location = Some(point),
            None => users.push((user_id.to_string(), Some(point))),
        }
        Ok(())
    }

    async fn get_user_location(&self, user_id: &str) -> Result<Option<GeoPoint>> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|(id, _)| id == user_id)
            .and_then(|(_, location)| *location))
    }

    async fn get_all_users(&self) -> Result<Vec<String>> {
        let users = self.users.read().await;
        Ok(users.iter().map(|(id, _)| id.clone()).collect())
    }
}
