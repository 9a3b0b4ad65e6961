use async_trait::async_trait;

use crate::contract::model::{Post, User};

/// Port for the durable key-value mirror of locally created records.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait CustomStore: Send + Sync {
    /// Load the persisted custom user collection. An absent entry loads as
    /// an empty sequence.
    async fn load_custom_users(&self) -> anyhow::Result<Vec<User>>;
    /// Load the persisted custom post collection.
    async fn load_custom_posts(&self) -> anyhow::Result<Vec<Post>>;
    /// Overwrite the stored user collection under its key. Never incremental.
    async fn save_custom_users(&self, users: &[User]) -> anyhow::Result<()>;
    /// Overwrite the stored post collection under its key.
    async fn save_custom_posts(&self, posts: &[Post]) -> anyhow::Result<()>;
}

/// Port for the read-only startup seed fetch.
#[async_trait]
pub trait SeedSource: Send + Sync {
    async fn fetch_users(&self) -> anyhow::Result<Vec<User>>;
    async fn fetch_posts(&self) -> anyhow::Result<Vec<Post>>;
}
