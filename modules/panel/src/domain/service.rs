use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::contract::error::PanelError;
use crate::contract::model::{Post, User};
use crate::domain::ports::{CustomStore, SeedSource};
use crate::domain::reducer::{self, Action, StoreSync};
use crate::domain::state::WorkingSet;

/// Drives the working set for one session: bootstraps it from the seed
/// source plus the local store, then applies actions and mirrors the
/// resulting store effects. Depends only on the ports, not on infra types.
pub struct PanelService {
    store: Arc<dyn CustomStore>,
    seed: Arc<dyn SeedSource>,
    set: WorkingSet,
}

impl PanelService {
    pub fn new(store: Arc<dyn CustomStore>, seed: Arc<dyn SeedSource>) -> Self {
        Self {
            store,
            seed,
            set: WorkingSet::default(),
        }
    }

    pub fn state(&self) -> &WorkingSet {
        &self.set
    }

    /// Populate the working set: paired seed fetch, local custom loads,
    /// reconcile. Runs once per session.
    ///
    /// If either seed request fails the working set stays empty; the local
    /// custom collections are not merged on their own.
    #[instrument(name = "panel.service.bootstrap", skip(self))]
    pub async fn bootstrap(&mut self) -> Result<(), PanelError> {
        debug!("Fetching seed collections");
        let (remote_users, remote_posts) =
            tokio::try_join!(self.seed.fetch_users(), self.seed.fetch_posts())
                .map_err(|e| PanelError::seed(e.to_string()))?;

        let custom_users = self
            .store
            .load_custom_users()
            .await
            .map_err(|e| PanelError::storage(e.to_string()))?;
        let custom_posts = self
            .store
            .load_custom_posts()
            .await
            .map_err(|e| PanelError::storage(e.to_string()))?;

        self.set = WorkingSet::reconcile(remote_users, remote_posts, custom_users, custom_posts);
        let stats = self.set.stats();
        info!(users = stats.users, posts = stats.posts, "Working set populated");
        Ok(())
    }

    /// Apply one action to the working set, then execute the store effects
    /// it reports. The in-memory mutation lands before the mirror write, so
    /// a storage failure leaves the session state ahead of the store.
    #[instrument(name = "panel.service.dispatch", skip(self, action))]
    pub async fn dispatch(&mut self, action: Action) -> Result<(), PanelError> {
        let effects = reducer::apply(&mut self.set, action)?;
        for effect in effects {
            self.sync_store(effect).await?;
        }
        Ok(())
    }

    /// Execute one mirror update as a read-modify-write over the custom
    /// collection it targets.
    async fn sync_store(&self, effect: StoreSync) -> Result<(), PanelError> {
        match effect {
            StoreSync::AppendUser(user) => {
                self.rewrite_custom_users(move |custom| custom.push(user))
                    .await
            }
            StoreSync::ReplaceUser(user) => {
                self.rewrite_custom_users(move |custom| {
                    for entry in custom.iter_mut().filter(|c| c.id == user.id) {
                        *entry = user.clone();
                    }
                })
                .await
            }
            StoreSync::RemoveUser { id } => {
                self.rewrite_custom_users(move |custom| custom.retain(|c| c.id != id))
                    .await
            }
            StoreSync::AppendPost(post) => {
                self.rewrite_custom_posts(move |custom| custom.push(post))
                    .await
            }
            StoreSync::ReplacePost(post) => {
                self.rewrite_custom_posts(move |custom| {
                    for entry in custom.iter_mut().filter(|c| c.id == post.id) {
                        *entry = post.clone();
                    }
                })
                .await
            }
            StoreSync::RemovePost { id } => {
                self.rewrite_custom_posts(move |custom| custom.retain(|c| c.id != id))
                    .await
            }
        }
    }

    async fn rewrite_custom_users<F>(&self, transform: F) -> Result<(), PanelError>
    where
        F: FnOnce(&mut Vec<User>),
    {
        let mut custom = self
            .store
            .load_custom_users()
            .await
            .map_err(|e| PanelError::storage(e.to_string()))?;
        transform(&mut custom);
        self.store
            .save_custom_users(&custom)
            .await
            .map_err(|e| PanelError::storage(e.to_string()))
    }

    async fn rewrite_custom_posts<F>(&self, transform: F) -> Result<(), PanelError>
    where
        F: FnOnce(&mut Vec<Post>),
    {
        let mut custom = self
            .store
            .load_custom_posts()
            .await
            .map_err(|e| PanelError::storage(e.to_string()))?;
        transform(&mut custom);
        self.store
            .save_custom_posts(&custom)
            .await
            .map_err(|e| PanelError::storage(e.to_string()))
    }
}
