use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::config::PanelConfig;
use crate::contract::model::{Post, User};
use crate::domain::ports::SeedSource;
use crate::infra::seed::dto::{SeedPostDto, SeedUserDto};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("invalid seed base URL")]
    InvalidBase,

    #[error("GET /{endpoint} failed: {source}")]
    Http {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("GET /{endpoint} returned HTTP {status}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
    },

    #[error("GET /{endpoint} returned a malformed payload: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

/// HTTP adapter implementing the SeedSource port: two unauthenticated GETs
/// against a fixed base URL. No retry and no partial-failure handling.
pub struct HttpSeedClient {
    client: reqwest::Client,
    base: Url,
}

impl HttpSeedClient {
    pub fn new(base: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base,
        }
    }

    pub fn from_config(config: &PanelConfig) -> anyhow::Result<Self> {
        let base = Url::parse(&config.seed_base_url)?;
        Ok(Self::new(base))
    }

    async fn fetch_collection<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
    ) -> Result<Vec<T>, SeedError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| SeedError::InvalidBase)?
            .push(endpoint);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| SeedError::Http { endpoint, source })?;

        if !response.status().is_success() {
            return Err(SeedError::Status {
                endpoint,
                status: response.status(),
            });
        }

        response
            .json()
            .await
            .map_err(|source| SeedError::Decode { endpoint, source })
    }
}

#[async_trait]
impl SeedSource for HttpSeedClient {
    #[instrument(name = "panel.seed.fetch_users", skip_all, fields(base = %self.base))]
    async fn fetch_users(&self) -> anyhow::Result<Vec<User>> {
        let users: Vec<SeedUserDto> = self.fetch_collection("users").await?;
        Ok(users.into_iter().map(User::from).collect())
    }

    #[instrument(name = "panel.seed.fetch_posts", skip_all, fields(base = %self.base))]
    async fn fetch_posts(&self) -> anyhow::Result<Vec<Post>> {
        let posts: Vec<SeedPostDto> = self.fetch_collection("posts").await?;
        Ok(posts.into_iter().map(Post::from).collect())
    }
}
