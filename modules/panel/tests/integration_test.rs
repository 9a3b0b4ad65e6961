use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tempfile::TempDir;

use panel::contract::error::PanelError;
use panel::contract::model::{NewPost, NewUser, Post, User, UserPatch};
use panel::domain::ports::{CustomStore, SeedSource};
use panel::domain::reducer::Action;
use panel::domain::service::PanelService;
use panel::infra::storage::JsonFileStore;

/// In-memory seed source serving fixed collections
struct StubSeed {
    users: Vec<User>,
    posts: Vec<Post>,
}

#[async_trait]
impl SeedSource for StubSeed {
    async fn fetch_users(&self) -> anyhow::Result<Vec<User>> {
        Ok(self.users.clone())
    }

    async fn fetch_posts(&self) -> anyhow::Result<Vec<Post>> {
        Ok(self.posts.clone())
    }
}

/// Seed source whose requests always fail
struct FailingSeed;

#[async_trait]
impl SeedSource for FailingSeed {
    async fn fetch_users(&self) -> anyhow::Result<Vec<User>> {
        anyhow::bail!("connection refused")
    }

    async fn fetch_posts(&self) -> anyhow::Result<Vec<Post>> {
        anyhow::bail!("connection refused")
    }
}

fn seed_user(id: u64, name: &str) -> User {
    User {
        id,
        name: name.to_string(),
        username: name.to_lowercase(),
        email: format!("{}@example.com", name.to_lowercase()),
    }
}

fn seed_post(id: u64, title: &str, user_id: u64) -> Post {
    Post {
        id,
        title: title.to_string(),
        user_id,
    }
}

fn two_remote_users() -> Vec<User> {
    vec![seed_user(1, "Ana"), seed_user(2, "Bo")]
}

fn service_at(dir: &TempDir, seed: impl SeedSource + 'static) -> PanelService {
    let store = Arc::new(JsonFileStore::new(dir.path()));
    PanelService::new(store, Arc::new(seed))
}

fn store_at(dir: &TempDir) -> JsonFileStore {
    JsonFileStore::new(dir.path())
}

#[tokio::test]
async fn test_add_user_persists_only_custom_records() -> Result<()> {
    let dir = TempDir::new()?;
    let mut service = service_at(
        &dir,
        StubSeed {
            users: two_remote_users(),
            posts: vec![],
        },
    );
    service.bootstrap().await?;

    service
        .dispatch(Action::AddUser(NewUser {
            name: "Cy".to_string(),
            username: "cy".to_string(),
            email: "cy@x.com".to_string(),
        }))
        .await?;

    // Working set: remote entries first, then the new local one with id 3.
    let names: Vec<_> = service
        .state()
        .users()
        .iter()
        .map(|u| u.record.name.as_str())
        .collect();
    assert_eq!(names, vec!["Ana", "Bo", "Cy"]);
    assert_eq!(service.state().users()[2].record.id, 3);

    // The store mirrors only the custom subset.
    let persisted = store_at(&dir).load_custom_users().await?;
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].id, 3);
    assert_eq!(persisted[0].name, "Cy");
    Ok(())
}

#[tokio::test]
async fn test_custom_records_survive_reload() -> Result<()> {
    let dir = TempDir::new()?;
    let mut service = service_at(
        &dir,
        StubSeed {
            users: two_remote_users(),
            posts: vec![],
        },
    );
    service.bootstrap().await?;
    service
        .dispatch(Action::AddUser(NewUser {
            name: "Cy".to_string(),
            username: "cy".to_string(),
            email: "cy@x.com".to_string(),
        }))
        .await?;

    // A second session over the same store sees the merged collections.
    let mut next = service_at(
        &dir,
        StubSeed {
            users: two_remote_users(),
            posts: vec![],
        },
    );
    next.bootstrap().await?;
    assert_eq!(next.state().users().len(), 3);
    assert_eq!(next.state().users()[2].record.name, "Cy");
    Ok(())
}

#[tokio::test]
async fn test_delete_user_cascade_counts() -> Result<()> {
    let dir = TempDir::new()?;
    let mut service = service_at(
        &dir,
        StubSeed {
            users: vec![seed_user(1, "Ana"), seed_user(2, "Bo"), seed_user(3, "Cy")],
            posts: vec![
                seed_post(1, "a", 1),
                seed_post(2, "b", 1),
                seed_post(3, "c", 2),
                seed_post(4, "d", 3),
                seed_post(5, "e", 2),
            ],
        },
    );
    service.bootstrap().await?;

    service.dispatch(Action::DeleteUser { id: 1 }).await?;

    let stats = service.state().stats();
    assert_eq!(stats.users, 2);
    assert_eq!(stats.posts, 3);
    Ok(())
}

#[tokio::test]
async fn test_cascade_leaves_persisted_posts_untouched() -> Result<()> {
    let dir = TempDir::new()?;
    let mut service = service_at(
        &dir,
        StubSeed {
            users: two_remote_users(),
            posts: vec![],
        },
    );
    service.bootstrap().await?;

    // A locally created post owned by a remote user.
    service
        .dispatch(Action::AddPost(NewPost {
            title: "mine".to_string(),
            owner: "1".to_string(),
        }))
        .await?;
    assert_eq!(store_at(&dir).load_custom_posts().await?.len(), 1);

    service.dispatch(Action::DeleteUser { id: 1 }).await?;

    // Purged from the working set by the cascade...
    assert_eq!(service.state().posts().len(), 0);
    // ...but the persisted custom-post mirror is untouched.
    let persisted = store_at(&dir).load_custom_posts().await?;
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].title, "mine");
    Ok(())
}

#[tokio::test]
async fn test_edit_of_remote_user_is_session_only() -> Result<()> {
    let dir = TempDir::new()?;
    let mut service = service_at(
        &dir,
        StubSeed {
            users: two_remote_users(),
            posts: vec![],
        },
    );
    service.bootstrap().await?;

    service.dispatch(Action::BeginEditUser { id: 1 }).await?;
    service
        .dispatch(Action::EditUserDraft(UserPatch {
            name: Some("Anastasia".to_string()),
            ..Default::default()
        }))
        .await?;
    service.dispatch(Action::CommitEditUser).await?;

    assert_eq!(service.state().users()[0].record.name, "Anastasia");
    // Remote-origin entries are never written to the store, so the edit is
    // lost on reload.
    assert!(store_at(&dir).load_custom_users().await?.is_empty());

    let mut next = service_at(
        &dir,
        StubSeed {
            users: two_remote_users(),
            posts: vec![],
        },
    );
    next.bootstrap().await?;
    assert_eq!(next.state().users()[0].record.name, "Ana");
    Ok(())
}

#[tokio::test]
async fn test_edit_of_local_user_updates_store() -> Result<()> {
    let dir = TempDir::new()?;
    let mut service = service_at(
        &dir,
        StubSeed {
            users: two_remote_users(),
            posts: vec![],
        },
    );
    service.bootstrap().await?;
    service
        .dispatch(Action::AddUser(NewUser {
            name: "Cy".to_string(),
            username: "cy".to_string(),
            email: "cy@x.com".to_string(),
        }))
        .await?;

    service.dispatch(Action::BeginEditUser { id: 3 }).await?;
    service
        .dispatch(Action::EditUserDraft(UserPatch {
            email: Some("cy@elsewhere.com".to_string()),
            ..Default::default()
        }))
        .await?;
    service.dispatch(Action::CommitEditUser).await?;

    let persisted = store_at(&dir).load_custom_users().await?;
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].email, "cy@elsewhere.com");
    Ok(())
}

#[tokio::test]
async fn test_delete_post_updates_store() -> Result<()> {
    let dir = TempDir::new()?;
    let mut service = service_at(
        &dir,
        StubSeed {
            users: two_remote_users(),
            posts: vec![seed_post(1, "seeded", 1)],
        },
    );
    service.bootstrap().await?;
    service
        .dispatch(Action::AddPost(NewPost {
            title: "mine".to_string(),
            owner: "2".to_string(),
        }))
        .await?;
    assert_eq!(service.state().posts().len(), 2);

    service.dispatch(Action::DeletePost { id: 2 }).await?;

    assert_eq!(service.state().posts().len(), 1);
    assert!(store_at(&dir).load_custom_posts().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_store_round_trip() -> Result<()> {
    let dir = TempDir::new()?;
    let store = store_at(&dir);

    // An absent entry loads as an empty sequence.
    assert!(store.load_custom_users().await?.is_empty());

    let users = vec![seed_user(3, "Cy"), seed_user(4, "Dee")];
    store.save_custom_users(&users).await?;
    assert_eq!(store.load_custom_users().await?, users);

    // Saves overwrite the whole entry.
    store.save_custom_users(&users[..1]).await?;
    assert_eq!(store.load_custom_users().await?, users[..1].to_vec());
    Ok(())
}

#[tokio::test]
async fn test_malformed_entry_reports_error() -> Result<()> {
    let dir = TempDir::new()?;
    std::fs::write(dir.path().join("custom_users.json"), "not json at all")?;

    let result = store_at(&dir).load_custom_users().await;

    assert!(result.is_err());
    Ok(())
}

#[tokio::test]
async fn test_seed_failure_leaves_working_set_empty() -> Result<()> {
    let dir = TempDir::new()?;
    // Custom records exist in the store...
    store_at(&dir)
        .save_custom_users(&[seed_user(9, "Zed")])
        .await?;

    let mut service = service_at(&dir, FailingSeed);
    let result = service.bootstrap().await;

    // ...but a failed seed load means they are not merged on their own.
    assert!(matches!(result, Err(PanelError::Seed { .. })));
    let stats = service.state().stats();
    assert_eq!(stats.users, 0);
    assert_eq!(stats.posts, 0);
    Ok(())
}

#[tokio::test]
async fn test_validation_failure_touches_nothing() -> Result<()> {
    let dir = TempDir::new()?;
    let mut service = service_at(
        &dir,
        StubSeed {
            users: two_remote_users(),
            posts: vec![],
        },
    );
    service.bootstrap().await?;

    let result = service
        .dispatch(Action::AddUser(NewUser {
            name: "Cy".to_string(),
            username: "cy".to_string(),
            email: "   ".to_string(),
        }))
        .await;

    assert_eq!(result, Err(PanelError::EmptyField { field: "email" }));
    assert_eq!(service.state().users().len(), 2);
    assert!(store_at(&dir).load_custom_users().await?.is_empty());
    Ok(())
}
