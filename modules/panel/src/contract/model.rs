use serde::{Deserialize, Serialize};

/// User record as held in the working set.
///
/// Serde derives live on the models themselves because the local store
/// persists records as JSON text in exactly this field layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub username: String,
    pub email: String,
}

/// Post record. `user_id` references a `User::id` but the reference is not
/// enforced at write time; orphans are tolerated and rendered with a
/// fallback label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub title: String,
    #[serde(rename = "userId")]
    pub user_id: u64,
}

/// Where a working-set entry came from. Remote entries are never written to
/// the local store; local entries are mirrored there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Remote,
    Local,
}

/// A working-set entry together with its origin tag. The tag is an
/// in-memory refinement only and is never serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sourced<T> {
    pub origin: Origin,
    pub record: T,
}

impl<T> Sourced<T> {
    pub fn remote(record: T) -> Self {
        Self {
            origin: Origin::Remote,
            record,
        }
    }

    pub fn local(record: T) -> Self {
        Self {
            origin: Origin::Local,
            record,
        }
    }
}

/// Data for creating a new user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub email: String,
}

/// Data for creating a new post. `owner` is the raw form-selector value and
/// is parsed to an integer by the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub owner: String,
}

/// Partial update applied to an in-flight user edit buffer
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
}

/// Partial update applied to an in-flight post edit buffer. `owner` is the
/// raw selector value, parsed when the patch is applied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub owner: Option<String>,
}

/// Transient scratch copy held while a user edit is in progress
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    pub id: u64,
    pub name: String,
    pub username: String,
    pub email: String,
}

/// Transient scratch copy held while a post edit is in progress
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub id: u64,
    pub title: String,
    pub user_id: u64,
}

impl From<&User> for UserDraft {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

impl From<&Post> for PostDraft {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            user_id: post.user_id,
        }
    }
}
