use crate::contract::model::{Post, PostDraft, Sourced, User, UserDraft};

/// Fallback label rendered for a post whose owner id matches no user in the
/// working set.
pub const UNKNOWN_OWNER: &str = "unknown";

/// Working-set counts, as rendered in the header stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub users: usize,
    pub posts: usize,
}

/// The in-memory working set: every currently known entity, remote-origin
/// entries first, plus at most one in-flight edit buffer per entity kind.
///
/// The working set is the single source of truth for rendering. It is owned
/// by exactly one caller for the lifetime of a session; mutation happens only
/// through [`crate::domain::reducer::apply`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingSet {
    pub(crate) users: Vec<Sourced<User>>,
    pub(crate) posts: Vec<Sourced<Post>>,
    pub(crate) user_draft: Option<UserDraft>,
    pub(crate) post_draft: Option<PostDraft>,
}

impl WorkingSet {
    /// Merge the remote seed collections with the locally persisted custom
    /// collections into the initial working set.
    ///
    /// The merge is an ordered concatenation, remote entries before local
    /// ones, independently per entity kind. No de-duplication by id, no
    /// sort; an id collision between remote and local entries is left as-is.
    pub fn reconcile(
        remote_users: Vec<User>,
        remote_posts: Vec<Post>,
        custom_users: Vec<User>,
        custom_posts: Vec<Post>,
    ) -> Self {
        let users = remote_users
            .into_iter()
            .map(Sourced::remote)
            .chain(custom_users.into_iter().map(Sourced::local))
            .collect();
        let posts = remote_posts
            .into_iter()
            .map(Sourced::remote)
            .chain(custom_posts.into_iter().map(Sourced::local))
            .collect();

        Self {
            users,
            posts,
            user_draft: None,
            post_draft: None,
        }
    }

    pub fn users(&self) -> &[Sourced<User>] {
        &self.users
    }

    pub fn posts(&self) -> &[Sourced<Post>] {
        &self.posts
    }

    pub fn user_draft(&self) -> Option<&UserDraft> {
        self.user_draft.as_ref()
    }

    pub fn post_draft(&self) -> Option<&PostDraft> {
        self.post_draft.as_ref()
    }

    pub fn stats(&self) -> Stats {
        Stats {
            users: self.users.len(),
            posts: self.posts.len(),
        }
    }

    /// Number of posts owned by the given user id.
    pub fn post_count_for(&self, user_id: u64) -> usize {
        self.posts
            .iter()
            .filter(|p| p.record.user_id == user_id)
            .count()
    }

    /// Display name for a post's owning user, or [`UNKNOWN_OWNER`] when the
    /// referenced user is absent from the working set.
    pub fn owner_name_for(&self, user_id: u64) -> &str {
        self.users
            .iter()
            .find(|u| u.record.id == user_id)
            .map(|u| u.record.name.as_str())
            .unwrap_or(UNKNOWN_OWNER)
    }

    /// Next user identifier: max over the full in-memory collection, or 0
    /// when empty, plus one. Session-scoped; can collide with remote ids
    /// fetched in a later session.
    pub(crate) fn next_user_id(&self) -> u64 {
        self.users
            .iter()
            .map(|u| u.record.id)
            .max()
            .unwrap_or(0)
            + 1
    }

    /// Next post identifier, same rule scoped to the post collection.
    pub(crate) fn next_post_id(&self) -> u64 {
        self.posts
            .iter()
            .map(|p| p.record.id)
            .max()
            .unwrap_or(0)
            + 1
    }
}
