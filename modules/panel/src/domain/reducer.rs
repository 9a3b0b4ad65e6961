//! Pure CRUD reducer over the working set.
//!
//! `apply` mutates only the in-memory working set and reports the
//! local-store mirror updates as [`StoreSync`] effects; executing them is
//! the service's job. This keeps every mutation testable without I/O.

use crate::contract::error::{EntityKind, PanelError};
use crate::contract::model::{NewPost, NewUser, Post, PostPatch, Sourced, User, UserPatch};
use crate::domain::state::WorkingSet;

/// A single user-initiated mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    AddUser(NewUser),
    BeginEditUser { id: u64 },
    EditUserDraft(UserPatch),
    CommitEditUser,
    CancelEditUser,
    DeleteUser { id: u64 },

    AddPost(NewPost),
    BeginEditPost { id: u64 },
    EditPostDraft(PostPatch),
    CommitEditPost,
    CancelEditPost,
    DeletePost { id: u64 },
}

/// Local-store mirror update emitted by the reducer.
///
/// Each variant is executed as a read-modify-write over the corresponding
/// custom collection: load, transform, save-overwrite. Replace and Remove
/// are id-matched and match nothing for remote-origin entries. There is no
/// cascade variant: deleting a user purges owned posts from the working set
/// only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreSync {
    AppendUser(User),
    ReplaceUser(User),
    RemoveUser { id: u64 },
    AppendPost(Post),
    ReplacePost(Post),
    RemovePost { id: u64 },
}

/// Apply one action to the working set, returning the store effects to run.
pub fn apply(set: &mut WorkingSet, action: Action) -> Result<Vec<StoreSync>, PanelError> {
    match action {
        Action::AddUser(new_user) => add_user(set, new_user),
        Action::BeginEditUser { id } => begin_edit_user(set, id),
        Action::EditUserDraft(patch) => edit_user_draft(set, patch),
        Action::CommitEditUser => commit_edit_user(set),
        Action::CancelEditUser => {
            set.user_draft = None;
            Ok(Vec::new())
        }
        Action::DeleteUser { id } => delete_user(set, id),

        Action::AddPost(new_post) => add_post(set, new_post),
        Action::BeginEditPost { id } => begin_edit_post(set, id),
        Action::EditPostDraft(patch) => edit_post_draft(set, patch),
        Action::CommitEditPost => commit_edit_post(set),
        Action::CancelEditPost => {
            set.post_draft = None;
            Ok(Vec::new())
        }
        Action::DeletePost { id } => delete_post(set, id),
    }
}

// --- user actions ---

fn add_user(set: &mut WorkingSet, new_user: NewUser) -> Result<Vec<StoreSync>, PanelError> {
    require_non_empty("name", &new_user.name)?;
    require_non_empty("username", &new_user.username)?;
    require_non_empty("email", &new_user.email)?;

    let user = User {
        id: set.next_user_id(),
        name: new_user.name,
        username: new_user.username,
        email: new_user.email,
    };
    set.users.push(Sourced::local(user.clone()));
    Ok(vec![StoreSync::AppendUser(user)])
}

fn begin_edit_user(set: &mut WorkingSet, id: u64) -> Result<Vec<StoreSync>, PanelError> {
    let user = set
        .users
        .iter()
        .find(|u| u.record.id == id)
        .ok_or_else(|| PanelError::user_not_found(id))?;
    set.user_draft = Some((&user.record).into());
    Ok(Vec::new())
}

fn edit_user_draft(set: &mut WorkingSet, patch: UserPatch) -> Result<Vec<StoreSync>, PanelError> {
    let draft = set
        .user_draft
        .as_mut()
        .ok_or_else(|| PanelError::no_edit(EntityKind::User))?;
    if let Some(name) = patch.name {
        draft.name = name;
    }
    if let Some(username) = patch.username {
        draft.username = username;
    }
    if let Some(email) = patch.email {
        draft.email = email;
    }
    Ok(Vec::new())
}

fn commit_edit_user(set: &mut WorkingSet) -> Result<Vec<StoreSync>, PanelError> {
    let draft = set
        .user_draft
        .take()
        .ok_or_else(|| PanelError::no_edit(EntityKind::User))?;

    let user = User {
        id: draft.id,
        name: draft.name,
        username: draft.username,
        email: draft.email,
    };
    // Id-matched replacement; origin tag and position are preserved. An id
    // that matches nothing leaves the working set untouched, and the store
    // sync is attempted regardless.
    if let Some(entry) = set.users.iter_mut().find(|u| u.record.id == user.id) {
        entry.record = user.clone();
    }
    Ok(vec![StoreSync::ReplaceUser(user)])
}

fn delete_user(set: &mut WorkingSet, id: u64) -> Result<Vec<StoreSync>, PanelError> {
    if !set.users.iter().any(|u| u.record.id == id) {
        return Err(PanelError::user_not_found(id));
    }
    set.users.retain(|u| u.record.id != id);
    // Soft cascade: owned posts leave the working set for this session,
    // but the persisted custom-post collection keeps them.
    set.posts.retain(|p| p.record.user_id != id);
    Ok(vec![StoreSync::RemoveUser { id }])
}

// --- post actions ---

fn add_post(set: &mut WorkingSet, new_post: NewPost) -> Result<Vec<StoreSync>, PanelError> {
    require_non_empty("title", &new_post.title)?;
    require_non_empty("owner", &new_post.owner)?;
    let user_id = parse_owner(&new_post.owner)?;

    // The owner id is not checked to exist; orphaned references are
    // tolerated and rendered with the fallback label.
    let post = Post {
        id: set.next_post_id(),
        title: new_post.title,
        user_id,
    };
    set.posts.push(Sourced::local(post.clone()));
    Ok(vec![StoreSync::AppendPost(post)])
}

fn begin_edit_post(set: &mut WorkingSet, id: u64) -> Result<Vec<StoreSync>, PanelError> {
    let post = set
        .posts
        .iter()
        .find(|p| p.record.id == id)
        .ok_or_else(|| PanelError::post_not_found(id))?;
    set.post_draft = Some((&post.record).into());
    Ok(Vec::new())
}

fn edit_post_draft(set: &mut WorkingSet, patch: PostPatch) -> Result<Vec<StoreSync>, PanelError> {
    let owner = patch.owner.as_deref().map(parse_owner).transpose()?;
    let draft = set
        .post_draft
        .as_mut()
        .ok_or_else(|| PanelError::no_edit(EntityKind::Post))?;
    if let Some(title) = patch.title {
        draft.title = title;
    }
    if let Some(user_id) = owner {
        draft.user_id = user_id;
    }
    Ok(Vec::new())
}

fn commit_edit_post(set: &mut WorkingSet) -> Result<Vec<StoreSync>, PanelError> {
    let draft = set
        .post_draft
        .take()
        .ok_or_else(|| PanelError::no_edit(EntityKind::Post))?;

    let post = Post {
        id: draft.id,
        title: draft.title,
        user_id: draft.user_id,
    };
    if let Some(entry) = set.posts.iter_mut().find(|p| p.record.id == post.id) {
        entry.record = post.clone();
    }
    Ok(vec![StoreSync::ReplacePost(post)])
}

fn delete_post(set: &mut WorkingSet, id: u64) -> Result<Vec<StoreSync>, PanelError> {
    if !set.posts.iter().any(|p| p.record.id == id) {
        return Err(PanelError::post_not_found(id));
    }
    set.posts.retain(|p| p.record.id != id);
    Ok(vec![StoreSync::RemovePost { id }])
}

// --- validation helpers ---

fn require_non_empty(field: &'static str, value: &str) -> Result<(), PanelError> {
    if value.trim().is_empty() {
        return Err(PanelError::empty_field(field));
    }
    Ok(())
}

fn parse_owner(value: &str) -> Result<u64, PanelError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| PanelError::invalid_owner(value))
}
