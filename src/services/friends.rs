//! Friend services - the friendship state machine over HTTP
//!
//! Each transition is resolved from the caller's side: the stored directed
//! record is read, folded into a [`FriendshipStatus`], and the domain
//! transition decides whether the action is legal before anything is written.

use crate::core::{AppError, AppState};
use crate::domain::{AuraError, FriendAction, FriendshipStatus, Identity};
use crate::dtos::{CreateFriendshipDTO, FriendshipDTO};
use crate::entities::User;
use crate::repositories::{Create, Delete, Read, ReadMany};
use axum::{
    Extension,
    extract::{Json, Path, State},
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Checks `action` against the current status between `me` and `target`
/// and returns the status the action leads to.
async fn plan_transition(
    state: &AppState,
    me: i64,
    target: i64,
    action: FriendAction,
) -> Result<FriendshipStatus, AppError> {
    if me == target {
        warn!("Friendship action targeting self");
        return Err(AuraError::InvalidInvitee.into());
    }

    if state.user.read(&target).await?.is_none() {
        return Err(AppError::not_found("User not found"));
    }

    let current = state
        .friendship
        .read(&(me, target))
        .await?
        .map(|record| record.status_for(me))
        .unwrap_or_default();

    current.transition(action).map_err(|err| {
        warn!(from = current.as_str(), ?action, "Rejected friendship transition: {}", err);
        AppError::from(err)
    })
}

/// Loads identities for `ids`, preserving the order of `ids`
async fn identities_in_order(state: &AppState, ids: &[i64]) -> Result<Vec<Identity>, AppError> {
    let mut by_id: HashMap<i64, User> = state
        .user
        .read_many(ids)
        .await?
        .into_iter()
        .map(|user| (user.user_id, user))
        .collect();

    Ok(ids
        .iter()
        .filter_map(|id| by_id.remove(id))
        .map(Identity::from)
        .collect())
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn request_friend(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(target_id): Path<i64>,
) -> Result<Json<FriendshipDTO>, AppError> {
    debug!("Sending friend request to {}", target_id);
    let next = plan_transition(&state, current_user.user_id, target_id, FriendAction::Request).await?;

    state
        .friendship
        .create(&CreateFriendshipDTO {
            requester_id: current_user.user_id,
            addressee_id: target_id,
        })
        .await
        .map_err(|err| match err {
            // The other side's request landed between the read and the insert
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                warn!("Concurrent friend request with {}", target_id);
                AppError::from(AuraError::AlreadyRequested)
            }
            other => AppError::from(other),
        })?;

    info!("Friend request sent to {}", target_id);
    Ok(Json(FriendshipDTO { status: next }))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn approve_friend(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(requester_id): Path<i64>,
) -> Result<Json<FriendshipDTO>, AppError> {
    debug!("Approving friend request from {}", requester_id);
    let next = plan_transition(&state, current_user.user_id, requester_id, FriendAction::Approve).await?;

    state
        .friendship
        .accept(requester_id, current_user.user_id)
        .await
        .map_err(|err| match err {
            sqlx::Error::RowNotFound => AppError::from(AuraError::NoSuchRequest),
            other => AppError::from(other),
        })?;

    info!("Friend request from {} approved", requester_id);
    Ok(Json(FriendshipDTO { status: next }))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn decline_friend(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(requester_id): Path<i64>,
) -> Result<Json<FriendshipDTO>, AppError> {
    debug!("Declining friend request from {}", requester_id);
    let next = plan_transition(&state, current_user.user_id, requester_id, FriendAction::Decline).await?;

    // Deleting the record lets either side request again right away
    state
        .friendship
        .delete(&(current_user.user_id, requester_id))
        .await?;

    info!("Friend request from {} declined", requester_id);
    Ok(Json(FriendshipDTO { status: next }))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn remove_friend(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(friend_id): Path<i64>,
) -> Result<Json<FriendshipDTO>, AppError> {
    debug!("Removing friend {}", friend_id);
    let next = plan_transition(&state, current_user.user_id, friend_id, FriendAction::Remove).await?;

    state
        .friendship
        .delete(&(current_user.user_id, friend_id))
        .await?;

    info!("Friend {} removed", friend_id);
    Ok(Json(FriendshipDTO { status: next }))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn list_incoming_requests(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> Result<Json<Vec<Identity>>, AppError> {
    debug!("Listing incoming friend requests");
    let requester_ids = state
        .friendship
        .incoming_requester_ids(current_user.user_id)
        .await?;

    let identities = identities_in_order(&state, &requester_ids).await?;

    info!("Found {} incoming requests", identities.len());
    Ok(Json(identities))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn list_friends(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> Result<Json<Vec<Identity>>, AppError> {
    debug!("Listing confirmed friends");
    let friend_ids = state.friendship.friend_ids(current_user.user_id).await?;

    let mut friends = identities_in_order(&state, &friend_ids).await?;
    friends.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

    info!("Found {} friends", friends.len());
    Ok(Json(friends))
}
