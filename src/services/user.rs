//! User services - search and profile lookup

use crate::core::{AppError, AppState};
use crate::domain::{AuraError, Field, Identity, rank_search};
use crate::dtos::UserSearchQuery;
use crate::entities::User;
use crate::repositories::Read;
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id, q = %params.q))]
pub async fn search_users(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Query(params): Query<UserSearchQuery>,
) -> Result<Json<Vec<Identity>>, AppError> {
    debug!("Searching users");
    // 1. A blank query is a validation error on `q`
    // 2. Fetch candidates matching anywhere in name or email, caller excluded
    // 3. Rank exact, then prefix, then substring matches and cap the result
    if params.q.trim().is_empty() {
        return Err(AuraError::validation(Field::Query).into());
    }

    let candidates: Vec<Identity> = state
        .user
        .search_candidates(&params.q, current_user.user_id)
        .await?
        .into_iter()
        .map(Identity::from)
        .collect();

    let ranked = rank_search(candidates, &params.q, current_user.user_id)
        .ok_or(AuraError::validation(Field::Query))?;

    info!("Search returned {} users", ranked.len());
    Ok(Json(ranked))
}

#[instrument(skip(state))]
pub async fn get_user_by_id(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<Identity>, AppError> {
    debug!("Fetching user profile");
    let user = state
        .user
        .read(&user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(Identity::from(user)))
}
