//! Ping services - creation, inbox, responses and the public calendar export

use super::calendar;
use crate::core::{AppError, AppState};
use crate::domain::{AuraError, Identity, Invite, Ping, PingDraft};
use crate::dtos::{CreatePingDTO, IcsQuery, RespondDTO};
use crate::entities::{self, User};
use crate::repositories::{Create, Read, ReadMany, Update, UpdateInvitationDTO};
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::Utc;
use futures::future::try_join_all;
use rand::{Rng, distributions::Alphanumeric};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

const ICS_SECRET_LEN: usize = 22;

fn generate_ics_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ICS_SECRET_LEN)
        .map(char::from)
        .collect()
}

/// Builds the ping aggregate from its row: the invitations in issue order and
/// the identities of the creator and every invitee.
async fn assemble(state: &AppState, row: entities::Ping) -> Result<Ping, AppError> {
    let invitations = state.invitation.find_by_ping(row.ping_id).await?;

    let mut user_ids: Vec<i64> = invitations.iter().map(|i| i.invitee_id).collect();
    user_ids.push(row.creator_id);

    let mut identities: HashMap<i64, Identity> = state
        .user
        .read_many(&user_ids)
        .await?
        .into_iter()
        .map(|user| (user.user_id, Identity::from(user)))
        .collect();

    let invites = invitations
        .iter()
        .filter_map(|invitation| {
            identities.get(&invitation.invitee_id).cloned().map(|invitee| Invite {
                invitee,
                status: invitation.status,
            })
        })
        .collect();

    let creator = identities
        .remove(&row.creator_id)
        .ok_or_else(|| AppError::internal_server_error("Ping creator is missing"))?;

    let ics_public_url = row.ics_public_path();
    Ok(Ping {
        id: row.ping_id,
        title: row.title,
        location: row.location,
        notes: row.notes,
        starts_at: row.starts_at,
        creator,
        invites,
        ics_public_url,
    })
}

async fn load_ping(state: &AppState, ping_id: i64) -> Result<Ping, AppError> {
    let row = state
        .ping
        .read(&ping_id)
        .await?
        .ok_or_else(|| AppError::not_found("Ping not found"))?;
    assemble(state, row).await
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.user_id, invitees = body.invitee_ids.len()))]
pub async fn create_ping(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Json(body): Json<PingDraft>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Creating ping");
    // 1. Load the organizer's confirmed friends
    // 2. Validate the draft; the first failing field is reported
    // 3. Store the ping and one pending invite per invitee, in submission order
    // 4. Answer CREATED with the assembled aggregate
    let friends: HashSet<i64> = state
        .friendship
        .friend_ids(current_user.user_id)
        .await?
        .into_iter()
        .collect();

    let new_ping = body
        .validate_at(Utc::now(), |id| friends.contains(&id))
        .map_err(|err| {
            warn!("Rejected ping draft: {}", err);
            AppError::from(err)
        })?;

    let row = state
        .ping
        .create(&CreatePingDTO {
            creator_id: current_user.user_id,
            ping: new_ping,
            ics_secret: generate_ics_secret(),
        })
        .await?;

    let ping = assemble(&state, row).await?;

    info!(ping_id = ping.id, "Ping created with {} invites", ping.invites.len());
    Ok((StatusCode::CREATED, Json(ping)))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn list_inbox(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> Result<Json<Vec<Ping>>, AppError> {
    debug!("Listing inbox");
    let rows = state.ping.find_for_user(current_user.user_id).await?;

    let state_ref = state.as_ref();
    let pings = try_join_all(rows.into_iter().map(|row| assemble(state_ref, row))).await?;

    info!("Inbox holds {} pings", pings.len());
    Ok(Json(pings))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn get_ping(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(ping_id): Path<i64>,
) -> Result<Json<Ping>, AppError> {
    debug!("Fetching ping");
    let ping = load_ping(&state, ping_id).await?;

    if !ping.is_participant(current_user.user_id) {
        warn!("User {} is not a participant of ping {}", current_user.user_id, ping_id);
        return Err(AppError::forbidden("You are not part of this ping"));
    }

    Ok(Json(ping))
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.user_id, status = ?body.status))]
pub async fn respond_to_ping(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(ping_id): Path<i64>,
    Json(body): Json<RespondDTO>,
) -> Result<Json<Ping>, AppError> {
    debug!("Responding to ping");
    // 1. Load the aggregate
    // 2. Only an invitee may answer; anyone else is FORBIDDEN
    // 3. Persist the new status, replacing any earlier answer
    let mut ping = load_ping(&state, ping_id).await?;

    ping.respond(current_user.user_id, body.status)
        .map_err(|err| match err {
            AuraError::InvalidInvitee => {
                warn!("User {} is not invited to ping {}", current_user.user_id, ping_id);
                AppError::forbidden("You are not invited to this ping")
            }
            other => AppError::from(other),
        })?;

    state
        .invitation
        .update(
            &(ping_id, current_user.user_id),
            &UpdateInvitationDTO {
                status: body.status.into(),
            },
        )
        .await?;

    info!("Response recorded");
    Ok(Json(ping))
}

#[instrument(skip(state, params))]
pub async fn export_ping_calendar(
    State(state): State<Arc<AppState>>,
    Path(ping_id): Path<i64>,
    Query(params): Query<IcsQuery>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Exporting ping calendar");
    // Unknown ping and wrong signature look the same from outside
    let row = match state.ping.read(&ping_id).await? {
        Some(row) if !params.sig.is_empty() && row.ics_secret == params.sig => row,
        _ => {
            warn!("Calendar export denied");
            return Err(AppError::not_found("Ping not found"));
        }
    };

    let ping = assemble(&state, row).await?;
    let disposition = format!("attachment; filename=\"{}\"", calendar::filename(&ping));

    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        calendar::render(&ping),
    ))
}
