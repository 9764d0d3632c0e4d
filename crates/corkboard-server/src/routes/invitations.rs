use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use corkboard_domain::{Invitation, InvitationId};

use crate::error::ApiResult;
use crate::routes::CurrentUser;
use crate::services::{CreateInvitationRequest, UpdateInvitationRequest};
use crate::state::AppState;

pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(request): Json<CreateInvitationRequest>,
) -> ApiResult<(StatusCode, Json<Invitation>)> {
    let invitation = state
        .invitations
        .create_invitation(user_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(invitation)))
}

pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> ApiResult<Json<Vec<Invitation>>> {
    let invitations = state.invitations.list_invitations(user_id).await?;
    Ok(Json(invitations))
}

pub async fn respond(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(invitation_id): Path<InvitationId>,
    Json(request): Json<UpdateInvitationRequest>,
) -> ApiResult<Json<Invitation>> {
    let invitation = state
        .invitations
        .respond(user_id, invitation_id, request)
        .await?;
    Ok(Json(invitation))
}
