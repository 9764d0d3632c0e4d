use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use corkboard_domain::{Card, CardId, CardUpdate, LabelId, LabelInput};

use crate::error::ApiResult;
use crate::routes::CurrentUser;
use crate::services::{CreateCardRequest, UpdateLabelRequest};
use crate::state::AppState;

pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(request): Json<CreateCardRequest>,
) -> ApiResult<(StatusCode, Json<Card>)> {
    let card = state.cards.create_card(user_id, request).await?;
    Ok((StatusCode::CREATED, Json(card)))
}

pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(card_id): Path<CardId>,
    Json(update): Json<CardUpdate>,
) -> ApiResult<Json<Card>> {
    let card = state.cards.update_card(user_id, card_id, update).await?;
    Ok(Json(card))
}

pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(card_id): Path<CardId>,
) -> ApiResult<StatusCode> {
    state.cards.delete_card(user_id, card_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_label(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(card_id): Path<CardId>,
    Json(input): Json<LabelInput>,
) -> ApiResult<(StatusCode, Json<Card>)> {
    let card = state.cards.add_label(user_id, card_id, input).await?;
    Ok((StatusCode::CREATED, Json(card)))
}

pub async fn update_label(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path((card_id, label_id)): Path<(CardId, LabelId)>,
    Json(request): Json<UpdateLabelRequest>,
) -> ApiResult<Json<Card>> {
    let card = state
        .cards
        .update_label(user_id, card_id, label_id, request)
        .await?;
    Ok(Json(card))
}

pub async fn remove_label(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path((card_id, label_id)): Path<(CardId, LabelId)>,
) -> ApiResult<Json<Card>> {
    let card = state.cards.remove_label(user_id, card_id, label_id).await?;
    Ok(Json(card))
}
