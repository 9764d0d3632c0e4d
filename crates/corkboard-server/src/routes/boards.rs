use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use corkboard_domain::{Board, BoardId, BoardUpdate, Card, CardMovePayload};
use serde::Deserialize;

use crate::error::ApiResult;
use crate::routes::CurrentUser;
use crate::services::{BoardDetails, BoardListing, CreateBoardRequest};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBoardsQuery {
    pub page: Option<u32>,
    pub items_per_page: Option<u32>,
    pub q: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(request): Json<CreateBoardRequest>,
) -> ApiResult<(StatusCode, Json<Board>)> {
    let board = state.boards.create_board(user_id, request).await?;
    Ok((StatusCode::CREATED, Json(board)))
}

pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Query(query): Query<ListBoardsQuery>,
) -> ApiResult<Json<BoardListing>> {
    let listing = state
        .boards
        .list_boards(user_id, query.page, query.items_per_page, query.q)
        .await?;
    Ok(Json(listing))
}

pub async fn details(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(board_id): Path<BoardId>,
) -> ApiResult<Json<BoardDetails>> {
    let details = state.boards.board_details(user_id, board_id).await?;
    Ok(Json(details))
}

pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(board_id): Path<BoardId>,
    Json(update): Json<BoardUpdate>,
) -> ApiResult<Json<Board>> {
    let board = state.boards.update_board(user_id, board_id, update).await?;
    Ok(Json(board))
}

pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(board_id): Path<BoardId>,
) -> ApiResult<StatusCode> {
    state.boards.delete_board(user_id, board_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// The transactional cross-column move (`PUT /v1/boards/supports/moving-cards`).
pub async fn move_card(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(payload): Json<CardMovePayload>,
) -> ApiResult<Json<Card>> {
    let card = state.boards.move_card_across_columns(user_id, payload).await?;
    Ok(Json(card))
}
