use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use corkboard_domain::{Column, ColumnId, ColumnUpdate};

use crate::error::ApiResult;
use crate::routes::CurrentUser;
use crate::services::CreateColumnRequest;
use crate::state::AppState;

pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(request): Json<CreateColumnRequest>,
) -> ApiResult<(StatusCode, Json<Column>)> {
    let column = state.columns.create_column(user_id, request).await?;
    Ok((StatusCode::CREATED, Json(column)))
}

pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(column_id): Path<ColumnId>,
    Json(update): Json<ColumnUpdate>,
) -> ApiResult<Json<Column>> {
    let column = state
        .columns
        .update_column(user_id, column_id, update)
        .await?;
    Ok(Json(column))
}

pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(column_id): Path<ColumnId>,
) -> ApiResult<StatusCode> {
    state.columns.delete_column(user_id, column_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
