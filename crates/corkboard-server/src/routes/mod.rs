//! HTTP surface. The authenticated user id arrives via the `x-user-id`
//! header, installed upstream by the auth layer; everything else is JSON in
//! camelCase.

pub mod boards;
pub mod cards;
pub mod columns;
pub mod invitations;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::routing::{delete, get, post, put};
use axum::Router;
use corkboard_core::CorkboardError;
use corkboard_domain::UserId;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::error::ApiError;
use crate::realtime::ws_handler;
use crate::state::AppState;

/// The caller's identity. A missing or malformed header is a permission
/// error, not a validation error, so the client redirects to sign-in.
#[derive(Debug)]
pub struct CurrentUser(pub UserId);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                ApiError(CorkboardError::Forbidden(
                    "missing x-user-id header".to_string(),
                ))
            })?;
        let user_id = Uuid::parse_str(raw).map_err(|_| {
            ApiError(CorkboardError::Forbidden(
                "malformed x-user-id header".to_string(),
            ))
        })?;
        Ok(Self(user_id))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/v1/boards", post(boards::create).get(boards::list))
        .route("/v1/boards/supports/moving-cards", put(boards::move_card))
        .route(
            "/v1/boards/{id}",
            get(boards::details).put(boards::update).delete(boards::remove),
        )
        .route("/v1/columns", post(columns::create))
        .route(
            "/v1/columns/{id}",
            put(columns::update).delete(columns::remove),
        )
        .route("/v1/cards", post(cards::create))
        .route("/v1/cards/{id}", put(cards::update).delete(cards::remove))
        .route("/v1/cards/{id}/labels", post(cards::add_label))
        .route(
            "/v1/cards/{id}/labels/{label_id}",
            put(cards::update_label).delete(cards::remove_label),
        )
        .route(
            "/v1/invitations",
            post(invitations::create).get(invitations::list),
        )
        .route("/v1/invitations/{id}", put(invitations::respond))
        .route("/v1/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
