//! WebSocket endpoint for the realtime channel. A session joins one board
//! room at a time; every event published to that room is forwarded down the
//! socket in publish order. Missed events are not replayed; a reconnecting
//! client re-fetches the full board.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use corkboard_core::{CorkboardError, CorkboardResult};
use corkboard_domain::{BoardEvent, BoardId, UserId};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    JoinBoardRoom { board_id: BoardId, user_id: UserId },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    JoinedBoardRoom { board_id: BoardId },
    JoinFailed { reason: String },
    Event { event: BoardEvent },
}

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Join is only granted to board owners and members; everyone else gets an
/// explicit failure event rather than silence.
pub async fn authorize_join(
    state: &AppState,
    board_id: BoardId,
    user_id: UserId,
) -> CorkboardResult<()> {
    let board = state
        .store
        .find_board(board_id)
        .await?
        .ok_or_else(|| CorkboardError::NotFound(format!("board {board_id} not found")))?;
    if !board.can_access(user_id) {
        return Err(CorkboardError::Forbidden(
            "you are not a member of this board".to_string(),
        ));
    }
    Ok(())
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sink, mut stream) = socket.split();

    // Writer task owns the sink; join replies and forwarded room events are
    // funneled through one ordered queue so per-connection FIFO holds.
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<ServerMessage>();
    let mut writer: JoinHandle<()> = tokio::spawn(async move {
        while let Some(message) = out_rx.recv().await {
            let text = match serde_json::to_string(&message) {
                Ok(text) => text,
                Err(err) => {
                    tracing::error!(error = %err, "failed to encode server message");
                    continue;
                }
            };
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    let mut forward: Option<JoinHandle<()>> = None;

    while let Some(Ok(message)) = stream.next().await {
        let text = match message {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };

        let join = match serde_json::from_str::<ClientMessage>(text.as_str()) {
            Ok(ClientMessage::JoinBoardRoom { board_id, user_id }) => (board_id, user_id),
            Err(err) => {
                let _ = out_tx.send(ServerMessage::JoinFailed {
                    reason: format!("unrecognized message: {err}"),
                });
                continue;
            }
        };

        let (board_id, user_id) = join;
        match authorize_join(&state, board_id, user_id).await {
            Ok(()) => {
                // Joining another board replaces the current subscription.
                if let Some(task) = forward.take() {
                    task.abort();
                }
                let room_rx = state.rooms.subscribe(board_id);
                forward = Some(spawn_forwarder(room_rx, out_tx.clone()));
                tracing::info!(%board_id, %user_id, "session joined board room");
                let _ = out_tx.send(ServerMessage::JoinedBoardRoom { board_id });
            }
            Err(err) => {
                tracing::warn!(%board_id, %user_id, error = %err, "board room join rejected");
                let _ = out_tx.send(ServerMessage::JoinFailed {
                    reason: err.to_string(),
                });
            }
        }
    }

    if let Some(task) = forward.take() {
        task.abort();
    }
    writer.abort();
    let _ = (&mut writer).await;
}

fn spawn_forwarder(
    mut room_rx: broadcast::Receiver<BoardEvent>,
    out_tx: mpsc::UnboundedSender<ServerMessage>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match room_rx.recv().await {
                Ok(event) => {
                    if out_tx.send(ServerMessage::Event { event }).is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    // Best-effort delivery: skip ahead, the client reconciles
                    // on its next full fetch.
                    tracing::warn!(skipped, "room subscriber lagged, events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
