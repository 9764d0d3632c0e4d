use std::sync::Arc;

use corkboard_core::{CorkboardError, CorkboardResult};
use corkboard_domain::{
    BoardEvent, BoardId, Invitation, InvitationId, InvitationStatus, UserId,
};
use corkboard_persistence::DocumentStore;
use serde::Deserialize;

use crate::realtime::RoomRegistry;
use crate::services::require_board_access;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvitationRequest {
    pub board_id: BoardId,
    pub invitee_id: UserId,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInvitationRequest {
    pub status: InvitationStatus,
}

#[derive(Clone)]
pub struct InvitationService {
    store: Arc<dyn DocumentStore>,
    rooms: RoomRegistry,
}

impl InvitationService {
    pub fn new(store: Arc<dyn DocumentStore>, rooms: RoomRegistry) -> Self {
        Self { store, rooms }
    }

    /// Invite a user to a board. The inviter must already belong to the
    /// board; the invitee must not, and must not have a pending invitation.
    pub async fn create_invitation(
        &self,
        user_id: UserId,
        request: CreateInvitationRequest,
    ) -> CorkboardResult<Invitation> {
        let board =
            require_board_access(self.store.as_ref(), request.board_id, user_id).await?;
        if board.can_access(request.invitee_id) {
            return Err(CorkboardError::Conflict(
                "user is already a member of this board".to_string(),
            ));
        }
        if self
            .store
            .find_pending_invitation(request.invitee_id, request.board_id)
            .await?
            .is_some()
        {
            return Err(CorkboardError::Conflict(
                "user already has a pending invitation to this board".to_string(),
            ));
        }

        let invitation = Invitation::new(user_id, request.invitee_id, request.board_id);
        self.store.insert_invitation(invitation).await
    }

    /// Invitations addressed to the caller, most recent first.
    pub async fn list_invitations(&self, user_id: UserId) -> CorkboardResult<Vec<Invitation>> {
        self.store.invitations_for_invitee(user_id).await
    }

    /// Resolve a pending invitation. Only the invitee may respond; accepting
    /// joins the board and announces the new member to its room.
    pub async fn respond(
        &self,
        user_id: UserId,
        invitation_id: InvitationId,
        request: UpdateInvitationRequest,
    ) -> CorkboardResult<Invitation> {
        let invitation = self
            .store
            .find_invitation(invitation_id)
            .await?
            .ok_or_else(|| {
                CorkboardError::NotFound(format!("invitation {invitation_id} not found"))
            })?;
        if invitation.invitee_id != user_id {
            return Err(CorkboardError::Forbidden(
                "only the invited user may respond to an invitation".to_string(),
            ));
        }

        if request.status == InvitationStatus::Accepted {
            let board = self
                .store
                .find_board(invitation.board_id)
                .await?
                .ok_or_else(|| {
                    CorkboardError::NotFound(format!("board {} not found", invitation.board_id))
                })?;
            if board.can_access(user_id) {
                return Err(CorkboardError::Conflict(
                    "you are already a member of this board".to_string(),
                ));
            }
        }

        let status = request.status;
        let invitation = self
            .store
            .modify_invitation(
                invitation_id,
                Box::new(move |invitation| invitation.transition(status)),
            )
            .await?;

        if invitation.status == InvitationStatus::Accepted {
            self.store
                .push_member(invitation.board_id, invitation.invitee_id)
                .await?;
            self.rooms.publish(BoardEvent::MemberJoined {
                board_id: invitation.board_id,
                user_id: invitation.invitee_id,
            });
        }
        Ok(invitation)
    }
}
