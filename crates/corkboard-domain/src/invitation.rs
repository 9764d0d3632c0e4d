use chrono::{DateTime, Utc};
use corkboard_core::{CorkboardError, CorkboardResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::board::{BoardId, UserId};

pub type InvitationId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    pub id: InvitationId,
    pub inviter_id: UserId,
    pub invitee_id: UserId,
    pub board_id: BoardId,
    pub status: InvitationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invitation {
    pub fn new(inviter_id: UserId, invitee_id: UserId, board_id: BoardId) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            inviter_id,
            invitee_id,
            board_id,
            status: InvitationStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == InvitationStatus::Pending
    }

    /// Pending → Accepted | Rejected. Non-pending invitations are terminal.
    pub fn transition(&mut self, status: InvitationStatus) -> CorkboardResult<()> {
        if !self.is_pending() {
            return Err(CorkboardError::Conflict(format!(
                "invitation {} has already been resolved",
                self.id
            )));
        }
        if status == InvitationStatus::Pending {
            return Err(CorkboardError::Validation(
                "status: cannot transition back to PENDING".to_string(),
            ));
        }
        self.status = status;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_invitation() -> Invitation {
        Invitation::new(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4())
    }

    #[test]
    fn test_accept_then_reject_is_terminal() {
        let mut invitation = test_invitation();
        invitation.transition(InvitationStatus::Accepted).unwrap();

        let err = invitation
            .transition(InvitationStatus::Rejected)
            .unwrap_err();
        assert!(matches!(err, CorkboardError::Conflict(_)));
        assert_eq!(invitation.status, InvitationStatus::Accepted);
    }

    #[test]
    fn test_cannot_transition_to_pending() {
        let mut invitation = test_invitation();
        let err = invitation.transition(InvitationStatus::Pending).unwrap_err();
        assert!(matches!(err, CorkboardError::Validation(_)));
    }

    #[test]
    fn test_status_wire_format_is_screaming() {
        let json = serde_json::to_string(&InvitationStatus::Pending).unwrap();
        assert_eq!(json, "\"PENDING\"");
    }
}
