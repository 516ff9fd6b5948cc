//! Room actions and the permissions they require

use serde::{Deserialize, Serialize};

use crate::bits::PermissionBit;
use crate::error::{Error, Result};
use crate::set::PermissionSet;

/// A user-facing action gated on resolved room permissions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    CreateMessage {
        #[serde(default)]
        has_attachments: bool,
    },
    GetMessage,
    GetMessages,
    DeleteMessage,
    StartTyping,
    PutReaction,
    DeleteOwnReaction,
    DeleteUserReaction,
    DeleteAllReactions,
    GetReactions,
}

impl Action {
    /// Every bit that must be present to perform the action
    pub fn required(self) -> PermissionSet {
        use PermissionBit::*;
        match self {
            Action::CreateMessage { has_attachments: false } => PermissionSet::from_bit(SendMessages),
            Action::CreateMessage { has_attachments: true } => PermissionSet::from_iter([SendMessages, AttachFiles]),
            Action::GetMessage | Action::GetMessages | Action::DeleteMessage => {
                PermissionSet::from_bit(ReadMessageHistory)
            }
            Action::StartTyping => PermissionSet::from_bit(SendMessages),
            Action::PutReaction
            | Action::DeleteOwnReaction
            | Action::DeleteUserReaction
            | Action::DeleteAllReactions
            | Action::GetReactions => PermissionSet::EMPTY,
        }
    }

    pub fn allowed(self, resolved: PermissionSet) -> bool {
        resolved.has(self.required())
    }

    /// `Ok` when `resolved` covers the action, otherwise the missing bits
    pub fn check(self, resolved: PermissionSet) -> Result<()> {
        let required = self.required();
        if resolved.has(required) {
            Ok(())
        } else {
            Err(Error::MissingPermissions { missing: required.subtract([resolved]) })
        }
    }
}
