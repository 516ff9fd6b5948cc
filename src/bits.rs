//! Permission bit positions of the platform
//!
//! Positions are wire-stable: a bit index is never reused for another meaning,
//! so gaps in the table (15..=19, 21..=29, 44..=59) are intentional.

use std::fmt;
use std::str::FromStr;

use crate::error::CatalogError;

/// A single named permission, identified by its fixed bit index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum PermissionBit {
    /// Grants all permissions and bypasses every overwrite.
    Administrator = 0,
    /// Allows a user to create invites for a party.
    CreateInvite = 1,
    KickMembers = 2,
    BanMembers = 3,
    ViewAuditLog = 4,
    ViewStatistics = 5,
    ManageParty = 6,
    ManageRooms = 7,
    ManageNicknames = 8,
    ManageRoles = 9,
    ManageWebhooks = 10,
    /// Allows members to add or remove custom emoji, stickers or sounds.
    ManageExpressions = 11,
    MoveMembers = 12,
    ChangeNickname = 13,
    ManagePerms = 14,
    DefaultOnly = 20,
    ViewRoom = 30,
    ReadMessageHistory = 31,
    SendMessages = 32,
    /// Allows a user to manage messages in a room, including reactions.
    ManageMessages = 33,
    MuteMembers = 34,
    DeafenMembers = 35,
    MentionEveryone = 36,
    UseExternalEmotes = 37,
    AddReactions = 38,
    EmbedLinks = 39,
    AttachFiles = 40,
    UseSlashCommands = 41,
    SendTtsMessages = 42,
    /// Allows adding new attachments to existing messages through edits.
    EditNewAttachment = 43,
    /// Allows a user to broadcast a stream to a room.
    Stream = 60,
    /// Allows a user to connect and watch/listen to streams in a room.
    Connect = 61,
    /// Allows a user to speak in a room without broadcasting a stream.
    Speak = 62,
    /// Allows a user to acquire priority speaker.
    PrioritySpeaker = 63,
    /// Occupies the top half of the range so wide values get exercised.
    Test = 127,
}

impl PermissionBit {
    /// Every defined bit, in index order
    pub const ALL: &'static [PermissionBit] = &[
        Self::Administrator,
        Self::CreateInvite,
        Self::KickMembers,
        Self::BanMembers,
        Self::ViewAuditLog,
        Self::ViewStatistics,
        Self::ManageParty,
        Self::ManageRooms,
        Self::ManageNicknames,
        Self::ManageRoles,
        Self::ManageWebhooks,
        Self::ManageExpressions,
        Self::MoveMembers,
        Self::ChangeNickname,
        Self::ManagePerms,
        Self::DefaultOnly,
        Self::ViewRoom,
        Self::ReadMessageHistory,
        Self::SendMessages,
        Self::ManageMessages,
        Self::MuteMembers,
        Self::DeafenMembers,
        Self::MentionEveryone,
        Self::UseExternalEmotes,
        Self::AddReactions,
        Self::EmbedLinks,
        Self::AttachFiles,
        Self::UseSlashCommands,
        Self::SendTtsMessages,
        Self::EditNewAttachment,
        Self::Stream,
        Self::Connect,
        Self::Speak,
        Self::PrioritySpeaker,
        Self::Test,
    ];

    /// Bits every new party member is granted
    pub const DEFAULT: &'static [PermissionBit] = &[
        Self::ChangeNickname,
        Self::ViewRoom,
        Self::ReadMessageHistory,
        Self::SendMessages,
        Self::UseExternalEmotes,
        Self::AddReactions,
        Self::EmbedLinks,
        Self::AttachFiles,
        Self::SendTtsMessages,
        Self::Connect,
        Self::Speak,
    ];

    #[inline]
    pub const fn index(self) -> u32 {
        self as u32
    }

    /// Stable symbolic name, as used on the wire and in catalog configs
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Administrator => "ADMINISTRATOR",
            Self::CreateInvite => "CREATE_INVITE",
            Self::KickMembers => "KICK_MEMBERS",
            Self::BanMembers => "BAN_MEMBERS",
            Self::ViewAuditLog => "VIEW_AUDIT_LOG",
            Self::ViewStatistics => "VIEW_STATISTICS",
            Self::ManageParty => "MANAGE_PARTY",
            Self::ManageRooms => "MANAGE_ROOMS",
            Self::ManageNicknames => "MANAGE_NICKNAMES",
            Self::ManageRoles => "MANAGE_ROLES",
            Self::ManageWebhooks => "MANAGE_WEBHOOKS",
            Self::ManageExpressions => "MANAGE_EXPRESSIONS",
            Self::MoveMembers => "MOVE_MEMBERS",
            Self::ChangeNickname => "CHANGE_NICKNAME",
            Self::ManagePerms => "MANAGE_PERMS",
            Self::DefaultOnly => "DEFAULT_ONLY",
            Self::ViewRoom => "VIEW_ROOM",
            Self::ReadMessageHistory => "READ_MESSAGE_HISTORY",
            Self::SendMessages => "SEND_MESSAGES",
            Self::ManageMessages => "MANAGE_MESSAGES",
            Self::MuteMembers => "MUTE_MEMBERS",
            Self::DeafenMembers => "DEAFEN_MEMBERS",
            Self::MentionEveryone => "MENTION_EVERYONE",
            Self::UseExternalEmotes => "USE_EXTERNAL_EMOTES",
            Self::AddReactions => "ADD_REACTIONS",
            Self::EmbedLinks => "EMBED_LINKS",
            Self::AttachFiles => "ATTACH_FILES",
            Self::UseSlashCommands => "USE_SLASH_COMMANDS",
            Self::SendTtsMessages => "SEND_TTS_MESSAGES",
            Self::EditNewAttachment => "EDIT_NEW_ATTACHMENT",
            Self::Stream => "STREAM",
            Self::Connect => "CONNECT",
            Self::Speak => "SPEAK",
            Self::PrioritySpeaker => "PRIORITY_SPEAKER",
            Self::Test => "TEST",
        }
    }

    /// Look up a bit by its index
    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|b| b.index() == index)
    }
}

impl fmt::Display for PermissionBit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionBit {
    type Err = CatalogError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|b| b.as_str() == name)
            .ok_or_else(|| CatalogError::UnknownName(name.to_string()))
    }
}
