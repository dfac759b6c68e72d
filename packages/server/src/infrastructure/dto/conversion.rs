//! Conversion logic between DTOs and domain types.

use crate::domain::{
    ClientCommand, MessageBody, RelayEvent, Room, RoomId, Username, ValueObjectError,
};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// DTO → Domain
// ========================================

impl TryFrom<dto::ClientEvent> for ClientCommand {
    type Error = ValueObjectError;

    fn try_from(event: dto::ClientEvent) -> Result<Self, Self::Error> {
        let command = match event {
            dto::ClientEvent::JoinRoom { room_id } => ClientCommand::JoinRoom {
                room_id: RoomId::try_from(room_id)?,
            },
            dto::ClientEvent::LeaveRoom { room_id } => ClientCommand::LeaveRoom {
                room_id: RoomId::try_from(room_id)?,
            },
            dto::ClientEvent::SendMessage {
                room_id,
                username,
                body,
            } => ClientCommand::SendMessage {
                room_id: RoomId::try_from(room_id)?,
                username: Username::try_from(username)?,
                body: MessageBody::try_from(body)?,
            },
            dto::ClientEvent::Typing {
                room_id,
                username,
                is_typing,
            } => ClientCommand::Typing {
                room_id: RoomId::try_from(room_id)?,
                username: Username::try_from(username)?,
                is_typing,
            },
        };
        Ok(command)
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<&RelayEvent> for dto::ServerEvent {
    fn from(event: &RelayEvent) -> Self {
        match event {
            RelayEvent::Connected { connection_id } => Self::Connected {
                connection_id: connection_id.as_str().to_string(),
            },
            RelayEvent::MessageReceived {
                room_id,
                sender_id,
                username,
                body,
                timestamp,
            } => Self::ReceiveMessage {
                room_id: room_id.as_str().to_string(),
                sender_id: sender_id.as_str().to_string(),
                username: username.as_str().to_string(),
                body: body.as_str().to_string(),
                timestamp: timestamp.to_rfc3339(),
            },
            RelayEvent::PeerJoined {
                room_id,
                connection_id,
            } => Self::UserJoined {
                room_id: room_id.as_str().to_string(),
                connection_id: connection_id.as_str().to_string(),
            },
            RelayEvent::PeerTyping {
                room_id,
                username,
                connection_id,
                is_typing,
            } => Self::UserTyping {
                room_id: room_id.as_str().to_string(),
                username: username.as_str().to_string(),
                connection_id: connection_id.as_str().to_string(),
                is_typing: *is_typing,
            },
            RelayEvent::PeerLeft {
                room_id,
                connection_id,
            } => Self::UserLeft {
                room_id: room_id.as_str().to_string(),
                connection_id: connection_id.as_str().to_string(),
            },
            RelayEvent::Rejected { reason } => Self::Error {
                reason: reason.clone(),
            },
        }
    }
}

impl From<&Room> for http::RoomSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            member_count: room.member_count(),
            typing_count: room.typing_count(),
            created_at: room.created_at.to_rfc3339(),
        }
    }
}

impl From<&Room> for http::RoomDetailDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            members: room
                .member_ids()
                .into_iter()
                .map(|id| id.into_string())
                .collect(),
            typing: room
                .typing_users()
                .into_iter()
                .map(|(connection_id, username)| http::TypingUserDto {
                    connection_id: connection_id.into_string(),
                    username: username.into_string(),
                })
                .collect(),
            created_at: room.created_at.to_rfc3339(),
        }
    }
}
