//! Inbound commands and outbound relay events, independent of the wire format.

use super::value_object::{ConnectionId, MessageBody, RoomId, Timestamp, Username};

/// A validated request from a connected client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    JoinRoom {
        room_id: RoomId,
    },
    LeaveRoom {
        room_id: RoomId,
    },
    SendMessage {
        room_id: RoomId,
        username: Username,
        body: MessageBody,
    },
    Typing {
        room_id: RoomId,
        username: Username,
        is_typing: bool,
    },
}

/// An event delivered to one or more connections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEvent {
    /// Sent once to a new connection so it learns its own id.
    Connected { connection_id: ConnectionId },
    MessageReceived {
        room_id: RoomId,
        sender_id: ConnectionId,
        username: Username,
        body: MessageBody,
        timestamp: Timestamp,
    },
    PeerJoined {
        room_id: RoomId,
        connection_id: ConnectionId,
    },
    PeerTyping {
        room_id: RoomId,
        username: Username,
        connection_id: ConnectionId,
        is_typing: bool,
    },
    PeerLeft {
        room_id: RoomId,
        connection_id: ConnectionId,
    },
    /// Rejection of an invalid inbound frame, sent to its origin only.
    Rejected { reason: String },
}
