//! WebSocket frame DTOs.
//!
//! Every frame is a JSON object tagged by `type`; field names are camelCase.

use serde::{Deserialize, Serialize};

/// Frames sent by clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientEvent {
    JoinRoom {
        #[serde(rename = "roomId")]
        room_id: String,
    },
    LeaveRoom {
        #[serde(rename = "roomId")]
        room_id: String,
    },
    SendMessage {
        #[serde(rename = "roomId")]
        room_id: String,
        username: String,
        #[serde(alias = "message")]
        body: String,
    },
    Typing {
        #[serde(rename = "roomId")]
        room_id: String,
        username: String,
        #[serde(rename = "isTyping")]
        is_typing: bool,
    },
}

/// Frames sent by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerEvent {
    Connected {
        #[serde(rename = "connectionId")]
        connection_id: String,
    },
    ReceiveMessage {
        #[serde(rename = "roomId")]
        room_id: String,
        #[serde(rename = "senderId")]
        sender_id: String,
        username: String,
        body: String,
        /// ISO-8601 UTC
        timestamp: String,
    },
    UserJoined {
        #[serde(rename = "roomId")]
        room_id: String,
        #[serde(rename = "connectionId")]
        connection_id: String,
    },
    UserTyping {
        #[serde(rename = "roomId")]
        room_id: String,
        username: String,
        #[serde(rename = "connectionId")]
        connection_id: String,
        #[serde(rename = "isTyping")]
        is_typing: bool,
    },
    UserLeft {
        #[serde(rename = "roomId")]
        room_id: String,
        #[serde(rename = "connectionId")]
        connection_id: String,
    },
    Error {
        reason: String,
    },
}
