//! Domain error types.

use thiserror::Error;

/// Validation errors raised when building value objects from client input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("connection id must not be empty")]
    EmptyConnectionId,

    #[error("room id must not be empty")]
    EmptyRoomId,

    #[error("room id must be at most {max} characters")]
    RoomIdTooLong { max: usize },

    #[error("username must not be empty")]
    EmptyUsername,

    #[error("username must be at most {max} characters")]
    UsernameTooLong { max: usize },

    #[error("message body must not be empty")]
    EmptyMessageBody,

    #[error("message body must be at most {max} characters")]
    MessageBodyTooLong { max: usize },
}

/// Errors returned by a `RoomRepository`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),
}

/// Errors returned when pushing an event to a single connection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("connection '{0}' is not registered")]
    ConnectionNotFound(String),

    #[error("outbound queue of connection '{0}' is closed")]
    ChannelClosed(String),

    #[error("outbound queue of connection '{0}' is full")]
    ChannelFull(String),

    #[error("failed to encode event: {0}")]
    Encode(String),
}
