//! Domain layer for the relay server.
//!
//! This module contains the room/connection model and the interfaces the
//! use cases depend on. It knows nothing about WebSocket frames or JSON.

pub mod entity;
pub mod error;
pub mod event;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use entity::{Departure, JoinOutcome, Room, RoomDirectory};
pub use error::{MessagePushError, RepositoryError, ValueObjectError};
pub use event::{ClientCommand, RelayEvent};
pub use message_pusher::{DeliveryReport, MessagePusher, PusherChannel};
#[cfg(test)]
pub use message_pusher::MockMessagePusher;
pub use repository::RoomRepository;
pub use value_object::{ConnectionId, MessageBody, RoomId, Timestamp, Username};
