//! UseCase layer: one struct per operation on the relay.

mod broadcast_message;
mod broadcast_typing;
mod connect_connection;
mod departure;
mod disconnect_connection;
mod error;
mod get_room_detail;
mod get_rooms;
mod join_room;
mod leave_room;

#[cfg(test)]
pub(crate) mod test_support;

pub use broadcast_message::BroadcastMessageUseCase;
pub use broadcast_typing::BroadcastTypingUseCase;
pub use connect_connection::ConnectUseCase;
pub use departure::DepartureNotifier;
pub use disconnect_connection::DisconnectUseCase;
pub use error::{ConnectError, GetRoomDetailError};
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
