//! Shared application state.

use std::sync::Arc;

use roomcast_shared::time::Clock;

use crate::{
    domain::{MessagePusher, RoomRepository},
    usecase::{
        BroadcastMessageUseCase, BroadcastTypingUseCase, ConnectUseCase, DepartureNotifier,
        DisconnectUseCase, GetRoomDetailUseCase, GetRoomsUseCase, JoinRoomUseCase,
        LeaveRoomUseCase,
    },
};

use super::config::ServerConfig;

/// Shared application state
pub struct AppState {
    pub connect_usecase: ConnectUseCase,
    pub disconnect_usecase: DisconnectUseCase,
    pub join_room_usecase: JoinRoomUseCase,
    pub leave_room_usecase: LeaveRoomUseCase,
    pub broadcast_message_usecase: BroadcastMessageUseCase,
    pub broadcast_typing_usecase: BroadcastTypingUseCase,
    pub get_rooms_usecase: GetRoomsUseCase,
    pub get_room_detail_usecase: GetRoomDetailUseCase,
    /// MessagePusher（不正なフレームへの応答に使用）
    pub message_pusher: Arc<dyn MessagePusher>,
    /// Depth of each connection's outbound queue (at least 1)
    pub outbound_buffer: usize,
}

impl AppState {
    /// Wire every use case on top of one repository and one pusher.
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        config: &ServerConfig,
    ) -> Self {
        let notifier = Arc::new(DepartureNotifier::new(
            message_pusher.clone(),
            config.announce_departures,
        ));

        Self {
            connect_usecase: ConnectUseCase::new(repository.clone(), message_pusher.clone()),
            disconnect_usecase: DisconnectUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                notifier.clone(),
            ),
            join_room_usecase: JoinRoomUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock.clone(),
            ),
            leave_room_usecase: LeaveRoomUseCase::new(repository.clone(), notifier),
            broadcast_message_usecase: BroadcastMessageUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock,
            ),
            broadcast_typing_usecase: BroadcastTypingUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            ),
            get_rooms_usecase: GetRoomsUseCase::new(repository.clone()),
            get_room_detail_usecase: GetRoomDetailUseCase::new(repository),
            message_pusher,
            outbound_buffer: config.outbound_buffer.max(1),
        }
    }
}
