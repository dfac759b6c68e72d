//! UseCase: Room 退出処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveRoomUseCase::execute() メソッド
//! - メンバーと typing エントリの削除、残りのメンバーへの通知
//!
//! ### どのような状況を想定しているか
//! - 正常系：typing 中のメンバーの退出
//! - エッジケース：同じ Room からの二重退出（2 回目は何もしない）

use std::sync::Arc;

use crate::domain::{ConnectionId, Departure, RoomId, RoomRepository};

use super::departure::DepartureNotifier;

/// Room 退出のユースケース
pub struct LeaveRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    notifier: Arc<DepartureNotifier>,
}

impl LeaveRoomUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, notifier: Arc<DepartureNotifier>) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    /// Room から退出する。メンバーでなければ `None`（何もしない）
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_id: &RoomId,
    ) -> Option<Departure> {
        let Some(departure) = self.repository.leave(connection_id, room_id).await else {
            tracing::debug!(
                "Connection '{}' is not in room '{}', nothing to leave",
                connection_id,
                room_id
            );
            return None;
        };

        tracing::info!("Connection '{}' left room '{}'", connection_id, room_id);
        self.notifier.notify(connection_id, &departure).await;
        Some(departure)
    }
}
