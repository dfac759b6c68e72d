//! UseCase: typing 状態の通知
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - BroadcastTypingUseCase::execute() メソッド
//! - typing 状態の更新と、送信者以外のメンバーへの通知
//!
//! ### どのような状況を想定しているか
//! - 正常系：typing=true / typing=false
//! - 異常系：Room のメンバーでない接続からの typing（何もしない）

use std::sync::Arc;

use crate::domain::{
    ConnectionId, DeliveryReport, MessagePusher, RelayEvent, RoomId, RoomRepository, Username,
};

/// typing 通知のユースケース
pub struct BroadcastTypingUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl BroadcastTypingUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// typing 状態を記録し、送信者以外のメンバーに通知する
    ///
    /// 送信者が Room のメンバーでなければ何もせず `None` を返す。
    pub async fn execute(
        &self,
        room_id: RoomId,
        sender_id: &ConnectionId,
        username: Username,
        is_typing: bool,
    ) -> Option<DeliveryReport> {
        let Some(peers) = self
            .repository
            .set_typing(&room_id, sender_id, username.clone(), is_typing)
            .await
        else {
            tracing::debug!(
                "Ignoring typing update from '{}' for room '{}' (not a member)",
                sender_id,
                room_id
            );
            return None;
        };

        let event = RelayEvent::PeerTyping {
            room_id,
            username,
            connection_id: sender_id.clone(),
            is_typing,
        };
        Some(self.message_pusher.broadcast(&peers, &event).await)
    }
}
