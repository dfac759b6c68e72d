//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - BroadcastMessageUseCase::execute() メソッド
//! - 送信者を含む Room の全メンバーに届くこと、タイムスタンプがサーバー側で付くこと
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数メンバーへの配信（送信者にもエコーされる）
//! - エッジケース：Room 外の接続には届かない、存在しない Room

use std::sync::Arc;

use roomcast_shared::time::Clock;

use crate::domain::{
    ConnectionId, DeliveryReport, MessageBody, MessagePusher, RelayEvent, RoomId,
    RoomRepository, Timestamp, Username,
};

/// メッセージ送信のユースケース
pub struct BroadcastMessageUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl BroadcastMessageUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
        }
    }

    /// Room の全メンバー（送信者を含む）にメッセージを配信する
    pub async fn execute(
        &self,
        room_id: RoomId,
        sender_id: &ConnectionId,
        username: Username,
        body: MessageBody,
    ) -> DeliveryReport {
        let targets = self.repository.members_of(&room_id).await;
        if targets.is_empty() {
            tracing::debug!("Room '{}' has no members, dropping message", room_id);
            return DeliveryReport::default();
        }

        let timestamp = Timestamp::new(self.clock.now_utc_millis());
        tracing::info!(
            "Message from '{}' ({}) in room '{}' to {} member(s)",
            username.as_str(),
            sender_id,
            room_id,
            targets.len()
        );

        let event = RelayEvent::MessageReceived {
            room_id,
            sender_id: sender_id.clone(),
            username,
            body,
            timestamp,
        };
        self.message_pusher.broadcast(&targets, &event).await
    }
}
