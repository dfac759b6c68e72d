//! UseCase: Room 参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 参加後に、既存メンバーにだけ `PeerJoined` が届くこと
//!
//! ### どのような状況を想定しているか
//! - 正常系：空の Room への参加（通知なし）、既存メンバーのいる Room への参加
//! - エッジケース：再参加、切断済み接続からの参加

use std::sync::Arc;

use roomcast_shared::time::Clock;

use crate::domain::{
    ConnectionId, JoinOutcome, MessagePusher, RelayEvent, RoomId, RoomRepository, Timestamp,
};

/// Room 参加のユースケース（join + presence 通知）
pub struct JoinRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl JoinRoomUseCase {
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

    /// Room に参加する
    ///
    /// 参加者はメンバーに追加された後で通知されるため、直後に送った
    /// メッセージは既存メンバー全員に届く。参加者自身には通知しない。
    pub async fn execute(&self, connection_id: &ConnectionId, room_id: RoomId) -> JoinOutcome {
        let now = Timestamp::new(self.clock.now_utc_millis());
        let outcome = self
            .repository
            .join(connection_id, room_id.clone(), now)
            .await;

        match &outcome {
            JoinOutcome::Joined { peers } => {
                tracing::info!("Connection '{}' joined room '{}'", connection_id, room_id);
                if !peers.is_empty() {
                    let event = RelayEvent::PeerJoined {
                        room_id,
                        connection_id: connection_id.clone(),
                    };
                    self.message_pusher.broadcast(peers, &event).await;
                }
            }
            JoinOutcome::AlreadyMember => {
                tracing::debug!(
                    "Connection '{}' is already in room '{}'",
                    connection_id,
                    room_id
                );
            }
            JoinOutcome::UnknownConnection => {
                tracing::warn!(
                    "Ignoring join of room '{}' from unregistered connection '{}'",
                    room_id,
                    connection_id
                );
            }
        }

        outcome
    }
}
