//! UseCase: 接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectUseCase::execute() メソッド
//! - 接続の登録と、本人への `Connected` 通知
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規接続
//! - 異常系：同じ ID の二重登録

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PusherChannel, RelayEvent, RoomRepository};

use super::error::ConnectError;

/// 接続のユースケース（Connection Registry への登録）
pub struct ConnectUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 新しい ID を払い出して接続を登録する
    pub async fn execute(&self, sender: PusherChannel) -> Result<ConnectionId, ConnectError> {
        let connection_id = ConnectionId::generate();
        self.register(connection_id.clone(), sender).await?;
        Ok(connection_id)
    }

    /// 指定した ID で接続を登録し、本人に ID を通知する
    pub async fn register(
        &self,
        connection_id: ConnectionId,
        sender: PusherChannel,
    ) -> Result<(), ConnectError> {
        if !self
            .repository
            .register_connection(connection_id.clone())
            .await
        {
            return Err(ConnectError::DuplicateConnectionId(
                connection_id.into_string(),
            ));
        }

        self.message_pusher
            .register_connection(connection_id.clone(), sender)
            .await;

        let welcome = RelayEvent::Connected {
            connection_id: connection_id.clone(),
        };
        if let Err(e) = self.message_pusher.push_to(&connection_id, &welcome).await {
            tracing::warn!("Failed to greet connection '{}': {}", connection_id, e);
        }

        Ok(())
    }
}
