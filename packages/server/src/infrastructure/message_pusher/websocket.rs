//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの送信キュー (`PusherChannel`) を管理
//! - `RelayEvent` を JSON に一度だけエンコードし、宛先のキューに積む
//!
//! ## 設計ノート
//!
//! 実際のソケットへの書き込みは UI 層の writer タスクが行います。
//! ここでは `try_send` しか使わないため、遅い宛先がいても
//! 他の宛先への配送は待たされません。キューが満杯の宛先には
//! そのイベントを配送しません（at-most-once）。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{RwLock, mpsc::error::TrySendError};

use crate::{
    domain::{
        ConnectionId, DeliveryReport, MessagePushError, MessagePusher, PusherChannel, RelayEvent,
    },
    infrastructure::dto::websocket::ServerEvent,
};

/// WebSocket を使った MessagePusher 実装
pub struct WebSocketMessagePusher {
    /// 接続中の送信キュー
    channels: Arc<RwLock<HashMap<ConnectionId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new(channels: Arc<RwLock<HashMap<ConnectionId, PusherChannel>>>) -> Self {
        Self { channels }
    }

    fn encode(event: &RelayEvent) -> Result<String, MessagePushError> {
        serde_json::to_string(&ServerEvent::from(event))
            .map_err(|e| MessagePushError::Encode(e.to_string()))
    }

    fn try_deliver(
        connection_id: &ConnectionId,
        channel: &PusherChannel,
        frame: String,
    ) -> Result<(), MessagePushError> {
        channel.try_send(frame).map_err(|e| match e {
            TrySendError::Full(_) => {
                MessagePushError::ChannelFull(connection_id.as_str().to_string())
            }
            TrySendError::Closed(_) => {
                MessagePushError::ChannelClosed(connection_id.as_str().to_string())
            }
        })
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new(Arc::new(RwLock::new(HashMap::new())))
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_connection(&self, connection_id: ConnectionId, channel: PusherChannel) {
        let mut channels = self.channels.write().await;
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
        channels.insert(connection_id, channel);
    }

    async fn unregister_connection(&self, connection_id: &ConnectionId) {
        let mut channels = self.channels.write().await;
        channels.remove(connection_id);
        tracing::debug!(
            "Connection '{}' unregistered from MessagePusher",
            connection_id
        );
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &RelayEvent,
    ) -> Result<(), MessagePushError> {
        let frame = Self::encode(event)?;
        let channels = self.channels.read().await;

        let channel = channels
            .get(connection_id)
            .ok_or_else(|| MessagePushError::ConnectionNotFound(connection_id.as_str().to_string()))?;
        Self::try_deliver(connection_id, channel, frame)?;
        tracing::debug!("Pushed event to connection '{}'", connection_id);
        Ok(())
    }

    async fn broadcast(&self, targets: &[ConnectionId], event: &RelayEvent) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        if targets.is_empty() {
            return report;
        }

        let frame = match Self::encode(event) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!("Dropping broadcast: {}", e);
                report.skipped = targets.len();
                return report;
            }
        };

        let channels = self.channels.read().await;
        for target in targets {
            let Some(channel) = channels.get(target) else {
                // 切断処理と競合した宛先
                tracing::debug!("Connection '{}' not found during broadcast, skipping", target);
                report.skipped += 1;
                continue;
            };

            match Self::try_deliver(target, channel, frame.clone()) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    tracing::warn!("Failed to push event: {}", e);
                    report.skipped += 1;
                }
            }
        }

        tracing::debug!(
            "Broadcast finished: {} delivered, {} skipped",
            report.delivered,
            report.skipped
        );
        report
    }
}
