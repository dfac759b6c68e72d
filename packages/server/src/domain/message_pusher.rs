//! MessagePusher trait 定義
//!
//! 接続ごとの送信キューへイベントを届けるためのインターフェース。
//! Connection Registry のうち「送信チャンネル」側を担当します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, RelayEvent};

/// 接続ごとの送信キュー（エンコード済みのテキストフレーム）
pub type PusherChannel = mpsc::Sender<String>;

/// ブロードキャスト結果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// キューに積めた宛先数
    pub delivered: usize,
    /// 切断済み・未登録・キュー満杯でスキップした宛先数
    pub skipped: usize,
}

impl std::ops::AddAssign for DeliveryReport {
    fn add_assign(&mut self, other: Self) {
        self.delivered += other.delivered;
        self.skipped += other.skipped;
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続の送信チャンネルを登録
    async fn register_connection(&self, connection_id: ConnectionId, channel: PusherChannel);

    /// 接続の送信チャンネルを登録解除
    async fn unregister_connection(&self, connection_id: &ConnectionId);

    /// 特定の接続にイベントを送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &RelayEvent,
    ) -> Result<(), MessagePushError>;

    /// 複数の接続にイベントを送信（個別の失敗は許容）
    async fn broadcast(&self, targets: &[ConnectionId], event: &RelayEvent) -> DeliveryReport;
}
