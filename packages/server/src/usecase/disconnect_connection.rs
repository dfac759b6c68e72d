//! UseCase: 切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectUseCase::execute() メソッド
//! - 全 Room からのメンバー・typing エントリの削除、送信チャンネルの登録解除
//!
//! ### なぜこのテストが必要か
//! - leave を送らずに切れた接続の typing 表示が残り続けないことを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数 Room に参加中の接続の切断
//! - エッジケース：未登録の接続の切断（何もしない）

use std::sync::Arc;

use crate::domain::{ConnectionId, Departure, MessagePusher, RoomRepository};

use super::departure::DepartureNotifier;

/// 切断のユースケース（Connection Lifecycle Manager）
pub struct DisconnectUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    notifier: Arc<DepartureNotifier>,
}

impl DisconnectUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        notifier: Arc<DepartureNotifier>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            notifier,
        }
    }

    /// 切断を実行し、抜けた Room の一覧を返す
    pub async fn execute(&self, connection_id: &ConnectionId) -> Vec<Departure> {
        // 1. 全 Room から削除して登録解除（1 回のロック区間）
        let departures = self.repository.unregister_connection(connection_id).await;

        // 2. 送信チャンネルを登録解除
        self.message_pusher
            .unregister_connection(connection_id)
            .await;

        // 3. 残りのメンバーへ通知
        for departure in &departures {
            self.notifier.notify(connection_id, departure).await;
        }

        tracing::info!(
            "Connection '{}' disconnected, removed from {} room(s)",
            connection_id,
            departures.len()
        );
        departures
    }
}
