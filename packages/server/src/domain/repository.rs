//! Repository trait 定義
//!
//! ドメイン層が必要とする状態ストアのインターフェース。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! 各メソッドは 1 回のロック区間で状態を更新し、同じ区間で計算した
//! 配送対象のスナップショットを返します。

use async_trait::async_trait;

use super::{
    ConnectionId, Departure, JoinOutcome, RepositoryError, Room, RoomId, Timestamp, Username,
};

/// Room Repository trait
///
/// Connection Registry / Room Directory / Typing Tracker をまとめた状態ストア。
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// 接続を登録（既に登録済みなら false）
    async fn register_connection(&self, connection_id: ConnectionId) -> bool;

    /// 接続を全ての Room から外して登録解除
    async fn unregister_connection(&self, connection_id: &ConnectionId) -> Vec<Departure>;

    /// Room に参加（Room がなければ作成）
    async fn join(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
        now: Timestamp,
    ) -> JoinOutcome;

    /// Room から退出（空になった Room は削除）
    async fn leave(&self, connection_id: &ConnectionId, room_id: &RoomId) -> Option<Departure>;

    /// typing 状態を更新し、送信者以外のメンバーを返す
    async fn set_typing(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
        username: Username,
        is_typing: bool,
    ) -> Option<Vec<ConnectionId>>;

    /// Room の現在のメンバー
    async fn members_of(&self, room_id: &RoomId) -> Vec<ConnectionId>;

    /// 全 Room のスナップショット
    async fn list_rooms(&self) -> Vec<Room>;

    /// Room のスナップショット
    async fn get_room(&self, room_id: &RoomId) -> Result<Room, RepositoryError>;

    /// 登録中の接続数
    async fn count_connections(&self) -> usize;
}
