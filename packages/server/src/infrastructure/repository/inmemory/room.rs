//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! `RoomDirectory` を 1 つの Mutex で保護し、全ての状態変更を直列化します。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, Departure, JoinOutcome, RepositoryError, Room, RoomDirectory, RoomId,
    RoomRepository, Timestamp, Username,
};

/// インメモリ Room Repository 実装
pub struct InMemoryRoomRepository {
    /// 全ての Room と接続の状態
    directory: Arc<Mutex<RoomDirectory>>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new(directory: Arc<Mutex<RoomDirectory>>) -> Self {
        Self { directory }
    }
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(RoomDirectory::new())))
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn register_connection(&self, connection_id: ConnectionId) -> bool {
        let mut directory = self.directory.lock().await;
        directory.register(connection_id)
    }

    async fn unregister_connection(&self, connection_id: &ConnectionId) -> Vec<Departure> {
        let mut directory = self.directory.lock().await;
        directory.unregister(connection_id)
    }

    async fn join(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
        now: Timestamp,
    ) -> JoinOutcome {
        let mut directory = self.directory.lock().await;
        directory.join(connection_id, room_id, now)
    }

    async fn leave(&self, connection_id: &ConnectionId, room_id: &RoomId) -> Option<Departure> {
        let mut directory = self.directory.lock().await;
        directory.leave(connection_id, room_id)
    }

    async fn set_typing(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
        username: Username,
        is_typing: bool,
    ) -> Option<Vec<ConnectionId>> {
        let mut directory = self.directory.lock().await;
        directory.set_typing(room_id, connection_id, username, is_typing)
    }

    async fn members_of(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        let directory = self.directory.lock().await;
        directory.members_of(room_id)
    }

    async fn list_rooms(&self) -> Vec<Room> {
        let directory = self.directory.lock().await;
        directory.rooms().into_iter().cloned().collect()
    }

    async fn get_room(&self, room_id: &RoomId) -> Result<Room, RepositoryError> {
        let directory = self.directory.lock().await;
        directory
            .room(room_id)
            .cloned()
            .ok_or_else(|| RepositoryError::RoomNotFound(room_id.as_str().to_string()))
    }

    async fn count_connections(&self) -> usize {
        let directory = self.directory.lock().await;
        directory.connection_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - InMemoryRoomRepository が RoomDirectory の操作を正しく委譲すること
    // - 並行アクセス時にメンバー集合が壊れないこと
    //
    // 【なぜこのテストが必要か】
    // - Repository は全ての UseCase が共有する唯一の可変状態
    // - 同時に走る接続ハンドラからの更新が直列化されている必要がある
    // ========================================

    fn conn(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string()).unwrap()
    }

    fn room(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_join_and_members_of() {
        // テスト項目: join した接続が members_of に反映される
        // given (前提条件):
        let repo = InMemoryRoomRepository::default();
        repo.register_connection(conn("a")).await;
        repo.register_connection(conn("b")).await;

        // when (操作):
        repo.join(&conn("a"), room("r1"), Timestamp::new(0)).await;
        let outcome = repo.join(&conn("b"), room("r1"), Timestamp::new(0)).await;

        // then (期待する結果):
        assert_eq!(
            outcome,
            JoinOutcome::Joined {
                peers: vec![conn("a")]
            }
        );
        assert_eq!(repo.members_of(&room("r1")).await, vec![conn("a"), conn("b")]);
    }

    #[tokio::test]
    async fn test_get_room_not_found() {
        // テスト項目: 存在しない Room の取得は RoomNotFound を返す
        // given (前提条件):
        let repo = InMemoryRoomRepository::default();

        // when (操作):
        let result = repo.get_room(&room("missing")).await;

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            RepositoryError::RoomNotFound("missing".to_string())
        );
    }

    #[tokio::test]
    async fn test_unregister_connection_removes_from_all_rooms() {
        // テスト項目: 登録解除で全ての Room から削除される
        // given (前提条件):
        let repo = InMemoryRoomRepository::default();
        repo.register_connection(conn("a")).await;
        repo.register_connection(conn("b")).await;
        repo.join(&conn("a"), room("r1"), Timestamp::new(0)).await;
        repo.join(&conn("b"), room("r1"), Timestamp::new(0)).await;
        repo.join(&conn("a"), room("r2"), Timestamp::new(0)).await;

        // when (操作):
        let departures = repo.unregister_connection(&conn("a")).await;

        // then (期待する結果):
        assert_eq!(departures.len(), 2);
        assert_eq!(repo.members_of(&room("r1")).await, vec![conn("b")]);
        assert!(repo.get_room(&room("r2")).await.is_err());
        assert_eq!(repo.count_connections().await, 1);
    }

    #[tokio::test]
    async fn test_list_rooms_sorted() {
        // テスト項目: Room 一覧が ID 順で返される
        // given (前提条件):
        let repo = InMemoryRoomRepository::default();
        repo.register_connection(conn("a")).await;
        repo.join(&conn("a"), room("zeta"), Timestamp::new(0)).await;
        repo.join(&conn("a"), room("alpha"), Timestamp::new(0)).await;

        // when (操作):
        let rooms = repo.list_rooms().await;

        // then (期待する結果):
        let ids: Vec<&str> = rooms.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "zeta"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_joins_and_leaves_keep_membership_consistent() {
        // テスト項目: 並行した join/leave の後もメンバー集合が整合している
        // given (前提条件):
        let repo = Arc::new(InMemoryRoomRepository::default());
        for i in 0..32 {
            repo.register_connection(conn(&format!("c{i}"))).await;
        }

        // when (操作): 偶数番は join のみ、奇数番は join 後に leave
        let mut handles = Vec::new();
        for i in 0..32 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                let id = conn(&format!("c{i}"));
                repo.join(&id, room("shared"), Timestamp::new(0)).await;
                if i % 2 == 1 {
                    repo.leave(&id, &room("shared")).await;
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // then (期待する結果):
        let members = repo.members_of(&room("shared")).await;
        assert_eq!(members.len(), 16);
        for i in 0..32 {
            assert_eq!(members.contains(&conn(&format!("c{i}"))), i % 2 == 0);
        }
    }
}
