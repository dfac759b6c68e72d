//! UseCase: Room 詳細の取得

use std::sync::Arc;

use crate::domain::{Room, RoomId, RoomRepository};

use super::error::GetRoomDetailError;

pub struct GetRoomDetailUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomDetailUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, room_id: String) -> Result<Room, GetRoomDetailError> {
        let room_id =
            RoomId::new(room_id).map_err(|e| GetRoomDetailError::InvalidRoomId(e.to_string()))?;

        self.repository
            .get_room(&room_id)
            .await
            .map_err(|_| GetRoomDetailError::RoomNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::{conn, connect_all, fixtures, join_all};

    #[tokio::test]
    async fn test_get_room_detail_success() {
        // テスト項目: 存在する Room の詳細を取得できる
        // given (前提条件):
        let (repository, pusher) = fixtures();
        connect_all(&repository, &pusher, &["a", "b"]).await;
        join_all(&repository, "r1", &["a", "b"]).await;
        let usecase = GetRoomDetailUseCase::new(repository.clone());

        // when (操作):
        let room = usecase.execute("r1".to_string()).await.unwrap();

        // then (期待する結果):
        assert_eq!(room.member_ids(), vec![conn("a"), conn("b")]);
    }

    #[tokio::test]
    async fn test_get_room_detail_not_found() {
        // テスト項目: 存在しない Room は RoomNotFound
        // given (前提条件):
        let (repository, _) = fixtures();
        let usecase = GetRoomDetailUseCase::new(repository.clone());

        // when (操作):
        let result = usecase.execute("nowhere".to_string()).await;

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), GetRoomDetailError::RoomNotFound);
    }

    #[tokio::test]
    async fn test_get_room_detail_blank_id() {
        // テスト項目: 空白の Room ID は InvalidRoomId
        // given (前提条件):
        let (repository, _) = fixtures();
        let usecase = GetRoomDetailUseCase::new(repository.clone());

        // when (操作):
        let result = usecase.execute("  ".to_string()).await;

        // then (期待する結果):
        assert!(matches!(result, Err(GetRoomDetailError::InvalidRoomId(_))));
    }
}
