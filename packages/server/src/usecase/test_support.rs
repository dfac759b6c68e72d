//! Test doubles shared by the UseCase tests.

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use roomcast_shared::time::FixedClock;

use crate::{
    domain::{
        ConnectionId, DeliveryReport, MessagePushError, MessagePusher, PusherChannel, RelayEvent,
        RoomId, RoomRepository, Timestamp, Username,
    },
    infrastructure::repository::InMemoryRoomRepository,
};

pub const NOW: i64 = 1_700_000_000_000;

/// MessagePusher that records every delivery instead of writing to sockets.
#[derive(Default)]
pub struct RecordingPusher {
    registered: Mutex<HashSet<ConnectionId>>,
    delivered: Mutex<Vec<(ConnectionId, RelayEvent)>>,
}

impl RecordingPusher {
    /// Events delivered to one connection, in order.
    pub fn events_for(&self, connection_id: &ConnectionId) -> Vec<RelayEvent> {
        self.delivered
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| id == connection_id)
            .map(|(_, event)| event.clone())
            .collect()
    }

    pub fn total_deliveries(&self) -> usize {
        self.delivered.lock().unwrap().len()
    }
}

#[async_trait]
impl MessagePusher for RecordingPusher {
    async fn register_connection(&self, connection_id: ConnectionId, _channel: PusherChannel) {
        self.registered.lock().unwrap().insert(connection_id);
    }

    async fn unregister_connection(&self, connection_id: &ConnectionId) {
        self.registered.lock().unwrap().remove(connection_id);
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &RelayEvent,
    ) -> Result<(), MessagePushError> {
        if !self.registered.lock().unwrap().contains(connection_id) {
            return Err(MessagePushError::ConnectionNotFound(
                connection_id.as_str().to_string(),
            ));
        }
        self.delivered
            .lock()
            .unwrap()
            .push((connection_id.clone(), event.clone()));
        Ok(())
    }

    async fn broadcast(&self, targets: &[ConnectionId], event: &RelayEvent) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        for target in targets {
            match self.push_to(target, event).await {
                Ok(()) => report.delivered += 1,
                Err(_) => report.skipped += 1,
            }
        }
        report
    }
}

pub fn conn(id: &str) -> ConnectionId {
    ConnectionId::new(id.to_string()).unwrap()
}

pub fn room(id: &str) -> RoomId {
    RoomId::new(id.to_string()).unwrap()
}

pub fn user(name: &str) -> Username {
    Username::new(name.to_string()).unwrap()
}

pub fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(NOW))
}

pub fn fixtures() -> (Arc<InMemoryRoomRepository>, Arc<RecordingPusher>) {
    (
        Arc::new(InMemoryRoomRepository::default()),
        Arc::new(RecordingPusher::default()),
    )
}

/// Register connections in both the repository and the pusher.
pub async fn connect_all(
    repository: &InMemoryRoomRepository,
    pusher: &RecordingPusher,
    ids: &[&str],
) {
    for id in ids {
        repository.register_connection(conn(id)).await;
        let (tx, _rx) = tokio::sync::mpsc::channel(1);
        pusher.register_connection(conn(id), tx).await;
    }
}

/// Join every connection to the room without emitting events.
pub async fn join_all(repository: &InMemoryRoomRepository, room_id: &str, ids: &[&str]) {
    for id in ids {
        repository
            .join(&conn(id), room(room_id), Timestamp::new(NOW))
            .await;
    }
}
