//! Notifications sent to the remaining members when a connection leaves a room.

use std::sync::Arc;

use crate::domain::{ConnectionId, DeliveryReport, Departure, MessagePusher, RelayEvent};

/// Tells the members left behind that a connection is gone.
///
/// A departing connection that was typing always produces a
/// `PeerTyping { is_typing: false }`, so peers never keep a stale indicator.
/// `PeerLeft` is only sent when departures are announced.
pub struct DepartureNotifier {
    message_pusher: Arc<dyn MessagePusher>,
    announce_departures: bool,
}

impl DepartureNotifier {
    pub fn new(message_pusher: Arc<dyn MessagePusher>, announce_departures: bool) -> Self {
        Self {
            message_pusher,
            announce_departures,
        }
    }

    pub async fn notify(&self, connection_id: &ConnectionId, departure: &Departure) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        if departure.remaining.is_empty() {
            return report;
        }

        if let Some(username) = &departure.typing_username {
            let event = RelayEvent::PeerTyping {
                room_id: departure.room_id.clone(),
                username: username.clone(),
                connection_id: connection_id.clone(),
                is_typing: false,
            };
            report += self
                .message_pusher
                .broadcast(&departure.remaining, &event)
                .await;
        }

        if self.announce_departures {
            let event = RelayEvent::PeerLeft {
                room_id: departure.room_id.clone(),
                connection_id: connection_id.clone(),
            };
            report += self
                .message_pusher
                .broadcast(&departure.remaining, &event)
                .await;
        }

        report
    }
}
