//! Entities: rooms and the directory that owns them.
//!
//! `RoomDirectory` is the single owner of all membership and typing state. It
//! is plain data with synchronous methods; callers serialize access to it (the
//! in-memory repository keeps it behind one mutex). Every mutating method
//! returns the delivery targets computed in the same step, so fan-out always
//! works from a snapshot that matches the state change that triggered it.

use std::collections::{HashMap, HashSet, hash_map::Entry};

use super::value_object::{ConnectionId, RoomId, Timestamp, Username};

/// A named broadcast group.
#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    pub created_at: Timestamp,
    members: HashSet<ConnectionId>,
    /// Connections currently typing, with the last username they typed as.
    typing_users: HashMap<ConnectionId, Username>,
}

impl Room {
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self {
            id,
            created_at,
            members: HashSet::new(),
            typing_users: HashMap::new(),
        }
    }

    /// Returns `false` if the connection was already a member.
    pub fn add_member(&mut self, connection_id: ConnectionId) -> bool {
        self.members.insert(connection_id)
    }

    /// Removes the member and its typing entry. Returns `false` for non-members.
    pub fn remove_member(&mut self, connection_id: &ConnectionId) -> bool {
        self.typing_users.remove(connection_id);
        self.members.remove(connection_id)
    }

    pub fn is_member(&self, connection_id: &ConnectionId) -> bool {
        self.members.contains(connection_id)
    }

    /// Record the typing state of a member.
    ///
    /// Returns `false` without recording anything when the connection is not a
    /// member; a stale entry for such a connection is dropped on the way.
    pub fn set_typing(
        &mut self,
        connection_id: &ConnectionId,
        username: Username,
        is_typing: bool,
    ) -> bool {
        if !self.is_member(connection_id) {
            if self.typing_users.remove(connection_id).is_some() {
                tracing::warn!(
                    "Dropped dangling typing entry for non-member '{}' in room '{}'",
                    connection_id,
                    self.id
                );
            }
            return false;
        }

        if is_typing {
            self.typing_users.insert(connection_id.clone(), username);
        } else {
            self.typing_users.remove(connection_id);
        }
        true
    }

    /// Username the connection is currently typing as, if any.
    pub fn typing_username(&self, connection_id: &ConnectionId) -> Option<&Username> {
        self.typing_users.get(connection_id)
    }

    /// All members, sorted for stable output.
    pub fn member_ids(&self) -> Vec<ConnectionId> {
        let mut ids: Vec<ConnectionId> = self.members.iter().cloned().collect();
        ids.sort();
        ids
    }

    /// All members except `exclude`, sorted.
    pub fn peers_of(&self, exclude: &ConnectionId) -> Vec<ConnectionId> {
        let mut ids: Vec<ConnectionId> = self
            .members
            .iter()
            .filter(|id| *id != exclude)
            .cloned()
            .collect();
        ids.sort();
        ids
    }

    /// Typing members with their usernames, sorted by connection id.
    pub fn typing_users(&self) -> Vec<(ConnectionId, Username)> {
        let mut entries: Vec<(ConnectionId, Username)> = self
            .typing_users
            .iter()
            .map(|(id, name)| (id.clone(), name.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn typing_count(&self) -> usize {
        self.typing_users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Result of a join request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The connection was added; `peers` are the other members to notify.
    Joined { peers: Vec<ConnectionId> },
    /// The connection was already a member; nothing changed.
    AlreadyMember,
    /// The connection is not registered (already disconnected); nothing changed.
    UnknownConnection,
}

/// A connection removed from a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub room_id: RoomId,
    /// Members left in the room after the removal.
    pub remaining: Vec<ConnectionId>,
    /// Set when the departing connection was marked typing.
    pub typing_username: Option<Username>,
}

/// Registry of live connections plus the rooms they belong to.
#[derive(Debug, Default)]
pub struct RoomDirectory {
    rooms: HashMap<RoomId, Room>,
    /// Reverse index: connection -> rooms it joined.
    connections: HashMap<ConnectionId, HashSet<RoomId>>,
}

impl RoomDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the id was already registered.
    pub fn register(&mut self, connection_id: ConnectionId) -> bool {
        match self.connections.entry(connection_id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(HashSet::new());
                true
            }
        }
    }

    pub fn is_registered(&self, connection_id: &ConnectionId) -> bool {
        self.connections.contains_key(connection_id)
    }

    /// Remove a connection from every room, then forget it.
    ///
    /// Unknown ids yield an empty list.
    pub fn unregister(&mut self, connection_id: &ConnectionId) -> Vec<Departure> {
        let Some(room_ids) = self.connections.remove(connection_id) else {
            return Vec::new();
        };

        let mut room_ids: Vec<RoomId> = room_ids.into_iter().collect();
        room_ids.sort();

        room_ids
            .into_iter()
            .filter_map(|room_id| self.remove_from_room(connection_id, room_id))
            .collect()
    }

    pub fn join(
        &mut self,
        connection_id: &ConnectionId,
        room_id: RoomId,
        now: Timestamp,
    ) -> JoinOutcome {
        let Some(joined_rooms) = self.connections.get_mut(connection_id) else {
            return JoinOutcome::UnknownConnection;
        };

        let room = self
            .rooms
            .entry(room_id.clone())
            .or_insert_with(|| Room::new(room_id.clone(), now));

        if !room.add_member(connection_id.clone()) {
            return JoinOutcome::AlreadyMember;
        }
        joined_rooms.insert(room_id);

        JoinOutcome::Joined {
            peers: room.peers_of(connection_id),
        }
    }

    /// Returns `None` when the connection was not in the room.
    pub fn leave(&mut self, connection_id: &ConnectionId, room_id: &RoomId) -> Option<Departure> {
        let was_indexed = self
            .connections
            .get_mut(connection_id)
            .is_some_and(|rooms| rooms.remove(room_id));
        let departure = self.remove_from_room(connection_id, room_id.clone());

        if was_indexed != departure.is_some() {
            tracing::warn!(
                "Membership index out of sync for '{}' in room '{}'",
                connection_id,
                room_id
            );
        }
        departure
    }

    /// Update typing state and return the peers to notify.
    ///
    /// `None` when the room does not exist or the sender is not a member.
    pub fn set_typing(
        &mut self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
        username: Username,
        is_typing: bool,
    ) -> Option<Vec<ConnectionId>> {
        let room = self.rooms.get_mut(room_id)?;
        if !room.set_typing(connection_id, username, is_typing) {
            return None;
        }
        Some(room.peers_of(connection_id))
    }

    /// Current members of a room; empty for unknown rooms.
    pub fn members_of(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        self.rooms
            .get(room_id)
            .map(Room::member_ids)
            .unwrap_or_default()
    }

    pub fn room(&self, room_id: &RoomId) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    /// All rooms, sorted by id.
    pub fn rooms(&self) -> Vec<&Room> {
        let mut rooms: Vec<&Room> = self.rooms.values().collect();
        rooms.sort_by(|a, b| a.id.cmp(&b.id));
        rooms
    }

    /// Rooms a connection currently belongs to, sorted.
    pub fn rooms_of(&self, connection_id: &ConnectionId) -> Vec<RoomId> {
        let mut ids: Vec<RoomId> = self
            .connections
            .get(connection_id)
            .map(|rooms| rooms.iter().cloned().collect())
            .unwrap_or_default();
        ids.sort();
        ids
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    fn remove_from_room(&mut self, connection_id: &ConnectionId, room_id: RoomId) -> Option<Departure> {
        let room = self.rooms.get_mut(&room_id)?;
        let typing_username = room.typing_username(connection_id).cloned();
        if !room.remove_member(connection_id) {
            return None;
        }

        let remaining = room.member_ids();
        if room.is_empty() {
            self.rooms.remove(&room_id);
            tracing::debug!("Room '{}' is empty and was removed", room_id);
        }

        Some(Departure {
            room_id,
            remaining,
            typing_username,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string()).unwrap()
    }

    fn room(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    fn user(name: &str) -> Username {
        Username::new(name.to_string()).unwrap()
    }

    fn directory_with(connections: &[&str]) -> RoomDirectory {
        let mut directory = RoomDirectory::new();
        for id in connections {
            directory.register(conn(id));
        }
        directory
    }

    #[test]
    fn test_join_creates_room_and_returns_no_peers_for_first_member() {
        // テスト項目: 空の Room への最初の参加では通知対象がいない
        // given (前提条件):
        let mut directory = directory_with(&["c"]);

        // when (操作):
        let outcome = directory.join(&conn("c"), room("r2"), Timestamp::new(10));

        // then (期待する結果):
        assert_eq!(outcome, JoinOutcome::Joined { peers: vec![] });
        assert_eq!(directory.members_of(&room("r2")), vec![conn("c")]);
        assert_eq!(directory.room(&room("r2")).unwrap().created_at.value(), 10);
    }

    #[test]
    fn test_join_returns_existing_members_as_peers() {
        // テスト項目: 2 人目の参加では既存メンバーのみが通知対象になる
        // given (前提条件):
        let mut directory = directory_with(&["c", "d"]);
        directory.join(&conn("c"), room("r2"), Timestamp::new(0));

        // when (操作):
        let outcome = directory.join(&conn("d"), room("r2"), Timestamp::new(0));

        // then (期待する結果):
        assert_eq!(
            outcome,
            JoinOutcome::Joined {
                peers: vec![conn("c")]
            }
        );
        assert_eq!(directory.members_of(&room("r2")), vec![conn("c"), conn("d")]);
    }

    #[test]
    fn test_rejoin_is_noop() {
        // テスト項目: 既に参加済みの Room への再参加は重複せず通知もしない
        // given (前提条件):
        let mut directory = directory_with(&["a", "b"]);
        directory.join(&conn("a"), room("r1"), Timestamp::new(0));
        directory.join(&conn("b"), room("r1"), Timestamp::new(0));

        // when (操作):
        let outcome = directory.join(&conn("a"), room("r1"), Timestamp::new(0));

        // then (期待する結果):
        assert_eq!(outcome, JoinOutcome::AlreadyMember);
        assert_eq!(directory.room(&room("r1")).unwrap().member_count(), 2);
    }

    #[test]
    fn test_join_from_unregistered_connection_is_ignored() {
        // テスト項目: 未登録の接続からの参加は無視される
        // given (前提条件):
        let mut directory = RoomDirectory::new();

        // when (操作):
        let outcome = directory.join(&conn("ghost"), room("r1"), Timestamp::new(0));

        // then (期待する結果):
        assert_eq!(outcome, JoinOutcome::UnknownConnection);
        assert!(directory.room(&room("r1")).is_none());
    }

    #[test]
    fn test_connection_can_be_member_of_multiple_rooms() {
        // テスト項目: 1 つの接続が複数の Room に同時に参加できる
        // given (前提条件):
        let mut directory = directory_with(&["a"]);

        // when (操作):
        directory.join(&conn("a"), room("r1"), Timestamp::new(0));
        directory.join(&conn("a"), room("r2"), Timestamp::new(0));

        // then (期待する結果):
        assert_eq!(directory.rooms_of(&conn("a")), vec![room("r1"), room("r2")]);
    }

    #[test]
    fn test_leave_removes_membership_and_typing_entry() {
        // テスト項目: leave でメンバーと typing エントリの両方が削除される
        // given (前提条件):
        let mut directory = directory_with(&["a", "b"]);
        directory.join(&conn("a"), room("r1"), Timestamp::new(0));
        directory.join(&conn("b"), room("r1"), Timestamp::new(0));
        directory.set_typing(&room("r1"), &conn("a"), user("alice"), true);

        // when (操作):
        let departure = directory.leave(&conn("a"), &room("r1")).unwrap();

        // then (期待する結果):
        assert_eq!(departure.remaining, vec![conn("b")]);
        assert_eq!(departure.typing_username, Some(user("alice")));
        let r1 = directory.room(&room("r1")).unwrap();
        assert!(!r1.is_member(&conn("a")));
        assert!(r1.typing_users().is_empty());
        assert!(directory.rooms_of(&conn("a")).is_empty());
    }

    #[test]
    fn test_leave_twice_is_idempotent() {
        // テスト項目: 同じ Room に対する 2 回目の leave は何もしない
        // given (前提条件):
        let mut directory = directory_with(&["a", "b"]);
        directory.join(&conn("a"), room("r1"), Timestamp::new(0));
        directory.join(&conn("b"), room("r1"), Timestamp::new(0));
        directory.leave(&conn("a"), &room("r1"));

        // when (操作):
        let second = directory.leave(&conn("a"), &room("r1"));

        // then (期待する結果):
        assert_eq!(second, None);
        assert_eq!(directory.members_of(&room("r1")), vec![conn("b")]);
    }

    #[test]
    fn test_last_leave_deletes_room() {
        // テスト項目: 最後のメンバーが抜けると Room が削除される
        // given (前提条件):
        let mut directory = directory_with(&["a"]);
        directory.join(&conn("a"), room("r1"), Timestamp::new(0));

        // when (操作):
        let departure = directory.leave(&conn("a"), &room("r1")).unwrap();

        // then (期待する結果):
        assert!(departure.remaining.is_empty());
        assert!(directory.room(&room("r1")).is_none());
        assert!(directory.members_of(&room("r1")).is_empty());
    }

    #[test]
    fn test_leave_unknown_room_is_noop() {
        // テスト項目: 存在しない Room からの leave はエラーにならない
        // given (前提条件):
        let mut directory = directory_with(&["a"]);

        // when (操作):
        let departure = directory.leave(&conn("a"), &room("nowhere"));

        // then (期待する結果):
        assert_eq!(departure, None);
    }

    #[test]
    fn test_set_typing_returns_peers_excluding_sender() {
        // テスト項目: typing 更新時の通知対象に送信者自身は含まれない
        // given (前提条件):
        let mut directory = directory_with(&["a", "b", "c"]);
        for id in ["a", "b", "c"] {
            directory.join(&conn(id), room("r1"), Timestamp::new(0));
        }

        // when (操作):
        let peers = directory.set_typing(&room("r1"), &conn("a"), user("alice"), true);

        // then (期待する結果):
        assert_eq!(peers, Some(vec![conn("b"), conn("c")]));
        assert_eq!(
            directory.room(&room("r1")).unwrap().typing_users(),
            vec![(conn("a"), user("alice"))]
        );
    }

    #[test]
    fn test_set_typing_false_removes_entry() {
        // テスト項目: typing=false でエントリが削除される
        // given (前提条件):
        let mut directory = directory_with(&["a", "b"]);
        directory.join(&conn("a"), room("r1"), Timestamp::new(0));
        directory.join(&conn("b"), room("r1"), Timestamp::new(0));
        directory.set_typing(&room("r1"), &conn("b"), user("bob"), true);

        // when (操作):
        let peers = directory.set_typing(&room("r1"), &conn("b"), user("bob"), false);

        // then (期待する結果):
        assert_eq!(peers, Some(vec![conn("a")]));
        assert_eq!(directory.room(&room("r1")).unwrap().typing_count(), 0);
    }

    #[test]
    fn test_set_typing_by_non_member_is_noop() {
        // テスト項目: メンバーでない接続の typing 更新は無視される
        // given (前提条件):
        let mut directory = directory_with(&["a", "outsider"]);
        directory.join(&conn("a"), room("r1"), Timestamp::new(0));

        // when (操作):
        let peers = directory.set_typing(&room("r1"), &conn("outsider"), user("eve"), true);
        let unknown_room = directory.set_typing(&room("r9"), &conn("a"), user("alice"), true);

        // then (期待する結果):
        assert_eq!(peers, None);
        assert_eq!(unknown_room, None);
        assert_eq!(directory.room(&room("r1")).unwrap().typing_count(), 0);
    }

    #[test]
    fn test_unregister_purges_every_room() {
        // テスト項目: 切断時に全ての Room からメンバーと typing が削除される
        // given (前提条件):
        let mut directory = directory_with(&["a", "b"]);
        directory.join(&conn("a"), room("r1"), Timestamp::new(0));
        directory.join(&conn("b"), room("r1"), Timestamp::new(0));
        directory.join(&conn("a"), room("r2"), Timestamp::new(0));
        directory.set_typing(&room("r1"), &conn("a"), user("alice"), true);

        // when (操作):
        let departures = directory.unregister(&conn("a"));

        // then (期待する結果):
        assert_eq!(departures.len(), 2);
        assert_eq!(departures[0].room_id, room("r1"));
        assert_eq!(departures[0].remaining, vec![conn("b")]);
        assert_eq!(departures[0].typing_username, Some(user("alice")));
        assert_eq!(departures[1].room_id, room("r2"));
        assert!(departures[1].remaining.is_empty());

        assert_eq!(directory.members_of(&room("r1")), vec![conn("b")]);
        assert_eq!(directory.room(&room("r1")).unwrap().typing_count(), 0);
        assert!(directory.room(&room("r2")).is_none());
        assert!(!directory.is_registered(&conn("a")));
    }

    #[test]
    fn test_unregister_unknown_connection_is_noop() {
        // テスト項目: 未登録の接続の unregister は何もしない
        // given (前提条件):
        let mut directory = directory_with(&["a"]);

        // when (操作):
        let departures = directory.unregister(&conn("ghost"));

        // then (期待する結果):
        assert!(departures.is_empty());
        assert_eq!(directory.connection_count(), 1);
    }

    #[test]
    fn test_register_twice_returns_false() {
        // テスト項目: 同じ ID の二重登録は false を返す
        // given (前提条件):
        let mut directory = RoomDirectory::new();
        directory.register(conn("a"));

        // when (操作):
        let second = directory.register(conn("a"));

        // then (期待する結果):
        assert!(!second);
        assert_eq!(directory.connection_count(), 1);
    }

    #[test]
    fn test_membership_never_contains_departed_connections() {
        // テスト項目: join/leave の任意の並びの後、最後の操作が leave の接続はメンバーに残らない
        // given (前提条件):
        let mut directory = directory_with(&["a", "b", "c"]);
        let ops: [(&str, bool); 9] = [
            ("a", true),
            ("b", true),
            ("a", false),
            ("c", true),
            ("a", true),
            ("b", false),
            ("b", false),
            ("c", false),
            ("b", true),
        ];

        // when (操作):
        let mut last_was_join: HashMap<&str, bool> = HashMap::new();
        for (id, is_join) in ops {
            if is_join {
                directory.join(&conn(id), room("r"), Timestamp::new(0));
            } else {
                directory.leave(&conn(id), &room("r"));
            }
            last_was_join.insert(id, is_join);
        }

        // then (期待する結果):
        let members = directory.members_of(&room("r"));
        for (id, joined) in last_was_join {
            assert_eq!(members.contains(&conn(id)), joined, "connection {id}");
        }
    }
}
