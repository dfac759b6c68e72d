//! Room-scoped real-time message relay.
//!
//! Clients connect over WebSocket, join named rooms, and exchange chat
//! messages, typing indicators and presence notifications with the other
//! members of those rooms. All state lives in memory in a single process.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
