//! Infrastructure layer: concrete implementations of the domain interfaces
//! and the wire-level DTOs.

pub mod dto;
pub mod message_pusher;
pub mod repository;
