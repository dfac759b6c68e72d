//! Utilities shared across the roomcast packages.

pub mod logger;
pub mod time;
