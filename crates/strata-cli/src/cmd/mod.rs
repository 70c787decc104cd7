//! Command implementations.

pub mod pull;
pub mod push;
