//! `kr-domain` — types shared by every KBase report crate: the error
//! type, the TOML configuration and structured trace events.

pub mod config;
pub mod error;
pub mod trace;
