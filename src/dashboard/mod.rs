//! Live update channel for diagnostic screens
//!
//! Screens connect to `/ws` and receive:
//! - full request log and failure list snapshots on every mutation
//! - connectivity changes and forensic results
//! - per-item progress of scans and audits

pub mod types;
pub mod websocket;

pub use websocket::websocket_handler;
