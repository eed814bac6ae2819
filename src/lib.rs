//! LiveGo diagnostics
//!
//! Diagnostic core for the LiveGo livestreaming client: every backend call
//! is dispatched through a single tracked path, backend reachability is
//! polled continuously, and the endpoint registry and UI components can be
//! swept on demand to find unwired, failing or empty endpoints.

pub mod api;
pub mod auditor;
pub mod cli;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod dispatch;
pub mod health;
pub mod logging;
pub mod metrics;
pub mod scanner;
pub mod session;
pub mod tracker;
