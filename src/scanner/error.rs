//! Errors for scan runs.

use thiserror::Error;

/// Why a scan or audit did not run.
///
/// Individual probe failures never surface here; they are part of the
/// results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("a {0} is already running")]
    AlreadyRunning(&'static str),
}
