//! Error types for the safelist crate.
//!
//! Out-of-range indices are deliberately not errors: `at` returns the
//! `None` sentinel and `delete`/`update` are silent no-ops, favoring
//! liveness over strictness. The errors here cover caller-contract
//! violations only.

use thiserror::Error;

/// Errors surfaced by [`SafeList`](crate::SafeList) operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ListError {
    /// The list was closed. Either `close()` already returned on some
    /// handle, or every handle was dropped and the worker exited.
    #[error("list is closed")]
    Closed,

    /// An operation was submitted from inside an updater running on this
    /// same list. The worker is busy executing the updater and can never
    /// service the new command; failing fast here replaces a deadlock.
    #[error("reentrant operation submitted from inside an updater")]
    Reentrancy,
}
