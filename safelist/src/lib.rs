//! # safelist
//!
//! A concurrency-safe, ordered, growable list served by a single owner task.
//!
//! Arbitrarily many callers may read and mutate one list concurrently
//! without a single lock: every operation travels as a command through
//! one mailbox into one worker task, which owns the backing storage
//! exclusively and applies commands strictly one at a time. Data races are
//! impossible by construction because no second reader or writer path to
//! the storage exists.
//!
//! ```text
//! ┌──────────┐                    ┌─────────────────────────────┐
//! │ caller A ├─┐                  │           Worker            │
//! └──────────┘ │   ┌──────────┐   │  loop:                      │
//! ┌──────────┐ ├──▶│ Mailbox  ├──▶│    recv → apply → reply?    │
//! │ caller B ├─┘   │ (mpsc)   │   │                             │
//! └──────────┘     └──────────┘   │  owns Vec<T> exclusively    │
//!      ▲                          └──────────────┬──────────────┘
//!      └────────── oneshot reply (at/len/close) ─┘
//! ```
//!
//! ## Operation semantics
//!
//! `append`, `delete`, and `update` are fire-and-forget: they return once
//! the command is accepted by the mailbox, before it is applied. `at`,
//! `len`, and `close` await the worker's reply and therefore act as a
//! visibility barrier: every command accepted by the mailbox before them is
//! guaranteed applied when they return. Out-of-range indices never error —
//! `at` returns `None`, `delete` and `update` are silent no-ops.
//!
//! ## Quick start
//!
//! ```
//! use safelist::SafeList;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let list = SafeList::new();
//!
//! list.append("a".to_string()).await?;
//! list.append("b".to_string()).await?;
//! list.delete(0).await?;
//!
//! assert_eq!(list.at(0).await?, Some("b".to_string()));
//! assert_eq!(list.len().await?, 1);
//! assert_eq!(list.close().await?, vec!["b".to_string()]);
//! # Ok::<(), safelist::ListError>(())
//! # }).unwrap();
//! ```
//!
//! ## Lifecycle
//!
//! A list is created empty with a running worker and destroyed exactly once
//! via [`SafeList::close`], which stops the worker and yields the final
//! contents. Any operation submitted after that fails with
//! [`ListError::Closed`]. Dropping every handle without closing also stops
//! the worker (the storage is discarded).

#![deny(missing_docs)]

mod command;
mod error;
mod handle;
mod worker;

pub use error::ListError;
pub use handle::SafeList;
