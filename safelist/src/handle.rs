//! The public handle for a list instance.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{mpsc, oneshot};

use crate::command::Command;
use crate::error::ListError;
use crate::worker;

/// Mailbox capacity. tokio has no rendezvous channel; capacity 1 is the
/// closest analogue — a send suspends until the worker drains the slot, so
/// a slow worker throttles all callers.
const MAILBOX_CAPACITY: usize = 1;

/// Monotonic id source for reentrancy tagging.
static NEXT_LIST_ID: AtomicU64 = AtomicU64::new(0);

/// A concurrency-safe, ordered, growable list of `T`.
///
/// `SafeList<T>` is a handle: it carries no storage itself, only a sender
/// for the mailbox of the worker task that owns the storage exclusively.
/// Cloning is cheap, and any number of clones may submit operations
/// concurrently from any task.
///
/// # Ordering
///
/// Commands apply strictly one at a time in the order the worker receives
/// them. A single caller's own operations apply in the order it issued
/// them; operations from different concurrent callers interleave in an
/// unspecified but total order. No two commands ever apply simultaneously.
///
/// # Visibility
///
/// [`append`](SafeList::append), [`delete`](SafeList::delete), and
/// [`update`](SafeList::update) return once the mailbox accepts the
/// command, before it is applied. [`at`](SafeList::at),
/// [`len`](SafeList::len), and [`close`](SafeList::close) await the
/// worker's reply, so every command the mailbox accepted before them is
/// applied by the time they return.
///
/// # Lifecycle
///
/// Created empty by [`new`](SafeList::new); destroyed exactly once by
/// [`close`](SafeList::close). After a close, every operation on every
/// remaining clone fails with [`ListError::Closed`].
pub struct SafeList<T> {
    mailbox: mpsc::Sender<Command<T>>,
    list_id: u64,
}

impl<T: Clone + Send + 'static> SafeList<T> {
    /// Create an empty list and spawn its worker task.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime (the worker is spawned
    /// with [`tokio::spawn`]).
    pub fn new() -> Self {
        let (mailbox, commands) = mpsc::channel(MAILBOX_CAPACITY);
        let list_id = NEXT_LIST_ID.fetch_add(1, Ordering::Relaxed);

        tokio::spawn(worker::run(list_id, commands));
        tracing::debug!(list_id, "list created");

        Self { mailbox, list_id }
    }

    /// Append an item to the end of the list.
    ///
    /// Fire-and-forget: returns once the command is accepted, before it is
    /// applied. Issue a synchronous operation afterwards if you need the
    /// element to be visible.
    pub async fn append(&self, item: T) -> Result<(), ListError> {
        self.submit(Command::Insert(item)).await
    }

    /// Remove the element at `index`, shifting later elements down by one.
    ///
    /// Fire-and-forget. Out of range is a no-op, checked against the
    /// length at the moment the command is processed.
    pub async fn delete(&self, index: usize) -> Result<(), ListError> {
        self.submit(Command::Remove(index)).await
    }

    /// Return a copy of the element at `index`, or `None` when the index
    /// is out of range.
    ///
    /// Blocks until the worker replies.
    pub async fn at(&self, index: usize) -> Result<Option<T>, ListError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.submit(Command::At(index, reply_tx)).await?;
        reply_rx.await.map_err(|_| ListError::Closed)
    }

    /// Replace the element at `index` with `updater(element)`.
    ///
    /// Fire-and-forget. Out of range is a no-op. The updater runs inside
    /// the worker, not in the calling task.
    ///
    /// # Deadlock hazard
    ///
    /// `updater` executes inside the worker's loop turn. If it submits any
    /// operation to this same list, the worker can never service that
    /// operation: it is busy running `updater`. An updater that polls a
    /// handle future to completion on the worker thread fails fast with
    /// [`ListError::Reentrancy`]; a reentrant submission routed through
    /// another task is not detectable and will deadlock. The updater must
    /// not touch its own list — this is a caller contract.
    pub async fn update<F>(&self, index: usize, updater: F) -> Result<(), ListError>
    where
        F: FnOnce(T) -> T + Send + 'static,
    {
        self.submit(Command::Update(index, Box::new(updater))).await
    }

    /// Return the current number of elements.
    ///
    /// Blocks until the worker replies.
    pub async fn len(&self) -> Result<usize, ListError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.submit(Command::Len(reply_tx)).await?;
        reply_rx.await.map_err(|_| ListError::Closed)
    }

    /// True when the list holds no elements.
    pub async fn is_empty(&self) -> Result<bool, ListError> {
        Ok(self.len().await? == 0)
    }

    /// Stop the worker and return the final contents, in order.
    ///
    /// Terminal: consumes this handle, and every operation submitted on
    /// any remaining clone afterwards fails with [`ListError::Closed`].
    pub async fn close(self) -> Result<Vec<T>, ListError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.submit(Command::Terminate(reply_tx)).await?;
        reply_rx.await.map_err(|_| ListError::Closed)
    }

    /// Send one command into the mailbox, suspending until the worker has
    /// capacity for it.
    async fn submit(&self, command: Command<T>) -> Result<(), ListError> {
        if worker::inside_updater(self.list_id) {
            return Err(ListError::Reentrancy);
        }
        self.mailbox
            .send(command)
            .await
            .map_err(|_| ListError::Closed)
    }
}

impl<T: Clone + Send + 'static> Default for SafeList<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Manual Clone: a handle is copyable regardless of T's own bounds.
impl<T> Clone for SafeList<T> {
    fn clone(&self) -> Self {
        Self {
            mailbox: self.mailbox.clone(),
            list_id: self.list_id,
        }
    }
}

impl<T> fmt::Debug for SafeList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SafeList")
            .field("list_id", &self.list_id)
            .field("element_type", &std::any::type_name::<T>())
            .finish()
    }
}
