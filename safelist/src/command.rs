//! Command messages carried by the mailbox.

use tokio::sync::oneshot;

/// Caller-supplied transform applied to one element by the worker.
pub(crate) type Updater<T> = Box<dyn FnOnce(T) -> T + Send>;

/// One requested operation, its parameters, and (for synchronous
/// operations) a private reply channel.
///
/// Constructed once by a handle, consumed once by the worker, never
/// mutated in between.
pub(crate) enum Command<T> {
    /// Append an item to the end of storage. Fire-and-forget.
    Insert(T),

    /// Remove the element at an index, shifting later elements down.
    /// Out of range is a no-op.
    Remove(usize),

    /// Reply with a copy of the element at an index, or `None` when the
    /// index is out of range.
    At(usize, oneshot::Sender<Option<T>>),

    /// Replace the element at an index with `updater(element)`.
    /// Out of range is a no-op.
    Update(usize, Updater<T>),

    /// Reply with the current element count.
    Len(oneshot::Sender<usize>),

    /// Stop the worker and reply with the final storage contents.
    Terminate(oneshot::Sender<Vec<T>>),
}

impl<T> Command<T> {
    /// Short action name for trace logging.
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Command::Insert(_) => "insert",
            Command::Remove(_) => "remove",
            Command::At(..) => "at",
            Command::Update(..) => "update",
            Command::Len(_) => "len",
            Command::Terminate(_) => "terminate",
        }
    }
}
