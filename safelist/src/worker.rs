//! The worker task: sole owner of the backing storage.
//!
//! One worker runs per list instance. It drains the mailbox one command at
//! a time, so every mutation applies atomically relative to all others and
//! the storage is never locked — no second reader or writer path exists.
//! Index validity is checked here, against the length at processing time,
//! never at send time.

use std::cell::Cell;

use tokio::sync::mpsc;

use crate::command::Command;

thread_local! {
    /// Id of the list whose updater is currently executing on this thread.
    ///
    /// Tagged for the duration of a caller-supplied updater so a reentrant
    /// handle call against the same list fails fast instead of deadlocking
    /// the worker (see the hazard note on `SafeList::update`).
    static ACTIVE_UPDATER: Cell<Option<u64>> = const { Cell::new(None) };
}

/// True when the current thread is inside an updater belonging to `list_id`.
pub(crate) fn inside_updater(list_id: u64) -> bool {
    ACTIVE_UPDATER.with(|slot| slot.get() == Some(list_id))
}

/// Tags the thread for the lifetime of one updater call.
///
/// Restores the previous tag on drop, including during unwind if the
/// updater panics.
struct UpdaterScope {
    previous: Option<u64>,
}

impl UpdaterScope {
    fn enter(list_id: u64) -> Self {
        let previous = ACTIVE_UPDATER.with(|slot| slot.replace(Some(list_id)));
        Self { previous }
    }
}

impl Drop for UpdaterScope {
    fn drop(&mut self) {
        let previous = self.previous;
        ACTIVE_UPDATER.with(|slot| slot.set(previous));
    }
}

/// Message loop for one list instance.
///
/// Owns the storage exclusively from spawn to exit. Exits when a
/// `Terminate` command arrives (after replying with the final snapshot) or
/// when every handle has been dropped and the mailbox closes.
pub(crate) async fn run<T: Clone + Send + 'static>(
    list_id: u64,
    mut mailbox: mpsc::Receiver<Command<T>>,
) {
    let mut storage: Vec<T> = Vec::new();
    tracing::debug!(list_id, "worker started");

    while let Some(command) = mailbox.recv().await {
        tracing::trace!(
            list_id,
            kind = command.kind(),
            len = storage.len(),
            "applying command"
        );

        match command {
            Command::Insert(item) => storage.push(item),

            Command::Remove(index) => {
                // O(n): later elements shift down by one.
                if index < storage.len() {
                    storage.remove(index);
                } else {
                    tracing::debug!(list_id, index, len = storage.len(), "remove out of range");
                }
            }

            Command::At(index, reply) => {
                // The caller may have given up on the reply; that is fine.
                let _ = reply.send(storage.get(index).cloned());
            }

            Command::Update(index, updater) => {
                if let Some(slot) = storage.get_mut(index) {
                    let guard = UpdaterScope::enter(list_id);
                    let updated = updater(slot.clone());
                    drop(guard);
                    *slot = updated;
                } else {
                    tracing::debug!(list_id, index, len = storage.len(), "update out of range");
                }
            }

            Command::Len(reply) => {
                let _ = reply.send(storage.len());
            }

            Command::Terminate(reply) => {
                tracing::debug!(list_id, len = storage.len(), "terminate received, worker closing");
                // Senders racing with the close fail promptly instead of
                // queueing commands nobody will ever read.
                mailbox.close();
                let _ = reply.send(storage);
                return;
            }
        }
    }

    tracing::debug!(list_id, "all handles dropped, worker exiting");
}
