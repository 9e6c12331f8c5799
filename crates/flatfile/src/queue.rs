//! The write-serialization queue.
//!
//! All mutating operations against one collection funnel through a
//! per-instance FIFO so at most one read-modify-write cycle touches the
//! backend at a time. Two states exist: idle (no cycle running) and
//! busy (a drain task is working the queue). Submitting while idle
//! starts a drain task; submitting while busy appends to the tail and
//! returns without performing any I/O on the caller's stack.
//!
//! The drain task is an explicit pop-run-pop loop rather than a chain
//! of callbacks, so a deep backlog cannot grow the call stack, and it
//! is detached from the submitting callers: once queued, a transaction
//! always runs, even if its caller stops waiting.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use flatfile_core::Record;
use flatfile_store::Backend;
use tokio::sync::oneshot;

use crate::error::CrudError;

/// The in-memory mutation step of a transaction.
///
/// Applied to a freshly read snapshot; returns the records to commit
/// plus the value the caller gets back, or an error to abort the
/// transaction with no write performed.
pub(crate) type Mutator =
    Box<dyn FnOnce(Vec<Record>) -> Result<Commit, CrudError> + Send + 'static>;

/// A successful mutation: the full record set to persist and the
/// operation's declared result.
pub(crate) struct Commit {
    pub records: Vec<Record>,
    pub outcome: Record,
}

/// One pending or in-flight mutating request.
pub(crate) enum Transaction {
    /// Read the current records, apply the mutator, write the result.
    Mutate {
        mutate: Mutator,
        reply: oneshot::Sender<Result<Record, CrudError>>,
    },
    /// Replace the stored array unconditionally; the read phase is
    /// skipped because prior content does not matter.
    Replace {
        records: Vec<Record>,
        reply: oneshot::Sender<Result<(), CrudError>>,
    },
}

/// Per-collection queue state.
///
/// `busy` is true exactly while a drain task is running; `pending`
/// holds transactions in arrival order, which is also commit order.
struct QueueState {
    busy: bool,
    pending: VecDeque<Transaction>,
}

/// The write queue owned by one collection instance.
///
/// Collections over different files hold fully independent queues.
pub(crate) struct WriteQueue {
    state: Arc<Mutex<QueueState>>,
}

impl WriteQueue {
    pub(crate) fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(QueueState {
                busy: false,
                pending: VecDeque::new(),
            })),
        }
    }

    /// Enqueue a transaction, starting a drain task if the queue was
    /// idle.
    ///
    /// Returns immediately in both cases; the outcome arrives through
    /// the transaction's reply channel.
    pub(crate) fn submit<B: Backend + 'static>(&self, backend: &Arc<B>, transaction: Transaction) {
        let start_drain = {
            let mut state = self.state.lock().unwrap();
            state.pending.push_back(transaction);
            if state.busy {
                tracing::debug!(pending = state.pending.len(), "store busy, transaction queued");
                false
            } else {
                state.busy = true;
                true
            }
        };

        if start_drain {
            tokio::spawn(drain(Arc::clone(backend), Arc::clone(&self.state)));
        }
    }
}

/// Work the queue until it is empty, then flip back to idle.
///
/// Popping the next transaction and clearing `busy` happen under the
/// same lock acquisition, so a concurrent submit either observes a busy
/// queue (and appends) or a fully idle one (and starts the next drain).
async fn drain<B: Backend>(backend: Arc<B>, state: Arc<Mutex<QueueState>>) {
    loop {
        let transaction = {
            let mut state = state.lock().unwrap();
            match state.pending.pop_front() {
                Some(transaction) => transaction,
                None => {
                    state.busy = false;
                    return;
                }
            }
        };

        // A failed transaction reports its error and the loop moves on;
        // it never blocks the transactions behind it.
        match transaction {
            Transaction::Mutate { mutate, reply } => {
                let result = run_mutation(backend.as_ref(), mutate).await;
                if reply.send(result).is_err() {
                    tracing::warn!("transaction committed but its caller went away");
                }
            }
            Transaction::Replace { records, reply } => {
                let result = backend.write_all(&records).await.map_err(CrudError::from);
                if reply.send(result).is_err() {
                    tracing::warn!("transaction committed but its caller went away");
                }
            }
        }
    }
}

/// One read-modify-write cycle.
///
/// All-or-nothing: a read failure or mutator error returns before any
/// write is attempted, leaving the file exactly as it was.
async fn run_mutation<B: Backend + ?Sized>(
    backend: &B,
    mutate: Mutator,
) -> Result<Record, CrudError> {
    let current = backend.read_all().await?;
    let commit = mutate(current)?;
    backend.write_all(&commit.records).await?;
    Ok(commit.outcome)
}
