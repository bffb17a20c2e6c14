//! Bounded waits on catalog calls, and the cancellable task handles that own them

use super::error::BrowseError;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// What a timeout hook wants done with a wait that ran out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnTimeout {
    /// Wait another round on the same call
    KeepWaiting,
    /// Stop waiting; the caller decides whether to issue a new call
    GiveUp,
}

/// Wait on a catalog call in rounds of `timeout`.
///
/// The call is never dropped between rounds: after each expired round
/// `on_timeout` runs (with the number of rounds so far) and either keeps
/// waiting on the same call or gives up with [`BrowseError::FetchTimeout`].
/// A call that resolves to an error becomes [`BrowseError::FetchFailed`].
pub async fn await_pending<F, T, H>(
    mut call: F,
    timeout: Duration,
    mut on_timeout: H,
) -> Result<T, BrowseError>
where
    F: Future<Output = anyhow::Result<T>> + Unpin,
    H: FnMut(u32) -> OnTimeout,
{
    let mut rounds = 0;
    loop {
        match tokio::time::timeout(timeout, &mut call).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(e)) => return Err(BrowseError::FetchFailed(format!("{:#}", e))),
            Err(_) => {
                rounds += 1;
                debug!("Catalog call still pending after {} round(s)", rounds);
                if on_timeout(rounds) == OnTimeout::GiveUp {
                    return Err(BrowseError::FetchTimeout);
                }
            }
        }
    }
}

/// Proof that a task was the latest one started on its slot
#[derive(Debug, Clone)]
pub struct TaskTicket {
    generation: Arc<AtomicU64>,
    issued: u64,
}

impl TaskTicket {
    /// `false` once the slot was cancelled or a newer task replaced this one.
    /// Check it under the same lock the result is applied with.
    pub fn is_current(&self) -> bool {
        self.generation.load(Ordering::SeqCst) == self.issued
    }
}

/// Holds at most one in-flight task; starting another cancels the previous one
#[derive(Debug, Default)]
pub struct TaskSlot {
    generation: Arc<AtomicU64>,
    handle: Option<JoinHandle<()>>,
}

impl TaskSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidate outstanding tickets and abort the running task
    pub fn cancel(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Cancel the predecessor and spawn `make(ticket)` on the runtime
    pub fn spawn<F, Fut>(&mut self, make: F)
    where
        F: FnOnce(TaskTicket) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let ticket = self.ticket();
        self.handle = Some(tokio::spawn(make(ticket)));
    }

    /// Ticket for work done synchronously on the current generation
    pub fn ticket(&self) -> TaskTicket {
        TaskTicket {
            generation: Arc::clone(&self.generation),
            issued: self.generation.load(Ordering::SeqCst),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for TaskSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}
