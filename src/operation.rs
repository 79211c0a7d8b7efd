use crate::block_position::BlockPosition;
use crate::error::EditError;
use crate::pattern::Pattern;
use crate::region::Region;
use crate::session::EditSession;
use chrono::{DateTime, Utc};
use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;
use smol_str::SmolStr;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// A shared cancellation flag, safe to trip from any thread. Observed
/// cooperatively between steps; nothing in flight is interrupted.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Passed into each `resume` call; carries the cancellation flag for the
/// running operation.
pub struct RunContext {
    token: CancelToken,
}

impl RunContext {
    pub fn new(token: CancelToken) -> Self {
        RunContext { token }
    }

    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// More steps remain; call `resume` again.
    Continue,
    Done,
}

/// A cooperatively steppable unit of long-running bulk work. Steps should
/// be small enough that stopping between two of them is an acceptable
/// granularity; a half-applied step is never rolled back.
pub trait Operation: Send {
    fn resume(&mut self, ctx: &RunContext) -> Result<Progress, EditError>;

    fn name(&self) -> &str {
        "operation"
    }

    /// Cells changed so far, reported in cancellation errors.
    fn affected(&self) -> u64 {
        0
    }
}

/// Drive an operation to completion on the current thread, checking the
/// cancellation flag between steps.
pub fn complete(operation: &mut dyn Operation, ctx: &RunContext) -> Result<(), EditError> {
    loop {
        if ctx.is_cancelled() {
            return Err(EditError::Cancelled {
                affected: operation.affected(),
            });
        }
        match operation.resume(ctx)? {
            Progress::Continue => continue,
            Progress::Done => return Ok(()),
        }
    }
}

/// Runs a list of operations in order, each to completion.
#[derive(Default)]
pub struct OperationQueue {
    operations: VecDeque<Box<dyn Operation>>,
}

impl OperationQueue {
    pub fn new() -> Self {
        OperationQueue::default()
    }

    pub fn offer(&mut self, operation: Box<dyn Operation>) {
        self.operations.push_back(operation);
    }
}

impl Operation for OperationQueue {
    fn resume(&mut self, ctx: &RunContext) -> Result<Progress, EditError> {
        match self.operations.front_mut() {
            None => Ok(Progress::Done),
            Some(current) => {
                if let Progress::Done = current.resume(ctx)? {
                    self.operations.pop_front();
                }
                if self.operations.is_empty() {
                    Ok(Progress::Done)
                } else {
                    Ok(Progress::Continue)
                }
            }
        }
    }

    fn name(&self) -> &str {
        "queue"
    }
}

/// A region fill decomposed into fixed-size batches of cells, so a
/// scheduler can interleave and cancel it. Owns its session; take it back
/// with `into_session` when the operation settles.
pub struct FillOperation {
    session: EditSession,
    pattern: Box<dyn Pattern>,
    positions: Vec<BlockPosition>,
    cursor: usize,
    batch_size: usize,
    affected: u64,
}

impl FillOperation {
    pub const DEFAULT_BATCH: usize = 4096;

    pub fn new(session: EditSession, region: &dyn Region, pattern: Box<dyn Pattern>) -> Self {
        FillOperation {
            session,
            pattern,
            positions: region.blocks().collect(),
            cursor: 0,
            batch_size: Self::DEFAULT_BATCH,
            affected: 0,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn into_session(self) -> EditSession {
        self.session
    }
}

impl Operation for FillOperation {
    fn resume(&mut self, _ctx: &RunContext) -> Result<Progress, EditError> {
        let end = (self.cursor + self.batch_size).min(self.positions.len());
        for index in self.cursor..end {
            let position = self.positions[index];
            let block = self.pattern.apply(position);
            if self.session.set_block(position, &block)? {
                self.affected += 1;
            }
        }
        self.cursor = end;
        if self.cursor >= self.positions.len() {
            Ok(Progress::Done)
        } else {
            Ok(Progress::Continue)
        }
    }

    fn name(&self) -> &str {
        "fill"
    }

    fn affected(&self) -> u64 {
        self.affected
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationState {
    Queued,
    Running,
    Completed,
    Cancelled,
    Failed,
}

/// Shared handle to an in-flight operation: identity, cancellation and
/// state.
#[derive(Clone)]
pub struct OperationHandle {
    id: u64,
    name: SmolStr,
    token: CancelToken,
    state: Arc<Mutex<OperationState>>,
    started_at: DateTime<Utc>,
    started: Instant,
}

impl OperationHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn state(&self) -> OperationState {
        *self.state.lock()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    fn set_state(&self, state: OperationState) {
        *self.state.lock() = state;
    }
}

/// Process-wide tracking of in-flight operations. Explicitly owned by the
/// host (constructed at startup, dropped at shutdown), not a global.
#[derive(Default)]
pub struct OperationRegistry {
    operations: Mutex<Vec<OperationHandle>>,
    next_id: AtomicU64,
}

impl OperationRegistry {
    pub fn new() -> Self {
        OperationRegistry::default()
    }

    pub fn register(&self, name: impl Into<SmolStr>) -> OperationHandle {
        let handle = OperationHandle {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
            token: CancelToken::new(),
            state: Arc::new(Mutex::new(OperationState::Queued)),
            started_at: Utc::now(),
            started: Instant::now(),
        };
        self.operations.lock().push(handle.clone());
        debug!(id = handle.id, name = %handle.name, "operation registered");
        handle
    }

    /// Every operation still queued or running.
    pub fn list(&self) -> Vec<OperationHandle> {
        self.operations
            .lock()
            .iter()
            .filter(|h| matches!(h.state(), OperationState::Queued | OperationState::Running))
            .cloned()
            .collect()
    }

    /// Cancel one operation by id. Returns false for unknown or settled
    /// ids.
    pub fn cancel(&self, id: u64) -> bool {
        let operations = self.operations.lock();
        match operations.iter().find(|h| h.id == id) {
            Some(handle)
                if matches!(
                    handle.state(),
                    OperationState::Queued | OperationState::Running
                ) =>
            {
                handle.cancel();
                info!(id, "operation cancelled");
                true
            }
            _ => false,
        }
    }

    /// Cancel everything in flight, returning the affected handles.
    pub fn cancel_all(&self) -> Vec<OperationHandle> {
        let cancelled: Vec<OperationHandle> = self.list();
        for handle in &cancelled {
            handle.cancel();
        }
        if !cancelled.is_empty() {
            info!(count = cancelled.len(), "cancelled all operations");
        }
        cancelled
    }

    /// Drop settled operations from the listing.
    pub fn sweep(&self) {
        self.operations.lock().retain(|h| {
            matches!(h.state(), OperationState::Queued | OperationState::Running)
        });
    }
}

type Job = Box<dyn FnOnce() + Send>;

/// A single background worker draining a job queue, so long edits do not
/// block the invoking thread. Results come back on a per-job channel.
pub struct Executor {
    sender: Option<Sender<Job>>,
    worker: Option<JoinHandle<()>>,
}

impl Executor {
    pub fn new() -> Self {
        let (sender, receiver): (Sender<Job>, Receiver<Job>) = crossbeam_channel::unbounded();
        let worker = std::thread::Builder::new()
            .name("voxedit-executor".to_string())
            .spawn(move || {
                for job in receiver {
                    job();
                }
            })
            .expect("failed to spawn executor thread");
        Executor {
            sender: Some(sender),
            worker: Some(worker),
        }
    }

    /// Submit an operation under a registry handle. The returned channel
    /// yields the settled operation together with its outcome; the
    /// operation itself always comes back, so partially-applied work (and
    /// its journal) is recoverable after cancellation.
    pub fn submit<O>(
        &self,
        handle: OperationHandle,
        mut operation: O,
    ) -> Receiver<(O, Result<(), EditError>)>
    where
        O: Operation + 'static,
    {
        let (result_tx, result_rx) = crossbeam_channel::bounded(1);
        let job: Job = Box::new(move || {
            handle.set_state(OperationState::Running);
            let ctx = RunContext::new(handle.token());
            let outcome = complete(&mut operation, &ctx);
            match &outcome {
                Ok(()) => handle.set_state(OperationState::Completed),
                Err(EditError::Cancelled { .. }) => handle.set_state(OperationState::Cancelled),
                Err(_) => handle.set_state(OperationState::Failed),
            }
            let _ = result_tx.send((operation, outcome));
        });
        self.sender
            .as_ref()
            .expect("executor already shut down")
            .send(job)
            .expect("executor thread gone");
        result_rx
    }
}

impl Default for Executor {
    fn default() -> Self {
        Executor::new()
    }
}

impl Drop for Executor {
    fn drop(&mut self) {
        drop(self.sender.take());
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
