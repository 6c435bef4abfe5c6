//! Worker pool for CPU-bound parse jobs
//!
//! Jobs run on dedicated OS threads fed from a FIFO queue. Each submitted task gets
//! a monotonic id; its waiter sits in a map until exactly one result is delivered.
//! A panicking job is caught, the task is rejected with
//! [`ExecutionError::WorkerCrashed`], and the crashed worker hands its slot to a
//! fresh thread so the pool stays at full strength.

use crate::config::WorkerPoolConfig;
use crate::utils::error::{OrchestratorError, Result};
use async_trait::async_trait;
use crossbeam::channel::{self, Receiver, Sender};
use futures::future::join_all;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::task::{Context, Poll};
use std::thread::JoinHandle;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use super::classifier::classify;
use super::dispatcher::panic_message;
use super::traits::Dispatch;
use super::types::{DispatchOutcome, ExecutionError, WorkItem};

/// Synchronous job run by a worker for each task
pub type ParseJob = Arc<dyn Fn(&WorkItem) -> std::result::Result<Value, ExecutionError> + Send + Sync>;

type TaskResult = std::result::Result<Value, ExecutionError>;

/// Pool-level events that belong to no waiting task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolEvent {
    /// A worker crashed on a task nobody was waiting for anymore
    OrphanCrash {
        worker_id: usize,
        task_id: u64,
        cause: String,
    },
}

struct Task {
    id: u64,
    item: WorkItem,
}

struct PoolShared {
    job: ParseJob,
    queue: Receiver<Task>,
    waiters: Mutex<HashMap<u64, oneshot::Sender<TaskResult>>>,
    live: AtomicUsize,
    next_worker_id: AtomicUsize,
    handles: Mutex<Vec<JoinHandle<()>>>,
    events: mpsc::UnboundedSender<PoolEvent>,
    size: usize,
}

impl PoolShared {
    /// Claim a worker slot if the pool is below its size
    fn reserve_slot(&self) -> bool {
        self.live
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |live| {
                (live < self.size).then_some(live + 1)
            })
            .is_ok()
    }

    /// Start a thread on an already reserved slot
    fn spawn_worker(shared: &Arc<Self>) -> std::io::Result<()> {
        let worker_id = shared.next_worker_id.fetch_add(1, Ordering::Relaxed);
        let worker_shared = Arc::clone(shared);

        let handle = std::thread::Builder::new()
            .name(format!("registry-parse-{}", worker_id))
            .spawn(move || worker_loop(worker_shared, worker_id))?;

        shared.handles.lock().push(handle);
        debug!(worker_id, "Worker thread started");
        Ok(())
    }

    /// Hand the result to the task's waiter; false when nobody is waiting
    fn resolve(&self, task_id: u64, result: TaskResult) -> bool {
        match self.waiters.lock().remove(&task_id) {
            Some(waiter) => waiter.send(result).is_ok(),
            None => false,
        }
    }

    fn join_all(&self) {
        // Crashed workers push their replacement before exiting, so keep popping
        loop {
            let Some(handle) = self.handles.lock().pop() else {
                break;
            };
            if handle.join().is_err() {
                warn!("Worker thread exited abnormally");
            }
        }
    }
}

fn worker_loop(shared: Arc<PoolShared>, worker_id: usize) {
    loop {
        let Ok(task) = shared.queue.recv() else {
            // Queue closed and empty
            shared.live.fetch_sub(1, Ordering::AcqRel);
            debug!(worker_id, "Worker thread stopped");
            return;
        };

        let job = Arc::clone(&shared.job);
        match catch_unwind(AssertUnwindSafe(|| job(&task.item))) {
            Ok(result) => {
                if !shared.resolve(task.id, result) {
                    debug!(task_id = task.id, "Task finished after its waiter left");
                }
            }
            Err(panic) => {
                let cause = panic_message(panic.as_ref());
                error!(
                    worker_id,
                    task_id = task.id,
                    key = %task.item.key,
                    "Worker crashed: {}",
                    cause
                );

                // The slot passes to the replacement; this thread does not release it
                if let Err(e) = PoolShared::spawn_worker(&shared) {
                    shared.live.fetch_sub(1, Ordering::AcqRel);
                    error!(worker_id, "Failed to replace crashed worker: {}", e);
                }

                let crash = ExecutionError::WorkerCrashed {
                    task_id: task.id,
                    key: task.item.key.clone(),
                    cause: cause.clone(),
                };
                if !shared.resolve(task.id, Err(crash)) {
                    let _ = shared.events.send(PoolEvent::OrphanCrash {
                        worker_id,
                        task_id: task.id,
                        cause,
                    });
                }
                return;
            }
        }
    }
}

/// Future of one submitted task
#[derive(Debug)]
pub struct TaskHandle {
    task_id: u64,
    key: String,
    receiver: oneshot::Receiver<TaskResult>,
}

impl TaskHandle {
    pub fn task_id(&self) -> u64 {
        self.task_id
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Future for TaskHandle {
    type Output = TaskResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let task_id = self.task_id;
        let key = self.key.clone();
        Pin::new(&mut self.receiver).poll(cx).map(|received| {
            received.unwrap_or_else(|_| {
                Err(ExecutionError::WorkerCrashed {
                    task_id,
                    key,
                    cause: "task dropped without a result".to_string(),
                })
            })
        })
    }
}

/// Fixed-size pool of parse worker threads
pub struct WorkerPool {
    shared: Arc<PoolShared>,
    sender: Mutex<Option<Sender<Task>>>,
    next_task_id: AtomicU64,
    events: Mutex<mpsc::UnboundedReceiver<PoolEvent>>,
}

impl WorkerPool {
    /// Create a pool of up to `number_of_threads` workers; threads start on demand
    pub fn new(number_of_threads: usize, job: ParseJob) -> Self {
        let size = number_of_threads.max(1);
        let (sender, queue) = channel::unbounded();
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        info!(size, "Worker pool created");
        Self {
            shared: Arc::new(PoolShared {
                job,
                queue,
                waiters: Mutex::new(HashMap::new()),
                live: AtomicUsize::new(0),
                next_worker_id: AtomicUsize::new(0),
                handles: Mutex::new(Vec::new()),
                events: events_tx,
                size,
            }),
            sender: Mutex::new(Some(sender)),
            next_task_id: AtomicU64::new(1),
            events: Mutex::new(events_rx),
        }
    }

    /// Create a pool sized from configuration
    pub fn from_config(config: &WorkerPoolConfig, job: ParseJob) -> Self {
        Self::new(config.number_of_threads, job)
    }

    /// Create a pool from a closure job
    pub fn with_job<F>(number_of_threads: usize, job: F) -> Self
    where
        F: Fn(&WorkItem) -> std::result::Result<Value, ExecutionError> + Send + Sync + 'static,
    {
        Self::new(number_of_threads, Arc::new(job))
    }

    /// Queue a task; the returned handle resolves exactly once
    pub fn submit(&self, item: WorkItem) -> Result<TaskHandle> {
        let sender = self
            .sender
            .lock()
            .clone()
            .ok_or(OrchestratorError::PoolClosed)?;

        let task_id = self.next_task_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        self.shared.waiters.lock().insert(task_id, tx);

        let key = item.key.clone();
        if sender.send(Task { id: task_id, item }).is_err() {
            self.shared.waiters.lock().remove(&task_id);
            return Err(OrchestratorError::PoolClosed);
        }

        // One new thread per submission until the pool is full
        if self.shared.reserve_slot() {
            if let Err(e) = PoolShared::spawn_worker(&self.shared) {
                let remaining = self.shared.live.fetch_sub(1, Ordering::AcqRel) - 1;
                error!("Failed to start worker thread: {}", e);
                if remaining == 0 {
                    self.shared.waiters.lock().remove(&task_id);
                    return Err(OrchestratorError::Io(e));
                }
            }
        }

        Ok(TaskHandle {
            task_id,
            key,
            receiver: rx,
        })
    }

    /// Stop accepting tasks, finish everything queued, and join all workers
    pub async fn drain(&self) -> Result<()> {
        if self.sender.lock().take().is_none() {
            return Ok(());
        }

        let shared = Arc::clone(&self.shared);
        tokio::task::spawn_blocking(move || shared.join_all()).await?;

        info!("Worker pool drained");
        Ok(())
    }

    /// Threads currently holding a worker slot
    pub fn live_workers(&self) -> usize {
        self.shared.live.load(Ordering::Acquire)
    }

    pub fn size(&self) -> usize {
        self.shared.size
    }

    pub fn is_closed(&self) -> bool {
        self.sender.lock().is_none()
    }

    /// Events raised since the last call
    pub fn drain_events(&self) -> Vec<PoolEvent> {
        let mut receiver = self.events.lock();
        std::iter::from_fn(|| receiver.try_recv().ok()).collect()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Workers exit on their own once the queue is empty
        self.sender.get_mut().take();
    }
}

#[async_trait]
impl Dispatch for WorkerPool {
    async fn dispatch(&self, items: Vec<WorkItem>) -> DispatchOutcome {
        let submitted: Vec<_> = items
            .into_iter()
            .map(|item| {
                let handle = self.submit(item.clone());
                (item, handle)
            })
            .collect();

        let settled = join_all(submitted.into_iter().map(|(item, handle)| async move {
            let result = match handle {
                Ok(handle) => handle.await,
                Err(e) => Err(ExecutionError::retryable(e.to_string())),
            };
            (item, classify(result))
        }))
        .await;

        settled.into_iter().collect()
    }

    fn name(&self) -> &'static str {
        "worker-pool"
    }

    fn take_events(&self) -> Vec<PoolEvent> {
        self.drain_events()
    }
}
