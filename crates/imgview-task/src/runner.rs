//! Caller-side task runner.
//!
//! [`TaskRunner`] pairs a [`WorkerPool`] with a completion queue that is
//! drained on the thread that owns the runner. Work closures run on the
//! pool; completion callbacks never do.
//!
//! # Lifetimes
//!
//! Every task is submitted with a `hold: Arc<H>`. The runner keeps one
//! strong clone in its pending table and moves another into the job, so
//! whatever `H` owns (typically an image view, and through it the parent
//! image) stays alive until the callback has returned, even if the caller
//! drops every other handle in the meantime.
//!
//! # Flow
//!
//! ```text
//! submit() ── Created ── Queued ──► pool ── Running ── work(&hold)
//!                                                         │
//!                        poll()/run() ◄── TaskId ─────────┘
//!                            │
//!                            └─ done(result), hold released, Completed
//! ```

use crate::{
    Job, RayonPool, RunnerConfig, StateCell, TaskError, TaskHandle, TaskId, TaskResult,
    TaskState, WorkerPool,
};
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};
use tracing::{debug, trace, warn};

/// A task waiting for its callback to be dispatched.
trait PendingTask {
    fn complete(self: Box<Self>);
}

struct Pending<H, T, E, D> {
    id: TaskId,
    state: StateCell,
    hold: Arc<H>,
    result: Receiver<Result<T, E>>,
    done: D,
}

impl<H, T, E, D> PendingTask for Pending<H, T, E, D>
where
    E: From<TaskError>,
    D: FnOnce(Result<T, E>),
{
    fn complete(self: Box<Self>) {
        let Pending {
            id,
            state,
            hold,
            result,
            done,
        } = *self;
        let result = result
            .try_recv()
            .unwrap_or_else(|_| Err(E::from(TaskError::Dropped(id))));
        done(result);
        drop(hold);
        state.set(TaskState::Completed);
        trace!(task = %id, "task completed, hold released");
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Schedules background work and dispatches completion callbacks on the
/// owning thread.
///
/// The runner is deliberately `!Send`: callbacks may capture non-`Send`
/// state (`Rc`, `RefCell`) and are only ever invoked from
/// [`poll`](Self::poll) or [`run`](Self::run) on the thread that owns it.
///
/// ```rust
/// use imgview_task::{RunnerConfig, TaskError, TaskRunner};
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use std::sync::Arc;
///
/// let runner = TaskRunner::new(&RunnerConfig::new().with_threads(2))?;
/// let total = Rc::new(Cell::new(0));
///
/// let seen = total.clone();
/// runner.submit(
///     Arc::new(vec![1, 2, 3]),
///     |v: &Vec<i32>| Ok::<_, TaskError>(v.iter().sum::<i32>()),
///     move |result| seen.set(result.unwrap()),
/// );
///
/// runner.run();
/// assert_eq!(total.get(), 6);
/// # Ok::<(), TaskError>(())
/// ```
pub struct TaskRunner {
    pool: Arc<dyn WorkerPool>,
    pending: RefCell<HashMap<TaskId, Box<dyn PendingTask>>>,
    next_id: Cell<u64>,
    done_tx: Sender<TaskId>,
    done_rx: Receiver<TaskId>,
}

impl TaskRunner {
    /// Creates a runner with a dedicated `rayon` pool.
    pub fn new(config: &RunnerConfig) -> TaskResult<Self> {
        Ok(Self::with_pool(Arc::new(RayonPool::new(config)?)))
    }

    /// Creates a runner on an existing pool.
    pub fn with_pool(pool: Arc<dyn WorkerPool>) -> Self {
        let (done_tx, done_rx) = channel();
        Self {
            pool,
            pending: RefCell::new(HashMap::new()),
            next_id: Cell::new(1),
            done_tx,
            done_rx,
        }
    }

    /// Worker threads available to this runner.
    pub fn threads(&self) -> usize {
        self.pool.threads()
    }

    /// Number of tasks whose callback has not run yet.
    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Submits `work` to run on the pool with a shared reference to `hold`.
    ///
    /// `done` receives the result exactly once, on this thread, from a later
    /// call to [`poll`](Self::poll) or [`run`](Self::run). A panic inside
    /// `work` is caught and delivered as `E::from(TaskError::Panicked(_))`.
    pub fn submit<H, T, E, W, D>(&self, hold: Arc<H>, work: W, done: D) -> TaskHandle
    where
        H: Send + Sync + 'static,
        T: Send + 'static,
        E: From<TaskError> + Send + 'static,
        W: FnOnce(&H) -> Result<T, E> + Send + 'static,
        D: FnOnce(Result<T, E>) + 'static,
    {
        let id = TaskId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        let state = StateCell::new();

        let (result_tx, result_rx) = channel();
        self.pending.borrow_mut().insert(
            id,
            Box::new(Pending {
                id,
                state: state.clone(),
                hold: Arc::clone(&hold),
                result: result_rx,
                done,
            }),
        );

        let worker_state = state.clone();
        let done_tx = self.done_tx.clone();
        let job: Job = Box::new(move || {
            worker_state.set(TaskState::Running);
            trace!(task = %id, "task running");
            let result = catch_unwind(AssertUnwindSafe(|| work(&hold))).unwrap_or_else(|payload| {
                let msg = panic_message(payload.as_ref());
                warn!(task = %id, panic = %msg, "task panicked");
                Err(E::from(TaskError::Panicked(msg)))
            });
            drop(hold);
            // the runner may already be gone; nobody is left to notify
            let _ = result_tx.send(result);
            let _ = done_tx.send(id);
        });

        state.set(TaskState::Queued);
        debug!(task = %id, pending = self.pending(), "task queued");
        self.pool.execute(job);
        TaskHandle::new(id, state)
    }

    fn dispatch(&self, id: TaskId) -> bool {
        // release the borrow before the callback so it can submit more work
        let entry = self.pending.borrow_mut().remove(&id);
        match entry {
            Some(task) => {
                trace!(task = %id, "dispatching callback");
                task.complete();
                true
            }
            None => {
                warn!(task = %id, "completion for unknown task");
                false
            }
        }
    }

    /// Dispatches callbacks for every task that has finished, without
    /// blocking. Returns the number of callbacks run.
    pub fn poll(&self) -> usize {
        let mut count = 0;
        loop {
            match self.done_rx.try_recv() {
                Ok(id) => count += usize::from(self.dispatch(id)),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        count
    }

    /// Blocks until every pending task, including tasks submitted by
    /// callbacks, has had its callback run. Returns the number of
    /// callbacks run.
    pub fn run(&self) -> usize {
        let mut count = 0;
        while self.pending() > 0 {
            match self.done_rx.recv() {
                Ok(id) => count += usize::from(self.dispatch(id)),
                Err(_) => break,
            }
        }
        debug!(callbacks = count, "runner drained");
        count
    }
}

impl Drop for TaskRunner {
    fn drop(&mut self) {
        let pending = self.pending.get_mut().len();
        if pending > 0 {
            warn!(pending, "task runner dropped with callbacks outstanding");
        }
    }
}

impl std::fmt::Debug for TaskRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskRunner")
            .field("threads", &self.threads())
            .field("pending", &self.pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;
    use std::sync::Mutex;

    /// Pool that queues jobs until told to run them on a helper thread.
    #[derive(Default)]
    struct ManualPool {
        jobs: Mutex<Vec<Job>>,
    }

    impl ManualPool {
        fn run_all(&self) {
            let jobs: Vec<Job> = std::mem::take(&mut *self.jobs.lock().unwrap());
            std::thread::spawn(move || jobs.into_iter().for_each(|job| job()))
                .join()
                .unwrap();
        }
    }

    impl WorkerPool for ManualPool {
        fn execute(&self, job: Job) {
            self.jobs.lock().unwrap().push(job);
        }

        fn threads(&self) -> usize {
            1
        }
    }

    #[derive(Debug, PartialEq)]
    enum OpError {
        Task(TaskError),
        Failed(&'static str),
    }

    impl From<TaskError> for OpError {
        fn from(e: TaskError) -> Self {
            OpError::Task(e)
        }
    }

    #[test]
    fn test_state_transitions() {
        let pool = Arc::new(ManualPool::default());
        let runner = TaskRunner::with_pool(pool.clone());
        let got = Rc::new(Cell::new(0));

        let seen = got.clone();
        let handle = runner.submit(
            Arc::new(20),
            |n: &i32| Ok::<_, OpError>(n + 1),
            move |r| seen.set(r.unwrap()),
        );
        assert_eq!(handle.state(), TaskState::Queued);
        assert_eq!(runner.poll(), 0);
        assert_eq!(runner.pending(), 1);

        pool.run_all();
        // finished on the worker but not yet dispatched
        assert_eq!(handle.state(), TaskState::Running);
        assert!(!handle.is_completed());
        assert_eq!(got.get(), 0);

        assert_eq!(runner.poll(), 1);
        assert_eq!(got.get(), 21);
        assert_eq!(handle.state(), TaskState::Completed);
        assert_eq!(runner.pending(), 0);
    }

    #[test]
    fn test_errors_reach_callback() {
        let pool = Arc::new(ManualPool::default());
        let runner = TaskRunner::with_pool(pool.clone());
        let got = Rc::new(RefCell::new(None));

        let seen = got.clone();
        runner.submit(
            Arc::new(()),
            |_: &()| Err::<(), _>(OpError::Failed("boom")),
            move |r| *seen.borrow_mut() = Some(r),
        );
        pool.run_all();
        runner.run();
        assert_eq!(*got.borrow(), Some(Err(OpError::Failed("boom"))));
    }

    #[test]
    fn test_panic_is_captured() {
        let runner = TaskRunner::new(&RunnerConfig::new().with_threads(1)).unwrap();
        let got = Rc::new(RefCell::new(None));

        let seen = got.clone();
        runner.submit(
            Arc::new(()),
            |_: &()| -> Result<(), OpError> { panic!("worker exploded") },
            move |r| *seen.borrow_mut() = Some(r),
        );
        assert_eq!(runner.run(), 1);
        assert_eq!(
            *got.borrow(),
            Some(Err(OpError::Task(TaskError::Panicked("worker exploded".into()))))
        );
    }

    #[test]
    fn test_hold_released_after_callback() {
        let pool = Arc::new(ManualPool::default());
        let runner = TaskRunner::with_pool(pool.clone());
        let hold = Arc::new(String::from("view"));
        let weak = Arc::downgrade(&hold);

        let probe = weak.clone();
        let alive_in_callback = Rc::new(Cell::new(false));
        let flag = alive_in_callback.clone();
        runner.submit(
            hold,
            |s: &String| Ok::<_, OpError>(s.len()),
            move |_| flag.set(probe.upgrade().is_some()),
        );
        pool.run_all();
        // worker clone is gone, pending clone keeps it alive
        assert!(weak.upgrade().is_some());
        runner.run();
        assert!(alive_in_callback.get());
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_callback_can_submit() {
        let runner = Rc::new(TaskRunner::new(&RunnerConfig::new().with_threads(2)).unwrap());
        let order = Rc::new(RefCell::new(Vec::new()));

        let inner_runner = runner.clone();
        let outer_order = order.clone();
        runner.submit(
            Arc::new(1),
            |n: &i32| Ok::<_, OpError>(*n),
            move |r| {
                outer_order.borrow_mut().push(r.unwrap());
                let inner_order = outer_order.clone();
                inner_runner.submit(
                    Arc::new(2),
                    |n: &i32| Ok::<_, OpError>(*n),
                    move |r| inner_order.borrow_mut().push(r.unwrap()),
                );
            },
        );
        assert_eq!(runner.run(), 2);
        assert_eq!(*order.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_callbacks_on_owner_thread() {
        let runner = TaskRunner::new(&RunnerConfig::new().with_threads(4)).unwrap();
        let owner = std::thread::current().id();
        let threads = Rc::new(RefCell::new(Vec::new()));
        for i in 0..16 {
            let seen = threads.clone();
            runner.submit(
                Arc::new(i),
                |_: &i32| Ok::<_, OpError>(std::thread::current().id()),
                move |r| seen.borrow_mut().push((r.unwrap(), std::thread::current().id())),
            );
        }
        assert_eq!(runner.run(), 16);
        for (worker, callback) in threads.borrow().iter() {
            assert_ne!(*worker, owner);
            assert_eq!(*callback, owner);
        }
    }
}
