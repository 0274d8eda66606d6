//! Cancellable delayed tasks.
//!
//! The supervisor never sleeps itself. It asks a [`Scheduler`] to post a
//! [`Fired`] back into its event loop later, and keeps the returned
//! [`TaskHandle`] so it can cancel that firing.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Identifies one scheduled firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

impl TaskId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// What a timer is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Reopen the channel after a close.
    Reconnect,
    /// Re-request the member list of the current room.
    RosterRefresh,
}

/// Delivered to the event loop when a task's delay elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub id: TaskId,
    pub task: Task,
}

/// Handle to a scheduled task. Dropping it does not cancel; call
/// [`TaskHandle::cancel`].
#[derive(Debug)]
pub struct TaskHandle {
    id: TaskId,
    token: CancellationToken,
}

impl TaskHandle {
    pub fn new(id: TaskId, token: CancellationToken) -> Self {
        Self { id, token }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

pub trait Scheduler {
    /// Arrange for `task` to fire once after `delay`.
    fn schedule(&mut self, delay: Duration, task: Task) -> TaskHandle;
}

/// Timers backed by `tokio::time`. Must be used inside a runtime.
#[derive(Debug)]
pub struct TokioScheduler {
    next_id: u64,
    fired: mpsc::UnboundedSender<Fired>,
}

impl TokioScheduler {
    pub fn new(fired: mpsc::UnboundedSender<Fired>) -> Self {
        Self { next_id: 0, fired }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, delay: Duration, task: Task) -> TaskHandle {
        self.next_id += 1;
        let id = TaskId::new(self.next_id);
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let fired = self.fired.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    // Receiver gone means the client shut down.
                    let _ = fired.send(Fired { id, task });
                }
            }
        });

        TaskHandle::new(id, token)
    }
}
