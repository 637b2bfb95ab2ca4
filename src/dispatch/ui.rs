//! Serial UI execution context.
//!
//! A single FIFO channel with exactly one consumer. Everything posted from any
//! thread runs on the consumer in posting order.

use crate::error::{Result, SyncError};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

type Task = Box<dyn FnOnce() + Send + 'static>;

/// Create a connected UI context and its queue.
pub fn ui_context() -> (UiContext, UiQueue) {
    let (sender, receiver) = unbounded();
    let panics = Arc::new(AtomicU64::new(0));

    (
        UiContext {
            sender,
            panics: panics.clone(),
        },
        UiQueue { receiver, panics },
    )
}

/// Sending half: posts tasks onto the UI context. Never blocks.
#[derive(Clone)]
pub struct UiContext {
    sender: Sender<Task>,
    panics: Arc<AtomicU64>,
}

impl UiContext {
    /// Queue `task` to run on the UI context after everything posted before it.
    pub fn post<F>(&self, task: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.sender
            .send(Box::new(task))
            .map_err(|_| SyncError::UiContextClosed)
    }

    /// Tasks waiting to run.
    pub fn pending(&self) -> usize {
        self.sender.len()
    }

    /// Tasks that panicked on the UI context so far.
    pub fn panic_count(&self) -> u64 {
        self.panics.load(Ordering::Relaxed)
    }
}

/// Receiving half. Whoever holds this is the UI context.
pub struct UiQueue {
    receiver: Receiver<Task>,
    panics: Arc<AtomicU64>,
}

impl UiQueue {
    /// Run every task already queued, without waiting. Returns how many ran.
    ///
    /// Meant to be pumped from a host application's main loop.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.receiver.try_recv() {
            self.execute(task);
            ran += 1;
        }
        ran
    }

    /// Wait up to `timeout` for one task and run it.
    pub fn run_one_timeout(&self, timeout: Duration) -> bool {
        match self.receiver.recv_timeout(timeout) {
            Ok(task) => {
                self.execute(task);
                true
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => false,
        }
    }

    /// Run tasks until every `UiContext` has been dropped and the queue drains.
    pub fn run(self) {
        while let Ok(task) = self.receiver.recv() {
            self.execute(task);
        }
        tracing::debug!(panics = self.panics.load(Ordering::Relaxed), "ui.queue.closed");
    }

    /// Run the queue on a dedicated thread.
    pub fn spawn(self, name: impl Into<String>) -> std::io::Result<JoinHandle<()>> {
        thread::Builder::new().name(name.into()).spawn(move || self.run())
    }

    pub fn panic_count(&self) -> u64 {
        self.panics.load(Ordering::Relaxed)
    }

    /// A panicking task is contained to itself; the queue keeps running.
    fn execute(&self, task: Task) {
        if let Err(payload) = catch_unwind(AssertUnwindSafe(task)) {
            self.panics.fetch_add(1, Ordering::Relaxed);
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_string());
            tracing::error!(panic = %message, "ui.task.panic");
        }
    }
}
