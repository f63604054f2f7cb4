//! Subscriber registry — fans out task events to every live listener.
//!
//! The registry is the only thing standing between an [`AgentExecutor`](crate::server::AgentExecutor)
//! publishing progress and the one or more consumers (an SSE response, an
//! internal persistence loop) that need to see every event in order. It is
//! deliberately built on [`mpsc::unbounded_channel`] rather than
//! `tokio::sync::broadcast`: a broadcast channel drops the oldest entry once
//! a lagging subscriber's buffer fills, which would silently break the
//! exactly-once-in-order delivery this module promises to each subscriber
//! independently of how fast the others drain.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use crate::types::{JsonRpcError, StreamResponse};

/// One item flowing through a task's event queue.
///
/// A [`TaskEvent::Error`] is not part of the wire-level [`StreamResponse`]
/// union; it is how an executor or the task manager signals a JSON-RPC-level
/// failure partway through a stream, after which the RPC layer emits a
/// `JsonRpcResponse` carrying the error and terminates the stream.
#[derive(Debug, Clone)]
pub enum TaskEvent {
    /// A regular status or artifact update.
    Update(StreamResponse),
    /// A terminal error. No further events follow.
    Error(JsonRpcError),
}

impl TaskEvent {
    /// Whether this event ends the stream — either a terminal status update
    /// or any error.
    pub fn is_final(&self) -> bool {
        match self {
            TaskEvent::Update(update) => update.is_final(),
            TaskEvent::Error(_) => true,
        }
    }
}

struct Subscriber {
    id: u64,
    tx: mpsc::UnboundedSender<TaskEvent>,
}

/// Registry of live subscribers, keyed by task ID.
///
/// `publish` holds the internal mutex only long enough to snapshot the
/// current subscriber list for a task; the actual channel sends happen
/// outside the lock, so a slow or stuck subscriber can never block
/// publication to the others.
#[derive(Debug, Default)]
pub struct SubscriberRegistry {
    subscribers: Mutex<HashMap<String, Vec<Subscriber>>>,
    next_id: AtomicU64,
}

impl SubscriberRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Subscribes to `task_id`, returning a queue that yields every event
    /// published from this point on.
    pub fn subscribe(self: &Arc<Self>, task_id: &str) -> SubscriberQueue {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();

        self.subscribers
            .lock()
            .expect("subscriber registry mutex poisoned")
            .entry(task_id.to_string())
            .or_default()
            .push(Subscriber { id, tx });

        SubscriberQueue {
            task_id: task_id.to_string(),
            id,
            rx,
            registry: Arc::clone(self),
            detached: false,
        }
    }

    /// Publishes `event` to every current subscriber of `task_id`.
    ///
    /// Silently does nothing if the task has no subscribers right now — the
    /// caller is never required to wait for a listener to show up.
    pub fn publish(&self, task_id: &str, event: TaskEvent) {
        let targets: Vec<mpsc::UnboundedSender<TaskEvent>> = {
            let subscribers = self
                .subscribers
                .lock()
                .expect("subscriber registry mutex poisoned");
            match subscribers.get(task_id) {
                Some(subs) => subs.iter().map(|s| s.tx.clone()).collect(),
                None => return,
            }
        };

        for tx in targets {
            // A closed receiver just means that subscriber already detached;
            // nothing else needs the event, so a dropped send is fine.
            let _ = tx.send(event.clone());
        }
    }

    /// Removes subscriber `id` from `task_id`'s list.
    ///
    /// Idempotent — detaching twice, or detaching an ID that is already
    /// gone, is a no-op.
    pub fn detach(&self, task_id: &str, id: u64) {
        let mut subscribers = self
            .subscribers
            .lock()
            .expect("subscriber registry mutex poisoned");
        if let Some(subs) = subscribers.get_mut(task_id) {
            subs.retain(|s| s.id != id);
            if subs.is_empty() {
                subscribers.remove(task_id);
            }
        }
    }

    /// Returns a [`Publisher`] bound to `task_id`.
    pub fn publisher(self: &Arc<Self>, task_id: impl Into<String>) -> Publisher {
        Publisher {
            task_id: task_id.into(),
            registry: Arc::clone(self),
        }
    }
}

/// A live subscription to one task's event stream.
///
/// Dropping a `SubscriberQueue` — however that happens, including the
/// consumer side of an SSE response being cancelled — detaches it from the
/// registry. `detach` is also safe to call explicitly and is idempotent, so
/// a consumer loop that runs to completion and calls it directly does not
/// conflict with the `Drop` impl doing it again.
pub struct SubscriberQueue {
    task_id: String,
    id: u64,
    rx: mpsc::UnboundedReceiver<TaskEvent>,
    registry: Arc<SubscriberRegistry>,
    detached: bool,
}

impl SubscriberQueue {
    /// The task this queue is subscribed to.
    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    /// Waits for the next event, or `None` once the publishing side is gone
    /// (the registry was dropped — never happens while the owning task
    /// manager is alive).
    pub async fn recv(&mut self) -> Option<TaskEvent> {
        self.rx.recv().await
    }

    /// Polls for an already-buffered event without waiting. Used to drain
    /// any events a publisher enqueued just before its executor task
    /// finished, so a race between the two is never lossy.
    pub fn try_recv(&mut self) -> Option<TaskEvent> {
        self.rx.try_recv().ok()
    }

    /// Detaches this queue from the registry. Safe to call more than once.
    pub fn detach(&mut self) {
        if !self.detached {
            self.registry.detach(&self.task_id, self.id);
            self.detached = true;
        }
    }
}

impl Drop for SubscriberQueue {
    fn drop(&mut self) {
        self.detach();
    }
}

/// A handle an [`AgentExecutor`](crate::server::AgentExecutor) uses to
/// publish events for a single task, without seeing the registry itself or
/// who (if anyone) is currently listening.
#[derive(Clone)]
pub struct Publisher {
    task_id: String,
    registry: Arc<SubscriberRegistry>,
}

impl Publisher {
    /// The task this publisher is bound to.
    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    /// Publishes a status or artifact update.
    pub fn publish(&self, event: StreamResponse) {
        self.registry.publish(&self.task_id, TaskEvent::Update(event));
    }

    /// Publishes a terminal error, ending the stream for every subscriber.
    pub fn publish_error(&self, error: JsonRpcError) {
        self.registry.publish(&self.task_id, TaskEvent::Error(error));
    }
}
