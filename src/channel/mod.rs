//! Delay notification channel.
//!
//! A publish/subscribe abstraction over one persistent connection per
//! session. Events are broadcast: every subscriber sees every event, in
//! publish order, and filters on `receiver` itself (consumer-side policy,
//! not server-side routing).
//!
//! # Connection States
//!
//! `Connecting -> Open -> Closed`, with `Open -> Closed` also reachable
//! through [`NotificationChannel::fail`]. Publish policy per state:
//!
//! - `Connecting`: events are **queued** and flushed in FIFO order when
//!   the channel opens.
//! - `Open`: events are delivered immediately.
//! - `Closed`: publish returns [`ChannelError::Closed`]; nothing is
//!   silently lost.
//!
//! # Cancellation
//!
//! [`Subscription::cancel`] is idempotent and stops delivery immediately:
//! once it returns, the handler is never invoked again, including for a
//! broadcast already in flight.

mod codec;

pub use codec::{decode_event, encode_event};

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use log::{info, warn};
use thiserror::Error;

use crate::models::DelayEvent;

/// Connection state of the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// Connection establishment in progress; publishes queue.
    Connecting,
    /// Live; publishes deliver immediately.
    Open,
    /// Torn down (normally or via error); publishes are rejected.
    Closed,
}

/// Errors from the notification channel.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// Publish attempted on a closed channel.
    #[error("notification channel is closed")]
    Closed,
    /// A wire payload failed to decode.
    #[error("malformed delay event: {0}")]
    Decode(#[from] serde_json::Error),
}

type Handler = Box<dyn FnMut(&DelayEvent) + Send>;

struct Subscriber {
    id: u64,
    // Taken out of the slot for the duration of an invocation so the
    // registry lock is not held while user code runs.
    handler: Option<Handler>,
}

struct Inner {
    state: ChannelState,
    pending: VecDeque<DelayEvent>,
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

/// In-session broadcast hub for [`DelayEvent`]s.
///
/// Owned by a [`crate::session::ScheduleSession`] (or a test); cloning
/// shares the same underlying channel.
#[derive(Clone)]
pub struct NotificationChannel {
    inner: Arc<Mutex<Inner>>,
}

/// Handle to a registered subscriber.
pub struct Subscription {
    id: u64,
    inner: Weak<Mutex<Inner>>,
}

impl NotificationChannel {
    /// Creates a channel in the `Connecting` state.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state: ChannelState::Connecting,
                pending: VecDeque::new(),
                subscribers: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Current connection state.
    pub fn state(&self) -> ChannelState {
        self.lock().state
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    /// Marks the connection established and flushes queued events in
    /// publish order. Does nothing on an already-open channel; a closed
    /// channel cannot reopen.
    pub fn open(&self) {
        let flushed = {
            let mut inner = self.lock();
            match inner.state {
                ChannelState::Connecting => {
                    inner.state = ChannelState::Open;
                    inner.pending.drain(..).collect::<Vec<_>>()
                }
                ChannelState::Open => Vec::new(),
                ChannelState::Closed => {
                    warn!("notification channel cannot reopen after close");
                    Vec::new()
                }
            }
        };
        if !flushed.is_empty() {
            info!("notification channel open, flushing {} queued event(s)", flushed.len());
        }
        for event in &flushed {
            self.deliver(event);
        }
    }

    /// Closes the channel. Queued-but-unflushed events are dropped with a
    /// warning; subscribers are detached.
    pub fn close(&self) {
        let mut inner = self.lock();
        if inner.state == ChannelState::Closed {
            return;
        }
        if !inner.pending.is_empty() {
            warn!(
                "closing notification channel with {} undelivered queued event(s)",
                inner.pending.len()
            );
        }
        inner.state = ChannelState::Closed;
        inner.pending.clear();
        inner.subscribers.clear();
    }

    /// Closes the channel along the error path.
    pub fn fail(&self, reason: &str) {
        warn!("notification channel failed: {reason}");
        self.close();
    }

    /// Publishes an event to all subscribers.
    ///
    /// Fire-and-forget: no acknowledgement is modeled. While the channel
    /// is still connecting the event queues; on a closed channel the call
    /// fails with [`ChannelError::Closed`].
    pub fn publish(&self, event: DelayEvent) -> Result<(), ChannelError> {
        {
            let mut inner = self.lock();
            match inner.state {
                ChannelState::Closed => return Err(ChannelError::Closed),
                ChannelState::Connecting => {
                    inner.pending.push_back(event);
                    return Ok(());
                }
                ChannelState::Open => {}
            }
        }
        self.deliver(&event);
        Ok(())
    }

    /// Registers a handler invoked once per received event, in receipt
    /// order. The handler sees every event on the channel; filtering by
    /// `receiver` is the handler's own policy.
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: FnMut(&DelayEvent) + Send + 'static,
    {
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.push(Subscriber {
            id,
            handler: Some(Box::new(handler)),
        });
        Subscription {
            id,
            inner: Arc::downgrade(&self.inner),
        }
    }

    fn deliver(&self, event: &DelayEvent) {
        // Snapshot the roster, then invoke each handler with the lock
        // released so a handler may cancel (itself or others) mid-broadcast.
        let ids: Vec<u64> = self.lock().subscribers.iter().map(|s| s.id).collect();
        for id in ids {
            let taken = self
                .lock()
                .subscribers
                .iter_mut()
                .find(|s| s.id == id)
                .and_then(|s| s.handler.take());

            if let Some(mut handler) = taken {
                handler(event);
                // Keep the handler only if the subscription survived the call.
                if let Some(slot) = self.lock().subscribers.iter_mut().find(|s| s.id == id) {
                    slot.handler = Some(handler);
                }
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for NotificationChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for NotificationChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("NotificationChannel")
            .field("state", &inner.state)
            .field("subscribers", &inner.subscribers.len())
            .field("pending", &inner.pending.len())
            .finish()
    }
}

impl Subscription {
    /// Detaches the handler. Idempotent; after this returns the handler
    /// is never invoked again.
    pub fn cancel(&self) {
        if let Some(inner) = self.inner.upgrade() {
            let mut guard = inner.lock().unwrap_or_else(PoisonError::into_inner);
            guard.subscribers.retain(|s| s.id != self.id);
        }
    }

    /// Whether the subscription is still registered.
    pub fn is_active(&self) -> bool {
        self.inner
            .upgrade()
            .map(|inner| {
                let guard = inner.lock().unwrap_or_else(PoisonError::into_inner);
                guard.subscribers.iter().any(|s| s.id == self.id)
            })
            .unwrap_or(false)
    }
}
