//! Cross-thread hand-off for direct-surface geometry changes.
//!
//! Geometry changes must run on the thread that owns the surface. Other threads post a request
//! and carry on; while one request is still waiting, further requests are dropped rather than
//! queued, so the owner only ever sees the first pending change.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread::{self, ThreadId};

/// How [`MainThreadProxy::request`] handled a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProxyOutcome {
    /// Called on the owner thread and applied inline.
    Applied,
    /// Sent to the owner; applied on the next [`ProxyReceiver::drain`].
    Posted,
    /// Dropped because another request was still in flight or the receiver is gone.
    Coalesced,
}

pub struct MainThreadProxy<T> {
    owner: ThreadId,
    tx: mpsc::Sender<T>,
    in_flight: Arc<AtomicBool>,
}

impl<T> Clone for MainThreadProxy<T> {
    fn clone(&self) -> Self {
        Self {
            owner: self.owner,
            tx: self.tx.clone(),
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

/// Owner-side end of a [`MainThreadProxy`].
pub struct ProxyReceiver<T> {
    rx: mpsc::Receiver<T>,
    in_flight: Arc<AtomicBool>,
}

impl<T> MainThreadProxy<T> {
    /// Proxy owned by the calling thread, and the receiver that thread drains.
    pub fn new() -> (Self, ProxyReceiver<T>) {
        let (tx, rx) = mpsc::channel();
        let in_flight = Arc::new(AtomicBool::new(false));
        (
            Self {
                owner: thread::current().id(),
                tx,
                in_flight: Arc::clone(&in_flight),
            },
            ProxyReceiver { rx, in_flight },
        )
    }

    pub fn is_owner_thread(&self) -> bool {
        thread::current().id() == self.owner
    }

    /// `true` while a posted request waits for [`ProxyReceiver::drain`].
    pub fn is_pending(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn request(&self, req: T, apply: impl FnOnce(T)) -> ProxyOutcome {
        if self.is_owner_thread() {
            apply(req);
            return ProxyOutcome::Applied;
        }
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return ProxyOutcome::Coalesced;
        }
        if self.tx.send(req).is_err() {
            self.in_flight.store(false, Ordering::Release);
            tracing::debug!("proxy receiver dropped; request discarded");
            return ProxyOutcome::Coalesced;
        }
        ProxyOutcome::Posted
    }
}

impl<T> ProxyReceiver<T> {
    /// Apply every pending request in arrival order. Returns how many ran.
    pub fn drain(&self, mut apply: impl FnMut(T)) -> usize {
        let mut n = 0;
        while let Ok(req) = self.rx.try_recv() {
            self.in_flight.store(false, Ordering::Release);
            apply(req);
            n += 1;
        }
        n
    }
}

#[cfg(test)]
#[path = "../../tests/unit/painter/proxy.rs"]
mod tests;
