//! Network Monitor
//!
//! Tracks connectivity as reported by the host environment and publishes
//! edge-triggered events to subscribers. The monitor never polls: the host
//! calls [`NetworkMonitor::set_online`] on every report, and only a genuine
//! transition produces an event. A false online report costs one failed
//! drain attempt, nothing more.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Connectivity transition event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkEvent {
    /// The device transitioned from offline to online
    BecameOnline,
    /// The device transitioned from online to offline
    BecameOffline,
}

/// Observes connectivity transitions and raises edge-triggered events
///
/// Cloning is cheap; all clones share the same state and subscriber list.
#[derive(Debug, Clone)]
pub struct NetworkMonitor {
    inner: Arc<MonitorInner>,
}

#[derive(Debug)]
struct MonitorInner {
    online: AtomicBool,
    subscribers: Mutex<Vec<UnboundedSender<NetworkEvent>>>,
}

impl NetworkMonitor {
    /// Create a monitor with the given initial connectivity
    pub fn new(initially_online: bool) -> Self {
        Self {
            inner: Arc::new(MonitorInner {
                online: AtomicBool::new(initially_online),
                subscribers: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Current connectivity as last reported by the host
    pub fn is_online(&self) -> bool {
        self.inner.online.load(Ordering::SeqCst)
    }

    /// Report connectivity from the host environment
    ///
    /// Emits `BecameOnline` / `BecameOffline` to subscribers only on a
    /// genuine transition; repeating the current state emits nothing.
    pub fn set_online(&self, online: bool) {
        let was_online = self.inner.online.swap(online, Ordering::SeqCst);
        if was_online == online {
            return;
        }

        let event = if online {
            NetworkEvent::BecameOnline
        } else {
            NetworkEvent::BecameOffline
        };
        tracing::info!("connectivity changed: {:?}", event);

        let mut subscribers = self.inner.subscribers.lock().unwrap();
        subscribers.retain(|tx| tx.send(event).is_ok());
    }

    /// Subscribe to connectivity transition events
    ///
    /// Events raised after this call are delivered in order. Dropping the
    /// receiver unsubscribes on the next publish.
    pub fn subscribe(&self) -> UnboundedReceiver<NetworkEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner.subscribers.lock().unwrap().push(tx);
        rx
    }
}

impl Default for NetworkMonitor {
    fn default() -> Self {
        Self::new(true)
    }
}
