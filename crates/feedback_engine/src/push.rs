use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use client_logging::client_warn;

use crate::FeedbackEntry;

/// Receives lists delivered by a real-time push backend.
pub trait PushSink: Send + Sync {
    fn deliver(&self, entries: Vec<FeedbackEntry>);
}

/// Optional real-time feed source. Handed to the client explicitly;
/// nothing discovers it through shared global state.
pub trait PushFeed: Send + Sync {
    fn subscribe(&self, sink: Arc<dyn PushSink>) -> PushSubscription;
}

/// Handle for an active subscription. Dropping it (or calling `close`)
/// stops delivery for the rest of the session.
#[derive(Debug)]
pub struct PushSubscription {
    active: Arc<AtomicBool>,
}

impl PushSubscription {
    pub fn new(active: Arc<AtomicBool>) -> Self {
        Self { active }
    }

    pub fn close(&self) {
        self.active.store(false, Ordering::Relaxed);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }
}

impl Drop for PushSubscription {
    fn drop(&mut self) {
        self.close();
    }
}

type Subscriber = (Arc<dyn PushSink>, Arc<AtomicBool>);

/// In-process push feed backed by direct delivery to subscribers. Used
/// by tests and local demos; a production backend would implement
/// `PushFeed` over its own transport.
#[derive(Clone, Default)]
pub struct ChannelPushFeed {
    subscribers: Arc<Mutex<Vec<Subscriber>>>,
}

impl ChannelPushFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers a list to every live subscriber and prunes closed ones.
    pub fn publish(&self, entries: Vec<FeedbackEntry>) {
        let mut subscribers = match self.subscribers.lock() {
            Ok(guard) => guard,
            Err(err) => {
                client_warn!("Push subscriber list poisoned: {}", err);
                return;
            }
        };
        subscribers.retain(|(_, active)| active.load(Ordering::Relaxed));
        for (sink, _) in subscribers.iter() {
            sink.deliver(entries.clone());
        }
    }
}

impl PushFeed for ChannelPushFeed {
    fn subscribe(&self, sink: Arc<dyn PushSink>) -> PushSubscription {
        let active = Arc::new(AtomicBool::new(true));
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.push((sink, active.clone()));
        }
        PushSubscription::new(active)
    }
}
