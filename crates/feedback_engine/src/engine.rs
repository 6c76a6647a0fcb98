use std::sync::{mpsc, Arc};
use std::thread;

use client_logging::client_warn;

use crate::client::FeedbackApi;
use crate::push::{PushFeed, PushSink};
use crate::{FeedbackDraft, FeedbackEntry, StatsSnapshot, SubmitError};

enum ClientCommand {
    Submit { draft: FeedbackDraft },
    LoadFeed,
}

/// Completion events delivered back to the app loop.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    SubmitCompleted {
        result: Result<Option<FeedbackEntry>, SubmitError>,
    },
    /// Outcome of the parallel recent+stats load. `entries` is `None`
    /// when the recent fetch failed outright.
    FeedLoaded {
        entries: Option<Vec<FeedbackEntry>>,
        stats: Option<StatsSnapshot>,
    },
    /// Supplementary real-time delivery.
    PushUpdate { entries: Vec<FeedbackEntry> },
}

/// Bridge between the synchronous app loop and the async API client.
/// Commands go in over a channel; completions come back as events.
pub struct ClientHandle {
    cmd_tx: mpsc::Sender<ClientCommand>,
    event_rx: mpsc::Receiver<ClientEvent>,
}

impl ClientHandle {
    pub fn new(api: Arc<dyn FeedbackApi>, push: Option<Arc<dyn PushFeed>>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        // The subscription is owned by the worker thread so it closes when
        // the handle is dropped and the command channel disconnects.
        let subscription = push.map(|feed| {
            feed.subscribe(Arc::new(EventPushSink {
                event_tx: event_tx.clone(),
            }))
        });

        thread::spawn(move || {
            let _subscription = subscription;
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                let api = api.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(api.as_ref(), command, event_tx).await;
                });
            }
        });

        Self { cmd_tx, event_rx }
    }

    pub fn submit(&self, draft: FeedbackDraft) {
        let _ = self.cmd_tx.send(ClientCommand::Submit { draft });
    }

    pub fn load_feed(&self) {
        let _ = self.cmd_tx.send(ClientCommand::LoadFeed);
    }

    pub fn try_recv(&self) -> Option<ClientEvent> {
        self.event_rx.try_recv().ok()
    }
}

async fn handle_command(
    api: &dyn FeedbackApi,
    command: ClientCommand,
    event_tx: mpsc::Sender<ClientEvent>,
) {
    match command {
        ClientCommand::Submit { draft } => {
            let result = api.submit(&draft).await;
            let _ = event_tx.send(ClientEvent::SubmitCompleted { result });
        }
        ClientCommand::LoadFeed => {
            // Both fetches resolve before any render decision is made.
            let (recent, stats) = tokio::join!(api.recent(), api.stats());
            let entries = match recent {
                Ok(entries) => Some(entries),
                Err(err) => {
                    client_warn!("Failed to load recent feedback from API: {}", err);
                    None
                }
            };
            let stats = match stats {
                Ok(stats) => Some(stats),
                Err(err) => {
                    client_warn!("Failed to load feedback stats from API: {}", err);
                    None
                }
            };
            let _ = event_tx.send(ClientEvent::FeedLoaded { entries, stats });
        }
    }
}

/// Forwards push deliveries into the client event channel.
struct EventPushSink {
    event_tx: mpsc::Sender<ClientEvent>,
}

impl PushSink for EventPushSink {
    fn deliver(&self, entries: Vec<FeedbackEntry>) {
        let _ = self.event_tx.send(ClientEvent::PushUpdate { entries });
    }
}
