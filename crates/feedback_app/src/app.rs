use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use chrono::Utc;
use client_logging::client_info;
use feedback_core::{update, AppState, Effect, FeedStats, Msg};
use feedback_engine::{
    ApiSettings, ClientEvent, ClientHandle, FeedbackStore, ReqwestFeedbackApi, Theme,
};

use crate::effects::{entry_to_core, submit_event_msg, EffectRunner};
use crate::render;

/// How long the event pump waits for outstanding remote operations
/// before giving up; comfortably above the 15 s request timeout.
const PUMP_DEADLINE: Duration = Duration::from_secs(20);
const PUMP_POLL: Duration = Duration::from_millis(20);

pub fn run() -> Result<()> {
    let store = FeedbackStore::new(store_dir());
    store.initialize();

    let args: Vec<String> = env::args().skip(1).collect();
    if let Some(("theme", rest)) = args.split_first().map(|(a, b)| (a.as_str(), b)) {
        return set_theme(&store, rest);
    }

    let api = Arc::new(ReqwestFeedbackApi::new(api_settings()));
    let handle = ClientHandle::new(api, None);
    let runner = EffectRunner::new(handle, store);
    let mut app = App::new(runner);

    // Instant paint from cached snapshots before any network call.
    for msg in app.runner.startup_msgs() {
        app.dispatch(msg);
    }

    match args.split_first().map(|(a, b)| (a.as_str(), b)) {
        None => app.load_feed(),
        Some(("feed", _)) => app.load_feed(),
        Some(("submit", rest)) => match rest {
            [name, email, message @ ..] if !message.is_empty() => {
                app.submit(name, email, &message.join(" "))
            }
            _ => bail!("usage: feedback_app submit <name> <email> <message...>"),
        },
        Some((other, _)) => bail!("unknown command: {other}"),
    }

    app.pump_until_idle();
    Ok(())
}

struct App {
    state: AppState,
    runner: EffectRunner,
    pending: usize,
}

impl App {
    fn new(runner: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            runner,
            pending: 0,
        }
    }

    fn load_feed(&mut self) {
        self.run_effects(vec![Effect::LoadFeed]);
    }

    fn submit(&mut self, name: &str, email: &str, message: &str) {
        self.dispatch(Msg::SubmitRequested {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        });
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.run_effects(effects);
        if self.state.consume_dirty() {
            render::paint(&self.state.view(Utc::now()));
        }
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        let outcome = self.runner.run(effects);
        self.pending += outcome.started;
        if outcome.navigate {
            render::show_section_banner();
        }
        for msg in outcome.msgs {
            self.dispatch(msg);
        }
    }

    /// Drains engine events until every started operation completed or
    /// the deadline passes. Push deliveries are handled if they arrive.
    fn pump_until_idle(&mut self) {
        let start = Instant::now();
        while self.pending > 0 && start.elapsed() < PUMP_DEADLINE {
            let Some(event) = self.runner.handle().try_recv() else {
                thread::sleep(PUMP_POLL);
                continue;
            };
            match event {
                ClientEvent::SubmitCompleted { result } => {
                    self.pending -= 1;
                    self.dispatch(submit_event_msg(result));
                }
                ClientEvent::FeedLoaded { entries, stats } => {
                    self.pending -= 1;
                    self.dispatch(Msg::FeedLoaded {
                        entries: entries
                            .map(|list| list.into_iter().map(entry_to_core).collect()),
                        stats: stats.map(|stats| FeedStats { total: stats.total }),
                    });
                }
                ClientEvent::PushUpdate { entries } => {
                    self.dispatch(Msg::PushDelivered {
                        entries: entries.into_iter().map(entry_to_core).collect(),
                    });
                }
            }
        }
        if self.pending > 0 {
            client_info!("Gave up waiting on {} outstanding operation(s)", self.pending);
        }
    }
}

fn set_theme(store: &FeedbackStore, args: &[String]) -> Result<()> {
    let theme = match args.first().map(String::as_str) {
        Some("dark") => Theme::Dark,
        Some("light") => Theme::Light,
        _ => bail!("usage: feedback_app theme <dark|light>"),
    };
    store.set_theme(theme);
    println!("Theme preference saved.");
    Ok(())
}

fn store_dir() -> PathBuf {
    env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".buzzguard")
}

/// Loopback selection rule: `BUZZGUARD_API_HOST=localhost` targets the
/// local development backend, anything else the production endpoint.
fn api_settings() -> ApiSettings {
    match env::var("BUZZGUARD_API_HOST") {
        Ok(host) => ApiSettings::for_host(&host),
        Err(_) => ApiSettings::default(),
    }
}
