// ABOUTME: App orchestrator — wires together storage, session store, backend client, and TUI.
// ABOUTME: Sets up subsystems then drives the ratatui event loop until quit.

use std::sync::Arc;

use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste, Event, EventStream};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;

use crate::api::client::{ApiClient, Backend};
use crate::config::Config;
use crate::session::{ActivityLog, FileStorage, SessionStore};
use crate::tui::model::{ApiEvent, Flow, Model};
use crate::tui::ui;

/// Top-level application that orchestrates all subsystems.
pub struct App {
    config: Config,
    fresh: bool,
}

impl App {
    /// Create a new app with the given configuration.
    pub fn new(config: Config, fresh: bool) -> Self {
        Self { config, fresh }
    }

    /// Run the application: open the session store, wire up the backend
    /// client, and drive the TUI event loop until quit.
    pub async fn run(self) -> anyhow::Result<()> {
        let storage = FileStorage::open(&self.config.state_dir())?;
        let store = if self.fresh {
            SessionStore::fresh(storage)
        } else {
            SessionStore::open(storage)?
        };

        let client = Arc::new(ApiClient::new(&self.config.backend.base_url));
        if let Some(token) = store.auth().token.clone() {
            client.set_token(Some(token));
        }
        let backend: Arc<dyn Backend> = client;

        let log = match ActivityLog::create(&Config::logs_dir()) {
            Ok(log) => Some(log),
            Err(e) => {
                eprintln!("Warning: failed to create activity log: {}", e);
                None
            }
        };

        // Channel carrying backend-call completions to the UI task.
        let (api_tx, mut api_rx) = mpsc::channel::<ApiEvent>(64);
        let mut model = Model::new(store, backend, api_tx, log);

        let mut terminal = ratatui::init();
        crossterm::execute!(std::io::stdout(), EnableBracketedPaste)?;
        let result = run_event_loop(&mut terminal, &mut model, &mut api_rx).await;
        let _ = crossterm::execute!(std::io::stdout(), DisableBracketedPaste);
        ratatui::restore();
        result
    }
}

/// Draw, then wait for either a terminal event or a backend completion.
async fn run_event_loop(
    terminal: &mut DefaultTerminal,
    model: &mut Model,
    api_rx: &mut mpsc::Receiver<ApiEvent>,
) -> anyhow::Result<()> {
    let mut events = EventStream::new();
    loop {
        terminal.draw(|frame| ui::render(frame, &model.state, &model.store))?;

        tokio::select! {
            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) => {
                        if model.handle_key(key)? == Flow::Quit {
                            return Ok(());
                        }
                    }
                    Some(Ok(Event::Paste(text))) => model.handle_paste(text)?,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    // Terminal input closed; nothing left to drive the UI.
                    None => return Ok(()),
                }
            }
            Some(event) = api_rx.recv() => {
                model.handle_api(event)?;
            }
        }
    }
}
