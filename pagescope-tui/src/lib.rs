use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use pagescope_client::ScrapeClient;
use pagescope_core::{Completion, FetchError, FetchState, ScrapeResult, Ticket};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

mod view;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Focus {
    Input,
    Results,
}

/// Outcome of a network task, sent back to the UI thread.
#[derive(Debug)]
pub enum FetchMessage {
    Submitted {
        ticket: Ticket,
        target: String,
        result: Result<ScrapeResult, FetchError>,
    },
    PageLoaded {
        ticket: Ticket,
        result: Result<ScrapeResult, FetchError>,
    },
}

pub struct App {
    input: String,
    cursor_position: usize,
    focus: Focus,
    state: FetchState,
    target: Option<String>,
    logs: Vec<(String, LogLevel, String)>,
    selected_url: Option<usize>,
    scroll_urls: usize,
    tick: usize,
    should_quit: bool,
    client: ScrapeClient,
    runtime: Handle,
    tx: mpsc::UnboundedSender<FetchMessage>,
    rx: mpsc::UnboundedReceiver<FetchMessage>,
}

impl App {
    pub fn new(client: ScrapeClient, runtime: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut app = Self {
            input: String::new(),
            cursor_position: 0,
            focus: Focus::Input,
            state: FetchState::new(),
            target: None,
            logs: Vec::new(),
            selected_url: None,
            scroll_urls: 0,
            tick: 0,
            should_quit: false,
            client,
            runtime,
            tx,
            rx,
        };
        let base = app.client.base_url().to_string();
        app.log(LogLevel::Info, format!("Scraping API: {}", base));
        app
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn set_input(&mut self, input: &str) {
        self.input = input.to_string();
        self.cursor_position = self.input.chars().count();
    }

    fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        let stamp = chrono::Local::now().format("%H:%M:%S").to_string();
        self.logs.push((stamp, level, message.into()));
        // Keep only last 200 entries
        if self.logs.len() > 200 {
            self.logs.drain(0..self.logs.len() - 200);
        }
    }

    /// Sends the trimmed input to the API. A blank input issues nothing.
    pub fn submit(&mut self) {
        let target = self.input.trim().to_string();
        let Some(ticket) = self.state.begin_submit(&target) else {
            self.log(LogLevel::Warn, "Enter a URL to scrape");
            return;
        };
        self.log(LogLevel::Info, format!("Scraping {}", target));

        let client = self.client.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = client.scrape(&target).await;
            let _ = tx.send(FetchMessage::Submitted {
                ticket,
                target,
                result,
            });
        });
    }

    /// Requests the next page, if there is one and nothing is in flight.
    pub fn load_more(&mut self) {
        let Some((ticket, next_page)) = self.state.begin_load_more() else {
            return;
        };
        if let Some(session) = self.state.session() {
            let batch = session.progress().next_batch;
            self.log(LogLevel::Info, format!("Loading next {} URL(s)", batch));
        }

        let client = self.client.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = client.fetch_page(&next_page).await;
            let _ = tx.send(FetchMessage::PageLoaded { ticket, result });
        });
    }

    /// Applies every finished request without blocking.
    pub fn process_messages(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            self.handle_message(msg);
        }
    }

    pub fn handle_message(&mut self, msg: FetchMessage) {
        match msg {
            FetchMessage::Submitted {
                ticket,
                target,
                result,
            } => match self.state.complete_submit(ticket, result) {
                Completion::Applied => {
                    let count = self
                        .state
                        .session()
                        .map(|s| s.accumulated_urls.len())
                        .unwrap_or(0);
                    self.log(LogLevel::Info, format!("{}: {} URL(s) received", target, count));
                    self.target = Some(target);
                    self.selected_url = None;
                    self.scroll_urls = 0;
                }
                Completion::Failed => {
                    let message = self.state.error().unwrap_or_default().to_string();
                    self.log(LogLevel::Error, message);
                }
                Completion::Stale => {
                    self.log(LogLevel::Warn, format!("Discarded late response for {}", target));
                }
            },
            FetchMessage::PageLoaded { ticket, result } => {
                match self.state.complete_load_more(ticket, result) {
                    Completion::Applied => {
                        if let Some(session) = self.state.session() {
                            let message = format!(
                                "Page {} loaded, {} URL(s) total",
                                session.latest_pagination.current_page,
                                session.accumulated_urls.len()
                            );
                            self.log(LogLevel::Info, message);
                        }
                    }
                    Completion::Failed => {
                        let message = self.state.error().unwrap_or_default().to_string();
                        self.log(LogLevel::Error, message);
                    }
                    Completion::Stale => {
                        self.log(LogLevel::Warn, "Discarded page of a previous scrape");
                    }
                }
            }
        }
    }

    fn url_count(&self) -> usize {
        self.state
            .session()
            .map(|s| s.accumulated_urls.len())
            .unwrap_or(0)
    }

    fn byte_index(&self) -> usize {
        self.input
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.focus {
            Focus::Input => self.handle_input_key(key),
            Focus::Results => self.handle_results_key(key),
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) => {
                let idx = self.byte_index();
                self.input.insert(idx, c);
                self.cursor_position += 1;
            }
            KeyCode::Backspace => {
                if self.cursor_position > 0 {
                    self.cursor_position -= 1;
                    let idx = self.byte_index();
                    self.input.remove(idx);
                }
            }
            KeyCode::Delete => {
                if self.cursor_position < self.input.chars().count() {
                    let idx = self.byte_index();
                    self.input.remove(idx);
                }
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Left => {
                self.cursor_position = self.cursor_position.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.cursor_position < self.input.chars().count() {
                    self.cursor_position += 1;
                }
            }
            KeyCode::Home => self.cursor_position = 0,
            KeyCode::End => self.cursor_position = self.input.chars().count(),
            KeyCode::Tab => {
                if self.state.session().is_some() {
                    self.focus = Focus::Results;
                }
            }
            KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_results_key(&mut self, key: KeyEvent) {
        let count = self.url_count();
        match key.code {
            KeyCode::Char('m') | KeyCode::Char('n') => self.load_more(),
            KeyCode::Tab | KeyCode::Char('i') | KeyCode::Char('/') => self.focus = Focus::Input,
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => {
                if count > 0 {
                    self.selected_url = Some(match self.selected_url {
                        Some(selected) => selected.saturating_sub(1),
                        None => count - 1,
                    });
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if count > 0 {
                    self.selected_url = Some(match self.selected_url {
                        Some(selected) => (selected + 1).min(count - 1),
                        None => self.scroll_urls.min(count - 1),
                    });
                }
            }
            KeyCode::PageUp => {
                if let Some(selected) = self.selected_url {
                    self.selected_url = Some(selected.saturating_sub(10));
                }
                self.scroll_urls = self.scroll_urls.saturating_sub(10);
            }
            KeyCode::PageDown => {
                if count > 0 {
                    if let Some(selected) = self.selected_url {
                        self.selected_url = Some((selected + 10).min(count - 1));
                    }
                    self.scroll_urls = (self.scroll_urls + 10).min(count - 1);
                }
            }
            KeyCode::Home => {
                self.scroll_urls = 0;
                if count > 0 {
                    self.selected_url = Some(0);
                }
            }
            KeyCode::End => {
                if count > 0 {
                    self.selected_url = Some(count - 1);
                }
            }
            _ => {}
        }
    }
}

/// Runs the viewer until the user quits. Blocks the calling thread; network
/// requests are spawned on `runtime`.
pub fn run(client: ScrapeClient, initial_url: Option<String>, runtime: Handle) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(client, runtime);
    if let Some(url) = initial_url {
        app.set_input(&url);
        app.submit();
    }

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        app.process_messages();
        app.tick = app.tick.wrapping_add(1);

        terminal.draw(|f| view::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
