//! Application state and main event loop for the heatmap dashboard.
//!
//! The [`App`] struct wraps a [`FetchController`] and the view settings;
//! [`run`] owns the terminal and loops until the user quits.

use std::io;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::watch;

use super::ui;
use crate::config::DashboardConfig;
use crate::fetcher::{DashboardState, FetchController};

/// All application state for the dashboard.
pub struct App {
    controller: FetchController,
    state: watch::Receiver<DashboardState>,

    pub max_columns: usize,
    pub auto_refresh: Option<Duration>,
    pub should_quit: bool,

    last_refresh: Option<Instant>,
}

impl App {
    /// Create a new App driving the given controller.
    pub fn new(controller: FetchController, config: &DashboardConfig) -> Self {
        let state = controller.subscribe();
        Self {
            controller,
            state,
            max_columns: config.max_columns,
            auto_refresh: config.auto_refresh_secs.map(Duration::from_secs),
            should_quit: false,
            last_refresh: None,
        }
    }

    /// Snapshot of the controller state.
    pub fn state(&self) -> DashboardState {
        self.state.borrow().clone()
    }

    pub fn endpoint(&self) -> &str {
        self.controller.endpoint()
    }

    /// Refresh is disabled while a request is in flight.
    pub fn can_refresh(&self) -> bool {
        !self.state.borrow().loading
    }

    /// Start a refresh unless one is already running. Returns whether it started.
    pub fn request_refresh(&mut self) -> bool {
        if !self.can_refresh() {
            tracing::debug!("Refresh ignored, request already in flight");
            return false;
        }
        self.controller.refresh();
        self.last_refresh = Some(Instant::now());
        true
    }

    /// Handle a key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.request_refresh();
            }
            _ => {}
        }
    }

    /// Periodic housekeeping: fire the auto-refresh when it is due.
    pub fn on_tick(&mut self) {
        let Some(interval) = self.auto_refresh else {
            return;
        };
        let due = self
            .last_refresh
            .map_or(true, |last| last.elapsed() >= interval);
        if due && self.can_refresh() {
            tracing::debug!(interval_secs = interval.as_secs(), "Auto-refreshing heatmap");
            self.request_refresh();
        }
    }

    /// Cancel anything in flight before the view goes away.
    pub fn teardown(&self) {
        self.controller.shutdown();
    }
}

/// Main entry point for the dashboard.
///
/// Sets up the terminal, fetches once on start, and runs the event loop until
/// the user quits. The terminal is restored even if the loop fails.
pub async fn run(controller: FetchController, config: &DashboardConfig) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(controller, config);
    let tick_rate = Duration::from_millis(config.tick_rate_ms.max(10));

    tracing::info!(endpoint = %app.endpoint(), "Dashboard started");
    app.request_refresh();

    let result = event_loop(&mut terminal, &mut app, tick_rate);

    app.teardown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("Dashboard closed");
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tick_rate: Duration,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }

        app.on_tick();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::{FetchError, FetchPhase, FetchResult, HeatmapSource};
    use crate::heatmap::HeatmapPayload;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct FixedSource;

    #[async_trait]
    impl HeatmapSource for FixedSource {
        fn endpoint(&self) -> &str {
            "http://stub/heatmap"
        }

        async fn fetch(&self) -> FetchResult<HeatmapPayload> {
            Err(FetchError::Http { status: 502 })
        }
    }

    fn app_with(config: DashboardConfig) -> (App, FetchController) {
        let controller = FetchController::new(Arc::new(FixedSource));
        (App::new(controller.clone(), &config), controller)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_quit_keys() {
        for key in [
            press(KeyCode::Char('q')),
            press(KeyCode::Esc),
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        ] {
            let (mut app, _) = app_with(DashboardConfig::default());
            app.handle_key(key);
            assert!(app.should_quit);
        }

        let (mut app, _) = app_with(DashboardConfig::default());
        app.handle_key(press(KeyCode::Char('c')));
        assert!(!app.should_quit);
    }

    #[test]
    fn test_refresh_disabled_while_loading() {
        let (mut app, controller) = app_with(DashboardConfig::default());

        let id = controller.begin();
        assert!(!app.can_refresh());
        app.handle_key(press(KeyCode::Char('r')));
        assert_eq!(app.state().request, Some(id));
    }

    #[tokio::test]
    async fn test_refresh_key_issues_request() {
        let (mut app, controller) = app_with(DashboardConfig::default());
        let mut rx = controller.subscribe();

        app.handle_key(press(KeyCode::Char('r')));
        assert!(app.state().loading);

        let state = rx.wait_for(|s| !s.loading).await.unwrap().clone();
        assert_eq!(state.phase, FetchPhase::Errored);
        assert_eq!(state.error.as_deref(), Some("Request failed with status 502"));
        assert!(app.can_refresh());
    }

    #[tokio::test]
    async fn test_auto_refresh() {
        let config = DashboardConfig {
            auto_refresh_secs: Some(3600),
            ..DashboardConfig::default()
        };
        let (mut app, controller) = app_with(config);

        // First tick is due immediately.
        app.on_tick();
        let first = app.state().request;
        assert!(first.is_some());

        let mut rx = controller.subscribe();
        rx.wait_for(|s| !s.loading).await.unwrap();

        // Next one is an hour away.
        app.on_tick();
        assert_eq!(app.state().request, first);
    }

    #[test]
    fn test_no_auto_refresh_by_default() {
        let (mut app, _) = app_with(DashboardConfig::default());
        app.on_tick();
        assert!(app.state().request.is_none());
    }

    #[test]
    fn test_teardown_ends_loading() {
        let (app, controller) = app_with(DashboardConfig::default());
        controller.begin();
        app.teardown();
        assert!(!app.state().loading);
    }
}
