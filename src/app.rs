use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDateTime};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use ratatui::{backend::Backend, Terminal};

use crate::cities::{Catalog, City};
use crate::error::FetchError;
use crate::openmeteo::{ForecastSource, HourlySeries};
use crate::scroll::{self, JumpTarget, PageLayout, ScrollController};
use crate::store::{Location, LocationStore};
use crate::timeline::Timeline;
use crate::ui;
use crate::units::temperature::Unit;

pub const FETCH_FAILED: &str = "天気情報の取得に失敗しました。時間をおいて再度お試しください。";

const TICK: Duration = Duration::from_millis(50);
const ANIMATION_FRAME: Duration = Duration::from_millis(16);
const WHEEL_STEP: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browse,
    Search,
}

#[derive(Debug, Default)]
pub struct Search {
    pub input: String,
    pub results: Vec<City>,
    pub selected: usize,
}

impl Search {
    fn clear(&mut self) {
        self.input.clear();
        self.results.clear();
        self.selected = 0;
    }
}

#[derive(Debug)]
struct FetchReply {
    token: u64,
    result: Result<HourlySeries, FetchError>,
}

pub struct AppConfig {
    pub source: Arc<dyn ForecastSource>,
    pub store: LocationStore,
    pub catalog: Catalog,
    pub unit: Unit,
    pub location: Location,
    pub width: u16,
}

/// Owns everything on screen: the current location and series, the
/// rendered timeline, search state and the viewport.
pub struct App {
    source: Arc<dyn ForecastSource>,
    store: LocationStore,
    catalog: Catalog,
    unit: Unit,

    pub location: Location,
    pub series: Option<HourlySeries>,
    pub timeline: Timeline,
    pub loading: bool,
    pub error: Option<String>,
    pub mode: Mode,
    pub search: Search,
    pub scroll: ScrollController,
    pub layout: PageLayout,

    latest_token: u64,
    tx: Sender<FetchReply>,
    rx: Receiver<FetchReply>,
    scroll_to_now_pending: bool,
    quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            source: config.source,
            store: config.store,
            catalog: config.catalog,
            unit: config.unit,
            location: config.location,
            series: None,
            timeline: Timeline::default(),
            loading: false,
            error: None,
            mode: Mode::Browse,
            search: Search::default(),
            scroll: ScrollController::new(config.width),
            layout: PageLayout::default(),
            latest_token: 0,
            tx,
            rx,
            scroll_to_now_pending: false,
            quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn store(&self) -> &LocationStore {
        &self.store
    }

    /// Clear the timeline, show loading and start a fetch on a worker thread.
    /// Only the reply to the most recent request is applied.
    pub fn load_weather(&mut self) {
        self.series = None;
        self.timeline = Timeline::default();
        self.error = None;
        self.loading = true;
        self.scroll_to_now_pending = false;

        self.latest_token += 1;
        let token = self.latest_token;
        let (lat, lon) = (self.location.lat, self.location.lon);
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        log::info!(
            "fetching forecast #{token} for {} ({lat}, {lon})",
            self.location.name
        );
        thread::spawn(move || {
            let result = source.hourly(lat, lon);
            // the receiver is gone only when the app is shutting down
            let _ = tx.send(FetchReply { token, result });
        });
    }

    pub fn poll_fetches(&mut self) {
        while let Ok(reply) = self.rx.try_recv() {
            self.apply_reply(reply);
        }
    }

    fn apply_reply(&mut self, reply: FetchReply) {
        if reply.token != self.latest_token {
            log::debug!(
                "discarding stale forecast #{} (latest #{})",
                reply.token,
                self.latest_token
            );
            return;
        }
        match reply.result {
            Ok(series) => {
                log::info!("forecast #{} has {} hours", reply.token, series.len());
                self.timeline = Timeline::build(&series, self.unit);
                self.series = Some(series);
                self.scroll_to_now_pending = true;
            }
            Err(err) => {
                log::error!("forecast #{} failed: {err}", reply.token);
                self.error = Some(FETCH_FAILED.to_string());
            }
        }
        self.loading = false;
    }

    /// Called after every frame with the layout that was drawn. A freshly
    /// rendered timeline gets exactly one scroll-to-now pass here.
    pub fn on_rendered(&mut self, layout: PageLayout, now: NaiveDateTime, instant: Instant) {
        self.layout = layout;
        self.scroll.set_max_position(layout.max_position());
        if self.scroll_to_now_pending && !self.timeline.is_empty() {
            self.scroll_to_now_pending = false;
            self.scroll_to_now(&now, instant);
        }
    }

    pub fn scroll_to_now(&mut self, now: &NaiveDateTime, instant: Instant) {
        let Some(series) = &self.series else {
            return;
        };
        match scroll::now_target(series, &self.timeline, now, &self.layout) {
            Some(to) => self.scroll.animate_to(to, instant),
            None => log::debug!("no forecast hour matches {now}"),
        }
    }

    pub fn tick(&mut self, instant: Instant) {
        self.scroll.tick(instant);
    }

    pub fn update_search(&mut self) {
        self.search.results = self
            .catalog
            .search(&self.search.input)
            .into_iter()
            .cloned()
            .collect();
        self.search.selected = 0;
    }

    pub fn select_location(&mut self, location: Location) {
        if let Err(err) = self.store.save(&location) {
            log::warn!("could not save location {}: {err}", location.name);
        }
        self.location = location;
        self.load_weather();
        self.search.clear();
        self.mode = Mode::Browse;
    }

    pub fn handle_key(&mut self, key: KeyEvent, instant: Instant) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit = true;
            return;
        }
        match self.mode {
            Mode::Browse => self.browse_key(key, instant),
            Mode::Search => self.search_key(key),
        }
    }

    fn browse_key(&mut self, key: KeyEvent, instant: Instant) {
        let (height, header) = (self.layout.viewport_height, self.layout.header_height);
        let page = i32::from(height.saturating_sub(header).max(1));
        match key.code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Char('/') => self.mode = Mode::Search,
            KeyCode::Char('t') | KeyCode::Home => {
                self.scroll.jump(JumpTarget::Top, &self.layout, instant)
            }
            KeyCode::Char('w') => self.scroll.jump(JumpTarget::Weather, &self.layout, instant),
            KeyCode::Char('f') | KeyCode::End => {
                self.scroll.jump(JumpTarget::Footer, &self.layout, instant)
            }
            KeyCode::Char('n') => self.scroll_to_now(&Local::now().naive_local(), instant),
            KeyCode::Char('r') => self.load_weather(),
            KeyCode::Char('k') | KeyCode::Up => self.scroll.scroll_by(-1),
            KeyCode::Char('j') | KeyCode::Down => self.scroll.scroll_by(1),
            KeyCode::PageUp => self.scroll.scroll_by(-page),
            KeyCode::PageDown => self.scroll.scroll_by(page),
            _ => {}
        }
    }

    fn search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.search.clear();
                self.mode = Mode::Browse;
            }
            KeyCode::Enter => {
                if let Some(city) = self.search.results.get(self.search.selected) {
                    let location = Location::from(city);
                    self.select_location(location);
                }
            }
            KeyCode::Up => self.search.selected = self.search.selected.saturating_sub(1),
            KeyCode::Down => {
                if self.search.selected + 1 < self.search.results.len() {
                    self.search.selected += 1;
                }
            }
            KeyCode::Backspace => {
                self.search.input.pop();
                self.update_search();
            }
            KeyCode::Char(c) => {
                self.search.input.push(c);
                self.update_search();
            }
            _ => {}
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollUp => self.scroll.scroll_by(-WHEEL_STEP),
            MouseEventKind::ScrollDown => self.scroll.scroll_by(WHEEL_STEP),
            _ => {}
        }
    }
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    app.load_weather();
    loop {
        let mut layout = PageLayout::default();
        terminal.draw(|f| layout = ui::draw(f, app))?;
        app.on_rendered(layout, Local::now().naive_local(), Instant::now());

        if app.should_quit() {
            return Ok(());
        }

        let timeout = if app.scroll.is_animating() {
            ANIMATION_FRAME
        } else {
            TICK
        };
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key, Instant::now())
                }
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }

        app.poll_fetches();
        app.tick(Instant::now());
    }
}
