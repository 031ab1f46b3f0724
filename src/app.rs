use std::io;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame, Terminal,
};
use tracing::{debug, info, warn};

use crate::catalog::ManualSelection;
use crate::error::FetchError;
use crate::geo::{GeoDispatcher, GeoOutcome, RequestId};
use crate::locale::Language;
use crate::session::{Effect, SessionEvent, SessionState};
use crate::view::{Body, Dashboard, Report};
use crate::weather::ForecastResult;

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Geolocated {
        request: RequestId,
        outcome: GeoOutcome,
    },
    /// Periodic refetch.
    Refresh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

pub struct App<F> {
    session: SessionState,
    selection: ManualSelection,
    language: Language,
    geo: GeoDispatcher,
    fetch: F,
    dashboard: Option<Dashboard>,
}

impl<F> App<F>
where
    F: Fn(&str) -> Result<ForecastResult, FetchError>,
{
    pub fn new(language: Language, selection: ManualSelection, geo: GeoDispatcher, fetch: F) -> Self {
        Self {
            session: SessionState::default(),
            selection,
            language,
            geo,
            fetch,
            dashboard: None,
        }
    }

    pub fn dashboard(&self) -> Option<&Dashboard> {
        self.dashboard.as_ref()
    }

    /// Handles one event. State changes are followed by a full tick before
    /// this returns.
    pub fn handle(&mut self, event: AppEvent) -> Control {
        match event {
            AppEvent::Key(key) => return self.handle_key(key),
            AppEvent::Geolocated { request, outcome } => {
                if self.apply(SessionEvent::Geolocated { request, outcome }) {
                    self.tick();
                }
            }
            AppEvent::Refresh => self.tick(),
            // The last dashboard is simply drawn again at the new size.
            AppEvent::Resize => {}
        }
        Control::Continue
    }

    fn handle_key(&mut self, key: KeyEvent) -> Control {
        if key.kind != KeyEventKind::Press {
            return Control::Continue;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Control::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Control::Quit
            }
            KeyCode::Char('l') => {
                self.language = self.language.toggle();
                self.tick();
            }
            KeyCode::Char('g') => {
                self.apply(SessionEvent::UseMyLocation);
                self.tick();
            }
            KeyCode::Char('r') => {
                if self.apply(SessionEvent::ResetLocation) {
                    self.tick();
                }
            }
            KeyCode::Left => self.select(self.selection.prev_country()),
            KeyCode::Right => self.select(self.selection.next_country()),
            KeyCode::Up => self.select(self.selection.prev_city()),
            KeyCode::Down => self.select(self.selection.next_city()),
            _ => {}
        }
        Control::Continue
    }

    fn select(&mut self, selection: ManualSelection) {
        self.selection = selection;
        self.apply(SessionEvent::SelectionChanged);
        self.tick();
    }

    /// Runs a transition and carries out its effects. Returns whether the
    /// transition asked for a rerun.
    fn apply(&mut self, event: SessionEvent) -> bool {
        let (session, effects) = std::mem::take(&mut self.session).apply(event);
        self.session = session;
        let mut rerun = false;
        for effect in effects {
            match effect {
                Effect::RequestGeolocation(id) => self.geo.request(id),
                Effect::Rerun => rerun = true,
            }
        }
        rerun
    }

    /// One full evaluation: maybe start a location lookup, pick the target,
    /// fetch and rebuild the dashboard. Nothing from an earlier tick survives.
    pub fn tick(&mut self) {
        self.apply(SessionEvent::Evaluate);

        let target = self.session.target(&self.selection);
        let query = target.query();
        info!(target = %query, phase = ?self.session.phase(), "tick");

        let forecast = (self.fetch)(query.as_str());
        if let Err(ref err) = forecast {
            warn!("forecast for {query} failed: {err}");
        }

        self.dashboard = Some(Dashboard::build(
            self.language,
            self.session.phase(),
            &self.selection,
            &target,
            &forecast,
        ));
    }
}

/// Forwards terminal input into the event loop until the loop goes away.
pub fn spawn_input(events: Sender<AppEvent>) {
    thread::spawn(move || loop {
        let event = match event::read() {
            Ok(Event::Key(key)) => AppEvent::Key(key),
            Ok(Event::Resize(..)) => AppEvent::Resize,
            Ok(_) => continue,
            Err(err) => {
                warn!("terminal input failed: {err}");
                return;
            }
        };
        if events.send(event).is_err() {
            return;
        }
    });
}

pub fn spawn_refresh(events: Sender<AppEvent>, every: Duration) {
    thread::spawn(move || loop {
        thread::sleep(every);
        if events.send(AppEvent::Refresh).is_err() {
            return;
        }
    });
}

pub fn run_app<B, F>(
    terminal: &mut Terminal<B>,
    app: &mut App<F>,
    events: Receiver<AppEvent>,
) -> io::Result<()>
where
    B: Backend,
    F: Fn(&str) -> Result<ForecastResult, FetchError>,
{
    app.tick();
    loop {
        if let Some(dashboard) = app.dashboard() {
            terminal.draw(|f| ui(f, dashboard))?;
        }

        let Ok(event) = events.recv() else {
            debug!("event channel closed");
            return Ok(());
        };
        if app.handle(event) == Control::Quit {
            return Ok(());
        }
    }
}

fn bordered(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(Color::Yellow),
        ))
        .title_alignment(Alignment::Left)
        .border_style(Style::default().fg(Color::Cyan))
        .border_type(BorderType::Rounded)
}

fn key_hint<'a>(key: &'a str, label: &'a str) -> Vec<Span<'a>> {
    vec![
        Span::styled(format!(" [{key}] "), Style::default().fg(Color::Blue)),
        Span::raw(label),
    ]
}

fn display_headline(dashboard: &Dashboard) -> Paragraph<'_> {
    let labels = dashboard.language.labels();
    let lang_span = |lang: Language| {
        let style = if lang == dashboard.language {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Span::styled(lang.name(), style)
    };

    let mut title = vec![
        Span::raw(" "),
        Span::styled(labels.title, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("   "),
    ];
    title.extend(key_hint("l", labels.language));
    title.extend([
        Span::raw(" "),
        lang_span(Language::Korean),
        Span::raw(" | "),
        lang_span(Language::English),
    ]);

    Paragraph::new(Line::from(title)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .border_type(BorderType::Rounded),
    )
}

fn display_controls(dashboard: &Dashboard) -> Paragraph<'_> {
    let labels = dashboard.language.labels();
    let mut buttons = key_hint("g", labels.gps_button);
    if dashboard.can_reset {
        buttons.push(Span::raw("  "));
        buttons.extend(key_hint("r", labels.reset_button));
    }

    let mut pickers = key_hint("←/→", labels.country);
    pickers.push(Span::styled(
        format!(" {}", dashboard.country),
        Style::default().fg(Color::Green),
    ));
    pickers.push(Span::raw("  "));
    pickers.extend(key_hint("↑/↓", labels.city));
    pickers.push(Span::styled(
        format!(" {}", dashboard.city),
        Style::default().fg(Color::Green),
    ));

    let mut lines = vec![Line::from(buttons), Line::from(pickers)];
    if let Some(notice) = dashboard.notice {
        lines.push(Line::from(Span::styled(
            format!(" {notice}"),
            Style::default().fg(Color::LightBlue),
        )));
    }
    Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .border_type(BorderType::Rounded),
    )
}

fn display_current<'a>(report: &'a Report, location: &'a str) -> Paragraph<'a> {
    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw(" "),
            Span::styled(
                report.temperature.as_str(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                report.condition.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(
            format!(" {}", report.icon),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    if let Some(warning) = report.heat_warning {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" ⚠ {warning}"),
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )));
    }
    Paragraph::new(lines).block(bordered(location))
}

fn display_details<'a>(report: &'a Report, title: &'a str) -> Table<'a> {
    let mut rows = vec![Row::new(vec![Cell::from("")])];
    for (label, value) in &report.details {
        rows.push(Row::new(vec![
            Cell::from(format!(" {label}")),
            Cell::from(value.as_str()).style(Style::default().fg(Color::Green)),
        ]));
    }
    Table::new(rows, [Constraint::Length(14), Constraint::Min(8)]).block(bordered(title))
}

fn display_outlook<'a>(report: &'a Report, tomorrow: &'a str) -> Paragraph<'a> {
    let green = Style::default().fg(Color::Green);
    Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(format!(" {}", report.wind), green)),
        Line::from(Span::styled(format!(" {}", report.moon), green)),
        Line::from(""),
        Line::from(Span::styled(
            format!(" 📅 {tomorrow}"),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(format!(" {}", report.tomorrow_range), green)),
        Line::from(Span::styled(format!(" {}", report.rain), green)),
    ])
    .block(bordered(""))
}

fn display_footer(dashboard: &Dashboard) -> Paragraph<'_> {
    let labels = dashboard.language.labels();
    let mut spans = vec![];
    if let Body::Report(report) = &dashboard.body {
        spans.push(Span::styled(
            format!(" {}  ", report.last_update),
            Style::default().fg(Color::DarkGray),
        ));
    }
    spans.extend(key_hint("q", labels.quit));
    Paragraph::new(Line::from(spans))
}

fn draw_report(f: &mut Frame, area: Rect, dashboard: &Dashboard, report: &Report) {
    let labels = dashboard.language.labels();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(9)])
        .split(area);
    f.render_widget(display_current(report, &dashboard.location_name), rows[0]);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[1]);
    f.render_widget(display_details(report, labels.detail), cols[0]);
    f.render_widget(display_outlook(report, labels.tomorrow), cols[1]);
}

pub fn ui(f: &mut Frame, dashboard: &Dashboard) {
    let controls_height = if dashboard.notice.is_some() { 5 } else { 4 };
    let vert_layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(controls_height),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    f.render_widget(display_headline(dashboard), vert_layout[0]);
    f.render_widget(display_controls(dashboard), vert_layout[1]);

    match &dashboard.body {
        Body::Report(report) => draw_report(f, vert_layout[2], dashboard, report),
        Body::Error(message) => {
            let error = Paragraph::new(Line::from(Span::styled(
                format!(" {message}"),
                Style::default().fg(Color::Red),
            )))
            .wrap(Wrap { trim: false })
            .block(bordered(&dashboard.location_name));
            f.render_widget(error, vert_layout[2]);
        }
    }

    f.render_widget(display_footer(dashboard), vert_layout[3]);
}
