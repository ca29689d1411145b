use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{App, Mode};
use crate::scroll::PageLayout;
use crate::timeline;

/// Rows covered by the fixed header at the top of the viewport.
pub const HEADER_HEIGHT: u16 = 3;
const RESULTS_WIDTH: u16 = 32;

struct Document {
    lines: Vec<Line<'static>>,
    weather_start: usize,
    timeline_start: usize,
    footer_start: usize,
}

fn to_row(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

fn document(app: &App, width: u16) -> Document {
    let mut lines: Vec<Line> = vec![Line::from(""); usize::from(HEADER_HEIGHT)];

    let weather_start = lines.len();
    let place = app.location.name.clone();
    lines.push(Line::from(vec![
        Span::raw(" "),
        Span::styled(
            "Hourly forecast",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" : "),
        Span::styled(place, Style::default().fg(Color::Green)),
        Span::styled(
            format!("  ({:.4}, {:.4})", app.location.lat, app.location.lon),
            Style::default().fg(Color::DarkGray),
        ),
    ]));
    lines.push(Line::from(""));

    let timeline_start = lines.len();
    if app.loading {
        lines.push(Line::from(Span::styled(
            " Loading...",
            Style::default().fg(Color::Yellow),
        )));
    } else if let Some(ref message) = app.error {
        lines.push(Line::from(Span::styled(
            format!(" {message}"),
            Style::default().fg(Color::Red),
        )));
    } else if app.timeline.is_empty() {
        lines.push(Line::from(" --"));
    } else {
        lines.extend(app.timeline.lines(width));
    }
    lines.push(Line::from(""));

    let footer_start = lines.len();
    let dim = Style::default().fg(Color::DarkGray);
    lines.push(Line::from(Span::styled(
        " Weather data by Open-Meteo.com (CC BY 4.0)",
        Style::default().fg(Color::Cyan),
    )));
    lines.push(Line::from(Span::styled(
        format!(" Location saved to {}", app.store().path().display()),
        dim,
    )));
    lines.push(Line::from(Span::styled(
        " / search   t top   w weather   f footer   n now   r reload   q quit",
        dim,
    )));

    Document {
        lines,
        weather_start,
        timeline_start,
        footer_start,
    }
}

fn header(app: &App) -> Paragraph<'static> {
    let search_style = if app.mode == Mode::Search {
        Style::default().fg(Color::Black).bg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let input = if app.mode == Mode::Search || !app.search.input.is_empty() {
        format!(" {}_ ", app.search.input)
    } else {
        " / to search ".to_string()
    };

    Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(
            app.location.name.clone(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled(input, search_style),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(" jikan ", Style::default().fg(Color::Yellow)))
            .title_alignment(Alignment::Left)
            .border_style(Style::default().fg(Color::Cyan))
            .border_type(BorderType::Rounded),
    )
}

fn status_line(app: &App) -> Line<'static> {
    let mut spans = vec![];
    if app.loading {
        spans.push(Span::styled(
            " Loading... ",
            Style::default().fg(Color::Yellow),
        ));
    } else if let Some(ref message) = app.error {
        spans.push(Span::styled(
            format!(" {message} "),
            Style::default().fg(Color::White).bg(Color::Red),
        ));
    } else {
        spans.push(Span::styled(
            format!(" {} ", app.location.name),
            Style::default().fg(Color::Green),
        ));
    }
    if app.scroll.back_to_top_visible() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            " ▲ t: top ",
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ));
    }
    Line::from(spans)
}

fn search_results(f: &mut Frame, app: &App, viewport: Rect) {
    if app.mode != Mode::Search || app.search.results.is_empty() {
        return;
    }
    let room = viewport.height.saturating_sub(HEADER_HEIGHT);
    let wanted = to_row(app.search.results.len()).saturating_add(2);
    let area = Rect {
        x: viewport.x + 2,
        y: viewport.y + HEADER_HEIGHT,
        width: RESULTS_WIDTH.min(viewport.width.saturating_sub(4)),
        height: wanted.min(room),
    };
    if area.height < 3 || area.width < 4 {
        return;
    }

    let items: Vec<ListItem> = app
        .search
        .results
        .iter()
        .map(|city| ListItem::new(format!(" {}", city.name)))
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .border_type(BorderType::Rounded),
        )
        .highlight_style(Style::default().fg(Color::Black).bg(Color::Yellow));
    let mut state = ListState::default();
    state.select(Some(app.search.selected));

    f.render_widget(Clear, area);
    f.render_stateful_widget(list, area, &mut state);
}

/// Draw one frame and report where everything landed.
pub fn draw(f: &mut Frame, app: &App) -> PageLayout {
    let rows = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]);
    let [viewport, status] = rows.areas(f.area());

    let doc = document(app, viewport.width);
    let layout = PageLayout {
        header_height: HEADER_HEIGHT.min(viewport.height),
        weather_start: to_row(doc.weather_start),
        timeline_start: to_row(doc.timeline_start),
        footer_start: to_row(doc.footer_start),
        document_height: to_row(doc.lines.len()),
        viewport_height: viewport.height,
    };

    let position = app.scroll.position().min(layout.max_position());
    f.render_widget(Paragraph::new(doc.lines).scroll((position, 0)), viewport);

    if viewport.height > HEADER_HEIGHT {
        // sticky date header for the day under the fixed header
        let first_row = usize::from(position.saturating_add(HEADER_HEIGHT));
        if first_row >= doc.timeline_start && first_row - doc.timeline_start < app.timeline.len() {
            let row = first_row - doc.timeline_start + 1;
            if let Some(label) = app.timeline.date_at(row) {
                let area = Rect {
                    y: viewport.y + HEADER_HEIGHT,
                    height: 1,
                    ..viewport
                };
                f.render_widget(
                    Paragraph::new(timeline::date_header_line(label, area.width)),
                    area,
                );
            }
        }
    }

    let header_area = Rect {
        height: layout.header_height,
        ..viewport
    };
    f.render_widget(Clear, header_area);
    f.render_widget(header(app), header_area);

    search_results(f, app, viewport);

    f.render_widget(Paragraph::new(status_line(app)), status);

    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppConfig;
    use crate::cities::Catalog;
    use crate::error::FetchError;
    use crate::openmeteo::{parse_timestamp, ForecastSource, HourlySeries};
    use crate::scroll::{JUMP_DURATION, NOW_MARGIN, STICKY_DATE_HEIGHT};
    use crate::store::{Location, LocationStore};
    use crate::units::temperature::Unit;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    struct Offline;

    impl ForecastSource for Offline {
        fn hourly(&self, _lat: f64, _lon: f64) -> Result<HourlySeries, FetchError> {
            Err(FetchError::Status(500))
        }
    }

    /// 48 hours starting at midnight on Friday 2024-03-01.
    struct TwoDays;

    impl ForecastSource for TwoDays {
        fn hourly(&self, _lat: f64, _lon: f64) -> Result<HourlySeries, FetchError> {
            let start = parse_timestamp("2024-03-01T00:00").unwrap();
            let hour = chrono::Duration::hours(1);
            Ok(HourlySeries {
                time: (0..48).map(|h| start + hour * h).collect(),
                temperature_2m: vec![Some(8.0); 48],
                precipitation_probability: vec![Some(10.0); 48],
                weathercode: vec![Some(3); 48],
            })
        }
    }

    fn app_with(dir: &tempfile::TempDir, source: Arc<dyn ForecastSource>) -> App {
        App::new(AppConfig {
            source,
            store: LocationStore::new(dir.path().join("loc.json")),
            catalog: Catalog::bundled(),
            unit: Unit::Celsius,
            location: Location::default(),
            width: 100,
        })
    }

    /// Text of one screen row with blank cells dropped, so wide glyphs
    /// compare cleanly.
    fn row_text(terminal: &Terminal<TestBackend>, y: u16) -> String {
        let buffer = terminal.backend().buffer();
        (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol())
            .collect::<String>()
            .replace(' ', "")
    }

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let height = terminal.backend().buffer().area.height;
        (0..height)
            .map(|y| row_text(terminal, y))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_layout_of_idle_page() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with(&dir, Arc::new(Offline));
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        let mut layout = PageLayout::default();
        terminal.draw(|f| layout = draw(f, &app)).unwrap();

        assert_eq!(layout.header_height, HEADER_HEIGHT);
        assert_eq!(layout.weather_start, 3);
        assert_eq!(layout.timeline_start, 5);
        assert_eq!(layout.footer_start, 7);
        assert_eq!(layout.document_height, 10);
        assert_eq!(layout.viewport_height, 19);

        let text = screen(&terminal);
        assert!(text.contains("jikan"));
        assert!(text.contains("Hourlyforecast"));
        assert!(text.contains("Open-Meteo"));
    }

    #[test]
    fn test_sticky_date_and_current_hour_under_header() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(&dir, Arc::new(TwoDays));
        app.load_weather();
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.loading && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
            app.poll_fetches();
        }
        // 48 hours plus one header per day
        assert_eq!(app.timeline.len(), 50);

        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        let mut layout = PageLayout::default();
        terminal.draw(|f| layout = draw(f, &app)).unwrap();
        // nothing sticks while the page top is visible
        let below_header = row_text(&terminal, HEADER_HEIGHT);
        assert!(below_header.contains("Hourlyforecast"));

        let now = parse_timestamp("2024-03-02T05:30").unwrap();
        let start = Instant::now();
        app.on_rendered(layout, now, start);
        app.tick(start + JUMP_DURATION);
        terminal.clear().unwrap();
        terminal.draw(|f| layout = draw(f, &app)).unwrap();

        // timeline row of 3/2 05:00 is 31, minus header, sticky row and margin
        assert_eq!(app.scroll.position(), 5 + 31 - 3 - 1 - 1);
        let below_header = row_text(&terminal, HEADER_HEIGHT);
        assert!(below_header.contains("3/2(土)"));
        let now_row = HEADER_HEIGHT + STICKY_DATE_HEIGHT + NOW_MARGIN;
        assert!(row_text(&terminal, now_row - 1).contains("04:00"));
        assert!(row_text(&terminal, now_row).contains("05:00"));
    }
}
