//! Hourly series → day-grouped timeline rows.
//!
//! Every run of consecutive hours that share a date label gets exactly one
//! date header in front of it. Hour rows keep the series index as their id so
//! the now-scroller can find them again.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::openmeteo::HourlySeries;
use crate::units::temperature::{self, Unit};
use crate::weather::{self, Icon};

const MISSING: &str = "--";
const UNKNOWN_CODE: i32 = -1;

#[derive(Debug, Clone, PartialEq)]
pub struct HourBlock {
    pub index: usize,
    pub label: String,
    pub icon: Icon,
    pub color: Color,
    pub text: Color,
    pub temperature: String,
    pub precipitation: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    DateHeader(String),
    Hour(HourBlock),
}

#[derive(Debug, Clone, Default)]
pub struct Timeline {
    rows: Vec<Row>,
    // series index -> row
    hour_rows: Vec<usize>,
}

/// ja-JP short form, e.g. `3/1(金)`.
pub fn date_label(t: &NaiveDateTime) -> String {
    format!("{}/{}({})", t.month(), t.day(), weekday_ja(t.weekday()))
}

fn weekday_ja(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "月",
        Weekday::Tue => "火",
        Weekday::Wed => "水",
        Weekday::Thu => "木",
        Weekday::Fri => "金",
        Weekday::Sat => "土",
        Weekday::Sun => "日",
    }
}

pub fn hour_label(t: &NaiveDateTime) -> String {
    format!("{:02}:00", t.hour())
}

impl Timeline {
    pub fn build(series: &HourlySeries, unit: Unit) -> Self {
        let mut timeline = Timeline::default();
        let mut current_date = String::new();

        for (i, time) in series.time.iter().enumerate() {
            let date = date_label(time);
            if date != current_date {
                timeline.rows.push(Row::DateHeader(date.clone()));
                current_date = date;
            }

            let code = series
                .weathercode
                .get(i)
                .copied()
                .flatten()
                .unwrap_or(UNKNOWN_CODE);
            let temperature = match series.temperature_2m.get(i).copied().flatten() {
                Some(t) => temperature::display(t, unit),
                None => MISSING.to_string(),
            };
            let precipitation = match series.precipitation_probability.get(i).copied().flatten() {
                Some(p) => format!("{p}%"),
                None => MISSING.to_string(),
            };

            timeline.hour_rows.push(timeline.rows.len());
            timeline.rows.push(Row::Hour(HourBlock {
                index: i,
                label: hour_label(time),
                icon: weather::icon_for(code, time.hour()),
                color: weather::color_for(code),
                text: weather::text_color_for(code),
                temperature,
                precipitation,
            }));
        }
        timeline
    }

    #[cfg(test)]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_of(&self, index: usize) -> Option<usize> {
        self.hour_rows.get(index).copied()
    }

    pub fn has_date_header(&self) -> bool {
        self.rows.iter().any(|r| matches!(r, Row::DateHeader(_)))
    }

    /// Label of the day that `row` belongs to.
    pub fn date_at(&self, row: usize) -> Option<&str> {
        self.rows
            .get(..=row.min(self.rows.len().saturating_sub(1)))?
            .iter()
            .rev()
            .find_map(|r| match r {
                Row::DateHeader(label) => Some(label.as_str()),
                Row::Hour(_) => None,
            })
    }

    pub fn lines(&self, width: u16) -> Vec<Line<'static>> {
        self.rows.iter().map(|row| row_line(row, width)).collect()
    }
}

pub fn date_header_line(label: &str, width: u16) -> Line<'static> {
    Line::from(Span::styled(
        format!(" {label:<w$}", w = usize::from(width.saturating_sub(1))),
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))
}

fn row_line(row: &Row, width: u16) -> Line<'static> {
    match row {
        Row::DateHeader(label) => date_header_line(label, width),
        Row::Hour(block) => {
            let text = format!(
                " {}   {}   {:>8}   {:>5}",
                block.label,
                block.icon.symbol(),
                block.temperature,
                block.precipitation
            );
            let style = Style::default().fg(block.text).bg(block.color);
            Line::from(vec![Span::styled(text, style)]).style(style)
        }
    }
}
