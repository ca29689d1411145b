//! Viewport scrolling: jump controls, back-to-top visibility and the
//! now-scroller. Positions are document rows; row 0 is the top of the page.

use std::time::{Duration, Instant};

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::openmeteo::HourlySeries;
use crate::timeline::Timeline;

/// Terminals at most this wide count as narrow.
pub const BREAKPOINT: u16 = 80;
pub const NARROW_COMPENSATION: u16 = 4;
pub const WIDE_COMPENSATION: u16 = 3;
pub const FOOTER_EXTRA: u16 = 2;
pub const BACK_TO_TOP_THRESHOLD: u16 = 10;
pub const JUMP_DURATION: Duration = Duration::from_millis(300);
pub const NOW_MARGIN: u16 = 1;
pub const STICKY_DATE_HEIGHT: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpTarget {
    Top,
    Weather,
    Footer,
}

/// Where things landed in the last drawn frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageLayout {
    pub header_height: u16,
    pub weather_start: u16,
    pub timeline_start: u16,
    pub footer_start: u16,
    pub document_height: u16,
    pub viewport_height: u16,
}

impl PageLayout {
    pub fn max_position(&self) -> u16 {
        self.document_height.saturating_sub(self.viewport_height)
    }
}

#[derive(Debug, Clone, Copy)]
struct Animation {
    from: u16,
    to: u16,
    start: Instant,
}

#[derive(Debug)]
pub struct ScrollController {
    compensation: u16,
    position: u16,
    max_position: u16,
    animation: Option<Animation>,
}

impl ScrollController {
    /// The compensation distance is fixed here from the startup width.
    pub fn new(viewport_width: u16) -> Self {
        let compensation = if viewport_width <= BREAKPOINT {
            NARROW_COMPENSATION
        } else {
            WIDE_COMPENSATION
        };
        Self {
            compensation,
            position: 0,
            max_position: 0,
            animation: None,
        }
    }

    pub fn position(&self) -> u16 {
        self.position
    }

    #[cfg(test)]
    pub fn compensation(&self) -> u16 {
        self.compensation
    }

    pub fn set_max_position(&mut self, max: u16) {
        self.max_position = max;
        self.position = self.position.min(max);
    }

    pub fn target_for(&self, target: JumpTarget, layout: &PageLayout) -> u16 {
        match target {
            JumpTarget::Top => 0,
            JumpTarget::Weather => layout.weather_start.saturating_sub(self.compensation),
            JumpTarget::Footer => layout
                .footer_start
                .saturating_sub(self.compensation)
                .saturating_add(FOOTER_EXTRA),
        }
    }

    pub fn jump(&mut self, target: JumpTarget, layout: &PageLayout, now: Instant) {
        let to = self.target_for(target, layout);
        log::debug!("jump to {target:?} at row {to}");
        self.animate_to(to, now);
    }

    pub fn animate_to(&mut self, to: u16, now: Instant) {
        let to = to.min(self.max_position);
        if to == self.position {
            self.animation = None;
            return;
        }
        self.animation = Some(Animation {
            from: self.position,
            to,
            start: now,
        });
    }

    /// Manual scrolling moves immediately and stops any animation.
    pub fn scroll_by(&mut self, delta: i32) {
        let max = i32::from(self.max_position);
        let pos = (i32::from(self.position) + delta).clamp(0, max);
        self.scroll_to(u16::try_from(pos).unwrap_or(self.max_position));
    }

    pub fn scroll_to(&mut self, pos: u16) {
        self.animation = None;
        self.position = pos.min(self.max_position);
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Advance a running animation. Linear easing over `JUMP_DURATION`.
    pub fn tick(&mut self, now: Instant) {
        let Some(anim) = self.animation else {
            return;
        };
        let elapsed = now.saturating_duration_since(anim.start);
        if elapsed >= JUMP_DURATION {
            self.position = anim.to.min(self.max_position);
            self.animation = None;
            return;
        }
        let progress = elapsed.as_secs_f64() / JUMP_DURATION.as_secs_f64();
        let from = f64::from(anim.from);
        let to = f64::from(anim.to);
        let pos = (from + (to - from) * progress).round();
        self.position = (pos as u16).min(self.max_position);
    }

    pub fn back_to_top_visible(&self) -> bool {
        self.position > BACK_TO_TOP_THRESHOLD
    }
}

fn same_hour(a: &NaiveDateTime, b: &NaiveDateTime) -> bool {
    a.year() == b.year() && a.month() == b.month() && a.day() == b.day() && a.hour() == b.hour()
}

/// Scroll position that puts the block for the current hour just under the
/// fixed header and the sticky date header. `None` when no hour matches.
pub fn now_target(
    series: &HourlySeries,
    timeline: &Timeline,
    now: &NaiveDateTime,
    layout: &PageLayout,
) -> Option<u16> {
    let index = series.time.iter().position(|t| same_hour(t, now))?;
    let row = u16::try_from(timeline.row_of(index)?).ok()?;
    let date_height = if timeline.has_date_header() {
        STICKY_DATE_HEIGHT
    } else {
        0
    };
    Some(
        layout
            .timeline_start
            .saturating_add(row)
            .saturating_sub(layout.header_height)
            .saturating_sub(date_height)
            .saturating_sub(NOW_MARGIN),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openmeteo::parse_timestamp;
    use crate::units::temperature::Unit;

    fn layout() -> PageLayout {
        PageLayout {
            header_height: 3,
            weather_start: 5,
            timeline_start: 7,
            footer_start: 60,
            document_height: 70,
            viewport_height: 20,
        }
    }

    fn controller(width: u16) -> ScrollController {
        let mut scroll = ScrollController::new(width);
        scroll.set_max_position(layout().max_position());
        scroll
    }

    #[test]
    fn test_compensation_by_width() {
        let narrow = ScrollController::new(60);
        assert_eq!(narrow.compensation(), NARROW_COMPENSATION);
        let edge = ScrollController::new(BREAKPOINT);
        assert_eq!(edge.compensation(), NARROW_COMPENSATION);
        let wide = ScrollController::new(BREAKPOINT + 1);
        assert_eq!(wide.compensation(), WIDE_COMPENSATION);
    }

    #[test]
    fn test_jump_targets() {
        let wide = controller(120);
        assert_eq!(wide.target_for(JumpTarget::Weather, &layout()), 2);
        assert_eq!(wide.target_for(JumpTarget::Footer, &layout()), 59);
        let narrow = controller(60);
        assert_eq!(narrow.target_for(JumpTarget::Weather, &layout()), 1);
        assert_eq!(narrow.target_for(JumpTarget::Footer, &layout()), 58);
    }

    #[test]
    fn test_top_is_always_zero() {
        let mut scroll = controller(120);
        scroll.scroll_to(40);
        assert_eq!(scroll.target_for(JumpTarget::Top, &layout()), 0);
        let start = Instant::now();
        scroll.jump(JumpTarget::Top, &layout(), start);
        scroll.tick(start + JUMP_DURATION);
        assert_eq!(scroll.position(), 0);
    }

    #[test]
    fn test_jump_animates_then_lands_clamped() {
        let mut scroll = controller(120);
        let start = Instant::now();
        scroll.jump(JumpTarget::Footer, &layout(), start);
        assert!(scroll.is_animating());
        assert_eq!(scroll.position(), 0);

        scroll.tick(start + JUMP_DURATION / 2);
        assert_eq!(scroll.position(), 25);

        scroll.tick(start + JUMP_DURATION);
        assert!(!scroll.is_animating());
        assert_eq!(scroll.position(), layout().max_position());
    }

    #[test]
    fn test_manual_scroll_clamps_and_cancels() {
        let mut scroll = controller(120);
        scroll.jump(JumpTarget::Footer, &layout(), Instant::now());
        scroll.scroll_by(-5);
        assert!(!scroll.is_animating());
        assert_eq!(scroll.position(), 0);
        scroll.scroll_by(500);
        assert_eq!(scroll.position(), 50);
    }

    #[test]
    fn test_back_to_top_threshold() {
        let mut scroll = controller(120);
        scroll.scroll_to(BACK_TO_TOP_THRESHOLD);
        assert!(!scroll.back_to_top_visible());
        scroll.scroll_by(1);
        assert!(scroll.back_to_top_visible());
        scroll.scroll_by(-1);
        assert!(!scroll.back_to_top_visible());
    }

    #[test]
    fn test_shrinking_document_clamps_position() {
        let mut scroll = controller(120);
        scroll.scroll_to(40);
        scroll.set_max_position(10);
        assert_eq!(scroll.position(), 10);
    }

    fn series(times: &[&str]) -> HourlySeries {
        let n = times.len();
        HourlySeries {
            time: times.iter().map(|t| parse_timestamp(t).unwrap()).collect(),
            temperature_2m: vec![Some(10.0); n],
            precipitation_probability: vec![Some(0.0); n],
            weathercode: vec![Some(1); n],
        }
    }

    #[test]
    fn test_now_target_finds_current_hour() {
        let s = series(&[
            "2024-03-01T22:00",
            "2024-03-01T23:00",
            "2024-03-02T00:00",
            "2024-03-02T01:00",
        ]);
        let timeline = Timeline::build(&s, Unit::Celsius);
        let now = parse_timestamp("2024-03-02T01:00").unwrap() + chrono::Duration::minutes(42);
        // rows: hdr, 22, 23, hdr, 00, 01 -> index 3 is row 5
        let target = now_target(&s, &timeline, &now, &layout());
        assert_eq!(target, Some(7 + 5 - 3 - STICKY_DATE_HEIGHT - NOW_MARGIN));
    }

    #[test]
    fn test_now_target_without_match_is_none() {
        let s = series(&["2024-03-01T22:00", "2024-03-01T23:00"]);
        let timeline = Timeline::build(&s, Unit::Celsius);
        let now = parse_timestamp("2025-03-01T22:00").unwrap();
        assert_eq!(now_target(&s, &timeline, &now, &layout()), None);

        let mut scroll = controller(120);
        scroll.scroll_to(4);
        if let Some(to) = now_target(&s, &timeline, &now, &layout()) {
            scroll.animate_to(to, Instant::now());
        }
        assert_eq!(scroll.position(), 4);
        assert!(!scroll.is_animating());
    }

    #[test]
    fn test_now_target_never_negative() {
        let s = series(&["2024-03-01T22:00"]);
        let timeline = Timeline::build(&s, Unit::Celsius);
        let now = parse_timestamp("2024-03-01T22:00").unwrap();
        let tight = PageLayout {
            timeline_start: 1,
            ..layout()
        };
        assert_eq!(now_target(&s, &timeline, &now, &tight), Some(0));
    }
}
