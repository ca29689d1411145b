//! WMO weather code → icon and timeline color.
//!
//! Bands are checked in ascending code order and the first match wins.
//! Codes 85 and 86 pick up the snow icon but keep the default color.

use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Sun,
    Moon,
    PartlyCloudy,
    Cloud,
    Fog,
    Rain,
    Snow,
    Storm,
}

impl Icon {
    pub fn symbol(self) -> &'static str {
        match self {
            Icon::Sun => "☀️",
            Icon::Moon => "🌙",
            Icon::PartlyCloudy => "⛅️",
            Icon::Cloud => "☁️",
            Icon::Fog => "🌫️",
            Icon::Rain => "🌧️",
            Icon::Snow => "🌨️",
            Icon::Storm => "⛈️",
        }
    }
}

pub const GOLD: Color = Color::Rgb(0xFF, 0xD7, 0x00);
pub const LIGHT_YELLOW: Color = Color::Rgb(0xFF, 0xE6, 0x80);
pub const GRAY: Color = Color::Rgb(0xC0, 0xC0, 0xC0);
pub const BLUE: Color = Color::Rgb(0x4A, 0x90, 0xE2);
pub const WHITE: Color = Color::Rgb(0xFF, 0xFF, 0xFF);
pub const DARK_BLUE: Color = Color::Rgb(0x2F, 0x5F, 0xB3);
pub const PURPLE: Color = Color::Rgb(0x80, 0x00, 0x80);
pub const LIGHT_GRAY: Color = Color::Rgb(0xDD, 0xDD, 0xDD);

/// Night runs from 18:00 up to (not including) 06:00.
pub fn is_night(hour: u32) -> bool {
    hour >= 18 || hour < 6
}

pub fn icon_for(code: i32, hour: u32) -> Icon {
    let night = is_night(hour);
    match code {
        0 if night => Icon::Moon,
        0 => Icon::Sun,
        1..=2 if night => Icon::Moon,
        1..=2 => Icon::PartlyCloudy,
        3 => Icon::Cloud,
        45 | 48 => Icon::Fog,
        51..=67 => Icon::Rain,
        71..=77 => Icon::Snow,
        80..=82 => Icon::Rain,
        85 | 86 => Icon::Snow,
        95..=99 => Icon::Storm,
        _ => Icon::Cloud,
    }
}

pub fn color_for(code: i32) -> Color {
    match code {
        0 => GOLD,
        1..=3 => LIGHT_YELLOW,
        45 | 48 => GRAY,
        51..=67 => BLUE,
        71..=77 => WHITE,
        80..=82 => DARK_BLUE,
        95..=99 => PURPLE,
        _ => LIGHT_GRAY,
    }
}

/// Foreground that stays readable on top of `color_for(code)`.
pub fn text_color_for(code: i32) -> Color {
    match color_for(code) {
        BLUE | DARK_BLUE | PURPLE => Color::White,
        _ => Color::Black,
    }
}
