use std::path::PathBuf;

use clap::builder::{styling::AnsiColor, Styles};
use clap::Parser;

const ABOUT: &str = "Hourly weather timeline TUI";

const LONG_ABOUT: &str = "
TUI for viewing the hourly forecast from Open-Meteo as a timeline grouped by day.

Pick a city by name (e.g. 東京, 大阪, 札幌) or give explicit coordinates with
--lat/--lon. Press `/` inside the app to search the city catalog.

The chosen city is saved, so subsequent runs of `jikan` will use the last city unless otherwise
specified.
";

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default())
    .usage(AnsiColor::Green.on_default())
    .literal(AnsiColor::Green.on_default())
    .placeholder(AnsiColor::Green.on_default());

#[derive(Parser, Debug)]
#[command(version, styles=STYLES, about=ABOUT, long_about = LONG_ABOUT)]
pub struct Args {
    #[arg(
        help = "City from the catalog (e.g. 東京, 大阪, 札幌)",
        conflicts_with = "lat"
    )]
    pub location: Option<String>,

    #[arg(
        long,
        requires = "lon",
        allow_negative_numbers = true,
        help = "Latitude of a custom location"
    )]
    pub lat: Option<f64>,

    #[arg(
        long,
        requires = "lat",
        allow_negative_numbers = true,
        help = "Longitude of a custom location"
    )]
    pub lon: Option<f64>,

    #[arg(long, requires = "lat", help = "Display name for --lat/--lon")]
    pub name: Option<String>,

    #[arg(
        long,
        requires = "lat",
        help = "Remember the --lat/--lon location for later runs"
    )]
    pub save: bool,

    #[arg(long, help = "Show temperatures in Fahrenheit")]
    pub fahrenheit: bool,

    #[arg(long, value_name = "FILE", help = "Saved location record")]
    pub store: Option<PathBuf>,

    #[arg(
        long,
        value_name = "FILE",
        help = "JSON array of {name, lat, lon} replacing the bundled cities"
    )]
    pub cities: Option<PathBuf>,

    #[arg(
        long,
        value_name = "FILE",
        help = "Log file (level from RUST_LOG, default info)"
    )]
    pub log_file: Option<PathBuf>,

    #[arg(
        long,
        value_name = "URL",
        default_value = crate::openmeteo::BASE_URL,
        help = "Forecast service base URL"
    )]
    pub base_url: String,
}
