use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::{error::Error, io};

mod app;
mod cities;
mod cli;
mod error;
mod openmeteo;
mod scroll;
mod store;
mod timeline;
mod ui;
mod units;
mod weather;

use crate::app::{run_app, App, AppConfig};
use crate::cities::Catalog;
use crate::cli::Args;
use crate::error::CatalogError;
use crate::openmeteo::OpenMeteo;
use crate::store::{Location, LocationStore};
use crate::units::temperature::Unit;

const LOG_FILE: &str = "jikan.log";

fn default_log_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("jikan")
        .join(LOG_FILE)
}

/// The terminal belongs to the UI, so log records go to a file.
fn init_logging(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

/// City argument, then explicit coordinates, then the saved record, then Tokyo.
fn initial_location(
    args: &Args,
    catalog: &Catalog,
    store: &LocationStore,
) -> Result<Location, CatalogError> {
    if let Some(ref name) = args.location {
        let location = Location::from(catalog.lookup(name)?);
        if let Err(err) = store.save(&location) {
            log::warn!("could not save location {}: {err}", location.name);
        }
        return Ok(location);
    }

    if let (Some(lat), Some(lon)) = (args.lat, args.lon) {
        let name = match args.name {
            Some(ref name) => name.clone(),
            None => format!("{lat}, {lon}"),
        };
        let location = Location::new(name, lat, lon);
        if args.save {
            if let Err(err) = store.save(&location) {
                log::warn!("could not save location {}: {err}", location.name);
            }
        }
        return Ok(location);
    }

    Ok(store.load().unwrap_or_default())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let log_path = args.log_file.clone().unwrap_or_else(default_log_path);
    init_logging(&log_path)?;

    let store = match args.store {
        Some(ref path) => LocationStore::new(path),
        None => LocationStore::in_config_dir()?,
    };
    let catalog = match args.cities {
        Some(ref path) => Catalog::from_file(path)?,
        None => Catalog::bundled(),
    };
    let location = initial_location(&args, &catalog, &store)?;
    log::info!(
        "starting with {} ({}, {})",
        location.name,
        location.lat,
        location.lon
    );

    let unit = if args.fahrenheit {
        Unit::Fahrenheit
    } else {
        Unit::Celsius
    };
    let (width, _) = crossterm::terminal::size()?;
    let mut app = App::new(AppConfig {
        source: Arc::new(OpenMeteo::with_base_url(args.base_url.as_str())?),
        store,
        catalog,
        unit,
        location,
        width,
    });

    // setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // create app and run it
    let res = run_app(&mut terminal, &mut app);

    // restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        log::error!("{err}");
        println!("{err}");
    }

    Ok(())
}
