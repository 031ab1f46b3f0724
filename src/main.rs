use std::fs::OpenOptions;
use std::io;
use std::process::ExitCode;
use std::sync::{mpsc, Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app;
mod catalog;
mod cli;
mod config;
mod error;
mod geo;
mod locale;
mod session;
mod view;
mod weather;
mod weatherapi;

use crate::app::{run_app, spawn_input, spawn_refresh, App};
use crate::cli::Args;
use crate::config::{FileConfig, GeoProvider, Settings};
use crate::error::ConfigError;
use crate::geo::{DisabledGeolocator, FixedGeolocator, GeoDispatcher, Geolocator, IpGeolocator};
use crate::weatherapi::WeatherApi;

pub const USER_AGENT: &str = concat!("wxdash/", env!("CARGO_PKG_VERSION"));

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let settings = match FileConfig::load(args.config.as_deref())
        .and_then(|file| Settings::resolve(&args, file))
    {
        Ok(settings) => settings,
        Err(err @ ConfigError::MissingApiKey) => {
            eprintln!("API 키가 설정되지 않았습니다. 설정 파일 또는 WEATHER_API_KEY를 확인하세요.");
            eprintln!("{err}");
            return Ok(ExitCode::from(2));
        }
        Err(err) => return Err(anyhow::Error::new(err).context("invalid configuration")),
    };

    init_logging(&settings)?;
    info!(language = ?settings.language, "starting");

    let api = WeatherApi::new(&settings.base_url, &settings.api_key, settings.timeout)
        .context("building HTTP client")?;
    let locator = build_geolocator(&settings)?;

    let (tx, rx) = mpsc::channel();
    let geo = GeoDispatcher::new(locator, tx.clone());
    let mut app = App::new(settings.language, settings.selection, geo, |location: &str| {
        api.fetch(location)
    });

    // setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    spawn_input(tx.clone());
    if let Some(every) = settings.refresh {
        spawn_refresh(tx.clone(), every);
    }
    drop(tx);

    let res = run_app(&mut terminal, &mut app, rx);

    // restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.context("dashboard failed")?;
    info!("bye");
    Ok(ExitCode::SUCCESS)
}

/// Logs go to a file: the terminal belongs to the dashboard.
fn init_logging(settings: &Settings) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.log_file)
        .with_context(|| format!("opening log file {}", settings.log_file.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))
        .context("invalid log level")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn build_geolocator(settings: &Settings) -> Result<Arc<dyn Geolocator>> {
    Ok(match &settings.geolocation {
        GeoProvider::Ip { endpoint } => Arc::new(
            IpGeolocator::new(endpoint, settings.timeout).context("building geolocation client")?,
        ),
        GeoProvider::Fixed(coords) => Arc::new(FixedGeolocator(*coords)),
        GeoProvider::Off => Arc::new(DisabledGeolocator),
    })
}
