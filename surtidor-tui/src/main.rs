//! Terminal UI for surtidor that lets users narrow down fuel stations by
//! province, municipality and fuel type.

mod app;
mod cli;
mod input;
mod listing;
mod logging;
mod ui;

use std::{io, sync::Arc, time::Duration as StdDuration};

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use reqwest::Client;
use surtidor_core::service::SurtidorService;
use surtidor_provider_minetur::MineturDirectory;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::app::{App, Fetched};
use crate::cli::Cli;
use crate::input::Action;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logging::init(cli.log_file.as_deref(), cli.command.is_none())?;

    // HTTP + service setup
    let client = Client::builder()
        .user_agent(cli.user_agent.as_str())
        .timeout(StdDuration::from_secs(cli.timeout_secs))
        .build()?;
    let directory = MineturDirectory::with_base_url(client, &cli.base_url)?;
    tracing::info!(base_url = %directory.base_url(), "using fuel-price directory");
    let service = Arc::new(SurtidorService::new(Arc::new(directory)));

    if let Some(command) = cli.command {
        return listing::run(&service, command).await;
    }

    // App state
    let app = App::new(service);

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let res = run(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

async fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    // Both catalogs are independent of any selection
    spawn_provinces(&mut app, &tx);
    spawn_fuel_types(&mut app, &tx);

    loop {
        drain_fetched(&mut app, &mut rx);

        // Draw current UI
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll for input (non-blocking, small timeout to keep CPU low)
        if event::poll(StdDuration::from_millis(100))?
            && let CEvent::Key(key) = event::read()?
        {
            match input::handle_key_event(key, &mut app) {
                Action::Quit => break,
                Action::None => {}
                Action::LoadMunicipalities => {
                    app.error_message = None;
                    spawn_municipalities(&mut app, &tx);
                }
                Action::RefreshStations => {
                    app.error_message = None;
                    spawn_stations(&mut app, &tx);
                }
            }
        }

        // Yield so spawned fetches make progress between polls
        tokio::task::yield_now().await;
    }

    Ok(())
}

fn drain_fetched(app: &mut App, rx: &mut UnboundedReceiver<Fetched>) {
    while let Ok(fetched) = rx.try_recv() {
        app.apply(fetched);
    }
}

fn send(tx: &UnboundedSender<Fetched>, fetched: Fetched) {
    if tx.send(fetched).is_err() {
        tracing::debug!("event loop gone, dropping fetch result");
    }
}

fn spawn_provinces(app: &mut App, tx: &UnboundedSender<Fetched>) {
    let tag = app.requests.provinces.issue();
    app.requests.in_flight += 1;
    let service = Arc::clone(&app.service);
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = service.provinces().await;
        send(&tx, Fetched::Provinces(tag, result));
    });
}

fn spawn_fuel_types(app: &mut App, tx: &UnboundedSender<Fetched>) {
    let tag = app.requests.fuel_types.issue();
    app.requests.in_flight += 1;
    let service = Arc::clone(&app.service);
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = service.fuel_types().await;
        send(&tx, Fetched::FuelTypes(tag, result));
    });
}

fn spawn_municipalities(app: &mut App, tx: &UnboundedSender<Fetched>) {
    let Some(province) = app.selection.province().cloned() else {
        return;
    };
    let tag = app.requests.municipalities.issue();
    app.requests.in_flight += 1;
    let service = Arc::clone(&app.service);
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = service.municipalities(&province).await;
        send(&tx, Fetched::Municipalities(tag, result));
    });
}

/// Re-fetch stations for the current selection; incomplete selections only
/// invalidate whatever listing is still outstanding.
fn spawn_stations(app: &mut App, tx: &UnboundedSender<Fetched>) {
    if app.selection.station_query().is_none() {
        app.requests.stations.cancel();
        return;
    }
    let tag = app.requests.stations.issue();
    app.requests.in_flight += 1;
    let service = Arc::clone(&app.service);
    let selection = app.selection.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = service.stations(&selection, Local::now().naive_local()).await;
        send(&tx, Fetched::Stations(tag, result));
    });
}
