use anyhow::Result;
use chrono::Local;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

mod config;
mod dashboard;
mod league;
mod projection;
mod sleeper;
mod wheel;

use config::Config;
use dashboard::AppState;
use sleeper::SleeperClient;
use wheel::{draw_slot, RandomClient, Wheel, WheelScheduler};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    let sleeper = SleeperClient::new(&config.sleeper_api_url, &config.league_id, config.http_timeout())?;
    info!(
        "🏈 Tracking Sleeper league {} via {}",
        sleeper.league_id(),
        config.sleeper_api_url
    );
    match config.week {
        Some(week) => info!("Current week pinned to {}", week),
        None => info!("Current week from calendar: {}", sleeper::season::current_week()),
    }

    let options = config.wheel_options();
    let random = RandomClient::new(&config.random_service_url, options.len(), config.http_timeout())?;
    info!(
        "Wheel has {} option(s), random service at {}",
        options.len(),
        config.random_service_url
    );

    let (publisher, draws) = draw_slot();
    let wheel = Wheel::new(options, random.clone(), draws);

    // Weekly draw and spin share one task so the spin always sees the draw
    WheelScheduler::new(
        config.draw_at,
        config.spin_at,
        config.schedule_grace(),
        Local::now().naive_local(),
        publisher,
        random,
        wheel.clone(),
    )
    .spawn(config.scheduler_tick());

    // Start the dashboard HTTP server
    let dashboard_state = AppState {
        provider: Arc::new(sleeper),
        wheel,
        season: config.season_params(),
        fixed_week: config.week,
        lookahead_weeks: config.lookahead_weeks,
        race_season_weeks: config.race_season_weeks,
        race_emojis: config.race_emojis()?,
        countdown_target: config.countdown_target,
    };
    let app = dashboard::router(dashboard_state);
    let addr: SocketAddr = config.dashboard_addr.parse()?;
    info!("Dashboard listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Run dashboard server (blocks until shutdown)
    axum::serve(listener, app).await?;

    Ok(())
}
