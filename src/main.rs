use chrono::Local;
use habit_tracker::rollover::run_rollover;
use habit_tracker::{load_data, persist_data, resolve_data_path, router, AppState};
use std::{env, net::SocketAddr, time::Duration};
use tokio::fs;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let data_path = resolve_data_path()?;
    if let Some(parent) = data_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let mut data = load_data(&data_path).await;
    // Catch up on any boundaries that passed while the process was down.
    if run_rollover(&mut data, Local::now().date_naive()) {
        if let Err(err) = persist_data(&data_path, &data).await {
            error!("failed to persist startup rollover: {}", err.message);
        }
    }

    let state = AppState::new(data_path, data);
    tokio::spawn(rollover_timer(state.clone()));

    let app = router(state.clone());

    let port = env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Routine saves run with every mutation; one last write covers any
    // that hit a transient disk failure.
    let data = state.data.lock().await;
    if let Err(err) = persist_data(&state.data_path, &data).await {
        error!("failed to flush state on shutdown: {}", err.message);
    }
    info!("shut down cleanly");

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

// Hourly is plenty: the finest boundary is the local midnight, and page
// visibility triggers cover the interactive case.
async fn rollover_timer(state: AppState) {
    let mut ticker = tokio::time::interval(Duration::from_secs(60 * 60));
    // The first tick completes immediately and startup already checked.
    ticker.tick().await;
    loop {
        ticker.tick().await;
        let mut data = state.data.lock().await;
        if run_rollover(&mut data, Local::now().date_naive()) {
            if let Err(err) = persist_data(&state.data_path, &data).await {
                error!("failed to persist rollover: {}", err.message);
            }
        }
    }
}
