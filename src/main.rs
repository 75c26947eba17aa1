use std::time::Duration;

use anyhow::Context;
use chrono::Local;
use tokio_stream::StreamExt;
use tracing_subscriber::EnvFilter;

use appointments::config::AppConfig;
use appointments::models::{ViewState, ViewingMode};
use appointments::services::api::http::HttpApiClient;
use appointments::services::display::AppointmentSummary;
use appointments::services::view_state::AppointmentsViewModel;
use appointments::services::{appointments as appointment_flow, login};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();
    let username = config.username.clone().unwrap_or_default();
    let password = config.password.clone().unwrap_or_default();
    anyhow::ensure!(
        login::can_submit(&username, &password),
        "APP_USERNAME and APP_PASSWORD must be set"
    );

    let api = HttpApiClient::from_config(&config)?;
    tracing::info!("signing in to {}", config.base_url);
    if let Err(e) = login::sign_in(&api, &username, &password).await {
        anyhow::bail!("{e}");
    }

    let view_model = AppointmentsViewModel::new(config.render_debounce);
    let mut renders = Box::pin(view_model.subscribe());

    appointment_flow::refresh(&api, &view_model)
        .await
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    let wait = config.render_debounce + Duration::from_secs(1);
    let upcoming = tokio::time::timeout(wait, renders.next())
        .await
        .context("timed out waiting for render")?
        .context("view model stopped")?;
    print_view(&upcoming, &config);

    view_model.set_mode(ViewingMode::Past);
    let past = tokio::time::timeout(wait, renders.next())
        .await
        .context("timed out waiting for render")?
        .context("view model stopped")?;
    print_view(&past, &config);

    Ok(())
}

fn print_view(state: &ViewState, config: &AppConfig) {
    tracing::info!("{} appointments: {}", state.mode.as_str(), state.rows.len());
    for row in &state.rows {
        let summary = AppointmentSummary::for_row(row, &Local, &config.display_zone_label);
        tracing::info!(
            id = %row.appointment.id,
            status = %row.appointment.status,
            "{} {} | {} | {} | {}",
            summary.month,
            summary.day,
            summary.title,
            summary.time_range,
            summary.recurrence
        );
    }
}
