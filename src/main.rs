use std::sync::Arc;

use chrono::{Local, NaiveDate};
use dotenvy::dotenv;
use tracing::info;
use tracing_appender::rolling;

use attendance_marker::api::{AttendanceApi, HttpAttendanceApi};
use attendance_marker::auth::{CredentialProvider, EnvCredential, StaticToken};
use attendance_marker::config::Config;
use attendance_marker::store::AttendanceRecordStore;
use attendance_marker::summary::DaySummary;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .pretty()
        .init();

    let date = match std::env::args().nth(1) {
        Some(raw) => raw.parse::<NaiveDate>()?,
        None => Local::now().date_naive(),
    };
    // Attendance is marked for days that already happened; the store
    // itself does not re-check this.
    let today = Local::now().date_naive();
    anyhow::ensure!(date <= today, "cannot mark attendance for a future date: {date}");

    let credentials: Arc<dyn CredentialProvider> = match &config.api_token {
        Some(token) => Arc::new(StaticToken::new(token.clone())),
        None => Arc::new(EnvCredential::new("API_TOKEN")),
    };
    let api = HttpAttendanceApi::new(&config.api_base_url, credentials);

    info!(%date, "loading day view");

    let mut store =
        AttendanceRecordStore::with_default_times(config.default_check_in, config.default_check_out);
    let users = api.roster().await?;
    store.load_for_date(&api, date, users).await?;

    println!("Attendance for {date}");
    for (user_id, draft) in store.drafts() {
        let name = store.user_name(user_id).unwrap_or(user_id);
        let marker = if draft.already_persisted { "saved" } else { "draft" };
        println!("  {name:<24} {:<22} [{marker}]", draft.status.label());
    }

    let summary = DaySummary::of(&store);
    println!(
        "{} present, {} absent, {} half-day, {} permission, {} pending ({} total)",
        summary.present,
        summary.absent,
        summary.half_day,
        summary.permission,
        summary.pending,
        summary.total()
    );

    Ok(())
}
