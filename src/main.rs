use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use day_planner::channels::EmlDirSource;
use day_planner::error::ConfigError;
use day_planner::logging::init_tracing;
use day_planner::store::JsonFileSavedStore;
use day_planner::timeline::{format_countdown, format_time};
use day_planner::{DayPlanner, PlannerConfig};

/// Directory of `.eml` files to plan from.
const INBOX_ENV: &str = "DAY_PLANNER_INBOX";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let inbox = std::env::var(INBOX_ENV).map_err(|_| ConfigError::MissingEnvVar(INBOX_ENV.into()))?;
    let config = PlannerConfig::from_env().context("invalid planner configuration")?;

    eprintln!("📬 Day Planner v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Inbox: {inbox}");

    let mut planner = DayPlanner::new(config.clone(), Arc::new(EmlDirSource::new(&inbox)));
    if let Some(path) = &config.saved_path {
        eprintln!("   Saved: {}", path.display());
        planner = planner.with_saved_store(Arc::new(JsonFileSavedStore::new(path)));
    }

    let digest = planner
        .refresh()
        .await
        .with_context(|| format!("failed to refresh from {inbox}"))?;

    info!(
        messages = digest.processed.len(),
        important = digest.summary.important.len(),
        bills = digest.summary.bills.len(),
        meetings = digest.meetings.len(),
        conflicts = digest.conflicts.len(),
        tasks = digest.tasks.len(),
        otp = digest.otp_codes.len(),
        reminders = digest.reminders.len(),
        duplicates = digest.duplicate_count,
        noise = digest.noise_count,
        "Digest ready"
    );

    eprintln!("   Stress: {} ({}) {}", digest.stress.level, digest.stress.score, digest.stress.message);
    for item in &digest.deadlines {
        eprintln!("   ⏳ {}: {}", item.title, format_countdown(item));
    }
    for reminder in &digest.reminders {
        eprintln!("   🔔 [{}] {} ({})", reminder.urgency, reminder.text, reminder.source);
    }
    for conflict in &digest.conflicts {
        eprintln!("   ⚠️  {} clash: {}", format_time(conflict.minutes), conflict.titles.join(", "));
    }
    Ok(())
}
