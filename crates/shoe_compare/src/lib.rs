//! Compare running shoes by pace and estimated GAP over the last 12 months of
//! Strava activities.
//!
//! The flow is: fetch activities, keep runs ([`classify`]), group them by gear
//! and compute statistics ([`aggregate`], [`pace`]), then render ([`report`]).

pub mod aggregate;
pub mod classify;
pub mod error;
pub mod pace;
pub mod report;
pub mod session;

use chrono::{DateTime, Duration, Utc};
use strava_client::{Activity, StravaClient};

pub use aggregate::{ShoeReport, ShoeStatistics};
pub use error::{AppError, AppResult};

/// Length of the analysis window.
pub const WINDOW_DAYS: i64 = 365;

pub fn window_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(WINDOW_DAYS)
}

/// Turn a batch of fetched activities into shoe reports, most-used first.
///
/// Non-running activities are dropped. Gear names are fetched through
/// `client`; lookups that fail fall back to a placeholder name.
pub async fn compare_shoes(client: &dyn StravaClient, activities: &[Activity]) -> Vec<ShoeReport> {
    let running = classify::filter_running_activities(activities);
    tracing::info!(
        total = activities.len(),
        running = running.len(),
        "classified activities"
    );

    let groups = aggregate::group_by_gear(&running);
    let names = aggregate::resolve_gear_names(client, groups.keys()).await;

    let mut reports = aggregate::build_reports(&groups, &names);
    aggregate::sort_by_distance(&mut reports);
    reports
}
