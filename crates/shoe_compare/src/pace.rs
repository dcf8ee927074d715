//! Pace and estimated Grade Adjusted Pace (GAP), in minutes per kilometer.
//!
//! GAP here is a closed-form approximation from total elevation gain: each
//! percent of average grade adds [`GAP_ADJUSTMENT_COEFFICIENT`] to the time
//! factor, and moving time is divided by that factor to get a flat-equivalent
//! time. It will not match Strava's own segment-level GAP.

use strava_client::Activity;

/// About 3.3% time penalty per 1% grade.
pub const GAP_ADJUSTMENT_COEFFICIENT: f64 = 0.033;

/// Activities without positive distance and moving time carry no pace.
fn has_pace(activity: &Activity) -> bool {
    activity.distance > 0.0 && activity.moving_time > 0.0
}

fn minutes_per_km(total_time_s: f64, total_distance_m: f64) -> f64 {
    if total_distance_m == 0.0 {
        return 0.0;
    }
    (total_time_s / (total_distance_m / 1000.0)) / 60.0
}

pub fn average_pace<'a, I>(activities: I) -> f64
where
    I: IntoIterator<Item = &'a Activity>,
{
    let (distance, time) = activities
        .into_iter()
        .filter(|a| has_pace(a))
        .fold((0.0, 0.0), |(d, t), a| (d + a.distance, t + a.moving_time));
    minutes_per_km(time, distance)
}

/// Flat-equivalent moving time for one activity.
pub fn grade_adjusted_time(activity: &Activity) -> f64 {
    let grade_percent = activity.total_elevation_gain / activity.distance * 100.0;
    let elevation_factor = 1.0 + grade_percent * GAP_ADJUSTMENT_COEFFICIENT;
    activity.moving_time / elevation_factor
}

pub fn estimated_gap<'a, I>(activities: I) -> f64
where
    I: IntoIterator<Item = &'a Activity>,
{
    let (distance, adjusted_time) = activities
        .into_iter()
        .filter(|a| has_pace(a))
        .fold((0.0, 0.0), |(d, t), a| {
            (d + a.distance, t + grade_adjusted_time(a))
        });
    minutes_per_km(adjusted_time, distance)
}

/// Format minutes per km as `M:SS`.
///
/// Seconds are truncated, never rounded, so 5.99999 renders as `5:59`.
pub fn format_pace(pace_minutes: f64) -> String {
    if pace_minutes == 0.0 {
        return "0:00".to_string();
    }
    let minutes = pace_minutes.trunc();
    let seconds = ((pace_minutes - minutes) * 60.0).trunc();
    format!("{}:{:02}", minutes as i64, seconds as i64)
}
