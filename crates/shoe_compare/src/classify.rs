//! Running-type filter and race detection.

use strava_client::Activity;

pub const RUNNING_TYPES: &[&str] = &["Run", "TrailRun", "VirtualRun"];

/// Matched as substrings of the lower-cased activity name.
pub const RACE_KEYWORDS: &[&str] = &[
    "race",
    "parkrun",
    "marathon",
    "half marathon",
    "10k race",
    "5k race",
];

/// Strava's `workout_type` value for a race run.
pub const RACE_WORKOUT_TYPE: i64 = 1;

pub fn is_running_activity(activity: &Activity) -> bool {
    let is_running = |tag: &Option<String>| {
        tag.as_deref()
            .is_some_and(|t| RUNNING_TYPES.contains(&t))
    };
    is_running(&activity.activity_type) || is_running(&activity.sport_type)
}

/// A race is either flagged by `workout_type` or named like one.
///
/// The name check has no word boundaries, so "Space Race Recovery" counts.
pub fn is_race(activity: &Activity) -> bool {
    if activity.workout_type == Some(RACE_WORKOUT_TYPE) {
        return true;
    }
    let name = activity.name.to_lowercase();
    RACE_KEYWORDS.iter().any(|keyword| name.contains(keyword))
}

pub fn filter_running_activities(activities: &[Activity]) -> Vec<Activity> {
    activities
        .iter()
        .filter(|a| is_running_activity(a))
        .cloned()
        .collect()
}

pub fn filter_non_race_activities(activities: &[Activity]) -> Vec<Activity> {
    activities.iter().filter(|a| !is_race(a)).cloned().collect()
}
