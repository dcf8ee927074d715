//! Grouping by gear and per-shoe statistics.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;
use strava_client::{Activity, StravaClient};

use crate::classify::filter_non_race_activities;
use crate::pace::{average_pace, estimated_gap, format_pace};

/// Group key for activities without gear.
pub const NO_GEAR_KEY: &str = "no_gear";
pub const NO_GEAR_NAME: &str = "No Shoe Recorded";

/// Activities keyed by gear id, in first-encounter order.
pub type GearGroups = IndexMap<String, Vec<Activity>>;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShoeStatistics {
    pub activity_count: usize,
    pub total_distance_km: f64,
    pub average_pace_min_per_km: f64,
    pub estimated_gap_min_per_km: f64,
    pub non_race_count: usize,
    pub average_pace_non_race_min_per_km: f64,
    pub estimated_gap_non_race_min_per_km: f64,
}

/// Statistics for one shoe, ready for display.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShoeReport {
    pub gear_id: String,
    pub gear_name: String,
    #[serde(flatten)]
    pub stats: ShoeStatistics,
    pub formatted_pace: String,
    pub formatted_gap: String,
    pub formatted_pace_non_race: String,
    pub formatted_gap_non_race: String,
}

pub fn gear_key(activity: &Activity) -> &str {
    match activity.gear_id.as_deref() {
        Some(id) if !id.is_empty() => id,
        _ => NO_GEAR_KEY,
    }
}

pub fn group_by_gear(activities: &[Activity]) -> GearGroups {
    let mut groups = GearGroups::new();
    for activity in activities {
        groups
            .entry(gear_key(activity).to_string())
            .or_default()
            .push(activity.clone());
    }
    groups
}

pub fn compute_shoe_statistics(activities: &[Activity]) -> ShoeStatistics {
    let total_distance_m: f64 = activities.iter().map(|a| a.distance).sum();
    let non_race = filter_non_race_activities(activities);

    ShoeStatistics {
        activity_count: activities.len(),
        total_distance_km: total_distance_m / 1000.0,
        average_pace_min_per_km: average_pace(activities),
        estimated_gap_min_per_km: estimated_gap(activities),
        non_race_count: non_race.len(),
        average_pace_non_race_min_per_km: average_pace(&non_race),
        estimated_gap_non_race_min_per_km: estimated_gap(&non_race),
    }
}

pub fn unknown_shoe_name(gear_id: &str) -> String {
    format!("Unknown Shoe ({gear_id})")
}

/// Look up a display name for every group key.
///
/// Lookup failures degrade to [`unknown_shoe_name`] and are only logged.
pub async fn resolve_gear_names<'a, I>(client: &dyn StravaClient, keys: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut names = HashMap::new();
    for key in keys {
        if key == NO_GEAR_KEY {
            names.insert(key.clone(), NO_GEAR_NAME.to_string());
            continue;
        }
        let name = match client.get_gear(key).await {
            Ok(gear) => gear.name.unwrap_or_else(|| unknown_shoe_name(key)),
            Err(e) => {
                tracing::warn!(gear_id = %key, error = %e, "could not fetch gear");
                unknown_shoe_name(key)
            }
        };
        names.insert(key.clone(), name);
    }
    names
}

pub fn build_report(gear_id: &str, gear_name: String, activities: &[Activity]) -> ShoeReport {
    let stats = compute_shoe_statistics(activities);
    ShoeReport {
        gear_id: gear_id.to_string(),
        gear_name,
        formatted_pace: format_pace(stats.average_pace_min_per_km),
        formatted_gap: format_pace(stats.estimated_gap_min_per_km),
        formatted_pace_non_race: format_pace(stats.average_pace_non_race_min_per_km),
        formatted_gap_non_race: format_pace(stats.estimated_gap_non_race_min_per_km),
        stats,
    }
}

/// One report per group, in group order.
pub fn build_reports(groups: &GearGroups, names: &HashMap<String, String>) -> Vec<ShoeReport> {
    groups
        .iter()
        .map(|(gear_id, activities)| {
            let name = names
                .get(gear_id)
                .cloned()
                .unwrap_or_else(|| format!("Unknown ({gear_id})"));
            build_report(gear_id, name, activities)
        })
        .collect()
}

/// Most-used shoes first. Ties keep their existing order.
pub fn sort_by_distance(reports: &mut [ShoeReport]) {
    reports.sort_by(|a, b| {
        b.stats
            .total_distance_km
            .total_cmp(&a.stats.total_distance_km)
    });
}
