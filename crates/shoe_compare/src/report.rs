//! Console rendering of shoe reports.

use std::fmt::Write as _;

use crate::aggregate::ShoeReport;
use crate::classify::RACE_KEYWORDS;

const RULE_WIDTH: usize = 60;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Render reports in the order given.
pub fn render(reports: &[ShoeReport]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{}", rule());
    let _ = writeln!(out, "Strava Running Shoe Comparison (Last 12 Months)");
    let _ = writeln!(out, "{}", rule());

    if reports.is_empty() {
        let _ = writeln!(out, "\nNo running activities found in the last 12 months.");
        return out;
    }

    for shoe in reports {
        let s = &shoe.stats;
        let _ = writeln!(out, "\n{}", shoe.gear_name);
        let _ = writeln!(
            out,
            "  Total Activities: {} ({} non-race)",
            s.activity_count, s.non_race_count
        );
        let _ = writeln!(out, "  Total Distance: {:.1} km", s.total_distance_km);
        let _ = writeln!(out, "\n  All Runs:");
        let _ = writeln!(out, "    Average Pace: {} /km", shoe.formatted_pace);
        let _ = writeln!(out, "    Estimated GAP: {} /km", shoe.formatted_gap);
        let _ = writeln!(out, "\n  Non-Race Runs:");
        let _ = writeln!(out, "    Average Pace: {} /km", shoe.formatted_pace_non_race);
        let _ = writeln!(out, "    Estimated GAP: {} /km", shoe.formatted_gap_non_race);
    }

    let _ = writeln!(out, "\n{}", rule());
    let _ = writeln!(
        out,
        "\nNote: Estimated GAP is an approximation based on elevation gain."
    );
    let _ = writeln!(out, "It will differ from Strava's proprietary GAP calculation.");
    let _ = writeln!(
        out,
        "\nRace detection includes activities with workout_type=1 (race)"
    );
    let _ = writeln!(out, "or names containing: {}", RACE_KEYWORDS.join(", "));
    let _ = writeln!(out, "{}", rule());
    out
}

/// Progress lines printed once running activities are known.
pub fn progress(running: usize) -> String {
    let mut out = format!("Found {running} running activities.\n");
    if running == 0 {
        out.push_str("\nNo running activities found in the last 12 months.\n");
        return out;
    }
    out.push_str("\nGrouping activities by shoes...\n");
    out.push_str("Fetching shoe information...\n");
    out.push_str("Calculating statistics...\n\n");
    out
}

/// Reports as a pretty-printed JSON array.
pub fn render_json(reports: &[ShoeReport]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(reports)
}
