//! Points and win-ratio leaderboards.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Medals for the top three places; later places show their number.
const MEDALS: [&str; 3] = ["\u{1F947}", "\u{1F948}", "\u{1F949}"];

/// Top players by points and by win ratio.
///
/// Serializes as a two-element array `[[[name, points], ...], [[name, ratio], ...]]`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Leaderboard(pub Vec<(String, i64)>, pub Vec<(String, f64)>);

impl Leaderboard {
    /// Leaders by points, best first.
    pub fn by_points(&self) -> &[(String, i64)] {
        &self.0
    }

    /// Leaders by win ratio, best first.
    pub fn by_win_ratio(&self) -> &[(String, f64)] {
        &self.1
    }

    /// Renders both tables as plain text, at most `limit` rows each.
    #[instrument(skip(self))]
    pub fn render(&self, limit: usize) -> String {
        let mut out = String::from("Leaderboard\n");
        render_table(
            &mut out,
            "points",
            self.by_points().iter().map(|(name, points)| (name.as_str(), points.to_string())),
            limit,
        );
        render_table(
            &mut out,
            "win ratio",
            self.by_win_ratio().iter().map(|(name, ratio)| (name.as_str(), format!("{:.2}", ratio))),
            limit,
        );
        out
    }
}

/// Rank label for a zero-based place.
pub fn rank_label(place: usize) -> String {
    MEDALS
        .get(place)
        .map(|m| m.to_string())
        .unwrap_or_else(|| (place + 1).to_string())
}

fn render_table<'a>(
    out: &mut String,
    attribute: &str,
    rows: impl Iterator<Item = (&'a str, String)>,
    limit: usize,
) {
    out.push_str(&format!("{:<10}{:<20}{}\n", "position", "username", attribute));
    for (place, (name, value)) in rows.take(limit).enumerate() {
        out.push_str(&format!("{:<10}{:<20}{}\n", rank_label(place), name, value));
    }
}
