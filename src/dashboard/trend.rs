use std::collections::BTreeMap;
use crate::data::types::MatchRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    /// `YYYY-MM-DD`
    pub date: String,
    pub avg_goals: f64,
}

impl TrendPoint {
    /// `MM-DD` chart label
    pub fn label(&self) -> &str {
        self.date.get(5..).unwrap_or(&self.date)
    }
}

/// Average goals per calendar date.
///
/// Only the first `window` matches are considered; of their distinct dates
/// the `days` most recent are kept, in ascending order.
pub fn goal_trend(matches: &[MatchRecord], window: usize, days: usize) -> Vec<TrendPoint> {
    let mut by_date: BTreeMap<&str, (u32, u32)> = BTreeMap::new();

    for m in matches.iter().take(window) {
        let slot = by_date.entry(m.date_only()).or_insert((0, 0));
        slot.0 += m.total_goals();
        slot.1 += 1;
    }

    let skip = by_date.len().saturating_sub(days);

    by_date
        .into_iter()
        .skip(skip)
        .map(|(date, (goals, count))| TrendPoint {
            date: date.to_string(),
            avg_goals: goals as f64 / count as f64,
        })
        .collect()
}
