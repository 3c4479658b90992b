// ABOUTME: Invocation velocity over a rolling daily window with sparkline rendering
// ABOUTME: Reports per-day counts, a normalized ASCII sparkline, and a trend label
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

use crate::types::UsageSample;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Moving-average trend over the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    /// Second half of the window clearly above the first
    Rising,
    /// No clear movement either way
    Flat,
    /// Second half of the window clearly below the first
    Falling,
}

/// Invocation count for one calendar date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyCount {
    /// Calendar date (UTC)
    pub date: NaiveDate,
    /// Invocations recorded on that date
    pub count: u32,
}

/// Velocity over the trailing window ending today.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VelocityReport {
    /// Window length in days
    pub window_days: u32,
    /// One entry per day in the window, oldest first (zero-filled)
    pub daily_counts: Vec<DailyCount>,
    /// One sparkline character per day, normalized to the window maximum
    pub sparkline: String,
    /// Mean invocations per day over the window
    pub per_day_average: f64,
    /// Moving-average trend label
    pub trend: Trend,
}

/// Compute velocity over the `window_days` ending at `today` inclusive.
///
/// `window_days` is clamped to at least 1; a one-day window renders a single
/// bar for that day's count.
#[must_use]
pub fn compute_velocity(usage: &[UsageSample], window_days: u32, today: NaiveDate) -> VelocityReport {
    let window_days = window_days.max(1);

    let mut by_date: HashMap<NaiveDate, u32> = HashMap::new();
    for sample in usage {
        *by_date.entry(sample.recorded_at.date_naive()).or_insert(0) += 1;
    }

    let daily_counts: Vec<DailyCount> = (0..window_days)
        .rev()
        .filter_map(|back| today.checked_sub_days(chrono::Days::new(u64::from(back))))
        .map(|date| DailyCount {
            count: by_date.get(&date).copied().unwrap_or(0),
            date,
        })
        .collect();

    let counts: Vec<u32> = daily_counts.iter().map(|d| d.count).collect();
    let total: u32 = counts.iter().sum();
    let per_day_average = f64::from(total) / counts.len().max(1) as f64;

    VelocityReport {
        window_days,
        sparkline: render_sparkline(&counts),
        per_day_average,
        trend: classify_trend(&counts),
        daily_counts,
    }
}

fn render_sparkline(counts: &[u32]) -> String {
    let max = counts.iter().copied().max().unwrap_or(0);
    counts
        .iter()
        .map(|&c| {
            if max == 0 {
                SPARK_LEVELS[0]
            } else {
                let idx = (c as usize * (SPARK_LEVELS.len() - 1)).div_ceil(max as usize);
                SPARK_LEVELS[idx.min(SPARK_LEVELS.len() - 1)]
            }
        })
        .collect()
}

/// Compare the mean of the two window halves; ±15% around flat.
fn classify_trend(counts: &[u32]) -> Trend {
    if counts.len() < 2 {
        return Trend::Flat;
    }
    let mid = counts.len() / 2;
    let first: u32 = counts[..mid].iter().sum();
    let second: u32 = counts[mid..].iter().sum();
    let first_mean = f64::from(first) / mid as f64;
    let second_mean = f64::from(second) / (counts.len() - mid) as f64;

    if first_mean == 0.0 {
        return if second_mean > 0.0 { Trend::Rising } else { Trend::Flat };
    }
    let ratio = second_mean / first_mean;
    if ratio > 1.15 {
        Trend::Rising
    } else if ratio < 0.85 {
        Trend::Falling
    } else {
        Trend::Flat
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn samples_on(d: u32, n: usize) -> Vec<UsageSample> {
        (0..n)
            .map(|i| {
                UsageSample::new(
                    "clarify_research_goals",
                    Utc.with_ymd_and_hms(2026, 3, d, 10, i as u32, 0).single().unwrap(),
                )
            })
            .collect()
    }

    #[test]
    fn empty_history_is_flat_zeros() {
        let report = compute_velocity(&[], 7, day(10));
        assert_eq!(report.daily_counts.len(), 7);
        assert!(report.daily_counts.iter().all(|d| d.count == 0));
        assert_eq!(report.trend, Trend::Flat);
        assert_eq!(report.sparkline.chars().count(), 7);
    }

    #[test]
    fn single_day_window_is_a_single_bar() {
        let usage = samples_on(10, 4);
        let report = compute_velocity(&usage, 1, day(10));
        assert_eq!(report.daily_counts.len(), 1);
        assert_eq!(report.daily_counts[0].count, 4);
        assert_eq!(report.sparkline.chars().count(), 1);
        assert_eq!(report.sparkline, "█");
    }

    #[test]
    fn back_loaded_week_reads_as_rising() {
        let mut usage = Vec::new();
        usage.extend(samples_on(9, 3));
        usage.extend(samples_on(10, 5));
        let report = compute_velocity(&usage, 7, day(10));
        assert_eq!(report.trend, Trend::Rising);
    }

    #[test]
    fn front_loaded_week_reads_as_falling() {
        let mut usage = Vec::new();
        usage.extend(samples_on(4, 5));
        usage.extend(samples_on(5, 4));
        let report = compute_velocity(&usage, 7, day(10));
        assert_eq!(report.trend, Trend::Falling);
    }
}
