//! Repository statistics built from the host's raw statistics payloads.
//!
//! The host reports commit activity as weekly buckets and contributor
//! activity as per-author weekly `{w, a, d, c}` rows. Everything here is a
//! pure fold over those rows; malformed payloads degrade to empty series.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::hierarchy::builder::{EntryKind, TreeEntry};

/// Number of weekly buckets kept for the commit chart.
pub const RECENT_WEEKS: usize = 12;

const WEEK_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Commits in one week.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeeklyCommits {
    /// Week start as `YYYY-MM-DD`.
    pub date: String,
    /// Commits that week.
    pub count: u64,
}

/// Commits in one calendar month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthlyActivity {
    /// `YYYY-MM`.
    pub month: String,
    /// Commits whose week started in that month.
    pub commits: u64,
}

/// One author's totals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContributorMetric {
    /// Host login.
    pub author: String,
    /// Commit count.
    pub commits: u64,
    /// Lines added.
    pub additions: u64,
    /// Lines deleted.
    pub deletions: u64,
}

/// Totals over a time window, with the authors active in it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PeriodicMetric {
    /// Commits in the window.
    pub commits: u64,
    /// Lines added in the window.
    pub additions: u64,
    /// Lines deleted in the window.
    pub deletions: u64,
    /// Authors with at least one commit in the window, most commits first.
    pub contributors: Vec<ContributorMetric>,
}

/// Rollups for the windows a dashboard offers.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Periods {
    /// The week containing "now".
    pub this_week: PeriodicMetric,
    /// Weeks starting in the current calendar month.
    pub this_month: PeriodicMetric,
    /// Weeks starting in the current calendar year.
    pub this_year: PeriodicMetric,
    /// Weeks starting in the previous calendar year.
    pub prev_year: PeriodicMetric,
    /// Everything the host reported.
    pub total: PeriodicMetric,
}

/// Statistics attached to a synced project.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GitStats {
    /// The last [`RECENT_WEEKS`] weeks of commit activity, oldest first.
    pub commits: Vec<WeeklyCommits>,
    /// All-time contributors, most commits first.
    pub contributors: Vec<ContributorMetric>,
    /// File count per extension.
    pub extensions: BTreeMap<String, u64>,
    /// Commit activity per month, oldest first.
    #[serde(default)]
    pub monthly_activity: Vec<MonthlyActivity>,
    /// Windowed rollups.
    #[serde(default)]
    pub periods: Periods,
}

#[derive(Deserialize)]
struct RawWeek {
    week: i64,
    total: u64,
}

#[derive(Deserialize)]
struct RawAuthor {
    login: String,
}

#[derive(Deserialize)]
struct RawContributor {
    author: Option<RawAuthor>,
    total: u64,
    #[serde(default)]
    weeks: Vec<RawContributorWeek>,
}

#[derive(Deserialize)]
struct RawContributorWeek {
    w: i64,
    #[serde(default)]
    a: u64,
    #[serde(default)]
    d: u64,
    #[serde(default)]
    c: u64,
}

fn decode<T: for<'de> Deserialize<'de>>(value: &serde_json::Value, what: &str) -> Vec<T> {
    match serde_json::from_value(value.clone()) {
        Ok(rows) => rows,
        Err(e) => {
            warn!("ignoring malformed {what} payload: {e}");
            Vec::new()
        }
    }
}

fn week_start(timestamp: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp, 0)
}

/// Builds [`GitStats`] from the host's commit-activity and contributor
/// payloads plus the raw tree listing. `now` anchors the period windows.
#[must_use]
pub fn summarize(
    commit_activity: &serde_json::Value,
    contributors: &serde_json::Value,
    entries: &[TreeEntry],
    now: DateTime<Utc>,
) -> GitStats {
    let weeks: Vec<RawWeek> = decode(commit_activity, "commit activity");
    let raw_contributors: Vec<RawContributor> = decode(contributors, "contributors");

    let periods = Periods {
        this_week: rollup(&raw_contributors, |w| w <= now.timestamp() && now.timestamp() - w < WEEK_SECONDS),
        this_month: rollup(&raw_contributors, |w| {
            week_start(w).is_some_and(|d| d.year() == now.year() && d.month() == now.month())
        }),
        this_year: rollup(&raw_contributors, |w| week_start(w).is_some_and(|d| d.year() == now.year())),
        prev_year: rollup(&raw_contributors, |w| week_start(w).is_some_and(|d| d.year() == now.year() - 1)),
        total: rollup(&raw_contributors, |_| true),
    };

    GitStats {
        commits: recent_weeks(&weeks),
        contributors: ranked_contributors(&raw_contributors),
        extensions: extension_histogram(entries),
        monthly_activity: monthly_activity(&weeks),
        periods,
    }
}

fn recent_weeks(weeks: &[RawWeek]) -> Vec<WeeklyCommits> {
    let skip = weeks.len().saturating_sub(RECENT_WEEKS);
    weeks[skip..]
        .iter()
        .filter_map(|week| {
            week_start(week.week)
                .map(|d| WeeklyCommits { date: d.format("%Y-%m-%d").to_string(), count: week.total })
        })
        .collect()
}

fn monthly_activity(weeks: &[RawWeek]) -> Vec<MonthlyActivity> {
    let mut months: BTreeMap<String, u64> = BTreeMap::new();
    for week in weeks {
        if let Some(d) = week_start(week.week) {
            *months.entry(d.format("%Y-%m").to_string()).or_default() += week.total;
        }
    }
    months.into_iter().map(|(month, commits)| MonthlyActivity { month, commits }).collect()
}

fn login(contributor: &RawContributor) -> String {
    contributor.author.as_ref().map_or_else(|| "ghost".to_string(), |a| a.login.clone())
}

fn sort_by_commits(metrics: &mut [ContributorMetric]) {
    metrics.sort_by(|a, b| b.commits.cmp(&a.commits).then_with(|| a.author.cmp(&b.author)));
}

fn ranked_contributors(contributors: &[RawContributor]) -> Vec<ContributorMetric> {
    let mut ranked: Vec<ContributorMetric> = contributors
        .iter()
        .map(|c| ContributorMetric {
            author: login(c),
            commits: c.total,
            additions: c.weeks.iter().map(|w| w.a).sum(),
            deletions: c.weeks.iter().map(|w| w.d).sum(),
        })
        .collect();
    sort_by_commits(&mut ranked);
    ranked
}

fn rollup(contributors: &[RawContributor], in_window: impl Fn(i64) -> bool) -> PeriodicMetric {
    let mut metric = PeriodicMetric::default();
    for contributor in contributors {
        let mut author = ContributorMetric { author: login(contributor), commits: 0, additions: 0, deletions: 0 };
        for week in contributor.weeks.iter().filter(|w| in_window(w.w)) {
            author.commits += week.c;
            author.additions += week.a;
            author.deletions += week.d;
        }
        metric.commits += author.commits;
        metric.additions += author.additions;
        metric.deletions += author.deletions;
        if author.commits > 0 {
            metric.contributors.push(author);
        }
    }
    sort_by_commits(&mut metric.contributors);
    metric
}

/// Counts blob entries per file extension. Names without a dot count as
/// `unknown`; a leading dot (`.env`) counts as the extension.
#[must_use]
pub fn extension_histogram(entries: &[TreeEntry]) -> BTreeMap<String, u64> {
    let mut histogram = BTreeMap::new();
    for entry in entries.iter().filter(|e| e.kind == EntryKind::Blob) {
        let name = entry.path.rsplit('/').next().unwrap_or(&entry.path);
        let ext = match name.rsplit_once('.') {
            Some((_, ext)) if !ext.is_empty() => ext,
            _ => "unknown",
        };
        *histogram.entry(ext.to_string()).or_insert(0) += 1;
    }
    histogram
}
