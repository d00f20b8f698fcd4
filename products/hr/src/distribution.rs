use std::collections::HashMap;

use entity::Employee;
use serde::Serialize;

use crate::normalize::{apportion, percentage};

/// Label used for employees without a city.
pub const UNSPECIFIED_CITY: &str = "unspecified";

/// Number of cities the dashboard shows.
pub const DEFAULT_TOP_CITIES: usize = 5;

/// One slice of a distribution chart.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DistributionEntry {
    pub name: String,
    pub value: usize,
    /// Whole percent; over a full distribution these sum to exactly 100.
    pub percentage: u32,
    /// Unrounded share of the total, in percent.
    pub share: f64,
}

impl DistributionEntry {
    fn new(name: impl Into<String>, value: usize, total: usize) -> Self {
        Self {
            name: name.into(),
            value,
            percentage: 0,
            share: percentage(value, total),
        }
    }
}

/// Fills `percentage` on entries already in display order.
fn assign_percentages(entries: &mut [DistributionEntry], total: usize) {
    let counts = entries.iter().map(|e| e.value).collect::<Vec<_>>();
    for (entry, pct) in entries.iter_mut().zip(apportion(&counts, total)) {
        entry.percentage = pct;
    }
}

/// Employee count per city, most populated first.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CityDistribution {
    entries: Vec<DistributionEntry>,
}

impl CityDistribution {
    /// Full distribution, every city included.
    pub fn entries(&self) -> &[DistributionEntry] {
        &self.entries
    }

    /// The `n` most populated cities, for display.
    pub fn top(&self, n: usize) -> &[DistributionEntry] {
        &self.entries[..n.min(self.entries.len())]
    }
}

pub fn city_distribution(employees: &[Employee]) -> CityDistribution {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for emp in employees {
        *counts.entry(emp.city().unwrap_or(UNSPECIFIED_CITY)).or_default() += 1;
    }

    let total = employees.len();
    let mut entries = counts
        .into_iter()
        .map(|(city, count)| DistributionEntry::new(city, count, total))
        .collect::<Vec<_>>();
    entries.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.name.cmp(&b.name)));
    assign_percentages(&mut entries, total);
    CityDistribution { entries }
}

/// Seniority range `[min, max)` in years; `max = None` is open-ended.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeniorityBucket {
    pub label: &'static str,
    pub min: f64,
    pub max: Option<f64>,
}

impl SeniorityBucket {
    fn contains(&self, years: f64) -> bool {
        years >= self.min && self.max.is_none_or(|max| years < max)
    }
}

/// Integer labels are inclusive; the half-open bounds also place fractional
/// seniority (e.g. 2.5 years) in exactly one bucket.
pub const SENIORITY_BUCKETS: [SeniorityBucket; 5] = [
    SeniorityBucket { label: "0-2", min: f64::NEG_INFINITY, max: Some(3.0) },
    SeniorityBucket { label: "3-5", min: 3.0, max: Some(6.0) },
    SeniorityBucket { label: "6-10", min: 6.0, max: Some(11.0) },
    SeniorityBucket { label: "11-15", min: 11.0, max: Some(16.0) },
    SeniorityBucket { label: "16+", min: 16.0, max: None },
];

pub fn seniority_distribution(employees: &[Employee]) -> Vec<DistributionEntry> {
    let mut counts = [0usize; SENIORITY_BUCKETS.len()];
    for emp in employees {
        let years = emp.seniority_years();
        if let Some(idx) = SENIORITY_BUCKETS.iter().position(|b| b.contains(years)) {
            counts[idx] += 1;
        }
    }

    let total = employees.len();
    let mut entries = SENIORITY_BUCKETS
        .iter()
        .zip(counts)
        .map(|(bucket, count)| DistributionEntry::new(bucket.label, count, total))
        .collect::<Vec<_>>();
    assign_percentages(&mut entries, total);
    entries
}
