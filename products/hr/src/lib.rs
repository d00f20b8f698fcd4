//! Client-side analytics over a fetched employee snapshot.
//!
//! Everything here is a pure function of `&[Employee]`: no I/O, no error type.
//! Missing numeric fields count as zero and a missing city falls into the
//! [`UNSPECIFIED_CITY`] bucket.

mod city_stats;
mod distribution;
mod duplicates;
mod kpi;
mod normalize;

pub use city_stats::{CITY_SENIOR_THRESHOLD, city_statistics};
pub use distribution::{
    CityDistribution, DEFAULT_TOP_CITIES, DistributionEntry, SENIORITY_BUCKETS, SeniorityBucket,
    UNSPECIFIED_CITY, city_distribution, seniority_distribution,
};
pub use duplicates::detect_duplicates;
pub use kpi::{DashboardKpis, KpiThresholds};
pub use normalize::{normalize_text, percentage};

use entity::{DuplicateGroup, Employee};
use serde::Serialize;
use tracing::debug;

/// Every client-side view the dashboard renders from one employee snapshot.
#[derive(Clone, Debug, Serialize)]
pub struct DashboardView {
    pub kpis: DashboardKpis,
    pub cities: CityDistribution,
    pub seniority: Vec<DistributionEntry>,
    pub duplicates: Vec<DuplicateGroup>,
}

impl DashboardView {
    pub fn derive(employees: &[Employee], thresholds: &KpiThresholds) -> Self {
        let view = Self {
            kpis: DashboardKpis::compute(employees, thresholds),
            cities: city_distribution(employees),
            seniority: seniority_distribution(employees),
            duplicates: detect_duplicates(employees),
        };
        debug!(
            employees = view.kpis.total_employees,
            duplicate_groups = view.duplicates.len(),
            "dashboard view derived"
        );
        view
    }
}
