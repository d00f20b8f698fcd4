use serde::{Deserialize, Serialize};

/// Seniority statistics for one city.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct CityStatistic {
    pub city: String,
    pub count: u64,
    pub sum: f64,
    pub avg: f64,
    pub min: f64,
    pub max: f64,
    pub variance: f64,
    pub std_dev: f64,
    pub senior_ratio: f64,
    pub junior_ratio: f64,
}
