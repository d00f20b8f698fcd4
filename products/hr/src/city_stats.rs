use std::collections::BTreeMap;

use entity::{CityStatistic, Employee};

use crate::normalize::round2;

/// Seniority (years) above which an employee counts as senior in per-city
/// statistics. At or below it the employee is junior.
pub const CITY_SENIOR_THRESHOLD: f64 = 5.0;

/// Per-city seniority statistics, recomputed from a fetched snapshot.
///
/// Mirrors the backend's `ville-stats` view: only employees with both a city
/// and a recorded seniority take part, and figures are rounded to two
/// decimals. Cities come out in name order.
pub fn city_statistics(employees: &[Employee]) -> Vec<CityStatistic> {
    let mut by_city: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for emp in employees {
        let (Some(city), Some(years)) = (emp.city(), emp.seniority) else {
            continue;
        };
        if !years.is_finite() {
            continue;
        }
        by_city.entry(city).or_default().push(years);
    }

    by_city
        .into_iter()
        .map(|(city, values)| summarize(city, &values))
        .collect()
}

fn summarize(city: &str, values: &[f64]) -> CityStatistic {
    let count = values.len() as f64;
    let sum = values.iter().fold(0.0, |acc, v| acc + v);
    let avg = sum / count;
    let variance = values.iter().map(|v| (v - avg).powi(2)).fold(0.0, |acc, v| acc + v) / count;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let seniors = values.iter().filter(|v| **v > CITY_SENIOR_THRESHOLD).count() as f64;

    CityStatistic {
        city: city.to_string(),
        count: values.len() as u64,
        sum,
        avg: round2(avg),
        min,
        max,
        variance: round2(variance),
        std_dev: round2(variance.sqrt()),
        senior_ratio: round2(seniors / count),
        junior_ratio: round2((count - seniors) / count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entity::Address;

    fn resident(city: Option<&str>, seniority: Option<f64>) -> Employee {
        Employee {
            seniority,
            address: city.map(|c| Address {
                city: Some(c.into()),
                ..Address::default()
            }),
            ..Employee::default()
        }
    }

    #[test]
    fn computes_population_variance_per_city() {
        let employees = vec![
            resident(Some("Toulouse"), Some(2.0)),
            resident(Some("Toulouse"), Some(4.0)),
            resident(Some("Toulouse"), Some(9.0)),
            resident(Some("Albi"), Some(7.0)),
        ];
        let stats = city_statistics(&employees);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].city, "Albi");
        assert_eq!(stats[0].variance, 0.0);
        assert_eq!(stats[0].senior_ratio, 1.0);

        let toulouse = &stats[1];
        assert_eq!(toulouse.count, 3);
        assert_eq!(toulouse.sum, 15.0);
        assert_eq!(toulouse.avg, 5.0);
        assert_eq!(toulouse.min, 2.0);
        assert_eq!(toulouse.max, 9.0);
        // ((2-5)^2 + (4-5)^2 + (9-5)^2) / 3 = 26 / 3
        assert_eq!(toulouse.variance, 8.67);
        assert_eq!(toulouse.std_dev, 2.94);
        assert_eq!(toulouse.senior_ratio, 0.33);
        assert_eq!(toulouse.junior_ratio, 0.67);
    }

    #[test]
    fn skips_records_without_city_or_seniority() {
        let employees = vec![
            resident(None, Some(3.0)),
            resident(Some("Nice"), None),
            resident(Some(" "), Some(8.0)),
        ];
        assert!(city_statistics(&employees).is_empty());
    }
}
