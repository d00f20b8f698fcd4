use std::collections::BTreeSet;

use entity::Employee;
use serde::Serialize;

/// Cut-offs used by [`DashboardKpis::compute`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct KpiThresholds {
    /// Employees with strictly more years than this are seniors.
    pub senior_years: f64,
    /// Employees with a bonus strictly above this amount count as paid.
    pub bonus_floor: f64,
}

impl Default for KpiThresholds {
    fn default() -> Self {
        Self {
            senior_years: 10.0,
            bonus_floor: 0.0,
        }
    }
}

/// Whole-dataset headline figures.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DashboardKpis {
    pub total_employees: usize,
    pub average_seniority: f64,
    pub cities: BTreeSet<String>,
    pub total_cities: usize,
    pub total_bonus: f64,
    pub employees_with_bonus: usize,
    pub senior_employees: usize,
}

impl DashboardKpis {
    pub fn compute(employees: &[Employee], thresholds: &KpiThresholds) -> Self {
        let total_employees = employees.len();
        let total_seniority = employees
            .iter()
            .map(Employee::seniority_years)
            .fold(0.0, |acc, years| acc + years);
        let average_seniority = if total_employees > 0 {
            total_seniority / total_employees as f64
        } else {
            0.0
        };

        let cities = employees
            .iter()
            .filter_map(Employee::city)
            .map(str::to_string)
            .collect::<BTreeSet<_>>();

        Self {
            total_employees,
            average_seniority,
            total_cities: cities.len(),
            cities,
            total_bonus: employees
                .iter()
                .map(Employee::bonus_amount)
                .fold(0.0, |acc, amount| acc + amount),
            employees_with_bonus: employees
                .iter()
                .filter(|emp| emp.bonus_amount() > thresholds.bonus_floor)
                .count(),
            senior_employees: employees
                .iter()
                .filter(|emp| emp.seniority_years() > thresholds.senior_years)
                .count(),
        }
    }

    /// Mean bonus over employees that have one.
    pub fn average_bonus(&self) -> f64 {
        if self.employees_with_bonus == 0 {
            0.0
        } else {
            self.total_bonus / self.employees_with_bonus as f64
        }
    }
}
