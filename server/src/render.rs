//! Plain-text views of gateway and analytics results.

use std::fmt::Write as _;

use entity::{CityStatistic, DuplicateGroup, Employee};
use platform_gateway::{CityGroup, HealthStatus};
use platform_settings::{Language, Preferences};
use products_hr::{DashboardView, DistributionEntry, UNSPECIFIED_CITY};

struct Labels {
    employees: &'static str,
    id: &'static str,
    last_name: &'static str,
    first_name: &'static str,
    seniority: &'static str,
    bonus: &'static str,
    address: &'static str,
    city: &'static str,
    count: &'static str,
    share: &'static str,
    unspecified: &'static str,
    total_employees: &'static str,
    average_seniority: &'static str,
    active_cities: &'static str,
    total_bonus: &'static str,
    with_bonus: &'static str,
    seniors: &'static str,
    by_city: &'static str,
    by_seniority: &'static str,
    years: &'static str,
    duplicates_found: &'static str,
    no_duplicates: &'static str,
    occurrences: &'static str,
    different_addresses: &'static str,
    same_address: &'static str,
    city_stats: &'static str,
    no_data: &'static str,
}

static FR: Labels = Labels {
    employees: "employé(s)",
    id: "ID",
    last_name: "Nom",
    first_name: "Prénom",
    seniority: "Ancienneté",
    bonus: "Prime",
    address: "Adresse",
    city: "Ville",
    count: "Effectif",
    share: "%",
    unspecified: "Non spécifiée",
    total_employees: "Total employés",
    average_seniority: "Ancienneté moyenne",
    active_cities: "Villes actives",
    total_bonus: "Prime totale",
    with_bonus: "Employés avec prime",
    seniors: "Employés seniors",
    by_city: "Distribution par ville",
    by_seniority: "Distribution par ancienneté",
    years: "ans",
    duplicates_found: "groupe(s) de doublons potentiels détectés",
    no_duplicates: "Aucun doublon potentiel détecté.",
    occurrences: "occurrences",
    different_addresses: "adresses différentes",
    same_address: "même adresse",
    city_stats: "Statistiques par ville",
    no_data: "Aucune donnée.",
};

static EN: Labels = Labels {
    employees: "employee(s)",
    id: "ID",
    last_name: "Last name",
    first_name: "First name",
    seniority: "Seniority",
    bonus: "Bonus",
    address: "Address",
    city: "City",
    count: "Count",
    share: "%",
    unspecified: "Unspecified",
    total_employees: "Total employees",
    average_seniority: "Average seniority",
    active_cities: "Active cities",
    total_bonus: "Total bonus",
    with_bonus: "Employees with bonus",
    seniors: "Senior employees",
    by_city: "Distribution by city",
    by_seniority: "Distribution by seniority",
    years: "years",
    duplicates_found: "potential duplicate group(s) found",
    no_duplicates: "No potential duplicates found.",
    occurrences: "occurrences",
    different_addresses: "different addresses",
    same_address: "same address",
    city_stats: "Statistics by city",
    no_data: "No data.",
};

fn labels(language: Language) -> &'static Labels {
    match language {
        Language::Fr => &FR,
        Language::En => &EN,
    }
}

/// Left-aligned columns separated by two spaces, with a rule under the header.
fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(idx) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let mut out = line(headers.iter().copied(), &widths);
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    out.push('\n');
    for row in rows {
        out.push_str(&line(row.iter().map(String::as_str), &widths));
        out.push('\n');
    }
    out
}

fn line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<w$}", w = *width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn amount(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_else(|| "-".into())
}

fn years(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 => format!("{v:.0}"),
        Some(v) => format!("{v:.1}"),
        None => "-".into(),
    }
}

fn address(emp: &Employee, l: &Labels) -> String {
    match emp.address.as_ref().map(ToString::to_string) {
        Some(text) if !text.is_empty() => text,
        _ => l.unspecified.to_string(),
    }
}

pub fn employees(list: &[Employee], prefs: &Preferences) -> String {
    let l = labels(prefs.language);
    let rows = list
        .iter()
        .map(|emp| {
            vec![
                emp.id.clone(),
                emp.last_name.clone(),
                emp.first_name.clone(),
                years(emp.seniority),
                amount(emp.bonus),
                address(emp, l),
            ]
        })
        .collect::<Vec<_>>();
    let mut out = table(
        &[l.id, l.last_name, l.first_name, l.seniority, l.bonus, l.address],
        &rows,
    );
    let _ = writeln!(out, "{} {}", list.len(), l.employees);
    out
}

pub fn employee(emp: &Employee, prefs: &Preferences) -> String {
    let l = labels(prefs.language);
    let mut out = String::new();
    let _ = writeln!(out, "{:<12} {}", l.id, emp.id);
    let _ = writeln!(out, "{:<12} {}", l.last_name, emp.last_name);
    let _ = writeln!(out, "{:<12} {}", l.first_name, emp.first_name);
    let _ = writeln!(out, "{:<12} {}", l.seniority, years(emp.seniority));
    let _ = writeln!(out, "{:<12} {}", l.bonus, amount(emp.bonus));
    let _ = writeln!(out, "{:<12} {}", l.address, address(emp, l));
    out
}

fn distribution(title: &str, entries: &[DistributionEntry], prefs: &Preferences) -> String {
    let l = labels(prefs.language);
    let rows = entries
        .iter()
        .map(|entry| {
            let name = if entry.name == UNSPECIFIED_CITY {
                l.unspecified.to_string()
            } else {
                entry.name.clone()
            };
            let mut row = vec![name, entry.value.to_string()];
            if prefs.show_data_points {
                row.push(format!("{}%", entry.percentage));
            }
            row
        })
        .collect::<Vec<_>>();
    let headers: &[&str] = if prefs.show_data_points {
        &["", l.count, l.share]
    } else {
        &["", l.count]
    };
    format!("{title}\n{}", table(headers, &rows))
}

pub fn city_distribution(entries: &[DistributionEntry], prefs: &Preferences) -> String {
    distribution(labels(prefs.language).by_city, entries, prefs)
}

pub fn kpis(view: &DashboardView, top: usize, prefs: &Preferences) -> String {
    let l = labels(prefs.language);
    let k = &view.kpis;
    let mut out = String::new();
    let _ = writeln!(out, "{:<24} {}", l.total_employees, k.total_employees);
    let _ = writeln!(
        out,
        "{:<24} {:.1} {}",
        l.average_seniority, k.average_seniority, l.years
    );
    let _ = writeln!(out, "{:<24} {}", l.active_cities, k.total_cities);
    let _ = writeln!(
        out,
        "{:<24} {:.2} (~{:.2})",
        l.total_bonus,
        k.total_bonus,
        k.average_bonus()
    );
    let _ = writeln!(out, "{:<24} {}", l.with_bonus, k.employees_with_bonus);
    let _ = writeln!(out, "{:<24} {}", l.seniors, k.senior_employees);
    out.push('\n');
    out.push_str(&distribution(l.by_city, view.cities.top(top), prefs));
    out.push('\n');
    let buckets = view
        .seniority
        .iter()
        .map(|bucket| DistributionEntry {
            name: format!("{} {}", bucket.name, l.years),
            ..bucket.clone()
        })
        .collect::<Vec<_>>();
    out.push_str(&distribution(l.by_seniority, &buckets, prefs));
    out
}

pub fn city_statistics(stats: &[CityStatistic], prefs: &Preferences) -> String {
    let l = labels(prefs.language);
    if stats.is_empty() {
        return format!("{}\n{}\n", l.city_stats, l.no_data);
    }
    let rows = stats
        .iter()
        .map(|s| {
            vec![
                s.city.clone(),
                s.count.to_string(),
                format!("{:.2}", s.avg),
                format!("{}", s.min),
                format!("{}", s.max),
                format!("{:.2}", s.variance),
                format!("{:.2}", s.std_dev),
                format!("{:.0}%", s.senior_ratio * 100.0),
                format!("{:.0}%", s.junior_ratio * 100.0),
            ]
        })
        .collect::<Vec<_>>();
    format!(
        "{}\n{}",
        l.city_stats,
        table(
            &[l.city, l.count, "avg", "min", "max", "variance", "std_dev", "senior", "junior"],
            &rows,
        )
    )
}

pub fn duplicates(groups: &[DuplicateGroup], prefs: &Preferences) -> String {
    let l = labels(prefs.language);
    if groups.is_empty() {
        return format!("{}\n", l.no_duplicates);
    }
    let mut out = format!("{} {}\n", groups.len(), l.duplicates_found);
    for group in groups {
        let flag = if group.addresses_differ {
            l.different_addresses
        } else {
            l.same_address
        };
        let _ = writeln!(
            out,
            "\n{} ({} {}, {flag})",
            group.display_name(),
            group.count,
            l.occurrences
        );
        for (idx, id) in group.ids.iter().enumerate() {
            let addr = group
                .addresses
                .get(idx)
                .and_then(Option::as_ref)
                .map(ToString::to_string)
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| l.unspecified.to_string());
            let _ = writeln!(out, "  {id:<26} {addr}");
        }
    }
    out
}

pub fn city_groups(groups: &[CityGroup], prefs: &Preferences) -> String {
    let l = labels(prefs.language);
    if groups.is_empty() {
        return format!("{}\n", l.no_data);
    }
    let mut out = String::new();
    for group in groups {
        let _ = writeln!(out, "{} ({} {})", group.city, group.count, l.employees);
        out.push_str(&employees(&group.employees, prefs));
    }
    out
}

pub fn health(base_url: &str, status: &HealthStatus) -> String {
    let state = if status.is_active() {
        "up".to_string()
    } else {
        format!("not active (status {})", status.status.as_deref().unwrap_or("unknown"))
    };
    format!(
        "backend {base_url}: {state}, {}\n",
        status.message.as_deref().unwrap_or("-")
    )
}

pub fn preferences(prefs: &Preferences, path: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "file              {path}");
    let _ = writeln!(out, "theme             {:?}", prefs.theme);
    let _ = writeln!(out, "language          {:?}", prefs.language);
    let _ = writeln!(out, "cursor_style      {:?}", prefs.cursor_style);
    let _ = writeln!(out, "show_data_points  {}", prefs.show_data_points);
    out
}
