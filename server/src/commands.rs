use anyhow::{Context, Result};
use entity::{AddressValue, EmployeeDraft};
use platform_gateway::EmployeeGateway;
use platform_settings::Preferences;
use products_hr::{
    DashboardView, KpiThresholds, city_distribution, city_statistics, detect_duplicates,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::render;
use crate::{AnalyticsCommand, Command, EmployeeFields, EmployeesCommand, PrefsCommand};

pub async fn run(command: Command, config: &AppConfig) -> Result<()> {
    let prefs = load_preferences(config);
    match command {
        Command::Prefs(cmd) => prefs_command(cmd, prefs, config),
        Command::Health => {
            let gateway = config.gateway().await?;
            let status = gateway.health_check().await?;
            let base = gateway
                .base_url()
                .map(ToString::to_string)
                .unwrap_or_default();
            emit(config, &status, || render::health(&base, &status))
        }
        Command::Collections => {
            let names = config.gateway().await?.collections().await?;
            emit(config, &names, || {
                names.iter().map(|name| format!("{name}\n")).collect()
            })
        }
        Command::Employees(cmd) => {
            let gateway = config.gateway().await?;
            employees_command(cmd, &gateway, &prefs, config).await
        }
        Command::Analytics(cmd) => {
            let gateway = config.gateway().await?;
            analytics_command(cmd, &gateway, &prefs, config).await
        }
    }
}

/// Stored preferences; a broken file falls back to the defaults.
fn load_preferences(config: &AppConfig) -> Preferences {
    config.prefs_store.load().unwrap_or_else(|err| {
        warn!(error = %err, "ignoring stored preferences");
        Preferences::default()
    })
}

fn emit<T: Serialize>(config: &AppConfig, value: &T, text: impl FnOnce() -> String) -> Result<()> {
    if config.json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", text());
    }
    Ok(())
}

async fn employees_command(
    cmd: EmployeesCommand,
    gateway: &EmployeeGateway,
    prefs: &Preferences,
    config: &AppConfig,
) -> Result<()> {
    let list = match cmd {
        EmployeesCommand::List => gateway.list_employees().await?,
        EmployeesCommand::Show { id } => {
            let employee = gateway.get_employee(&id).await?;
            return emit(config, &employee, || render::employee(&employee, prefs));
        }
        EmployeesCommand::Count => {
            let count = gateway.count_employees().await?;
            return emit(config, &serde_json::json!({ "count": count }), || {
                format!("{count}\n")
            });
        }
        EmployeesCommand::Add(fields) => {
            let draft = fields.apply(EmployeeDraft::default());
            let created = gateway.create_employee(&draft).await?;
            info!(id = %created.id, "employee created");
            return emit(config, &created, || {
                format!("created {} ({})\n", created.full_name(), created.id)
            });
        }
        EmployeesCommand::Update { id, fields } => {
            let current = gateway.get_employee(&id).await?;
            let draft = fields.apply(EmployeeDraft::from(&current));
            let ack = gateway.update_employee(&id, &draft).await?;
            info!(%id, changed = ?ack.changed, "employee updated");
            return emit(config, &ack, || match ack.changed {
                Some(false) => format!("{id} unchanged\n"),
                _ => format!("updated {id}\n"),
            });
        }
        EmployeesCommand::Delete { id } => {
            let ack = gateway.delete_employee(&id).await?;
            info!(%id, "employee deleted");
            return emit(config, &ack, || format!("deleted {id}\n"));
        }
        EmployeesCommand::BumpBonus { amount } => {
            let message = gateway.increment_bonus(amount).await?;
            return emit(config, &serde_json::json!({ "message": message }), || {
                format!("{message}\n")
            });
        }
        EmployeesCommand::City { city } => {
            let groups = gateway.employees_in_city(&city).await?;
            return emit(config, &groups, || render::city_groups(&groups, prefs));
        }
        EmployeesCommand::ByName { pattern, position } => {
            gateway.find_by_first_name(&pattern, position.into()).await?
        }
        EmployeesCommand::NameLength { pattern, length } => {
            gateway.find_by_name_length(&pattern, length).await?
        }
        EmployeesCommand::Seniority { years } => gateway.seniority_above(years).await?,
        EmployeesCommand::WithStreet => gateway.with_street().await?,
        EmployeesCommand::Oldest { limit } => gateway.oldest(limit).await?,
        EmployeesCommand::Search { name, cities } => gateway.search(&name, &cities).await?,
    };
    emit(config, &list, || render::employees(&list, prefs))
}

async fn analytics_command(
    cmd: AnalyticsCommand,
    gateway: &EmployeeGateway,
    prefs: &Preferences,
    config: &AppConfig,
) -> Result<()> {
    match cmd {
        AnalyticsCommand::Kpis {
            top,
            senior_years,
            bonus_floor,
        } => {
            let employees = gateway.list_employees().await?;
            let thresholds = KpiThresholds {
                senior_years,
                bonus_floor,
            };
            let view = DashboardView::derive(&employees, &thresholds);
            emit(config, &view, || render::kpis(&view, top, prefs))
        }
        AnalyticsCommand::Cities => {
            let distribution = city_distribution(&gateway.list_employees().await?);
            emit(config, &distribution, || {
                render::city_distribution(distribution.entries(), prefs)
            })
        }
        AnalyticsCommand::CityStats { local } => {
            let stats = if local {
                city_statistics(&gateway.list_employees().await?)
            } else {
                gateway.city_statistics().await?
            };
            emit(config, &stats, || render::city_statistics(&stats, prefs))
        }
        AnalyticsCommand::Doublons { local } => {
            let groups = if local {
                detect_duplicates(&gateway.list_employees().await?)
            } else {
                gateway.duplicate_groups().await?
            };
            emit(config, &groups, || render::duplicates(&groups, prefs))
        }
    }
}

fn prefs_command(cmd: PrefsCommand, mut prefs: Preferences, config: &AppConfig) -> Result<()> {
    let path = config.prefs_store.path().display().to_string();
    if let PrefsCommand::Set {
        theme,
        language,
        cursor_style,
        show_data_points,
    } = cmd
    {
        if let Some(theme) = theme {
            prefs.theme = theme.into();
        }
        if let Some(language) = language {
            prefs.language = language.into();
        }
        if let Some(cursor) = cursor_style {
            prefs.cursor_style = cursor.into();
        }
        if let Some(show) = show_data_points {
            prefs.show_data_points = show;
        }
        config
            .prefs_store
            .save(&prefs)
            .with_context(|| format!("saving preferences to {path}"))?;
    }
    emit(config, &prefs, || render::preferences(&prefs, &path))
}

impl EmployeeFields {
    /// Overlays the given flags on `draft`; absent flags keep its values.
    pub(crate) fn apply(self, mut draft: EmployeeDraft) -> EmployeeDraft {
        if let Some(last) = self.last_name {
            draft.last_name = last;
        }
        if let Some(first) = self.first_name {
            draft.first_name = first;
        }
        if self.seniority.is_some() {
            draft.seniority = self.seniority;
        }
        if self.bonus.is_some() {
            draft.bonus = self.bonus;
        }
        let touches_address = self.number.is_some()
            || self.street.is_some()
            || self.postal_code.is_some()
            || self.city.is_some();
        if touches_address {
            let mut address = draft.address.take().unwrap_or_default();
            if let Some(number) = self.number {
                address.number = Some(address_value(&number));
            }
            if let Some(street) = self.street {
                address.street = Some(street);
            }
            if let Some(code) = self.postal_code {
                address.postal_code = Some(address_value(&code));
            }
            if let Some(city) = self.city {
                address.city = Some(city);
            }
            draft.address = (!address.is_empty()).then_some(address);
        }
        draft
    }
}

/// Digits are sent as JSON numbers, anything else as text.
fn address_value(raw: &str) -> AddressValue {
    let raw = raw.trim();
    match raw.parse::<u32>() {
        Ok(n) if !raw.starts_with('0') || raw == "0" => AddressValue::from(n),
        _ => AddressValue::from(raw),
    }
}
