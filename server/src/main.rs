mod commands;
mod config;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use platform_gateway::{GatewayError, NamePosition};
use platform_obs::{ObsConfig, init_tracing};
use platform_settings::{API_URL_ENV, CursorStyle, Language, Theme};
use tracing::debug;

use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "staffboard", version, about = "Employee dashboard for the HR backend")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Backend base URL, e.g. http://localhost:5000/api
    #[arg(long, global = true, env = API_URL_ENV)]
    api_url: Option<String>,
    /// Runtime config resource (path or URL) providing VITE_API_URL
    #[arg(long, global = true, env = "STAFFBOARD_CONFIG", default_value = "config.json")]
    config: String,
    /// Preferences file
    #[arg(long, global = true, env = "STAFFBOARD_PREFS")]
    prefs: Option<PathBuf>,
    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,
    #[arg(short, long, global = true)]
    verbose: bool,
}

impl From<&GlobalArgs> for AppConfig {
    fn from(value: &GlobalArgs) -> Self {
        AppConfig::new(
            value.api_url.clone(),
            Some(value.config.clone()),
            value.prefs.clone(),
            value.json,
        )
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the backend root answers.
    Health,
    /// Employee records.
    #[command(subcommand)]
    Employees(EmployeesCommand),
    /// List the database collections.
    Collections,
    /// Dashboard analytics.
    #[command(subcommand)]
    Analytics(AnalyticsCommand),
    /// Display preferences.
    #[command(subcommand)]
    Prefs(PrefsCommand),
}

#[derive(Subcommand, Debug)]
enum EmployeesCommand {
    /// List every employee.
    List,
    /// Show one employee.
    Show { id: String },
    /// Count employees.
    Count,
    /// Create an employee.
    Add(EmployeeFields),
    /// Update an employee; omitted fields keep their current value.
    Update {
        id: String,
        #[command(flatten)]
        fields: EmployeeFields,
    },
    /// Delete an employee.
    Delete { id: String },
    /// Employees whose first name matches a pattern.
    ByName {
        pattern: String,
        #[arg(long, value_enum, default_value_t = PositionArg::Start)]
        position: PositionArg,
    },
    /// First names starting with a pattern and of an exact length.
    NameLength { pattern: String, length: usize },
    /// Employees with more than the given years of seniority.
    Seniority { years: u32 },
    /// Employees whose address has a street.
    WithStreet,
    /// Most senior employees.
    Oldest {
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// Employees grouped for one city.
    City { city: String },
    /// First-name prefix within a set of cities.
    Search {
        #[arg(long, default_value = "M")]
        name: String,
        #[arg(long, value_delimiter = ',', default_value = "Bordeaux,Paris")]
        cities: Vec<String>,
    },
    /// Add an amount to every existing bonus.
    BumpBonus {
        #[arg(long, default_value_t = 200.0)]
        amount: f64,
    },
}

#[derive(Args, Debug, Default)]
struct EmployeeFields {
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    seniority: Option<f64>,
    #[arg(long)]
    bonus: Option<f64>,
    #[arg(long)]
    number: Option<String>,
    #[arg(long)]
    street: Option<String>,
    #[arg(long)]
    postal_code: Option<String>,
    #[arg(long)]
    city: Option<String>,
}

#[derive(Subcommand, Debug)]
enum AnalyticsCommand {
    /// Headline KPIs and distributions derived from the employee list.
    Kpis {
        #[arg(long, default_value_t = products_hr::DEFAULT_TOP_CITIES)]
        top: usize,
        #[arg(long, default_value_t = 10.0)]
        senior_years: f64,
        #[arg(long, default_value_t = 0.0)]
        bonus_floor: f64,
    },
    /// Full city distribution, untruncated.
    Cities,
    /// Seniority statistics per city.
    CityStats {
        /// Recompute from the employee list instead of the backend view.
        #[arg(long)]
        local: bool,
    },
    /// Potential duplicate employees.
    Doublons {
        /// Recompute from the employee list instead of the backend view.
        #[arg(long)]
        local: bool,
    },
}

#[derive(Subcommand, Debug)]
enum PrefsCommand {
    Show,
    Set {
        #[arg(long, value_enum)]
        theme: Option<ThemeArg>,
        #[arg(long, value_enum)]
        language: Option<LanguageArg>,
        #[arg(long, value_enum)]
        cursor_style: Option<CursorArg>,
        #[arg(long)]
        show_data_points: Option<bool>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PositionArg {
    Start,
    End,
    Any,
}

impl From<PositionArg> for NamePosition {
    fn from(value: PositionArg) -> Self {
        match value {
            PositionArg::Start => NamePosition::Start,
            PositionArg::End => NamePosition::End,
            PositionArg::Any => NamePosition::Any,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(value: ThemeArg) -> Self {
        match value {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LanguageArg {
    Fr,
    En,
}

impl From<LanguageArg> for Language {
    fn from(value: LanguageArg) -> Self {
        match value {
            LanguageArg::Fr => Language::Fr,
            LanguageArg::En => Language::En,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CursorArg {
    Default,
    Pointer,
    Crosshair,
}

impl From<CursorArg> for CursorStyle {
    fn from(value: CursorArg) -> Self {
        match value {
            CursorArg::Default => CursorStyle::Default,
            CursorArg::Pointer => CursorStyle::Pointer,
            CursorArg::Crosshair => CursorStyle::Crosshair,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let _obs = init_tracing(ObsConfig::default().verbose(cli.global.verbose))
        .map_err(|err| eprintln!("warning: tracing disabled: {err:#}"))
        .ok();
    let config = AppConfig::from(&cli.global);

    match commands::run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!(error = ?err, "command failed");
            eprintln!("error: {}", user_message(&err));
            ExitCode::FAILURE
        }
    }
}

/// One-line message for the terminal; gateway failures carry their code.
fn user_message(err: &anyhow::Error) -> String {
    let Some(gateway) = err.downcast_ref::<GatewayError>() else {
        return format!("{err:#}");
    };
    let text = match gateway {
        GatewayError::Configuration(msg) => msg.clone(),
        GatewayError::Network(inner) => {
            format!("backend unreachable ({inner}); check the API URL and that the backend runs")
        }
        other => other.to_string(),
    };
    format!("[{}] {text}", gateway.code())
}
