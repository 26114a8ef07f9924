use anyhow::{anyhow, bail, Context, Result};
use chrono::{Months, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use runtime::{AppConfig, CliArgs};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use users_info::api::dto::{ModifyUserReq, UserDto, UserReq};
use users_info::api::error::ErrorResponse;
use users_info::config::UsersInfoConfig;
use users_info::contract::{NewUser, PageRequest, SparseFieldSet, User};
use users_info::domain::error::DomainError;
use users_info::domain::merge;
use users_info::domain::ports::SystemClock;
use users_info::domain::service::Service;
use users_info::domain::validation;
use users_info::infra::storage::InMemoryUsersRepository;

const MODULE_NAME: &str = "users_info";

/// Users Info - validation and partial-update core for the user resource
#[derive(Parser)]
#[command(name = "users-cli")]
#[command(about = "Users Info - validation and partial-update core for the user resource")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Minimum user age in whole years (overrides config)
    #[arg(long)]
    min_age: Option<u32>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check configuration
    Check,
    /// Validate a JSON request document
    Validate {
        /// Which operation the document is meant for
        #[arg(long, value_enum)]
        kind: RequestKind,
        /// Path to the JSON document
        #[arg(long)]
        file: PathBuf,
    },
    /// Run the reference scenarios against an in-memory store
    Demo,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RequestKind {
    Create,
    Replace,
    Modify,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // CLI args passed down to config
    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);
    if let Some(min_age) = cli.min_age {
        override_min_age(&mut config, min_age);
    }

    // Initialize logging
    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, &config.home_dir());
    tracing::info!("users-cli starting");

    // Print config and exit if requested
    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    let users_cfg = UsersInfoConfig::from_module_value(config.module_config(MODULE_NAME))?;

    match cli.command.unwrap_or(Commands::Check) {
        Commands::Check => check_config(&config, &users_cfg),
        Commands::Validate { kind, file } => validate_request(&users_cfg, kind, &file),
        Commands::Demo => run_demo(users_cfg).await,
    }
}

fn override_min_age(config: &mut AppConfig, min_age: u32) {
    let entry = config
        .modules
        .entry(MODULE_NAME.to_string())
        .or_insert_with(|| json!({}));
    match entry.as_object_mut() {
        Some(section) => {
            section.insert("min_age".to_string(), json!(min_age));
        }
        None => *entry = json!({ "min_age": min_age }),
    }
}

fn build_service(users_cfg: &UsersInfoConfig) -> Service {
    Service::new(
        Arc::new(InMemoryUsersRepository::new()),
        Arc::new(SystemClock),
        users_cfg.clone().into(),
    )
}

fn check_config(config: &AppConfig, users_cfg: &UsersInfoConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!(
        "users_info: min_age={} default_page_size={} max_page_size={}",
        users_cfg.min_age, users_cfg.default_page_size, users_cfg.max_page_size
    );
    println!("{}", config.to_yaml()?);
    Ok(())
}

/// Run the validation core over one request document without storing anything.
fn validate_request(users_cfg: &UsersInfoConfig, kind: RequestKind, file: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read request {}", file.display()))?;
    let service = build_service(users_cfg);

    let outcome = match kind {
        RequestKind::Create | RequestKind::Replace => parse::<UserReq>(&raw).and_then(|req| {
            let new_user = req.into_new_user(service.today())?;
            check_new_user(&service, &new_user)?;
            Ok(())
        }),
        RequestKind::Modify => parse::<ModifyUserReq>(&raw).and_then(|req| {
            check_modify(&service, &SparseFieldSet::from(req))?;
            Ok(())
        }),
    };

    match outcome {
        Ok(()) => {
            println!("Request is valid");
            Ok(())
        }
        Err(err) => {
            let body = match &err {
                ValidateError::Parse(e) => ErrorResponse::from_any(e),
                ValidateError::Domain(e) => ErrorResponse::from_domain(e),
            };
            println!("{}", serde_json::to_string_pretty(&body)?);
            bail!("request rejected with status {}", body.status_code)
        }
    }
}

enum ValidateError {
    Parse(serde_json::Error),
    Domain(DomainError),
}

fn parse<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T, ValidateError> {
    serde_json::from_str(raw).map_err(ValidateError::Parse)
}

impl From<DomainError> for ValidateError {
    fn from(e: DomainError) -> Self {
        Self::Domain(e)
    }
}

fn check_new_user(service: &Service, new_user: &NewUser) -> Result<(), DomainError> {
    let today = service.today();
    validation::validate_new_user(new_user, today)?;
    service.age_policy().check(new_user.birth_date, today)
}

fn check_modify(service: &Service, fields: &SparseFieldSet) -> Result<(), DomainError> {
    let today = service.today();
    validation::validate_sparse(fields, today)?;
    let patch = merge::parse_patch(fields)?;
    service.age_policy().check_patch(&patch, today)
}

fn years_before(today: NaiveDate, years: u32) -> Result<NaiveDate> {
    today
        .checked_sub_months(Months::new(years * 12))
        .ok_or_else(|| anyhow!("date out of range: {today} minus {years} years"))
}

fn report<T>(label: &str, result: Result<T, DomainError>, show: impl Fn(T) -> String) {
    match result {
        Ok(value) => println!("{label}: ok {}", show(value)),
        Err(err) => {
            let body = ErrorResponse::from_domain(&err);
            println!("{label}: {} {}", body.status_code, body.error);
        }
    }
}

async fn run_demo(users_cfg: UsersInfoConfig) -> Result<()> {
    tracing::info!("Running demo scenarios");
    let service = build_service(&users_cfg);
    let today = service.today();

    let person = |email: &str, birth_date: NaiveDate| NewUser {
        email: email.to_string(),
        first_name: "Demo".to_string(),
        last_name: "User".to_string(),
        birth_date,
        address: None,
        phone_number: None,
    };
    let to_json = |user: User| {
        serde_json::to_string(&UserDto::from(user)).unwrap_or_else(|e| format!("<{e}>"))
    };

    let adult = service
        .create_user(person("adult@example.com", years_before(today, 30)?))
        .await;
    let adult_id = adult.as_ref().map(|u| u.id).ok();
    report("create 30 years old", adult, to_json);

    report(
        "create 10 years old",
        service
            .create_user(person("child@example.com", years_before(today, 10)?))
            .await,
        to_json,
    );

    let Some(id) = adult_id else {
        bail!("demo could not create its reference user");
    };

    report(
        "modify with empty payload",
        service.modify_user_fields(id, &SparseFieldSet::new()).await,
        to_json,
    );

    let young: SparseFieldSet = [("birthDate", years_before(today, 5)?.to_string())]
        .into_iter()
        .collect();
    report(
        "modify birthDate to 5 years ago",
        service.modify_user_fields(id, &young).await,
        to_json,
    );

    let unknown: SparseFieldSet = [("unknownField", "x")].into_iter().collect();
    report(
        "modify unknown field",
        service.modify_user_fields(id, &unknown).await,
        to_json,
    );

    let from = NaiveDate::from_ymd_opt(1996, 1, 1).ok_or_else(|| anyhow!("invalid date"))?;
    let to = NaiveDate::from_ymd_opt(1992, 1, 1).ok_or_else(|| anyhow!("invalid date"))?;
    report(
        "list 1996-01-01..1992-01-01",
        service.list_users(from, to, PageRequest::default()).await,
        |page| format!("{} users", page.items.len()),
    );

    report("delete", service.delete_user(id).await, |_| String::new());
    report("delete again", service.delete_user(id).await, |_| String::new());

    Ok(())
}
