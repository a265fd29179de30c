//! `zbb_cli` command dispatch.
//!
//! ```text
//! zbb_cli [--user <id>] [--json] <command> [args]
//! ```

pub mod output;

use std::{env, path::PathBuf};

use tracing::{debug, warn};
use zbb_config::ConfigManager;
use zbb_core::{
    public_api, AssignmentService, Clock, LedgerRepository, MonthInitializer, SystemClock,
};
use zbb_domain::MonthId;
use zbb_storage_json::JsonLedgerRepository;

use crate::BudgetError;

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub user: Option<String>,
    pub json: bool,
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    View { month: Option<String> },
    Summary { month: Option<String> },
    Init { month: Option<String> },
    Assign { category: String, month: String, amount: String },
    Suggest { month: Option<String> },
    Safe,
    Categories,
    Import { path: PathBuf },
    Version,
    Help,
}

pub const USAGE: &str = "\
Usage: zbb_cli [--user <id>] [--json] <command> [args]

Commands:
  view [YYYY-MM]                        category balances for a month
  summary [YYYY-MM]                     To Be Budgeted and totals
  init [YYYY-MM]                        create missing budget rows
  assign <category-id> <YYYY-MM> <amt>  set a category's assignment
  suggest [YYYY-MM]                     suggested assignments
  safe                                  safe-to-spend for the current month
  categories                            list active categories
  import <snapshot.json>                replace the user's records
  version                               print the version";

/// Entry point used by the binary: parses `std::env::args` and runs.
pub fn run_cli() -> Result<(), BudgetError> {
    let args = parse_args(env::args().skip(1))?;
    let manager = ConfigManager::from_env()?;
    run(args, &manager)
}

pub fn parse_args<I>(args: I) -> Result<CliArgs, BudgetError>
where
    I: IntoIterator<Item = String>,
{
    let mut user = None;
    let mut json = false;
    let mut positional = Vec::new();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--user" | "-u" => {
                let value = iter
                    .next()
                    .ok_or_else(|| BudgetError::Usage("`--user` needs a value".into()))?;
                user = Some(value);
            }
            "--json" => json = true,
            "--help" | "-h" => positional.insert(0, "help".to_string()),
            flag if flag.starts_with("--") => {
                return Err(BudgetError::Usage(format!("unknown option `{flag}`\n\n{USAGE}")));
            }
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let name = positional.next().unwrap_or_else(|| "help".to_string());
    let mut rest: Vec<String> = positional.collect();
    let command = match name.as_str() {
        "view" => Command::View { month: optional(&mut rest, &name)? },
        "summary" => Command::Summary { month: optional(&mut rest, &name)? },
        "init" => Command::Init { month: optional(&mut rest, &name)? },
        "suggest" => Command::Suggest { month: optional(&mut rest, &name)? },
        "assign" => {
            let [category, month, amount] = exactly::<3>(rest, &name)?;
            Command::Assign { category, month, amount }
        }
        "import" => {
            let [path] = exactly::<1>(rest, &name)?;
            Command::Import { path: PathBuf::from(path) }
        }
        "safe" => no_args(rest, &name, Command::Safe)?,
        "categories" => no_args(rest, &name, Command::Categories)?,
        "version" => no_args(rest, &name, Command::Version)?,
        "help" => Command::Help,
        other => {
            return Err(BudgetError::Usage(format!("unknown command `{other}`\n\n{USAGE}")));
        }
    };
    Ok(CliArgs { user, json, command })
}

fn optional(rest: &mut Vec<String>, command: &str) -> Result<Option<String>, BudgetError> {
    if rest.len() > 1 {
        return Err(too_many(command));
    }
    Ok(rest.pop())
}

fn exactly<const N: usize>(rest: Vec<String>, command: &str) -> Result<[String; N], BudgetError> {
    rest.try_into().map_err(|_| {
        BudgetError::Usage(format!("`{command}` expects {N} argument(s)\n\n{USAGE}"))
    })
}

fn no_args(rest: Vec<String>, command: &str, parsed: Command) -> Result<Command, BudgetError> {
    if rest.is_empty() {
        Ok(parsed)
    } else {
        Err(too_many(command))
    }
}

fn too_many(command: &str) -> BudgetError {
    BudgetError::Usage(format!("too many arguments for `{command}`\n\n{USAGE}"))
}

/// Runs a parsed command against the store configured by `manager`.
pub fn run(args: CliArgs, manager: &ConfigManager) -> Result<(), BudgetError> {
    let config = manager.load()?;
    crate::init_with_filter(config.log_filter.as_deref());
    output::configure_colors(&config);

    match args.command {
        Command::Help => {
            println!("{USAGE}");
            return Ok(());
        }
        Command::Version => {
            println!("zbb_cli {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }

    let data_dir = manager.data_dir(&config);
    debug!(data_dir = %data_dir.display(), "opening ledger store");
    let repository = JsonLedgerRepository::new(data_dir).map_err(BudgetError::saving)?;
    let user = args
        .user
        .unwrap_or_else(|| config.resolve_user().to_string());
    let clock = SystemClock;

    execute(
        &repository,
        &clock,
        Some(user.as_str()),
        config.currency.trim(),
        args.json,
        args.command,
    )
}

fn execute(
    repository: &JsonLedgerRepository,
    clock: &dyn Clock,
    user: Option<&str>,
    currency: &str,
    json: bool,
    command: Command,
) -> Result<(), BudgetError> {
    let current_month = || MonthId::containing(clock.today()).to_string();
    match command {
        Command::View { month } => {
            let month = month.unwrap_or_else(current_month);
            let views = public_api::api_get_month_view(repository, user, &month)?;
            if json {
                output::print_json(&views)?;
            } else {
                output::print_month_view(&month, &views);
            }
        }
        Command::Summary { month } => {
            let month = month.unwrap_or_else(current_month);
            let summary = public_api::api_get_budget_summary(repository, user, &month)?;
            if json {
                output::print_json(&summary)?;
            } else {
                output::print_summary(&summary, currency);
            }
        }
        Command::Init { month } => {
            let user = public_api::authenticate(user)?;
            let month = public_api::parse_month(&month.unwrap_or_else(current_month))?;
            let report = MonthInitializer::new(repository)
                .initialize_month(&user, month)
                .map_err(BudgetError::saving)?;
            for (category, reason) in &report.failed {
                warn!(category = %category, reason = %reason, "budget row not initialized");
            }
            if json {
                output::print_json(&serde_json::json!({
                    "month": month,
                    "created": report.created,
                    "failed": report.failed.len(),
                }))?;
            } else {
                output::print_init_report(month, &report);
            }
        }
        Command::Assign { category, month, amount } => {
            let user = public_api::authenticate(user)?;
            let category_id = public_api::parse_category_id(&category)?;
            let month = public_api::parse_month(&month)?;
            let amount = public_api::parse_amount(&amount)?;
            let row = AssignmentService::new(repository)
                .assign_budget(&user, category_id, month, amount)
                .map_err(|err| match err {
                    zbb_core::CoreError::Repository(_) => BudgetError::saving(err),
                    other => BudgetError::Core(other),
                })?;
            if json {
                output::print_json(&row)?;
            } else {
                output::print_assignment(&row);
            }
        }
        Command::Suggest { month } => {
            let month = month.unwrap_or_else(current_month);
            let suggestions = public_api::api_get_all_suggested_amounts(repository, user, &month)?;
            if json {
                output::print_json(&suggestions)?;
            } else {
                let user = public_api::authenticate(user)?;
                let categories = repository.list_active_categories(&user)?;
                output::print_suggestions(&month, &categories, &suggestions);
            }
        }
        Command::Safe => {
            let result = public_api::api_get_safe_to_spend(repository, clock, user)?;
            if json {
                output::print_json(&result)?;
            } else {
                output::print_safe_to_spend(&result, currency);
            }
        }
        Command::Categories => {
            let user = public_api::authenticate(user)?;
            let categories = repository.list_active_categories(&user)?;
            if json {
                output::print_json(&categories)?;
            } else {
                output::print_categories(&categories);
            }
        }
        Command::Import { path } => {
            let user = public_api::authenticate(user)?;
            let snapshot = repository
                .import_from_path(&user, &path)
                .map_err(BudgetError::saving)?;
            output::print_import(&user, &path, &snapshot);
        }
        Command::Help | Command::Version => {}
    }
    Ok(())
}
