//! medtrack main entry point

mod render;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use medtrack_config::{Config, ConfigError};
use medtrack_core::{
    CoreError, MutationOutcome, Notification, Notifier, PersonnelView, SortMode, SortOrder,
    TransactionView,
};
use medtrack_store::JsonFileGateway;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "medtrack")]
#[command(version = "0.1.0")]
#[command(
    about = "Transaction history and personnel register for medical commodities",
    long_about = None
)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Store file, overriding store.path from the configuration
    #[arg(short, long)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the transaction history
    Transactions {
        /// latest or oldest
        #[arg(long)]
        sort: Option<SortOrder>,
    },
    /// Work with the personnel register
    Personnel {
        #[command(subcommand)]
        action: PersonnelCommand,
    },
    /// Print the default configuration
    InitConfig,
}

#[derive(Subcommand, Debug)]
enum PersonnelCommand {
    /// List the register
    List {
        /// Keep only names containing this text
        #[arg(long)]
        search: Option<String>,
        /// alpha-asc, alpha-desc, hospital-asc or hospital-desc
        #[arg(long)]
        sort: Option<SortMode>,
    },
    /// Register a new person
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        hospital: String,
    },
    /// Remove a person by name
    Delete {
        #[arg(long)]
        name: String,
    },
}

/// Prints notifications to stderr; a terminal line is never dismissed, so the
/// duration is only reported at debug level
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        log::debug!(
            "Showing {} notification for {:?}",
            notification.style,
            notification.duration
        );
        eprintln!(
            "[{}] {}",
            notification.style.to_string().to_uppercase(),
            notification.message
        );
    }
}

fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    Config::load(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

fn init_logging(config: &Config) {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();
}

/// Text shown to the operator for a failed command.
///
/// Workflow errors print their inline banner; gateway and config errors print
/// their code and suggestions.
fn error_message(err: &anyhow::Error) -> String {
    if let Some(core) = err.downcast_ref::<CoreError>() {
        if core.is_local() {
            if let Some(banner) = core.banner() {
                return banner;
            }
        }
        return core.to_details().to_string();
    }
    if let Some(config) = err.downcast_ref::<ConfigError>() {
        return format!("{:#}\n{}", err, config.to_details());
    }
    format!("Error: {:#}", err)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", error_message(&err));
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    if let Command::InitConfig = args.command {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let mut config = load_config(&args.config)?;
    if let Some(store) = args.store {
        config.store.path = store;
    }
    init_logging(&config);
    log::info!("Using store {}", config.store.path.display());

    let gateway = Arc::new(JsonFileGateway::new(config.store.path.clone()));
    let notifier = Arc::new(ConsoleNotifier);

    match args.command {
        Command::Transactions { sort } => {
            let view = TransactionView::from_config(gateway, &config);
            if let Some(order) = sort {
                view.set_sort_order(order);
            }
            view.load().await?;
            print!("{}", render::transactions(&view.view_model()?));
        }
        Command::Personnel { action } => {
            let view = PersonnelView::from_config(gateway, notifier, &config);
            view.load().await?;
            run_personnel(&view, action).await?;
        }
        Command::InitConfig => {}
    }

    Ok(())
}

async fn run_personnel(view: &PersonnelView, action: PersonnelCommand) -> Result<()> {
    match action {
        PersonnelCommand::List { search, sort } => {
            if let Some(term) = search {
                view.set_search_term(term);
            }
            if let Some(mode) = sort {
                view.set_sort_mode(mode);
            }
            print!("{}", render::personnel(&view.view_model()?));
        }
        PersonnelCommand::Add { name, hospital } => {
            view.open_add_dialog();
            view.set_draft_name(name)?;
            view.set_draft_affiliation(hospital)?;
            view.stage_draft()?;
            report(view.confirm_and_submit().await?);
        }
        PersonnelCommand::Delete { name } => {
            let record = match view.records()?.into_iter().find(|p| p.name == name) {
                Some(record) => record,
                None => bail!("{} is not in the register", name),
            };
            view.toggle_removal_layout();
            view.select_for_deletion(record)?;
            report(view.confirm_delete().await?);
        }
    }
    Ok(())
}

fn report(outcome: MutationOutcome) {
    if let MutationOutcome::Unconfirmed { error } = outcome {
        log::warn!("Change was not confirmed by the store: {}", error);
    }
}
