//! Command-line adapter.
//!
//! Parses nothing itself: `main` hands a parsed [`command::Cli`] to [`run`],
//! which loads config, builds the planner and dispatches to a handler.

pub mod claim;
pub mod command;
pub mod config;
pub mod diagnostic;
pub mod output;
pub mod recipe;
pub mod shopping;
pub mod stock;
pub mod store;

use self::command::{
    ClaimCommand, Cli, Commands, ConfigCommand, RecipeCommand, StockCommand, StoreCommand,
};
use self::output::OutputConfig;
use crate::application::planner::MealPlanner;
use crate::domain::id::StoreId;
use crate::domain::store::StoreRecord;
use crate::error::{PlannerError, Result};
use crate::infrastructure::factory::planner::build_planner;

/// Run one CLI invocation.
///
/// # Errors
///
/// Returns a rendered diagnostic for config, journal and planner failures.
pub async fn run(cli: Cli) -> miette::Result<()> {
    output::configure(OutputConfig::new(cli.json, cli.quiet));

    let (mut config, path) = config::load(cli.config.as_deref())?;
    if let Some(database) = cli.database {
        config.database = database;
    }
    match cli.verbose {
        0 if cli.quiet => config.logging.level = "warn".into(),
        0 => {}
        1 => config.logging.level = "debug".into(),
        _ => config.logging.level = "trace".into(),
    }
    config.init_logging();

    match cli.command {
        Commands::Config(ConfigCommand::Validate) => {
            config::validate(path.as_deref());
            Ok(())
        }
        Commands::Config(ConfigCommand::Show) => {
            config::show(&config);
            Ok(())
        }
        command => {
            let planner = build_planner(&config).map_err(diagnostic::report)?;
            dispatch(&planner, command)
                .await
                .map_err(diagnostic::report)
        }
    }
}

async fn dispatch(planner: &MealPlanner, command: Commands) -> Result<()> {
    match command {
        Commands::Store(StoreCommand::AddExplicit(args)) => store::add_explicit(planner, &args),
        Commands::Store(StoreCommand::AddDefinition(args)) => {
            store::add_definition(planner, &args)
        }
        Commands::Store(StoreCommand::Describe(args)) => store::describe(planner, &args),
        Commands::Store(StoreCommand::List) => store::list(planner),
        Commands::Stock(StockCommand::Add(args)) => stock::add(planner, &args),
        Commands::Stock(StockCommand::Remove(args)) => stock::remove(planner, &args),
        Commands::Recipe(RecipeCommand::Select(args)) => recipe::select(planner, &args),
        Commands::Recipe(RecipeCommand::Cook(args)) => recipe::cook(planner, &args),
        Commands::Recipe(RecipeCommand::Abandon(args)) => recipe::abandon(planner, &args),
        Commands::Recipe(RecipeCommand::List(args)) => recipe::list(planner, &args),
        Commands::Claim(ClaimCommand::Propose(args)) => claim::propose(planner, &args).await,
        Commands::Claim(ClaimCommand::Release(args)) => claim::release(planner, &args),
        Commands::Claim(ClaimCommand::Consume(args)) => claim::consume(planner, &args),
        Commands::Claim(ClaimCommand::List(args)) => claim::list(planner, &args),
        Commands::ShoppingList(args) => shopping::execute(planner, &args),
        Commands::Config(_) => Ok(()),
    }
}

/// Find a store by id or name.
fn lookup_store(planner: &MealPlanner, key: &str) -> Result<StoreRecord> {
    planner.find_store(key).ok_or_else(|| {
        PlannerError::StoreNotFound {
            store: StoreId::from(key),
        }
        .into()
    })
}
