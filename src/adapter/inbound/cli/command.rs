//! Command-line interface definitions.
//!
//! Defines the CLI structure for the larder application using `clap`.
//! Every command runs against the SQLite journal named in the config.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;

use crate::domain::store::DefinitionKind;

/// Ingredient claims and shopping lists across household stores
#[derive(Parser, Debug)]
#[command(name = "larder")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file [default: larder.toml if present]
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the SQLite journal path from the config
    #[arg(long, global = true)]
    pub database: Option<String>,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage stores
    #[command(subcommand)]
    Store(StoreCommand),

    /// Change explicit store inventory
    #[command(subcommand)]
    Stock(StockCommand),

    /// Select, cook or abandon recipes
    #[command(subcommand)]
    Recipe(RecipeCommand),

    /// Propose and settle ingredient claims
    #[command(subcommand)]
    Claim(ClaimCommand),

    /// Show what to buy for a session
    ShoppingList(SessionArg),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Subcommands for `larder store`.
#[derive(Subcommand, Debug)]
pub enum StoreCommand {
    /// Create a quantity-tracked store (fridge, freezer, shelf)
    AddExplicit(AddExplicitArgs),
    /// Create a description-based store (grocery, pantry)
    AddDefinition(AddDefinitionArgs),
    /// Replace a definition store's description
    Describe(DescribeArgs),
    /// List stores in visiting order
    List,
}

/// Subcommands for `larder stock`.
#[derive(Subcommand, Debug)]
pub enum StockCommand {
    /// Add stock to an explicit store
    Add(StockAddArgs),
    /// Remove unreserved stock from an explicit store
    Remove(StockLineArgs),
}

/// Subcommands for `larder recipe`.
#[derive(Subcommand, Debug)]
pub enum RecipeCommand {
    /// Register a recipe chosen for a session
    Select(RecipeSelectArgs),
    /// Consume every reserved claim and mark the recipe cooked
    Cook(RecipeArg),
    /// Release every reserved claim and mark the recipe abandoned
    Abandon(RecipeArg),
    /// List a session's recipes
    List(SessionArg),
}

/// Subcommands for `larder claim`.
#[derive(Subcommand, Debug)]
pub enum ClaimCommand {
    /// Allocate an ingredient requirement for a recipe
    Propose(ClaimProposeArgs),
    /// Release a single claim
    Release(ClaimArg),
    /// Consume a single claim
    Consume(ClaimArg),
    /// List a recipe's claims
    List(RecipeArg),
}

/// Subcommands for `larder config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Validate the configuration file
    Validate,
    /// Display the effective configuration with defaults applied
    Show,
}

/// Arguments for `larder store add-explicit`.
#[derive(Args, Debug)]
pub struct AddExplicitArgs {
    /// Store name
    pub name: String,

    /// Higher priority stores are drawn from first
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub priority: i32,
}

/// Arguments for `larder store add-definition`.
#[derive(Args, Debug)]
pub struct AddDefinitionArgs {
    /// Store name
    pub name: String,

    /// Higher priority stores are consulted first
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub priority: i32,

    /// Shopping list view this store feeds
    #[arg(long, value_enum)]
    pub kind: KindArg,

    /// What the store holds, in plain words
    #[arg(long)]
    pub description: String,
}

/// Arguments for `larder store describe`.
#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// Store id or name
    pub store: String,

    /// New description
    pub description: String,
}

/// Definition store kind.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum KindArg {
    Grocery,
    Pantry,
}

impl From<KindArg> for DefinitionKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Grocery => Self::Grocery,
            KindArg::Pantry => Self::Pantry,
        }
    }
}

/// Arguments for `larder stock add`.
#[derive(Args, Debug)]
pub struct StockAddArgs {
    #[command(flatten)]
    pub line: StockLineArgs,

    /// Free-form note kept on the inventory line
    #[arg(long)]
    pub note: Option<String>,
}

/// An inventory line in a store.
#[derive(Args, Debug)]
pub struct StockLineArgs {
    /// Store id or name
    pub store: String,

    /// Ingredient name
    pub ingredient: String,

    /// Quantity
    #[arg(allow_hyphen_values = true)]
    pub quantity: Decimal,

    /// Unit label (e.g. lb, cup, each)
    pub unit: String,
}

/// Arguments for `larder recipe select`.
#[derive(Args, Debug)]
pub struct RecipeSelectArgs {
    /// Planning session id
    pub session: String,

    /// Recipe name
    pub name: String,
}

/// Arguments for `larder claim propose`.
#[derive(Args, Debug)]
pub struct ClaimProposeArgs {
    /// Recipe id
    pub recipe: String,

    /// Ingredient name
    pub ingredient: String,

    /// Quantity required
    #[arg(allow_hyphen_values = true)]
    pub quantity: Decimal,

    /// Unit label
    pub unit: String,
}

/// A single recipe id.
#[derive(Args, Debug)]
pub struct RecipeArg {
    /// Recipe id
    pub recipe: String,
}

/// A single claim id.
#[derive(Args, Debug)]
pub struct ClaimArg {
    /// Claim id
    pub claim: String,
}

/// A planning session id.
#[derive(Args, Debug)]
pub struct SessionArg {
    /// Planning session id
    pub session: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rust_decimal_macros::dec;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_stock_add() {
        let cli = Cli::parse_from([
            "larder", "stock", "add", "Fridge", "carrots", "1.5", "lb", "--note", "crisper",
        ]);
        let Commands::Stock(StockCommand::Add(args)) = cli.command else {
            panic!("expected stock add");
        };
        assert_eq!(args.line.quantity, dec!(1.5));
        assert_eq!(args.note.as_deref(), Some("crisper"));
    }

    #[test]
    fn parses_definition_store() {
        let cli = Cli::parse_from([
            "larder",
            "--json",
            "store",
            "add-definition",
            "Pantry",
            "--priority",
            "-1",
            "--kind",
            "pantry",
            "--description",
            "dry goods",
        ]);
        assert!(cli.json);
        let Commands::Store(StoreCommand::AddDefinition(args)) = cli.command else {
            panic!("expected store add-definition");
        };
        assert_eq!(args.priority, -1);
        assert_eq!(DefinitionKind::from(args.kind), DefinitionKind::Pantry);
    }

    #[test]
    fn rejects_non_numeric_quantity() {
        let result = Cli::try_parse_from(["larder", "claim", "propose", "r1", "salt", "lots", "tsp"]);
        assert!(result.is_err());
    }
}
