mod commands;
mod config;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::commands::{
    cmd_add, cmd_clear_checked, cmd_count, cmd_import, cmd_list, cmd_remove, cmd_set_checked,
    cmd_status, cmd_whoami, json_error,
};
use crate::config::Config;
use flavour_core::identity::Identity;
use flavour_core::service::ShoppingListService;
use flavour_core::store::SqliteStore;

#[derive(Parser)]
#[command(
    name = "flavour",
    version,
    about = "Shopping list for the recipes you plan to cook",
    long_about = "Shopping list for the recipes you plan to cook.\n\n\
        Ingredients are tracked per recipe and per user; checked-off items stay \
        checked until they are cleared or their recipe is removed."
)]
struct Cli {
    /// Path to the database file (default: platform data directory)
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,
    /// Act as this user instead of the signed-in one
    #[arg(long, global = true, value_name = "ID")]
    user: Option<String>,
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show which user the shopping list belongs to
    Whoami,
    /// Add a recipe's ingredients to the shopping list
    Add {
        /// Recipe id
        recipe_id: String,
        /// Recipe title
        title: String,
        /// Ingredients, in recipe order
        #[arg(required = true)]
        ingredients: Vec<String>,
    },
    /// Add a recipe from a Cooklang (.cook) file
    Import {
        /// Path to the .cook file
        file: PathBuf,
        /// Recipe id (defaults to a slug of the title)
        #[arg(long)]
        id: Option<String>,
        /// Recipe title (defaults to metadata title or filename)
        #[arg(long)]
        title: Option<String>,
    },
    /// Check off an ingredient
    Check {
        /// Recipe id
        recipe_id: String,
        /// Ingredient index within the recipe
        index: usize,
    },
    /// Un-check an ingredient
    Uncheck {
        /// Recipe id
        recipe_id: String,
        /// Ingredient index within the recipe
        index: usize,
    },
    /// Show whether an ingredient is checked
    Status {
        /// Recipe id
        recipe_id: String,
        /// Ingredient index within the recipe
        index: usize,
    },
    /// Show the shopping list
    List {
        /// Only show ingredients still to buy
        #[arg(short, long)]
        unchecked: bool,
    },
    /// Count ingredients still to buy
    Count,
    /// Remove a recipe and its check marks
    Remove {
        /// Recipe id
        recipe_id: String,
    },
    /// Drop every checked ingredient from the list
    ClearChecked,
}

fn main() {
    setup_logging();
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(e) = run(cli) {
        if json {
            println!("{}", json_error(&format!("{e:#}")));
        } else {
            eprintln!("Error: {e:#}");
        }
        process::exit(1);
    }
}

/// Log to stderr so stdout stays clean for `--json` output.
fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.db)?;
    debug!(db = %config.db_path.display(), "opening shopping list database");
    let store = SqliteStore::open(&config.db_path)?;
    let mut svc = ShoppingListService::new(store);

    let (user, source) = match cli.user {
        Some(id) if id.trim().is_empty() => bail!("--user must not be empty"),
        Some(id) => (Identity::new(id), None),
        None => {
            let resolved = svc.resolve_identity()?;
            (resolved.identity, Some(resolved.source))
        }
    };
    debug!(%user, ?source, "resolved identity");

    let json = cli.json;
    match cli.command {
        Commands::Whoami => cmd_whoami(&user, source, json),
        Commands::Add {
            recipe_id,
            title,
            ingredients,
        } => cmd_add(&mut svc, &user, &recipe_id, &title, &ingredients, json),
        Commands::Import { file, id, title } => {
            cmd_import(&mut svc, &user, &file, id, title, json)
        }
        Commands::Check { recipe_id, index } => {
            cmd_set_checked(&mut svc, &user, &recipe_id, index, true, json)
        }
        Commands::Uncheck { recipe_id, index } => {
            cmd_set_checked(&mut svc, &user, &recipe_id, index, false, json)
        }
        Commands::Status { recipe_id, index } => {
            cmd_status(&svc, &user, &recipe_id, index, json)
        }
        Commands::List { unchecked } => cmd_list(&svc, &user, unchecked, json),
        Commands::Count => cmd_count(&svc, &user, json),
        Commands::Remove { recipe_id } => cmd_remove(&mut svc, &user, &recipe_id, json),
        Commands::ClearChecked => cmd_clear_checked(&mut svc, &user, json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["flavour", "check", "r1", "2", "--json", "--user", "u1"])
            .unwrap();
        assert!(cli.json);
        assert_eq!(cli.user.as_deref(), Some("u1"));
        assert!(matches!(
            cli.command,
            Commands::Check { ref recipe_id, index: 2 } if recipe_id == "r1"
        ));
    }

    #[test]
    fn test_add_requires_ingredients() {
        assert!(Cli::try_parse_from(["flavour", "add", "r1", "Soup"]).is_err());
    }

    #[test]
    fn test_run_against_temp_database() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("flavour.db");

        let args = |rest: &[&str]| {
            let mut argv = vec!["flavour", "--json", "--db", db.to_str().unwrap()];
            argv.extend_from_slice(rest);
            Cli::try_parse_from(argv).unwrap()
        };

        run(args(&["add", "r1", "Soup", "salt", "pepper"])).unwrap();
        run(args(&["check", "r1", "0"])).unwrap();

        let svc = ShoppingListService::new(SqliteStore::open(&db).unwrap());
        let user = Identity::guest();
        assert!(svc.get_ingredient_check_state(&user, "r1", 0).unwrap());
        assert_eq!(svc.get_unchecked_count(&user).unwrap(), 1);
    }
}
