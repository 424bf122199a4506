//! Recipe Box CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! rb-cli migrate
//!
//! # Create a user (password from --password or RECIPE_BOX_USER_PASSWORD)
//! rb-cli user create -u alice
//!
//! # Search recipes from the terminal
//! rb-cli recipes search -i "apple,flour" -n 3
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "rb-cli")]
#[command(author, version, about = "Recipe Box CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Query the recipe provider
    Recipes {
        #[command(subcommand)]
        action: RecipesAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// Password (at least 8 characters)
        #[arg(short, long, env = "RECIPE_BOX_USER_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[derive(Subcommand)]
enum RecipesAction {
    /// Search recipes by ingredients
    Search {
        /// Comma-separated ingredients, e.g. "apple,flour"
        #[arg(short, long)]
        ingredients: String,

        /// Number of recipes (defaults to RECIPE_SEARCH_COUNT)
        #[arg(short, long)]
        number: Option<u32>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::User { action } => match action {
            UserAction::Create { username, password } => {
                commands::user::create(&username, &password).await?;
            }
        },
        Commands::Recipes { action } => match action {
            RecipesAction::Search {
                ingredients,
                number,
            } => commands::recipes::search(&ingredients, number).await?,
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_recipes_search() {
        let cli = Cli::try_parse_from(["rb-cli", "recipes", "search", "-i", "apple,flour", "-n", "3"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Recipes {
                action: RecipesAction::Search { number: Some(3), .. }
            })
        ));
    }
}
