//! Cornerstone CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! cornerstone-cli migrate
//!
//! # Create a dashboard user
//! cornerstone-cli user create -e owner@example.com -n "Site Owner" -r admin --password 'long-passphrase'
//!
//! # Mint a session token for debugging
//! cornerstone-cli token issue -u 1 -e owner@example.com -r admin
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `user create` - Create dashboard users
//! - `token issue` - Issue a session token with the configured secret

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cornerstone-cli")]
#[command(author, version, about = "Cornerstone CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage dashboard users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Work with session tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Email address (used to log in)
        #[arg(short, long)]
        email: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Role (`admin`, `editor`, `viewer`)
        #[arg(short, long, default_value = "admin")]
        role: String,

        /// Initial password (at least 8 characters)
        #[arg(long)]
        password: String,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Print a signed session token
    Issue {
        /// User ID claim
        #[arg(short, long)]
        user_id: String,

        /// Email claim
        #[arg(short, long)]
        email: String,

        /// Role claim
        #[arg(short, long, default_value = "admin")]
        role: String,
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
            UserAction::Create {
                email,
                name,
                role,
                password,
            } => {
                commands::user::create_user(&email, &name, &role, &password).await?;
            }
        },
        Commands::Token { action } => match action {
            TokenAction::Issue {
                user_id,
                email,
                role,
            } => {
                let token = commands::token::issue(&user_id, &email, &role)?;
                #[allow(clippy::print_stdout)]
                {
                    println!("{token}");
                }
            }
        },
    }
    Ok(())
}
