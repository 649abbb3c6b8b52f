//! Greengrocer CLI - Database migrations and development tools.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! gg-cli migrate
//!
//! # Create a shopper profile with sample addresses
//! gg-cli seed profile --uid u1 --email jo@example.com --name "Jo" --with-addresses
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed profile` - Create a shopper profile

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "gg-cli")]
#[command(author, version, about = "Greengrocer CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run storefront database migrations
    Migrate,
    /// Seed the database with development data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Create a shopper profile
    Profile {
        /// Authentication provider uid
        #[arg(short, long)]
        uid: String,

        /// Email address
        #[arg(short, long, default_value = "")]
        email: String,

        /// Display name (defaults to "New User")
        #[arg(short, long)]
        name: Option<String>,

        /// Also create two sample shipping addresses
        #[arg(long)]
        with_addresses: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::storefront().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Profile {
                uid,
                email,
                name,
                with_addresses,
            } => commands::seed::profile(&uid, &email, name, with_addresses).await?,
        },
    }
    Ok(())
}
