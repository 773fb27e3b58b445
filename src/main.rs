//! CLI entry point for folio

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio::commands::{self, Collection};
use folio::{server, Folio};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Blog posts and problem writeups for a portfolio site", long_about = None)]
struct Cli {
    /// Set the site directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List a collection, newest first
    #[command(alias = "ls")]
    List {
        #[arg(value_enum, default_value = "blog")]
        collection: Collection,

        /// Include drafts
        #[arg(short, long)]
        all: bool,
    },

    /// Print one published record
    Show {
        #[arg(value_enum)]
        collection: Collection,

        slug: String,

        /// Render the body to HTML
        #[arg(long)]
        html: bool,
    },

    /// Validate every content file
    Check,

    /// Serve the content API
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio=debug,info"
    } else {
        "folio=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot determine current directory")?,
    };

    match cli.command {
        Commands::List { collection, all } => {
            let folio = Folio::new(&base_dir)?;
            commands::list::run(&folio, collection, all).await?;
        }

        Commands::Show {
            collection,
            slug,
            html,
        } => {
            let folio = Folio::new(&base_dir)?;
            commands::show::run(&folio, collection, &slug, html).await?;
        }

        Commands::Check => {
            let folio = Folio::new(&base_dir)?;
            tracing::info!("Checking content in {:?}", folio.content_dir);
            commands::check::run(&folio).await?;
        }

        Commands::Server { port, ip } => {
            let folio = Folio::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            server::start(&folio, &ip, port).await?;
        }

        Commands::Version => {
            println!("folio version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
