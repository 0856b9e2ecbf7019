//! CLI entry point for consult-site

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "consult-site")]
#[command(version)]
#[command(about = "Content core of a consultancy website", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Read content from a JSON fixture file instead of the content store
    #[arg(short, long, global = true)]
    fixtures: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// List site content
    List {
        /// Type of content to list (posts, case-studies, services)
        #[arg(default_value = "posts")]
        r#type: String,
    },

    /// Print the sitemap XML
    Sitemap,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "consult_site=debug,info"
    } else {
        "consult_site=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let fixtures = cli.fixtures.as_deref();

    match cli.command {
        Commands::Serve { port, ip } => {
            let site = consult_site::Site::new(&base_dir, fixtures)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            consult_site::server::start(&site, &ip, port).await?;
        }

        Commands::List { r#type } => {
            let site = consult_site::Site::new(&base_dir, fixtures)?;
            consult_site::commands::list::run(&site, &r#type).await?;
        }

        Commands::Sitemap => {
            let site = consult_site::Site::new(&base_dir, fixtures)?;
            consult_site::commands::sitemap::run(&site).await?;
        }

        Commands::Version => {
            println!("consult-site version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
