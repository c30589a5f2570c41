//! CLI entry point for folio-rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio_rs::config::{Environment, Mode};
use folio_rs::{commands, server, Site};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Content pipeline for a personal website", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Run as production regardless of FOLIO_ENV
    #[arg(long, global = true)]
    production: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate manifests, the config snapshot and mirrored assets
    #[command(alias = "g")]
    Build {
        /// Rebuild when content changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Serve the content API
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Drop cached content when files change
        #[arg(short, long)]
        watch: bool,
    },

    /// List site information
    List {
        /// Type of content to list (post, note, project, tag, route, social)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Search posts, projects and notes
    Search {
        /// Search terms
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Most recent posts and notes
    Recent {
        #[arg(short, long, default_value_t = server::DEFAULT_RECENT_LIMIT)]
        limit: usize,
    },

    /// Content totals and featured items
    Summary,

    /// Print the resolved content configuration
    Config,

    /// Create a new post or note
    New {
        /// Kind of content (post, note)
        #[arg(short, long, default_value = "post")]
        kind: String,

        /// Title of the new item
        title: String,
    },

    /// Remove generated files
    Clean,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio_rs=debug,info"
    } else {
        "folio_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<folio_rs::Error>() {
                Some(err) if err.is_not_found() => eprintln!("Not found: {}", err),
                _ => eprintln!("Error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let mut env = Environment::from_env();
    if cli.production {
        env = env.with_mode(Mode::Production);
    }

    match cli.command {
        Commands::Build { watch } => {
            let site = Site::new(&base_dir, env)?;
            tracing::info!("Building from {:?}", site.content_dir);
            commands::build::run(&site).await?;

            if watch {
                commands::build::watch(&site).await?;
            }
        }

        Commands::Serve { port, ip, watch } => {
            let site = Arc::new(Site::new(&base_dir, env)?.with_revalidate());
            tracing::info!("Starting server at http://{}:{}", ip, port);
            server::start(site, &ip, port, watch).await?;
        }

        Commands::List { r#type } => {
            let site = Site::new(&base_dir, env)?;
            commands::list::run(&site, &r#type).await?;
        }

        Commands::Search { query } => {
            let site = Site::new(&base_dir, env)?;
            commands::query::search(&site, &query.join(" ")).await?;
        }

        Commands::Recent { limit } => {
            let site = Site::new(&base_dir, env)?;
            commands::query::recent(&site, limit).await?;
        }

        Commands::Summary => {
            let site = Site::new(&base_dir, env)?;
            commands::query::summary(&site).await?;
        }

        Commands::Config => {
            let site = Site::new(&base_dir, env)?;
            commands::query::config(&site).await?;
        }

        Commands::New { kind, title } => {
            let site = Site::new(&base_dir, env)?;
            tracing::info!("Creating new {} with title: {}", kind, title);
            commands::new::create(&site, &kind, &title)?;
        }

        Commands::Clean => {
            let site = Site::new(&base_dir, env)?;
            commands::clean::run(&site)?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("folio-rs version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
