//! CLI entry point for hinoki-blog

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "hinoki-blog")]
#[command(version)]
#[command(about = "Blog front-end for the Fuji Hinoki site, backed by a headless CMS", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
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
    /// Start the blog server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Pre-render all blog pages to static files
    #[command(alias = "g")]
    Generate {
        /// Output directory (defaults to the configured public_dir)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// List site content (post, category, route)
    List {
        /// Type of content to list
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "hinoki_blog=debug,info"
    } else {
        "hinoki_blog=info"
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
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Serve { port, ip } => {
            let site = hinoki_blog::Site::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            hinoki_blog::server::start(&site, &ip, port).await?;
        }

        Commands::Generate { out } => {
            let site = hinoki_blog::Site::new(&base_dir)?;
            tracing::info!("Generating static files...");
            hinoki_blog::commands::generate::run(&site, out.as_deref()).await?;
            println!("Generated successfully!");
        }

        Commands::List { r#type } => {
            let site = hinoki_blog::Site::new(&base_dir)?;
            hinoki_blog::commands::list::run(&site, &r#type).await?;
        }

        Commands::Version => {
            println!("hinoki-blog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
