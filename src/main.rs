//! CLI entry point for ignite-blog

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ignite-blog")]
#[command(version)]
#[command(about = "A statically generated blog front-end for a headless CMS", long_about = None)]
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
    /// Pre-render every post
    #[command(alias = "g")]
    Generate,

    /// Start the site server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Serve what is already in the public folder without generating first
        #[arg(long)]
        skip_generate: bool,
    },

    /// Clean the public folder
    Clean,

    /// List posts known to the content source
    List,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "ignite_blog=debug,info"
    } else {
        "ignite_blog=info"
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
        Commands::Generate => {
            let blog = ignite_blog::Blog::new(&base_dir)?;
            tracing::info!("Generating static files...");
            blog.generate().await?;
            println!("Generated successfully!");
        }

        Commands::Server {
            port,
            ip,
            skip_generate,
        } => {
            let blog = ignite_blog::Blog::new(&base_dir)?;

            if !skip_generate {
                tracing::info!("Generating static files...");
                // Posts that failed here are generated on demand
                if let Err(e) = blog.generate().await {
                    tracing::warn!("Build incomplete: {}", e);
                }
            }

            tracing::info!("Starting server at http://{}:{}", ip, port);
            ignite_blog::server::start(&blog, &ip, port).await?;
        }

        Commands::Clean => {
            let blog = ignite_blog::Blog::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            blog.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List => {
            let blog = ignite_blog::Blog::new(&base_dir)?;
            ignite_blog::commands::list::run(&blog).await?;
        }

        Commands::Version => {
            println!("ignite-blog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
