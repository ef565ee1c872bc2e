//! CLI entry point for markblog

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use markblog::commands::new::NewPost;
use markblog::content::draft::split_tags;
use markblog::Blog;

#[derive(Parser)]
#[command(name = "markblog")]
#[command(version)]
#[command(about = "A flat-file markdown blog with a local admin interface", long_about = None)]
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
    /// Initialize a new blog
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        #[arg(short, long)]
        author: Option<String>,

        /// Comma-separated tags
        #[arg(short, long, default_value = "")]
        tags: String,

        #[arg(long)]
        category: Option<String>,

        /// Reading time in minutes
        #[arg(short, long)]
        reading_time: Option<u32>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        thumbnail: Option<String>,
    },

    /// Rebuild the post index
    Index {
        /// Keep watching the posts directory and reindex on change
        #[arg(short, long)]
        watch: bool,
    },

    /// List posts, newest first
    List,

    /// Search post titles
    Search {
        query: String,
    },

    /// Delete a post by slug
    Delete {
        slug: String,
    },

    /// Start the blog server
    #[command(alias = "s")]
    Server {
        /// Port to listen on (defaults to server.port)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to (defaults to server.ip)
        #[arg(short, long)]
        ip: Option<String>,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "markblog=debug,info"
    } else {
        "markblog=info"
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
        None => std::env::current_dir().context("Cannot read the current directory")?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing blog in {:?}", target_dir);
            markblog::commands::init::init_site(&target_dir)?;
            println!("Initialized blog in {:?}", target_dir);
        }

        Commands::New {
            title,
            author,
            tags,
            category,
            reading_time,
            description,
            thumbnail,
        } => {
            let blog = Blog::new(&base_dir)?;
            tracing::info!("Creating new post with title: {}", title);
            markblog::commands::new::create_post(
                &blog,
                NewPost {
                    title,
                    author,
                    tags: split_tags(&tags),
                    category,
                    reading_time,
                    description,
                    thumbnail,
                },
            )?;
        }

        Commands::Index { watch } => {
            let blog = Blog::new(&base_dir)?;
            markblog::commands::index::run(&blog)?;

            if watch {
                markblog::commands::index::watch(&blog).await?;
            }
        }

        Commands::List => {
            let blog = Blog::new(&base_dir)?;
            markblog::commands::list::run(&blog)?;
        }

        Commands::Search { query } => {
            let blog = Blog::new(&base_dir)?;
            markblog::commands::list::search(&blog, &query)?;
        }

        Commands::Delete { slug } => {
            let blog = Blog::new(&base_dir)?;
            let report = blog.admin().delete_post(&slug)?;
            println!("Deleted {} ({} posts remain)", slug, report.indexed);
        }

        Commands::Server { port, ip } => {
            let blog = Blog::new(&base_dir)?;
            let ip = ip.unwrap_or_else(|| blog.config.server.ip.clone());
            let port = port.unwrap_or(blog.config.server.port);

            if !blog.index().exists() {
                tracing::info!("Building index...");
                blog.regenerate_index()?;
            }

            tracing::info!("Starting server at http://{}:{}", ip, port);
            markblog::server::start(&blog, &ip, port).await?;
        }

        Commands::Version => {
            println!("markblog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
