use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::error;

use streamer_embed::config::EmbedConfig;
use streamer_embed::database::{self, SqlxClaimRepository};
use streamer_embed::logging::init_logging;
use streamer_embed::{DirectiveOutput, PageContext, StreamerEmbed};

#[derive(Parser, Debug)]
#[command(name = "streamer-embed", version, about = "Render live status widgets for streaming channels")]
struct Args {
    /// TOML configuration file.
    #[arg(short, long, env = "STREAMER_EMBED_CONFIG", default_value = "streamer.toml")]
    config: PathBuf,

    /// Emit logs as JSON.
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Expand a `#streamer` directive and print the markup.
    Render {
        /// Directive arguments as `key=value`.
        args: Vec<String>,
    },
    /// Expand a `#streamerinfo` directive for a page.
    Info {
        #[arg(long)]
        page: String,
        /// Render as a preview; nothing is stored.
        #[arg(long)]
        preview: bool,
        args: Vec<String>,
    },
    /// Reconcile claims after a page save.
    PageSaved {
        #[arg(long)]
        page: String,
        /// Raw content of the previous revision.
        #[arg(long)]
        previous: Option<PathBuf>,
        /// Raw content of the saved revision.
        #[arg(long)]
        current: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    if let Err(e) = run(args).await {
        error!("Application error: {e:#}");
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = EmbedConfig::load(Some(&args.config))?;
    init_logging(Some(&config.log_filter), args.log_json)?;

    let pool = database::init_pool(&config.database_url)
        .await
        .with_context(|| format!("opening {}", config.database_url))?;
    database::run_migrations(&pool).await?;

    let embed = StreamerEmbed::new(
        config.registry()?,
        Arc::new(SqlxClaimRepository::new(pool)),
    )
    .with_page_url_pattern(config.page_url_pattern.clone());

    match args.command {
        Commands::Render { args } => {
            print_output(&embed.render_streamer(&args).await?);
        }
        Commands::Info {
            page,
            preview,
            args,
        } => {
            let page = if preview {
                PageContext::preview(page)
            } else {
                PageContext::new(page)
            };
            print_output(&embed.render_streamer_info(&page, &args).await?);
        }
        Commands::PageSaved {
            page,
            previous,
            current,
        } => {
            let previous = previous.as_deref().map(read_revision).transpose()?;
            let current = read_revision(&current)?;
            let transition = embed
                .on_page_saved(&page, previous.as_deref(), &current)
                .await?;
            println!("{transition:?}");
        }
    }

    Ok(())
}

fn read_revision(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn print_output(output: &DirectiveOutput) {
    if !output.html.is_empty() {
        println!("{}", output.html);
    }
}
