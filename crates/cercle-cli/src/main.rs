use anyhow::Result;
use clap::{Parser, Subcommand};

use cercle_core::feed::FeedFilter;

mod commands;
mod context;
mod logging;

#[derive(Parser)]
#[command(name = "cercle")]
#[command(about = "Cercle - read and interact with your Cercle feed", long_about = None)]
struct Cli {
    /// Override the API base URL (also settable via CERCLE_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and print a page of the feed
    Feed {
        /// Collection to read: recent, friends or popular
        #[arg(long)]
        filter: Option<FeedFilter>,
        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Append to the saved feed instead of replacing it
        #[arg(long)]
        append: bool,
    },
    /// Publish a post
    Post {
        content: String,
    },
    /// Toggle your like on a post
    Like {
        post_id: i64,
    },
    /// Manage stored session credentials
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Periodically check that the session is still valid (until Ctrl-C)
    Watch {
        /// Seconds between checks (defaults to the configured interval)
        #[arg(long)]
        interval: Option<u64>,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// Store an access/refresh token pair
    Set {
        #[arg(long)]
        access_token: String,
        #[arg(long)]
        refresh_token: String,
    },
    /// Remove stored tokens and the saved feed
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_json);

    let ctx = context::AppContext::build(cli.api_url)?;

    match cli.command {
        Commands::Feed {
            filter,
            page,
            append,
        } => commands::feed::run(&ctx, filter, page, append).await?,
        Commands::Post { content } => commands::post::run(&ctx, &content).await?,
        Commands::Like { post_id } => commands::like::run(&ctx, post_id.into()).await?,
        Commands::Session { action } => match action {
            SessionAction::Set {
                access_token,
                refresh_token,
            } => commands::session::set(&ctx, access_token, refresh_token).await?,
            SessionAction::Clear => commands::session::clear(&ctx).await?,
        },
        Commands::Watch { interval } => commands::watch::run(&ctx, interval).await?,
    }

    Ok(())
}
