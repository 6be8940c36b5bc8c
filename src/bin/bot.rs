//! bnotwbot CLI
//!
//! Startup order matters: credentials and config are checked first, then
//! the cache is built from the remote blog, then the Slack connection
//! opens. A blog that cannot be paged at startup aborts the process; with
//! no cache there are no commands to serve.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use bnotwbot::cache::PostCache;
use bnotwbot::commands::Handlers;
use bnotwbot::config::{Config, Credentials};
use bnotwbot::error::Result;
use bnotwbot::services::{BlogApi, SlackGateway, TumblrClient};

/// bnotwbot - Slack bot for the bnotw blog
#[derive(Parser, Debug)]
#[command(name = "bnotwbot", version, about = "Slack slash-command bot for the bnotw blog")]
struct Cli {
    /// Path to the bot configuration file
    #[arg(short, long, default_value = "bot.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the bot.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // A local .env is optional; deployments set the variables directly.
    let _ = dotenvy::dotenv();

    let credentials = Credentials::from_env()?;
    let config = Config::load_or_default(&cli.config);
    config.validate()?;

    let client: Arc<dyn BlogApi> = Arc::new(TumblrClient::new(&config, &credentials)?);

    log::info!("building post cache for blog '{}'", config.blog_name);
    let (cache, total_posts) = PostCache::build(client.as_ref(), config.page_size).await?;
    log::info!("cached {} of {} posts", cache.len(), total_posts);

    let gateway = SlackGateway::new(&config, &credentials)?;
    gateway.test_auth().await?;

    let handlers = Handlers::new(config, client, cache, total_posts);

    log::info!("bnotwbot is alive!");
    gateway.run(&handlers).await
}
