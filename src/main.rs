mod config;
mod dispatch;
mod open_url;
mod page;
mod session;
mod stories;
mod ui;
mod util;

use anyhow::{Context, Result};
use console::Term;
use dispatch::Dispatcher;
use std::env;
use stories::{HttpApi, StoryApi};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let mut args = env::args().skip(1);
    let mut config_override: Option<String> = None;
    let mut page_override: Option<String> = None;
    let mut auto_open = true;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config_override = args.next(),
            "--page" => page_override = args.next(),
            "--no-open" => auto_open = false,
            "-h" | "--help" => {
                print_help();
                return Ok(());
            }
            other => warn!(arg = other, "ignoring unknown argument"),
        }
    }

    let cfg = config::load(config_override, page_override)?;
    let api = HttpApi::new(&cfg.api_base_url)?;

    let user = match &cfg.credentials {
        Some(creds) => match api.fetch_user(&creds.username, &creds.token).await {
            Ok(user) => {
                info!(username = %user.username, "logged in");
                Some(user)
            }
            Err(e) => {
                ui::report_error(&format!("could not log in as {}: {:#}", creds.username, e));
                None
            }
        },
        None => None,
    };

    let mut dispatcher = Dispatcher::new(api, user);
    let _ = Term::stdout().clear_screen();
    println!("Loading stories...");
    session::write_page(&cfg, &dispatcher)?;
    dispatcher
        .get_and_show_stories_on_start()
        .await
        .context("failed to load stories")?;

    session::run(&cfg, &mut dispatcher, auto_open).await
}

// Logs go to stderr so they never interleave with menu redraws on stdout.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("snooze_news=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_help() {
    println!("snooze-news");
    println!("Usage: snooze-news [--config <path>] [--page <path>] [--no-open]");
    println!("  --config <path>  Path to a config.toml (api url, username, token, page path)");
    println!("  --page <path>    Where to write the rendered HTML page");
    println!("  --no-open        Do not open the page in a browser on start");
}
