mod draw;
mod state;

use crate::state::app_settings::AppSettings;
use crate::state::messages::{Feed, NetworkRequest, NetworkResponse};
use crate::state::network::NetworkWorker;
use crate::state::refresher::PeriodicRefresher;
use anyhow::Context;
use betfeed_api::client::BetfeedApi;
use betfeed_api::kickoff;
use chrono::Utc;
use log::{error, warn};
use serde_json::Value;
use std::io::Read;
use std::path::PathBuf;
use tokio::sync::mpsc;

#[derive(Debug, PartialEq)]
enum Command {
    Help,
    Version,
    /// `None` reads stdin.
    Normalize(Option<PathBuf>),
    Poll(Feed),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let command = match parse_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("{message}\n\n{}", usage_text());
            std::process::exit(2);
        }
    };

    better_panic::install();

    let settings = AppSettings::load();
    env_logger::Builder::new()
        .parse_filters(&settings.log_filter)
        .format_timestamp(None)
        .init();

    match command {
        Command::Help => println!("{}", usage_text()),
        Command::Version => println!("betfeed {}", env!("CARGO_PKG_VERSION")),
        Command::Normalize(path) => normalize_command(path)?,
        Command::Poll(feed) => poll_command(feed, &settings).await,
    }

    Ok(())
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Command, String> {
    let mut args = args.into_iter();
    let Some(arg) = args.next() else {
        return Ok(Command::Help);
    };

    let command = match arg.as_str() {
        "-h" | "--help" | "help" => Command::Help,
        "-V" | "--version" => Command::Version,
        "normalize" => match args.next() {
            None => Command::Normalize(None),
            Some(path) if path == "-" => Command::Normalize(None),
            Some(path) => Command::Normalize(Some(PathBuf::from(path))),
        },
        "live" => Command::Poll(Feed::Live),
        "today" => Command::Poll(Feed::Today),
        _ => return Err(format!("Unknown argument: {arg}")),
    };

    match args.next() {
        Some(extra) => Err(format!("Unexpected argument: {extra}")),
        None => Ok(command),
    }
}

fn usage_text() -> &'static str {
    "betfeed - normalize sports-betting match feeds

Usage:
  betfeed normalize [FILE|-]   Read raw provider JSON, print normalized JSON
  betfeed live                 Poll the backend for live matches
  betfeed today                Poll the backend for today's matches
  betfeed --help
  betfeed --version

Environment:
  BETFEED_BACKEND_URL   Backend base URL (default http://127.0.0.1:5000/api)
  BETFEED_POLL_SECS     Poll interval in seconds, 12-30 (default 15)
  BETFEED_LOG           Log filter, falls back to RUST_LOG (default warn)"
}

fn normalize_command(path: Option<PathBuf>) -> anyhow::Result<()> {
    let input = match &path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("could not read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("could not read stdin")?;
            buf
        }
    };

    let raw: Value = serde_json::from_str(&input).context("input is not valid JSON")?;
    let output = match betfeed_api::normalize_payload(&raw) {
        Some(payload) => serde_json::to_string_pretty(&payload)?,
        None => "null".to_string(),
    };
    println!("{output}");
    Ok(())
}

async fn poll_command(feed: Feed, settings: &AppSettings) {
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(16);
    let (network_resp_tx, mut network_resp_rx) = mpsc::channel::<NetworkResponse>(16);

    // Network thread
    let client = BetfeedApi::with_base_url(settings.backend_url.clone());
    let network_worker = NetworkWorker::new(client, network_req_rx, network_resp_tx);
    let network_task = tokio::spawn(network_worker.run());

    // Periodic refresh thread
    let periodic_updater = PeriodicRefresher::new(network_req_tx.clone(), feed, settings.poll_interval);
    let periodic_task = tokio::spawn(periodic_updater.run());

    let _ = network_req_tx.send(NetworkRequest::LoadMatches { feed }).await;

    loop {
        tokio::select! {
            Some(response) = network_resp_rx.recv() => handle_network_response(response),
            _ = tokio::signal::ctrl_c() => break,
            else => break,
        }
    }

    periodic_task.abort();
    network_task.abort();
}

fn handle_network_response(response: NetworkResponse) {
    match response {
        NetworkResponse::MatchesLoaded { feed, matches } => {
            let at = Utc::now()
                .with_timezone(&kickoff::display_tz())
                .format("%H:%M:%S")
                .to_string();
            println!("{}", draw::feed_header(feed.label(), matches.len(), &at));
            if matches.is_empty() {
                warn!("no {} matches returned", feed.label());
            }
            for m in &matches {
                println!("{}", draw::match_line(m));
            }
        }
        NetworkResponse::Error { message } => {
            error!("Network error: {message}");
        }
    }
}
