use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use prep_core::mapper::{map_batch, map_game, InvalidPolicy};
use prep_core::persist::{write_json_pretty, write_records};
use prep_core::RawGame;
use reqwest::{header, Client};
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_QUERY: &str = "fields name, summary, genres.name; sort follows desc; limit 500; \
where version_parent = null & summary != null & platforms = (48, 49, 6) & genres != null;";

#[derive(Parser, Debug)]
#[command(name = "fetcher")]
#[command(about = "Fetch raw game records from the IGDB games endpoint")]
struct Cli {
    /// Where to store the raw records
    #[arg(long, default_value = "./sample-json/games.json")]
    output: PathBuf,
    /// Apicalypse query body
    #[arg(long, default_value = DEFAULT_QUERY)]
    query: String,
    /// Games endpoint
    #[arg(long, default_value = "https://api.igdb.com/v4/games")]
    endpoint: String,
    /// Client id (falls back to IGDB_CLIENT_ID)
    #[arg(long)]
    client_id: Option<String>,
    /// App access token (falls back to IGDB_TOKEN)
    #[arg(long)]
    token: Option<String>,
    /// Request timeout seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
    /// Also write the cleaned {id, name, summary, tags} records here
    #[arg(long)]
    clean_output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Cli::parse();

    let client_id = credential(args.client_id.clone(), "IGDB_CLIENT_ID")?;
    let token = credential(args.token.clone(), "IGDB_TOKEN")?;

    let client = Client::builder()
        .timeout(Duration::from_secs(args.timeout_secs))
        .build()?;

    tracing::info!(endpoint = %args.endpoint, "requesting games");
    let resp = client
        .post(&args.endpoint)
        .header("Client-ID", client_id)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::ACCEPT, "application/json")
        .body(args.query.clone())
        .send()
        .await
        .context("sending games request")?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        bail!("games endpoint returned {status}: {body}");
    }
    let payload: Value = resp.json().await.context("decoding games response")?;
    let games = check_shape(&payload)?;
    tracing::info!(count = games.len(), "received games");

    write_json_pretty(&args.output, &payload)?;
    tracing::info!(output = %args.output.display(), "raw games written");

    if let Some(clean) = &args.clean_output {
        let outcome = map_batch(games, InvalidPolicy::Abort, map_game)?;
        write_records(clean, &outcome.records)?;
    }
    Ok(())
}

fn credential(flag: Option<String>, var: &str) -> Result<String> {
    flag.or_else(|| std::env::var(var).ok())
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| anyhow!("missing credential: pass a flag or set {var}"))
}

/// The payload must be an array of records that each look like a game.
fn check_shape(payload: &Value) -> Result<&[Value]> {
    let items = payload
        .as_array()
        .ok_or_else(|| anyhow!("expected a JSON array of games"))?;
    for (index, item) in items.iter().enumerate() {
        RawGame::deserialize(item).with_context(|| format!("game {index} has an unexpected shape"))?;
    }
    Ok(items.as_slice())
}
