use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use dialoguer::{Input, Password};
use echo_tools::{EchoApi, EchoApiConfig, RunCredentials};
use log::info;
use recon_engine::{db_url, SqliteDatabase};

mod dispatcher;
mod pipeline;
mod source;

#[derive(Parser, Debug)]
#[command(version, about = "Tools for reconciling the local order store against the Echo marketplace")]
pub struct Arguments {
    /// Database URL override. Falls back to ORS_DATABASE_URL, then the built-in default.
    #[arg(short, long)]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[clap(name = "sync", about = "Fetch missing order details and reconcile the local store")]
    Sync(SyncParams),
    #[clap(name = "status", about = "Show local store statistics")]
    Status,
}

#[derive(Debug, Args)]
pub struct SyncParams {
    /// Upper bound on the number of concurrent fetch workers
    #[arg(short, long, default_value_t = 200)]
    workers: usize,
    /// The x-request-sign credential header value (prompted for when omitted)
    #[arg(long)]
    sign: Option<String>,
    /// The x-request-timestamp credential header value (prompted for when omitted)
    #[arg(long)]
    timestamp: Option<String>,
    /// The authorization token (prompted for when omitted)
    #[arg(long)]
    auth: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();
    let args = Arguments::parse();
    let url = args.database_url.unwrap_or_else(db_url);
    let db = SqliteDatabase::new_with_url(&url, 8).await?;
    db.run_migrations().await?;
    match args.command {
        Command::Sync(params) => sync(db, params).await,
        Command::Status => status(db).await,
    }
}

async fn sync(db: SqliteDatabase, params: SyncParams) -> Result<()> {
    let credentials = collect_credentials(&params)?;
    let config = EchoApiConfig::new_from_env_or_default(credentials);
    let api = EchoApi::new(config)?;
    info!("🚀️ Starting reconciliation run with up to {} worker(s)", params.workers);
    let summary = pipeline::run_sync(Arc::new(api), db, params.workers).await?;
    println!(
        "Run complete. {} succeeded, {} failed, {} of {} processed.",
        summary.totals.success,
        summary.totals.failed,
        summary.totals.completed(),
        summary.work_set_size
    );
    Ok(())
}

async fn status(db: SqliteDatabase) -> Result<()> {
    let stats = db.store_stats().await?;
    println!("Tracked orders: {}", stats.tracked_orders);
    println!("  incomplete:   {}", stats.incomplete_orders);
    println!("Line-item rows: {}", stats.line_item_rows);
    Ok(())
}

/// Collects the three per-run credential headers, preferring CLI flags and prompting for the rest. Values are
/// trimmed; the authorization token uses a hidden prompt.
fn collect_credentials(params: &SyncParams) -> Result<RunCredentials> {
    let sign = match &params.sign {
        Some(value) => value.trim().to_string(),
        None => Input::<String>::new().with_prompt("x-request-sign").interact_text()?.trim().to_string(),
    };
    let timestamp = match &params.timestamp {
        Some(value) => value.trim().to_string(),
        None => Input::<String>::new().with_prompt("x-request-timestamp").interact_text()?.trim().to_string(),
    };
    let authorization = match &params.auth {
        Some(value) => value.trim().to_string(),
        None => Password::new().with_prompt("authorization").interact()?.trim().to_string(),
    };
    Ok(RunCredentials::new(sign, timestamp, authorization))
}
