//! `caprank-seed`: ranks and writes a batch of daily market caps.
//!
//! ```text
//! caprank-seed                              # AAPL, MSFT, AMZN, GOOG; last 7 days
//! caprank-seed --tickers NVDA,META --days 30
//! caprank-seed --file seed.json --no-synthetic
//! caprank-seed --list
//! ```
//!
//! The whole run commits in one transaction; any error leaves the store
//! untouched and exits non-zero.

use std::path::PathBuf;

use anyhow::Context as _;
use caprank::{
  Settings,
  config::DEFAULT_CONFIG_FILE,
  seed::{SeedPlan, input},
};
use caprank_core::store::{DEFAULT_WINDOW_DAYS, MarketCapStore};
use caprank_store_sqlite::SqliteStore;
use chrono::NaiveDate;
use clap::Parser;
use rand_core::OsRng;

#[derive(Parser)]
#[command(author, version, about = "Seed the market-cap store")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
  config: PathBuf,

  /// Comma-separated tickers, e.g. `AAPL,MSFT`.
  #[arg(long, conflicts_with = "file")]
  tickers: Option<String>,

  /// JSON file listing tickers, optionally with names and literal history.
  #[arg(long, value_name = "FILE")]
  file: Option<PathBuf>,

  /// Length of the synthetic window.
  #[arg(long, default_value_t = DEFAULT_WINDOW_DAYS as u32)]
  days: u32,

  /// Last day of the synthetic window (`YYYY-MM-DD`). Defaults to today.
  #[arg(long, value_name = "DATE")]
  end_date: Option<NaiveDate>,

  /// Write only the literal history from `--file`.
  #[arg(long)]
  no_synthetic: bool,

  /// Print stored stocks and the latest date, then exit.
  #[arg(long)]
  list: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  caprank::init_tracing();

  let cli = Cli::parse();
  let settings = Settings::load(&cli.config).context("failed to load configuration")?;

  let store_path = settings.store_path();
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  if cli.list {
    list(&store).await?;
    return store.close().await.context("failed to close store");
  }

  let specs = match (&cli.tickers, &cli.file) {
    (Some(csv), _) => input::from_csv(csv)?,
    (None, Some(path)) => input::from_file(path)?,
    (None, None) => input::default_specs(),
  };

  let plan = SeedPlan {
    specs,
    end: cli.end_date.unwrap_or_else(|| chrono::Local::now().date_naive()),
    days: cli.days,
    synthetic: !cli.no_synthetic,
  };
  let batch = plan.build_batch(&mut OsRng);

  let report = store.ingest(batch).await.context("seed run failed; nothing was written")?;

  println!(
    "Seed complete: {} rows across {} dates ({} new stocks). Database located at {}",
    report.rows_written,
    report.dates.len(),
    report.stocks_created,
    store_path.display(),
  );

  store.close().await.context("failed to close store")
}

async fn list(store: &SqliteStore) -> anyhow::Result<()> {
  let stocks = store.list_stocks().await?;
  let latest = store.latest_date().await?;

  for stock in &stocks {
    let sector = stock.sector.as_deref().unwrap_or("-");
    println!("{:<8} {:<32} {sector}", stock.ticker.as_str(), stock.name);
  }
  match latest {
    Some(date) => println!("{} stocks, latest date {date}", stocks.len()),
    None => println!("{} stocks, no market-cap data", stocks.len()),
  }
  Ok(())
}
