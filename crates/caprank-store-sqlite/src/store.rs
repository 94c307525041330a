//! [`SqliteStore`], the SQLite implementation of [`MarketCapStore`].

use std::{
  collections::{HashMap, HashSet},
  path::Path,
};

use caprank_core::{
  market_cap::{HistoryRow, IngestBatch, IngestReport, LatestRankRow, Stock},
  ranking,
  store::{HistoryQuery, MarketCapStore},
  ticker::Ticker,
};
use chrono::NaiveDate;
use rusqlite::OptionalExtension as _;

use crate::{
  encode::{RawHistoryRow, RawLatestRankRow, RawStock, decode_date, encode_date},
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A market-cap store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is shared. Open it once
/// per process and hand clones to whatever needs it.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  ///
  /// A missing file, and any missing parent directories, are created.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)?;
    }

    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::info!(path = %path.display(), "opened market-cap store");
    Ok(store)
  }

  /// Open an in-memory store, mainly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Close the underlying connection. Clones still held elsewhere will fail
  /// every call afterwards.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Transaction bodies ──────────────────────────────────────────────────────
//
// These run on the connection thread and return this crate's `Result`, so the
// `call` closures wrap them as `Ok(..)` and callers unwrap with `.await??`.

fn latest_date_in(conn: &rusqlite::Connection) -> Result<Option<NaiveDate>> {
  let raw: Option<String> =
    conn.query_row("SELECT MAX(date) FROM daily_market_caps", [], |r| r.get(0))?;
  raw.as_deref().map(decode_date).transpose()
}

fn resolve_stock_id(conn: &rusqlite::Connection, ticker: &Ticker) -> Result<i64> {
  conn
    .query_row(
      "SELECT id FROM stocks WHERE ticker = ?1",
      rusqlite::params![ticker.as_str()],
      |r| r.get(0),
    )
    .optional()?
    .ok_or_else(|| caprank_core::Error::UnresolvedTicker(ticker.to_string()).into())
}

/// `(ticker, stock_id, market_cap)` for every row stored on `date`.
fn stored_rows_on(conn: &rusqlite::Connection, date: &str) -> Result<Vec<(String, i64, f64)>> {
  let mut stmt = conn.prepare_cached(
    "SELECT s.ticker, d.stock_id, d.market_cap
     FROM daily_market_caps d
     INNER JOIN stocks s ON s.id = d.stock_id
     WHERE d.date = ?1",
  )?;
  let rows: Vec<(String, i64, f64)> = stmt
    .query_map(rusqlite::params![date], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)))?
    .collect::<rusqlite::Result<_>>()?;
  Ok(rows)
}

fn ingest_tx(conn: &mut rusqlite::Connection, batch: IngestBatch) -> Result<IngestReport> {
  let groups = ranking::group_by_date(&batch.observations)?;

  // Dropping `tx` without commit rolls back everything below.
  let tx = conn.transaction()?;
  let mut report = IngestReport::default();

  for stock in &batch.stocks {
    report.stocks_created += tx
      .prepare_cached(
        "INSERT INTO stocks (ticker, name, sector) VALUES (?1, ?2, ?3)
         ON CONFLICT (ticker) DO NOTHING",
      )?
      .execute(rusqlite::params![
        stock.ticker.as_str(),
        stock.display_name(),
        stock.sector,
      ])?;
  }

  let mut stock_ids: HashMap<Ticker, i64> = HashMap::new();

  for (date, incoming) in groups {
    let date_str = encode_date(date);
    let supplied: HashSet<Ticker> = incoming.iter().map(|(t, _)| t.clone()).collect();
    let mut entries = incoming;

    // Tickers already stored for this date but absent from the run keep their
    // value and are ranked alongside the new ones.
    for (symbol, stock_id, market_cap) in stored_rows_on(&tx, &date_str)? {
      let ticker = Ticker::parse(&symbol)?;
      stock_ids.entry(ticker.clone()).or_insert(stock_id);
      if !supplied.contains(&ticker) {
        entries.push((ticker, market_cap));
        report.rows_reranked += 1;
      }
    }

    let ranked = ranking::rank_day(date, entries)?;

    for entry in &ranked {
      let stock_id = match stock_ids.get(&entry.ticker) {
        Some(id) => *id,
        None => {
          let id = resolve_stock_id(&tx, &entry.ticker)?;
          stock_ids.insert(entry.ticker.clone(), id);
          id
        }
      };

      tx.prepare_cached(
        "INSERT INTO daily_market_caps (stock_id, date, market_cap, rank)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT (stock_id, date) DO UPDATE
           SET market_cap = excluded.market_cap,
               rank       = excluded.rank",
      )?
      .execute(rusqlite::params![stock_id, date_str, entry.market_cap, entry.rank])?;
    }

    report.rows_written += supplied.len();
    report.dates.push(date);
  }

  tx.commit()?;
  Ok(report)
}

fn history_tx(conn: &mut rusqlite::Connection, query: &HistoryQuery) -> Result<Vec<RawHistoryRow>> {
  // One read transaction so the latest-date lookup and the range scan see the
  // same snapshot.
  let tx = conn.transaction()?;

  let Some(latest) = latest_date_in(&tx)? else {
    return Ok(Vec::new());
  };
  let (from, to) = query.resolve_window(latest);
  tracing::debug!(%latest, ?from, ?to, tickers = query.tickers.len(), "resolved history window");

  let mut conds: Vec<String> = Vec::new();
  let mut args: Vec<String> = Vec::new();

  if !query.tickers.is_empty() {
    conds.push(format!("s.ticker IN ({})", vec!["?"; query.tickers.len()].join(", ")));
    args.extend(query.tickers.iter().map(|t| t.as_str().to_owned()));
  }
  if let Some(from) = from {
    conds.push("d.date >= ?".to_owned());
    args.push(encode_date(from));
  }
  if let Some(to) = to {
    conds.push("d.date <= ?".to_owned());
    args.push(encode_date(to));
  }

  let where_clause = if conds.is_empty() {
    String::new()
  } else {
    format!("WHERE {}", conds.join(" AND "))
  };

  let sql = format!(
    "SELECT s.ticker, s.name, d.date, d.market_cap, d.rank
     FROM daily_market_caps d
     INNER JOIN stocks s ON s.id = d.stock_id
     {where_clause}
     ORDER BY d.date ASC, d.rank ASC, s.ticker ASC"
  );

  let mut stmt = tx.prepare(&sql)?;
  let rows = stmt
    .query_map(rusqlite::params_from_iter(args.iter()), RawHistoryRow::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

fn latest_ranks_tx(conn: &mut rusqlite::Connection) -> Result<Vec<RawLatestRankRow>> {
  let tx = conn.transaction()?;

  let Some(latest) = latest_date_in(&tx)? else {
    return Ok(Vec::new());
  };

  let mut stmt = tx.prepare(
    "SELECT s.ticker, s.name, d.market_cap, d.rank
     FROM daily_market_caps d
     INNER JOIN stocks s ON s.id = d.stock_id
     WHERE d.date = ?1
     ORDER BY d.rank ASC, s.ticker ASC",
  )?;
  let rows = stmt
    .query_map(rusqlite::params![encode_date(latest)], RawLatestRankRow::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

// ─── MarketCapStore impl ─────────────────────────────────────────────────────

impl MarketCapStore for SqliteStore {
  type Error = Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn ingest(&self, batch: IngestBatch) -> Result<IngestReport> {
    let observations = batch.observations.len();
    let report = self
      .conn
      .call(move |conn| Ok(ingest_tx(conn, batch)))
      .await??;

    tracing::info!(
      observations,
      dates = report.dates.len(),
      rows_written = report.rows_written,
      rows_reranked = report.rows_reranked,
      stocks_created = report.stocks_created,
      "ingest committed"
    );
    Ok(report)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn history(&self, query: &HistoryQuery) -> Result<Vec<HistoryRow>> {
    let query = query.clone();
    let raws = self
      .conn
      .call(move |conn| Ok(history_tx(conn, &query)))
      .await??;

    raws.into_iter().map(RawHistoryRow::into_row).collect()
  }

  async fn latest_ranks(&self) -> Result<Vec<LatestRankRow>> {
    let raws = self
      .conn
      .call(|conn| Ok(latest_ranks_tx(conn)))
      .await??;

    raws.into_iter().map(RawLatestRankRow::into_row).collect()
  }

  async fn latest_date(&self) -> Result<Option<NaiveDate>> {
    self
      .conn
      .call(|conn| Ok(latest_date_in(conn)))
      .await?
  }

  async fn list_stocks(&self) -> Result<Vec<Stock>> {
    let raws: Vec<RawStock> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT id, ticker, name, sector FROM stocks ORDER BY ticker ASC")?;
        let rows = stmt
          .query_map([], RawStock::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawStock::into_stock).collect()
  }
}
