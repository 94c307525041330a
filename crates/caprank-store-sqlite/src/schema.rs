//! SQL schema for the caprank SQLite store.
//!
//! Executed on every connection open. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;
PRAGMA busy_timeout = 5000;

-- One row per ticker. Inserted with ON CONFLICT DO NOTHING, never updated.
CREATE TABLE IF NOT EXISTS stocks (
    id      INTEGER PRIMARY KEY,
    ticker  TEXT UNIQUE NOT NULL,   -- upper-case symbol
    name    TEXT NOT NULL,
    sector  TEXT
);

-- Rank uniqueness per date is kept by the ingest transaction; a
-- UNIQUE (date, rank) constraint would trip on intermediate upsert states.
CREATE TABLE IF NOT EXISTS daily_market_caps (
    id          INTEGER PRIMARY KEY,
    stock_id    INTEGER NOT NULL REFERENCES stocks(id),
    date        TEXT NOT NULL,      -- YYYY-MM-DD
    market_cap  REAL NOT NULL,
    rank        INTEGER NOT NULL CHECK (rank >= 1),
    UNIQUE (stock_id, date)
);

CREATE INDEX IF NOT EXISTS daily_market_caps_date_idx ON daily_market_caps(date);

PRAGMA user_version = 1;
";
