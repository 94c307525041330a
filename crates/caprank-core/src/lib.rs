//! Core types and trait definitions for the caprank market-cap dashboard.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`store::MarketCapStore`]; the API and the seed
//! binary depend on that abstraction only.

#![allow(async_fn_in_trait)]

pub mod error;
pub mod market_cap;
pub mod ranking;
pub mod store;
pub mod ticker;

pub use error::{Error, Result};
