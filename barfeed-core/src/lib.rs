//! barfeed-core — historical market-data feed simulation.
//!
//! This crate presents stored price history to a strategy exactly as a live
//! feed would: one bar at a time, in chronological order, across multiple
//! instruments, with no look-ahead. It contains:
//! - Domain types (bars, field selectors)
//! - CSV bar sources for the two supported tabular layouts
//! - Multi-symbol timeline alignment with forward-fill
//! - Single-pass bar cursors with sticky exhaustion
//! - The `DataHandler` trait and its two concrete feeds
//!   (multi-symbol historic, single-series)
//! - TOML feed configuration

pub mod config;
pub mod data;
pub mod domain;
pub mod feed;
