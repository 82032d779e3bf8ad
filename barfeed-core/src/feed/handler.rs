//! The public feed abstraction.
//!
//! A `DataHandler` replays stored history one bar at a time so that the
//! rest of a backtesting suite treats historic and live data identically:
//! the driving loop calls `update_bars` repeatedly, checks
//! `continue_backtest`, and consumers pull the latest bars on each
//! notification. A consumer can never see more data than would exist at
//! that moment in time.

use crate::domain::{Bar, BarField};
use chrono::NaiveDateTime;

/// Pull-based access to a replayed feed. Implemented by
/// [`HistoricCsvFeed`](crate::feed::HistoricCsvFeed) (multi-symbol, aligned)
/// and [`SingleSeriesFeed`](crate::feed::SingleSeriesFeed) (one instrument,
/// no alignment).
pub trait DataHandler {
    /// Up to the last `n` bars delivered for `symbol`, chronological,
    /// oldest first. Fewer than `n` (possibly zero) if the history is
    /// shorter. `None` if the instrument was never registered — a local,
    /// non-fatal signal, never a panic.
    fn latest_bars(&self, symbol: &str, n: usize) -> Option<&[Bar]>;

    /// Advance every registered instrument's cursor exactly once, append
    /// whatever was produced to the per-instrument histories, and push
    /// exactly one [`MarketEvent`](crate::feed::MarketEvent) (one per call,
    /// not one per instrument). The first exhausted cursor clears
    /// `continue_backtest`; the handler itself never stops.
    fn update_bars(&mut self);

    /// True while the feed still has data to deliver. The driving loop
    /// reads this after each `update_bars` call and decides when to stop.
    fn continue_backtest(&self) -> bool;

    /// The single most recent bar for `symbol`, if any has been delivered.
    fn latest_bar(&self, symbol: &str) -> Option<&Bar> {
        self.latest_bars(symbol, 1)?.last()
    }

    /// Timestamp of the most recent bar for `symbol`.
    fn latest_timestamp(&self, symbol: &str) -> Option<NaiveDateTime> {
        self.latest_bar(symbol).map(|bar| bar.timestamp)
    }

    /// One field from each of the last `n` bars, oldest first. Bars whose
    /// source layout did not carry the requested optional field are
    /// skipped. `None` if the instrument was never registered.
    fn latest_values(&self, symbol: &str, field: BarField, n: usize) -> Option<Vec<f64>> {
        Some(
            self.latest_bars(symbol, n)?
                .iter()
                .filter_map(|bar| bar.field(field))
                .collect(),
        )
    }
}
