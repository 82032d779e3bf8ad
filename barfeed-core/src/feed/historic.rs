//! Multi-symbol historic feed over aligned CSV data.

use crate::config::FeedConfig;
use crate::data::{align_sources, BarCursor, BarSource, CursorStep, DataError};
use crate::feed::event::{EventSink, MarketEvent};
use crate::feed::handler::DataHandler;
use crate::domain::{Bar, Symbol};
use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::path::Path;

/// Historic multi-symbol handler.
///
/// Loads `<dir>/<symbol>.csv` for every requested symbol, aligns all series
/// onto the unified timeline with forward-fill, and replays them in
/// lockstep: one position per `update_bars` call across every instrument.
/// Sources and aligned series are built once here; after construction the
/// only mutable state is the cursors and the growing histories.
pub struct HistoricCsvFeed<S: EventSink> {
    events: S,
    symbols: Vec<Symbol>,
    timeline: Vec<NaiveDateTime>,
    cursors: HashMap<Symbol, BarCursor>,
    histories: HashMap<Symbol, Vec<Bar>>,
    continue_backtest: bool,
}

impl<S: EventSink> HistoricCsvFeed<S> {
    /// Build a feed from a data directory and symbol list, assuming the
    /// `<dir>/<symbol>.csv` naming convention.
    ///
    /// All files are read eagerly here; construction is the only fallible
    /// step and fails fast on the first unloadable source.
    pub fn new(
        events: S,
        csv_dir: impl AsRef<Path>,
        symbols: &[&str],
        layout: crate::data::CsvLayout,
    ) -> Result<Self, DataError> {
        let csv_dir = csv_dir.as_ref();
        let mut sources = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            let path = csv_dir.join(format!("{symbol}.csv"));
            sources.push(BarSource::from_csv(*symbol, &path, layout)?);
        }
        Ok(Self::from_sources(events, sources))
    }

    /// Build a feed from a TOML-declared configuration.
    pub fn from_config(events: S, config: &FeedConfig) -> Result<Self, DataError> {
        let symbols: Vec<&str> = config.symbols.iter().map(String::as_str).collect();
        Self::new(events, &config.csv_dir, &symbols, config.layout)
    }

    /// Build a feed from sources already in memory (no file I/O).
    pub fn from_sources(events: S, sources: Vec<BarSource>) -> Self {
        let aligned = align_sources(sources);

        let mut cursors = HashMap::with_capacity(aligned.symbols.len());
        let mut histories = HashMap::with_capacity(aligned.symbols.len());
        let mut series = aligned.series;
        for symbol in &aligned.symbols {
            let aligned_series = series.remove(symbol).unwrap_or_default();
            cursors.insert(symbol.clone(), BarCursor::new(aligned_series));
            histories.insert(symbol.clone(), Vec::new());
        }

        Self {
            events,
            symbols: aligned.symbols,
            timeline: aligned.timeline,
            cursors,
            histories,
            continue_backtest: true,
        }
    }

    /// Registered symbols, sorted.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// The unified timeline all instruments were aligned onto.
    pub fn timeline(&self) -> &[NaiveDateTime] {
        &self.timeline
    }

    /// Borrow the event sink (e.g. to drain a collection sink in tests).
    pub fn events(&self) -> &S {
        &self.events
    }

    /// Consume the feed, returning the sink.
    pub fn into_events(self) -> S {
        self.events
    }
}

impl<S: EventSink> DataHandler for HistoricCsvFeed<S> {
    fn latest_bars(&self, symbol: &str, n: usize) -> Option<&[Bar]> {
        let history = self.histories.get(symbol)?;
        let start = history.len().saturating_sub(n);
        Some(&history[start..])
    }

    fn update_bars(&mut self) {
        for symbol in &self.symbols {
            let Some(cursor) = self.cursors.get_mut(symbol) else {
                continue;
            };
            match cursor.advance() {
                CursorStep::Bar(bar) => {
                    if let Some(history) = self.histories.get_mut(symbol) {
                        history.push(bar);
                    }
                }
                CursorStep::Gap => {}
                CursorStep::Exhausted => {
                    self.continue_backtest = false;
                }
            }
        }
        self.events.push(MarketEvent);
    }

    fn continue_backtest(&self) -> bool {
        self.continue_backtest
    }
}
