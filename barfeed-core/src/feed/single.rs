//! Single-series feed: one instrument, no alignment.

use crate::data::{BarCursor, BarSource, CursorStep, CsvLayout, DataError};
use crate::feed::event::{EventSink, MarketEvent};
use crate::feed::handler::DataHandler;
use crate::domain::{Bar, Symbol};
use std::path::Path;

/// Degenerate handler for exactly one instrument.
///
/// Streams one CSV file unmodified — no timeline union, no forward-fill.
/// The instrument id is derived from the file stem, and query methods
/// ignore any supplied symbol.
pub struct SingleSeriesFeed<S: EventSink> {
    events: S,
    symbol: Symbol,
    cursor: BarCursor,
    history: Vec<Bar>,
    continue_backtest: bool,
}

impl<S: EventSink> SingleSeriesFeed<S> {
    /// Build a feed from one explicit CSV path.
    pub fn new(
        events: S,
        csv_path: impl AsRef<Path>,
        layout: CsvLayout,
    ) -> Result<Self, DataError> {
        let path = csv_path.as_ref();
        let symbol = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "SERIES".to_string());
        let source = BarSource::from_csv(symbol, path, layout)?;
        Ok(Self::from_source(events, source))
    }

    /// Build a feed from a source already in memory.
    pub fn from_source(events: S, source: BarSource) -> Self {
        let symbol = source.symbol().to_string();
        let series = source.into_bars().into_iter().map(Some).collect();
        Self {
            events,
            symbol,
            cursor: BarCursor::new(series),
            history: Vec::new(),
            continue_backtest: true,
        }
    }

    /// The one instrument this feed streams.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Borrow the event sink.
    pub fn events(&self) -> &S {
        &self.events
    }

    /// Consume the feed, returning the sink.
    pub fn into_events(self) -> S {
        self.events
    }
}

impl<S: EventSink> DataHandler for SingleSeriesFeed<S> {
    /// The supplied symbol is ignored: there is exactly one instrument.
    fn latest_bars(&self, _symbol: &str, n: usize) -> Option<&[Bar]> {
        let start = self.history.len().saturating_sub(n);
        Some(&self.history[start..])
    }

    fn update_bars(&mut self) {
        match self.cursor.advance() {
            CursorStep::Bar(bar) => self.history.push(bar),
            CursorStep::Gap => {}
            CursorStep::Exhausted => {
                self.continue_backtest = false;
            }
        }
        self.events.push(MarketEvent);
    }

    fn continue_backtest(&self) -> bool {
        self.continue_backtest
    }
}
