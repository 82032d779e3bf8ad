//! Multi-symbol timeline alignment.
//!
//! Given bar sources for multiple instruments, compute the unified timeline
//! (sorted union of every instrument's native timestamps) and reindex each
//! instrument onto it with forward-fill: a timestamp present natively uses
//! its own row; a missing timestamp repeats the nearest preceding native
//! row's values (with the timeline timestamp substituted). Positions before
//! an instrument's first native observation stay absent — a late-listing
//! instrument delivers nothing until its first real bar.

use crate::data::source::BarSource;
use crate::domain::{Bar, Symbol};
use chrono::NaiveDateTime;
use std::collections::{BTreeSet, HashMap};

/// One instrument reindexed onto the unified timeline.
///
/// Always exactly as long as the timeline. `None` only at leading positions
/// before the instrument's first native observation.
pub type AlignedSeries = Vec<Option<Bar>>;

/// Aligned bar data for multiple instruments on a common timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedData {
    /// The unified timeline (sorted ascending).
    pub timeline: Vec<NaiveDateTime>,
    /// Series per instrument, each `timeline.len()` long.
    pub series: HashMap<Symbol, AlignedSeries>,
    /// Instruments included, sorted for deterministic iteration.
    pub symbols: Vec<Symbol>,
}

/// Align multiple sources to a common timeline with forward-fill.
///
/// Runs once at feed construction. Deterministic and idempotent: the same
/// inputs always produce identical output.
pub fn align_sources(sources: Vec<BarSource>) -> AlignedData {
    let mut all_timestamps = BTreeSet::new();
    for source in &sources {
        for bar in source.bars() {
            all_timestamps.insert(bar.timestamp);
        }
    }
    let timeline: Vec<NaiveDateTime> = all_timestamps.into_iter().collect();

    let mut series: HashMap<Symbol, AlignedSeries> = HashMap::new();
    let mut symbols: Vec<Symbol> = Vec::with_capacity(sources.len());

    for source in sources {
        let symbol = source.symbol().to_string();
        let bars = source.into_bars();
        series.insert(symbol.clone(), reindex(&bars, &timeline));
        symbols.push(symbol);
    }
    symbols.sort();

    AlignedData {
        timeline,
        series,
        symbols,
    }
}

/// Reindex one sorted native series onto the timeline.
///
/// Walks both sequences front to back: native timestamps match positionally,
/// gaps repeat the last seen bar, leading positions with nothing to repeat
/// stay `None`.
fn reindex(bars: &[Bar], timeline: &[NaiveDateTime]) -> AlignedSeries {
    let mut aligned = Vec::with_capacity(timeline.len());
    let mut next = 0;
    let mut last_seen: Option<&Bar> = None;

    for &t in timeline {
        if next < bars.len() && bars[next].timestamp == t {
            last_seen = Some(&bars[next]);
            next += 1;
        }
        aligned.push(last_seen.map(|prev| {
            let mut bar = prev.clone();
            bar.timestamp = t;
            bar
        }));
    }

    aligned
}
