//! Input layouts and header resolution.
//!
//! Two tabular layouts are supported:
//! - `Headerless`: the minimal vendor export with no header line and a fixed
//!   column order of `datetime, open, low, high, close, volume, oi`
//!   (low before high — that is the upstream order, not a typo).
//! - `Headered`: an embedded header line; required columns are resolved by
//!   name, case-insensitively, with common aliases.

use serde::{Deserialize, Serialize};

/// Which tabular layout a CSV file uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CsvLayout {
    /// No header; fixed `datetime, open, low, high, close, volume, oi` order.
    Headerless,
    /// Header line present; minimum required columns are
    /// timestamp/date, open, high, low, close, volume. `Adj Close` optional.
    #[default]
    Headered,
}

/// Fixed field positions for the headerless layout.
pub mod headerless {
    pub const TIMESTAMP: usize = 0;
    pub const OPEN: usize = 1;
    pub const LOW: usize = 2;
    pub const HIGH: usize = 3;
    pub const CLOSE: usize = 4;
    pub const VOLUME: usize = 5;
    pub const OPEN_INTEREST: usize = 6;
    pub const FIELD_COUNT: usize = 7;
}

/// Resolved column indices for the headered layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub timestamp: usize,
    pub open: usize,
    pub high: usize,
    pub low: usize,
    pub close: usize,
    pub volume: usize,
    pub adj_close: Option<usize>,
}

const TIMESTAMP_ALIASES: &[&str] = &["date", "datetime", "timestamp"];
const ADJ_CLOSE_ALIASES: &[&str] = &["adj close", "adj_close", "adjclose", "adj. close"];

impl ColumnMap {
    /// Resolve required columns from a header record.
    ///
    /// Matching is case-insensitive and whitespace-trimmed. Returns the name
    /// of the first missing required column on failure.
    pub fn resolve(headers: &csv::StringRecord) -> Result<Self, String> {
        let names: Vec<String> = headers
            .iter()
            .map(|h| h.trim().to_ascii_lowercase())
            .collect();

        let find = |aliases: &[&str]| names.iter().position(|n| aliases.contains(&n.as_str()));

        let timestamp = find(TIMESTAMP_ALIASES).ok_or("timestamp")?;
        let open = find(&["open"]).ok_or("open")?;
        let high = find(&["high"]).ok_or("high")?;
        let low = find(&["low"]).ok_or("low")?;
        let close = find(&["close"]).ok_or("close")?;
        let volume = find(&["volume", "vol"]).ok_or("volume")?;
        let adj_close = find(ADJ_CLOSE_ALIASES);

        Ok(Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
            adj_close,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(fields: &[&str]) -> csv::StringRecord {
        csv::StringRecord::from(fields.to_vec())
    }

    #[test]
    fn resolves_yahoo_header() {
        let map = ColumnMap::resolve(&headers(&[
            "Date", "Open", "High", "Low", "Close", "Adj Close", "Volume",
        ]))
        .unwrap();
        assert_eq!(map.timestamp, 0);
        assert_eq!(map.high, 2);
        assert_eq!(map.volume, 6);
        assert_eq!(map.adj_close, Some(5));
    }

    #[test]
    fn resolves_without_adj_close() {
        let map = ColumnMap::resolve(&headers(&[
            "timestamp", "open", "high", "low", "close", "volume",
        ]))
        .unwrap();
        assert_eq!(map.adj_close, None);
    }

    #[test]
    fn resolution_is_case_insensitive() {
        let map =
            ColumnMap::resolve(&headers(&["DATE", "OPEN", "HIGH", "LOW", "CLOSE", "VOLUME"]))
                .unwrap();
        assert_eq!(map.timestamp, 0);
    }

    #[test]
    fn missing_required_column_is_reported_by_name() {
        let err = ColumnMap::resolve(&headers(&["Date", "Open", "High", "Low", "Volume"]))
            .unwrap_err();
        assert_eq!(err, "close");
    }

    #[test]
    fn layout_default_is_headered() {
        assert_eq!(CsvLayout::default(), CsvLayout::Headered);
    }
}
