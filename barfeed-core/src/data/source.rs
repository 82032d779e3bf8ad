//! BarSource — one instrument's history, loaded into memory.
//!
//! A source reads a tabular file once, drops rows with missing or
//! unparseable fields, sorts by timestamp, deduplicates (first occurrence
//! wins), and holds the result as a read-only `Vec<Bar>`. The file is not
//! held open after construction.

use crate::data::schema::{headerless, ColumnMap, CsvLayout};
use crate::domain::{Bar, Symbol};
use chrono::{NaiveDate, NaiveDateTime};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Structured error types for the data-loading layer.
///
/// All of these are construction-time failures: a handler cannot serve a
/// series it could not parse, so loading fails fast rather than streaming
/// malformed data.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("missing required column '{column}' in {path}")]
    MissingColumn { column: String, path: PathBuf },

    #[error("no usable rows for '{symbol}' in {path}")]
    EmptySeries { symbol: String, path: PathBuf },
}

/// One instrument's time-ordered, in-memory bar table.
#[derive(Debug, Clone)]
pub struct BarSource {
    symbol: Symbol,
    bars: Vec<Bar>,
}

impl BarSource {
    /// Load one instrument's bars from a CSV file.
    ///
    /// Rows with any missing or unparseable field are dropped; the rest are
    /// sorted by timestamp and deduplicated (first occurrence wins). Fails
    /// with [`DataError::MissingColumn`] if the headered layout lacks a
    /// required column, and [`DataError::EmptySeries`] if nothing usable
    /// remains.
    pub fn from_csv(
        symbol: impl Into<Symbol>,
        path: &Path,
        layout: CsvLayout,
    ) -> Result<Self, DataError> {
        let symbol = symbol.into();

        let file = std::fs::File::open(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(layout == CsvLayout::Headered)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let columns = match layout {
            CsvLayout::Headered => {
                let headers = reader.headers().map_err(|e| DataError::Csv {
                    path: path.to_path_buf(),
                    source: e,
                })?;
                Some(
                    ColumnMap::resolve(headers).map_err(|column| DataError::MissingColumn {
                        column,
                        path: path.to_path_buf(),
                    })?,
                )
            }
            CsvLayout::Headerless => None,
        };

        let mut bars = Vec::new();
        for record in reader.records() {
            let record = match record {
                Ok(r) => r,
                // A malformed line (bad UTF-8, broken quoting) is dropped
                // like any other incomplete row.
                Err(_) => continue,
            };
            let parsed = match columns {
                Some(map) => parse_headered_row(&symbol, &record, map),
                None => parse_headerless_row(&symbol, &record),
            };
            if let Some(bar) = parsed {
                bars.push(bar);
            }
        }

        Self::from_bars(symbol, bars).map_err(|e| match e {
            DataError::EmptySeries { symbol, .. } => DataError::EmptySeries {
                symbol,
                path: path.to_path_buf(),
            },
            other => other,
        })
    }

    /// Build a source from bars already in memory.
    ///
    /// Sorts by timestamp and deduplicates exactly like the CSV path, so the
    /// downstream invariants hold regardless of where the rows came from.
    pub fn from_bars(symbol: impl Into<Symbol>, mut bars: Vec<Bar>) -> Result<Self, DataError> {
        let symbol = symbol.into();
        if bars.is_empty() {
            return Err(DataError::EmptySeries {
                symbol,
                path: PathBuf::new(),
            });
        }
        bars.sort_by_key(|b| b.timestamp);
        bars.dedup_by_key(|b| b.timestamp);
        for bar in &mut bars {
            bar.symbol = symbol.clone();
        }
        Ok(Self { symbol, bars })
    }

    /// The instrument this source belongs to.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Time-ordered bars, oldest first.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Consume the source, yielding its bars.
    pub fn into_bars(self) -> Vec<Bar> {
        self.bars
    }
}

/// Parse a timestamp as `%Y-%m-%d %H:%M:%S`, falling back to a bare date
/// (midnight).
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn parse_price(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    value.is_finite().then_some(value)
}

fn parse_volume(raw: &str) -> Option<u64> {
    // Some exports write volume as a float ("1234.0").
    let value: f64 = raw.trim().parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value as u64)
}

/// One row of the headered layout, or `None` if any needed field is
/// missing/unparseable (the row is dropped).
fn parse_headered_row(symbol: &str, record: &csv::StringRecord, map: ColumnMap) -> Option<Bar> {
    let adj_close = match map.adj_close {
        // Column present: the field must parse, otherwise the row is
        // incomplete and gets dropped.
        Some(idx) => Some(parse_price(record.get(idx)?)?),
        None => None,
    };
    Some(Bar {
        symbol: symbol.to_string(),
        timestamp: parse_timestamp(record.get(map.timestamp)?)?,
        open: parse_price(record.get(map.open)?)?,
        high: parse_price(record.get(map.high)?)?,
        low: parse_price(record.get(map.low)?)?,
        close: parse_price(record.get(map.close)?)?,
        volume: parse_volume(record.get(map.volume)?)?,
        adj_close,
        open_interest: None,
    })
}

/// One row of the headerless layout (fixed field order, low before high).
fn parse_headerless_row(symbol: &str, record: &csv::StringRecord) -> Option<Bar> {
    if record.len() < headerless::FIELD_COUNT {
        return None;
    }
    Some(Bar {
        symbol: symbol.to_string(),
        timestamp: parse_timestamp(record.get(headerless::TIMESTAMP)?)?,
        open: parse_price(record.get(headerless::OPEN)?)?,
        low: parse_price(record.get(headerless::LOW)?)?,
        high: parse_price(record.get(headerless::HIGH)?)?,
        close: parse_price(record.get(headerless::CLOSE)?)?,
        volume: parse_volume(record.get(headerless::VOLUME)?)?,
        adj_close: None,
        open_interest: parse_price(record.get(headerless::OPEN_INTEREST)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_headered_yahoo_layout() {
        let file = write_csv(
            "Date,Open,High,Low,Close,Adj Close,Volume\n\
             2024-01-02,100.0,105.0,98.0,103.0,102.5,50000\n\
             2024-01-03,103.0,106.0,101.0,104.0,103.5,60000\n",
        );
        let source = BarSource::from_csv("SPY", file.path(), CsvLayout::Headered).unwrap();
        assert_eq!(source.len(), 2);
        let bar = &source.bars()[0];
        assert_eq!(bar.symbol, "SPY");
        assert_eq!(bar.high, 105.0);
        assert_eq!(bar.adj_close, Some(102.5));
        assert_eq!(bar.open_interest, None);
    }

    #[test]
    fn loads_headerless_layout_with_low_before_high() {
        let file = write_csv(
            "2024-01-02 10:00:00,100.0,98.0,105.0,103.0,50000,1200\n\
             2024-01-02 10:05:00,103.0,101.0,106.0,104.0,60000,1180\n",
        );
        let source = BarSource::from_csv("ES", file.path(), CsvLayout::Headerless).unwrap();
        assert_eq!(source.len(), 2);
        let bar = &source.bars()[0];
        // Column 2 is low, column 3 is high.
        assert_eq!(bar.low, 98.0);
        assert_eq!(bar.high, 105.0);
        assert_eq!(bar.open_interest, Some(1200.0));
        assert_eq!(bar.adj_close, None);
    }

    #[test]
    fn drops_rows_with_missing_fields() {
        let file = write_csv(
            "Date,Open,High,Low,Close,Adj Close,Volume\n\
             2024-01-02,100.0,105.0,98.0,103.0,102.5,50000\n\
             2024-01-03,103.0,,101.0,104.0,103.5,60000\n\
             not-a-date,103.0,106.0,101.0,104.0,103.5,60000\n\
             2024-01-04,104.0,107.0,102.0,105.0,104.5,70000\n",
        );
        let source = BarSource::from_csv("SPY", file.path(), CsvLayout::Headered).unwrap();
        assert_eq!(source.len(), 2);
        assert_eq!(source.bars()[1].close, 105.0);
    }

    #[test]
    fn sorts_and_dedupes_by_timestamp() {
        let file = write_csv(
            "Date,Open,High,Low,Close,Volume\n\
             2024-01-04,104.0,107.0,102.0,105.0,70000\n\
             2024-01-02,100.0,105.0,98.0,103.0,50000\n\
             2024-01-02,999.0,999.0,999.0,999.0,99999\n\
             2024-01-03,103.0,106.0,101.0,104.0,60000\n",
        );
        let source = BarSource::from_csv("SPY", file.path(), CsvLayout::Headered).unwrap();
        assert_eq!(source.len(), 3);
        // Sorted ascending, first occurrence kept for the duplicate.
        assert_eq!(source.bars()[0].close, 103.0);
        assert_eq!(source.bars()[2].close, 105.0);
    }

    #[test]
    fn missing_required_column_fails_fast() {
        let file = write_csv(
            "Date,Open,High,Low,Volume\n\
             2024-01-02,100.0,105.0,98.0,50000\n",
        );
        let err = BarSource::from_csv("SPY", file.path(), CsvLayout::Headered).unwrap_err();
        match err {
            DataError::MissingColumn { column, .. } => assert_eq!(column, "close"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn all_rows_unusable_is_empty_series() {
        let file = write_csv(
            "Date,Open,High,Low,Close,Volume\n\
             bad,row,is,dropped,entirely,here\n",
        );
        let err = BarSource::from_csv("SPY", file.path(), CsvLayout::Headered).unwrap_err();
        assert!(matches!(err, DataError::EmptySeries { .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = BarSource::from_csv(
            "SPY",
            Path::new("/nonexistent/SPY.csv"),
            CsvLayout::Headered,
        )
        .unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }

    #[test]
    fn date_only_timestamps_parse_as_midnight() {
        let ts = parse_timestamp("2024-01-02").unwrap();
        assert_eq!(ts.time(), chrono::NaiveTime::from_hms_opt(0, 0, 0).unwrap());
        let ts = parse_timestamp("2024-01-02 15:30:00").unwrap();
        assert_eq!(
            ts.time(),
            chrono::NaiveTime::from_hms_opt(15, 30, 0).unwrap()
        );
    }
}
