//! Bar — the fundamental market data unit.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// OHLCV bar for a single instrument at a single timestamp.
///
/// Depending on the source layout, a bar may carry one secondary field:
/// `adj_close` (headered exports) or `open_interest` (headerless vendor
/// files). Both are `None` when the source does not provide them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub symbol: String,
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub adj_close: Option<f64>,
    pub open_interest: Option<f64>,
}

impl Bar {
    /// Basic OHLCV sanity check: high >= low, high bounds open/close, etc.
    pub fn is_sane(&self) -> bool {
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > 0.0
            && self.close > 0.0
    }

    /// Value of a single field, for the `latest_values` query surface.
    ///
    /// Optional fields yield `None` when the source layout did not carry
    /// them; callers see that as "field not available", not an error.
    pub fn field(&self, field: BarField) -> Option<f64> {
        match field {
            BarField::Open => Some(self.open),
            BarField::High => Some(self.high),
            BarField::Low => Some(self.low),
            BarField::Close => Some(self.close),
            BarField::Volume => Some(self.volume as f64),
            BarField::AdjClose => self.adj_close,
            BarField::OpenInterest => self.open_interest,
        }
    }
}

/// Typed selector for the per-field query surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarField {
    Open,
    High,
    Low,
    Close,
    Volume,
    AdjClose,
    OpenInterest,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_bar() -> Bar {
        Bar {
            symbol: "SPY".into(),
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            open: 100.0,
            high: 105.0,
            low: 98.0,
            close: 103.0,
            volume: 50_000,
            adj_close: Some(103.0),
            open_interest: None,
        }
    }

    #[test]
    fn bar_is_sane() {
        assert!(sample_bar().is_sane());
    }

    #[test]
    fn bar_detects_insane_high_low() {
        let mut bar = sample_bar();
        bar.high = 97.0; // below low
        assert!(!bar.is_sane());
    }

    #[test]
    fn field_selector_covers_optional_fields() {
        let bar = sample_bar();
        assert_eq!(bar.field(BarField::Close), Some(103.0));
        assert_eq!(bar.field(BarField::Volume), Some(50_000.0));
        assert_eq!(bar.field(BarField::AdjClose), Some(103.0));
        assert_eq!(bar.field(BarField::OpenInterest), None);
    }

    #[test]
    fn bar_serialization_roundtrip() {
        let bar = sample_bar();
        let json = serde_json::to_string(&bar).unwrap();
        let deser: Bar = serde_json::from_str(&json).unwrap();
        assert_eq!(bar, deser);
    }
}
