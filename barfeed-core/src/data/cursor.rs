//! BarCursor — a strictly forward, single-pass walk over an aligned series.
//!
//! Implemented as an explicit state object (position + exhausted flag)
//! rather than an iterator adapter, so the terminal state is inspectable
//! and sticky: once exhausted, every further `advance()` reports
//! `Exhausted` again. It never panics at the end of data.

use crate::data::align::AlignedSeries;
use crate::domain::Bar;

/// Result of advancing a cursor by one position.
#[derive(Debug, Clone, PartialEq)]
pub enum CursorStep {
    /// The next bar in order, instrument id attached.
    Bar(Bar),
    /// The position was consumed, but the instrument had no observation yet
    /// (before its first native row). Nothing is delivered.
    Gap,
    /// Every element has been consumed. Terminal and sticky.
    Exhausted,
}

/// Per-instrument cursor state. Owned by a handler, never shared.
#[derive(Debug)]
pub struct BarCursor {
    series: AlignedSeries,
    position: usize,
    exhausted: bool,
}

impl BarCursor {
    pub fn new(series: AlignedSeries) -> Self {
        Self {
            series,
            position: 0,
            exhausted: false,
        }
    }

    /// Consume the next position.
    ///
    /// Non-restartable: there is no way to move the cursor backwards.
    pub fn advance(&mut self) -> CursorStep {
        if self.position >= self.series.len() {
            self.exhausted = true;
            return CursorStep::Exhausted;
        }
        let step = match self.series[self.position].take() {
            Some(bar) => CursorStep::Bar(bar),
            None => CursorStep::Gap,
        };
        self.position += 1;
        step
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Positions not yet consumed.
    pub fn remaining(&self) -> usize {
        self.series.len() - self.position
    }
}
