//! Feed-update notifications and the append-only event sink.
//!
//! The sink is consumer-defined: the handler only ever appends to it, one
//! marker per `update_bars` call, and never reads from it. Implementations
//! are provided for plain collections and for an mpsc sender, so a driving
//! loop can consume notifications from a channel if it prefers.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Marker meaning "the feed advanced one step".
///
/// Carries no payload: consumers react by querying the handler's latest
/// bars, so a strategy behaves identically against historic and live feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MarketEvent;

/// Append-only collaborator the handler pushes notifications into.
pub trait EventSink {
    /// Append one feed-update marker.
    fn push(&mut self, event: MarketEvent);
}

impl EventSink for Vec<MarketEvent> {
    fn push(&mut self, event: MarketEvent) {
        Vec::push(self, event);
    }
}

impl EventSink for VecDeque<MarketEvent> {
    fn push(&mut self, event: MarketEvent) {
        self.push_back(event);
    }
}

impl EventSink for std::sync::mpsc::Sender<MarketEvent> {
    fn push(&mut self, event: MarketEvent) {
        // A disconnected receiver means the consumer is gone; the
        // notification is dropped. End-of-data still reaches the driving
        // loop through `continue_backtest`.
        let _ = self.send(event);
    }
}
