//! The feed abstraction: handlers, events, and the two concrete feeds

pub mod event;
pub mod handler;
pub mod historic;
pub mod single;

pub use event::{EventSink, MarketEvent};
pub use handler::DataHandler;
pub use historic::HistoricCsvFeed;
pub use single::SingleSeriesFeed;
