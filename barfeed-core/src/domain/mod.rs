//! Domain types for barfeed

pub mod bar;

pub use bar::{Bar, BarField};

/// Symbol type alias
pub type Symbol = String;
