//! Bar loading, timeline alignment, and cursors

pub mod align;
pub mod cursor;
pub mod schema;
pub mod source;

pub use align::{align_sources, AlignedData, AlignedSeries};
pub use cursor::{BarCursor, CursorStep};
pub use schema::{ColumnMap, CsvLayout};
pub use source::{BarSource, DataError};
