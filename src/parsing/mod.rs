//! HTML statement-table reconstruction.
//!
//! The submodules turn one EDGAR report page into a single rectangular table
//! with per-row indent pixels and metadata: [`table`] walks an individual
//! `<table>` element, [`indent`] recovers indentation signals, [`stitch`]
//! picks the dominant table, appends continuations and merges the header
//! block, and [`text`] holds the shared cell recognizers.

pub mod indent;
pub mod stitch;
pub mod table;
pub mod text;

pub use stitch::select_and_stitch;
pub use table::{RowMeta, TableGrid};
