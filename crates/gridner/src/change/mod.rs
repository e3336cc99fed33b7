//! Reversible grid edits produced by named-entity extraction.
//!
//! A `NerChange` is created once every (row, provider) extraction finished,
//! applied to add one column per provider, and reverted/re-applied for
//! undo/redo. Changes persist one JSON object per line in a `ChangeLog`.

mod error;
mod log;
mod ner_change;

pub use error::ChangeError;
pub use log::ChangeLog;
pub use ner_change::NerChange;
