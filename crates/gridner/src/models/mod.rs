//! Value types shared by providers and the change engine.

mod entity;
mod extraction;

pub use entity::{Disambiguation, NamedEntity, RECON_SERVICE};
pub use extraction::{ExtractionError, ExtractionResult, WrongVariant};
