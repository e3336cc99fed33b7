//! gridner - named-entity annotations materialized into tabular data.
//!
//! Core library exposing the entity model, the grid interface, the
//! reversible extraction change and application settings.

pub mod change;
pub mod config;
pub mod grid;
pub mod models;
