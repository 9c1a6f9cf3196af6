//! Error types
//!
//! Only startup validation can fail. Illegal state transitions are rejected
//! no-ops, and presentation failures never reach the simulation.

use thiserror::Error;

use crate::sim::catalog::{ItemKind, Shape};

/// Malformed catalog data. Fatal: a non-positive footprint would stall generation.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("footprint for {kind:?}/{shape:?} must have positive size, got {width}x{height}")]
    InvalidFootprint {
        kind: ItemKind,
        shape: Shape,
        width: f32,
        height: f32,
    },

    #[error("variant table for {0:?} is empty")]
    EmptyVariantTable(ItemKind),
}

/// Tuning could not be loaded or is out of range
#[derive(Debug, Error)]
pub enum TuningError {
    #[error(transparent)]
    Parse(#[from] serde_json::Error),

    #[error("tuning value `{field}` out of range: {value}")]
    OutOfRange { field: &'static str, value: f32 },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
