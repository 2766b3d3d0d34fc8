//! Numeric helpers shared by the feature catalog.

pub mod statistics;
