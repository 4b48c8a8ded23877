//! eta-grid: precomputed drive times from a coordinate grid to fixed
//! destinations.
//!
//! The pipeline probes an OSRM-compatible routing service, generates a grid
//! over a bounding box, queries travel time matrices batch by batch, and
//! assembles a sorted lookup table written out as a JavaScript data file.

pub mod assembler;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod grid;
pub mod osrm;
pub mod output;
pub mod pipeline;
pub mod traits;
