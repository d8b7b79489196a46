//! Pipeline-level tests for the sweep library
//!
//! Tests are organized by topic:
//! - `pipeline` - End-to-end sweeps through a scripted simulator
//! - `collisions` - Arrival rates that round to the same period
//! - `failures` - Error propagation from the gateway and extractor

mod pipeline;
mod support;
