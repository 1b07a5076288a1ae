//! Media layout and dimension probing
//!
//! Computes display sizes for embedded media from their natural dimensions,
//! and probes those dimensions asynchronously with a timeout.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod layout;
pub mod probe;

pub use layout::{compute_layout, fallback_layout, Dimensions, Layout};
pub use probe::{
    probe_with_timeout, DimensionProber, HttpDimensionProber, ProbeError, ProbeTask,
    ProberConfig, DEFAULT_PROBE_TIMEOUT, MAX_PROBE_BYTES,
};
