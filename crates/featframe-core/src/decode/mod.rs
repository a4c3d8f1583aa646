//! Binary feature file decoding.
//!
//! The format is a 4-byte little-endian frame count followed by
//! feature-major value blocks: all frames of the first descriptor, then all
//! frames of the next, each value 4 bytes little-endian. Wire constants live
//! in `layout`, safe sequential reads in `reader`, and the schema-driven
//! decode loop in `parser`.
//!
//! Truncation anywhere is fatal and names the exact boundary (header, or
//! feature plus frame index); a zero or negative frame count is a defined
//! edge case that yields empty sequences.

pub mod error;
pub mod layout;
pub mod parser;
pub(crate) mod reader;

pub use error::DecodeError;
pub use parser::{DecodedFeatures, FeatureFileDecoder, FeatureValues};
