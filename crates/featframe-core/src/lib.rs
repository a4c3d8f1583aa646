//! Core library for decoding fixed-layout binary feature files.
//!
//! A feature file is a 4-byte little-endian frame count followed by one
//! contiguous value block per schema descriptor (feature-major layout).
//! The decoder turns such a file into named, typed value sequences, driven
//! by an ordered schema the caller supplies once at construction.
//!
//! Invariants:
//! - Schema order defines on-disk field order and result entry order.
//! - Callers get a fully populated mapping or an error, never both.
//! - A zero or negative frame count yields empty sequences, not an error.
//! - Diagnostics go through a sink seam and never change decode results.
//!
//! # Examples
//! ```
//! use std::io::Cursor;
//!
//! use featframe_core::{FeatureDescriptor, FeatureFileDecoder, FeatureKind};
//!
//! let schema = vec![
//!     FeatureDescriptor::new("pitch", FeatureKind::Float),
//!     FeatureDescriptor::new("energy", FeatureKind::Int),
//! ];
//!
//! let mut bytes = Vec::new();
//! bytes.extend_from_slice(&1i32.to_le_bytes());
//! bytes.extend_from_slice(&1.5f32.to_le_bytes());
//! bytes.extend_from_slice(&7i32.to_le_bytes());
//!
//! let decoder = FeatureFileDecoder::new(schema);
//! let features = decoder.decode("example.bin", Cursor::new(bytes))?;
//! assert_eq!(features.get("pitch").unwrap().as_floats(), Some(&[1.5][..]));
//! assert_eq!(features.get("energy").unwrap().as_ints(), Some(&[7][..]));
//! # Ok::<(), featframe_core::DecodeError>(())
//! ```

use serde::Serialize;

mod decode;
mod diagnostics;
mod schema;

pub use decode::{DecodeError, DecodedFeatures, FeatureFileDecoder, FeatureValues};
pub use diagnostics::{DiagnosticEvent, DiagnosticSink, NullSink, TracingSink};
pub use schema::{FeatureDescriptor, FeatureKind, Schema, SchemaError};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when no generation time is supplied.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Decode report written by the CLI: versioned envelope around the decoded
/// feature mapping.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Report schema version (not the binary format version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// RFC3339 timestamp representing the report generation time.
    pub generated_at: String,
    /// Input file metadata.
    pub input: InputInfo,
    /// Frame count declared by the input header.
    pub frame_count: i32,
    /// Decoded feature sequences in schema order.
    pub features: DecodedFeatures,
}

/// Tool metadata embedded in reports.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    /// Tool name (e.g., "featframe").
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

/// Input file metadata embedded in reports.
#[derive(Debug, Clone, Serialize)]
pub struct InputInfo {
    /// Input path as provided to the decoder.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

/// Build a stub report with base fields filled and no decoded features.
///
/// # Examples
/// ```
/// use featframe_core::make_stub_report;
///
/// let report = make_stub_report("frames.bin", 24);
/// assert_eq!(report.report_version, featframe_core::REPORT_VERSION);
/// assert!(report.features.is_empty());
/// ```
pub fn make_stub_report(input_path: &str, input_bytes: u64) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "featframe".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        frame_count: 0,
        features: DecodedFeatures::default(),
    }
}
