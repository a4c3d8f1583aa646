//! Feature schema model and loading.
//!
//! A schema is an ordered list of feature descriptors; list order defines
//! the on-disk field order. Loading validates names and declared widths but
//! deliberately keeps unknown kind markers, which the decoder skips with a
//! diagnostic.

pub mod error;
pub mod parser;

pub use error::SchemaError;
pub use parser::{FeatureDescriptor, FeatureKind, Schema};
