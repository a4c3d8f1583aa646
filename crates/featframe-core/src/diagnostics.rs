//! Diagnostics seam between the decoder and any logging backend.
//!
//! The decoder reports non-fatal conditions and outcome summaries as events
//! through a sink trait; it has no dependency on where they go. `TracingSink`
//! forwards to `tracing`, `NullSink` discards everything.

/// Non-fatal conditions and outcome summaries emitted while decoding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DiagnosticEvent<'a> {
    /// No descriptors were supplied at decoder construction.
    EmptySchema,
    /// The header declared a zero or negative frame count.
    NoFrames { input: &'a str, frame_count: i32 },
    /// A descriptor carries a kind marker the decoder does not recognize.
    UnsupportedKind { feature: &'a str, marker: char },
    /// A decode finished; counts cover recognized descriptors only.
    DecodeComplete {
        input: &'a str,
        features: usize,
        frames: i32,
    },
    /// A decode aborted; the error also propagates to the caller.
    DecodeFailed { input: &'a str, message: &'a str },
}

/// Receives decoder diagnostics. Emission must not affect decode results.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, event: DiagnosticEvent<'_>);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &S {
    fn emit(&self, event: DiagnosticEvent<'_>) {
        (**self).emit(event);
    }
}

/// Default sink: forwards events to `tracing` at info/warn/error level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, event: DiagnosticEvent<'_>) {
        match event {
            DiagnosticEvent::EmptySchema => {
                tracing::warn!("no feature descriptors supplied; decodes will yield no features");
            }
            DiagnosticEvent::NoFrames { input, frame_count } => {
                tracing::warn!(input, frame_count, "no data frames; returning empty sequences");
            }
            DiagnosticEvent::UnsupportedKind { feature, marker } => {
                tracing::warn!(feature, %marker, "unsupported feature kind; skipping");
            }
            DiagnosticEvent::DecodeComplete {
                input,
                features,
                frames,
            } => {
                tracing::info!(input, features, frames, "decoded feature file");
            }
            DiagnosticEvent::DecodeFailed { input, message } => {
                tracing::error!(input, message, "feature file decode failed");
            }
        }
    }
}

/// Sink that discards all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&self, _event: DiagnosticEvent<'_>) {}
}
