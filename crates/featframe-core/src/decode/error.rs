use thiserror::Error;

/// Fatal decode failures. Skipped descriptors and zero-frame files are
/// diagnostics, not errors; there is no catch-all variant.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("truncated header in '{input}': fewer than 4 bytes for the frame count")]
    TruncatedHeader { input: String },
    #[error("truncated frame data: stream ended reading feature '{feature}' at frame {frame}")]
    TruncatedFrameData { feature: String, frame: usize },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
