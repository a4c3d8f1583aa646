use std::io::{ErrorKind, Read};

use super::error::DecodeError;
use super::layout;

/// Sequential little-endian value reader over a blocking byte stream.
///
/// Distinguishes a short read (the stream ended inside a value) from other
/// I/O failures so callers can attach the right truncation context.
pub(crate) struct ValueReader<R> {
    inner: R,
}

impl<R: Read> ValueReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Fill `buf` exactly. `Ok(false)` means the stream ended before enough
    /// bytes were available.
    fn read_exact_or_eof(&mut self, buf: &mut [u8]) -> Result<bool, std::io::Error> {
        match self.inner.read_exact(buf) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::UnexpectedEof => Ok(false),
            Err(err) => Err(err),
        }
    }

    fn read_value(&mut self) -> Result<Option<[u8; layout::VALUE_WIDTH]>, std::io::Error> {
        let mut buf = [0u8; layout::VALUE_WIDTH];
        Ok(self.read_exact_or_eof(&mut buf)?.then_some(buf))
    }

    pub fn read_frame_count(&mut self, input: &str) -> Result<i32, DecodeError> {
        let mut buf = [0u8; layout::HEADER_LEN];
        if !self.read_exact_or_eof(&mut buf)? {
            return Err(DecodeError::TruncatedHeader {
                input: input.to_string(),
            });
        }
        Ok(i32::from_le_bytes(buf))
    }

    pub fn read_f32(&mut self, feature: &str, frame: usize) -> Result<f32, DecodeError> {
        match self.read_value()? {
            Some(buf) => Ok(f32::from_le_bytes(buf)),
            None => Err(truncated(feature, frame)),
        }
    }

    pub fn read_i32(&mut self, feature: &str, frame: usize) -> Result<i32, DecodeError> {
        match self.read_value()? {
            Some(buf) => Ok(i32::from_le_bytes(buf)),
            None => Err(truncated(feature, frame)),
        }
    }
}

fn truncated(feature: &str, frame: usize) -> DecodeError {
    DecodeError::TruncatedFrameData {
        feature: feature.to_string(),
        frame,
    }
}
