//! Decompressor for archive byte streams.
//!
//! Archives are gzip streams. Concatenated gzip members are decoded as one
//! continuous text.

use flate2::read::MultiGzDecoder;
use std::io::Read;
use tracing::{debug, info, instrument};

use crate::errors::PipelineError;

/// Stateless gzip decoder producing UTF-8 text.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decompressor;

impl Decompressor {
    pub fn new() -> Self {
        Self
    }

    /// Decode a compressed archive into text.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The decoded content
    /// * `Err(PipelineError::DecodeError)` - If the stream is empty, corrupt, truncated,
    ///   not gzip, or does not decode to UTF-8
    #[instrument(skip(self, compressed), fields(compressed_size = compressed.len()))]
    pub fn decompress(&self, compressed: &[u8]) -> Result<String, PipelineError> {
        info!("Unzipping archive");

        if compressed.is_empty() {
            return Err(PipelineError::decode("archive is empty"));
        }

        let mut text = String::new();
        MultiGzDecoder::new(compressed)
            .read_to_string(&mut text)
            .map_err(|e| PipelineError::decode(format!("invalid gzip archive: {}", e)))?;

        debug!(decoded_size = text.len(), "Archive unzipped successfully");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn gzip(text: &str) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(text.as_bytes()).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_decompress_roundtrip() {
        let text = r#"{"Records":[{"eventName":"ConsoleLogin"}]}"#;
        let decoded = Decompressor::new().decompress(&gzip(text)).unwrap();
        assert_eq!(decoded, text);
    }

    #[test]
    fn test_concatenated_members() {
        let mut bytes = gzip("{\"Records\":");
        bytes.extend(gzip("[]}"));

        let decoded = Decompressor::new().decompress(&bytes).unwrap();
        assert_eq!(decoded, "{\"Records\":[]}");
    }

    #[test]
    fn test_not_gzip() {
        let result = Decompressor::new().decompress(b"{\"Records\":[]}");
        assert!(matches!(result, Err(PipelineError::DecodeError(_))));
    }

    #[test]
    fn test_truncated_stream() {
        let bytes = gzip(&"x".repeat(4096));
        let result = Decompressor::new().decompress(&bytes[..bytes.len() / 2]);
        assert!(matches!(result, Err(PipelineError::DecodeError(_))));
    }

    #[test]
    fn test_empty_input() {
        let result = Decompressor::new().decompress(&[]);
        assert!(matches!(result, Err(PipelineError::DecodeError(_))));
    }

    #[test]
    fn test_non_utf8_content() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&[0xff, 0xfe, 0xfd]).unwrap();
        let bytes = encoder.finish().unwrap();

        let result = Decompressor::new().decompress(&bytes);
        assert!(matches!(result, Err(PipelineError::DecodeError(_))));
    }
}
