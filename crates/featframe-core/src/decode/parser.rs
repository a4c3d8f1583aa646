use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Serialize;
use serde::ser::SerializeMap;

use super::error::DecodeError;
use super::layout;
use super::reader::ValueReader;
use crate::diagnostics::{DiagnosticEvent, DiagnosticSink, TracingSink};
use crate::schema::{FeatureDescriptor, FeatureKind};

/// Decoded values for one feature, one value per frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeatureValues {
    Float(Vec<f32>),
    Int(Vec<i32>),
}

impl FeatureValues {
    pub fn len(&self) -> usize {
        match self {
            FeatureValues::Float(values) => values.len(),
            FeatureValues::Int(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_floats(&self) -> Option<&[f32]> {
        match self {
            FeatureValues::Float(values) => Some(values),
            FeatureValues::Int(_) => None,
        }
    }

    pub fn as_ints(&self) -> Option<&[i32]> {
        match self {
            FeatureValues::Int(values) => Some(values),
            FeatureValues::Float(_) => None,
        }
    }
}

/// Ordered mapping from feature name to decoded values.
///
/// Entry order follows schema order; names are unique. Serializes to a JSON
/// object preserving that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedFeatures {
    entries: Vec<(String, FeatureValues)>,
    frame_count: i32,
}

impl DecodedFeatures {
    fn push(&mut self, name: String, values: FeatureValues) {
        self.entries.push((name, values));
    }

    /// The frame count declared by the file header, as read, which may be
    /// zero or negative.
    pub fn frame_count(&self) -> i32 {
        self.frame_count
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValues> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, values)| values)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValues)> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values))
    }
}

impl Serialize for DecodedFeatures {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, values) in &self.entries {
            map.serialize_entry(name, values)?;
        }
        map.end()
    }
}

/// Schema-driven decoder for fixed-layout binary feature files.
///
/// Holds only the immutable descriptor list and a diagnostics sink, so one
/// instance can decode any number of files, including concurrently, as long
/// as each call gets its own stream.
pub struct FeatureFileDecoder<S: DiagnosticSink = TracingSink> {
    descriptors: Vec<FeatureDescriptor>,
    sink: S,
}

impl FeatureFileDecoder<TracingSink> {
    /// Build a decoder reporting diagnostics through `tracing`.
    pub fn new(descriptors: Vec<FeatureDescriptor>) -> Self {
        Self::with_sink(descriptors, TracingSink)
    }
}

impl<S: DiagnosticSink> FeatureFileDecoder<S> {
    /// Build a decoder with an explicit diagnostics sink.
    ///
    /// An empty descriptor list is reported here, once; decodes against it
    /// still succeed and yield no feature sequences.
    pub fn with_sink(descriptors: Vec<FeatureDescriptor>, sink: S) -> Self {
        if descriptors.is_empty() {
            sink.emit(DiagnosticEvent::EmptySchema);
        }
        Self { descriptors, sink }
    }

    pub fn descriptors(&self) -> &[FeatureDescriptor] {
        &self.descriptors
    }

    /// Decode one feature file. The handle closes on every exit path.
    pub fn decode_file(&self, path: &Path) -> Result<DecodedFeatures, DecodeError> {
        let input = path.display().to_string();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) => {
                self.sink.emit(DiagnosticEvent::DecodeFailed {
                    input: &input,
                    message: &err.to_string(),
                });
                return Err(err.into());
            }
        };
        self.decode(&input, BufReader::new(file))
    }

    /// Decode a named byte stream against the schema supplied at
    /// construction.
    ///
    /// Returns either a fully populated mapping, one entry per recognized
    /// descriptor in schema order, or a [`DecodeError`]; never a partial
    /// result.
    pub fn decode<R: Read>(&self, input: &str, stream: R) -> Result<DecodedFeatures, DecodeError> {
        match self.decode_stream(input, stream) {
            Ok(features) => Ok(features),
            Err(err) => {
                self.sink.emit(DiagnosticEvent::DecodeFailed {
                    input,
                    message: &err.to_string(),
                });
                Err(err)
            }
        }
    }

    fn decode_stream<R: Read>(
        &self,
        input: &str,
        stream: R,
    ) -> Result<DecodedFeatures, DecodeError> {
        let mut reader = ValueReader::new(stream);
        let frame_count = reader.read_frame_count(input)?;

        let mut features = DecodedFeatures {
            frame_count,
            ..DecodedFeatures::default()
        };
        if frame_count <= 0 {
            self.sink
                .emit(DiagnosticEvent::NoFrames { input, frame_count });
            for descriptor in &self.descriptors {
                match descriptor.kind {
                    FeatureKind::Float => {
                        features.push(descriptor.name.clone(), FeatureValues::Float(Vec::new()));
                    }
                    FeatureKind::Int => {
                        features.push(descriptor.name.clone(), FeatureValues::Int(Vec::new()));
                    }
                    FeatureKind::Other(_) => {}
                }
            }
            return Ok(features);
        }

        let frames = frame_count as usize;
        let prealloc = frames.min(layout::MAX_FRAME_PREALLOC);
        for descriptor in &self.descriptors {
            match descriptor.kind {
                FeatureKind::Float => {
                    let mut values = Vec::with_capacity(prealloc);
                    for frame in 0..frames {
                        values.push(reader.read_f32(&descriptor.name, frame)?);
                    }
                    features.push(descriptor.name.clone(), FeatureValues::Float(values));
                }
                FeatureKind::Int => {
                    let mut values = Vec::with_capacity(prealloc);
                    for frame in 0..frames {
                        values.push(reader.read_i32(&descriptor.name, frame)?);
                    }
                    features.push(descriptor.name.clone(), FeatureValues::Int(values));
                }
                FeatureKind::Other(marker) => {
                    self.sink.emit(DiagnosticEvent::UnsupportedKind {
                        feature: &descriptor.name,
                        marker,
                    });
                }
            }
        }

        self.sink.emit(DiagnosticEvent::DecodeComplete {
            input,
            features: features.len(),
            frames: frame_count,
        });
        Ok(features)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Mutex;

    use super::{DecodedFeatures, FeatureFileDecoder, FeatureValues};
    use crate::diagnostics::{DiagnosticEvent, DiagnosticSink, NullSink};
    use crate::schema::{FeatureDescriptor, FeatureKind};

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<String>>,
    }

    impl RecordingSink {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl DiagnosticSink for RecordingSink {
        fn emit(&self, event: DiagnosticEvent<'_>) {
            self.events.lock().unwrap().push(format!("{event:?}"));
        }
    }

    fn sample_schema() -> Vec<FeatureDescriptor> {
        vec![
            FeatureDescriptor::new("pitch", FeatureKind::Float),
            FeatureDescriptor::new("energy", FeatureKind::Int),
        ]
    }

    fn sample_bytes() -> Vec<u8> {
        // 2 frames: pitch [1.5, 2.5] then energy [7, 9], feature-major.
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&2i32.to_le_bytes());
        bytes.extend_from_slice(&1.5f32.to_le_bytes());
        bytes.extend_from_slice(&2.5f32.to_le_bytes());
        bytes.extend_from_slice(&7i32.to_le_bytes());
        bytes.extend_from_slice(&9i32.to_le_bytes());
        bytes
    }

    #[test]
    fn decode_worked_example() {
        let decoder = FeatureFileDecoder::with_sink(sample_schema(), NullSink);
        let features = decoder.decode("example.bin", Cursor::new(sample_bytes())).unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features.get("pitch").unwrap().as_floats(), Some(&[1.5, 2.5][..]));
        assert_eq!(features.get("energy").unwrap().as_ints(), Some(&[7, 9][..]));
    }

    #[test]
    fn entries_follow_schema_order() {
        let decoder = FeatureFileDecoder::with_sink(sample_schema(), NullSink);
        let features = decoder.decode("example.bin", Cursor::new(sample_bytes())).unwrap();
        let names: Vec<&str> = features.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["pitch", "energy"]);
    }

    #[test]
    fn unsupported_kind_is_skipped_with_diagnostic() {
        let schema = vec![
            FeatureDescriptor::new("pitch", FeatureKind::Float),
            FeatureDescriptor::new("label", FeatureKind::Other('s')),
            FeatureDescriptor::new("energy", FeatureKind::Int),
        ];
        let sink = RecordingSink::default();
        let decoder = FeatureFileDecoder::with_sink(schema, &sink);
        let features = decoder.decode("example.bin", Cursor::new(sample_bytes())).unwrap();

        assert_eq!(features.len(), 2);
        assert!(features.get("label").is_none());
        let events = sink.events();
        assert!(events.iter().any(|event| event.contains("UnsupportedKind")
            && event.contains("label")
            && event.contains("'s'")));
    }

    #[test]
    fn empty_schema_reports_once_at_construction() {
        let sink = RecordingSink::default();
        let decoder = FeatureFileDecoder::with_sink(Vec::new(), &sink);
        assert_eq!(sink.events().len(), 1);
        assert!(sink.events()[0].contains("EmptySchema"));

        let features = decoder.decode("example.bin", Cursor::new(sample_bytes())).unwrap();
        assert!(features.is_empty());
    }

    #[test]
    fn successful_decode_emits_summary() {
        let sink = RecordingSink::default();
        let decoder = FeatureFileDecoder::with_sink(sample_schema(), &sink);
        decoder.decode("example.bin", Cursor::new(sample_bytes())).unwrap();
        let events = sink.events();
        assert!(events.iter().any(|event| event.contains("DecodeComplete")));
    }

    #[test]
    fn failed_decode_emits_failure_event() {
        let sink = RecordingSink::default();
        let decoder = FeatureFileDecoder::with_sink(sample_schema(), &sink);
        let err = decoder.decode("short.bin", Cursor::new([0u8; 2])).unwrap_err();
        assert!(err.to_string().contains("truncated header"));
        let events = sink.events();
        assert!(events.iter().any(|event| event.contains("DecodeFailed")));
    }

    #[test]
    fn serializes_as_ordered_json_object() {
        let decoder = FeatureFileDecoder::with_sink(sample_schema(), NullSink);
        let features = decoder.decode("example.bin", Cursor::new(sample_bytes())).unwrap();
        let json = serde_json::to_string(&features).unwrap();
        assert_eq!(json, r#"{"pitch":[1.5,2.5],"energy":[7,9]}"#);
    }

    #[test]
    fn default_decoded_features_is_empty() {
        let features = DecodedFeatures::default();
        assert!(features.is_empty());
        assert_eq!(features.frame_count(), 0);
        assert!(features.get("pitch").is_none());
    }

    #[test]
    fn result_carries_declared_frame_count() {
        let decoder = FeatureFileDecoder::with_sink(sample_schema(), NullSink);
        let features = decoder.decode("example.bin", Cursor::new(sample_bytes())).unwrap();
        assert_eq!(features.frame_count(), 2);

        let negative = (-3i32).to_le_bytes();
        let features = decoder.decode("neg.bin", Cursor::new(negative)).unwrap();
        assert_eq!(features.frame_count(), -3);
    }

    #[test]
    fn decoder_is_shareable_across_threads() {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<FeatureFileDecoder>();
    }

    #[test]
    fn feature_values_accessors() {
        let floats = FeatureValues::Float(vec![1.0]);
        assert_eq!(floats.len(), 1);
        assert!(floats.as_ints().is_none());
        let ints = FeatureValues::Int(Vec::new());
        assert!(ints.is_empty());
        assert!(ints.as_floats().is_none());
    }
}
