//! Line codec for the telemetry wire protocol.
//!
//! Inbound frames are single lines holding a JSON object with at least the
//! numeric fields `x`, `y` and `head`. Anything else is noise: a streaming
//! device may deliver partial or corrupted lines, so [`FrameCodec::decode`]
//! is total and simply yields `None` for lines it cannot use.
//!
//! Outbound messages are arbitrary JSON-serializable mappings written as a
//! single JSON document with no additional framing.
//!
//! ```rust
//! use trackline::{FrameCodec, Sample};
//!
//! let sample = FrameCodec::decode(r#"{"x":1,"y":2,"head":90}"#);
//! assert_eq!(sample, Some(Sample::new(1.0, 2.0, 90.0)));
//!
//! assert_eq!(FrameCodec::decode("not json"), None);
//! assert_eq!(FrameCodec::decode(r#"{"x":1,"y":2}"#), None);
//! ```

use serde::Serialize;
use serde_json::Value;

use crate::Result;
use crate::types::Sample;

/// Wire field carrying the x coordinate
pub const FIELD_X: &str = "x";
/// Wire field carrying the y coordinate
pub const FIELD_Y: &str = "y";
/// Wire field carrying the heading in degrees
pub const FIELD_HEAD: &str = "head";

/// Stateless encoder/decoder for telemetry frames
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameCodec;

impl FrameCodec {
    /// Decode one line into a [`Sample`].
    ///
    /// Surrounding whitespace (including a trailing `\r`) is ignored. Returns
    /// `None` when the line is not a JSON object or any of the required
    /// numeric fields is missing or not a number. Extra fields are ignored.
    pub fn decode(line: &str) -> Option<Sample> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let value: Value = serde_json::from_str(line).ok()?;
        let object = value.as_object()?;

        let x = object.get(FIELD_X)?.as_f64()?;
        let y = object.get(FIELD_Y)?.as_f64()?;
        let heading = object.get(FIELD_HEAD)?.as_f64()?;

        Some(Sample { x, y, heading })
    }

    /// Serialize an outbound mapping to JSON bytes.
    ///
    /// No schema is imposed on the mapping; any `Serialize` value is accepted.
    pub fn encode<T>(mapping: &T) -> Result<Vec<u8>>
    where
        T: Serialize + ?Sized,
    {
        Ok(serde_json::to_vec(mapping)?)
    }

    /// Serialize a sample in wire form (`{"x":..,"y":..,"head":..}`).
    pub fn encode_sample(sample: &Sample) -> Result<Vec<u8>> {
        Self::encode(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    proptest! {
        #[test]
        fn decode_is_total(line in ".*") {
            // Must never panic; any outcome is a well-formed sample or nothing
            if let Some(sample) = FrameCodec::decode(&line) {
                prop_assert!(sample.x.is_finite());
                prop_assert!(sample.y.is_finite());
                prop_assert!(sample.heading.is_finite());
            }
        }

        #[test]
        fn decode_is_total_on_truncated_frames(
            x in -1.0e6f64..1.0e6,
            y in -1.0e6f64..1.0e6,
            head in 0.0f64..360.0,
            cut in 0usize..64,
        ) {
            let line = json!({"x": x, "y": y, "head": head}).to_string();
            let cut = cut.min(line.len());
            let truncated = &line[..cut];
            let decoded = FrameCodec::decode(truncated);
            if cut < line.len() {
                prop_assert_eq!(decoded, None);
            } else {
                prop_assert_eq!(decoded, Some(Sample::new(x, y, head)));
            }
        }

        #[test]
        fn sample_mapping_round_trips(
            x in -1.0e9f64..1.0e9,
            y in -1.0e9f64..1.0e9,
            head in -720.0f64..720.0,
        ) {
            let mut mapping = BTreeMap::new();
            mapping.insert("x", x);
            mapping.insert("y", y);
            mapping.insert("head", head);

            let bytes = FrameCodec::encode(&mapping).unwrap();
            let line = String::from_utf8(bytes).unwrap();
            prop_assert_eq!(FrameCodec::decode(&line), Some(Sample::new(x, y, head)));
        }
    }

    #[test]
    fn decodes_well_formed_frame() {
        let sample = FrameCodec::decode(r#"{"x":1,"y":2,"head":90}"#);
        assert_eq!(sample, Some(Sample::new(1.0, 2.0, 90.0)));
    }

    #[test]
    fn trims_whitespace_and_carriage_returns() {
        let sample = FrameCodec::decode("  {\"x\":1.5,\"y\":-2,\"head\":359.5}\r\n");
        assert_eq!(sample, Some(Sample::new(1.5, -2.0, 359.5)));
    }

    #[test]
    fn ignores_extra_fields() {
        let sample = FrameCodec::decode(r#"{"x":3,"y":4,"head":0,"speed":12,"tag":"a"}"#);
        assert_eq!(sample, Some(Sample::new(3.0, 4.0, 0.0)));
    }

    #[test]
    fn heading_is_not_wrapped() {
        let sample = FrameCodec::decode(r#"{"x":0,"y":0,"head":725}"#).unwrap();
        assert_eq!(sample.heading, 725.0);
    }

    #[test]
    fn discards_noise() {
        assert_eq!(FrameCodec::decode("not json"), None);
        assert_eq!(FrameCodec::decode(""), None);
        assert_eq!(FrameCodec::decode("   \r"), None);
        assert_eq!(FrameCodec::decode(r#"{"x":1,"y":2,"#), None);
        assert_eq!(FrameCodec::decode("\u{fffd}\u{fffd}{\"x\":1"), None);
    }

    #[test]
    fn discards_objects_missing_fields() {
        assert_eq!(FrameCodec::decode(r#"{"x":1,"y":2}"#), None);
        assert_eq!(FrameCodec::decode(r#"{"y":2,"head":1}"#), None);
        assert_eq!(FrameCodec::decode(r#"{"x":1,"head":1}"#), None);
        assert_eq!(FrameCodec::decode("{}"), None);
    }

    #[test]
    fn discards_non_numeric_fields() {
        assert_eq!(FrameCodec::decode(r#"{"x":"1","y":2,"head":3}"#), None);
        assert_eq!(FrameCodec::decode(r#"{"x":1,"y":null,"head":3}"#), None);
        assert_eq!(FrameCodec::decode(r#"{"x":1,"y":2,"head":[3]}"#), None);
    }

    #[test]
    fn discards_non_object_json() {
        assert_eq!(FrameCodec::decode("[1,2,90]"), None);
        assert_eq!(FrameCodec::decode("42"), None);
        assert_eq!(FrameCodec::decode("\"text\""), None);
        assert_eq!(FrameCodec::decode("null"), None);
    }

    #[test]
    fn encodes_arbitrary_mappings() {
        let bytes = FrameCodec::encode(&json!({"text": "hello"})).unwrap();
        assert_eq!(bytes, br#"{"text":"hello"}"#);

        let nested = json!({"cmd": "goto", "target": {"x": 1, "y": 2}});
        let bytes = FrameCodec::encode(&nested).unwrap();
        let back: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(back, nested);
    }

    #[test]
    fn encoded_sample_decodes_back() {
        let sample = Sample::new(12.25, -3.5, 271.0);
        let bytes = FrameCodec::encode_sample(&sample).unwrap();
        assert!(!bytes.contains(&b'\n'));
        let line = std::str::from_utf8(&bytes).unwrap();
        assert_eq!(FrameCodec::decode(line), Some(sample));
    }
}
