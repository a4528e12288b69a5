//! Line decoder for the sensor wire format.
//!
//! One record per line, comma-separated decimal degrees in the order
//! `pitch,roll[,yaw]`. Serial links deliver garbled or truncated frames from
//! time to time, so decoding is total: every input produces either a fully
//! formed sample or nothing.

use std::borrow::Cow;
use thiserror::Error;

use super::sample::{AngleSample, AxisSet};

/// Field delimiter on the wire.
pub const FIELD_DELIMITER: char = ',';

/// Why a line was rejected.
///
/// Only used for diagnostics; rejected lines are dropped either way.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// Nothing left after trimming
    #[error("empty line")]
    Empty,

    /// Caller asked for a field count the format does not define
    #[error("unsupported field count {0}, expected 2 or 3")]
    UnsupportedFieldCount(usize),

    /// Wrong number of comma-separated fields
    #[error("expected {expected} fields, got {actual}")]
    FieldCount { expected: usize, actual: usize },

    /// Field is not a decimal number
    #[error("field {index} is not a number: {text:?}")]
    InvalidNumber { index: usize, text: String },

    /// Field parsed but is NaN or infinite
    #[error("field {index} is not finite")]
    NonFinite { index: usize },
}

/// Decode one raw line, expecting `expected_field_count` fields.
///
/// Returns None for anything that is not a complete, finite record.
pub fn decode(raw_line: &[u8], expected_field_count: usize) -> Option<AngleSample> {
    decode_detailed(raw_line, expected_field_count).ok()
}

/// Decode one raw line and report the rejection reason on failure.
pub fn decode_detailed(
    raw_line: &[u8],
    expected_field_count: usize,
) -> Result<AngleSample, DecodeError> {
    if AxisSet::from_field_count(expected_field_count).is_none() {
        return Err(DecodeError::UnsupportedFieldCount(expected_field_count));
    }

    let text = strip_invalid_utf8(raw_line);
    let line = text.trim();
    if line.is_empty() {
        return Err(DecodeError::Empty);
    }

    let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    if fields.len() != expected_field_count {
        return Err(DecodeError::FieldCount {
            expected: expected_field_count,
            actual: fields.len(),
        });
    }

    let mut values = [0.0f64; 3];
    for (index, field) in fields.iter().enumerate() {
        let field = field.trim();
        let value: f64 = field.parse().map_err(|_| DecodeError::InvalidNumber {
            index,
            text: field.to_string(),
        })?;
        if !value.is_finite() {
            return Err(DecodeError::NonFinite { index });
        }
        values[index] = value;
    }

    AngleSample::from_fields(&values[..expected_field_count])
        .ok_or(DecodeError::UnsupportedFieldCount(expected_field_count))
}

/// Decode as UTF-8, dropping malformed byte sequences instead of
/// substituting them.
fn strip_invalid_utf8(raw_line: &[u8]) -> Cow<'_, str> {
    match String::from_utf8_lossy(raw_line) {
        Cow::Owned(lossy) => Cow::Owned(
            lossy
                .chars()
                .filter(|&c| c != char::REPLACEMENT_CHARACTER)
                .collect(),
        ),
        borrowed => borrowed,
    }
}

/// Decoder bound to one axis set.
#[derive(Clone, Copy, Debug)]
pub struct LineDecoder {
    axes: AxisSet,
}

impl LineDecoder {
    /// Create a decoder for the given axis set.
    pub const fn new(axes: AxisSet) -> Self {
        Self { axes }
    }

    /// Axis set this decoder expects.
    pub const fn axes(&self) -> AxisSet {
        self.axes
    }

    /// Decode one line; None if malformed.
    #[inline]
    pub fn decode(&self, raw_line: &[u8]) -> Option<AngleSample> {
        decode(raw_line, self.axes.field_count())
    }

    /// Decode one line with the rejection reason.
    #[inline]
    pub fn decode_detailed(&self, raw_line: &[u8]) -> Result<AngleSample, DecodeError> {
        decode_detailed(raw_line, self.axes.field_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_three_fields() {
        let s = decode(b"10.0,20.0,30.0", 3).unwrap();
        assert_eq!(s, AngleSample::with_yaw(10.0, 20.0, 30.0));
    }

    #[test]
    fn test_decode_two_fields() {
        let s = decode(b"-12.5,4\r\n", 2).unwrap();
        assert_eq!(s, AngleSample::new(-12.5, 4.0));
    }

    #[test]
    fn test_decode_rejects_wrong_count() {
        assert_eq!(decode(b"10.0,20.0", 3), None);
        assert_eq!(decode(b"10.0,20.0,30.0", 2), None);
        assert_eq!(
            decode_detailed(b"1,2,3,4", 3),
            Err(DecodeError::FieldCount { expected: 3, actual: 4 })
        );
    }

    #[test]
    fn test_decode_rejects_non_numeric() {
        assert_eq!(decode(b"10.0,abc,30.0", 3), None);
        assert!(matches!(
            decode_detailed(b"10.0,abc,30.0", 3),
            Err(DecodeError::InvalidNumber { index: 1, .. })
        ));
        // A trailing comma leaves an empty field
        assert_eq!(decode(b"10.0,20.0,", 3), None);
    }

    #[test]
    fn test_decode_rejects_empty() {
        assert_eq!(decode(b"", 3), None);
        assert_eq!(decode_detailed(b"  \r\n", 3), Err(DecodeError::Empty));
    }

    #[test]
    fn test_decode_rejects_non_finite() {
        assert_eq!(decode(b"nan,1,2", 3), None);
        assert_eq!(decode_detailed(b"1,inf,2", 3), Err(DecodeError::NonFinite { index: 1 }));
        assert_eq!(decode(b"1,2,-infinity", 3), None);
    }

    #[test]
    fn test_decode_unsupported_count() {
        assert_eq!(decode(b"1", 1), None);
        assert_eq!(decode_detailed(b"1,2,3,4", 4), Err(DecodeError::UnsupportedFieldCount(4)));
    }

    #[test]
    fn test_decode_drops_invalid_bytes() {
        // Leading and trailing line noise from a partial frame
        assert_eq!(
            decode_detailed(b"\xff10.0,20.0,30.0\n", 3),
            Ok(AngleSample::with_yaw(10.0, 20.0, 30.0))
        );
        assert_eq!(
            decode_detailed(b"10.0,20.0,30.0\x80\n", 3),
            Ok(AngleSample::with_yaw(10.0, 20.0, 30.0))
        );
        // Inside a number
        assert_eq!(decode(b"1\xfe2.5,-4", 2), Some(AngleSample::new(12.5, -4.0)));
        // A field made only of invalid bytes is empty once they are dropped
        assert!(matches!(
            decode_detailed(b"1.0,\xff\xfe,3.0", 3),
            Err(DecodeError::InvalidNumber { index: 1, .. })
        ));
        assert_eq!(decode(b"\xff\xfe\r\n", 3), None);
    }

    #[test]
    fn test_decode_tolerates_field_padding() {
        let s = decode(b" 1.5 , -2.5 , 90 \n", 3).unwrap();
        assert_eq!(s, AngleSample::with_yaw(1.5, -2.5, 90.0));
    }

    #[test]
    fn test_decode_is_total() {
        let inputs: [&[u8]; 8] = [
            b"",
            b",",
            b",,",
            b"\xc3\x28,1,2",
            b"1e400,0,0",
            b"--1,0,0",
            b"0x10,1,2",
            b"\n\n\n",
        ];
        for input in inputs {
            for count in 0..5 {
                if let Some(s) = decode(input, count) {
                    assert!(s.values().all(f64::is_finite));
                }
            }
        }
    }

    #[test]
    fn test_line_decoder() {
        let decoder = LineDecoder::new(AxisSet::PitchRoll);
        assert_eq!(decoder.axes().field_count(), 2);
        assert!(decoder.decode(b"1,2").is_some());
        assert!(decoder.decode(b"1,2,3").is_none());
        assert!(decoder.decode_detailed(b"x,2").is_err());
    }
}
