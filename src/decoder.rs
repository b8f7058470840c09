//! Frame decoder: one text line to one [`FrameRecord`].
//!
//! Decoding is total. Whatever the input, a record comes back; problems are
//! reported as [`Diagnostic::FormatError`]s next to it and logged at `warn`.

use crate::error::Diagnostic;
use crate::fields::parse_fields;
use crate::record::{FrameRecord, RecordLayout};
use log::warn;

/// Result of decoding a single line.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub record: FrameRecord,
    pub diagnostics: Vec<Diagnostic>,
}

impl Decoded {
    pub fn is_tone(&self) -> bool {
        self.record.is_tone()
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Decode one record. Format errors are reported against line 1.
///
/// # Example
/// ```
/// use f0_notes::{decode, RecordLayout};
///
/// let decoded = decode("100,440.0,64", RecordLayout::Plain);
/// assert!(decoded.is_tone());
/// assert_eq!(decoded.record.duration, 100);
/// ```
pub fn decode(line: &str, layout: RecordLayout) -> Decoded {
    decode_line(line, 1, layout)
}

/// Decode one record located at `line_number` (1-based) of a larger buffer.
pub fn decode_line(line: &str, line_number: usize, layout: RecordLayout) -> Decoded {
    let parsed = parse_fields(line, layout);
    let diagnostics = parsed
        .errors
        .into_iter()
        .map(|error| {
            let diagnostic = Diagnostic::FormatError {
                line: line_number,
                error,
            };
            warn!("{}", diagnostic);
            diagnostic
        })
        .collect();

    Decoded {
        record: parsed.record,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Field, FieldError};
    use crate::record::ArticulationState;

    #[test]
    fn test_decode_tone() {
        let decoded = decode("100,440.0,64", RecordLayout::Plain);
        assert!(decoded.is_clean());
        assert!(decoded.is_tone());
        assert_eq!(decoded.record.duration, 100);
        assert_eq!(decoded.record.frequency, 440.0);
        assert_eq!(decoded.record.velocity, 64);
        assert_eq!(decoded.record.state, ArticulationState::New);
    }

    #[test]
    fn test_decode_rest() {
        let decoded = decode("50,0,0", RecordLayout::Plain);
        assert!(decoded.is_clean());
        assert!(!decoded.is_tone());
    }

    #[test]
    fn test_decode_garbled_duration() {
        let decoded = decode("abc,440,64", RecordLayout::Plain);
        assert_eq!(decoded.record.duration, 0);
        assert_eq!(
            decoded.diagnostics,
            vec![Diagnostic::FormatError {
                line: 1,
                error: FieldError::InvalidNumber {
                    field: Field::Duration,
                    token: "abc".to_string()
                }
            }]
        );
    }

    #[test]
    fn test_decode_line_number() {
        let decoded = decode_line("1,2", 7, RecordLayout::Plain);
        assert!(matches!(
            decoded.diagnostics[0],
            Diagnostic::FormatError { line: 7, .. }
        ));
    }

    #[test]
    fn test_decode_garbage_never_panics() {
        for line in ["", ",,,,", "\u{1F3B5}", "1,2,3,4,5", "s", "-,-,-,-", "9999999999999,1e40,1e40"] {
            let _ = decode(line, RecordLayout::Plain);
            let _ = decode(line, RecordLayout::Stateful);
        }
    }
}
