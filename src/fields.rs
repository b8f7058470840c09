//! Field parser for a single f0 record.
//!
//! Splits one line on `,` and decodes each token into the matching
//! [`FrameRecord`] field. Tokens are borrowed slices of the input, nothing is
//! copied unless a token has to be quoted in a [`FieldError`].
//!
//! Parsing is permissive: a bad token decodes to `0` (or `NEW` for the state)
//! and is reported, the rest of the record still decodes. Fields past the
//! layout's count are ignored.

use crate::error::{Field, FieldError};
use crate::record::{ArticulationState, FrameRecord, RecordLayout};

/// Field delimiter inside a record.
pub const FIELD_DELIMITER: char = ',';

/// A parsed record and the format errors raised while parsing it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedFields {
    pub record: FrameRecord,
    pub errors: Vec<FieldError>,
}

/// Parse the fields of one record.
///
/// # Example
/// ```
/// use f0_notes::{parse_fields, RecordLayout};
///
/// let parsed = parse_fields("k,2000,330.5,90,extra", RecordLayout::Stateful);
/// assert!(parsed.errors.is_empty());
/// assert_eq!(parsed.record.duration, 2000);
/// assert_eq!(parsed.record.velocity, 90);
/// ```
pub fn parse_fields(text: &str, layout: RecordLayout) -> ParsedFields {
    let mut parsed = ParsedFields::default();
    let expected = layout.field_count();

    if text.trim().is_empty() {
        parsed.errors.push(FieldError::MissingFields { expected, found: 0 });
        return parsed;
    }

    let fields: &[Field] = match layout {
        RecordLayout::Plain => &[Field::Duration, Field::Frequency, Field::Velocity],
        RecordLayout::Stateful => &[
            Field::State,
            Field::Duration,
            Field::Frequency,
            Field::Velocity,
        ],
    };

    let mut found = 0;
    for (field, token) in fields.iter().zip(text.split(FIELD_DELIMITER)) {
        found += 1;
        let token = token.trim();
        let record = &mut parsed.record;
        let result = match field {
            Field::State => parse_state(token).map(|s| record.state = s),
            Field::Duration => parse_unsigned(token, *field).map(|v| record.duration = v),
            Field::Frequency => parse_frequency(token).map(|v| record.frequency = v),
            Field::Velocity => parse_unsigned(token, *field).map(|v| record.velocity = v),
        };
        if let Err(e) = result {
            parsed.errors.push(e);
        }
    }

    if found < expected {
        parsed.errors.push(FieldError::MissingFields { expected, found });
    }

    parsed
}

fn parse_state(token: &str) -> Result<ArticulationState, FieldError> {
    token
        .parse()
        .map_err(|_| FieldError::UnknownState(token.to_string()))
}

/// Unsigned integer field. Decimal tokens such as `"64.0"` are truncated.
fn parse_unsigned(token: &str, field: Field) -> Result<u32, FieldError> {
    if let Ok(value) = token.parse::<u32>() {
        return Ok(value);
    }
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 && value <= u32::MAX as f64 => {
            Ok(value as u32)
        }
        _ => Err(FieldError::InvalidNumber {
            field,
            token: token.to_string(),
        }),
    }
}

fn parse_frequency(token: &str) -> Result<f32, FieldError> {
    let value = token
        .parse::<f32>()
        .map_err(|_| FieldError::InvalidNumber {
            field: Field::Frequency,
            token: token.to_string(),
        })?;
    if !value.is_finite() || value < 0.0 {
        return Err(FieldError::FrequencyOutOfRange {
            token: token.to_string(),
        });
    }
    Ok(value)
}
