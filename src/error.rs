//! # Error Types
//!
//! Errors come in two tiers.
//!
//! ## Diagnostics (non-fatal)
//! Decoding never fails. Malformed input degrades into zeroed fields and a
//! [`Diagnostic`] that is returned alongside the decoded records:
//! - `FormatError` - a token failed to parse (line number + [`FieldError`])
//! - `OverflowError` - the batch held more records than the buffer capacity
//! - `ProtocolViolation` - an articulation tag arrived with no open note
//!
//! ## Fatal errors
//! [`F0Error`] is only produced outside the decode path: loading a
//! configuration or header, and encoding events the monophonic model cannot
//! express.
//!
//! ## Usage
//! ```rust
//! use f0_notes::{decode_batch, Diagnostic, RecordLayout};
//!
//! let batch = decode_batch("abc,440,64\n", RecordLayout::Plain, 8);
//! for diagnostic in &batch.diagnostics {
//!     match diagnostic {
//!         Diagnostic::FormatError { line, error } => eprintln!("line {}: {}", line, error),
//!         other => eprintln!("{}", other),
//!     }
//! }
//! ```

use crate::record::ArticulationState;
use std::fmt;
use thiserror::Error;

/// Field of an f0 record, used to locate format errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    State,
    Duration,
    Frequency,
    Velocity,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::State => "state",
            Field::Duration => "duration",
            Field::Frequency => "frequency",
            Field::Velocity => "velocity",
        };
        f.write_str(name)
    }
}

/// A single token that could not be decoded.
///
/// The affected field has already been replaced by its safe default
/// (`0` or `NEW`) when one of these is reported.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    /// Token is empty or not a number.
    ///
    /// # Example
    /// ```
    /// # use f0_notes::{Field, FieldError};
    /// let err = FieldError::InvalidNumber { field: Field::Duration, token: "abc".to_string() };
    /// assert_eq!(err.to_string(), "invalid duration token 'abc', using 0");
    /// ```
    #[error("invalid {field} token '{token}', using 0")]
    InvalidNumber { field: Field, token: String },

    /// Frequency parsed but is negative or not finite.
    #[error("frequency '{token}' is out of range, using 0")]
    FrequencyOutOfRange { token: String },

    /// State token is not one of `n`/`k`/`s` or `0`/`1`/`2`.
    #[error("unknown articulation state '{0}', using NEW")]
    UnknownState(String),

    /// Fewer fields than the layout requires; the missing ones decode to 0.
    #[error("expected at least {expected} fields, found {found}")]
    MissingFields { expected: usize, found: usize },
}

/// Non-fatal problem raised while decoding or articulating records.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A token of the record on `line` (1-based) failed to parse.
    ///
    /// # Example
    /// ```
    /// # use f0_notes::{Diagnostic, Field, FieldError};
    /// let err = Diagnostic::FormatError {
    ///     line: 3,
    ///     error: FieldError::InvalidNumber { field: Field::Velocity, token: "x".to_string() },
    /// };
    /// assert_eq!(err.to_string(), "Format error at line 3: invalid velocity token 'x', using 0");
    /// ```
    #[error("Format error at line {line}: {error}")]
    FormatError { line: usize, error: FieldError },

    /// The buffer held more records than fit; `dropped` lines were not decoded.
    #[error("Overflow: capacity of {capacity} records reached, {dropped} record(s) dropped")]
    OverflowError { capacity: usize, dropped: usize },

    /// `state` arrived at record `index` (0-based) while no note was open.
    #[error("Protocol violation at record {index}: {state} with no open note, treated as NEW")]
    ProtocolViolation {
        index: usize,
        state: ArticulationState,
    },
}

/// Fatal errors outside the decode path.
#[derive(Error, Debug)]
pub enum F0Error {
    /// Invalid configuration or f0 header.
    ///
    /// # Example
    /// ```
    /// # use f0_notes::F0Error;
    /// let err = F0Error::ConfigError("capacity must be at least 1".to_string());
    /// assert_eq!(err.to_string(), "Invalid configuration: capacity must be at least 1");
    /// ```
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// A simultaneous event with more than one member reached the encoder.
    #[error("Event {index} has {voices} simultaneous voices, f0 is monophonic")]
    PolyphonyError { index: usize, voices: usize },
}
