//! # Batch Decoder
//!
//! Splits a newline-delimited buffer into records and decodes them into a
//! fixed-capacity buffer.
//!
//! ## Capacity
//! The record buffer is allocated once with exactly `capacity` slots and is
//! reused by every call. Once it is full the remaining lines are counted but
//! not decoded; the batch is flagged `overflowed` and an
//! [`Diagnostic::OverflowError`] is raised. Records decoded before the
//! overflow stay valid.
//!
//! ## Line Handling
//! - Lines are split on `\n`; a `\r` before it is trimmed with the fields.
//! - Blank lines are skipped, including the empty segment after a final
//!   newline, so `"a\nb\n"` yields two records, not three.
//! - Diagnostics carry the 1-based line number within the buffer.
//!
//! ## Ownership
//! [`BatchDecoder::decode`] returns a [`Batch`] view borrowing the decoder.
//! The next decode cannot start until the caller is done with that view, so
//! a scheduler can never read records that are being overwritten.
//!
//! ```rust
//! use f0_notes::{BatchDecoder, RecordLayout};
//!
//! let mut decoder = BatchDecoder::new(RecordLayout::Plain, 2);
//! let batch = decoder.decode("10,440,50\n20,0,0\n30,220,80\n");
//! assert_eq!(batch.count(), 2);
//! assert!(batch.overflowed);
//! ```

use crate::config::{DecoderConfig, MAX_CAPACITY};
use crate::decoder::decode_line;
use crate::error::Diagnostic;
use crate::record::{FrameRecord, RecordLayout};
use log::{debug, warn};

/// Record delimiter inside a batch buffer.
pub const LINE_DELIMITER: char = '\n';

/// Reusable decoder owning a fixed-capacity record buffer.
#[derive(Debug)]
pub struct BatchDecoder {
    layout: RecordLayout,
    capacity: usize,
    records: Vec<FrameRecord>,
    diagnostics: Vec<Diagnostic>,
    overflowed: bool,
}

/// Borrowed view of the last decoded batch.
#[derive(Debug, Clone, Copy)]
pub struct Batch<'a> {
    pub records: &'a [FrameRecord],
    pub overflowed: bool,
    pub diagnostics: &'a [Diagnostic],
}

impl Batch<'_> {
    /// Number of records decoded.
    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FrameRecord> {
        self.records.iter()
    }

    /// Copy the batch out of the decoder buffer.
    pub fn to_result(&self) -> BatchResult {
        BatchResult {
            records: self.records.to_vec(),
            count: self.records.len(),
            overflowed: self.overflowed,
            diagnostics: self.diagnostics.to_vec(),
        }
    }
}

/// Owned result of [`decode_batch`].
#[derive(Debug, Clone, PartialEq)]
pub struct BatchResult {
    pub records: Vec<FrameRecord>,
    pub count: usize,
    pub overflowed: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl BatchDecoder {
    /// Capacities above [`MAX_CAPACITY`] are clamped to it.
    pub fn new(layout: RecordLayout, capacity: usize) -> Self {
        if capacity > MAX_CAPACITY {
            warn!("capacity {} clamped to {}", capacity, MAX_CAPACITY);
        }
        let capacity = capacity.min(MAX_CAPACITY);
        Self {
            layout,
            capacity,
            records: Vec::with_capacity(capacity),
            diagnostics: Vec::new(),
            overflowed: false,
        }
    }

    pub fn from_config(config: &DecoderConfig) -> Self {
        Self::new(config.layout, config.capacity)
    }

    pub fn layout(&self) -> RecordLayout {
        self.layout
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Decode `buffer`, replacing the previous batch.
    pub fn decode(&mut self, buffer: &str) -> Batch<'_> {
        self.records.clear();
        self.diagnostics.clear();
        self.overflowed = false;

        let mut dropped = 0;
        for (index, line) in buffer.split(LINE_DELIMITER).enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            if self.records.len() == self.capacity {
                dropped += 1;
                continue;
            }
            let decoded = decode_line(line, index + 1, self.layout);
            self.records.push(decoded.record);
            self.diagnostics.extend(decoded.diagnostics);
        }

        if dropped > 0 {
            let diagnostic = Diagnostic::OverflowError {
                capacity: self.capacity,
                dropped,
            };
            warn!("{}", diagnostic);
            self.diagnostics.push(diagnostic);
            self.overflowed = true;
        }

        debug!(
            "decoded {} {} record(s), {} diagnostic(s)",
            self.records.len(),
            self.layout,
            self.diagnostics.len()
        );

        self.batch()
    }

    /// View of the last decoded batch.
    pub fn batch(&self) -> Batch<'_> {
        Batch {
            records: &self.records,
            overflowed: self.overflowed,
            diagnostics: &self.diagnostics,
        }
    }
}

/// Decode a buffer in one shot with a fresh decoder of `capacity` slots.
///
/// # Example
/// ```
/// use f0_notes::{decode_batch, RecordLayout};
///
/// let batch = decode_batch("10,440,50\n20,0,0\n30,220,80\n", RecordLayout::Plain, 10);
/// assert_eq!(batch.count, 3);
/// assert!(!batch.overflowed);
/// ```
pub fn decode_batch(buffer: &str, layout: RecordLayout, capacity: usize) -> BatchResult {
    let mut decoder = BatchDecoder::new(layout, capacity);
    let batch = decoder.decode(buffer);
    batch.to_result()
}
