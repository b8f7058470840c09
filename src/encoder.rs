//! # Frame Encoder
//!
//! Producer side of the f0 wire format: monophonic note and rest events in,
//! one text line per event out.
//!
//! ## Field Conversion
//! - duration: `std::time::Duration` written in microseconds (saturating)
//! - frequency: multiplied by the encoder's frequency factor, rounded to two
//!   decimals, `0` for rests
//! - velocity: MIDI velocity `0..=127` scaled to `0..=255`, `0` for rests
//! - state: wire code `0`/`1`/`2`, only for [`RecordLayout::Stateful`]
//!
//! A simultaneous event must hold at most one voice. An empty one encodes
//! nothing; more than one is a [`F0Error::PolyphonyError`].
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use f0_notes::{Event, FrameEncoder, NoteEvent, RecordLayout};
//!
//! let events = vec![
//!     Event::Single(NoteEvent::note(Duration::from_millis(250), 440.0, 127)),
//!     Event::Single(NoteEvent::rest(Duration::from_millis(100))),
//! ];
//! let text = FrameEncoder::new(RecordLayout::Plain).encode(&events)?;
//! assert_eq!(text, "250000,440.0,255\n100000,0,0");
//! # Ok::<(), f0_notes::F0Error>(())
//! ```

use crate::batch::LINE_DELIMITER;
use crate::error::F0Error;
use crate::fields::FIELD_DELIMITER;
use crate::record::{ArticulationState, FrameRecord, RecordLayout};
use std::time::Duration;

const MIDI_VELOCITY_MAX: u32 = 127;
const WIRE_VELOCITY_MAX: u32 = 255;

/// A note or rest before encoding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteEvent {
    pub duration: Duration,
    /// Pitch in Hz, `None` for a rest.
    pub frequency: Option<f32>,
    /// MIDI velocity, `None` for a rest.
    pub velocity: Option<u8>,
    pub state: ArticulationState,
}

impl NoteEvent {
    pub fn note(duration: Duration, frequency: f32, velocity: u8) -> Self {
        Self {
            duration,
            frequency: Some(frequency),
            velocity: Some(velocity),
            state: ArticulationState::New,
        }
    }

    pub fn rest(duration: Duration) -> Self {
        Self {
            duration,
            frequency: None,
            velocity: None,
            state: ArticulationState::New,
        }
    }

    pub fn with_state(mut self, state: ArticulationState) -> Self {
        self.state = state;
        self
    }
}

/// Input unit of the encoder.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Single(NoteEvent),
    /// Events sounding together. Only zero or one voice is encodable.
    Simultaneous(Vec<NoteEvent>),
}

/// Encoder for one record layout.
#[derive(Debug, Clone, Copy)]
pub struct FrameEncoder {
    layout: RecordLayout,
    frequency_factor: f32,
}

impl FrameEncoder {
    pub fn new(layout: RecordLayout) -> Self {
        Self {
            layout,
            frequency_factor: 1.0,
        }
    }

    /// Multiply every frequency by `factor`, e.g. `2.0` to shift up an octave.
    pub fn with_frequency_factor(mut self, factor: f32) -> Self {
        self.frequency_factor = factor;
        self
    }

    pub fn layout(&self) -> RecordLayout {
        self.layout
    }

    /// Convert an event into the record it encodes to.
    pub fn to_record(&self, event: &NoteEvent) -> FrameRecord {
        let duration = u32::try_from(event.duration.as_micros()).unwrap_or(u32::MAX);
        let frequency = event
            .frequency
            .map(|f| round_hundredths(f * self.frequency_factor))
            .filter(|f| f.is_finite() && *f > 0.0)
            .unwrap_or(0.0);
        let velocity = event.velocity.map(scale_velocity).unwrap_or(0);

        FrameRecord {
            state: event.state,
            duration,
            frequency,
            velocity,
        }
    }

    /// Wire line for one record, without the line delimiter.
    pub fn encode_record(&self, record: &FrameRecord) -> String {
        let mut line = String::new();
        if self.layout.has_state() {
            line.push_str(&record.state.code().to_string());
            line.push(FIELD_DELIMITER);
        }
        line.push_str(&record.duration.to_string());
        line.push(FIELD_DELIMITER);
        line.push_str(&format_frequency(record.frequency));
        line.push(FIELD_DELIMITER);
        line.push_str(&record.velocity.to_string());
        line
    }

    /// Encode a sequence of events, one line each, joined by `\n`.
    pub fn encode(&self, events: &[Event]) -> Result<String, F0Error> {
        let mut text = String::new();
        for (index, event) in events.iter().enumerate() {
            let note = match event {
                Event::Single(note) => note,
                Event::Simultaneous(voices) => match voices.as_slice() {
                    [] => continue,
                    [note] => note,
                    _ => {
                        return Err(F0Error::PolyphonyError {
                            index,
                            voices: voices.len(),
                        })
                    }
                },
            };
            if !text.is_empty() {
                text.push(LINE_DELIMITER);
            }
            text.push_str(&self.encode_record(&self.to_record(note)));
        }
        Ok(text)
    }
}

/// Scale a MIDI velocity (`0..=127`) to the wire range (`0..=255`), truncating.
pub fn scale_velocity(midi: u8) -> u32 {
    let midi = (midi as u32).min(MIDI_VELOCITY_MAX);
    midi * WIRE_VELOCITY_MAX / MIDI_VELOCITY_MAX
}

fn round_hundredths(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

fn format_frequency(frequency: f32) -> String {
    if frequency == 0.0 {
        "0".to_string()
    } else if frequency.fract() == 0.0 {
        format!("{:.1}", frequency)
    } else {
        frequency.to_string()
    }
}
