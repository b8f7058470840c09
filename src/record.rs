//! # Record Types
//!
//! Typed form of one f0 frame.
//!
//! ## Type Overview
//! ```text
//! RecordLayout        Plain    = duration,frequency,velocity
//!                     Stateful = state,duration,frequency,velocity
//!
//! FrameRecord
//!   ├── state: ArticulationState (NEW | KEEP | STOP, NEW when the layout has no state)
//!   ├── duration: u32  (microseconds)
//!   ├── frequency: f32 (Hz, 0 = silence)
//!   └── velocity: u32  (amplitude, 0 = silence)
//! ```
//!
//! A record is a *tone* when both frequency and velocity are positive and a
//! *rest* otherwise, see [`FrameRecord::is_tone`].
//!
//! ## Debug Rendering
//! [`FrameRecord::render`] returns a `Display` adapter producing the golden
//! text form:
//! - tone: `T(f=440.00; d=0.10; v=64; s=0)`
//! - rest: `R(d=0; s=0)`
//!
//! The `; s=` suffix is omitted for [`RecordLayout::Plain`].

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Field layout of a wire record, chosen once per decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordLayout {
    /// `duration,frequency,velocity`
    #[default]
    Plain,
    /// `state,duration,frequency,velocity`
    Stateful,
}

impl RecordLayout {
    /// Minimum number of fields a record of this layout must carry.
    pub fn field_count(self) -> usize {
        match self {
            RecordLayout::Plain => 3,
            RecordLayout::Stateful => 4,
        }
    }

    pub fn has_state(self) -> bool {
        self == RecordLayout::Stateful
    }

    /// Parse a layout name: `3`/`plain`/`3-field` or `4`/`stateful`/`4-field`.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "3" | "plain" | "3-field" => Some(RecordLayout::Plain),
            "4" | "stateful" | "4-field" => Some(RecordLayout::Stateful),
            _ => None,
        }
    }
}

impl fmt::Display for RecordLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordLayout::Plain => f.write_str("plain"),
            RecordLayout::Stateful => f.write_str("stateful"),
        }
    }
}

/// Articulation tag carried by each record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ArticulationState {
    /// Attack a new note.
    #[default]
    New,
    /// Continue the open note without re-attacking.
    Keep,
    /// Release the open note.
    Stop,
}

impl ArticulationState {
    /// Wire code: `0`, `1` or `2`.
    pub fn code(self) -> u8 {
        match self {
            ArticulationState::New => 0,
            ArticulationState::Keep => 1,
            ArticulationState::Stop => 2,
        }
    }
}

impl FromStr for ArticulationState {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "n" | "0" => Ok(ArticulationState::New),
            "k" | "1" => Ok(ArticulationState::Keep),
            "s" | "2" => Ok(ArticulationState::Stop),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ArticulationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArticulationState::New => f.write_str("NEW"),
            ArticulationState::Keep => f.write_str("KEEP"),
            ArticulationState::Stop => f.write_str("STOP"),
        }
    }
}

/// One decoded f0 frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FrameRecord {
    pub state: ArticulationState,
    /// Duration in microseconds.
    pub duration: u32,
    /// Frequency in Hz, never negative. `0.0` is silence.
    pub frequency: f32,
    pub velocity: u32,
}

impl FrameRecord {
    /// A sounding note with state `NEW`.
    pub fn tone(duration: u32, frequency: f32, velocity: u32) -> Self {
        Self {
            state: ArticulationState::New,
            duration,
            frequency,
            velocity,
        }
    }

    /// A silent frame with state `NEW`.
    pub fn rest(duration: u32) -> Self {
        Self {
            state: ArticulationState::New,
            duration,
            frequency: 0.0,
            velocity: 0,
        }
    }

    pub fn with_state(mut self, state: ArticulationState) -> Self {
        self.state = state;
        self
    }

    /// True for a tone, false for a rest.
    ///
    /// Defined as `frequency > 0 && velocity > 0`. Older firmware tested
    /// `frequency != 0` instead; decoded frequencies are never negative, so
    /// both tests agree on every record this crate produces.
    pub fn is_tone(&self) -> bool {
        self.frequency > 0.0 && self.velocity > 0
    }

    pub fn is_rest(&self) -> bool {
        !self.is_tone()
    }

    /// Debug rendering of this record for the given layout.
    ///
    /// # Example
    /// ```
    /// use f0_notes::{FrameRecord, RecordLayout};
    ///
    /// let tone = FrameRecord::tone(100_000, 440.0, 64);
    /// assert_eq!(tone.render(RecordLayout::Stateful).to_string(), "T(f=440.00; d=100.00; v=64; s=0)");
    /// assert_eq!(FrameRecord::rest(2_500).render(RecordLayout::Plain).to_string(), "R(d=2)");
    /// ```
    pub fn render(&self, layout: RecordLayout) -> Rendering<'_> {
        Rendering {
            record: self,
            layout,
        }
    }
}

/// `Display` adapter returned by [`FrameRecord::render`].
pub struct Rendering<'a> {
    record: &'a FrameRecord,
    layout: RecordLayout,
}

impl fmt::Display for Rendering<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.record;
        if r.is_tone() {
            write!(
                f,
                "T(f={:.2}; d={:.2}; v={}",
                r.frequency,
                r.duration as f64 / 1000.0,
                r.velocity
            )?;
        } else {
            // Rests print whole milliseconds
            write!(f, "R(d={}", r.duration / 1000)?;
        }
        if self.layout.has_state() {
            write!(f, "; s={}", r.state.code())?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_and_rest_classification() {
        assert!(FrameRecord::tone(10, 440.0, 1).is_tone());
        assert!(FrameRecord::tone(10, 0.0, 64).is_rest());
        assert!(FrameRecord::tone(10, 440.0, 0).is_rest());
        assert!(FrameRecord::rest(10).is_rest());
    }

    #[test]
    fn test_state_lookup() {
        assert_eq!("n".parse(), Ok(ArticulationState::New));
        assert_eq!("0".parse(), Ok(ArticulationState::New));
        assert_eq!("k".parse(), Ok(ArticulationState::Keep));
        assert_eq!("1".parse(), Ok(ArticulationState::Keep));
        assert_eq!("s".parse(), Ok(ArticulationState::Stop));
        assert_eq!("2".parse(), Ok(ArticulationState::Stop));
        assert!("3".parse::<ArticulationState>().is_err());
        assert!("N".parse::<ArticulationState>().is_err());
    }

    #[test]
    fn test_layout_names() {
        assert_eq!(RecordLayout::from_name("3"), Some(RecordLayout::Plain));
        assert_eq!(RecordLayout::from_name("Stateful"), Some(RecordLayout::Stateful));
        assert_eq!(RecordLayout::from_name("4-field"), Some(RecordLayout::Stateful));
        assert_eq!(RecordLayout::from_name("5"), None);
        assert_eq!(RecordLayout::Plain.field_count(), 3);
        assert_eq!(RecordLayout::Stateful.field_count(), 4);
    }

    #[test]
    fn test_render_tone() {
        let r = FrameRecord::tone(1500, 220.5, 80).with_state(ArticulationState::Keep);
        assert_eq!(r.render(RecordLayout::Stateful).to_string(), "T(f=220.50; d=1.50; v=80; s=1)");
        assert_eq!(r.render(RecordLayout::Plain).to_string(), "T(f=220.50; d=1.50; v=80)");
    }

    #[test]
    fn test_render_long_tone_keeps_precision() {
        let r = FrameRecord::tone(4_000_000_130, 440.0, 1);
        assert_eq!(r.render(RecordLayout::Plain).to_string(), "T(f=440.00; d=4000000.13; v=1)");
    }

    #[test]
    fn test_yaml_dump() {
        let r = FrameRecord::tone(100, 440.0, 64).with_state(ArticulationState::Keep);
        assert_eq!(
            serde_yaml::to_string(&r).unwrap(),
            "state: KEEP\nduration: 100\nfrequency: 440.0\nvelocity: 64\n"
        );
        assert_eq!(serde_yaml::to_string(&RecordLayout::Stateful).unwrap(), "stateful\n");
    }

    #[test]
    fn test_render_rest_uses_integer_division() {
        let r = FrameRecord::rest(1999).with_state(ArticulationState::Stop);
        assert_eq!(r.render(RecordLayout::Stateful).to_string(), "R(d=1; s=2)");
        // Silent tone with a frequency still renders as a rest
        let silent = FrameRecord::tone(3000, 440.0, 0);
        assert!(silent.render(RecordLayout::Plain).to_string().starts_with("R("));
    }
}
