//! # Articulation Contract
//!
//! State machine giving the NEW/KEEP/STOP tag its meaning. The decoder only
//! carries the tag; a playback scheduler feeds each record's tag through an
//! [`ArticulationContract`] and performs the returned [`Action`].
//!
//! ## Transitions
//! ```text
//! IDLE --NEW-->  OPEN   Attack
//! OPEN --KEEP--> OPEN   Sustain (tie, no re-attack)
//! OPEN --STOP--> IDLE   Release
//! OPEN --NEW-->  OPEN   Retrigger (release the open note, attack a new one)
//! IDLE --KEEP--> OPEN   Attack    + ProtocolViolation
//! IDLE --STOP--> IDLE   OneShot   + ProtocolViolation
//! ```
//!
//! A tag arriving with no open note is handled as NEW. For STOP that means the
//! record is attacked and released within itself, leaving the machine IDLE.
//! Violations are reported, never fatal.
//!
//! Consecutive records are not merged into one note here; merging ties is
//! left to the scheduler.
//!
//! ## Example
//! ```rust
//! use f0_notes::{Action, ArticulationContract, ArticulationState, ContractState};
//!
//! let mut contract = ArticulationContract::new();
//! assert_eq!(contract.apply(ArticulationState::New).action, Action::Attack);
//! assert_eq!(contract.apply(ArticulationState::Keep).action, Action::Sustain);
//! assert_eq!(contract.apply(ArticulationState::Stop).action, Action::Release);
//! assert_eq!(contract.state(), ContractState::Idle);
//! ```

use crate::error::Diagnostic;
use crate::record::{ArticulationState, FrameRecord};
use log::{trace, warn};
use std::fmt;

/// Whether a note is currently sounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContractState {
    #[default]
    Idle,
    Open,
}

impl fmt::Display for ContractState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractState::Idle => f.write_str("IDLE"),
            ContractState::Open => f.write_str("OPEN"),
        }
    }
}

/// What the scheduler must do for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Start a new note.
    Attack,
    /// Keep the open note sounding.
    Sustain,
    /// End the open note with this record.
    Release,
    /// Release the open note at this record's onset, then attack a new one.
    Retrigger,
    /// Attack and release within this record.
    OneShot,
}

/// Outcome of feeding one tag to the contract.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// 0-based position of the record in the session.
    pub index: usize,
    pub from: ContractState,
    pub to: ContractState,
    pub action: Action,
    pub violation: Option<Diagnostic>,
}

/// Summary of [`ArticulationContract::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct ContractReport {
    pub steps: Vec<Step>,
    pub final_state: ContractState,
}

impl ContractReport {
    /// All protocol violations, in record order.
    pub fn violations(&self) -> impl Iterator<Item = &Diagnostic> {
        self.steps.iter().filter_map(|s| s.violation.as_ref())
    }
}

/// Articulation state machine for one playback session.
#[derive(Debug, Clone, Default)]
pub struct ArticulationContract {
    state: ContractState,
    index: usize,
}

impl ArticulationContract {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ContractState {
        self.state
    }

    /// Number of tags applied since creation or the last reset.
    pub fn position(&self) -> usize {
        self.index
    }

    /// Back to IDLE, as at the start of a session.
    pub fn reset(&mut self) {
        self.state = ContractState::Idle;
        self.index = 0;
    }

    /// Apply one articulation tag.
    pub fn apply(&mut self, tag: ArticulationState) -> Step {
        use ArticulationState::*;
        use ContractState::*;

        let index = self.index;
        let from = self.state;
        let (to, action, violated) = match (from, tag) {
            (Idle, New) => (Open, Action::Attack, false),
            (Open, Keep) => (Open, Action::Sustain, false),
            (Open, Stop) => (Idle, Action::Release, false),
            (Open, New) => (Open, Action::Retrigger, false),
            (Idle, Keep) => (Open, Action::Attack, true),
            (Idle, Stop) => (Idle, Action::OneShot, true),
        };

        let violation = violated.then(|| {
            let diagnostic = Diagnostic::ProtocolViolation { index, state: tag };
            warn!("{}", diagnostic);
            diagnostic
        });

        trace!("record {}: {} --{}--> {} ({:?})", index, from, tag, to, action);

        self.state = to;
        self.index += 1;

        Step {
            index,
            from,
            to,
            action,
            violation,
        }
    }

    pub fn apply_record(&mut self, record: &FrameRecord) -> Step {
        self.apply(record.state)
    }

    /// Apply every record in order and collect the steps.
    pub fn run<'a, I>(&mut self, records: I) -> ContractReport
    where
        I: IntoIterator<Item = &'a FrameRecord>,
    {
        let steps = records
            .into_iter()
            .map(|record| self.apply_record(record))
            .collect();
        ContractReport {
            steps,
            final_state: self.state,
        }
    }
}
