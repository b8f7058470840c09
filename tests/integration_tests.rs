//! Integration tests for the f0 decoder
//!
//! Tests the full path from f0 text to records, renderings and articulation steps.

use f0_notes::{
    decode, decode_batch, decode_source, render, Action, ArticulationContract, ArticulationState,
    BatchDecoder, ContractState, Diagnostic, Event, F0Error, FieldError, FrameEncoder, NoteEvent,
    RecordLayout,
};
use std::time::Duration;

const PHRASE: &str = include_str!("data/phrase.f0");

#[test]
fn test_decode_single_tone() {
    let decoded = decode("100,440.0,64", RecordLayout::Plain);
    assert!(decoded.is_tone());
    assert_eq!(decoded.record.duration, 100);
    assert_eq!(decoded.record.frequency, 440.0);
    assert_eq!(decoded.record.velocity, 64);
}

#[test]
fn test_decode_single_rest() {
    let decoded = decode("50,0,0", RecordLayout::Plain);
    assert!(!decoded.is_tone());
    assert!(decoded.is_clean());
}

#[test]
fn test_garbled_duration_is_reported_not_fatal() {
    let decoded = decode("abc,440,64", RecordLayout::Plain);
    assert_eq!(decoded.record.duration, 0);
    assert!(decoded.is_tone());
    assert!(matches!(
        decoded.diagnostics.as_slice(),
        [Diagnostic::FormatError {
            line: 1,
            error: FieldError::InvalidNumber { .. }
        }]
    ));
}

#[test]
fn test_batch_ignores_final_newline() {
    let batch = decode_batch("10,440,50\n20,0,0\n30,220,80\n", RecordLayout::Plain, 10);
    assert_eq!(batch.count, 3);
    assert_eq!(batch.records.len(), 3);
    assert!(!batch.overflowed);
}

#[test]
fn test_batch_overflow() {
    let buffer = "1,440,10\n2,440,10\n3,440,10\n4,440,10\n5,440,10\n";
    let batch = decode_batch(buffer, RecordLayout::Plain, 3);
    assert_eq!(batch.count, 3);
    assert_eq!(batch.records.len(), 3);
    assert!(batch.overflowed);
    assert!(batch
        .diagnostics
        .iter()
        .any(|d| matches!(d, Diagnostic::OverflowError { capacity: 3, dropped: 2 })));
}

#[test]
fn test_decoder_reuse_across_chunks() {
    let mut decoder = BatchDecoder::new(RecordLayout::Stateful, 4);
    let mut contract = ArticulationContract::new();

    for chunk in ["0,10,440,64\n1,10,440,64\n", "1,10,440,64\n2,10,440,64\n"] {
        let batch = decoder.decode(chunk);
        assert_eq!(batch.count(), 2);
        let report = contract.run(batch.iter());
        assert_eq!(report.violations().count(), 0);
    }
    assert_eq!(contract.state(), ContractState::Idle);
    assert_eq!(contract.position(), 4);
}

#[test]
fn test_new_keep_stop_contract() {
    let batch = decode_batch("n,10,440,64\nk,10,440,64\ns,10,440,64\n", RecordLayout::Stateful, 8);
    let mut contract = ArticulationContract::new();
    let report = contract.run(&batch.records);
    let visited: Vec<ContractState> = report.steps.iter().map(|s| s.to).collect();
    assert_eq!(
        visited,
        vec![ContractState::Open, ContractState::Open, ContractState::Idle]
    );
    assert_eq!(report.final_state, ContractState::Idle);
}

#[test]
fn test_keep_first_is_protocol_violation() {
    let batch = decode_batch("1,10,440,64\n", RecordLayout::Stateful, 8);
    let mut contract = ArticulationContract::new();
    let report = contract.run(&batch.records);
    assert_eq!(report.final_state, ContractState::Open);
    assert_eq!(report.steps[0].action, Action::Attack);
    let violations: Vec<&Diagnostic> = report.violations().collect();
    assert_eq!(
        violations,
        vec![&Diagnostic::ProtocolViolation {
            index: 0,
            state: ArticulationState::Keep
        }]
    );
}

#[test]
fn test_rests_render_as_rests() {
    let batch = decode_batch("10,0,64\n10,440,0\n10,0,0\n10,440,64\n", RecordLayout::Plain, 8);
    for record in &batch.records {
        let rendered = record.render(RecordLayout::Plain).to_string();
        assert_eq!(record.is_tone(), record.frequency > 0.0 && record.velocity > 0);
        if !record.is_tone() {
            assert!(rendered.starts_with("R("), "{}", rendered);
        } else {
            assert!(rendered.starts_with("T("), "{}", rendered);
        }
    }
}

#[test]
fn test_decode_source_with_header() {
    let (config, batch) = decode_source(PHRASE).unwrap();
    assert_eq!(config.layout, RecordLayout::Stateful);
    assert_eq!(config.capacity, 16);
    assert_eq!(batch.count, 6);
    assert!(batch.diagnostics.is_empty());

    let text = render(&batch.records, config.layout);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "T(f=440.00; d=250.00; v=200; s=0)");
    assert_eq!(lines[2], "T(f=440.00; d=125.00; v=120; s=2)");
    assert_eq!(lines[3], "R(d=125; s=0)");
    assert_eq!(lines[4], "T(f=329.63; d=500.00; v=160; s=0)");

    let mut contract = ArticulationContract::new();
    let actions: Vec<Action> = contract
        .run(&batch.records)
        .steps
        .iter()
        .map(|s| s.action)
        .collect();
    assert_eq!(
        actions,
        vec![
            Action::Attack,
            Action::Sustain,
            Action::Release,
            Action::Attack,
            Action::Retrigger,
            Action::Release
        ]
    );
}

#[test]
fn test_decode_source_rejects_bad_header() {
    let result = decode_source("---\ncapacity: -1\n---\n1,2,3\n");
    assert!(matches!(result, Err(F0Error::ConfigError(_))));
}

#[test]
fn test_encode_then_decode_plain() {
    let events = vec![
        Event::Single(NoteEvent::note(Duration::from_millis(200), 493.88, 100)),
        Event::Simultaneous(vec![NoteEvent::rest(Duration::from_millis(50))]),
        Event::Single(NoteEvent::note(Duration::from_millis(200), 523.25, 127)),
    ];
    let text = FrameEncoder::new(RecordLayout::Plain).encode(&events).unwrap();
    let batch = decode_batch(&text, RecordLayout::Plain, 8);
    assert_eq!(batch.count, 3);
    assert!(batch.diagnostics.is_empty());
    assert_eq!(batch.records[0].duration, 200_000);
    assert_eq!(batch.records[0].velocity, 200);
    assert!(batch.records[1].is_rest());
    assert_eq!(batch.records[2].velocity, 255);
}

#[test]
fn test_encoder_rejects_chords() {
    let a = NoteEvent::note(Duration::from_millis(100), 440.0, 64);
    let c = NoteEvent::note(Duration::from_millis(100), 523.25, 64);
    let result = FrameEncoder::new(RecordLayout::Plain).encode(&[Event::Simultaneous(vec![a, c])]);
    assert!(matches!(result, Err(F0Error::PolyphonyError { index: 0, voices: 2 })));
}

#[test]
fn test_decode_source_rejects_oversized_capacity() {
    let result = decode_source("---\ncapacity: 9223372036854775807\n---\n1,440,1\n");
    assert!(matches!(result, Err(F0Error::ConfigError(_))));
}
