// tests/protocol_tests.rs

use densecode::{
    BasisState, ClassicalBuffer, ClassicalStage, DenseError, Message, ProtocolConfig, ProtocolStepMachine,
    QuantumStage, Snapshot, StageSequence, StepTrack, Track,
};

const TOLERANCE: f64 = 1e-9;

fn quantum(machine: &ProtocolStepMachine) -> Result<densecode::QuantumSnapshot, DenseError> {
    match machine.snapshot(Track::Quantum)? {
        Snapshot::Quantum(snapshot) => Ok(snapshot),
        other => panic!("expected a quantum snapshot, got {:?}", other),
    }
}

fn classical(machine: &ProtocolStepMachine) -> Result<densecode::ClassicalSnapshot, DenseError> {
    match machine.snapshot(Track::Classical)? {
        Snapshot::Classical(snapshot) => Ok(snapshot),
        other => panic!("expected a classical snapshot, got {:?}", other),
    }
}

#[test]
fn test_quantum_track_for_eleven() -> Result<(), DenseError> {
    let mut machine = ProtocolStepMachine::new(Message::Three, ProtocolConfig::default())?;
    let mut stages = vec![quantum(&machine)?.stage];
    let mut norms = Vec::new();
    while !machine.is_complete(Track::Quantum) {
        machine.advance(Track::Quantum)?;
        let snapshot = quantum(&machine)?;
        norms.push(snapshot.state.norm_sqr());
        stages.push(snapshot.stage);
    }
    assert_eq!(stages, QuantumStage::ALL);
    for norm in norms {
        assert!((norm - 1.0).abs() < TOLERANCE);
    }

    let done = quantum(&machine)?;
    let measurement = done.measurement.clone().ok_or_else(|| DenseError::InvalidArgument {
        message: "measured stage carries counts".to_string(),
    })?;
    assert_eq!(measurement.count("11".parse()?), 1000);
    assert_eq!(done.decoded, Some(Message::Three));
    assert!((done.probabilities[&"11".parse::<BasisState>()?] - 1.0).abs() < TOLERANCE);
    // Bell prep, X, Z, CNOT, H
    assert_eq!(done.circuit.len(), 5);
    Ok(())
}

#[test]
fn test_encoded_stage_shows_psi_minus_for_eleven() -> Result<(), DenseError> {
    let mut machine = ProtocolStepMachine::new(Message::Three, ProtocolConfig::default())?;
    machine.quantum_mut().seek(QuantumStage::Encoded)?;
    let snapshot = quantum(&machine)?;
    assert!((snapshot.probabilities[&"01".parse::<BasisState>()?] - 0.5).abs() < TOLERANCE);
    assert!((snapshot.probabilities[&"10".parse::<BasisState>()?] - 0.5).abs() < TOLERANCE);
    assert!(snapshot.measurement.is_none());

    // Transmission applies no gate.
    machine.advance(Track::Quantum)?;
    assert_eq!(quantum(&machine)?.state, snapshot.state);
    Ok(())
}

#[test]
fn test_terminal_advance_policy() -> Result<(), DenseError> {
    let mut machine = ProtocolStepMachine::new(Message::One, ProtocolConfig::default())?;
    machine.quantum_mut().seek(QuantumStage::Measured)?;
    let before = quantum(&machine)?;
    assert_eq!(machine.advance(Track::Quantum)?, QuantumStage::Measured.index());
    assert_eq!(quantum(&machine)?, before);
    match machine.try_advance(Track::Quantum) {
        Err(DenseError::AlreadyComplete { track, .. }) => assert_eq!(track, "quantum"),
        other => panic!("expected AlreadyComplete, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_reset_returns_to_init() -> Result<(), DenseError> {
    let mut machine = ProtocolStepMachine::new(Message::Two, ProtocolConfig::default())?;
    machine.advance(Track::Quantum)?;
    machine.advance(Track::Quantum)?;
    machine.reset(Track::Quantum);
    let snapshot = quantum(&machine)?;
    assert_eq!(snapshot.stage, QuantumStage::Init);
    assert!((snapshot.probabilities[&"00".parse::<BasisState>()?] - 1.0).abs() < TOLERANCE);
    assert!(snapshot.circuit.is_empty());
    // The other track is untouched.
    assert_eq!(machine.stage_index(Track::Classical), 0);
    Ok(())
}

#[test]
fn test_classical_track_noiseless() -> Result<(), DenseError> {
    let mut machine = ProtocolStepMachine::new(Message::One, ProtocolConfig::default())?;
    assert_eq!(classical(&machine)?.buffer.to_string(), "01");

    machine.advance(Track::Classical)?;
    assert_eq!(classical(&machine)?.buffer.to_string(), "000111");

    machine.classical_mut().seek(ClassicalStage::Decoded)?;
    let snapshot = classical(&machine)?;
    assert_eq!(snapshot.buffer.to_string(), "000111");
    assert!(snapshot.flipped_positions.is_empty());
    assert_eq!(snapshot.parity_flags, Some(vec![false, false]));
    assert_eq!(snapshot.decoded, Some(Message::One));
    assert_eq!(machine.stage_count(Track::Classical), 5);
    Ok(())
}

#[test]
fn test_classical_track_for_eleven() -> Result<(), DenseError> {
    let mut machine = ProtocolStepMachine::new(Message::Three, ProtocolConfig::default())?;
    while !machine.is_complete(Track::Classical) {
        machine.advance(Track::Classical)?;
    }
    let snapshot = classical(&machine)?;
    assert_eq!(snapshot.sent.as_ref().map(|b| b.to_string()).as_deref(), Some("111111"));
    assert_eq!(snapshot.buffer.to_string(), "111111");
    assert_eq!(snapshot.parity_flags, Some(vec![false, false]));
    assert_eq!(snapshot.decoded, Some(Message::Three));
    Ok(())
}

#[test]
fn test_classical_snapshots_are_stable_under_noise() -> Result<(), DenseError> {
    let config = ProtocolConfig::default().with_flip_probability(0.4).with_repetition_factor(5).with_seed(123);
    let mut machine = ProtocolStepMachine::new(Message::Two, config)?;
    machine.classical_mut().seek(ClassicalStage::Transmitted)?;
    let transmitted = classical(&machine)?;

    machine.advance(Track::Classical)?;
    let checked = classical(&machine)?;
    assert_eq!(checked.buffer, transmitted.buffer);
    assert_eq!(checked.flipped_positions, transmitted.flipped_positions);

    let sent = transmitted.sent.clone().unwrap_or_default();
    assert_eq!(sent.flipped_positions(&transmitted.buffer), transmitted.flipped_positions);

    let flags = checked.parity_flags.unwrap_or_default();
    assert_eq!(flags.len(), 2);
    for (group, flag) in flags.iter().enumerate() {
        let bits = &transmitted.buffer.bits()[group * 5..(group + 1) * 5];
        let mixed = bits.iter().any(|b| *b) && !bits.iter().all(|b| *b);
        assert_eq!(*flag, mixed, "group {}", group);
    }
    Ok(())
}

#[test]
fn test_certain_flip_channel_inverts_message() -> Result<(), DenseError> {
    let config = ProtocolConfig::default().with_flip_probability(1.0);
    let mut machine = ProtocolStepMachine::new(Message::One, config)?;
    machine.classical_mut().seek(ClassicalStage::Decoded)?;
    let snapshot = classical(&machine)?;
    assert_eq!(snapshot.buffer, ClassicalBuffer::new(vec![true, true, true, false, false, false]));
    assert_eq!(snapshot.flipped_positions, vec![0, 1, 2, 3, 4, 5]);
    // Every bit of a group flipped together, so nothing looks wrong.
    assert_eq!(snapshot.parity_flags, Some(vec![false, false]));
    assert_eq!(snapshot.decoded, Some(Message::Two));
    Ok(())
}

#[test]
fn test_changing_message_restarts_both_tracks() -> Result<(), DenseError> {
    let mut machine = ProtocolStepMachine::new(Message::Zero, ProtocolConfig::default())?;
    machine.quantum_mut().seek(QuantumStage::Decoded)?;
    machine.classical_mut().seek(ClassicalStage::ErrorChecked)?;
    machine.set_message(Message::Two)?;
    assert_eq!(machine.message(), Message::Two);
    assert_eq!(machine.stage_index(Track::Quantum), 0);
    assert_eq!(machine.stage_index(Track::Classical), 0);
    assert_eq!(classical(&machine)?.buffer.to_string(), "10");
    Ok(())
}

#[test]
fn test_machine_survives_json() -> Result<(), DenseError> {
    let mut machine = ProtocolStepMachine::new(Message::Three, ProtocolConfig::default().with_shots(10))?;
    machine.quantum_mut().seek(QuantumStage::Encoded)?;
    machine.advance(Track::Classical)?;
    let json = serde_json::to_string(&machine)?;
    let restored: ProtocolStepMachine = serde_json::from_str(&json)?;
    assert_eq!(ProtocolStepMachine::from_json(&json)?.message(), Message::Three);
    assert_eq!(restored.stage_index(Track::Quantum), QuantumStage::Encoded.index());
    assert_eq!(restored.stage_index(Track::Classical), 1);
    assert_eq!(classical(&restored)?, classical(&machine)?);

    let snapshot_json = serde_json::to_string(&machine.snapshot(Track::Classical)?)?;
    assert!(snapshot_json.contains("\"track\":\"classical\""));
    Ok(())
}

#[test]
fn test_edited_machine_json_is_rejected() -> Result<(), DenseError> {
    let machine = ProtocolStepMachine::new(Message::Three, ProtocolConfig::default().with_shots(10))?;
    let json = serde_json::to_string(&machine)?;

    let zero_shots = json.replace("\"shots\":10,", "\"shots\":0,");
    assert_ne!(zero_shots, json);
    assert!(serde_json::from_str::<ProtocolStepMachine>(&zero_shots).is_err());
    assert!(matches!(ProtocolStepMachine::from_json(&zero_shots), Err(DenseError::InvalidArgument { .. })));

    let even_factor = json.replace("\"repetition_factor\":3", "\"repetition_factor\":2");
    assert_ne!(even_factor, json);
    assert!(serde_json::from_str::<ProtocolStepMachine>(&even_factor).is_err());
    assert!(ProtocolStepMachine::from_json(&even_factor).is_err());

    let other_message = json.replacen("{\"message\":\"11\"", "{\"message\":\"01\"", 1);
    assert_ne!(other_message, json);
    assert!(serde_json::from_str::<ProtocolStepMachine>(&other_message).is_err());
    assert!(matches!(
        ProtocolStepMachine::from_json(&other_message),
        Err(DenseError::InvalidArgument { .. })
    ));
    Ok(())
}

#[test]
fn test_two_machines_are_independent() -> Result<(), DenseError> {
    let mut a = ProtocolStepMachine::new(Message::One, ProtocolConfig::default())?;
    let b = ProtocolStepMachine::new(Message::One, ProtocolConfig::default())?;
    a.advance(Track::Quantum)?;
    assert_eq!(a.stage_index(Track::Quantum), 1);
    assert_eq!(b.stage_index(Track::Quantum), 0);
    Ok(())
}

#[test]
fn test_stage_titles_are_distinct() {
    let titles: Vec<&str> = QuantumStage::ALL.iter().map(|s| s.title()).collect();
    let mut deduped = titles.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), titles.len());
    assert!(ClassicalStage::ALL.iter().all(|s| !s.description().is_empty()));
}
