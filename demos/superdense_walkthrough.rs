//! Walks both tracks one stage at a time and prints what each stage shows

use densecode::{
    analytics::default_sweep_grid, noise_sweep, DenseError, EfficiencyMetrics, Message, ProtocolConfig,
    ProtocolStepMachine, Snapshot, StageSequence, StepTrack, Track, TransmissionReport,
};
use std::env;

fn print_snapshot(snapshot: &Snapshot) {
    match snapshot {
        Snapshot::Quantum(q) => {
            println!("  [{}] {}", q.stage.index(), q.stage.description());
            println!("    state: {}", q.state);
            if !q.circuit.is_empty() {
                println!("{}", q.circuit);
            }
            if let Some(counts) = &q.measurement {
                println!("    counts: {}", counts);
            }
            if let Some(decoded) = q.decoded {
                println!("    Bob reads: {}", decoded);
            }
        }
        Snapshot::Classical(c) => {
            println!("  [{}] {}", c.stage.index(), c.stage.description());
            println!("    buffer: {}", c.buffer);
            if !c.flipped_positions.is_empty() {
                println!("    flipped at: {:?}", c.flipped_positions);
            }
            if let Some(flags) = &c.parity_flags {
                println!("    parity flags: {:?}", flags);
            }
            if let Some(decoded) = c.decoded {
                println!("    output: {}", decoded);
            }
        }
    }
}

fn walk(machine: &mut ProtocolStepMachine, track: Track) -> Result<(), DenseError> {
    println!("--- {} track ---", track);
    print_snapshot(&machine.snapshot(track)?);
    while !machine.is_complete(track) {
        machine.advance(track)?;
        print_snapshot(&machine.snapshot(track)?);
    }
    Ok(())
}

fn main() -> Result<(), DenseError> {
    env_logger::init();

    // Usage: superdense_walkthrough [message] [flip probability]
    let mut args = env::args().skip(1);
    let message: Message = args.next().as_deref().unwrap_or("11").parse()?;
    let p: f64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(0.1);

    let config = ProtocolConfig::default().with_flip_probability(p);
    let mut machine = ProtocolStepMachine::new(message, config)?;
    println!("Sending {} (k={}, p={})", message, config.repetition_factor, p);

    walk(&mut machine, Track::Quantum)?;
    walk(&mut machine, Track::Classical)?;

    // Rewind the quantum side to show the entangled pair again.
    machine.quantum_mut().seek(densecode::QuantumStage::Entangled)?;
    println!("Rewound quantum track to '{}'", machine.quantum().stage());

    let metrics = EfficiencyMetrics::for_config(&config)?;
    println!(
        "Efficiency: classical {:.2} bit/bit ({} bits sent), quantum {:.2} bit/qubit",
        metrics.classical_efficiency, metrics.classical_bits_sent, metrics.quantum_efficiency
    );

    let sweep = noise_sweep(message, &default_sweep_grid(), 800, &config)?;
    println!("{:>6} {:>10} {:>10}", "p", "classical", "quantum");
    for point in &sweep {
        println!("{:>6.3} {:>10.3} {:>10.3}", point.flip_probability, point.classical_success, point.quantum_success);
    }

    let report = TransmissionReport::from_run(message, config)?.with_sweep(sweep);
    println!("{}", report.to_json_pretty()?);
    Ok(())
}
