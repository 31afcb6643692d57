// tests/codec_properties.rs

use densecode::classical::{decode, encode, transmit};
use densecode::{ClassicalBuffer, GateApplication, GateKind, Message, QuantumStateEngine, Qubit};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn message() -> impl Strategy<Value = Message> {
    (0usize..4).prop_map(|i| Message::ALL[i])
}

fn odd_factor() -> impl Strategy<Value = usize> {
    (0usize..8).prop_map(|n| 2 * n + 1)
}

fn gate() -> impl Strategy<Value = GateApplication> {
    prop_oneof![
        Just(GateApplication::single(GateKind::I, Qubit::Alice)),
        Just(GateApplication::single(GateKind::X, Qubit::Alice)),
        Just(GateApplication::single(GateKind::X, Qubit::Bob)),
        Just(GateApplication::single(GateKind::Z, Qubit::Alice)),
        Just(GateApplication::single(GateKind::Z, Qubit::Bob)),
        Just(GateApplication::single(GateKind::H, Qubit::Alice)),
        Just(GateApplication::single(GateKind::H, Qubit::Bob)),
        Just(GateApplication::controlled(GateKind::Cnot, Qubit::Alice, Qubit::Bob)),
        Just(GateApplication::controlled(GateKind::Cnot, Qubit::Bob, Qubit::Alice)),
    ]
}

proptest! {
    #[test]
    fn noiseless_channel_round_trips(m in message(), k in odd_factor(), seed in any::<u64>()) {
        let sent = encode(m, k).unwrap();
        prop_assert_eq!(sent.len(), 2 * k);
        let received = transmit(&sent, 0.0, &mut StdRng::seed_from_u64(seed)).unwrap();
        prop_assert_eq!(&received, &sent);
        let decoded = decode(&received, k).unwrap();
        prop_assert_eq!(decoded.message().unwrap(), m);
        prop_assert!(decoded.parity_flags.iter().all(|f| !f));
    }

    #[test]
    fn one_flip_per_group_is_corrected(m in message(), n in 1usize..8, a in 0usize..64, b in 0usize..64) {
        let k = 2 * n + 1;
        let mut bits = encode(m, k).unwrap().bits().to_vec();
        let first = a % k;
        let second = k + b % k;
        bits[first] = !bits[first];
        bits[second] = !bits[second];
        let decoded = decode(&ClassicalBuffer::new(bits), k).unwrap();
        prop_assert_eq!(decoded.message().unwrap(), m);
        prop_assert_eq!(decoded.parity_flags, vec![true, true]);
    }

    #[test]
    fn even_factors_are_rejected(m in message(), n in 0usize..8) {
        prop_assert!(encode(m, 2 * n).is_err());
    }

    #[test]
    fn gates_preserve_norm(gates in prop::collection::vec(gate(), 0..24)) {
        let mut engine = QuantumStateEngine::new();
        for g in &gates {
            engine.apply(g).unwrap();
            let total: f64 = engine.probabilities().values().sum();
            prop_assert!((total - 1.0).abs() < 1e-9, "total probability {} after {}", total, g);
        }
    }
}
