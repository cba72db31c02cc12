#![no_main]

use ferrous_wire::{Container, DiError};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

struct Alpha(u8);
struct Beta(u8);
struct Gamma(u8);

// Each byte registers one constructor; duplicates must be rejected and must
// never change which constructor is in effect.
fuzz_target!(|data: &[u8]| {
    let mut container = Container::new();
    let mut first = [None::<u8>; 3];

    for &byte in data.iter().take(64) {
        let slot = (byte % 3) as usize;
        let result = match slot {
            0 => container.provide(move || Alpha(byte)).map(|_| ()),
            1 => container.provide(move |_: Arc<Alpha>| Beta(byte)).map(|_| ()),
            _ => container.provide(move |_: Arc<Beta>| Gamma(byte)).map(|_| ()),
        };

        match (first[slot], result) {
            (None, Ok(())) => first[slot] = Some(byte),
            (Some(_), Err(DiError::DuplicateProvider(_))) => {}
            (state, other) => panic!("unexpected registration result {:?} in state {:?}", other.err(), state),
        }
    }

    assert_eq!(container.provider_count(), first.iter().flatten().count());

    let resolved = container.resolve::<Gamma>();
    match first {
        [Some(_), Some(_), Some(g)] => assert_eq!(resolved.map(|v| v.0).ok(), Some(g)),
        _ => assert!(matches!(resolved, Err(DiError::ProviderNotFound(_)))),
    }
});
