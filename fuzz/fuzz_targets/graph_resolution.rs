#![no_main]

use ferrous_wire::{AnyArc, Container, DiError, DynConstructor};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

macro_rules! nodes {
    ($($name:ident),*) => {
        $(struct $name;)*

        fn node_ctor(index: usize, deps: &[usize]) -> DynConstructor {
            let mut ctor = DynConstructor::named("node");
            let mut i = 0;
            $(
                if deps.contains(&i) {
                    ctor = ctor.input::<$name>();
                }
                i += 1;
            )*
            let _ = i;

            let mut j = 0;
            $(
                if j == index {
                    return ctor
                        .output::<$name>()
                        .call(|_| Ok(vec![Arc::new($name) as AnyArc]));
                }
                j += 1;
            )*
            let _ = j;
            ctor
        }

        fn resolve_node(container: &Container, index: usize) -> Result<(), DiError> {
            let mut k = 0;
            $(
                if k == index {
                    return container.resolve::<$name>().map(|_| ());
                }
                k += 1;
            )*
            let _ = k;
            Ok(())
        }
    };
}

nodes!(N0, N1, N2, N3, N4, N5, N6, N7);

// Builds an arbitrary (possibly cyclic, possibly incomplete) graph over eight
// types and checks that resolution agrees with static validation.
fuzz_target!(|data: &[u8]| {
    if data.len() < 9 {
        return;
    }

    let present = data[0];
    let mut container = Container::new();
    for index in 0..8 {
        if present & (1 << index) == 0 {
            continue;
        }
        let mask = data[1 + index];
        let deps: Vec<usize> = (0..8).filter(|d| mask & (1 << d) != 0).collect();
        container.register_dynamic(node_ctor(index, &deps)).unwrap();
    }

    let valid = container.validate().is_valid();
    for index in 0..8 {
        if present & (1 << index) == 0 {
            continue;
        }
        match resolve_node(&container, index) {
            Ok(()) => {}
            Err(DiError::Circular(path)) => {
                assert!(!valid);
                // The repeated type closes the path and appeared earlier in it
                let (last, before) = path.split_last().unwrap();
                assert!(before.contains(last));
            }
            Err(DiError::ProviderNotFound(_)) => assert!(!valid),
            Err(other) => panic!("unexpected error {}", other),
        }
    }
    if valid {
        assert_eq!(container.cached_count(), present.count_ones() as usize);
    }
});
