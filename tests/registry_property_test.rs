//! Model-based property test: random workloads of register, unregister,
//! selective release, and close must never leak a resource or release one
//! twice, and must report aggregated failures exactly when one occurred.

mod common;

use std::sync::Arc;

use common::{workload_strategy, ProbeResource, RegistryOp};
use proptest::prelude::*;
use resource_registry::CloseableRegistry;

const POOL: usize = 6;

proptest! {
    #[test]
    fn test_workload_never_leaks_or_double_releases(
        (ops, fail_flags) in workload_strategy(POOL)
    ) {
        let probes: Vec<Arc<ProbeResource>> = (0..POOL)
            .map(|i| {
                let label = format!("r{i}");
                if fail_flags[i] {
                    ProbeResource::failing(&label)
                } else {
                    ProbeResource::new(&label)
                }
            })
            .collect();

        let registry = CloseableRegistry::for_scope("property");

        // model state
        let mut tracked = vec![false; POOL];
        let mut expected_closes = vec![0usize; POOL];
        let mut closing = false;

        for op in ops {
            match op {
                RegistryOp::Register(i) => {
                    // a released resource must not be registered again
                    if expected_closes[i] > 0 && !tracked[i] {
                        continue;
                    }
                    match registry.register(probes[i].handle()) {
                        Ok(()) => {
                            prop_assert!(!closing);
                            tracked[i] = true;
                        }
                        Err(rejection) => {
                            prop_assert!(closing);
                            let _ = rejection.into_resource().close();
                            expected_closes[i] += 1;
                        }
                    }
                }
                RegistryOp::Unregister(i) => {
                    let handle = probes[i].handle();
                    prop_assert_eq!(registry.unregister(&handle), tracked[i]);
                    tracked[i] = false;
                }
                RegistryOp::ReleaseSome(indices) => {
                    let handles: Vec<_> =
                        indices.iter().map(|&i| probes[i].handle()).collect();
                    let result = registry.release_some(handles);

                    let mut failures = 0;
                    for &i in &indices {
                        if tracked[i] {
                            expected_closes[i] += 1;
                            tracked[i] = false;
                            if fail_flags[i] {
                                failures += 1;
                            }
                        }
                    }
                    match result {
                        Ok(()) => prop_assert_eq!(failures, 0),
                        Err(aggregate) => {
                            prop_assert_eq!(aggregate.total_failures(), failures);
                        }
                    }
                }
                RegistryOp::CloseAll => {
                    registry.close_all();
                    for i in 0..POOL {
                        if tracked[i] {
                            expected_closes[i] += 1;
                            tracked[i] = false;
                        }
                    }
                    closing = true;
                }
            }
        }

        registry.close_all();
        for i in 0..POOL {
            if tracked[i] {
                expected_closes[i] += 1;
                tracked[i] = false;
            }
        }

        for i in 0..POOL {
            prop_assert_eq!(probes[i].close_count(), expected_closes[i]);
        }
    }
}
