use proptest::prelude::*;

/// One step of a registry workload.
#[derive(Debug, Clone)]
pub enum RegistryOp {
    Register(usize),
    Unregister(usize),
    ReleaseSome(Vec<usize>),
    CloseAll,
}

/// Strategy for a single operation over a pool of `pool_size` resources.
pub fn registry_op_strategy(pool_size: usize) -> impl Strategy<Value = RegistryOp> {
    prop_oneof![
        4 => (0..pool_size).prop_map(RegistryOp::Register),
        2 => (0..pool_size).prop_map(RegistryOp::Unregister),
        2 => prop::collection::vec(0..pool_size, 0..4).prop_map(RegistryOp::ReleaseSome),
        1 => Just(RegistryOp::CloseAll),
    ]
}

/// Strategy for a full workload plus per-resource failure flags.
pub fn workload_strategy(
    pool_size: usize,
) -> impl Strategy<Value = (Vec<RegistryOp>, Vec<bool>)> {
    (
        prop::collection::vec(registry_op_strategy(pool_size), 0..40),
        prop::collection::vec(any::<bool>(), pool_size..=pool_size),
    )
}
