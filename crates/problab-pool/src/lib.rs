//! `MachinePool`: bounded concurrency, panic isolation, and self-healing
//! for one game's machines.
//!
//! A pool owns a fixed-capacity channel of healthy machines and a small
//! bounded channel of evicted ("broken") ones; a fatal error or panic
//! evicts the offending machine and schedules a freshly seeded replacement
//! rather than shrinking the pool. If evictions outpace replacement (the
//! broken channel saturates) or a replacement itself fails to build, the
//! pool closes with a reason and all subsequent spins fail fast.
mod ctx;
mod pool;
mod seed;

pub use ctx::SpinCtx;
pub use pool::{CloseSnapshot, LogicFactory, MachinePool, PoolMetrics};
pub use seed::SeedMaker;
