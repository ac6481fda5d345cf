use std::sync::atomic::{AtomicU64, Ordering};

/// 63-bit mask: the seed stream stays in the signed-positive `i64` range so
/// every derived seed is a valid `Pcg64::seed_from_i64` input.
const MASK63: u64 = (1u64 << 63) - 1;
/// A full-period multiplier for the 63-bit domain (Knuth's 64-bit LCG
/// constant, masked down); `+ 1` keeps the additive term full-period too.
const LCG_MULT: u64 = 0x27BB_2EE6_87B0_B0FD;

/// Deterministic per-machine seed generator. Each `MachinePool` holds one,
/// seeded once from the pool's initial seed; concurrent machine rebuilds
/// across threads pull distinct seeds from it via a lock-free CAS loop, so
/// two rebuilds racing each other can never hand out the same seed.
pub struct SeedMaker {
    state: AtomicU64,
}

impl SeedMaker {
    pub fn new(seed: i64) -> Self {
        Self {
            state: AtomicU64::new((seed as u64) & MASK63),
        }
    }

    /// Advances the internal LCG and returns a mixed, independent-looking
    /// seed for the next machine.
    pub fn next(&self) -> i64 {
        loop {
            let current = self.state.load(Ordering::Relaxed);
            let advanced = current.wrapping_mul(LCG_MULT).wrapping_add(1) & MASK63;
            if self
                .state
                .compare_exchange_weak(current, advanced, Ordering::Relaxed, Ordering::Relaxed)
                .is_ok()
            {
                return Self::mix(advanced) as i64;
            }
        }
    }

    /// Three-round xor-shift-multiply, confined to the 63-bit domain so the
    /// result is always representable as a non-negative `i64`.
    fn mix(mut x: u64) -> u64 {
        x ^= x >> 30;
        x = x.wrapping_mul(0xBF58_476D_1CE4_E5B9) & MASK63;
        x ^= x >> 27;
        x = x.wrapping_mul(0x94D0_49BB_1331_11EB) & MASK63;
        x ^= x >> 31;
        x & MASK63
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn seeds_are_always_nonnegative() {
        let maker = SeedMaker::new(-42);
        for _ in 0..10_000 {
            assert!(maker.next() >= 0);
        }
    }

    #[test]
    fn same_initial_seed_reproduces_same_sequence() {
        let a = SeedMaker::new(7);
        let b = SeedMaker::new(7);
        let xs: Vec<i64> = (0..50).map(|_| a.next()).collect();
        let ys: Vec<i64> = (0..50).map(|_| b.next()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn concurrent_next_calls_never_collide() {
        let maker = Arc::new(SeedMaker::new(1));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let maker = maker.clone();
                thread::spawn(move || (0..2_000).map(|_| maker.next()).collect::<Vec<_>>())
            })
            .collect();
        let mut all = HashSet::new();
        for h in handles {
            for seed in h.join().unwrap() {
                assert!(all.insert(seed), "duplicate seed {seed}");
            }
        }
    }
}
