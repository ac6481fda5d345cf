use crate::Prng;
use problab_core::ProblabError;

/// PCG-XSL-RR 128/64: 128-bit LCG state, 64-bit xor-shift-low then
/// rotate-right output. This is the engine's default PRNG; its algorithm and
/// constants are part of the reproducibility contract — changing them
/// changes every downstream replay.
///
/// Snapshot is the 16-byte state followed by the 16-byte increment, 32
/// bytes total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pcg64 {
    state: u128,
    increment: u128,
}

/// Fixed 128-bit LCG multiplier (the standard PCG64 multiplier).
const MULTIPLIER: u128 = 0x2360_ed05_1fc6_5da4_4385_df64_9fcc_f645;
/// SplitMix64's golden-ratio increment constant.
const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;
/// A second constant, distinct from the golden-ratio one, used to derive a
/// stream independent of the state limbs from the same user seed.
const FIXED_DISTINCT: u64 = 0xBF58_476D_1CE4_E5B9;

/// One SplitMix64 step: advances `state` and returns the next 64-bit output.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(GOLDEN_GAMMA);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

impl Pcg64 {
    /// Derives initial state and increment from a user seed via SplitMix64,
    /// per the contract: SplitMix64 applied to `s ^ golden-ratio-constant`
    /// seeds the two state limbs, `s ^ fixed-distinct-constant` seeds the
    /// two increment limbs (forced odd, as PCG's LCG requires).
    pub fn seed_from_i64(seed: i64) -> Self {
        let s = seed as u64;
        let mut a = s ^ GOLDEN_GAMMA;
        let mut b = s ^ FIXED_DISTINCT;
        let state_hi = splitmix64(&mut a);
        let state_lo = splitmix64(&mut a);
        let inc_hi = splitmix64(&mut b);
        let inc_lo = splitmix64(&mut b) | 1;
        Self {
            state: ((state_hi as u128) << 64) | state_lo as u128,
            increment: (((inc_hi as u128) << 64) | inc_lo as u128) | 1,
        }
    }

    fn step(&mut self) {
        self.state = self.state.wrapping_mul(MULTIPLIER).wrapping_add(self.increment);
    }

    fn output(&self) -> u64 {
        let rot = (self.state >> 122) as u32;
        let xsl = ((self.state >> 64) as u64) ^ (self.state as u64);
        xsl.rotate_right(rot)
    }
}

impl Prng for Pcg64 {
    fn uint64(&mut self) -> u64 {
        self.step();
        self.output()
    }

    fn snapshot(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(32);
        out.extend_from_slice(&self.state.to_le_bytes());
        out.extend_from_slice(&self.increment.to_le_bytes());
        out
    }

    fn restore(&mut self, bytes: &[u8]) -> Result<(), ProblabError> {
        if bytes.len() != 32 {
            return Err(ProblabError::MalformedSnapshot(format!(
                "expected 32-byte PCG64 snapshot, got {} bytes",
                bytes.len()
            )));
        }
        let state = u128::from_le_bytes(bytes[0..16].try_into().unwrap());
        let increment = u128::from_le_bytes(bytes[16..32].try_into().unwrap());
        if increment & 1 == 0 {
            return Err(ProblabError::MalformedSnapshot(
                "PCG64 increment must be odd".into(),
            ));
        }
        self.state = state;
        self.increment = increment;
        Ok(())
    }
}

/// Bridges into the `rand_core` ecosystem for interop with `rand`-based code
/// (e.g. `rand::seq` helpers a caller might want to use directly).
impl rand_core::RngCore for Pcg64 {
    fn next_u32(&mut self) -> u32 {
        (self.uint64() >> 32) as u32
    }
    fn next_u64(&mut self) -> u64 {
        Prng::uint64(self)
    }
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        rand_core::impls::fill_bytes_via_next(self, dest)
    }
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
