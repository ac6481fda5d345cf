//! Deterministic PRNG core with byte-exact snapshot/restore.
//!
//! The engine's entire reproducibility story rests on this crate: a
//! [`Prng`] is a 64-bit stream with unbiased bounded sampling and an opaque
//! snapshot that round-trips byte-for-byte. [`Core`] adds convenience
//! methods (`pick`, `shuffle_ints`, `norm_float64`, `exp_float64`) on top of
//! any [`Prng`] implementation.
//!
//! [`Pcg64`] is the default implementation; its algorithm and constants are
//! part of the reproducibility contract — the same seed must reproduce the
//! same stream for as long as the engine claims binary-compatible replay.
mod core;
mod pcg;

pub use core::Core;
pub use pcg::Pcg64;

use problab_core::ProblabError;

/// The PRNG contract every game-serving machine depends on.
pub trait Prng {
    /// Draws the next 64-bit value from the stream.
    fn uint64(&mut self) -> u64;

    /// Unbiased draw in `[0, n)`. `n == 0` returns `0` (an empty range has
    /// no valid draw, but the engine never calls this with `n == 0` — see
    /// [`Prng::int_n`] for the signed, validated sibling).
    fn uint_n(&mut self, n: u64) -> u64 {
        if n == 0 {
            return 0;
        }
        if n.is_power_of_two() {
            return self.uint64() & (n - 1);
        }
        // Lemire's multiply-reduce with rejection.
        loop {
            let m = (self.uint64() as u128) * (n as u128);
            let lo = m as u64;
            if lo >= n {
                return (m >> 64) as u64;
            }
            let threshold = n.wrapping_neg() % n;
            if lo >= threshold {
                return (m >> 64) as u64;
            }
            // lo < threshold: resample.
        }
    }

    /// Unbiased draw in `[0, max)`; returns `-1` if `max <= 0`.
    fn int_n(&mut self, max: i64) -> i64 {
        if max <= 0 {
            return -1;
        }
        self.uint_n(max as u64) as i64
    }

    /// Draw in `[0, 1)` with a 53-bit mantissa (the full double precision
    /// the IEEE-754 significand can represent without rounding).
    fn float64(&mut self) -> f64 {
        const SCALE: f64 = 1.0 / (1u64 << 53) as f64;
        ((self.uint64() >> 11) as f64) * SCALE
    }

    /// Opaque byte-exact snapshot of the stream's current state.
    fn snapshot(&self) -> Vec<u8>;

    /// Restore from a snapshot produced by [`Prng::snapshot`]. Must reject
    /// malformed input rather than silently clamping it.
    fn restore(&mut self, bytes: &[u8]) -> Result<(), ProblabError>;
}

/// Base64url (no padding) encoding of a snapshot, for embedding in JSON.
pub fn encode_snapshot(bytes: &[u8]) -> String {
    use base64::Engine;
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode a base64url-encoded snapshot back to raw bytes.
pub fn decode_snapshot(text: &str) -> Result<Vec<u8>, ProblabError> {
    use base64::Engine;
    base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(text)
        .map_err(|e| ProblabError::MalformedSnapshot(e.to_string()))
}
