use crate::Prng;
use problab_core::ProblabError;

/// Convenience wrapper adding `Pick`/`ShuffleInts`/`NormFloat64`/`ExpFloat64`
/// on top of any [`Prng`]. Consumers that only need the raw stream can use a
/// bare [`crate::Pcg64`]; everything that wants ergonomic sampling wraps it
/// in a `Core`.
#[derive(Debug, Clone, Copy)]
pub struct Core<P> {
    inner: P,
}

impl<P: Prng> Core<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> P {
        self.inner
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut P {
        &mut self.inner
    }

    /// Returns a reference to a uniformly random element, or `None` if the
    /// slice is empty (the source's `-1` sentinel translated idiomatically).
    pub fn pick<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        if slice.is_empty() {
            return None;
        }
        let i = self.inner.uint_n(slice.len() as u64) as usize;
        slice.get(i)
    }

    /// Fisher-Yates shuffle in place.
    pub fn shuffle_ints(&mut self, slice: &mut [i64]) {
        for i in (1..slice.len()).rev() {
            let j = self.inner.uint_n((i + 1) as u64) as usize;
            slice.swap(i, j);
        }
    }

    /// Standard-normal sample via a single Box-Muller draw. Deterministic
    /// given the stream, though it consumes two `float64` draws per call.
    pub fn norm_float64(&mut self) -> f64 {
        let u1 = self.inner.float64().max(f64::MIN_POSITIVE);
        let u2 = self.inner.float64();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }

    /// Standard-exponential (rate 1) sample via inverse-CDF.
    pub fn exp_float64(&mut self) -> f64 {
        -(1.0 - self.inner.float64()).ln()
    }
}

impl<P: Prng> Prng for Core<P> {
    fn uint64(&mut self) -> u64 {
        self.inner.uint64()
    }
    fn snapshot(&self) -> Vec<u8> {
        self.inner.snapshot()
    }
    fn restore(&mut self, bytes: &[u8]) -> Result<(), ProblabError> {
        self.inner.restore(bytes)
    }
}
