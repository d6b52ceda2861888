//! Line selection.
//!
//! The emitter does not own a random source. It is handed a [`Select`]
//! implementation instead, which keeps the choice of line deterministic under
//! test: seed a [`Uniform`] or supply a stub.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::catalog::{Catalog, Entry};

/// Chooses the next line to emit.
pub trait Select {
    /// Choose one entry of `catalog`. Implementations must always return an
    /// entry belonging to `catalog`.
    fn select(&mut self, catalog: &Catalog) -> &'static Entry;
}

/// Uniform random selection, every entry equally likely.
#[derive(Debug, Clone)]
pub struct Uniform<R = StdRng> {
    rng: R,
}

impl<R> Uniform<R>
where
    R: Rng,
{
    /// Create a new [`Uniform`] drawing from `rng`.
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl Uniform<StdRng> {
    /// Create a new [`Uniform`] whose sequence of selections is fully
    /// determined by `seed`.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Create a new [`Uniform`] seeded from the thread-local generator.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_rng(&mut rand::rng()))
    }
}

impl<R> Select for Uniform<R>
where
    R: Rng,
{
    fn select(&mut self, catalog: &Catalog) -> &'static Entry {
        // `Catalog` is never empty so the range is never empty.
        let idx = self.rng.random_range(0..catalog.len());
        &catalog.entries()[idx]
    }
}

#[cfg(test)]
/// Walks the catalog in order, wrapping at the end.
#[derive(Debug, Default)]
pub(crate) struct RoundRobin {
    next: usize,
}

#[cfg(test)]
impl Select for RoundRobin {
    fn select(&mut self, catalog: &Catalog) -> &'static Entry {
        let idx = self.next % catalog.len();
        self.next = self.next.wrapping_add(1);
        &catalog.entries()[idx]
    }
}
