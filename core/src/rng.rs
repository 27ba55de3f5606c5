//! Deterministic random number generation for fixture data.
//!
//! RULE: Fixture generation never touches a platform RNG.
//! Each view gets its own stream, seeded from (master_seed, view slot), so
//! adding a view never changes the rows another view generates.

use rand::{seq::SliceRandom, RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

pub struct FixtureRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl FixtureRng {
    /// The slot index must never change once assigned.
    pub fn new(master_seed: u64, slot_index: u64) -> Self {
        let derived_seed = master_seed ^ (slot_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Float in [low, high), rounded to 2 decimals like a currency amount.
    pub fn amount_between(&mut self, low: f64, high: f64) -> f64 {
        let raw = low + (high - low) * self.next_f64();
        (raw * 100.0).round() / 100.0
    }

    /// Bernoulli trial: true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        let idx = self.next_u64_below(items.len() as u64) as usize;
        &items[idx]
    }

    /// In-place shuffle drawn from this stream.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.inner);
    }
}

/// Per-view RNG streams for a single seed.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn for_view(&self, slot: ViewSlot) -> FixtureRng {
        FixtureRng::new(self.master_seed, slot as u64).with_name(slot.name())
    }
}

/// Stable slot assignments. Append only: reordering reseeds every view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum ViewSlot {
    Loans = 0,
    Agents = 1,
    Compliance = 2,
    Fraud = 3,
    Kyc = 4,
    Tickets = 5,
}

impl ViewSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Loans      => "loans",
            Self::Agents     => "agents",
            Self::Compliance => "compliance",
            Self::Fraud      => "fraud",
            Self::Kyc        => "kyc",
            Self::Tickets    => "tickets",
        }
    }
}
