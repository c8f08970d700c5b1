//! Random number generation for sample jitter.
//!
//! Thread-local ChaCha20 PRNG, so parallel render workers never contend.

use rand::{Rng, SeedableRng, rng};
use rand_chacha::ChaCha20Rng;
use std::cell::RefCell;

thread_local! {
    /// Thread-local ChaCha20 PRNG for quality random numbers.
    static RNG: RefCell<ChaCha20Rng> = RefCell::new(ChaCha20Rng::from_rng(&mut rng()));
}

/// Generate a random f64 in [0.0, 1.0)
pub fn random_f64() -> f64 {
    RNG.with(|rng| rng.borrow_mut().random())
}
