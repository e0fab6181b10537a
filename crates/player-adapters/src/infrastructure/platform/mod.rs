//! Platform services: key-value storage, randomness and timers.
//!
//! Storage and timers differ per target. Randomness is the same everywhere:
//! `rand`'s thread RNG, backed by `getrandom`'s `js` source in the browser.

#[cfg(not(target_arch = "wasm32"))]
mod desktop;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(not(target_arch = "wasm32"))]
pub use desktop::{DesktopStorageProvider, TokioScheduler};
#[cfg(target_arch = "wasm32")]
pub use wasm::{BrowserScheduler, LocalStorageProvider};

use rand::Rng;
use rps_player_ports::outbound::RandomProvider;

/// Uniform samples in `[0, 1)` from the thread RNG
#[derive(Clone, Default)]
pub struct ThreadRandomProvider;

impl RandomProvider for ThreadRandomProvider {
    fn random_f64(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_stay_in_unit_interval() {
        let random = ThreadRandomProvider;
        for _ in 0..1000 {
            let sample = random.random_f64();
            assert!((0.0..1.0).contains(&sample));
        }
    }
}
