//! Randomness behind the simulated execution outcome
//!
//! The executor never calls `rand` directly. It asks an [`OutcomeSource`] for a
//! [`Draw`], so tests can script success, failure and warnings.

use crate::config::SimulationConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::sync::Mutex;

/// One resolved execution attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Draw {
    pub success: bool,
    /// Only consulted on success
    pub data_warning: bool,
    /// Only consulted on success
    pub permissions_warning: bool,
}

impl Draw {
    pub const fn success() -> Self {
        Self {
            success: true,
            data_warning: false,
            permissions_warning: false,
        }
    }

    pub const fn failure() -> Self {
        Self {
            success: false,
            data_warning: false,
            permissions_warning: false,
        }
    }

    pub fn with_warnings(mut self, data: bool, permissions: bool) -> Self {
        self.data_warning = data;
        self.permissions_warning = permissions;
        self
    }
}

pub trait OutcomeSource: Send + Sync {
    fn draw(&self) -> Draw;
}

/// Weighted random draws
pub struct RandomOutcome {
    rng: Mutex<StdRng>,
    success_rate: f64,
    data_warning_rate: f64,
    permissions_warning_rate: f64,
}

impl RandomOutcome {
    pub fn new(config: &SimulationConfig) -> Self {
        Self::with_rng(StdRng::from_entropy(), config)
    }

    /// Reproducible sequence of draws
    pub fn seeded(seed: u64, config: &SimulationConfig) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), config)
    }

    fn with_rng(rng: StdRng, config: &SimulationConfig) -> Self {
        Self {
            rng: Mutex::new(rng),
            success_rate: config.success_rate.clamp(0.0, 1.0),
            data_warning_rate: config.data_warning_rate.clamp(0.0, 1.0),
            permissions_warning_rate: config.permissions_warning_rate.clamp(0.0, 1.0),
        }
    }
}

impl OutcomeSource for RandomOutcome {
    fn draw(&self) -> Draw {
        // a poisoned rng is still a usable rng
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        Draw {
            success: rng.gen_bool(self.success_rate),
            data_warning: rng.gen_bool(self.data_warning_rate),
            permissions_warning: rng.gen_bool(self.permissions_warning_rate),
        }
    }
}

/// Replays queued draws, then repeats `fallback`
pub struct ScriptedOutcome {
    queue: Mutex<VecDeque<Draw>>,
    fallback: Draw,
}

impl ScriptedOutcome {
    pub fn new(draws: impl IntoIterator<Item = Draw>) -> Self {
        Self {
            queue: Mutex::new(draws.into_iter().collect()),
            fallback: Draw::success(),
        }
    }

    /// Every draw is `draw`
    pub fn always(draw: Draw) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback: draw,
        }
    }

    pub fn with_fallback(mut self, fallback: Draw) -> Self {
        self.fallback = fallback;
        self
    }
}

impl OutcomeSource for ScriptedOutcome {
    fn draw(&self) -> Draw {
        let mut queue = self.queue.lock().unwrap_or_else(|e| e.into_inner());
        queue.pop_front().unwrap_or(self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_replays_then_falls_back() {
        let source = ScriptedOutcome::new([Draw::failure(), Draw::success().with_warnings(true, false)])
            .with_fallback(Draw::failure());

        assert_eq!(source.draw(), Draw::failure());
        let second = source.draw();
        assert!(second.success && second.data_warning && !second.permissions_warning);
        assert_eq!(source.draw(), Draw::failure());
        assert_eq!(source.draw(), Draw::failure());
    }

    #[test]
    fn test_extreme_rates_are_deterministic() {
        let mut config = SimulationConfig::instant();
        config.success_rate = 1.0;
        config.data_warning_rate = 0.0;
        config.permissions_warning_rate = 1.0;

        let source = RandomOutcome::new(&config);
        for _ in 0..50 {
            let draw = source.draw();
            assert!(draw.success);
            assert!(!draw.data_warning);
            assert!(draw.permissions_warning);
        }

        config.success_rate = 0.0;
        let source = RandomOutcome::new(&config);
        assert!((0..50).all(|_| !source.draw().success));
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let config = SimulationConfig::instant();
        let a = RandomOutcome::seeded(42, &config);
        let b = RandomOutcome::seeded(42, &config);

        let left: Vec<Draw> = (0..20).map(|_| a.draw()).collect();
        let right: Vec<Draw> = (0..20).map(|_| b.draw()).collect();
        assert_eq!(left, right);
    }
}
