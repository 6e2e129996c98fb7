use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::Normal;

use crate::baseband::complex_gaussian;
use crate::math::StatsHelper;
use crate::prelude::{BasebandFilter, BeatMatrix};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoiseLevel {
    /// Noise power relative to the measured signal power.
    SnrDb(f64),
    /// Absolute noise power.
    Power(f64),
}

/// Additive white complex Gaussian noise.
#[derive(Debug, Clone)]
pub struct Awgn {
    level: NoiseLevel,
    rng: StdRng,
}

impl Awgn {
    pub fn with_snr_db(snr_db: f64, seed: u64) -> Self {
        Self {
            level: NoiseLevel::SnrDb(snr_db),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn with_noise_power(noise_power: f64, seed: u64) -> Self {
        Self {
            level: NoiseLevel::Power(noise_power),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn noise_power(&self, signal_power: f64) -> f64 {
        match self.level {
            NoiseLevel::SnrDb(snr_db) => signal_power / StatsHelper::db_to_power_ratio(snr_db),
            NoiseLevel::Power(power) => power,
        }
    }
}

impl BasebandFilter for Awgn {
    fn name(&self) -> &'static str {
        "awgn"
    }

    fn apply(&mut self, beat: &mut BeatMatrix) {
        let signal_power = StatsHelper::mean_power(beat.iter());
        let noise_power = self.noise_power(signal_power);
        add_gaussian(beat, noise_power, &mut self.rng);
        debug!("awgn: signal power {:.3e}, noise power {:.3e}", signal_power, noise_power);
    }
}

/// Stationary clutter background at a fixed level below the signal.
#[derive(Debug, Clone)]
pub struct ClutterFloor {
    level_db: f64,
    rng: StdRng,
}

impl ClutterFloor {
    pub fn new(level_db: f64, seed: u64) -> Self {
        Self {
            level_db,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl BasebandFilter for ClutterFloor {
    fn name(&self) -> &'static str {
        "clutter_floor"
    }

    fn apply(&mut self, beat: &mut BeatMatrix) {
        let signal_power = StatsHelper::mean_power(beat.iter());
        let clutter_power = signal_power * StatsHelper::db_to_power_ratio(self.level_db);
        add_gaussian(beat, clutter_power, &mut self.rng);
    }
}

fn add_gaussian(beat: &mut BeatMatrix, power: f64, rng: &mut StdRng) {
    let Ok(component) = Normal::new(0.0, (power / 2.0).sqrt()) else {
        return;
    };
    for sample in beat.iter_mut() {
        *sample += complex_gaussian(rng, &component);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    fn ones() -> BeatMatrix {
        BeatMatrix::from_elem((64, 128), Complex64::new(1.0, 0.0))
    }

    fn residual_power(noisy: &BeatMatrix, clean: &BeatMatrix) -> f64 {
        let diff = noisy - clean;
        StatsHelper::mean_power(diff.iter())
    }

    #[test]
    fn awgn_hits_the_requested_snr() {
        let clean = ones();
        let mut noisy = clean.clone();
        Awgn::with_snr_db(10.0, 7).apply(&mut noisy);
        let measured = residual_power(&noisy, &clean);
        assert!((measured - 0.1).abs() < 0.01, "noise power {}", measured);
    }

    #[test]
    fn absolute_noise_power_ignores_signal_level() {
        let clean = BeatMatrix::from_elem((64, 128), Complex64::new(5.0, 0.0));
        let mut noisy = clean.clone();
        Awgn::with_noise_power(0.5, 1).apply(&mut noisy);
        let measured = residual_power(&noisy, &clean);
        assert!((measured - 0.5).abs() < 0.05, "noise power {}", measured);
    }

    #[test]
    fn same_seed_reproduces_noise() {
        let mut a = ones();
        let mut b = ones();
        let mut c = ones();
        Awgn::with_snr_db(0.0, 42).apply(&mut a);
        Awgn::with_snr_db(0.0, 42).apply(&mut b);
        Awgn::with_snr_db(0.0, 43).apply(&mut c);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.dim(), (64, 128));
    }

    #[test]
    fn clutter_floor_sits_below_the_signal() {
        let clean = ones();
        let mut cluttered = clean.clone();
        ClutterFloor::new(-20.0, 3).apply(&mut cluttered);
        let measured = residual_power(&cluttered, &clean);
        assert!((measured - 0.01).abs() < 0.002, "clutter power {}", measured);
    }
}
