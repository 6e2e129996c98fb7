use anyhow::Context;
use clap::ValueEnum;
use fmcwcore::config::{AdcConfig, NoiseConfig, RadarConfig, SimulationConfig, TargetConfig, TargetScenario};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Built-in scenarios selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// One target at 40 m receding at 8 m/s.
    Single,
    /// Three targets spread over range and velocity.
    Multi,
    /// Three targets drawn from a seeded RNG inside the unambiguous region.
    Random,
}

pub fn preset_config(preset: Preset, seed: u64) -> anyhow::Result<SimulationConfig> {
    let base = SimulationConfig {
        noise: NoiseConfig {
            seed,
            ..NoiseConfig::default()
        },
        ..SimulationConfig::default()
    };

    let config = match preset {
        Preset::Single => SimulationConfig {
            radar: RadarConfig {
                snr_db: Some(25.0),
                ..RadarConfig::default()
            },
            scenario: TargetScenario::new(vec![TargetConfig::new(40.0, 8.0, 1.0)]),
            ..base
        },
        Preset::Multi => SimulationConfig {
            radar: RadarConfig {
                snr_db: Some(18.0),
                ..RadarConfig::default()
            },
            scenario: TargetScenario::new(vec![
                TargetConfig::new(15.0, 5.0, 1.0),
                TargetConfig::new(28.0, -6.0, 0.8),
                TargetConfig::new(40.0, 2.5, 0.6),
            ]),
            // Echo amplitudes sum to about 2.7; keep the ADC out of clipping.
            adc: AdcConfig {
                num_bits: 12,
                v_ref: 3.0,
            },
            ..base
        },
        Preset::Random => {
            let targets = random_targets(&base.radar, 3, seed)?;
            SimulationConfig {
                scenario: TargetScenario::new(targets),
                ..base
            }
        }
    };
    Ok(config)
}

/// Targets with ranges in 10–90 % of the unambiguous range, speeds within
/// 80 % of the unambiguous speed and RCS small enough that `count` echoes
/// never clip a unit ADC.
pub fn random_targets(radar: &RadarConfig, count: usize, seed: u64) -> anyhow::Result<Vec<TargetConfig>> {
    let params = radar
        .validate()
        .context("validating radar parameters for random scenario")?;
    let max_range = params.max_range();
    let max_velocity = params.max_velocity();
    let amplitude = 1.0 / count.max(1) as f64;

    let mut rng = StdRng::seed_from_u64(seed);
    Ok((0..count)
        .map(|_| {
            let range = rng.gen_range(0.1 * max_range..0.9 * max_range);
            let velocity = rng.gen_range(-0.8 * max_velocity..0.8 * max_velocity);
            let rcs = (amplitude * rng.gen_range(0.5..1.0)).powi(2);
            TargetConfig::new(range, velocity, rcs)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_validate() {
        for preset in [Preset::Single, Preset::Multi, Preset::Random] {
            let config = preset_config(preset, 5).unwrap();
            assert!(config.validate().is_ok(), "{:?}", preset);
            assert!(!config.scenario.targets.is_empty());
        }
    }

    #[test]
    fn random_targets_follow_the_seed_and_limits() {
        let radar = RadarConfig::default();
        let params = radar.validate().unwrap();
        let a = random_targets(&radar, 3, 17).unwrap();
        let b = random_targets(&radar, 3, 17).unwrap();
        assert_eq!(a, b);

        for target in &a {
            assert!(target.range_m > 0.0 && target.range_m < params.max_range());
            assert!(target.velocity_mps.abs() < params.max_velocity());
            assert!(target.rcs.sqrt() <= 1.0 / 3.0);
        }
    }
}
