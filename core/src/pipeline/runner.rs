use num_complex::Complex64;

use crate::baseband::{Awgn, ClutterFloor, DcOffset, IqImbalance, Normalize, PhaseNoise};
use crate::config::{RadarParameters, SimulationConfig};
use crate::prelude::{BasebandFilter, BeatMatrix, SimResult};
use crate::processing::{RangeDopplerMap, RangeDopplerProcessor};
use crate::radar::{AdcSampler, DechirpMixer, FmcwWaveform, PropagationChannel, RadarSensor};
use crate::scene::Scene;
use crate::telemetry::{LogManager, Metrics};

pub type FmcwSensor = RadarSensor<FmcwWaveform, PropagationChannel, DechirpMixer, AdcSampler>;

/// Products of one simulated frame.
#[derive(Debug, Clone)]
pub struct FrameOutput {
    pub index: usize,
    /// Scene time at the first chirp [s].
    pub start_time: f64,
    pub beat: BeatMatrix,
    pub rdm: RangeDopplerMap,
}

/// Orchestrates targets → beat matrix → impairments → RDM.
pub struct SimulationRunner {
    config: SimulationConfig,
    params: RadarParameters,
    scene: Scene,
    sensor: FmcwSensor,
    processor: RangeDopplerProcessor,
    filters: Vec<Box<dyn BasebandFilter + Send>>,
    frames_run: usize,
    logger: LogManager,
}

impl SimulationRunner {
    /// Validates `config` and assembles the chain. Nothing is simulated on error.
    pub fn new(config: SimulationConfig) -> SimResult<Self> {
        let params = config.validate()?;

        let sensor = RadarSensor::new(
            params,
            FmcwWaveform::new(params),
            PropagationChannel::new(params, &config.channel),
            DechirpMixer,
            AdcSampler::new(&config.adc),
        )
        .with_doppler_model(config.doppler_model);
        let processor = RangeDopplerProcessor::new(params, config.window);
        let filters = build_filters(&config);
        let scene = Scene::new(config.scenario.states());

        let logger = LogManager::new("runner");
        logger.record(&format!(
            "range res {:.4} m, max range {:.2} m, velocity res {:.4} m/s, max velocity {:.2} m/s, {} targets",
            params.range_resolution(),
            params.max_range(),
            params.velocity_resolution(),
            params.max_velocity(),
            scene.len()
        ));

        Ok(Self {
            config,
            params,
            scene,
            sensor,
            processor,
            filters,
            frames_run: 0,
            logger,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn params(&self) -> &RadarParameters {
        &self.params
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn metrics(&self) -> Metrics {
        self.sensor.metrics().snapshot()
    }

    pub fn filter_names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Simulates the next frame, then idles the scene until the next frame start.
    pub fn run(&mut self) -> SimResult<FrameOutput> {
        let index = self.frames_run;
        let start_time = self.scene.time();
        self.scene.log_state();

        let mut beat = self.sensor.capture_frame(&mut self.scene)?;
        for filter in &mut self.filters {
            filter.apply(&mut beat);
        }
        let rdm = self.processor.process(&beat)?;

        let idle = self.config.frame_time - self.params.frame_duration();
        if idle > 0.0 {
            self.scene.step(idle);
        }
        self.frames_run += 1;

        if let Some(peak) = rdm.peak() {
            self.logger.record(&format!(
                "frame {} peak at {:.3} m, {:.3} m/s",
                index, peak.range_m, peak.velocity_mps
            ));
        }

        Ok(FrameOutput {
            index,
            start_time,
            beat,
            rdm,
        })
    }

    pub fn run_frames(&mut self, count: usize) -> SimResult<Vec<FrameOutput>> {
        (0..count).map(|_| self.run()).collect()
    }
}

/// Impairment chain in fixed order: AWGN, clutter, IQ imbalance, DC offset, phase noise.
fn build_filters(config: &SimulationConfig) -> Vec<Box<dyn BasebandFilter + Send>> {
    let noise = &config.noise;
    let mut filters: Vec<Box<dyn BasebandFilter + Send>> = Vec::new();

    if noise.enable_noise {
        if let Some(snr_db) = config.radar.snr_db {
            filters.push(Box::new(Awgn::with_snr_db(snr_db, noise.seed)));
        }
    }
    if noise.enable_clutter {
        filters.push(Box::new(ClutterFloor::new(
            noise.clutter_level_db,
            noise.seed.wrapping_add(1),
        )));
    }
    if let Some(iq) = &noise.iq_imbalance {
        filters.push(Box::new(IqImbalance::new(iq.gain_mismatch, iq.phase_error_deg)));
    }
    if let Some(offset) = noise.dc_offset {
        filters.push(Box::new(DcOffset::new(Complex64::new(offset, 0.0))));
    }
    if let Some(std) = noise.phase_noise_std {
        filters.push(Box::new(PhaseNoise::new(std, noise.seed.wrapping_add(2))));
    }
    if noise.normalize {
        filters.push(Box::new(Normalize));
    }
    filters
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ChannelConfig, IqImbalanceConfig, NoiseConfig, RadarConfig, TargetConfig, TargetScenario};
    use crate::prelude::{ConfigError, SimError};
    use crate::processing::Peak;
    use crate::radar::{DelayModel, DopplerModel};
    use approx::assert_relative_eq;

    fn scenario(targets: Vec<TargetConfig>) -> SimulationConfig {
        SimulationConfig {
            scenario: TargetScenario::new(targets),
            ..SimulationConfig::default()
        }
    }

    fn single_peak(config: SimulationConfig) -> (Peak, RadarParameters) {
        let mut runner = SimulationRunner::new(config).unwrap();
        let frame = runner.run().unwrap();
        (frame.rdm.peak().unwrap(), *runner.params())
    }

    fn assert_matches(peak: &Peak, params: &RadarParameters, range: f64, velocity: f64) {
        assert!(
            (peak.range_m - range).abs() <= params.range_resolution(),
            "range {} vs {}",
            peak.range_m,
            range
        );
        assert!(
            (peak.velocity_mps - velocity).abs() <= params.velocity_resolution(),
            "velocity {} vs {}",
            peak.velocity_mps,
            velocity
        );
    }

    #[test]
    fn stationary_target_lands_at_zero_doppler() {
        let (peak, params) = single_peak(scenario(vec![TargetConfig::new(20.0, 0.0, 1.0)]));
        assert_matches(&peak, &params, 20.0, 0.0);
        assert_eq!(peak.doppler_bin, params.num_chirps() / 2);
    }

    #[test]
    fn reference_scenario_resolves_range_and_velocity() {
        let (peak, params) = single_peak(scenario(vec![TargetConfig::new(40.0, 8.0, 1.0)]));
        assert_matches(&peak, &params, 40.0, 8.0);
        assert_relative_eq!(params.range_resolution(), 0.1499, epsilon = 1e-4);
    }

    #[test]
    fn approaching_target_has_negative_velocity() {
        let (peak, params) = single_peak(scenario(vec![TargetConfig::new(30.1, -8.0, 1.0)]));
        assert_matches(&peak, &params, 30.1, -8.0);
        assert!(peak.velocity_mps < 0.0);
    }

    #[test]
    fn three_targets_give_three_separate_peaks() {
        let targets = vec![
            TargetConfig::new(12.0, -6.0, 0.09),
            TargetConfig::new(25.0, 3.0, 0.09),
            TargetConfig::new(38.1, 10.0, 0.09),
        ];
        let mut runner = SimulationRunner::new(scenario(targets.clone())).unwrap();
        let frame = runner.run().unwrap();
        let params = *runner.params();
        let peaks = frame.rdm.peaks(3, 4);
        assert_eq!(peaks.len(), 3);

        let mut used = [false; 3];
        for target in &targets {
            let hit = peaks.iter().enumerate().find(|(i, p)| {
                !used[*i]
                    && (p.range_m - target.range_m).abs() <= params.range_resolution()
                    && (p.velocity_mps - target.velocity_mps).abs() <= params.velocity_resolution()
            });
            let (i, _) = hit.unwrap_or_else(|| panic!("no peak for {:?} in {:?}", target, peaks));
            used[i] = true;
        }
        assert_eq!(runner.metrics().clipped_components, 0);
    }

    #[test]
    fn kinematic_and_closed_form_doppler_agree() {
        let target = vec![TargetConfig::new(40.0, 5.0, 1.0)];
        let (kinematic, params) = single_peak(scenario(target.clone()));
        let (closed_form, _) = single_peak(SimulationConfig {
            doppler_model: DopplerModel::ClosedForm,
            ..scenario(target)
        });
        assert_eq!(
            (kinematic.doppler_bin, kinematic.range_bin),
            (closed_form.doppler_bin, closed_form.range_bin)
        );
        assert_matches(&closed_form, &params, 40.0, 5.0);
    }

    #[test]
    fn integer_shift_quantizes_delay_to_whole_samples() {
        let (peak, params) = single_peak(SimulationConfig {
            channel: ChannelConfig {
                delay_model: DelayModel::IntegerShift,
                ..ChannelConfig::default()
            },
            ..scenario(vec![TargetConfig::new(40.0, 8.0, 1.0)])
        });
        // 40 m rounds to one sample of delay, i.e. c / (2·fs).
        let one_sample = params.speed_of_light() / (2.0 * params.sampling_rate());
        assert!((peak.range_m - one_sample).abs() <= params.range_bin_spacing());
        // Sub-sample motion never changes the shift, so no slow-time Doppler.
        assert_eq!(peak.doppler_bin, params.num_chirps() / 2);
    }

    #[test]
    fn invalid_configuration_fails_before_simulating() {
        let config = SimulationConfig {
            radar: RadarConfig {
                sampling_rate: 1e6,
                ..RadarConfig::default()
            },
            ..SimulationConfig::default()
        };
        assert!(matches!(
            SimulationRunner::new(config),
            Err(SimError::Config(ConfigError::InsufficientSamples { .. }))
        ));
    }

    #[test]
    fn frames_are_spaced_by_frame_time() {
        let mut runner = SimulationRunner::new(scenario(vec![TargetConfig::new(40.0, 8.0, 1.0)])).unwrap();
        let frames = runner.run_frames(2).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].index, 1);
        assert_relative_eq!(frames[1].start_time, 0.05, max_relative = 1e-9);
        assert_relative_eq!(runner.scene().time(), 0.1, max_relative = 1e-9);
        assert_relative_eq!(runner.scene().snapshot()[0].range, 40.8, max_relative = 1e-9);
        assert_eq!(runner.metrics().frames, 2);
    }

    #[test]
    fn noisy_frames_are_reproducible_and_still_detect_the_target() {
        let config = SimulationConfig {
            radar: RadarConfig {
                snr_db: Some(0.0),
                ..RadarConfig::default()
            },
            noise: NoiseConfig {
                enable_noise: true,
                enable_clutter: true,
                seed: 99,
                iq_imbalance: Some(IqImbalanceConfig {
                    gain_mismatch: 0.02,
                    phase_error_deg: 2.0,
                }),
                dc_offset: Some(0.01),
                phase_noise_std: Some(0.01),
                ..NoiseConfig::default()
            },
            ..scenario(vec![TargetConfig::new(40.0, 8.0, 1.0)])
        };

        let mut a = SimulationRunner::new(config.clone()).unwrap();
        let mut b = SimulationRunner::new(config).unwrap();
        assert_eq!(
            a.filter_names(),
            vec!["awgn", "clutter_floor", "iq_imbalance", "dc_offset", "phase_noise"]
        );

        let fa = a.run().unwrap();
        let fb = b.run().unwrap();
        assert_eq!(fa.beat, fb.beat);

        let params = *a.params();
        assert_matches(&fa.rdm.peak().unwrap(), &params, 40.0, 8.0);
    }

    #[test]
    fn noise_needs_an_snr() {
        let runner = SimulationRunner::new(scenario(vec![])).unwrap();
        assert!(runner.filter_names().is_empty());
    }

    #[test]
    fn normalize_runs_last_and_keeps_the_target() {
        let config = SimulationConfig {
            radar: RadarConfig {
                snr_db: Some(20.0),
                ..RadarConfig::default()
            },
            noise: NoiseConfig {
                seed: 5,
                dc_offset: Some(0.02),
                normalize: true,
                ..NoiseConfig::default()
            },
            ..scenario(vec![TargetConfig::new(40.0, 8.0, 1.0)])
        };
        let mut runner = SimulationRunner::new(config).unwrap();
        assert_eq!(runner.filter_names(), vec!["awgn", "dc_offset", "normalize"]);

        let params = *runner.params();
        let frame = runner.run().unwrap();
        assert_eq!(frame.beat.dim(), (params.num_chirps(), params.num_samples()));
        assert_relative_eq!(
            crate::math::StatsHelper::mean_power(frame.beat.iter()),
            1.0,
            epsilon = 1e-9
        );
        assert_matches(&frame.rdm.peak().unwrap(), &params, 40.0, 8.0);
    }
}
