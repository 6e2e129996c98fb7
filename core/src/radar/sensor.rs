use log::{debug, warn};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::config::RadarParameters;
use crate::prelude::{BeatMatrix, Channel, Mixer, Sampler, SimError, SimResult, WaveformSource};
use crate::scene::{Scene, TargetState};
use crate::telemetry::{LogManager, MetricsRecorder};

/// How target motion reaches the slow-time axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DopplerModel {
    /// Ranges are re-read from the scene before every chirp; the carrier
    /// phase of the changing delay carries the Doppler.
    #[default]
    Kinematic,
    /// Ranges are frozen at frame start and the channel adds the explicit
    /// phase `-2π·f_d·c·Tc` for chirp `c`.
    ClosedForm,
}

/// FMCW sensor: drives waveform, channel, mixer and ADC over one frame.
pub struct RadarSensor<W, C, M, S> {
    params: RadarParameters,
    waveform: W,
    channel: C,
    mixer: M,
    adc: S,
    doppler_model: DopplerModel,
    logger: LogManager,
    metrics: MetricsRecorder,
}

impl<W, C, M, S> RadarSensor<W, C, M, S>
where
    W: WaveformSource,
    C: Channel,
    M: Mixer,
    S: Sampler,
{
    pub fn new(params: RadarParameters, waveform: W, channel: C, mixer: M, adc: S) -> Self {
        Self {
            params,
            waveform,
            channel,
            mixer,
            adc,
            doppler_model: DopplerModel::default(),
            logger: LogManager::new("sensor"),
            metrics: MetricsRecorder::new(),
        }
    }

    pub fn with_doppler_model(mut self, doppler_model: DopplerModel) -> Self {
        self.doppler_model = doppler_model;
        self
    }

    pub fn doppler_model(&self) -> DopplerModel {
        self.doppler_model
    }

    pub fn params(&self) -> &RadarParameters {
        &self.params
    }

    pub fn metrics(&self) -> &MetricsRecorder {
        &self.metrics
    }

    /// Captures one `[Nc × Ns]` frame, stepping `scene` by `Tc` after every chirp.
    pub fn capture_frame(&self, scene: &mut Scene) -> SimResult<BeatMatrix> {
        let nc = self.params.num_chirps();
        let tc = self.params.chirp_duration();
        let tx = self.transmit_chirp()?;
        let frame_start = scene.snapshot();

        let mut beat = BeatMatrix::zeros((nc, self.params.num_samples()));
        let mut clipped = 0;
        for chirp in 0..nc {
            let moving;
            let (targets, slow_time): (&[TargetState], f64) = match self.doppler_model {
                DopplerModel::Kinematic => {
                    moving = scene.snapshot();
                    (moving.as_slice(), 0.0)
                }
                DopplerModel::ClosedForm => (frame_start.as_slice(), chirp as f64 * tc),
            };

            let (row, row_clipped) = self.chirp_row(&tx, targets, slow_time)?;
            for (dst, src) in beat.row_mut(chirp).iter_mut().zip(row) {
                *dst = src;
            }
            clipped += row_clipped;
            scene.step(tc);
        }

        self.finish_frame(nc, clipped);
        Ok(beat)
    }

    /// Same result as [`capture_frame`](Self::capture_frame), with the rows
    /// computed on the rayon pool. Scene snapshots are all taken up front.
    #[cfg(feature = "parallel")]
    pub fn capture_frame_parallel(&self, scene: &mut Scene) -> SimResult<BeatMatrix>
    where
        W: Sync,
        C: Sync,
        M: Sync,
        S: Sync,
    {
        use rayon::prelude::*;

        let nc = self.params.num_chirps();
        let tc = self.params.chirp_duration();
        let tx = self.transmit_chirp()?;
        let frame_start = scene.snapshot();

        let mut jobs = Vec::with_capacity(nc);
        for chirp in 0..nc {
            jobs.push(match self.doppler_model {
                DopplerModel::Kinematic => (scene.snapshot(), 0.0),
                DopplerModel::ClosedForm => (frame_start.clone(), chirp as f64 * tc),
            });
            scene.step(tc);
        }

        let rows: Vec<SimResult<(Vec<Complex64>, usize)>> = jobs
            .par_iter()
            .map(|(targets, slow_time)| self.chirp_row(&tx, targets, *slow_time))
            .collect();

        let mut beat = BeatMatrix::zeros((nc, self.params.num_samples()));
        let mut clipped = 0;
        for (chirp, row) in rows.into_iter().enumerate() {
            let (row, row_clipped) = row?;
            for (dst, src) in beat.row_mut(chirp).iter_mut().zip(row) {
                *dst = src;
            }
            clipped += row_clipped;
        }

        self.finish_frame(nc, clipped);
        Ok(beat)
    }

    fn transmit_chirp(&self) -> SimResult<Vec<Complex64>> {
        let tx = self.waveform.generate();
        let needed = self.params.num_samples();
        if tx.len() < needed {
            return Err(SimError::ShortChirp {
                expected: needed,
                actual: tx.len(),
            });
        }
        Ok(tx)
    }

    /// One digitized row: propagate, dechirp, keep the first `Ns` samples, sample.
    fn chirp_row(
        &self,
        tx: &[Complex64],
        targets: &[TargetState],
        slow_time: f64,
    ) -> SimResult<(Vec<Complex64>, usize)> {
        let ns = self.params.num_samples();
        let rx = self.channel.propagate_at(tx, targets, slow_time);
        let analog = self.mixer.mix(tx, &rx);
        if analog.len() < ns {
            return Err(SimError::ShortChirp {
                expected: ns,
                actual: analog.len(),
            });
        }

        let window = &analog[..ns];
        let clipped = self.adc.clipped_components(window);
        Ok((self.adc.sample(window), clipped))
    }

    fn finish_frame(&self, chirps: usize, clipped: usize) {
        if clipped > 0 {
            warn!("ADC clipped {} I/Q components this frame", clipped);
        }
        debug!("frame captured with {:?} Doppler model", self.doppler_model);
        self.metrics.record_frame(chirps, clipped);
        self.logger
            .record(&format!("captured {} chirps, {} clipped components", chirps, clipped));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AdcConfig, ChannelConfig, RadarConfig};
    use crate::radar::{AdcSampler, DechirpMixer, FmcwWaveform, PropagationChannel};
    use approx::assert_relative_eq;

    type Sensor = RadarSensor<FmcwWaveform, PropagationChannel, DechirpMixer, AdcSampler>;

    fn small_params() -> RadarParameters {
        RadarConfig {
            num_chirps: 16,
            num_samples: 64,
            ..RadarConfig::default()
        }
        .validate()
        .unwrap()
    }

    fn sensor(params: RadarParameters) -> Sensor {
        RadarSensor::new(
            params,
            FmcwWaveform::new(params),
            PropagationChannel::new(params, &ChannelConfig::default()),
            DechirpMixer,
            AdcSampler::new(&AdcConfig::default()),
        )
    }

    struct TruncatedWaveform;

    impl WaveformSource for TruncatedWaveform {
        fn generate(&self) -> Vec<Complex64> {
            vec![Complex64::new(1.0, 0.0); 8]
        }
    }

    #[test]
    fn frame_has_one_row_per_chirp() {
        let params = small_params();
        let mut scene = Scene::new(vec![TargetState::new(20.0, 4.0, 1.0, 0.0)]);
        let beat = sensor(params).capture_frame(&mut scene).unwrap();
        assert_eq!(beat.dim(), (16, 64));
    }

    #[test]
    fn scene_advances_one_chirp_per_row() {
        let params = small_params();
        let mut scene = Scene::new(vec![TargetState::new(20.0, 4.0, 1.0, 0.0)]);
        sensor(params).capture_frame(&mut scene).unwrap();

        assert_relative_eq!(scene.time(), 16.0 * 60e-6, max_relative = 1e-12);
        assert_relative_eq!(scene.snapshot()[0].range, 20.0 + 4.0 * 16.0 * 60e-6, max_relative = 1e-12);
    }

    #[test]
    fn closed_form_model_also_advances_the_scene() {
        let params = small_params();
        let mut scene = Scene::new(vec![TargetState::new(20.0, 4.0, 1.0, 0.0)]);
        sensor(params)
            .with_doppler_model(DopplerModel::ClosedForm)
            .capture_frame(&mut scene)
            .unwrap();
        assert_relative_eq!(scene.snapshot()[0].range, 20.0 + 4.0 * 16.0 * 60e-6, max_relative = 1e-12);
    }

    #[test]
    fn stationary_scene_repeats_every_row() {
        let params = small_params();
        let mut scene = Scene::new(vec![TargetState::new(20.0, 0.0, 1.0, 0.0)]);
        let beat = sensor(params).capture_frame(&mut scene).unwrap();
        for chirp in 1..beat.nrows() {
            assert_eq!(beat.row(chirp), beat.row(0));
        }
    }

    #[test]
    fn moving_target_rotates_phase_across_chirps() {
        let params = small_params();
        let mut scene = Scene::new(vec![TargetState::new(20.0, 8.0, 1.0, 0.0)]);
        let beat = sensor(params).capture_frame(&mut scene).unwrap();

        // Carrier phase advances by 2·v·Tc/λ cycles per chirp.
        let expected = 2.0 * 8.0 * params.chirp_duration() / params.wavelength();
        let column = 32;
        let step = beat[[1, column]] * beat[[0, column]].conj();
        let measured = step.arg() / std::f64::consts::TAU;
        assert!((measured - expected).abs() < 0.01, "measured {} expected {}", measured, expected);
    }

    #[test]
    fn clipping_is_counted() {
        let params = small_params();
        let mut scene = Scene::new(vec![TargetState::new(20.0, 0.0, 4.0, 0.0)]);
        let sensor = sensor(params);
        sensor.capture_frame(&mut scene).unwrap();
        let metrics = sensor.metrics().snapshot();
        assert_eq!(metrics.frames, 1);
        assert_eq!(metrics.chirps, 16);
        assert!(metrics.clipped_components > 0);
    }

    #[test]
    fn short_waveform_is_rejected() {
        let params = small_params();
        let sensor = RadarSensor::new(
            params,
            TruncatedWaveform,
            PropagationChannel::new(params, &ChannelConfig::default()),
            DechirpMixer,
            AdcSampler::default(),
        );
        let mut scene = Scene::default();
        assert!(matches!(
            sensor.capture_frame(&mut scene),
            Err(SimError::ShortChirp {
                expected: 64,
                actual: 8
            })
        ));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_capture_matches_sequential() {
        let params = small_params();
        let targets = vec![
            TargetState::new(12.0, -3.0, 0.2, 0.0),
            TargetState::new(30.0, 6.0, 0.2, 0.4),
        ];
        let sensor = sensor(params);

        let mut a = Scene::new(targets.clone());
        let mut b = Scene::new(targets);
        let sequential = sensor.capture_frame(&mut a).unwrap();
        let parallel = sensor.capture_frame_parallel(&mut b).unwrap();
        assert_eq!(sequential, parallel);
        assert_eq!(a.snapshot(), b.snapshot());
    }
}
