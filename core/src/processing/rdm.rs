use ndarray::{Array2, Axis};
use num_complex::Complex64;
use rustfft::num_traits::Zero;

use crate::config::RadarParameters;
use crate::math::FftHelper;
use crate::prelude::{BeatMatrix, SimError, SimResult};
use crate::processing::window::WindowKind;
use crate::telemetry::LogManager;

/// Magnitude Range-Doppler Map with its physical axes.
///
/// Rows follow `velocity_axis` (zero Doppler at row `⌊Nc/2⌋`), columns follow
/// `range_axis`.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeDopplerMap {
    pub(crate) magnitude: Array2<f64>,
    pub(crate) range_axis: Vec<f64>,
    pub(crate) velocity_axis: Vec<f64>,
}

impl RangeDopplerMap {
    pub fn magnitude(&self) -> &Array2<f64> {
        &self.magnitude
    }

    pub fn range_axis(&self) -> &[f64] {
        &self.range_axis
    }

    pub fn velocity_axis(&self) -> &[f64] {
        &self.velocity_axis
    }

    pub fn into_parts(self) -> (Array2<f64>, Vec<f64>, Vec<f64>) {
        (self.magnitude, self.range_axis, self.velocity_axis)
    }
}

/// Windowed 2D FFT from beat matrix to Range-Doppler Map.
pub struct RangeDopplerProcessor {
    params: RadarParameters,
    window: WindowKind,
    range_window: Vec<f64>,
    doppler_window: Vec<f64>,
    range_fft: FftHelper,
    doppler_fft: FftHelper,
    logger: LogManager,
}

impl RangeDopplerProcessor {
    pub fn new(params: RadarParameters, window: WindowKind) -> Self {
        let ns = params.num_samples();
        let nc = params.num_chirps();
        Self {
            params,
            window,
            range_window: window.coefficients(ns),
            doppler_window: window.coefficients(nc),
            range_fft: FftHelper::new(ns),
            doppler_fft: FftHelper::new(nc),
            logger: LogManager::new("rdm"),
        }
    }

    pub fn window(&self) -> WindowKind {
        self.window
    }

    /// `k · max_range / Ns` for `k = 0..Ns`.
    pub fn range_axis(&self) -> Vec<f64> {
        let spacing = self.params.range_bin_spacing();
        (0..self.params.num_samples())
            .map(|k| k as f64 * spacing)
            .collect()
    }

    /// `(i - ⌊Nc/2⌋) · velocity_resolution`, matching the recentred Doppler rows.
    pub fn velocity_axis(&self) -> Vec<f64> {
        let nc = self.params.num_chirps();
        let center = (nc / 2) as f64;
        let resolution = self.params.velocity_resolution();
        (0..nc).map(|i| (i as f64 - center) * resolution).collect()
    }

    pub fn process(&self, beat: &BeatMatrix) -> SimResult<RangeDopplerMap> {
        let nc = self.params.num_chirps();
        let ns = self.params.num_samples();
        if beat.dim() != (nc, ns) {
            return Err(SimError::ShapeMismatch {
                expected: (nc, ns),
                actual: beat.dim(),
            });
        }

        let mut spectrum = beat.to_owned();
        for ((chirp, sample), value) in spectrum.indexed_iter_mut() {
            *value *= self.doppler_window[chirp] * self.range_window[sample];
        }

        // Range along fast time (one-sided), then Doppler along slow time.
        transform_lanes(&self.range_fft, &mut spectrum, Axis(1));
        transform_lanes(&self.doppler_fft, &mut spectrum, Axis(0));

        let half = nc / 2;
        let magnitude =
            Array2::from_shape_fn((nc, ns), |(row, bin)| spectrum[[(row + nc - half) % nc, bin]].norm());

        self.logger
            .record(&format!("processed {}x{} RDM with {:?} window", nc, ns, self.window));

        Ok(RangeDopplerMap {
            magnitude,
            range_axis: self.range_axis(),
            velocity_axis: self.velocity_axis(),
        })
    }
}

fn transform_lanes(fft: &FftHelper, data: &mut Array2<Complex64>, axis: Axis) {
    let mut buffer = vec![Complex64::zero(); data.len_of(axis)];
    for mut lane in data.lanes_mut(axis) {
        for (dst, src) in buffer.iter_mut().zip(lane.iter()) {
            *dst = *src;
        }
        fft.process(&mut buffer);
        for (dst, src) in lane.iter_mut().zip(&buffer) {
            *dst = *src;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RadarConfig;
    use crate::math::phasor;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn params() -> RadarParameters {
        RadarConfig {
            num_chirps: 32,
            num_samples: 64,
            ..RadarConfig::default()
        }
        .validate()
        .unwrap()
    }

    /// Tone with `range_cycles` per chirp along fast time and
    /// `doppler_cycles` per frame along slow time.
    fn tone(params: &RadarParameters, range_cycles: f64, doppler_cycles: f64) -> BeatMatrix {
        let nc = params.num_chirps();
        let ns = params.num_samples();
        BeatMatrix::from_shape_fn((nc, ns), |(c, n)| {
            phasor(range_cycles * n as f64 / ns as f64 + doppler_cycles * c as f64 / nc as f64)
        })
    }

    #[test]
    fn rejects_wrong_shape() {
        let processor = RangeDopplerProcessor::new(params(), WindowKind::Hann);
        let beat = BeatMatrix::zeros((64, 32));
        assert!(matches!(
            processor.process(&beat),
            Err(SimError::ShapeMismatch {
                expected: (32, 64),
                actual: (64, 32)
            })
        ));
    }

    #[test]
    fn axes_follow_radar_parameters() {
        let params = params();
        let processor = RangeDopplerProcessor::new(params, WindowKind::Hann);

        let range = processor.range_axis();
        assert_eq!(range.len(), 64);
        assert_eq!(range[0], 0.0);
        assert!(range.windows(2).all(|w| w[1] > w[0]));
        assert_relative_eq!(range[1], params.max_range() / 64.0, max_relative = 1e-12);

        let velocity = processor.velocity_axis();
        assert_eq!(velocity.len(), 32);
        assert_eq!(velocity[16], 0.0);
        assert_relative_eq!(velocity[0], -16.0 * params.velocity_resolution(), max_relative = 1e-12);
        assert_relative_eq!(velocity[17] - velocity[16], params.velocity_resolution(), max_relative = 1e-9);
    }

    #[test]
    fn odd_chirp_count_centres_zero_velocity() {
        let params = RadarConfig {
            num_chirps: 5,
            num_samples: 8,
            ..RadarConfig::default()
        }
        .validate()
        .unwrap();
        let velocity = RangeDopplerProcessor::new(params, WindowKind::Hann).velocity_axis();
        assert_eq!(velocity[2], 0.0);
        assert_relative_eq!(velocity[0], -velocity[4], max_relative = 1e-12);
    }

    #[test]
    fn tone_peaks_at_its_bins_for_every_window() {
        let params = params();
        let beat = tone(&params, 20.0, -5.0);
        for window in [
            WindowKind::Hann,
            WindowKind::Hamming,
            WindowKind::Blackman,
            WindowKind::Rectangular,
        ] {
            let rdm = RangeDopplerProcessor::new(params, window).process(&beat).unwrap();
            let peak = rdm.peak().unwrap();
            assert_eq!((peak.doppler_bin, peak.range_bin), (16 - 5, 20), "{:?}", window);
        }
    }

    #[test]
    fn rectangular_window_preserves_tone_energy() {
        let params = params();
        let beat = tone(&params, 7.0, 3.0);
        let rdm = RangeDopplerProcessor::new(params, WindowKind::Rectangular)
            .process(&beat)
            .unwrap();
        assert_abs_diff_eq!(rdm.magnitude()[[16 + 3, 7]], 32.0 * 64.0, epsilon = 1e-6);
        assert_abs_diff_eq!(rdm.magnitude()[[16, 7]], 0.0, epsilon = 1e-6);
    }

    #[test]
    fn magnitude_is_non_negative_and_deterministic() {
        let params = params();
        let beat = tone(&params, 11.3, 2.7);
        let processor = RangeDopplerProcessor::new(params, WindowKind::Hann);
        let a = processor.process(&beat).unwrap();
        let b = processor.process(&beat).unwrap();
        assert_eq!(a, b);
        assert!(a.magnitude().iter().all(|&m| m >= 0.0));
    }
}
