use num_complex::Complex64;

pub struct StatsHelper;

impl StatsHelper {
    pub fn rms(samples: &[f64]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        let sum_sq: f64 = samples.iter().map(|&v| v * v).sum();
        (sum_sq / samples.len() as f64).sqrt()
    }

    /// Mean of `|x|²` over complex samples.
    pub fn mean_power<'a, I>(samples: I) -> f64
    where
        I: IntoIterator<Item = &'a Complex64>,
    {
        let (sum, count) = samples
            .into_iter()
            .fold((0.0, 0usize), |(sum, count), s| (sum + s.norm_sqr(), count + 1));
        if count == 0 {
            0.0
        } else {
            sum / count as f64
        }
    }

    pub fn db_to_power_ratio(db: f64) -> f64 {
        10f64.powf(db / 10.0)
    }

    /// `20·log10(magnitude)`, floored so zero maps to a finite value.
    pub fn magnitude_to_db(magnitude: f64) -> f64 {
        20.0 * (magnitude.abs() + 1e-12).log10()
    }
}
