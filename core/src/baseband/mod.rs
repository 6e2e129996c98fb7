//! Optional impairments applied to a captured beat matrix.
//!
//! Every filter is a [`BasebandFilter`](crate::prelude::BasebandFilter) that
//! works in place and keeps the matrix shape. Random filters own a seeded
//! `StdRng`, so a given seed always reproduces the same frame.

pub mod calibration;
pub mod noise;

pub use calibration::{analytic_signal, DcOffset, IqImbalance, Normalize, PhaseNoise};
pub use noise::{Awgn, ClutterFloor};

use num_complex::Complex64;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Circular complex Gaussian sample with total power `2·σ²`.
fn complex_gaussian<R: Rng>(rng: &mut R, component: &Normal<f64>) -> Complex64 {
    Complex64::new(component.sample(rng), component.sample(rng))
}
