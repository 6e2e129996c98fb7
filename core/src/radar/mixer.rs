use num_complex::Complex64;

use crate::prelude::Mixer;

/// Homodyne dechirp, `beat[n] = tx[n]·conj(rx[n])`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DechirpMixer;

impl Mixer for DechirpMixer {
    fn mix(&self, tx: &[Complex64], rx: &[Complex64]) -> Vec<Complex64> {
        debug_assert_eq!(tx.len(), rx.len(), "tx and rx must cover the same chirp");
        tx.iter().zip(rx).map(|(t, r)| t * r.conj()).collect()
    }
}
