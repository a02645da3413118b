use std::sync::Arc;
use rustfft::{num_complex::Complex64, Fft, FftPlanner};
use crate::tdr::{Signal, TdrError};
/// One-sided spectrum of a real signal: bins at k·fs/N for k in 0..=N/2.
#[derive(Clone, Debug)]
pub struct Spectrum {
    pub sample_rate_hz: f64,
    /// Length of the time-domain signal this spectrum belongs to.
    pub signal_len: usize,
    pub frequencies_hz: Vec<f64>,
    pub bins: Vec<Complex64>,
}
impl Spectrum {
    pub fn len(&self) -> usize {
        self.bins.len()
    }
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }
    /// Elementwise product with a transfer factor defined on the same axis.
    pub fn multiplied_by(&self, factor: &[Complex64]) -> Result<Spectrum, TdrError> {
        if factor.len() != self.bins.len() {
            return Err(TdrError::LengthMismatch {
                expected: self.bins.len(),
                actual: factor.len(),
            });
        }
        Ok(Spectrum {
            sample_rate_hz: self.sample_rate_hz,
            signal_len: self.signal_len,
            frequencies_hz: self.frequencies_hz.clone(),
            bins: self.bins.iter().zip(factor).map(|(x, h)| x * h).collect(),
        })
    }
}
/// Frequency axis of a length-`n` real transform.
pub fn rfft_frequencies(n: usize, sample_rate_hz: f64) -> Vec<f64> {
    (0..=n / 2)
        .map(|k| k as f64 * sample_rate_hz / n as f64)
        .collect()
}
/// Forward/inverse real-input transform pair for one signal length.
pub struct SpectrumTransformer {
    len: usize,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
}
impl SpectrumTransformer {
    pub fn with_len(len: usize) -> Self {
        let mut planner = FftPlanner::<f64>::new();
        Self {
            len,
            forward: planner.plan_fft_forward(len),
            inverse: planner.plan_fft_inverse(len),
        }
    }
    pub fn len(&self) -> usize {
        self.len
    }
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
    /// Unnormalized forward transform, keeping the non-negative half.
    pub fn forward(&self, signal: &Signal) -> Result<Spectrum, TdrError> {
        if signal.len() != self.len {
            return Err(TdrError::LengthMismatch {
                expected: self.len,
                actual: signal.len(),
            });
        }
        let mut buffer: Vec<Complex64> = signal
            .samples()
            .iter()
            .map(|&v| Complex64::new(v, 0.0))
            .collect();
        self.forward.process(&mut buffer);
        buffer.truncate(self.len / 2 + 1);
        Ok(Spectrum {
            sample_rate_hz: signal.sample_rate_hz(),
            signal_len: self.len,
            frequencies_hz: rfft_frequencies(self.len, signal.sample_rate_hz()),
            bins: buffer,
        })
    }
    /// Rebuilds the Hermitian spectrum and returns the real part of the
    /// normalized inverse, always `signal_len` samples long.
    pub fn inverse(&self, spectrum: &Spectrum) -> Result<Signal, TdrError> {
        let n = self.len;
        if spectrum.signal_len != n {
            return Err(TdrError::LengthMismatch {
                expected: n,
                actual: spectrum.signal_len,
            });
        }
        if spectrum.bins.len() != n / 2 + 1 {
            return Err(TdrError::LengthMismatch {
                expected: n / 2 + 1,
                actual: spectrum.bins.len(),
            });
        }
        let mut buffer = vec![Complex64::ZERO; n];
        for (k, &bin) in spectrum.bins.iter().enumerate() {
            buffer[k] = bin;
            if k > 0 && n - k != k {
                buffer[n - k] = bin.conj();
            }
        }
        // these bins are their own mirror image and must be real
        buffer[0].im = 0.0;
        if n % 2 == 0 {
            buffer[n / 2].im = 0.0;
        }
        self.inverse.process(&mut buffer);
        let scale = 1.0 / n as f64;
        let samples = buffer.iter().map(|c| c.re * scale).collect();
        Signal::new(spectrum.sample_rate_hz, samples)
    }
}
