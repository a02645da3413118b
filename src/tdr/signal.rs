use std::f64::consts::PI;
use crate::tdr::config::PulseConfig;
use crate::tdr::TdrError;
/// Uniformly sampled real signal. Each pipeline stage yields a new one.
#[derive(Clone, Debug, PartialEq)]
pub struct Signal {
    sample_rate_hz: f64,
    start_time_s: f64,
    samples: Vec<f64>,
}
impl Signal {
    pub fn new(sample_rate_hz: f64, samples: Vec<f64>) -> Result<Self, TdrError> {
        if !(sample_rate_hz.is_finite() && sample_rate_hz > 0.0) {
            return Err(TdrError::InvalidSampleRate(sample_rate_hz));
        }
        Ok(Self {
            sample_rate_hz,
            start_time_s: 0.0,
            samples,
        })
    }
    /// Same timing as `self`, different samples.
    pub(crate) fn with_samples(&self, samples: Vec<f64>) -> Self {
        Self {
            sample_rate_hz: self.sample_rate_hz,
            start_time_s: self.start_time_s,
            samples,
        }
    }
    pub fn sample_rate_hz(&self) -> f64 {
        self.sample_rate_hz
    }
    pub fn start_time_s(&self) -> f64 {
        self.start_time_s
    }
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }
    pub fn len(&self) -> usize {
        self.samples.len()
    }
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate_hz
    }
    /// t_k = start + k / fs
    pub fn time_axis(&self) -> Vec<f64> {
        (0..self.samples.len())
            .map(|k| self.start_time_s + k as f64 / self.sample_rate_hz)
            .collect()
    }
    pub fn rms(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sum_sq: f64 = self.samples.iter().map(|v| v * v).sum();
        (sum_sq / self.samples.len() as f64).sqrt()
    }
    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }
}
/// Damped sinusoid `sin(2π f_c t) · exp(-α t)` sampled at `t_k = k / fs`.
pub fn synthesize_pulse(config: &PulseConfig) -> Result<Signal, TdrError> {
    if !(config.duration_s.is_finite() && config.duration_s > 0.0) {
        return Err(TdrError::InvalidDuration(config.duration_s));
    }
    let fs = config.sample_rate_hz;
    let omega = 2.0 * PI * config.center_frequency_hz;
    let samples = (0..config.sample_count())
        .map(|k| {
            let t = k as f64 / fs;
            (omega * t).sin() * (-config.decay_per_s * t).exp()
        })
        .collect();
    Signal::new(fs, samples)
}
