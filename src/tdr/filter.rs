//! Butterworth low-pass design (bilinear transform, cutoff pre-warped against
//! fs/2) realised as a cascade of second-order sections.
use std::f64::consts::PI;
use log::debug;
use rustfft::num_complex::Complex64;
use crate::tdr::config::{validate_cutoff, validate_order, FilterConfig};
use crate::tdr::{Signal, TdrError};
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BiquadCoeffs {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}
#[derive(Clone, Copy, Debug, Default)]
struct BiquadState {
    z1: f64,
    z2: f64,
}
#[derive(Clone, Copy, Debug)]
pub struct Biquad {
    coeffs: BiquadCoeffs,
    state: BiquadState,
}
impl Biquad {
    fn new(coeffs: BiquadCoeffs) -> Self {
        Self {
            coeffs,
            state: BiquadState::default(),
        }
    }
    pub fn coeffs(&self) -> BiquadCoeffs {
        self.coeffs
    }
    fn process(&mut self, input: f64) -> f64 {
        // Transposed direct form II
        let y = self.coeffs.b0 * input + self.state.z1;
        self.state.z1 = self.coeffs.b1 * input - self.coeffs.a1 * y + self.state.z2;
        self.state.z2 = self.coeffs.b2 * input - self.coeffs.a2 * y;
        y
    }
    fn response(&self, z_inv: Complex64) -> Complex64 {
        let c = &self.coeffs;
        let num = c.b0 + z_inv * (c.b1 + z_inv * c.b2);
        let den = 1.0 + z_inv * (c.a1 + z_inv * c.a2);
        num / den
    }
}
#[derive(Clone, Debug)]
pub struct ButterworthLowpass {
    cutoff_hz: f64,
    sample_rate_hz: f64,
    order: usize,
    sections: Vec<Biquad>,
}
impl ButterworthLowpass {
    pub fn design(cutoff_hz: f64, sample_rate_hz: f64, order: usize) -> Result<Self, TdrError> {
        if !(sample_rate_hz.is_finite() && sample_rate_hz > 0.0) {
            return Err(TdrError::InvalidSampleRate(sample_rate_hz));
        }
        validate_cutoff(cutoff_hz, sample_rate_hz)?;
        validate_order(order)?;
        let k = (PI * cutoff_hz / sample_rate_hz).tan();
        let mut sections = Vec::with_capacity(order.div_ceil(2));
        for pair in 0..order / 2 {
            // analog pole pair at angle (2·pair + 1)·π / (2n) from the imaginary axis
            let theta = PI * (2 * pair + 1) as f64 / (2 * order) as f64;
            let q = 1.0 / (2.0 * theta.sin());
            sections.push(Biquad::new(second_order_section(k, q)));
        }
        if order % 2 == 1 {
            sections.push(Biquad::new(first_order_section(k)));
        }
        debug!(
            "designed order-{order} Butterworth low-pass at {cutoff_hz} Hz (fs = {sample_rate_hz} Hz, {} sections)",
            sections.len()
        );
        Ok(Self {
            cutoff_hz,
            sample_rate_hz,
            order,
            sections,
        })
    }
    pub fn from_config(config: &FilterConfig, sample_rate_hz: f64) -> Result<Self, TdrError> {
        Self::design(config.cutoff_hz, sample_rate_hz, config.order)
    }
    pub fn cutoff_hz(&self) -> f64 {
        self.cutoff_hz
    }
    pub fn order(&self) -> usize {
        self.order
    }
    pub fn sections(&self) -> &[Biquad] {
        &self.sections
    }
    /// Causal filtering from zero initial state. The start-up transient is kept.
    pub fn apply(&self, input: &Signal) -> Result<Signal, TdrError> {
        if input.sample_rate_hz() != self.sample_rate_hz {
            return Err(TdrError::InvalidParameter {
                name: "signal.sample_rate_hz",
                value: input.sample_rate_hz(),
            });
        }
        let mut sections = self.sections.clone();
        let output = input
            .samples()
            .iter()
            .map(|&x| {
                sections
                    .iter_mut()
                    .fold(x, |value, section| section.process(value))
            })
            .collect();
        Ok(input.with_samples(output))
    }
    /// |H(e^{jω})| at `freq_hz`.
    pub fn magnitude_response(&self, freq_hz: f64) -> f64 {
        let omega = 2.0 * PI * freq_hz / self.sample_rate_hz;
        let z_inv = Complex64::from_polar(1.0, -omega);
        self.sections
            .iter()
            .map(|s| s.response(z_inv))
            .fold(Complex64::new(1.0, 0.0), |acc, h| acc * h)
            .norm()
    }
}
fn second_order_section(k: f64, q: f64) -> BiquadCoeffs {
    let k2 = k * k;
    let norm = 1.0 / (1.0 + k / q + k2);
    let b0 = k2 * norm;
    BiquadCoeffs {
        b0,
        b1: 2.0 * b0,
        b2: b0,
        a1: 2.0 * (k2 - 1.0) * norm,
        a2: (1.0 - k / q + k2) * norm,
    }
}
fn first_order_section(k: f64) -> BiquadCoeffs {
    let norm = 1.0 / (1.0 + k);
    BiquadCoeffs {
        b0: k * norm,
        b1: k * norm,
        b2: 0.0,
        a1: (k - 1.0) * norm,
        a2: 0.0,
    }
}
