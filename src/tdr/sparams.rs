//! One-port reflection against a real reference impedance.
//!
//! `transmission` is `1 - |Γ|²`, a lossless two-port proxy for the transmitted
//! power fraction. It is not S21 and does not satisfy energy conservation for
//! a lossy line.
use log::warn;
use rustfft::num_complex::Complex64;
use crate::tdr::soil::TransferFunction;
use crate::tdr::TdrError;
/// Γ substituted for singular bins: the open-circuit limit.
pub const OPEN_CIRCUIT_REFLECTION: Complex64 = Complex64::new(1.0, 0.0);
/// Floor applied to |Γ| before taking decibels (-200 dB).
pub const MIN_REFLECTION_MAGNITUDE: f64 = 1.0e-10;
#[derive(Clone, Debug)]
pub struct SParameters {
    pub reference_impedance_ohms: f64,
    pub frequencies_hz: Vec<f64>,
    pub reflection: Vec<Complex64>,
    pub transmission: Vec<f64>,
    /// Bins where Γ was replaced by [`OPEN_CIRCUIT_REFLECTION`].
    pub singular_bins: Vec<usize>,
    /// Bins where the transmission proxy fell outside [0, 1] and was clamped.
    pub clipped_bins: Vec<usize>,
}
impl SParameters {
    pub fn derive(
        transfer: &TransferFunction,
        reference_impedance_ohms: f64,
        epsilon: f64,
    ) -> Self {
        let n = transfer.len();
        let mut reflection = Vec::with_capacity(n);
        let mut transmission = Vec::with_capacity(n);
        let mut singular_bins = Vec::new();
        let mut clipped_bins = Vec::new();
        for (bin, (&freq_hz, impedance)) in transfer
            .frequencies_hz
            .iter()
            .zip(&transfer.impedance)
            .enumerate()
        {
            let gamma = match impedance {
                Some(z) => {
                    match reflection_coefficient(*z, reference_impedance_ohms, epsilon, bin, freq_hz) {
                        Ok(gamma) => gamma,
                        Err(err) => {
                            warn!("{err}: Z = -Z0, substituting open-circuit reflection");
                            singular_bins.push(bin);
                            OPEN_CIRCUIT_REFLECTION
                        }
                    }
                }
                None => {
                    singular_bins.push(bin);
                    OPEN_CIRCUIT_REFLECTION
                }
            };
            let (t, clipped) = transmission_proxy(gamma);
            if clipped {
                clipped_bins.push(bin);
            }
            reflection.push(gamma);
            transmission.push(t);
        }
        if !clipped_bins.is_empty() {
            warn!(
                "humidity {}: transmission proxy clamped to [0, 1] in {} bins",
                transfer.parameters.humidity,
                clipped_bins.len()
            );
        }
        Self {
            reference_impedance_ohms,
            frequencies_hz: transfer.frequencies_hz.clone(),
            reflection,
            transmission,
            singular_bins,
            clipped_bins,
        }
    }
    /// `20 log10 |Γ|` per bin.
    pub fn s11_db(&self) -> Vec<f64> {
        self.reflection.iter().map(|g| magnitude_db(*g)).collect()
    }
}
/// `(Z - Z0) / (Z + Z0)`, failing where `Z + Z0` vanishes.
pub fn reflection_coefficient(
    impedance: Complex64,
    reference_impedance_ohms: f64,
    epsilon: f64,
    bin: usize,
    frequency_hz: f64,
) -> Result<Complex64, TdrError> {
    let denominator = impedance + reference_impedance_ohms;
    if denominator.norm() < epsilon {
        return Err(TdrError::SingularEvaluation { bin, frequency_hz });
    }
    Ok((impedance - reference_impedance_ohms) / denominator)
}
/// `1 - |Γ|²` clamped to [0, 1]; the flag reports whether clamping occurred.
pub fn transmission_proxy(reflection: Complex64) -> (f64, bool) {
    let t = 1.0 - reflection.norm_sqr();
    let clamped = t.clamp(0.0, 1.0);
    (clamped, clamped != t)
}
pub fn magnitude_db(reflection: Complex64) -> f64 {
    20.0 * reflection.norm().max(MIN_REFLECTION_MAGNITUDE).log10()
}
