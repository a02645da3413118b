use rustfft::num_complex::Complex64;
use crate::tdr::fft::{Spectrum, SpectrumTransformer};
use crate::tdr::soil::TransferFunction;
use crate::tdr::{Signal, TdrError};
/// Modulates a pulse by the line response `exp(-γ(f) ℓ)` in the frequency domain.
pub struct PropagationApplier {
    transformer: SpectrumTransformer,
    probe_length_m: f64,
}
impl PropagationApplier {
    pub fn new(signal_len: usize, probe_length_m: f64) -> Self {
        Self {
            transformer: SpectrumTransformer::with_len(signal_len),
            probe_length_m,
        }
    }
    pub fn probe_length_m(&self) -> f64 {
        self.probe_length_m
    }
    pub fn spectrum(&self, signal: &Signal) -> Result<Spectrum, TdrError> {
        self.transformer.forward(signal)
    }
    pub fn apply(&self, signal: &Signal, transfer: &TransferFunction) -> Result<Signal, TdrError> {
        let spectrum = self.spectrum(signal)?;
        self.apply_to_spectrum(&spectrum, transfer)
    }
    /// Same as [`apply`](Self::apply) for a pulse whose spectrum is already known.
    pub fn apply_to_spectrum(
        &self,
        spectrum: &Spectrum,
        transfer: &TransferFunction,
    ) -> Result<Signal, TdrError> {
        check_axis(spectrum, transfer)?;
        let factor: Vec<Complex64> = transfer.propagation_factor(self.probe_length_m);
        let modulated = spectrum.multiplied_by(&factor)?;
        self.transformer.inverse(&modulated)
    }
}
fn check_axis(spectrum: &Spectrum, transfer: &TransferFunction) -> Result<(), TdrError> {
    if spectrum.frequencies_hz.len() != transfer.frequencies_hz.len() {
        return Err(TdrError::LengthMismatch {
            expected: spectrum.frequencies_hz.len(),
            actual: transfer.frequencies_hz.len(),
        });
    }
    let mismatch = spectrum
        .frequencies_hz
        .iter()
        .zip(&transfer.frequencies_hz)
        .position(|(a, b)| a != b);
    match mismatch {
        Some(bin) => Err(TdrError::FrequencyAxisMismatch {
            bin,
            spectrum_hz: spectrum.frequencies_hz[bin],
            transfer_hz: transfer.frequencies_hz[bin],
        }),
        None => Ok(()),
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::tdr::config::PulseConfig;
    use crate::tdr::fft::rfft_frequencies;
    use crate::tdr::signal::synthesize_pulse;
    use crate::tdr::soil::SoilElectricalParameters;
    fn transfer_for(humidity: f64, pulse: &Signal) -> TransferFunction {
        let p = SoilElectricalParameters::for_humidity(humidity, 1.0e-6).unwrap();
        let freqs = rfft_frequencies(pulse.len(), pulse.sample_rate_hz());
        TransferFunction::evaluate(p, &freqs, 1e-12)
    }
    #[test]
    fn reflected_signal_keeps_length_and_is_attenuated() {
        let pulse = synthesize_pulse(&PulseConfig::default()).unwrap();
        let applier = PropagationApplier::new(pulse.len(), 1.0);
        for humidity in [0.0, 0.5, 1.0] {
            let out = applier.apply(&pulse, &transfer_for(humidity, &pulse)).unwrap();
            assert_eq!(out.len(), pulse.len());
            assert!(out.samples().iter().all(|v| v.is_finite()));
            assert!(out.rms() <= pulse.rms() + 1e-12);
        }
    }
    #[test]
    fn zero_length_probe_is_identity() {
        let pulse = synthesize_pulse(&PulseConfig {
            duration_s: 0.9995e-3,
            ..PulseConfig::default()
        })
        .unwrap();
        assert_eq!(pulse.len(), 999);
        let applier = PropagationApplier::new(pulse.len(), 0.0);
        let out = applier.apply(&pulse, &transfer_for(0.3, &pulse)).unwrap();
        for (a, b) in pulse.samples().iter().zip(out.samples()) {
            assert!((a - b).abs() < 1e-12);
        }
    }
    #[test]
    fn output_is_reproducible_and_humidity_dependent() {
        let pulse = synthesize_pulse(&PulseConfig::default()).unwrap();
        let applier = PropagationApplier::new(pulse.len(), 1.0);
        let wet = transfer_for(0.9, &pulse);
        let first = applier.apply(&pulse, &wet).unwrap();
        let second = applier.apply(&pulse, &wet).unwrap();
        assert_eq!(first, second);
        let dry = applier.apply(&pulse, &transfer_for(0.1, &pulse)).unwrap();
        assert_ne!(first, dry);
    }
    #[test]
    fn rejects_transfer_on_a_different_axis() {
        let pulse = synthesize_pulse(&PulseConfig::default()).unwrap();
        let applier = PropagationApplier::new(pulse.len(), 1.0);
        let p = SoilElectricalParameters::for_humidity(0.5, 1.0e-6).unwrap();
        let short = TransferFunction::evaluate(p, &[0.0, 1.0], 1e-12);
        assert!(matches!(
            applier.apply(&pulse, &short),
            Err(TdrError::LengthMismatch { .. })
        ));
        let shifted: Vec<f64> = rfft_frequencies(pulse.len(), 2.0e6);
        let wrong = TransferFunction::evaluate(p, &shifted, 1e-12);
        assert!(matches!(
            applier.apply(&pulse, &wrong),
            Err(TdrError::FrequencyAxisMismatch { bin: 1, .. })
        ));
    }
}
