use log::{debug, info};
use rayon::prelude::*;
use rustfft::num_complex::Complex64;
use crate::tdr::config::SimulationConfig;
use crate::tdr::fft::Spectrum;
use crate::tdr::filter::ButterworthLowpass;
use crate::tdr::propagation::PropagationApplier;
use crate::tdr::signal::synthesize_pulse;
use crate::tdr::soil::{SoilElectricalParameters, TransferFunction};
use crate::tdr::sparams::SParameters;
use crate::tdr::{Signal, TdrError};
/// Everything computed for one humidity level.
#[derive(Clone, Debug)]
pub struct HumidityTrace {
    pub humidity: f64,
    pub parameters: SoilElectricalParameters,
    pub reflected: Signal,
    pub frequencies_hz: Vec<f64>,
    pub reflection: Vec<Complex64>,
    pub transmission: Vec<f64>,
    pub s11_db: Vec<f64>,
    /// Frequency bins that went through a singular-value substitution.
    pub singular_bins: Vec<usize>,
}
/// Per-humidity traces in the order the levels were requested.
#[derive(Clone, Debug, Default)]
pub struct SweepResult {
    traces: Vec<HumidityTrace>,
}
impl SweepResult {
    pub fn len(&self) -> usize {
        self.traces.len()
    }
    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &HumidityTrace> {
        self.traces.iter()
    }
    pub fn traces(&self) -> &[HumidityTrace] {
        &self.traces
    }
    /// First trace computed for exactly this humidity.
    pub fn get(&self, humidity: f64) -> Option<&HumidityTrace> {
        self.traces.iter().find(|t| t.humidity == humidity)
    }
    /// Shared time axis of the reflected signals.
    pub fn time_axis(&self) -> Vec<f64> {
        self.traces
            .first()
            .map(|t| t.reflected.time_axis())
            .unwrap_or_default()
    }
}
impl<'a> IntoIterator for &'a SweepResult {
    type Item = &'a HumidityTrace;
    type IntoIter = std::slice::Iter<'a, HumidityTrace>;
    fn into_iter(self) -> Self::IntoIter {
        self.traces.iter()
    }
}
/// Runs the soil model, S-parameter derivation and propagation for each humidity.
pub struct SweepOrchestrator {
    config: SimulationConfig,
    filtered_pulse: Signal,
    pulse_spectrum: Spectrum,
    applier: PropagationApplier,
}
impl SweepOrchestrator {
    /// Validates `config`, then synthesizes and filters the probe pulse once.
    pub fn from_config(config: SimulationConfig) -> Result<Self, TdrError> {
        config.validate()?;
        let pulse = synthesize_pulse(&config.pulse)?;
        let filter = ButterworthLowpass::from_config(&config.filter, config.pulse.sample_rate_hz)?;
        let filtered = filter.apply(&pulse)?;
        Self::with_filtered_pulse(config, filtered)
    }
    /// Uses a caller-built pulse. Timing in `config.pulse` is ignored in favour
    /// of the pulse's own sample rate and length.
    pub fn with_filtered_pulse(
        config: SimulationConfig,
        filtered_pulse: Signal,
    ) -> Result<Self, TdrError> {
        config.validate()?;
        if filtered_pulse.len() < 2 {
            return Err(TdrError::TooFewSamples(filtered_pulse.len()));
        }
        let applier = PropagationApplier::new(filtered_pulse.len(), config.line.probe_length_m);
        let pulse_spectrum = applier.spectrum(&filtered_pulse)?;
        Ok(Self {
            config,
            filtered_pulse,
            pulse_spectrum,
            applier,
        })
    }
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
    pub fn filtered_pulse(&self) -> &Signal {
        &self.filtered_pulse
    }
    pub fn frequencies_hz(&self) -> &[f64] {
        &self.pulse_spectrum.frequencies_hz
    }
    /// Sweeps the configured humidity levels.
    pub fn run(&self) -> Result<SweepResult, TdrError> {
        self.run_levels(&self.config.humidity_levels)
    }
    /// Levels are validated up front; each level is then computed independently
    /// and in parallel.
    pub fn run_levels(&self, humidity_levels: &[f64]) -> Result<SweepResult, TdrError> {
        let inductance = self.config.line.inductance_h_per_m;
        let parameters = humidity_levels
            .iter()
            .map(|&h| SoilElectricalParameters::for_humidity(h, inductance))
            .collect::<Result<Vec<_>, _>>()?;
        info!(
            "sweeping {} humidity levels over {} frequency bins",
            parameters.len(),
            self.pulse_spectrum.len()
        );
        let traces = parameters
            .into_par_iter()
            .map(|p| self.trace(p))
            .collect::<Result<Vec<_>, _>>()?;
        info!("sweep finished");
        Ok(SweepResult { traces })
    }
    fn trace(&self, parameters: SoilElectricalParameters) -> Result<HumidityTrace, TdrError> {
        let epsilon = self.config.singular_epsilon;
        let transfer =
            TransferFunction::evaluate(parameters, &self.pulse_spectrum.frequencies_hz, epsilon);
        let sparams =
            SParameters::derive(&transfer, self.config.line.reference_impedance_ohms, epsilon);
        let reflected = self.applier.apply_to_spectrum(&self.pulse_spectrum, &transfer)?;
        debug!(
            "humidity {}: R = {:.4} Ω/m, C = {:.3e} F/m, G = {:.3e} S/m, {} singular bins",
            parameters.humidity,
            parameters.resistance_ohm_per_m,
            parameters.capacitance_f_per_m,
            parameters.conductance_s_per_m,
            sparams.singular_bins.len()
        );
        let s11_db = sparams.s11_db();
        Ok(HumidityTrace {
            humidity: parameters.humidity,
            parameters,
            reflected,
            frequencies_hz: sparams.frequencies_hz,
            reflection: sparams.reflection,
            transmission: sparams.transmission,
            s11_db,
            singular_bins: sparams.singular_bins,
        })
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    fn orchestrator() -> SweepOrchestrator {
        SweepOrchestrator::from_config(SimulationConfig::default()).unwrap()
    }
    #[test]
    fn preserves_input_order() {
        let levels = [0.9, 0.1, 0.5, 0.1, 0.0];
        let result = orchestrator().run_levels(&levels).unwrap();
        let seen: Vec<f64> = result.iter().map(|t| t.humidity).collect();
        assert_eq!(seen, levels.to_vec());
        assert_eq!(result.time_axis().len(), 1000);
        for trace in &result {
            assert_eq!(trace.reflected.len(), 1000);
            assert_eq!(trace.frequencies_hz.len(), 501);
            assert_eq!(trace.s11_db.len(), 501);
        }
    }
    #[test]
    fn default_sweep_matches_configured_levels() {
        let result = orchestrator().run().unwrap();
        assert_eq!(result.len(), 5);
        assert!(result.get(0.7).is_some());
        assert!(result.get(0.2).is_none());
    }
    #[test]
    fn dry_and_wet_soil_are_distinguishable_at_every_frequency() {
        let result = orchestrator().run_levels(&[0.1, 0.9]).unwrap();
        let dry = result.get(0.1).unwrap();
        let wet = result.get(0.9).unwrap();
        for (a, b) in dry.s11_db.iter().zip(&wet.s11_db) {
            assert!((a - b).abs() > 1e-6, "{a} vs {b}");
        }
    }
    #[test]
    fn dry_soil_at_dc_yields_only_finite_values() {
        let result = orchestrator().run_levels(&[0.0, 0.5]).unwrap();
        let dry = result.get(0.0).unwrap();
        assert_eq!(dry.singular_bins, vec![0]);
        assert_eq!(dry.reflection[0], Complex64::new(1.0, 0.0));
        for trace in &result {
            assert!(trace.reflected.samples().iter().all(|v| v.is_finite()));
            assert!(trace.s11_db.iter().all(|v| v.is_finite()));
            assert!(trace.reflection.iter().all(|g| g.is_finite()));
            assert!(trace.transmission.iter().all(|t| t.is_finite()));
        }
        // the singular level does not disturb its neighbour
        let alone = orchestrator().run_levels(&[0.5]).unwrap();
        assert_eq!(alone.get(0.5).unwrap().s11_db, result.get(0.5).unwrap().s11_db);
        assert!(result.get(0.5).unwrap().singular_bins.is_empty());
    }
    #[test]
    fn invalid_levels_fail_before_any_computation() {
        let err = orchestrator().run_levels(&[0.5, 1.5]).unwrap_err();
        assert!(err.is_configuration());
        let mut config = SimulationConfig::default();
        config.filter.cutoff_hz = 600.0e3;
        assert!(matches!(
            SweepOrchestrator::from_config(config),
            Err(TdrError::InvalidCutoff { .. })
        ));
    }
    #[test]
    fn end_to_end_scenario_reference_point() {
        let orchestrator = orchestrator();
        let result = orchestrator.run_levels(&[0.5]).unwrap();
        let trace = result.get(0.5).unwrap();
        // bin 100 sits at 100 kHz for fs = 1 MHz, N = 1000
        assert_eq!(trace.frequencies_hz[100], 100.0e3);
        let expected = Complex64::new(0.028628928867929768, -0.10607675432447466);
        assert!((trace.reflection[100] - expected).norm() < 1e-6 * expected.norm());
        assert!((trace.parameters.resistance_ohm_per_m - 1.8182).abs() < 1e-4);
    }
}
