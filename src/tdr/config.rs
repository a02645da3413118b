use serde::{Deserialize, Serialize};
use crate::tdr::TdrError;
/// Probe pulse synthesis settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseConfig {
    pub sample_rate_hz: f64,
    pub duration_s: f64,
    pub center_frequency_hz: f64,
    /// Exponential envelope decay rate (1/s).
    pub decay_per_s: f64,
}
impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 1.0e6,
            duration_s: 1.0e-3,
            center_frequency_hz: 100.0e3,
            decay_per_s: 5.0e3,
        }
    }
}
impl PulseConfig {
    /// floor(fs * D)
    pub fn sample_count(&self) -> usize {
        (self.sample_rate_hz * self.duration_s).floor() as usize
    }
    pub fn nyquist_hz(&self) -> f64 {
        self.sample_rate_hz * 0.5
    }
}
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub cutoff_hz: f64,
    pub order: usize,
}
impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            cutoff_hz: 150.0e3,
            order: 4,
        }
    }
}
/// Transmission-line constants shared by every humidity level.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineConfig {
    pub inductance_h_per_m: f64,
    pub reference_impedance_ohms: f64,
    pub probe_length_m: f64,
}
impl Default for LineConfig {
    fn default() -> Self {
        Self {
            inductance_h_per_m: 1.0e-6,
            reference_impedance_ohms: 50.0,
            probe_length_m: 1.0,
        }
    }
}
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub pulse: PulseConfig,
    pub filter: FilterConfig,
    pub line: LineConfig,
    pub humidity_levels: Vec<f64>,
    /// Magnitudes below this are treated as exact zeros when guarding divisions.
    pub singular_epsilon: f64,
}
impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            pulse: PulseConfig::default(),
            filter: FilterConfig::default(),
            line: LineConfig::default(),
            humidity_levels: vec![0.1, 0.3, 0.5, 0.7, 0.9],
            singular_epsilon: 1.0e-12,
        }
    }
}
impl SimulationConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
    pub fn validate(&self) -> Result<(), TdrError> {
        let pulse = &self.pulse;
        if !(pulse.sample_rate_hz.is_finite() && pulse.sample_rate_hz > 0.0) {
            return Err(TdrError::InvalidSampleRate(pulse.sample_rate_hz));
        }
        if !(pulse.duration_s.is_finite() && pulse.duration_s > 0.0) {
            return Err(TdrError::InvalidDuration(pulse.duration_s));
        }
        let samples = pulse.sample_count();
        if samples < 2 {
            return Err(TdrError::TooFewSamples(samples));
        }
        positive("pulse.center_frequency_hz", pulse.center_frequency_hz)?;
        positive("pulse.decay_per_s", pulse.decay_per_s)?;
        validate_cutoff(self.filter.cutoff_hz, pulse.sample_rate_hz)?;
        validate_order(self.filter.order)?;
        positive("line.inductance_h_per_m", self.line.inductance_h_per_m)?;
        positive(
            "line.reference_impedance_ohms",
            self.line.reference_impedance_ohms,
        )?;
        if !(self.line.probe_length_m.is_finite() && self.line.probe_length_m >= 0.0) {
            return Err(TdrError::InvalidParameter {
                name: "line.probe_length_m",
                value: self.line.probe_length_m,
            });
        }
        for &humidity in &self.humidity_levels {
            validate_humidity(humidity)?;
        }
        positive("singular_epsilon", self.singular_epsilon)
    }
}
pub(crate) fn validate_cutoff(cutoff_hz: f64, sample_rate_hz: f64) -> Result<(), TdrError> {
    let nyquist_hz = sample_rate_hz * 0.5;
    if !(cutoff_hz > 0.0 && cutoff_hz < nyquist_hz) {
        return Err(TdrError::InvalidCutoff {
            cutoff_hz,
            nyquist_hz,
        });
    }
    Ok(())
}
pub(crate) fn validate_order(order: usize) -> Result<(), TdrError> {
    if !(1..=20).contains(&order) {
        return Err(TdrError::InvalidFilterOrder(order));
    }
    Ok(())
}
pub(crate) fn validate_humidity(humidity: f64) -> Result<(), TdrError> {
    if !(0.0..=1.0).contains(&humidity) {
        return Err(TdrError::InvalidHumidity(humidity));
    }
    Ok(())
}
fn positive(name: &'static str, value: f64) -> Result<(), TdrError> {
    if !(value.is_finite() && value > 0.0) {
        return Err(TdrError::InvalidParameter { name, value });
    }
    Ok(())
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn default_config_is_valid() {
        let config = SimulationConfig::default();
        config.validate().unwrap();
        assert_eq!(config.pulse.sample_count(), 1000);
        assert_eq!(config.humidity_levels.len(), 5);
    }
    #[test]
    fn cutoff_at_nyquist_is_rejected() {
        let mut config = SimulationConfig::default();
        config.filter.cutoff_hz = 500.0e3;
        assert!(matches!(
            config.validate(),
            Err(TdrError::InvalidCutoff { .. })
        ));
    }
    #[test]
    fn invalid_static_parameters_fail_fast() {
        let mut config = SimulationConfig::default();
        config.pulse.sample_rate_hz = 0.0;
        assert!(matches!(
            config.validate(),
            Err(TdrError::InvalidSampleRate(_))
        ));
        let mut config = SimulationConfig::default();
        config.pulse.duration_s = -1.0;
        assert!(matches!(config.validate(), Err(TdrError::InvalidDuration(_))));
        let mut config = SimulationConfig::default();
        config.filter.order = 0;
        assert!(matches!(
            config.validate(),
            Err(TdrError::InvalidFilterOrder(0))
        ));
        let mut config = SimulationConfig::default();
        config.humidity_levels.push(1.2);
        assert!(matches!(config.validate(), Err(TdrError::InvalidHumidity(_))));
        let mut config = SimulationConfig::default();
        config.humidity_levels.push(f64::NAN);
        assert!(matches!(config.validate(), Err(TdrError::InvalidHumidity(_))));
    }
    #[test]
    fn partial_json_overrides_only_named_fields() {
        let config = SimulationConfig::from_json_str(
            r#"{ "filter": { "order": 2 }, "humidity_levels": [0.0, 1.0] }"#,
        )
        .unwrap();
        assert_eq!(config.filter.order, 2);
        assert_eq!(config.filter.cutoff_hz, 150.0e3);
        assert_eq!(config.humidity_levels, vec![0.0, 1.0]);
        assert_eq!(config.line, LineConfig::default());
        config.validate().unwrap();
    }
}
