//! Humidity-parametrized RLGC line model.
//!
//! Per-unit-length parameters for humidity `h`:
//! - `R = 1 / (0.1 + 0.9 h)` Ω/m
//! - `C = (0.5 + 0.5 h) · 1e-9` F/m
//! - `G = 1e-3 · h` S/m
//! - `L` fixed by the line configuration (H/m)
//!
//! The propagation constant and characteristic impedance are always derived
//! together from one parameter snapshot by [`TransferFunction::evaluate`].
use std::f64::consts::PI;
use log::warn;
use rustfft::num_complex::Complex64;
use crate::tdr::config::validate_humidity;
use crate::tdr::TdrError;
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SoilElectricalParameters {
    pub humidity: f64,
    pub resistance_ohm_per_m: f64,
    pub inductance_h_per_m: f64,
    pub conductance_s_per_m: f64,
    pub capacitance_f_per_m: f64,
}
impl SoilElectricalParameters {
    pub fn for_humidity(humidity: f64, inductance_h_per_m: f64) -> Result<Self, TdrError> {
        validate_humidity(humidity)?;
        if !(inductance_h_per_m.is_finite() && inductance_h_per_m > 0.0) {
            return Err(TdrError::InvalidParameter {
                name: "line.inductance_h_per_m",
                value: inductance_h_per_m,
            });
        }
        Ok(Self {
            humidity,
            resistance_ohm_per_m: 1.0 / (0.1 + 0.9 * humidity),
            inductance_h_per_m,
            conductance_s_per_m: 1.0e-3 * humidity,
            capacitance_f_per_m: (0.5 + 0.5 * humidity) * 1.0e-9,
        })
    }
    /// `R + jωL`
    pub fn series_impedance(&self, freq_hz: f64) -> Complex64 {
        Complex64::new(
            self.resistance_ohm_per_m,
            2.0 * PI * freq_hz * self.inductance_h_per_m,
        )
    }
    /// `G + jωC`
    pub fn shunt_admittance(&self, freq_hz: f64) -> Complex64 {
        Complex64::new(
            self.conductance_s_per_m,
            2.0 * PI * freq_hz * self.capacitance_f_per_m,
        )
    }
}
/// Square root on the branch with `Re >= 0` (and `Im >= 0` on the imaginary axis).
pub fn principal_sqrt(z: Complex64) -> Complex64 {
    let root = z.sqrt();
    if root.re < 0.0 || (root.re == 0.0 && root.im < 0.0) {
        -root
    } else {
        root
    }
}
#[derive(Clone, Debug)]
pub struct TransferFunction {
    pub parameters: SoilElectricalParameters,
    pub frequencies_hz: Vec<f64>,
    /// γ(f), 1/m.
    pub propagation: Vec<Complex64>,
    /// Z(f), Ω. `None` where the shunt admittance vanishes.
    pub impedance: Vec<Option<Complex64>>,
    pub singular_bins: Vec<usize>,
}
impl TransferFunction {
    pub fn evaluate(
        parameters: SoilElectricalParameters,
        frequencies_hz: &[f64],
        epsilon: f64,
    ) -> Self {
        let mut propagation = Vec::with_capacity(frequencies_hz.len());
        let mut impedance = Vec::with_capacity(frequencies_hz.len());
        let mut singular_bins = Vec::new();
        for (bin, &freq_hz) in frequencies_hz.iter().enumerate() {
            let series = parameters.series_impedance(freq_hz);
            let shunt = parameters.shunt_admittance(freq_hz);
            propagation.push(principal_sqrt(series * shunt));
            match characteristic_impedance(series, shunt, epsilon, bin, freq_hz) {
                Ok(z) => impedance.push(Some(z)),
                Err(err) => {
                    warn!(
                        "humidity {}: {err}; impedance treated as open circuit",
                        parameters.humidity
                    );
                    singular_bins.push(bin);
                    impedance.push(None);
                }
            }
        }
        Self {
            parameters,
            frequencies_hz: frequencies_hz.to_vec(),
            propagation,
            impedance,
            singular_bins,
        }
    }
    pub fn len(&self) -> usize {
        self.frequencies_hz.len()
    }
    pub fn is_empty(&self) -> bool {
        self.frequencies_hz.is_empty()
    }
    /// `exp(-γ ℓ)` per bin.
    pub fn propagation_factor(&self, length_m: f64) -> Vec<Complex64> {
        self.propagation
            .iter()
            .map(|gamma| (-*gamma * length_m).exp())
            .collect()
    }
}
fn characteristic_impedance(
    series: Complex64,
    shunt: Complex64,
    epsilon: f64,
    bin: usize,
    frequency_hz: f64,
) -> Result<Complex64, TdrError> {
    if shunt.norm() < epsilon {
        return Err(TdrError::SingularEvaluation { bin, frequency_hz });
    }
    Ok(principal_sqrt(series / shunt))
}
#[cfg(test)]
mod tests {
    use super::*;
    const L: f64 = 1.0e-6;
    fn rel_close(actual: Complex64, expected: Complex64, tol: f64) -> bool {
        (actual - expected).norm() <= tol * expected.norm()
    }
    #[test]
    fn half_humidity_reference_values() {
        let p = SoilElectricalParameters::for_humidity(0.5, L).unwrap();
        assert!((p.resistance_ohm_per_m - 1.8181818181818181).abs() < 1e-12);
        assert!((p.capacitance_f_per_m - 0.75e-9).abs() < 1e-21);
        assert!((p.conductance_s_per_m - 5.0e-4).abs() < 1e-18);
        assert_eq!(p.inductance_h_per_m, 1.0e-6);
        let tf = TransferFunction::evaluate(p, &[100.0e3], 1e-12);
        assert!(rel_close(
            tf.propagation[0],
            Complex64::new(0.031102341229429634, 0.01882426234660073),
            1e-6
        ));
        assert!(rel_close(
            tf.impedance[0].unwrap(),
            Complex64::new(51.73405866208146, -11.109676896752108),
            1e-6
        ));
    }
    #[test]
    fn attenuation_is_never_negative() {
        let freqs: Vec<f64> = (1..=50).map(|k| k as f64 * 10.0e3).collect();
        for step in 0..=20 {
            let h = step as f64 / 20.0;
            let p = SoilElectricalParameters::for_humidity(h, L).unwrap();
            let tf = TransferFunction::evaluate(p, &freqs, 1e-12);
            assert!(tf.propagation.iter().all(|g| g.re >= 0.0));
            assert!(tf.impedance.iter().all(|z| z.map_or(false, |z| z.re >= 0.0)));
            assert!(tf.singular_bins.is_empty());
        }
    }
    #[test]
    fn parameters_are_monotonic_in_humidity() {
        let mut previous = SoilElectricalParameters::for_humidity(0.0, L).unwrap();
        for step in 1..=100 {
            let p = SoilElectricalParameters::for_humidity(step as f64 / 100.0, L).unwrap();
            assert!(p.capacitance_f_per_m >= previous.capacitance_f_per_m);
            assert!(p.conductance_s_per_m >= previous.conductance_s_per_m);
            assert!(p.resistance_ohm_per_m <= previous.resistance_ohm_per_m);
            assert!(p.resistance_ohm_per_m > 0.0 && p.capacitance_f_per_m > 0.0);
            previous = p;
        }
    }
    #[test]
    fn dry_soil_at_dc_is_flagged_not_infinite() {
        let p = SoilElectricalParameters::for_humidity(0.0, L).unwrap();
        let tf = TransferFunction::evaluate(p, &[0.0, 1.0e3], 1e-12);
        assert_eq!(tf.singular_bins, vec![0]);
        assert!(tf.impedance[0].is_none());
        assert!(tf.impedance[1].is_some());
        assert_eq!(tf.propagation[0], Complex64::ZERO);
        assert!(tf.propagation_factor(1.0).iter().all(|h| h.is_finite()));
    }
    #[test]
    fn principal_sqrt_picks_non_negative_real_part() {
        for z in [
            Complex64::new(-4.0, 0.0),
            Complex64::new(-1.0, -1e-300),
            Complex64::new(3.0, -4.0),
            Complex64::new(0.0, -2.0),
        ] {
            let r = principal_sqrt(z);
            assert!(r.re >= 0.0);
            assert!(rel_close(r * r, z, 1e-12));
        }
    }
    #[test]
    fn rejects_out_of_range_humidity() {
        assert!(matches!(
            SoilElectricalParameters::for_humidity(-0.1, L),
            Err(TdrError::InvalidHumidity(_))
        ));
        assert!(SoilElectricalParameters::for_humidity(0.5, 0.0).is_err());
    }
}
