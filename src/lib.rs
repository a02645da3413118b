//! Time-domain reflectometry model of a soil-moisture probe.
//!
//! A damped sinusoidal pulse is band-limited by a Butterworth low-pass, then
//! shaped in the frequency domain by a humidity-dependent RLGC line. The same
//! line model yields the one-port reflection coefficient S11(f) against a
//! reference impedance. [`tdr::SweepOrchestrator`] runs the whole chain over a
//! list of humidity levels.
pub mod tdr;
