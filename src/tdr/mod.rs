// src/tdr/mod.rs
pub mod config;
pub mod error;
pub mod fft;
pub mod filter;
pub mod plot;
pub mod propagation;
pub mod signal;
pub mod soil;
pub mod sparams;
pub mod sweep;
pub use config::{FilterConfig, LineConfig, PulseConfig, SimulationConfig};
pub use error::TdrError;
pub use fft::{rfft_frequencies, Spectrum, SpectrumTransformer};
pub use filter::ButterworthLowpass;
pub use plot::{render_s11_png, render_time_domain_png, PlotStyle};
pub use propagation::PropagationApplier;
pub use signal::{synthesize_pulse, Signal};
pub use soil::{principal_sqrt, SoilElectricalParameters, TransferFunction};
pub use sparams::{magnitude_db, reflection_coefficient, SParameters};
pub use sweep::{HumidityTrace, SweepOrchestrator, SweepResult};
