use thiserror::Error;
#[derive(Debug, Error)]
pub enum TdrError {
    #[error("sample rate must be finite and greater than zero, got {0}")]
    InvalidSampleRate(f64),
    #[error("probe duration must be finite and greater than zero, got {0}")]
    InvalidDuration(f64),
    #[error("sample rate and duration yield {0} samples; at least 2 are required")]
    TooFewSamples(usize),
    #[error("cutoff {cutoff_hz} Hz must lie strictly between 0 and the Nyquist frequency {nyquist_hz} Hz")]
    InvalidCutoff { cutoff_hz: f64, nyquist_hz: f64 },
    #[error("filter order must be between 1 and 20, got {0}")]
    InvalidFilterOrder(usize),
    #[error("humidity must lie in [0, 1], got {0}")]
    InvalidHumidity(f64),
    #[error("invalid value for {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
    #[error("length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("frequency axis mismatch at bin {bin}: spectrum has {spectrum_hz} Hz, transfer function has {transfer_hz} Hz")]
    FrequencyAxisMismatch {
        bin: usize,
        spectrum_hz: f64,
        transfer_hz: f64,
    },
    #[error("singular evaluation at bin {bin} ({frequency_hz} Hz)")]
    SingularEvaluation { bin: usize, frequency_hz: f64 },
    #[error("failed to render plot: {0}")]
    Plot(String),
}
impl TdrError {
    /// True for the fail-fast family raised before any computation starts.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            TdrError::InvalidSampleRate(_)
                | TdrError::InvalidDuration(_)
                | TdrError::TooFewSamples(_)
                | TdrError::InvalidCutoff { .. }
                | TdrError::InvalidFilterOrder(_)
                | TdrError::InvalidHumidity(_)
                | TdrError::InvalidParameter { .. }
        )
    }
}
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for TdrError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        TdrError::Plot(format!("{value:?}"))
    }
}
impl From<image::ImageError> for TdrError {
    fn from(value: image::ImageError) -> Self {
        TdrError::Plot(value.to_string())
    }
}
