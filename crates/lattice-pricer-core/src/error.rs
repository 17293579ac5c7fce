use thiserror::Error;

#[derive(Debug, Error)]
pub enum PricerError {
    /// Input rejected before any computation.
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    /// Degenerate parameters that would divide by zero (e.g. zero volatility).
    #[error("Domain error in {context}")]
    Domain { context: String },

    /// Risk-neutral probability outside [0, 1]: the rate/volatility/step
    /// regime admits arbitrage on the lattice.
    #[error("Model assumption violated: p_up = {p_up} ({reason})")]
    ModelAssumption { p_up: f64, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for PricerError {
    fn from(e: serde_json::Error) -> Self {
        PricerError::SerializationError(e.to_string())
    }
}
