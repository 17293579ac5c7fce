use serde::{Deserialize, Serialize};

use super::pricer::BinomialPricer;
use crate::analytic::black_scholes::price_black_scholes_spec;
use crate::error::PricerError;
use crate::types::{OptionSpec, Price};
use crate::PricerResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergencePoint {
    pub steps: u32,
    pub lattice_price: Price,
    pub abs_error: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceReport {
    pub black_scholes_price: Price,
    /// One point per requested step count, in request order.
    pub points: Vec<ConvergencePoint>,
}

impl ConvergenceReport {
    /// The point with the smallest absolute error.
    pub fn best(&self) -> Option<&ConvergencePoint> {
        self.points
            .iter()
            .min_by(|a, b| a.abs_error.total_cmp(&b.abs_error))
    }
}

/// Prices `spec` at each of `steps` (its own `steps` field is ignored) and
/// measures the gap to the closed-form limit.
pub fn convergence_study(spec: &OptionSpec, steps: &[u32]) -> PricerResult<ConvergenceReport> {
    if steps.is_empty() {
        return Err(PricerError::InvalidInput {
            field: "steps".into(),
            reason: "at least one step count is required".into(),
        });
    }
    let black_scholes_price = price_black_scholes_spec(spec)?;

    let max_steps = steps.iter().copied().max().unwrap_or_default();
    let mut pricer = BinomialPricer::with_capacity(max_steps);
    let mut points = Vec::with_capacity(steps.len());
    for &n in steps {
        let lattice_price = pricer.price(&spec.clone().with_steps(n))?;
        let abs_error = (lattice_price - black_scholes_price).abs();
        tracing::debug!(steps = n, lattice_price, abs_error, "convergence point");
        points.push(ConvergencePoint {
            steps: n,
            lattice_price,
            abs_error,
        });
    }

    Ok(ConvergenceReport {
        black_scholes_price,
        points,
    })
}
