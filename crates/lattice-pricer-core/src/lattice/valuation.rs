use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::pricer::BinomialPricer;
use crate::analytic::black_scholes::price_black_scholes_spec;
use crate::types::*;
use crate::PricerResult;

/// Below this many steps the lattice is flagged as coarse.
const COARSE_STEPS: u32 = 50;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionValuationInput {
    pub kind: OptionKind,
    pub spot: Price,
    pub strike: Price,
    pub volatility: Rate,
    pub rate: Rate,
    pub maturity: Years,
    #[serde(default)]
    pub dividend_yield: Rate,
    #[serde(default = "default_steps")]
    pub steps: u32,
    /// Largest acceptable |C - P - (S e^{-qT} - K e^{-rT})| before warning.
    #[serde(default = "default_parity_tolerance")]
    pub parity_tolerance: f64,
}

fn default_steps() -> u32 {
    500
}

fn default_parity_tolerance() -> f64 {
    1e-8
}

impl OptionValuationInput {
    /// Parses a request, applying the serde defaults for `dividend_yield`,
    /// `steps` and `parity_tolerance`.
    pub fn from_json(json: &str) -> PricerResult<Self> {
        let input = serde_json::from_str(json)?;
        Ok(input)
    }

    pub fn to_spec(&self) -> OptionSpec {
        OptionSpec::new(
            self.kind,
            self.spot,
            self.strike,
            self.volatility,
            self.rate,
            self.maturity,
            self.steps,
        )
        .with_dividend_yield(self.dividend_yield)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionValuationOutput {
    pub lattice_price: Price,
    pub black_scholes_price: Price,
    /// Lattice minus closed form.
    pub lattice_error: f64,
    pub intrinsic_value: Price,
    pub time_value: Price,
    pub moneyness: String,
    /// Lattice price of the opposite kind on the same lattice.
    pub parity_counterpart: Price,
    pub parity_residual: f64,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn classify_moneyness(s: Price, k: Price, kind: OptionKind) -> String {
    let ratio = s / k;
    // ATM band: within 1% of strike
    let (atm_lo, atm_hi) = (0.99, 1.01);
    let itm = match kind {
        OptionKind::Call => ratio > atm_hi,
        OptionKind::Put => ratio < atm_lo,
    };
    let otm = match kind {
        OptionKind::Call => ratio < atm_lo,
        OptionKind::Put => ratio > atm_hi,
    };
    if itm {
        "ITM".into()
    } else if otm {
        "OTM".into()
    } else {
        "ATM".into()
    }
}

/// C - P - (S e^{-qT} - K e^{-rT})
fn parity_residual(spec: &OptionSpec, price: Price, counterpart: Price) -> f64 {
    let (call, put) = match spec.kind {
        OptionKind::Call => (price, counterpart),
        OptionKind::Put => (counterpart, price),
    };
    let forward_leg = spec.spot * (-spec.dividend_yield * spec.maturity).exp()
        - spec.strike * (-spec.rate * spec.maturity).exp();
    call - put - forward_leg
}

// ---------------------------------------------------------------------------
// Public API: value_option
// ---------------------------------------------------------------------------

/// Prices on the lattice, cross-checks against Black-Scholes and put-call
/// parity, and wraps the result in the standard envelope.
pub fn value_option(
    input: &OptionValuationInput,
) -> PricerResult<ComputationOutput<OptionValuationOutput>> {
    let start = Instant::now();
    let spec = input.to_spec();

    let mut pricer = BinomialPricer::with_capacity(spec.steps);
    let lattice_price = pricer.price(&spec)?;
    let parity_counterpart = pricer.price(&spec.clone().with_kind(spec.kind.opposite()))?;
    let black_scholes_price = price_black_scholes_spec(&spec)?;

    let intrinsic_value = spec.intrinsic_value();
    let residual = parity_residual(&spec, lattice_price, parity_counterpart);

    let mut warnings = Vec::new();
    if spec.steps == 0 {
        warnings.push("Zero steps: returned the undiscounted immediate-exercise value".to_string());
    } else if spec.steps < COARSE_STEPS {
        warnings.push(format!(
            "Coarse lattice: {} steps, error against closed form may be material",
            spec.steps
        ));
    }
    // The zero-step value is undiscounted, so parity is not expected to hold
    if spec.steps > 0 && residual.abs() > input.parity_tolerance {
        warnings.push(format!(
            "Put-call parity residual {residual:e} exceeds tolerance {:e}",
            input.parity_tolerance
        ));
    }
    for w in &warnings {
        tracing::warn!(kind = %spec.kind, steps = spec.steps, "{w}");
    }

    let output = OptionValuationOutput {
        lattice_price,
        black_scholes_price,
        lattice_error: lattice_price - black_scholes_price,
        intrinsic_value,
        time_value: lattice_price - intrinsic_value,
        moneyness: classify_moneyness(spec.spot, spec.strike, spec.kind),
        parity_counterpart,
        parity_residual: residual,
    };

    let assumptions = serde_json::json!({
        "model": "Cox-Ross-Rubinstein binomial lattice",
        "reference_model": "Black-Scholes-Merton",
        "exercise_style": "European",
        "steps": spec.steps,
        "risk_free_rate": spec.rate,
        "volatility": spec.volatility,
        "dividend_yield": spec.dividend_yield,
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "CRR binomial lattice with Black-Scholes cross-check",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
