use super::arena::LatticeArena;
use super::induction::backward_induction;
use super::params::{degenerate_lattice, LatticeParameters};
use super::payoff::{fill_terminal_payoffs, terminal_payoffs};
use crate::error::PricerError;
use crate::types::{OptionKind, OptionSpec, Price, Rate, Years};
use crate::PricerResult;

// ---------------------------------------------------------------------------
// Public API: free functions
// ---------------------------------------------------------------------------

/// Prices a European option on a CRR binomial lattice with `steps` steps.
///
/// `steps = 0` returns the undiscounted immediate-exercise payoff.
pub fn price_binomial(
    kind: OptionKind,
    spot: Price,
    strike: Price,
    volatility: Rate,
    rate: Rate,
    maturity: Years,
    steps: u32,
) -> PricerResult<Price> {
    let spec = OptionSpec::new(kind, spot, strike, volatility, rate, maturity, steps);
    price_binomial_spec(&spec)
}

/// As [`price_binomial`], taking the whole spec (including its dividend yield).
pub fn price_binomial_spec(spec: &OptionSpec) -> PricerResult<Price> {
    if let Some(intrinsic) = immediate_exercise(spec)? {
        return Ok(intrinsic);
    }
    let params = LatticeParameters::build(spec)?;
    let mut values = terminal_payoffs(
        spec.kind,
        spec.spot,
        spec.strike,
        params.up,
        spec.steps,
    );
    finite_root(backward_induction(&mut values, spec.steps, &params), spec)
}

/// Validates `spec` and short-circuits the zero-step case.
fn immediate_exercise(spec: &OptionSpec) -> PricerResult<Option<Price>> {
    spec.validate()?;
    if spec.steps > 0 {
        return Ok(None);
    }
    if spec.volatility == 0.0 {
        return Err(degenerate_lattice(spec.volatility));
    }
    Ok(Some(spec.intrinsic_value()))
}

/// Rejects a root that overflowed (or turned NaN) on extreme terminal prices.
fn finite_root(root: Price, spec: &OptionSpec) -> PricerResult<Price> {
    if root.is_finite() {
        return Ok(root);
    }
    Err(PricerError::Domain {
        context: format!(
            "backward induction: {} lattice value {root} is not finite; \
             spot * exp(volatility * sqrt(maturity * steps)) overflows f64 \
             (volatility {}, maturity {}, steps {})",
            spec.kind, spec.volatility, spec.maturity, spec.steps
        ),
    })
}

// ---------------------------------------------------------------------------
// Public API: arena-backed pricer
// ---------------------------------------------------------------------------

/// Binomial pricer that keeps its payoff buffer between calls.
///
/// Gives bit-identical results to [`price_binomial_spec`].
#[derive(Debug, Clone, Default)]
pub struct BinomialPricer {
    arena: LatticeArena,
}

impl BinomialPricer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(max_steps: u32) -> Self {
        Self {
            arena: LatticeArena::with_capacity(max_steps),
        }
    }

    pub fn price(&mut self, spec: &OptionSpec) -> PricerResult<Price> {
        if let Some(intrinsic) = immediate_exercise(spec)? {
            return Ok(intrinsic);
        }
        let params = LatticeParameters::build(spec)?;
        let values = self.arena.grid_slice(spec.steps);
        fill_terminal_payoffs(
            values,
            spec.kind,
            spec.spot,
            spec.strike,
            params.up,
            spec.steps,
        );
        finite_root(backward_induction(values, spec.steps, &params), spec)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
