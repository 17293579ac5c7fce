use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PricerError;
use crate::PricerResult;

/// Prices and payoffs, in currency units of the underlying.
pub type Price = f64;

/// Rates and volatilities expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = f64;

/// Year fractions
pub type Years = f64;

// ---------------------------------------------------------------------------
// Option contract
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    Call,
    Put,
}

impl OptionKind {
    /// Immediate-exercise payoff at `price`.
    #[inline]
    pub fn payoff(self, price: Price, strike: Price) -> Price {
        match self {
            OptionKind::Call => (price - strike).max(0.0),
            OptionKind::Put => (strike - price).max(0.0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            OptionKind::Call => OptionKind::Put,
            OptionKind::Put => OptionKind::Call,
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionKind::Call => f.write_str("call"),
            OptionKind::Put => f.write_str("put"),
        }
    }
}

/// Accepts the short codes `c` / `p` as well as `call` / `put`, in any case.
impl FromStr for OptionKind {
    type Err = PricerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "c" | "call" => Ok(OptionKind::Call),
            "p" | "put" => Ok(OptionKind::Put),
            other => Err(PricerError::InvalidInput {
                field: "kind".into(),
                reason: format!("unknown option kind '{other}', expected call or put"),
            }),
        }
    }
}

/// A single European option to be priced. Built once per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionSpec {
    pub kind: OptionKind,
    pub spot: Price,
    pub strike: Price,
    /// Annualized volatility.
    pub volatility: Rate,
    /// Annualized continuously-compounded risk-free rate.
    pub rate: Rate,
    pub maturity: Years,
    /// Lattice resolution N. Zero means immediate exercise.
    pub steps: u32,
    /// Flat continuous dividend yield.
    #[serde(default)]
    pub dividend_yield: Rate,
}

impl OptionSpec {
    pub fn new(
        kind: OptionKind,
        spot: Price,
        strike: Price,
        volatility: Rate,
        rate: Rate,
        maturity: Years,
        steps: u32,
    ) -> Self {
        OptionSpec {
            kind,
            spot,
            strike,
            volatility,
            rate,
            maturity,
            steps,
            dividend_yield: 0.0,
        }
    }

    pub fn with_dividend_yield(mut self, dividend_yield: Rate) -> Self {
        self.dividend_yield = dividend_yield;
        self
    }

    pub fn with_kind(mut self, kind: OptionKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_steps(mut self, steps: u32) -> Self {
        self.steps = steps;
        self
    }

    /// Undiscounted payoff if exercised at the current spot.
    pub fn intrinsic_value(&self) -> Price {
        self.kind.payoff(self.spot, self.strike)
    }

    /// Rejects inputs outside the model's domain. Zero volatility passes here
    /// and is rejected as a degenerate lattice by the pricers.
    pub fn validate(&self) -> PricerResult<()> {
        require_positive("spot", self.spot)?;
        require_positive("strike", self.strike)?;
        require_positive("maturity", self.maturity)?;
        require_non_negative("volatility", self.volatility)?;
        require_finite("rate", self.rate)?;
        require_finite("dividend_yield", self.dividend_yield)?;
        Ok(())
    }
}

pub(crate) fn require_positive(field: &str, value: f64) -> PricerResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(PricerError::InvalidInput {
            field: field.into(),
            reason: "must be positive".into(),
        });
    }
    Ok(())
}

pub(crate) fn require_non_negative(field: &str, value: f64) -> PricerResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(PricerError::InvalidInput {
            field: field.into(),
            reason: "must be a finite non-negative number".into(),
        });
    }
    Ok(())
}

pub(crate) fn require_finite(field: &str, value: f64) -> PricerResult<()> {
    if !value.is_finite() {
        return Err(PricerError::InvalidInput {
            field: field.into(),
            reason: "must be finite".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Output envelope
// ---------------------------------------------------------------------------

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "ieee754_f64".to_string(),
        },
    }
}
