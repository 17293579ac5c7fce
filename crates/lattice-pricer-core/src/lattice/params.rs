use serde::{Deserialize, Serialize};

use crate::error::PricerError;
use crate::types::{
    require_finite, require_non_negative, require_positive, OptionSpec, Rate, Years,
};
use crate::PricerResult;

/// Per-step lattice quantities derived from an [`OptionSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatticeParameters {
    pub dt: Years,
    pub up: f64,
    pub down: f64,
    pub p_up: f64,
    pub p_down: f64,
    /// One-step discount factor exp(-r dt).
    pub discount: f64,
}

impl LatticeParameters {
    /// CRR parameters for `spec`. Requires `spec.steps >= 1`; the zero-step
    /// case never builds a lattice.
    pub fn build(spec: &OptionSpec) -> PricerResult<Self> {
        Self::from_parts(
            spec.volatility,
            spec.rate,
            spec.dividend_yield,
            spec.maturity,
            spec.steps,
        )
    }

    pub fn from_parts(
        volatility: Rate,
        rate: Rate,
        dividend_yield: Rate,
        maturity: Years,
        steps: u32,
    ) -> PricerResult<Self> {
        if steps == 0 {
            return Err(PricerError::InvalidInput {
                field: "steps".into(),
                reason: "lattice construction needs at least one step".into(),
            });
        }
        require_positive("maturity", maturity)?;
        require_non_negative("volatility", volatility)?;
        require_finite("rate", rate)?;
        require_finite("dividend_yield", dividend_yield)?;

        let dt = maturity / f64::from(steps);
        let up = (volatility * dt.sqrt()).exp();
        let down = 1.0 / up;

        // up == down also catches volatilities small enough that exp() rounds to 1
        if up == down {
            return Err(degenerate_lattice(volatility));
        }

        let growth = ((rate - dividend_yield) * dt).exp();
        let p_up = (growth - down) / (up - down);
        if !p_up.is_finite() {
            return Err(PricerError::ModelAssumption {
                p_up,
                reason: "risk-neutral probability is not a finite number".into(),
            });
        }
        if !(0.0..=1.0).contains(&p_up) {
            return Err(PricerError::ModelAssumption {
                p_up,
                reason: format!(
                    "per-step growth {growth} lies outside [down, up] = [{down}, {up}]; \
                     increase steps or volatility"
                ),
            });
        }

        let params = LatticeParameters {
            dt,
            up,
            down,
            p_up,
            p_down: 1.0 - p_up,
            discount: (-rate * dt).exp(),
        };
        tracing::debug!(
            steps,
            dt,
            up,
            down,
            p_up,
            discount = params.discount,
            "built lattice parameters"
        );
        Ok(params)
    }
}

pub(crate) fn degenerate_lattice(volatility: Rate) -> PricerError {
    PricerError::Domain {
        context: format!(
            "lattice parameters: volatility {volatility} gives up == down, \
             risk-neutral probability divides by zero"
        ),
    }
}
