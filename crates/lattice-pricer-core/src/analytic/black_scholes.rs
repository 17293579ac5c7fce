use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::PricerError;
use crate::types::{OptionKind, OptionSpec, Price, Rate, Years};
use crate::PricerResult;

/// d1 / d2 and the two discount factors shared by call and put.
struct BsParams {
    d1: f64,
    d2: f64,
    exp_neg_qt: f64,
    exp_neg_rt: f64,
}

fn compute_bs_params(s: f64, k: f64, t: f64, r: f64, q: f64, sigma: f64) -> BsParams {
    let sigma_sqrt_t = sigma * t.sqrt();
    let d1 = ((s / k).ln() + (r - q + 0.5 * sigma * sigma) * t) / sigma_sqrt_t;
    BsParams {
        d1,
        d2: d1 - sigma_sqrt_t,
        exp_neg_qt: (-q * t).exp(),
        exp_neg_rt: (-r * t).exp(),
    }
}

/// Black-Scholes-Merton price of a European option with a continuous
/// dividend yield.
///
/// Note the argument order: maturity comes before the rate here.
pub fn price_black_scholes(
    kind: OptionKind,
    spot: Price,
    strike: Price,
    volatility: Rate,
    maturity: Years,
    rate: Rate,
    dividend_yield: Rate,
) -> PricerResult<Price> {
    let spec = OptionSpec::new(kind, spot, strike, volatility, rate, maturity, 0)
        .with_dividend_yield(dividend_yield);
    price_black_scholes_spec(&spec)
}

/// Closed-form price for `spec`; the step count is ignored.
pub fn price_black_scholes_spec(spec: &OptionSpec) -> PricerResult<Price> {
    spec.validate()?;
    if spec.volatility == 0.0 {
        return Err(PricerError::Domain {
            context: "black-scholes d1: zero volatility divides by sigma * sqrt(T)".into(),
        });
    }

    let (s, k) = (spec.spot, spec.strike);
    let params = compute_bs_params(
        s,
        k,
        spec.maturity,
        spec.rate,
        spec.dividend_yield,
        spec.volatility,
    );
    let n = Normal::standard();
    let price = match spec.kind {
        OptionKind::Call => {
            s * params.exp_neg_qt * n.cdf(params.d1) - k * params.exp_neg_rt * n.cdf(params.d2)
        }
        OptionKind::Put => {
            k * params.exp_neg_rt * n.cdf(-params.d2) - s * params.exp_neg_qt * n.cdf(-params.d1)
        }
    };
    // Cancellation can leave a tiny negative for far out-of-the-money strikes
    Ok(price.max(0.0))
}
