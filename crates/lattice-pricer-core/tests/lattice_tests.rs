use lattice_pricer_core::lattice::convergence::{convergence_study, ConvergencePoint, ConvergenceReport};
use lattice_pricer_core::lattice::params::LatticeParameters;
use lattice_pricer_core::lattice::payoff::terminal_payoffs;
use lattice_pricer_core::lattice::valuation::{value_option, OptionValuationInput};
use lattice_pricer_core::{
    price_binomial, price_binomial_spec, price_black_scholes, BinomialPricer, OptionKind,
    OptionSpec, PricerError,
};
use pretty_assertions::assert_eq;

fn spec(kind: OptionKind, spot: f64, strike: f64, steps: u32) -> OptionSpec {
    OptionSpec::new(kind, spot, strike, 0.25, 0.03, 0.5, steps)
}

// ===========================================================================
// Put-call parity
// ===========================================================================

#[test]
fn test_put_call_parity_across_grid() {
    for spot in [80.0, 100.0, 125.0] {
        for strike in [90.0, 110.0] {
            for steps in [1, 7, 100] {
                for q in [0.0, 0.02] {
                    let call = spec(OptionKind::Call, spot, strike, steps).with_dividend_yield(q);
                    let put = call.clone().with_kind(OptionKind::Put);
                    let c = price_binomial_spec(&call).unwrap();
                    let p = price_binomial_spec(&put).unwrap();
                    let rhs = spot * (-q * 0.5_f64).exp() - strike * (-0.03 * 0.5_f64).exp();
                    assert!(
                        (c - p - rhs).abs() < 1e-9,
                        "S={spot} K={strike} N={steps} q={q}: C-P={} rhs={rhs}",
                        c - p
                    );
                }
            }
        }
    }
}

// ===========================================================================
// Convergence to the closed form
// ===========================================================================

#[test]
fn test_convergence_reference_case() {
    let bs = price_black_scholes(OptionKind::Call, 100.0, 100.0, 0.3, 1.0, 0.05, 0.0).unwrap();
    let err = |n: u32| {
        let v = price_binomial(OptionKind::Call, 100.0, 100.0, 0.3, 0.05, 1.0, n).unwrap();
        (v - bs).abs()
    };
    assert!(err(50) < err(10), "N=50 should beat N=10");
    assert!(err(500) < 0.01, "N=500 error {}", err(500));
}

#[test]
fn test_known_value_at_500_steps() {
    let lattice = price_binomial(OptionKind::Call, 100.0, 100.0, 0.3, 0.05, 1.0, 500).unwrap();
    let closed = price_black_scholes(OptionKind::Call, 100.0, 100.0, 0.3, 1.0, 0.05, 0.0).unwrap();
    assert!((lattice - 14.2254).abs() < 1e-4, "lattice={lattice}");
    assert!((closed - 14.2313).abs() < 1e-4, "closed={closed}");
    assert!((lattice - closed).abs() < 0.1);
}

#[test]
fn test_convergence_with_dividend_yield() {
    let spec = OptionSpec::new(OptionKind::Call, 100.0, 100.0, 0.3, 0.05, 1.0, 500)
        .with_dividend_yield(0.02);
    let lattice = price_binomial_spec(&spec).unwrap();
    let closed = price_black_scholes(OptionKind::Call, 100.0, 100.0, 0.3, 1.0, 0.05, 0.02).unwrap();
    assert!((lattice - closed).abs() < 0.01, "lattice={lattice} closed={closed}");
}

#[test]
fn test_convergence_study_matches_direct_pricing() {
    let base = OptionSpec::new(OptionKind::Put, 100.0, 105.0, 0.2, 0.01, 2.0, 0);
    let report = convergence_study(&base, &[5, 25]).unwrap();

    let bs = price_black_scholes(OptionKind::Put, 100.0, 105.0, 0.2, 2.0, 0.01, 0.0).unwrap();
    let point = |n: u32| {
        let v = price_binomial_spec(&base.clone().with_steps(n)).unwrap();
        ConvergencePoint {
            steps: n,
            lattice_price: v,
            abs_error: (v - bs).abs(),
        }
    };
    let expected = ConvergenceReport {
        black_scholes_price: bs,
        points: vec![point(5), point(25)],
    };
    assert_eq!(report, expected);
}

// ===========================================================================
// Boundary and sign properties
// ===========================================================================

#[test]
fn test_zero_steps_returns_undiscounted_intrinsic() {
    for (spot, strike) in [(130.0, 100.0), (70.0, 100.0), (100.0, 100.0)] {
        let c = price_binomial(OptionKind::Call, spot, strike, 0.4, 0.08, 3.0, 0).unwrap();
        let p = price_binomial(OptionKind::Put, spot, strike, 0.4, 0.08, 3.0, 0).unwrap();
        assert_eq!(c, f64::max(spot - strike, 0.0));
        assert_eq!(p, f64::max(strike - spot, 0.0));
    }
}

#[test]
fn test_prices_non_negative() {
    for kind in [OptionKind::Call, OptionKind::Put] {
        for spot in [10.0, 95.0, 100.0, 105.0, 1_000.0] {
            for vol in [0.1, 0.5, 1.5] {
                for rate in [0.0, 0.1] {
                    for steps in [5, 60] {
                        let s = OptionSpec::new(kind, spot, 100.0, vol, rate, 1.0, steps);
                        let lattice = price_binomial_spec(&s).unwrap();
                        let closed =
                            price_black_scholes(kind, spot, 100.0, vol, 1.0, rate, 0.0).unwrap();
                        assert!(lattice >= 0.0, "{s:?} lattice={lattice}");
                        assert!(closed >= 0.0, "{s:?} closed={closed}");
                    }
                }
            }
        }
    }
}

// ===========================================================================
// Error taxonomy
// ===========================================================================

#[test]
fn test_zero_volatility_raises_domain_error() {
    let lattice = price_binomial(OptionKind::Call, 100.0, 100.0, 0.0, 0.05, 1.0, 50);
    let closed = price_black_scholes(OptionKind::Call, 100.0, 100.0, 0.0, 1.0, 0.05, 0.0);
    assert!(matches!(lattice, Err(PricerError::Domain { .. })));
    assert!(matches!(closed, Err(PricerError::Domain { .. })));
}

#[test]
fn test_invalid_inputs_name_the_field() {
    let cases = [
        ("spot", price_binomial(OptionKind::Call, 0.0, 100.0, 0.3, 0.05, 1.0, 10)),
        ("strike", price_binomial(OptionKind::Call, 100.0, -1.0, 0.3, 0.05, 1.0, 10)),
        ("volatility", price_binomial(OptionKind::Call, 100.0, 100.0, -0.3, 0.05, 1.0, 10)),
        ("maturity", price_binomial(OptionKind::Call, 100.0, 100.0, 0.3, 0.05, -1.0, 10)),
    ];
    for (expected, result) in cases {
        match result {
            Err(PricerError::InvalidInput { field, .. }) => assert_eq!(field, expected),
            other => panic!("Expected InvalidInput on {expected}, got {other:?}"),
        }
    }
}

#[test]
fn test_unknown_kind_code_rejected() {
    assert!(matches!(
        "x".parse::<OptionKind>(),
        Err(PricerError::InvalidInput { .. })
    ));
}

#[test]
fn test_arbitrage_regime_raises_model_assumption_error() {
    for rate in [0.5, -0.5] {
        match price_binomial(OptionKind::Put, 100.0, 100.0, 0.01, rate, 1.0, 1) {
            Err(PricerError::ModelAssumption { p_up, .. }) => {
                assert!(!(0.0..=1.0).contains(&p_up), "p_up={p_up}")
            }
            other => panic!("rate={rate}: expected ModelAssumption, got {other:?}"),
        }
    }
}

#[test]
fn test_more_steps_can_cure_arbitrage_regime() {
    // r * sqrt(dt) < sigma once dt is small enough
    let coarse = OptionSpec::new(OptionKind::Call, 100.0, 100.0, 0.1, 0.3, 1.0, 1);
    assert!(LatticeParameters::build(&coarse).is_err());
    assert!(LatticeParameters::build(&coarse.with_steps(100)).is_ok());
}

// ===========================================================================
// Stages and the reusable pricer
// ===========================================================================

#[test]
fn test_stages_compose_to_price() {
    let s = spec(OptionKind::Call, 100.0, 95.0, 40);
    let params = LatticeParameters::build(&s).unwrap();
    let mut values = terminal_payoffs(s.kind, s.spot, s.strike, params.up, s.steps);
    assert_eq!(values.len(), 81);
    let root =
        lattice_pricer_core::lattice::induction::backward_induction(&mut values, s.steps, &params);
    assert_eq!(root, price_binomial_spec(&s).unwrap());
}

#[test]
fn test_overflowing_terminal_grid_is_reported_not_returned() {
    // exp(8 * sqrt(4 * 2000)) is past f64::MAX at the top of the grid
    let call = OptionSpec::new(OptionKind::Call, 100.0, 100.0, 8.0, 0.05, 4.0, 2_000);
    assert!(matches!(
        price_binomial_spec(&call),
        Err(PricerError::Domain { .. })
    ));
    assert!(matches!(
        value_option(&OptionValuationInput::from_json(
            r#"{"kind":"call","spot":100.0,"strike":100.0,"volatility":8.0,
                "rate":0.05,"maturity":4.0,"steps":2000}"#
        )
        .unwrap()),
        Err(PricerError::Domain { .. })
    ));

    let put = call.with_kind(OptionKind::Put);
    let lattice = price_binomial_spec(&put).unwrap();
    let closed = price_black_scholes(OptionKind::Put, 100.0, 100.0, 8.0, 4.0, 0.05, 0.0).unwrap();
    assert!((lattice - closed).abs() < 1e-4, "lattice={lattice} closed={closed}");
}

#[test]
fn test_malformed_request_is_serialization_error() {
    assert!(matches!(
        OptionValuationInput::from_json("not json"),
        Err(PricerError::SerializationError(_))
    ));
}

#[test]
fn test_pricer_is_deterministic_across_reuse() {
    let mut pricer = BinomialPricer::new();
    let a = spec(OptionKind::Put, 100.0, 100.0, 300);
    let b = spec(OptionKind::Call, 90.0, 100.0, 20);
    let first = pricer.price(&a).unwrap();
    pricer.price(&b).unwrap();
    let again = pricer.price(&a).unwrap();
    assert_eq!(first.to_bits(), again.to_bits());
}

#[test]
fn test_valuation_round_trips_through_json() {
    let input = OptionValuationInput::from_json(
        r#"{"kind":"put","spot":95.0,"strike":100.0,"volatility":0.2,
            "rate":0.02,"maturity":0.25,"steps":200}"#,
    )
    .unwrap();
    let out = value_option(&input).unwrap();
    let json = serde_json::to_value(&out).unwrap();
    assert_eq!(json["result"]["moneyness"], "ITM");
    assert_eq!(json["metadata"]["precision"], "ieee754_f64");
    assert_eq!(json["assumptions"]["steps"], 200);
    assert!(out.warnings.is_empty(), "{:?}", out.warnings);
}
