use crate::types::{OptionKind, Price};

/// Number of entries in the terminal grid for `steps` time steps.
#[inline]
pub fn grid_len(steps: u32) -> usize {
    2 * steps as usize + 1
}

/// Price of terminal node `i` on an `steps`-step grid: `spot * up^(N - i)`.
///
/// Evaluated as `spot * exp((N - i) * ln(up))` with a signed exponent, so a
/// node overflows only if its own price does; the entries below it stay finite.
#[inline]
pub fn terminal_price(spot: Price, ln_up: f64, steps: u32, i: usize) -> Price {
    let net_up_moves = f64::from(steps) - i as f64;
    spot * (net_up_moves * ln_up).exp()
}

/// Terminal stock prices on the 2N+1 net-move grid.
///
/// Entry `i` is `spot * up^N * down^i`, the price after a net `N - i`
/// up-moves, so the vector runs from the all-up leaf down to the all-down
/// leaf in strictly decreasing order.
pub fn terminal_prices(spot: Price, up: f64, steps: u32) -> Vec<Price> {
    let ln_up = up.ln();
    (0..grid_len(steps))
        .map(|i| terminal_price(spot, ln_up, steps, i))
        .collect()
}

/// Terminal payoffs, allocating a fresh vector.
pub fn terminal_payoffs(
    kind: OptionKind,
    spot: Price,
    strike: Price,
    up: f64,
    steps: u32,
) -> Vec<Price> {
    let mut payoffs = terminal_prices(spot, up, steps);
    for value in payoffs.iter_mut() {
        *value = kind.payoff(*value, strike);
    }
    payoffs
}

/// Writes terminal payoffs into `out`, which must hold exactly `grid_len(steps)`
/// entries. Produces the same values as [`terminal_payoffs`].
pub fn fill_terminal_payoffs(
    out: &mut [Price],
    kind: OptionKind,
    spot: Price,
    strike: Price,
    up: f64,
    steps: u32,
) {
    debug_assert_eq!(out.len(), grid_len(steps));
    let ln_up = up.ln();
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = kind.payoff(terminal_price(spot, ln_up, steps, i), strike);
    }
}
