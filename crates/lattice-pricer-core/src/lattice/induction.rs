use super::params::LatticeParameters;

/// One application of the discounted local-expectation operator.
///
/// Reads the first `len` entries of `values` and leaves the `len - 2` results
/// in place: `values[j] = discount * (p_up * values[j] + p_down * values[j + 2])`.
/// Going left to right, the write to `j` only reads `j` and `j + 2`, neither of
/// which has been overwritten yet in this pass.
#[inline]
pub fn apply_expectation(values: &mut [f64], len: usize, params: &LatticeParameters) {
    debug_assert!(len >= 3 && len <= values.len());
    for j in 0..len - 2 {
        values[j] = params.discount * (params.p_up * values[j] + params.p_down * values[j + 2]);
    }
}

/// Collapses a terminal payoff grid of length `2 * steps + 1` to its t=0
/// value by applying the expectation operator `steps` times.
///
/// After pass `i` the live prefix has `2 * (steps - i) + 1` entries; the
/// returned value is the sole survivor, which depends only on the even
/// offsets 0, 2, ..., 2N of the input (the reachable leaves).
pub fn backward_induction(values: &mut [f64], steps: u32, params: &LatticeParameters) -> f64 {
    let mut len = 2 * steps as usize + 1;
    debug_assert_eq!(values.len(), len);
    for _ in 0..steps {
        apply_expectation(values, len, params);
        len -= 2;
    }
    values[0]
}
