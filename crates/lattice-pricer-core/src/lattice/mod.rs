//! Cox-Ross-Rubinstein binomial lattice for European options.
//!
//! Pricing runs in three stages: [`params`] derives the per-step moves and
//! risk-neutral probabilities, [`payoff`] lays out the 2N+1 terminal grid and
//! its payoffs, and [`induction`] discounts that grid back to t=0.

pub mod arena;
pub mod induction;
pub mod params;
pub mod payoff;
pub mod pricer;

#[cfg(feature = "analytic")]
pub mod convergence;
#[cfg(feature = "analytic")]
pub mod valuation;
