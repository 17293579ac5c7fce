pub mod error;
pub mod types;

#[cfg(feature = "lattice")]
pub mod lattice;

#[cfg(feature = "analytic")]
pub mod analytic;

pub use error::PricerError;
pub use types::*;

#[cfg(feature = "lattice")]
pub use lattice::pricer::{price_binomial, price_binomial_spec, BinomialPricer};

#[cfg(feature = "analytic")]
pub use analytic::black_scholes::price_black_scholes;

/// Standard result type for all pricing operations
pub type PricerResult<T> = Result<T, PricerError>;
