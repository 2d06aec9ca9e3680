//! Random mixture engine.
//!
//! Evaluates the density, distribution function, interval probabilities and
//! quantiles of `Y = c + Σ wᵢ·Xᵢ` for independent one-dimensional atoms `Xᵢ`,
//! using only each atom's characteristic function for the general case.
//!
//! ```ignore
//! use mx_core::{Atom, Gamma, MixtureConfig, RandomMixture};
//!
//! let gamma = Gamma::new(3.0, 1.0)?;
//! let mixture = RandomMixture::new(
//!     vec![(Atom::from(gamma), 1.0), (Atom::from(gamma), 1.0)],
//!     0.0,
//!     MixtureConfig::default(),
//! )?;
//! let density = mixture.pdf(4.0);
//! let median = mixture.quantile(0.5, false)?;
//! ```

pub mod description;
pub mod distribution;
pub mod error;
pub mod exit_codes;
pub mod logging;
pub mod mixture;

pub use description::{AtomDescription, DistributionDescription, MixtureDescription};
pub use distribution::{AtomKind, Dirac, Distribution, Exponential, Gamma, Laplace, Normal, Uniform};
pub use error::{Error, ErrorCategory, Result};
pub use mixture::{Atom, Estimate, RandomMixture};
pub use mx_config::MixtureConfig;
