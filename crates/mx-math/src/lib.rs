//! Mixture engine math utilities.

pub mod math;

pub use math::gamma::*;
pub use math::interval::Interval;
pub use math::normal::*;
pub use math::quadrature::{GaussLegendre, QuadratureError};
pub use math::roots::{brentq, RootError, RootResult, ScalarOptions};
pub use math::stable::*;
