//! Core math modules.

pub mod gamma;
pub mod interval;
pub mod normal;
pub mod quadrature;
pub mod roots;
pub mod stable;
