//! Boundary checks applied before any store access.

mod validation;
pub use validation::AccountValidator;
